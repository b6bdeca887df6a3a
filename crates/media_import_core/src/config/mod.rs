//! Configuration for the media import tools.
//!
//! This module provides:
//! - TOML-based configuration with `[paths]`, `[import]` and `[logging]` sections
//! - Atomic file writes (write to temp, then rename)
//! - Section-level updates (only changed section is modified)
//!
//! # Example
//!
//! ```no_run
//! use media_import_core::config::{ConfigManager, ConfigSection};
//!
//! let mut config = ConfigManager::new(".config/media-import.toml");
//! config.load_or_create().unwrap();
//!
//! println!("Staging bin: {}", config.settings().import.staging_bin_name);
//!
//! config.settings_mut().import.marker_colour = "Red".to_string();
//! config.update_section(ConfigSection::Import).unwrap();
//! ```

mod manager;
mod settings;

pub use manager::{ConfigError, ConfigManager, ConfigResult};
pub use settings::{ConfigSection, ImportSettings, LoggingSettings, PathSettings, Settings};
