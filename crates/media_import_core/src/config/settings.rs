//! Settings struct with TOML-based sections.
//!
//! Settings are organized into logical sections that map to TOML tables.
//! Each section can be updated independently for atomic section-level updates.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::logging::LogLevel;
use crate::orchestrator::ImportContext;

/// Root settings structure containing all configuration sections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Working directories.
    #[serde(default)]
    pub paths: PathSettings,

    /// Batch import behaviour.
    #[serde(default)]
    pub import: ImportSettings,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl Settings {
    /// Read-only context for the batch importer.
    pub fn import_context(&self) -> ImportContext {
        self.import.to_context(&self.paths)
    }
}

/// Path configuration for temp files and logs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathSettings {
    /// Folder for temporary timeline files. Relative to the working directory.
    #[serde(default = "default_temp_dir")]
    pub temp_dir: String,

    /// Folder for log files.
    #[serde(default = "default_logs_folder")]
    pub logs_folder: String,
}

fn default_temp_dir() -> String {
    ".temp".to_string()
}

fn default_logs_folder() -> String {
    ".logs".to_string()
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            temp_dir: default_temp_dir(),
            logs_folder: default_logs_folder(),
        }
    }
}

/// Import behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportSettings {
    /// Colour of every marker added in a session.
    #[serde(default = "default_marker_colour")]
    pub marker_colour: String,

    /// Name of the pool-root folder used to build compound clips.
    #[serde(default = "default_staging_bin_name")]
    pub staging_bin_name: String,

    /// Label in front of the asset ID in clip descriptions.
    #[serde(default = "default_asset_id_label")]
    pub asset_id_label: String,

    /// Check embedded timeline XML before importing it.
    #[serde(default = "default_true")]
    pub validate_timeline_xml: bool,
}

fn default_marker_colour() -> String {
    "Blue".to_string()
}

fn default_staging_bin_name() -> String {
    "CatDV Compound Sources".to_string()
}

fn default_asset_id_label() -> String {
    "CatDV Asset ID".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            marker_colour: default_marker_colour(),
            staging_bin_name: default_staging_bin_name(),
            asset_id_label: default_asset_id_label(),
            validate_timeline_xml: default_true(),
        }
    }
}

impl ImportSettings {
    pub fn to_context(&self, paths: &PathSettings) -> ImportContext {
        ImportContext {
            temp_dir: PathBuf::from(&paths.temp_dir),
            marker_colour: self.marker_colour.clone(),
            staging_bin_name: self.staging_bin_name.clone(),
            asset_id_label: self.asset_id_label.clone(),
            validate_timeline_xml: self.validate_timeline_xml,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Level used when `RUST_LOG` is not set.
    #[serde(default)]
    pub level: LogLevel,

    /// Also write a daily log file under `paths.logs_folder`.
    #[serde(default = "default_true")]
    pub file_logging: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            file_logging: default_true(),
        }
    }
}

/// Configuration sections for section-level updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSection {
    Paths,
    Import,
    Logging,
}

impl ConfigSection {
    pub const ALL: [ConfigSection; 3] = [
        ConfigSection::Paths,
        ConfigSection::Import,
        ConfigSection::Logging,
    ];

    /// Get the TOML table name for this section.
    pub fn table_name(&self) -> &'static str {
        match self {
            ConfigSection::Paths => "paths",
            ConfigSection::Import => "import",
            ConfigSection::Logging => "logging",
        }
    }

    /// Comment written above the table in generated files.
    pub fn description(&self) -> &'static str {
        match self {
            ConfigSection::Paths => "Working directories",
            ConfigSection::Import => "Media pool import behaviour",
            ConfigSection::Logging => "Logging configuration",
        }
    }
}
