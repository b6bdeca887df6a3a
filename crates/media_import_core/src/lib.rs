//! Media Import Core - batch clip import into an editor's media pool
//!
//! This crate contains the import logic with zero UI dependencies.
//! The host editor is reached only through the [`host::EditorHost`] trait.
//! [`host::MemoryEditor`] implements it for dry runs and tests.

pub mod bridge;
pub mod config;
pub mod descriptor;
pub mod host;
pub mod logging;
pub mod orchestrator;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
