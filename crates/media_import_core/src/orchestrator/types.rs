//! Core types for batch import.

use std::path::PathBuf;

use crate::host::ClipHandle;

use super::errors::{ErrorKind, ImportError};

/// Read-only context shared by every importer in a batch.
///
/// Built from the `[paths]` and `[import]` settings. Mutable state lives
/// in the host, not here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportContext {
    /// Directory for temporary timeline files.
    pub temp_dir: PathBuf,
    /// Colour given to every marker in the session.
    pub marker_colour: String,
    /// Folder under the pool root holding compound-clip intermediates.
    pub staging_bin_name: String,
    /// Prefix of the synthesized description, as in "CatDV Asset ID: 42".
    pub asset_id_label: String,
    /// Check embedded timeline XML before handing it to the host.
    pub validate_timeline_xml: bool,
}

impl ImportContext {
    pub fn new(temp_dir: impl Into<PathBuf>) -> Self {
        Self {
            temp_dir: temp_dir.into(),
            ..Default::default()
        }
    }

    /// Description written for an asset identifier.
    pub fn describe_asset(&self, id: &str) -> String {
        format!("{}: {}", self.asset_id_label, id)
    }
}

impl Default for ImportContext {
    fn default() -> Self {
        Self {
            temp_dir: PathBuf::from(".temp"),
            marker_colour: "Blue".to_string(),
            staging_bin_name: "CatDV Compound Sources".to_string(),
            asset_id_label: "CatDV Asset ID".to_string(),
            validate_timeline_xml: true,
        }
    }
}

/// Outcome of one descriptor.
#[derive(Debug)]
pub enum ItemOutcome {
    /// The clip is in the pool with its metadata applied.
    Imported(ClipHandle),
    /// Nothing from this descriptor remains in the pool.
    Failed(ImportError),
}

impl ItemOutcome {
    pub fn is_imported(&self) -> bool {
        matches!(self, Self::Imported(_))
    }

    pub fn clip(&self) -> Option<ClipHandle> {
        match self {
            Self::Imported(clip) => Some(*clip),
            Self::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&ImportError> {
        match self {
            Self::Imported(_) => None,
            Self::Failed(err) => Some(err),
        }
    }
}

/// Per-index results of a batch, aligned with the input array.
#[derive(Debug)]
pub struct BatchOutcome {
    /// When the batch started (RFC 3339).
    pub started_at: String,
    pub items: Vec<ItemOutcome>,
}

impl BatchOutcome {
    pub fn new() -> Self {
        Self {
            started_at: chrono::Local::now().to_rfc3339(),
            items: Vec::new(),
        }
    }

    pub fn push(&mut self, outcome: ItemOutcome) {
        self.items.push(outcome);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn succeeded(&self) -> usize {
        self.items.iter().filter(|o| o.is_imported()).count()
    }

    pub fn failed(&self) -> usize {
        self.len() - self.succeeded()
    }

    /// Clips that made it into the pool, in input order.
    pub fn clips(&self) -> Vec<ClipHandle> {
        self.items.iter().filter_map(ItemOutcome::clip).collect()
    }

    /// Distinct failure kinds seen in the batch, in report order.
    pub fn error_kinds(&self) -> Vec<ErrorKind> {
        let mut kinds: Vec<ErrorKind> = self
            .items
            .iter()
            .filter_map(|o| o.error().map(ImportError::kind))
            .collect();
        kinds.sort();
        kinds.dedup();
        kinds
    }
}

impl Default for BatchOutcome {
    fn default() -> Self {
        Self::new()
    }
}
