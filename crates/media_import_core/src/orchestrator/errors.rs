//! Error types for batch import.
//!
//! Errors carry context that chains through layers:
//! Batch → Item → Operation → Detail

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::host::ApiError;

/// Reportable category of a failure.
///
/// The declaration order is the order summary lines are reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ErrorKind {
    /// The host editor signalled failure.
    Api,
    /// A descriptor field was missing or had the wrong type.
    Validation,
    /// A referenced local file does not exist.
    AssetNotFound,
    /// The descriptor's type is not one we can import.
    Unsupported,
    /// Anything outside the four kinds above. Aborts the batch.
    Unexpected,
}

impl ErrorKind {
    /// Every per-item kind, in report order.
    pub const ITEM_KINDS: [ErrorKind; 4] = [
        ErrorKind::Api,
        ErrorKind::Validation,
        ErrorKind::AssetNotFound,
        ErrorKind::Unsupported,
    ];

    /// One-line, user-facing summary for this kind.
    pub fn summary(&self) -> &'static str {
        match self {
            ErrorKind::Api => {
                "Some items could not be added to media pool, no reason given by the editor API."
            }
            ErrorKind::Validation => {
                "Some items' JSON was invalid, leading to incomplete media import or metadata."
            }
            ErrorKind::AssetNotFound => "Some items could not be found in the filesystem.",
            ErrorKind::Unsupported => {
                "Some items were not on local storage, or were not masterclips. These features are not implemented."
            }
            ErrorKind::Unexpected => "Encountered unexpected exception.",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Api => write!(f, "api"),
            ErrorKind::Validation => write!(f, "validation"),
            ErrorKind::AssetNotFound => write!(f, "asset-not-found"),
            ErrorKind::Unsupported => write!(f, "unsupported"),
            ErrorKind::Unexpected => write!(f, "unexpected"),
        }
    }
}

/// Failure while importing a single descriptor.
#[derive(Error, Debug)]
pub enum ImportError {
    /// A descriptor or one of its nested fields is malformed.
    #[error("Invalid clip descriptor: {0}")]
    Validation(String),

    /// The referenced media file does not exist.
    #[error("Media file not found: {}", .path.display())]
    AssetNotFound { path: PathBuf },

    /// The descriptor's type is not importable.
    #[error("Unsupported clip type '{clip_type}'")]
    Unsupported { clip_type: String },

    /// The host editor signalled failure.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Local file I/O failed.
    #[error("I/O error in {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: io::Error,
    },
}

impl ImportError {
    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create an asset not found error.
    pub fn asset_not_found(path: impl Into<PathBuf>) -> Self {
        Self::AssetNotFound { path: path.into() }
    }

    /// Create an unsupported type error.
    pub fn unsupported(clip_type: impl Into<String>) -> Self {
        Self::Unsupported {
            clip_type: clip_type.into(),
        }
    }

    /// Create a host API error.
    pub fn api(operation: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Api(ApiError::new(operation, detail))
    }

    /// Create an I/O error with context.
    pub fn io(operation: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ImportError::Validation(_) => ErrorKind::Validation,
            ImportError::AssetNotFound { .. } => ErrorKind::AssetNotFound,
            ImportError::Unsupported { .. } => ErrorKind::Unsupported,
            ImportError::Api(_) => ErrorKind::Api,
            ImportError::Io { .. } => ErrorKind::Unexpected,
        }
    }
}

/// Failure that aborts a whole batch. No per-item results are kept.
#[derive(Error, Debug)]
pub enum BatchError {
    /// The payload is not JSON, or its top level is not an array.
    #[error("Malformed batch payload: {0}")]
    MalformedInput(String),

    /// An error outside the per-item taxonomy.
    #[error("Unexpected failure {}: {source}", describe_index(.index))]
    Unexpected {
        /// Descriptor being processed, if any.
        index: Option<usize>,
        #[source]
        source: ImportError,
    },
}

fn describe_index(index: &Option<usize>) -> String {
    match index {
        Some(i) => format!("at item {}", i),
        None => "before processing items".to_string(),
    }
}

impl BatchError {
    /// Create a malformed input error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedInput(message.into())
    }

    /// Create an unexpected failure error.
    pub fn unexpected(index: Option<usize>, source: ImportError) -> Self {
        Self::Unexpected { index, source }
    }
}

/// Result type for single-item operations.
pub type ImportResult<T> = Result<T, ImportError>;

/// Result type for batch operations.
pub type BatchResult<T> = Result<T, BatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_variants() {
        assert_eq!(ImportError::validation("x").kind(), ErrorKind::Validation);
        assert_eq!(
            ImportError::asset_not_found("/missing").kind(),
            ErrorKind::AssetNotFound
        );
        assert_eq!(ImportError::unsupported("widget").kind(), ErrorKind::Unsupported);
        assert_eq!(ImportError::api("move clips", "rejected").kind(), ErrorKind::Api);
        assert_eq!(
            ImportError::io("write", io::Error::other("disk full")).kind(),
            ErrorKind::Unexpected
        );
    }

    #[test]
    fn import_error_displays_context() {
        let msg = ImportError::asset_not_found("/media/a.mov").to_string();
        assert!(msg.contains("/media/a.mov"));

        let msg = ImportError::unsupported("widget").to_string();
        assert!(msg.contains("widget"));
    }

    #[test]
    fn batch_error_chains_source() {
        let err = BatchError::unexpected(
            Some(3),
            ImportError::io("write temporary timeline", io::Error::other("disk full")),
        );
        let msg = err.to_string();
        assert!(msg.contains("item 3"));
        assert!(msg.contains("disk full"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn item_kinds_are_ordered_for_reporting() {
        let mut kinds = ErrorKind::ITEM_KINDS.to_vec();
        kinds.sort();
        assert_eq!(kinds, ErrorKind::ITEM_KINDS.to_vec());
    }
}
