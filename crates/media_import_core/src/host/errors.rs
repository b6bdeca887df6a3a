//! Error raised when the host editor signals failure.

use thiserror::Error;

/// A host call returned a null or falsy result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Editor API call '{operation}' failed: {detail}")]
pub struct ApiError {
    /// Host operation that failed (e.g. "import media").
    pub operation: String,
    /// What the host returned, or what was missing.
    pub detail: String,
}

impl ApiError {
    pub fn new(operation: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            detail: detail.into(),
        }
    }

    /// The host returned no result at all.
    pub fn no_result(operation: impl Into<String>) -> Self {
        Self::new(operation, "no result returned")
    }

    /// The host reported the call as unsuccessful.
    pub fn rejected(operation: impl Into<String>) -> Self {
        Self::new(operation, "call reported failure")
    }
}

/// Result type for host calls.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_names_operation() {
        let err = ApiError::no_result("import timeline");
        let msg = err.to_string();
        assert!(msg.contains("import timeline"));
        assert!(msg.contains("no result"));
    }
}
