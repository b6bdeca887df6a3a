//! Boundary between an inbound JSON request and the batch importer.
//!
//! [`ImportBridge::import_json_clips`] takes the raw request text and
//! always answers with a [`BridgeResponse`]; no error escapes to the
//! caller. Only the unexpected-failure message carries technical detail.

use std::error::Error as StdError;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info};

use crate::host::EditorHost;
use crate::orchestrator::{BatchError, BatchImporter, BatchOutcome, BatchResult, ErrorKind};

pub const SUCCESS_MESSAGE: &str = "Successfully added item(s) to media pool.";
pub const INVALID_JSON_MESSAGE: &str = "Invalid JSON Provided.";
pub const PARTIAL_FAILURE_HEADER: &str =
    "Some items may have been imported successfully, however:";

/// Answer to one import request, serialized as `{"message": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeResponse {
    pub message: String,
}

impl BridgeResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Owns the host and answers import requests against it.
pub struct ImportBridge<H: EditorHost> {
    host: H,
    importer: BatchImporter,
}

impl<H: EditorHost> ImportBridge<H> {
    pub fn new(host: H, importer: BatchImporter) -> Self {
        Self { host, importer }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_inner(self) -> H {
        self.host
    }

    /// Decode `json` and import it, keeping the per-item outcomes.
    pub fn run(&mut self, json: &str) -> BatchResult<BatchOutcome> {
        let payload: Value = serde_json::from_str(json)
            .map_err(|e| BatchError::malformed(format!("payload is not JSON: {}", e)))?;
        self.importer.import_batch(&mut self.host, &payload)
    }

    /// Handle one request end to end.
    pub fn import_json_clips(&mut self, json: &str) -> BridgeResponse {
        let result = self.run(json);
        summarize(&result)
    }
}

/// Reduce a batch result to the message shown to the user.
///
/// Partial failures are reported once per distinct kind, not per item.
pub fn summarize(result: &BatchResult<BatchOutcome>) -> BridgeResponse {
    let message = match result {
        Err(BatchError::MalformedInput(detail)) => {
            error!("Rejected payload: {}", detail);
            INVALID_JSON_MESSAGE.to_string()
        }
        Err(e) => {
            let message = format!("{}\n{}", ErrorKind::Unexpected.summary(), error_chain(e));
            error!("{}", message);
            message
        }
        Ok(outcome) => {
            let kinds = outcome.error_kinds();
            if kinds.is_empty() {
                info!(count = outcome.len(), "{}", SUCCESS_MESSAGE);
                SUCCESS_MESSAGE.to_string()
            } else {
                let lines: Vec<&str> = kinds.iter().map(ErrorKind::summary).collect();
                let message = format!("{}\n{}", PARTIAL_FAILURE_HEADER, lines.join("\n"));
                error!("{}", message);
                message
            }
        }
    };
    BridgeResponse::new(message)
}

/// An error followed by each of its sources, one per line.
fn error_chain(err: &dyn StdError) -> String {
    let mut lines = vec![err.to_string()];
    let mut source = err.source();
    while let Some(cause) = source {
        lines.push(format!("Caused by: {}", cause));
        source = cause.source();
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{EditorOp, MemoryEditor};
    use crate::orchestrator::ImportContext;
    use tempfile::tempdir;

    fn bridge(temp: &std::path::Path) -> ImportBridge<MemoryEditor> {
        ImportBridge::new(
            MemoryEditor::new(),
            BatchImporter::new(ImportContext::new(temp.join("temp"))),
        )
    }

    #[test]
    fn unparseable_json_is_invalid() {
        let dir = tempdir().unwrap();
        let mut bridge = bridge(dir.path());

        let response = bridge.import_json_clips("[{not json");
        assert_eq!(response.message, INVALID_JSON_MESSAGE);
        assert_eq!(bridge.host().call_count(EditorOp::OpenPool), 0);
    }

    #[test]
    fn bare_string_is_invalid() {
        let dir = tempdir().unwrap();
        let mut bridge = bridge(dir.path());
        assert_eq!(
            bridge.import_json_clips("\"notalist\"").message,
            INVALID_JSON_MESSAGE
        );
    }

    #[test]
    fn full_success() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("a.mov");
        std::fs::write(&file, b"media").unwrap();
        let mut bridge = bridge(dir.path());

        let payload = serde_json::json!([{"type": "clip", "media": {"filePath": file}}]);
        let response = bridge.import_json_clips(&payload.to_string());
        assert_eq!(response.message, SUCCESS_MESSAGE);
        assert_eq!(bridge.into_inner().clip_count(), 1);
    }

    #[test]
    fn one_line_per_distinct_kind() {
        let dir = tempdir().unwrap();
        let mut bridge = bridge(dir.path());

        let response = bridge.import_json_clips(
            r#"[{"type": "widget"}, {"type": "gadget"}, {"type": "clip", "media": {"filePath": "/missing"}}]"#,
        );
        let lines: Vec<&str> = response.message.lines().collect();
        assert_eq!(
            lines,
            vec![
                PARTIAL_FAILURE_HEADER,
                ErrorKind::AssetNotFound.summary(),
                ErrorKind::Unsupported.summary(),
            ]
        );
    }

    #[test]
    fn unexpected_failure_carries_detail() {
        let dir = tempdir().unwrap();
        let mut bridge = bridge(dir.path());
        bridge.host_mut().set_project_open(false);

        let response = bridge.import_json_clips("[]");
        assert!(response
            .message
            .starts_with("Encountered unexpected exception.\n"));
        assert!(response.message.contains("get media pool"));
    }

    #[test]
    fn response_serializes_as_message_object() {
        let response = BridgeResponse::new(SUCCESS_MESSAGE);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json, serde_json::json!({"message": SUCCESS_MESSAGE}));
    }
}
