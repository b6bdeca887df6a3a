//! Batch import over an ordered list of descriptors.

use serde_json::Value;
use tracing::{error, info, warn};

use crate::descriptor::{parse_descriptor, ClipSource};
use crate::host::{ClipHandle, EditorHost, MediaPool};

use super::compound::import_compound_clip;
use super::errors::{BatchError, BatchResult, ErrorKind, ImportResult};
use super::populate::populate_clip;
use super::rollback::discard_clip;
use super::simple::import_simple_clip;
use super::types::{BatchOutcome, ImportContext, ItemOutcome};

/// Imports batches of clip descriptors into a host's media pool.
///
/// Descriptors are handled one at a time, in order. A failed descriptor
/// is recorded and the batch moves on.
#[derive(Debug, Clone, Default)]
pub struct BatchImporter {
    ctx: ImportContext,
}

impl BatchImporter {
    pub fn new(ctx: ImportContext) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &ImportContext {
        &self.ctx
    }

    /// Change the colour used for markers in later batches.
    pub fn set_marker_colour(&mut self, colour: impl Into<String>) {
        self.ctx.marker_colour = colour.into();
    }

    /// Import every descriptor of `payload`, which must be a JSON array.
    ///
    /// The outcome has one entry per array element, in the same order.
    /// Only errors outside the per-item kinds abort the batch.
    pub fn import_batch<H: EditorHost + ?Sized>(
        &self,
        host: &mut H,
        payload: &Value,
    ) -> BatchResult<BatchOutcome> {
        let descriptors = payload.as_array().ok_or_else(|| {
            BatchError::malformed("top-level value must be an array of clip descriptors")
        })?;

        let mut pool =
            MediaPool::open(host).map_err(|e| BatchError::unexpected(None, e.into()))?;

        let mut outcome = BatchOutcome::new();
        info!(count = descriptors.len(), "Importing batch");

        for (index, value) in descriptors.iter().enumerate() {
            match self.import_one(&mut pool, value) {
                Ok(clip) => {
                    info!(index, clip = %clip, "Imported item");
                    outcome.push(ItemOutcome::Imported(clip));
                }
                Err(e) if e.kind() == ErrorKind::Unexpected => {
                    error!(index, "Aborting batch: {}", e);
                    return Err(BatchError::unexpected(Some(index), e));
                }
                Err(e) => {
                    error!(index, kind = %e.kind(), "Item failed: {}", e);
                    outcome.push(ItemOutcome::Failed(e));
                }
            }
        }

        info!(
            succeeded = outcome.succeeded(),
            failed = outcome.failed(),
            "Batch finished"
        );
        Ok(outcome)
    }

    fn import_one<H: EditorHost + ?Sized>(
        &self,
        pool: &mut MediaPool<'_, H>,
        value: &Value,
    ) -> ImportResult<ClipHandle> {
        let descriptor = parse_descriptor(value)?;
        let clip_type = descriptor.clip_type();

        let clip = match descriptor.source() {
            ClipSource::File(path) => import_simple_clip(pool, path)?,
            ClipSource::Timeline(xml) => import_compound_clip(pool, &self.ctx, xml)?,
        };

        if let Err(e) = populate_clip(pool, &self.ctx, clip, &descriptor) {
            warn!(clip = %clip, clip_type = %clip_type, "Population failed, removing clip");
            discard_clip(pool, clip);
            return Err(e);
        }
        Ok(clip)
    }
}
