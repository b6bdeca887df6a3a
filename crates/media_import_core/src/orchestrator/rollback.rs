//! Best-effort removal of pool objects after a failed step.
//!
//! These never fail: the caller already holds the error worth reporting.

use tracing::{debug, warn};

use crate::host::{ClipHandle, EditorHost, MediaPool, TimelineHandle};

/// Delete a clip that must not outlive a failed import.
pub fn discard_clip<H: EditorHost + ?Sized>(pool: &mut MediaPool<'_, H>, clip: ClipHandle) {
    match pool.delete_clips(&[clip]) {
        Ok(()) => debug!(clip = %clip, "Rolled back clip"),
        Err(e) => warn!(clip = %clip, "Rollback left clip in the media pool: {}", e),
    }
}

/// Delete an intermediate timeline.
pub fn discard_timeline<H: EditorHost + ?Sized>(
    pool: &mut MediaPool<'_, H>,
    timeline: TimelineHandle,
) {
    match pool.delete_timelines(&[timeline]) {
        Ok(()) => debug!(timeline = %timeline, "Removed intermediate timeline"),
        Err(e) => warn!(
            timeline = %timeline,
            "Intermediate timeline left in the staging bin: {}", e
        ),
    }
}
