//! Compound clip import through a staging timeline.
//!
//! ```text
//! Start
//!   → TempFileWritten     XML written to <temp_dir>/<uuid>.xml
//!   → TimelineImported    current folder saved, staging bin entered, file imported
//!   → CompoundConverted   every track item collapsed into one clip
//!   → TimelineDeleted
//!   → ClipMoved           clip moved back to the saved folder
//!   → FolderRestored
//!   → Done
//! ```
//!
//! The temp file is gone once the timeline import returns. The saved
//! folder is restored on every path after it was recorded. A clip that
//! exists when a later step fails is deleted again.

use std::fmt;

use tracing::{debug, warn};

use crate::descriptor::check_timeline_xml;
use crate::host::{
    ApiError, ClipHandle, EditorHost, FolderHandle, MediaPool, TimelineHandle, TrackType,
};

use super::bins::{enter_staging_bin, restore_folder, save_current_folder};
use super::errors::ImportResult;
use super::rollback::{discard_clip, discard_timeline};
use super::temp_file::TempTimelineFile;
use super::types::ImportContext;

/// Progress through the compound import protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CompoundStage {
    Start,
    TempFileWritten,
    TimelineImported,
    CompoundConverted,
    TimelineDeleted,
    ClipMoved,
    FolderRestored,
    Done,
}

impl fmt::Display for CompoundStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Start => "start",
            Self::TempFileWritten => "temp-file-written",
            Self::TimelineImported => "timeline-imported",
            Self::CompoundConverted => "compound-converted",
            Self::TimelineDeleted => "timeline-deleted",
            Self::ClipMoved => "clip-moved",
            Self::FolderRestored => "folder-restored",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

struct StageTracker {
    stage: CompoundStage,
}

impl StageTracker {
    fn new() -> Self {
        debug!(stage = %CompoundStage::Start, "Compound import stage");
        Self {
            stage: CompoundStage::Start,
        }
    }

    fn advance(&mut self, next: CompoundStage) {
        self.stage = next;
        debug!(stage = %next, "Compound import stage");
    }
}

/// Import embedded timeline XML as a single compound clip.
///
/// The clip ends up in the folder that was current when the call began.
pub fn import_compound_clip<H: EditorHost + ?Sized>(
    pool: &mut MediaPool<'_, H>,
    ctx: &ImportContext,
    xml: &str,
) -> ImportResult<ClipHandle> {
    let mut tracker = StageTracker::new();

    if ctx.validate_timeline_xml {
        let root = check_timeline_xml(xml)?;
        debug!(root = %root, "Embedded timeline XML is well-formed");
    }

    let temp = TempTimelineFile::write(&ctx.temp_dir, xml)?;
    tracker.advance(CompoundStage::TempFileWritten);

    let saved = save_current_folder(pool)?;
    let staged = stage_clip(pool, ctx, temp, saved.folder(), &mut tracker);
    let restored = restore_folder(pool, saved);

    match (staged, restored) {
        (Ok(clip), Ok(())) => {
            tracker.advance(CompoundStage::FolderRestored);
            tracker.advance(CompoundStage::Done);
            Ok(clip)
        }
        (Ok(clip), Err(e)) => {
            debug!(stage = %tracker.stage, "Compound import failed: {}", e);
            discard_clip(pool, clip);
            Err(e.into())
        }
        (Err(e), restored) => {
            if let Err(restore_err) = restored {
                warn!(
                    folder = %saved.folder(),
                    "Could not restore current folder: {}", restore_err
                );
            }
            debug!(stage = %tracker.stage, "Compound import failed: {}", e);
            Err(e)
        }
    }
}

/// Steps run with the staging bin as current folder.
fn stage_clip<H: EditorHost + ?Sized>(
    pool: &mut MediaPool<'_, H>,
    ctx: &ImportContext,
    temp: TempTimelineFile,
    target: FolderHandle,
    tracker: &mut StageTracker,
) -> ImportResult<ClipHandle> {
    let bin = enter_staging_bin(pool, &ctx.staging_bin_name)?;
    debug!(bin = %bin, "Entered staging bin");

    let timeline = pool.import_timeline(temp.path());
    drop(temp);
    let timeline = timeline?;
    tracker.advance(CompoundStage::TimelineImported);

    let clip = match convert_to_compound(pool, timeline) {
        Ok(clip) => clip,
        Err(e) => {
            discard_timeline(pool, timeline);
            return Err(e.into());
        }
    };
    tracker.advance(CompoundStage::CompoundConverted);

    if let Err(e) = pool.delete_timelines(&[timeline]) {
        warn!(
            timeline = %timeline,
            "Intermediate timeline left in the staging bin: {}", e
        );
        discard_clip(pool, clip);
        return Err(e.into());
    }
    tracker.advance(CompoundStage::TimelineDeleted);

    if let Err(e) = pool.move_clips(&[clip], target) {
        discard_clip(pool, clip);
        return Err(e.into());
    }
    tracker.advance(CompoundStage::ClipMoved);

    Ok(clip)
}

/// Collapse every item of the timeline into one compound clip.
///
/// When the host returns nothing the first item of video track 1 is
/// taken as the result.
fn convert_to_compound<H: EditorHost + ?Sized>(
    pool: &mut MediaPool<'_, H>,
    timeline: TimelineHandle,
) -> Result<ClipHandle, ApiError> {
    let items = pool.all_timeline_items(timeline)?;
    debug!(timeline = %timeline, count = items.len(), "Collapsing timeline items");

    let item = match pool.create_compound_clip(timeline, &items) {
        Some(item) => item,
        None => {
            debug!("No compound clip returned, falling back to first video item");
            pool.timeline_items(timeline, TrackType::Video, 1)?
                .first()
                .copied()
                .ok_or_else(|| {
                    ApiError::new("create compound clip", "timeline has no video items")
                })?
        }
    };
    pool.backing_clip(item)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{EditorOp, MemoryEditor};
    use crate::orchestrator::{ErrorKind, ImportError};
    use std::path::Path;
    use tempfile::{tempdir, TempDir};

    const CUT_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE xmeml>
<xmeml version="5">
  <sequence>
    <name>Cut</name>
    <media><video><track>
      <clipitem id="a"><name>Shot A</name></clipitem>
      <clipitem id="b"><name>Shot B</name></clipitem>
    </track></video></media>
  </sequence>
</xmeml>"#;

    const BIN: &str = "CatDV Compound Sources";

    struct Fixture {
        _dir: TempDir,
        ctx: ImportContext,
        editor: MemoryEditor,
        target: FolderHandle,
    }

    fn fixture() -> Fixture {
        let dir = tempdir().unwrap();
        let ctx = ImportContext::new(dir.path().join("temp"));
        let mut editor = MemoryEditor::new();
        let target = editor.create_folder(editor.root(), "Edits").unwrap();
        editor.select_folder(target);
        Fixture {
            _dir: dir,
            ctx,
            editor,
            target,
        }
    }

    fn run(fx: &mut Fixture, xml: &str) -> ImportResult<ClipHandle> {
        let mut pool = MediaPool::open(&mut fx.editor).unwrap();
        import_compound_clip(&mut pool, &fx.ctx, xml)
    }

    fn temp_files(dir: &Path) -> usize {
        std::fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
    }

    fn staging_bin(editor: &MemoryEditor) -> FolderHandle {
        let bins = editor.folders_named(editor.root(), BIN);
        assert_eq!(bins.len(), 1);
        bins[0]
    }

    #[test]
    fn compound_clip_lands_in_original_folder() {
        let mut fx = fixture();
        let clip = run(&mut fx, CUT_XML).unwrap();

        let record = fx.editor.clip(clip).unwrap();
        assert!(record.compound);
        assert_eq!(record.folder, fx.target);
        assert_eq!(fx.editor.current(), fx.target);
        assert_eq!(fx.editor.timeline_count(), 0);
        assert_eq!(temp_files(&fx.ctx.temp_dir), 0);

        // Source clips stay behind in the staging bin.
        let bin = staging_bin(&fx.editor);
        assert_eq!(fx.editor.clips_in(bin).len(), 2);
    }

    #[test]
    fn repeated_imports_share_one_bin() {
        let mut fx = fixture();
        let first = run(&mut fx, CUT_XML).unwrap();
        let second = run(&mut fx, CUT_XML).unwrap();

        assert_ne!(first, second);
        staging_bin(&fx.editor);
        assert_eq!(fx.editor.clips_in(fx.target), vec![first, second]);
    }

    #[test]
    fn falls_back_to_first_video_item() {
        let mut fx = fixture();
        fx.editor.fail_on(EditorOp::CreateCompoundClip);

        let clip = run(&mut fx, CUT_XML).unwrap();
        let record = fx.editor.clip(clip).unwrap();
        assert!(!record.compound);
        assert_eq!(record.name(), "Shot A");
        assert_eq!(record.folder, fx.target);
    }

    #[test]
    fn empty_timeline_is_api_error_and_timeline_removed() {
        let mut fx = fixture();
        let err = run(&mut fx, "<xmeml version=\"5\"><sequence/></xmeml>").unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Api);
        assert_eq!(fx.editor.timeline_count(), 0);
        assert_eq!(fx.editor.current(), fx.target);
        assert_eq!(temp_files(&fx.ctx.temp_dir), 0);
    }

    #[test]
    fn timeline_import_failure_restores_folder() {
        let mut fx = fixture();
        fx.editor.fail_on(EditorOp::ImportTimeline);

        let err = run(&mut fx, CUT_XML).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Api);
        assert_eq!(fx.editor.current(), fx.target);
        assert_eq!(temp_files(&fx.ctx.temp_dir), 0);
        assert_eq!(fx.editor.clip_count(), 0);
    }

    #[test]
    fn staging_bin_failure_restores_folder() {
        let mut fx = fixture();
        fx.editor.fail_on(EditorOp::AddSubfolder);

        let err = run(&mut fx, CUT_XML).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Api);
        assert_eq!(fx.editor.current(), fx.target);
        assert_eq!(fx.editor.call_count(EditorOp::SetCurrentFolder), 1);
        assert_eq!(temp_files(&fx.ctx.temp_dir), 0);
    }

    #[test]
    fn timeline_delete_failure_discards_clip() {
        let mut fx = fixture();
        fx.editor.fail_on(EditorOp::DeleteTimelines);

        let err = run(&mut fx, CUT_XML).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Api);

        let bin = staging_bin(&fx.editor);
        assert_eq!(fx.editor.timelines_in(bin), 1);
        assert!(fx.editor.clips_in(fx.target).is_empty());
        assert_eq!(fx.editor.current(), fx.target);
    }

    #[test]
    fn move_failure_discards_clip() {
        let mut fx = fixture();
        fx.editor.fail_on(EditorOp::MoveClips);

        let err = run(&mut fx, CUT_XML).unwrap_err();
        assert!(matches!(err, ImportError::Api(ref api) if api.operation == "move clips"));

        let bin = staging_bin(&fx.editor);
        assert!(fx.editor.clips_in(bin).iter().all(|c| !fx.editor.clip(*c).unwrap().compound));
        assert_eq!(fx.editor.timeline_count(), 0);
        assert_eq!(fx.editor.current(), fx.target);
    }

    #[test]
    fn restore_failure_discards_clip() {
        let mut fx = fixture();
        fx.editor.fail_after(EditorOp::SetCurrentFolder, 1);

        let err = run(&mut fx, CUT_XML).unwrap_err();
        assert!(matches!(err, ImportError::Api(ref api) if api.operation == "set current folder"));
        assert!(fx.editor.clips_in(fx.target).is_empty());
    }

    #[test]
    fn malformed_xml_never_reaches_host() {
        let mut fx = fixture();
        let err = run(&mut fx, "<xmeml><sequence></xmeml>").unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(fx.editor.call_count(EditorOp::ImportTimeline), 0);
        assert_eq!(fx.editor.call_count(EditorOp::CurrentFolder), 0);
        assert_eq!(temp_files(&fx.ctx.temp_dir), 0);
    }

    #[test]
    fn unchecked_xml_is_left_to_host() {
        let mut fx = fixture();
        fx.ctx.validate_timeline_xml = false;

        let err = run(&mut fx, "<xmeml><sequence></xmeml>").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Api);
        assert_eq!(fx.editor.call_count(EditorOp::ImportTimeline), 1);
        assert_eq!(temp_files(&fx.ctx.temp_dir), 0);
    }

    #[test]
    fn stages_are_ordered() {
        assert!(CompoundStage::Start < CompoundStage::TempFileWritten);
        assert!(CompoundStage::FolderRestored < CompoundStage::Done);
        assert_eq!(CompoundStage::ClipMoved.to_string(), "clip-moved");
    }
}
