//! Metadata and marker population for freshly imported clips.

use tracing::debug;

use crate::descriptor::{ClipDescriptor, MarkerDescriptor};
use crate::host::{ClipHandle, EditorHost, MarkerSpec, MediaPool};

use super::errors::ImportResult;
use super::types::ImportContext;

/// Metadata field receiving the synthesized description.
pub const DESCRIPTION_FIELD: &str = "Description";
/// Metadata field receiving the descriptor's notes.
pub const COMMENTS_FIELD: &str = "Comments";
/// Metadata field holding the comma-separated keyword list.
pub const KEYWORDS_FIELD: &str = "Keywords";

/// Write markers, name, description, notes and keywords onto `clip`.
///
/// Stops at the first failure. The caller owns rollback of the clip.
pub fn populate_clip<H: EditorHost + ?Sized>(
    pool: &mut MediaPool<'_, H>,
    ctx: &ImportContext,
    clip: ClipHandle,
    descriptor: &ClipDescriptor<'_>,
) -> ImportResult<()> {
    add_markers(pool, ctx, clip, &descriptor.markers()?)?;

    if let Some(name) = descriptor.name()? {
        pool.set_clip_name(clip, name)?;
    }

    if let Some(id) = descriptor.asset_id()? {
        pool.set_metadata(clip, DESCRIPTION_FIELD, &ctx.describe_asset(&id))?;
    }

    if let Some(notes) = descriptor.notes()? {
        pool.set_metadata(clip, COMMENTS_FIELD, notes)?;
    }

    set_keywords(pool, clip, &[])?;

    debug!(clip = %clip, "Populated clip metadata");
    Ok(())
}

fn add_markers<H: EditorHost + ?Sized>(
    pool: &mut MediaPool<'_, H>,
    ctx: &ImportContext,
    clip: ClipHandle,
    markers: &[MarkerDescriptor],
) -> ImportResult<()> {
    if markers.is_empty() {
        return Ok(());
    }

    let start = pool.clip_start_frame(clip)?;
    for marker in markers {
        let spec = MarkerSpec {
            frame: marker.pool_frame(start)?,
            colour: &ctx.marker_colour,
            name: &marker.name,
            note: &marker.description,
            duration: marker.duration()?,
        };
        pool.add_marker(clip, &spec)?;
    }
    debug!(clip = %clip, count = markers.len(), "Added markers");
    Ok(())
}

/// Replace the clip's keywords. An empty list clears them.
pub fn set_keywords<H: EditorHost + ?Sized>(
    pool: &mut MediaPool<'_, H>,
    clip: ClipHandle,
    keywords: &[&str],
) -> ImportResult<()> {
    pool.set_metadata(clip, KEYWORDS_FIELD, &keywords.join(","))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::parse_descriptor;
    use crate::host::{EditorOp, MemoryEditor};
    use crate::orchestrator::ErrorKind;
    use serde_json::{json, Value};
    use std::path::Path;
    use tempfile::tempdir;

    fn imported_clip(editor: &mut MemoryEditor, file: &Path) -> ClipHandle {
        std::fs::write(file, b"media").unwrap();
        let mut pool = MediaPool::open(editor).unwrap();
        pool.import_files(&[file.to_path_buf()]).unwrap()[0]
    }

    fn populate(editor: &mut MemoryEditor, clip: ClipHandle, value: &Value) -> ImportResult<()> {
        let descriptor = parse_descriptor(value).unwrap();
        let mut pool = MediaPool::open(editor).unwrap();
        populate_clip(&mut pool, &ImportContext::default(), clip, &descriptor)
    }

    #[test]
    fn writes_every_field() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("a.mov");
        let mut editor = MemoryEditor::new();
        let clip = imported_clip(&mut editor, &file);

        let value = json!({
            "type": "clip",
            "media": {"filePath": file.to_str().unwrap()},
            "name": "Interview",
            "ID": "A-17",
            "notes": "good take",
            "markers": [
                {"name": "m1", "description": "first", "in": {"frm": 5}},
                {"name": "m2", "description": "second", "in": {"frm": 25}, "out": {"frm": 35}}
            ]
        });
        populate(&mut editor, clip, &value).unwrap();

        let record = editor.clip(clip).unwrap();
        assert_eq!(record.name(), "Interview");
        assert_eq!(record.metadata(DESCRIPTION_FIELD), Some("CatDV Asset ID: A-17"));
        assert_eq!(record.metadata(COMMENTS_FIELD), Some("good take"));
        assert_eq!(record.metadata(KEYWORDS_FIELD), Some(""));

        assert_eq!(record.markers.len(), 2);
        assert_eq!((record.markers[0].frame, record.markers[0].duration), (5, 1));
        assert_eq!((record.markers[1].frame, record.markers[1].duration), (25, 10));
        assert_eq!(record.markers[0].colour, "Blue");
        assert_eq!(record.markers[1].note, "second");
    }

    #[test]
    fn marker_frames_are_relative_to_clip_start() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("a.mov");
        let mut editor = MemoryEditor::new();
        editor.set_media_start_frame(100);
        let clip = imported_clip(&mut editor, &file);

        let value = json!({
            "type": "clip",
            "media": {"filePath": file.to_str().unwrap()},
            "markers": [{"name": "m", "description": "", "in": {"frm": 130}}]
        });
        populate(&mut editor, clip, &value).unwrap();

        assert_eq!(editor.clip(clip).unwrap().markers[0].frame, 30);
    }

    #[test]
    fn absent_fields_are_skipped() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("a.mov");
        let mut editor = MemoryEditor::new();
        let clip = imported_clip(&mut editor, &file);

        let value = json!({
            "type": "clip",
            "media": {"filePath": file.to_str().unwrap()},
            "notes": null
        });
        populate(&mut editor, clip, &value).unwrap();

        let record = editor.clip(clip).unwrap();
        assert_eq!(record.name(), "a.mov");
        assert_eq!(record.metadata(DESCRIPTION_FIELD), None);
        assert_eq!(record.metadata(COMMENTS_FIELD), None);
        assert_eq!(record.metadata(KEYWORDS_FIELD), Some(""));
        // No markers, so the start frame is never read.
        assert_eq!(editor.call_count(EditorOp::ClipProperty), 0);
    }

    #[test]
    fn malformed_present_field_fails() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("a.mov");
        let mut editor = MemoryEditor::new();
        let clip = imported_clip(&mut editor, &file);

        let value = json!({
            "type": "clip",
            "media": {"filePath": file.to_str().unwrap()},
            "ID": {"id": 1}
        });
        let err = populate(&mut editor, clip, &value).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn rejected_marker_is_api_error() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("a.mov");
        let mut editor = MemoryEditor::new();
        let clip = imported_clip(&mut editor, &file);

        // Second marker lands on the same frame.
        let value = json!({
            "type": "clip",
            "media": {"filePath": file.to_str().unwrap()},
            "markers": [
                {"name": "a", "description": "", "in": {"frm": 3}},
                {"name": "b", "description": "", "in": {"frm": 3}}
            ]
        });
        let err = populate(&mut editor, clip, &value).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Api);
    }

    #[test]
    fn unreadable_start_frame_is_api_error() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("a.mov");
        let mut editor = MemoryEditor::new();
        let clip = imported_clip(&mut editor, &file);
        editor.fail_on(EditorOp::ClipProperty);

        let value = json!({
            "type": "clip",
            "media": {"filePath": file.to_str().unwrap()},
            "markers": [{"name": "a", "description": "", "in": {"frm": 3}}]
        });
        let err = populate(&mut editor, clip, &value).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Api);
    }
}
