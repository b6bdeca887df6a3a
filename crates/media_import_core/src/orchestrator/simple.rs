//! Direct import of file-backed clips.

use std::path::Path;

use tracing::debug;

use crate::host::{ClipHandle, EditorHost, MediaPool};

use super::errors::ImportResult;

/// Import one file into the pool's current folder.
pub fn import_simple_clip<H: EditorHost + ?Sized>(
    pool: &mut MediaPool<'_, H>,
    path: &Path,
) -> ImportResult<ClipHandle> {
    let items = pool.import_files(&[path.to_path_buf()])?;
    // A single path yields a single item.
    let clip = items[0];
    debug!(clip = %clip, path = %path.display(), "Imported media file");
    Ok(clip)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{EditorOp, MemoryEditor};
    use crate::orchestrator::ErrorKind;
    use tempfile::tempdir;

    #[test]
    fn lands_in_current_folder() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("a.mov");
        std::fs::write(&file, b"media").unwrap();

        let mut editor = MemoryEditor::new();
        let shots = editor.create_folder(editor.root(), "Shots").unwrap();
        editor.select_folder(shots);

        let clip = {
            let mut pool = MediaPool::open(&mut editor).unwrap();
            import_simple_clip(&mut pool, &file).unwrap()
        };
        assert_eq!(editor.clips_in(shots), vec![clip]);
        assert_eq!(editor.clip(clip).unwrap().source.as_deref(), Some(file.as_path()));
    }

    #[test]
    fn host_refusal_is_api_error() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("a.wav");
        std::fs::write(&file, b"media").unwrap();

        let mut editor = MemoryEditor::new();
        editor.fail_on(EditorOp::ImportMedia);

        let mut pool = MediaPool::open(&mut editor).unwrap();
        let err = import_simple_clip(&mut pool, &file).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Api);
    }
}
