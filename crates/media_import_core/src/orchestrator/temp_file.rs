//! Scoped temporary timeline file.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::errors::{ImportError, ImportResult};

/// A uniquely named XML file that is removed when dropped.
#[derive(Debug)]
pub struct TempTimelineFile {
    path: PathBuf,
}

impl TempTimelineFile {
    /// Write `contents` to `<dir>/<uuid>.xml`.
    ///
    /// A relative `dir` is resolved against the working directory, since
    /// the host needs an absolute path to import from.
    pub fn write(dir: &Path, contents: &str) -> ImportResult<Self> {
        let dir = if dir.is_absolute() {
            dir.to_path_buf()
        } else {
            std::env::current_dir()
                .map_err(|e| ImportError::io("resolve working directory", e))?
                .join(dir)
        };
        fs::create_dir_all(&dir).map_err(|e| {
            ImportError::io(format!("create temp directory '{}'", dir.display()), e)
        })?;

        let path = dir.join(format!("{}.xml", uuid::Uuid::new_v4()));
        let mut file = fs::File::create(&path).map_err(|e| {
            ImportError::io(format!("create temp file '{}'", path.display()), e)
        })?;
        // From here on Drop owns the cleanup.
        let guard = Self { path };
        file.write_all(contents.as_bytes())
            .and_then(|_| file.sync_all())
            .map_err(|e| {
                ImportError::io(format!("write temp file '{}'", guard.path.display()), e)
            })?;

        debug!(path = %guard.path.display(), "Wrote temporary timeline file");
        Ok(guard)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempTimelineFile {
    fn drop(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "Removed temporary timeline file"),
            Err(e) => warn!(
                path = %self.path.display(),
                "Failed to remove temporary timeline file: {}", e
            ),
        }
    }
}
