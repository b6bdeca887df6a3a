//! Current-folder bookkeeping and the staging bin.
//!
//! The host's current folder is ambient state: imports land wherever it
//! points. Anything that moves it records the old value with
//! [`save_current_folder`] and puts it back with [`restore_folder`].

use tracing::{debug, info};

use crate::host::{ApiResult, EditorHost, FolderHandle, MediaPool};

/// The folder that was current before a mutation began.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SavedFolder(FolderHandle);

impl SavedFolder {
    pub fn folder(&self) -> FolderHandle {
        self.0
    }
}

pub fn save_current_folder<H: EditorHost + ?Sized>(
    pool: &MediaPool<'_, H>,
) -> ApiResult<SavedFolder> {
    let folder = pool.current_folder()?;
    debug!(folder = %folder, "Saved current folder");
    Ok(SavedFolder(folder))
}

pub fn restore_folder<H: EditorHost + ?Sized>(
    pool: &mut MediaPool<'_, H>,
    saved: SavedFolder,
) -> ApiResult<()> {
    pool.set_current_folder(saved.0)?;
    debug!(folder = %saved.0, "Restored current folder");
    Ok(())
}

/// Find the staging bin under the pool root, creating it if absent.
///
/// The lookup runs every time: a bin the user deleted is recreated
/// rather than served from a stale handle.
pub fn find_or_create_staging_bin<H: EditorHost + ?Sized>(
    pool: &mut MediaPool<'_, H>,
    name: &str,
) -> ApiResult<FolderHandle> {
    let root = pool.root_folder()?;
    if let Some(bin) = pool.subfolder_by_name(root, name)? {
        return Ok(bin);
    }

    let bin = pool.add_subfolder(root, name)?;
    info!(bin = %bin, "Created staging bin '{}'", name);
    Ok(bin)
}

/// Make the staging bin the current folder.
pub fn enter_staging_bin<H: EditorHost + ?Sized>(
    pool: &mut MediaPool<'_, H>,
    name: &str,
) -> ApiResult<FolderHandle> {
    let bin = find_or_create_staging_bin(pool, name)?;
    pool.set_current_folder(bin)?;
    Ok(bin)
}
