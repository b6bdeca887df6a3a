//! Collaborator contract for the host editing application.
//!
//! [`EditorHost`] mirrors the scripting surface the importer consumes,
//! one method per host call. Methods report failure exactly the way the
//! host does, with `None` or `false`; turning those sentinels into typed
//! errors is the job of [`MediaPool`](super::MediaPool).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::handles::{ClipHandle, FolderHandle, PoolHandle, TimelineHandle, TimelineItemHandle};

/// Family of a timeline track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackType {
    Video,
    Audio,
    Subtitle,
}

impl TrackType {
    /// Every track family, in the order timelines are walked.
    pub const ALL: [TrackType; 3] = [TrackType::Video, TrackType::Audio, TrackType::Subtitle];

    /// Name used by the host API for this track family.
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackType::Video => "video",
            TrackType::Audio => "audio",
            TrackType::Subtitle => "subtitle",
        }
    }
}

impl std::fmt::Display for TrackType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A marker as passed to the host's add-marker call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerSpec<'a> {
    /// Frame relative to the start of the clip.
    pub frame: i64,
    pub colour: &'a str,
    pub name: &'a str,
    pub note: &'a str,
    /// Length in frames (at least 1).
    pub duration: i64,
}

/// Scripting surface of the host editor.
///
/// The host is stateful and not reentrant: in particular the pool's
/// current folder is global state that every import call reads. Callers
/// must not interleave operations from different imports.
pub trait EditorHost {
    /// Media pool of the current project, if a project is open.
    fn current_media_pool(&mut self) -> Option<PoolHandle>;

    // Media pool

    /// Import files into the current folder. Returns the new pool items.
    fn import_media(&mut self, pool: PoolHandle, paths: &[PathBuf]) -> Option<Vec<ClipHandle>>;

    /// Import a timeline description file into the current folder.
    fn import_timeline_from_file(&mut self, pool: PoolHandle, path: &Path)
        -> Option<TimelineHandle>;

    fn delete_clips(&mut self, pool: PoolHandle, clips: &[ClipHandle]) -> bool;

    fn delete_timelines(&mut self, pool: PoolHandle, timelines: &[TimelineHandle]) -> bool;

    fn move_clips(&mut self, pool: PoolHandle, clips: &[ClipHandle], target: FolderHandle) -> bool;

    fn current_folder(&self, pool: PoolHandle) -> Option<FolderHandle>;

    fn set_current_folder(&mut self, pool: PoolHandle, folder: FolderHandle) -> bool;

    fn root_folder(&self, pool: PoolHandle) -> Option<FolderHandle>;

    fn add_subfolder(
        &mut self,
        pool: PoolHandle,
        parent: FolderHandle,
        name: &str,
    ) -> Option<FolderHandle>;

    // Folders

    fn folder_name(&self, folder: FolderHandle) -> Option<String>;

    fn subfolders(&self, folder: FolderHandle) -> Option<Vec<FolderHandle>>;

    // Clips

    fn clip_name(&self, clip: ClipHandle) -> Option<String>;

    fn clip_property(&self, clip: ClipHandle, key: &str) -> Option<String>;

    fn set_clip_property(&mut self, clip: ClipHandle, key: &str, value: &str) -> bool;

    fn set_metadata(&mut self, clip: ClipHandle, field: &str, value: &str) -> bool;

    fn add_marker(&mut self, clip: ClipHandle, marker: &MarkerSpec<'_>) -> bool;

    // Timelines

    fn track_count(&self, timeline: TimelineHandle, track: TrackType) -> Option<u32>;

    /// Items on one track. Track indices start at 1.
    fn timeline_items(
        &self,
        timeline: TimelineHandle,
        track: TrackType,
        index: u32,
    ) -> Option<Vec<TimelineItemHandle>>;

    /// Collapse the given items into a single compound clip.
    fn create_compound_clip(
        &mut self,
        timeline: TimelineHandle,
        items: &[TimelineItemHandle],
    ) -> Option<TimelineItemHandle>;

    // Timeline items

    /// Pool item backing a timeline item.
    fn media_pool_item(&self, item: TimelineItemHandle) -> Option<ClipHandle>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn track_types_walk_video_first() {
        assert_eq!(
            TrackType::ALL,
            [TrackType::Video, TrackType::Audio, TrackType::Subtitle]
        );
        assert_eq!(TrackType::Subtitle.to_string(), "subtitle");
    }
}
