//! Typed wrapper over the host's media pool.
//!
//! Every call goes straight to the host and every `None`/`false` comes
//! back as an [`ApiError`]. No raw sentinel leaves this module.

use std::path::{Path, PathBuf};

use tracing::debug;

use super::api::{EditorHost, MarkerSpec, TrackType};
use super::errors::{ApiError, ApiResult};
use super::handles::{ClipHandle, FolderHandle, PoolHandle, TimelineHandle, TimelineItemHandle};

/// Clip property holding the display name.
pub const CLIP_NAME_PROPERTY: &str = "Clip Name";
/// Clip property holding the first frame of the clip.
pub const CLIP_START_PROPERTY: &str = "Start";

/// The current project's media pool, borrowed from the host for the
/// duration of one batch.
pub struct MediaPool<'h, H: EditorHost + ?Sized> {
    host: &'h mut H,
    pool: PoolHandle,
}

impl<'h, H: EditorHost + ?Sized> MediaPool<'h, H> {
    /// Open the media pool of the host's current project.
    pub fn open(host: &'h mut H) -> ApiResult<Self> {
        let pool = host
            .current_media_pool()
            .ok_or_else(|| ApiError::new("get media pool", "no project is open"))?;
        Ok(Self { host, pool })
    }

    /// Import files into the current folder.
    ///
    /// Fails if the host returns nothing or an empty list.
    pub fn import_files(&mut self, paths: &[PathBuf]) -> ApiResult<Vec<ClipHandle>> {
        let items = self
            .host
            .import_media(self.pool, paths)
            .ok_or_else(|| ApiError::no_result("import media"))?;
        if items.is_empty() {
            return Err(ApiError::new("import media", "no pool items were created"));
        }
        debug!(count = items.len(), "New media pool items: {:?}", items);
        Ok(items)
    }

    /// Import a timeline description file as a new timeline.
    pub fn import_timeline(&mut self, path: &Path) -> ApiResult<TimelineHandle> {
        debug!(path = %path.display(), "Importing timeline file");
        self.host
            .import_timeline_from_file(self.pool, path)
            .ok_or_else(|| {
                ApiError::new(
                    "import timeline",
                    format!("no timeline created from path '{}'", path.display()),
                )
            })
    }

    pub fn delete_clips(&mut self, clips: &[ClipHandle]) -> ApiResult<()> {
        check(self.host.delete_clips(self.pool, clips), "delete clips")
    }

    pub fn delete_timelines(&mut self, timelines: &[TimelineHandle]) -> ApiResult<()> {
        check(self.host.delete_timelines(self.pool, timelines), "delete timelines")
    }

    pub fn move_clips(&mut self, clips: &[ClipHandle], target: FolderHandle) -> ApiResult<()> {
        check(self.host.move_clips(self.pool, clips, target), "move clips")
    }

    pub fn current_folder(&self) -> ApiResult<FolderHandle> {
        self.host
            .current_folder(self.pool)
            .ok_or_else(|| ApiError::no_result("get current folder"))
    }

    pub fn set_current_folder(&mut self, folder: FolderHandle) -> ApiResult<()> {
        check(
            self.host.set_current_folder(self.pool, folder),
            "set current folder",
        )
    }

    pub fn root_folder(&self) -> ApiResult<FolderHandle> {
        self.host
            .root_folder(self.pool)
            .ok_or_else(|| ApiError::no_result("get root folder"))
    }

    pub fn add_subfolder(&mut self, parent: FolderHandle, name: &str) -> ApiResult<FolderHandle> {
        self.host
            .add_subfolder(self.pool, parent, name)
            .ok_or_else(|| ApiError::new("add subfolder", format!("could not create '{}'", name)))
    }

    pub fn folder_name(&self, folder: FolderHandle) -> ApiResult<String> {
        self.host
            .folder_name(folder)
            .ok_or_else(|| ApiError::no_result("get folder name"))
    }

    /// Find a direct subfolder of `parent` by exact name.
    pub fn subfolder_by_name(
        &self,
        parent: FolderHandle,
        name: &str,
    ) -> ApiResult<Option<FolderHandle>> {
        let subfolders = self
            .host
            .subfolders(parent)
            .ok_or_else(|| ApiError::no_result("get subfolder list"))?;

        for folder in subfolders {
            if self.folder_name(folder)? == name {
                return Ok(Some(folder));
            }
        }
        Ok(None)
    }

    pub fn set_clip_name(&mut self, clip: ClipHandle, name: &str) -> ApiResult<()> {
        check(
            self.host.set_clip_property(clip, CLIP_NAME_PROPERTY, name),
            "set clip name",
        )
    }

    /// First frame of the clip, read from its "Start" property.
    pub fn clip_start_frame(&self, clip: ClipHandle) -> ApiResult<i64> {
        let raw = self
            .host
            .clip_property(clip, CLIP_START_PROPERTY)
            .ok_or_else(|| ApiError::no_result("get clip start frame"))?;
        raw.trim().parse().map_err(|_| {
            ApiError::new(
                "get clip start frame",
                format!("'{}' is not a frame number", raw),
            )
        })
    }

    pub fn set_metadata(&mut self, clip: ClipHandle, field: &str, value: &str) -> ApiResult<()> {
        if self.host.set_metadata(clip, field, value) {
            Ok(())
        } else {
            Err(ApiError::new(
                "set metadata",
                format!("field '{}' was not written", field),
            ))
        }
    }

    pub fn add_marker(&mut self, clip: ClipHandle, marker: &MarkerSpec<'_>) -> ApiResult<()> {
        if self.host.add_marker(clip, marker) {
            Ok(())
        } else {
            Err(ApiError::new(
                "add marker",
                format!(
                    "marker '{}' at frame {} (duration {}) was rejected",
                    marker.name, marker.frame, marker.duration
                ),
            ))
        }
    }

    pub fn track_count(&self, timeline: TimelineHandle, track: TrackType) -> ApiResult<u32> {
        self.host
            .track_count(timeline, track)
            .ok_or_else(|| ApiError::new("get track count", format!("{} tracks", track)))
    }

    pub fn timeline_items(
        &self,
        timeline: TimelineHandle,
        track: TrackType,
        index: u32,
    ) -> ApiResult<Vec<TimelineItemHandle>> {
        self.host
            .timeline_items(timeline, track, index)
            .ok_or_else(|| ApiError::new("get track items", format!("{} track {}", track, index)))
    }

    /// Every item on every track, video first, tracks in index order.
    pub fn all_timeline_items(&self, timeline: TimelineHandle) -> ApiResult<Vec<TimelineItemHandle>> {
        let mut items = Vec::new();
        for track in TrackType::ALL {
            for index in 1..=self.track_count(timeline, track)? {
                items.extend(self.timeline_items(timeline, track, index)?);
            }
        }
        Ok(items)
    }

    /// Ask the host to collapse `items` into a compound clip.
    ///
    /// `None` is passed through: callers decide how lenient to be.
    pub fn create_compound_clip(
        &mut self,
        timeline: TimelineHandle,
        items: &[TimelineItemHandle],
    ) -> Option<TimelineItemHandle> {
        self.host.create_compound_clip(timeline, items)
    }

    /// Pool item backing a timeline item.
    pub fn backing_clip(&self, item: TimelineItemHandle) -> ApiResult<ClipHandle> {
        self.host
            .media_pool_item(item)
            .ok_or_else(|| ApiError::no_result("get media pool item"))
    }
}

fn check(success: bool, operation: &str) -> ApiResult<()> {
    if success {
        Ok(())
    } else {
        Err(ApiError::rejected(operation))
    }
}
