//! In-memory editor.
//!
//! Implements [`EditorHost`] without a real editor behind it. The CLI
//! uses it for dry runs of payload files and the tests use it as the
//! fake pool. Any operation can be made to fail with
//! [`MemoryEditor::fail_on`] or [`MemoryEditor::fail_after`].

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use super::api::{EditorHost, MarkerSpec, TrackType};
use super::handles::{
    ClipHandle, FolderHandle, HostId, PoolHandle, TimelineHandle, TimelineItemHandle,
};
use super::pool::{CLIP_NAME_PROPERTY, CLIP_START_PROPERTY};

/// Element names that become timeline items when a timeline file is imported.
const CLIP_ELEMENTS: [&str; 4] = ["clipitem", "asset-clip", "clip", "ref-clip"];

/// Host operations, used for failure injection and call counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditorOp {
    OpenPool,
    ImportMedia,
    ImportTimeline,
    DeleteClips,
    DeleteTimelines,
    MoveClips,
    CurrentFolder,
    SetCurrentFolder,
    RootFolder,
    AddSubfolder,
    FolderName,
    Subfolders,
    ClipName,
    ClipProperty,
    SetClipProperty,
    SetMetadata,
    AddMarker,
    TrackCount,
    TimelineItems,
    CreateCompoundClip,
    MediaPoolItem,
}

/// A marker stored on a clip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerRecord {
    pub frame: i64,
    pub colour: String,
    pub name: String,
    pub note: String,
    pub duration: i64,
}

/// State of one pool item.
#[derive(Debug, Clone)]
pub struct ClipRecord {
    /// Folder currently holding the clip.
    pub folder: FolderHandle,
    pub properties: BTreeMap<String, String>,
    pub metadata: BTreeMap<String, String>,
    pub markers: Vec<MarkerRecord>,
    /// File the clip was imported from, if any.
    pub source: Option<PathBuf>,
    /// Whether the clip was created by collapsing a timeline.
    pub compound: bool,
}

impl ClipRecord {
    pub fn name(&self) -> &str {
        self.properties
            .get(CLIP_NAME_PROPERTY)
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub fn metadata(&self, field: &str) -> Option<&str> {
        self.metadata.get(field).map(String::as_str)
    }
}

#[derive(Debug, Clone)]
struct FolderRecord {
    name: String,
    children: Vec<FolderHandle>,
}

#[derive(Debug, Clone)]
struct TimelineRecord {
    folder: FolderHandle,
    tracks: BTreeMap<TrackType, Vec<Vec<TimelineItemHandle>>>,
}

/// An editor whose whole media pool lives in memory.
#[derive(Debug)]
pub struct MemoryEditor {
    next_id: u64,
    project_open: bool,
    pool: PoolHandle,
    root: FolderHandle,
    current: FolderHandle,
    folders: BTreeMap<FolderHandle, FolderRecord>,
    clips: BTreeMap<ClipHandle, ClipRecord>,
    timelines: BTreeMap<TimelineHandle, TimelineRecord>,
    items: BTreeMap<TimelineItemHandle, Option<ClipHandle>>,
    media_start_frame: i64,
    compound_count: usize,
    /// Remaining successful calls per operation before it starts failing.
    failures: RefCell<HashMap<EditorOp, usize>>,
    calls: RefCell<Vec<EditorOp>>,
}

impl MemoryEditor {
    /// Create an editor with an open project and an empty pool.
    pub fn new() -> Self {
        let pool = PoolHandle::new(HostId::new(1));
        let root = FolderHandle::new(HostId::new(2));

        let mut folders = BTreeMap::new();
        folders.insert(
            root,
            FolderRecord {
                name: "Master".to_string(),
                children: Vec::new(),
            },
        );

        Self {
            next_id: 3,
            project_open: true,
            pool,
            root,
            current: root,
            folders,
            clips: BTreeMap::new(),
            timelines: BTreeMap::new(),
            items: BTreeMap::new(),
            media_start_frame: 0,
            compound_count: 0,
            failures: RefCell::new(HashMap::new()),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Make every call of `op` fail.
    pub fn fail_on(&mut self, op: EditorOp) {
        self.failures.get_mut().insert(op, 0);
    }

    /// Let `successes` calls of `op` through, then fail the rest.
    pub fn fail_after(&mut self, op: EditorOp, successes: usize) {
        self.failures.get_mut().insert(op, successes);
    }

    /// Stop injecting failures for `op`.
    pub fn clear_failure(&mut self, op: EditorOp) {
        self.failures.get_mut().remove(&op);
    }

    pub fn set_project_open(&mut self, open: bool) {
        self.project_open = open;
    }

    /// Start frame given to clips created by media import.
    pub fn set_media_start_frame(&mut self, frame: i64) {
        self.media_start_frame = frame;
    }

    /// Overwrite a clip property without going through the host API.
    pub fn set_clip_property_raw(&mut self, clip: ClipHandle, key: &str, value: &str) {
        if let Some(record) = self.clips.get_mut(&clip) {
            record.properties.insert(key.to_string(), value.to_string());
        }
    }

    /// Number of times `op` has been called.
    pub fn call_count(&self, op: EditorOp) -> usize {
        self.calls.borrow().iter().filter(|&&c| c == op).count()
    }

    pub fn root(&self) -> FolderHandle {
        self.root
    }

    /// The current folder, read without touching failure injection.
    pub fn current(&self) -> FolderHandle {
        self.current
    }

    /// Create a folder directly, bypassing the host API.
    pub fn create_folder(&mut self, parent: FolderHandle, name: &str) -> Option<FolderHandle> {
        self.new_folder(parent, name)
    }

    /// Point the current folder somewhere, bypassing the host API.
    pub fn select_folder(&mut self, folder: FolderHandle) {
        if self.folders.contains_key(&folder) {
            self.current = folder;
        }
    }

    /// Every direct subfolder of `parent` named `name`.
    pub fn folders_named(&self, parent: FolderHandle, name: &str) -> Vec<FolderHandle> {
        self.folders
            .get(&parent)
            .map(|record| {
                record
                    .children
                    .iter()
                    .copied()
                    .filter(|child| self.folders.get(child).is_some_and(|f| f.name == name))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Clips held by `folder`, in creation order.
    pub fn clips_in(&self, folder: FolderHandle) -> Vec<ClipHandle> {
        self.clips
            .iter()
            .filter(|(_, record)| record.folder == folder)
            .map(|(&clip, _)| clip)
            .collect()
    }

    /// Number of timelines held by `folder`.
    pub fn timelines_in(&self, folder: FolderHandle) -> usize {
        self.timelines
            .values()
            .filter(|record| record.folder == folder)
            .count()
    }

    pub fn clip(&self, clip: ClipHandle) -> Option<&ClipRecord> {
        self.clips.get(&clip)
    }

    pub fn contains_clip(&self, clip: ClipHandle) -> bool {
        self.clips.contains_key(&clip)
    }

    pub fn clip_count(&self) -> usize {
        self.clips.len()
    }

    pub fn timeline_count(&self) -> usize {
        self.timelines.len()
    }

    fn attempt(&self, op: EditorOp) -> bool {
        self.calls.borrow_mut().push(op);
        let mut failures = self.failures.borrow_mut();
        let allowed = match failures.get_mut(&op) {
            Some(0) => false,
            Some(remaining) => {
                *remaining -= 1;
                true
            }
            None => true,
        };
        allowed && self.project_open
    }

    fn next_host_id(&mut self) -> HostId {
        let id = HostId::new(self.next_id);
        self.next_id += 1;
        id
    }

    fn new_folder(&mut self, parent: FolderHandle, name: &str) -> Option<FolderHandle> {
        if !self.folders.contains_key(&parent) {
            return None;
        }
        let folder = FolderHandle::new(self.next_host_id());
        self.folders.insert(
            folder,
            FolderRecord {
                name: name.to_string(),
                children: Vec::new(),
            },
        );
        if let Some(record) = self.folders.get_mut(&parent) {
            record.children.push(folder);
        }
        Some(folder)
    }

    fn new_clip(&mut self, name: &str, start: i64, source: Option<PathBuf>) -> ClipHandle {
        let clip = ClipHandle::new(self.next_host_id());
        let mut properties = BTreeMap::new();
        properties.insert(CLIP_NAME_PROPERTY.to_string(), name.to_string());
        properties.insert(CLIP_START_PROPERTY.to_string(), start.to_string());
        self.clips.insert(
            clip,
            ClipRecord {
                folder: self.current,
                properties,
                metadata: BTreeMap::new(),
                markers: Vec::new(),
                source,
                compound: false,
            },
        );
        clip
    }

    fn new_item(&mut self, clip: ClipHandle) -> TimelineItemHandle {
        let item = TimelineItemHandle::new(self.next_host_id());
        self.items.insert(item, Some(clip));
        item
    }

    /// Names of the clip elements found in a timeline document.
    fn clip_names_in(xml: &str) -> Option<Vec<String>> {
        let options = roxmltree::ParsingOptions {
            allow_dtd: true,
            ..Default::default()
        };
        let doc = roxmltree::Document::parse_with_options(xml, options).ok()?;

        let names = doc
            .descendants()
            .filter(|n| n.is_element() && CLIP_ELEMENTS.contains(&n.tag_name().name()))
            .enumerate()
            .map(|(i, node)| {
                node.attribute("name")
                    .map(str::to_string)
                    .or_else(|| {
                        node.children()
                            .find(|c| c.is_element() && c.tag_name().name() == "name")
                            .and_then(|c| c.text())
                            .map(|t| t.trim().to_string())
                    })
                    .unwrap_or_else(|| format!("Clip {}", i + 1))
            })
            .collect();
        Some(names)
    }
}

impl Default for MemoryEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorHost for MemoryEditor {
    fn current_media_pool(&mut self) -> Option<PoolHandle> {
        self.attempt(EditorOp::OpenPool).then_some(self.pool)
    }

    fn import_media(&mut self, pool: PoolHandle, paths: &[PathBuf]) -> Option<Vec<ClipHandle>> {
        if pool != self.pool || !self.attempt(EditorOp::ImportMedia) {
            return None;
        }

        let start = self.media_start_frame;
        let mut created = Vec::new();
        for path in paths.iter().filter(|p| p.is_file()) {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            created.push(self.new_clip(&name, start, Some(path.clone())));
        }
        Some(created)
    }

    fn import_timeline_from_file(
        &mut self,
        pool: PoolHandle,
        path: &Path,
    ) -> Option<TimelineHandle> {
        if pool != self.pool || !self.attempt(EditorOp::ImportTimeline) {
            return None;
        }

        let xml = fs::read_to_string(path).ok()?;
        let names = Self::clip_names_in(&xml)?;

        let mut video = Vec::with_capacity(names.len());
        for name in &names {
            let clip = self.new_clip(name, 0, None);
            video.push(self.new_item(clip));
        }

        let mut tracks = BTreeMap::new();
        tracks.insert(TrackType::Video, vec![video]);
        tracks.insert(TrackType::Audio, vec![Vec::new()]);

        let timeline = TimelineHandle::new(self.next_host_id());
        self.timelines.insert(
            timeline,
            TimelineRecord {
                folder: self.current,
                tracks,
            },
        );
        Some(timeline)
    }

    fn delete_clips(&mut self, pool: PoolHandle, clips: &[ClipHandle]) -> bool {
        if pool != self.pool || !self.attempt(EditorOp::DeleteClips) {
            return false;
        }
        if !clips.iter().all(|clip| self.clips.contains_key(clip)) {
            return false;
        }
        for clip in clips {
            self.clips.remove(clip);
        }
        true
    }

    fn delete_timelines(&mut self, pool: PoolHandle, timelines: &[TimelineHandle]) -> bool {
        if pool != self.pool || !self.attempt(EditorOp::DeleteTimelines) {
            return false;
        }
        if !timelines.iter().all(|t| self.timelines.contains_key(t)) {
            return false;
        }
        for timeline in timelines {
            self.timelines.remove(timeline);
        }
        true
    }

    fn move_clips(&mut self, pool: PoolHandle, clips: &[ClipHandle], target: FolderHandle) -> bool {
        if pool != self.pool || !self.attempt(EditorOp::MoveClips) {
            return false;
        }
        if !self.folders.contains_key(&target)
            || !clips.iter().all(|clip| self.clips.contains_key(clip))
        {
            return false;
        }
        for clip in clips {
            if let Some(record) = self.clips.get_mut(clip) {
                record.folder = target;
            }
        }
        true
    }

    fn current_folder(&self, pool: PoolHandle) -> Option<FolderHandle> {
        (pool == self.pool && self.attempt(EditorOp::CurrentFolder)).then_some(self.current)
    }

    fn set_current_folder(&mut self, pool: PoolHandle, folder: FolderHandle) -> bool {
        if pool != self.pool
            || !self.attempt(EditorOp::SetCurrentFolder)
            || !self.folders.contains_key(&folder)
        {
            return false;
        }
        self.current = folder;
        true
    }

    fn root_folder(&self, pool: PoolHandle) -> Option<FolderHandle> {
        (pool == self.pool && self.attempt(EditorOp::RootFolder)).then_some(self.root)
    }

    fn add_subfolder(
        &mut self,
        pool: PoolHandle,
        parent: FolderHandle,
        name: &str,
    ) -> Option<FolderHandle> {
        if pool != self.pool || !self.attempt(EditorOp::AddSubfolder) {
            return None;
        }
        self.new_folder(parent, name)
    }

    fn folder_name(&self, folder: FolderHandle) -> Option<String> {
        if !self.attempt(EditorOp::FolderName) {
            return None;
        }
        self.folders.get(&folder).map(|record| record.name.clone())
    }

    fn subfolders(&self, folder: FolderHandle) -> Option<Vec<FolderHandle>> {
        if !self.attempt(EditorOp::Subfolders) {
            return None;
        }
        self.folders.get(&folder).map(|record| record.children.clone())
    }

    fn clip_name(&self, clip: ClipHandle) -> Option<String> {
        if !self.attempt(EditorOp::ClipName) {
            return None;
        }
        self.clips.get(&clip).map(|record| record.name().to_string())
    }

    fn clip_property(&self, clip: ClipHandle, key: &str) -> Option<String> {
        if !self.attempt(EditorOp::ClipProperty) {
            return None;
        }
        self.clips.get(&clip)?.properties.get(key).cloned()
    }

    fn set_clip_property(&mut self, clip: ClipHandle, key: &str, value: &str) -> bool {
        if !self.attempt(EditorOp::SetClipProperty) {
            return false;
        }
        match self.clips.get_mut(&clip) {
            Some(record) => {
                record.properties.insert(key.to_string(), value.to_string());
                true
            }
            None => false,
        }
    }

    fn set_metadata(&mut self, clip: ClipHandle, field: &str, value: &str) -> bool {
        if !self.attempt(EditorOp::SetMetadata) {
            return false;
        }
        match self.clips.get_mut(&clip) {
            Some(record) => {
                record.metadata.insert(field.to_string(), value.to_string());
                true
            }
            None => false,
        }
    }

    fn add_marker(&mut self, clip: ClipHandle, marker: &MarkerSpec<'_>) -> bool {
        if !self.attempt(EditorOp::AddMarker) || marker.frame < 0 || marker.duration < 1 {
            return false;
        }
        let Some(record) = self.clips.get_mut(&clip) else {
            return false;
        };
        // One marker per frame.
        if record.markers.iter().any(|m| m.frame == marker.frame) {
            return false;
        }
        record.markers.push(MarkerRecord {
            frame: marker.frame,
            colour: marker.colour.to_string(),
            name: marker.name.to_string(),
            note: marker.note.to_string(),
            duration: marker.duration,
        });
        true
    }

    fn track_count(&self, timeline: TimelineHandle, track: TrackType) -> Option<u32> {
        if !self.attempt(EditorOp::TrackCount) {
            return None;
        }
        let record = self.timelines.get(&timeline)?;
        Some(record.tracks.get(&track).map_or(0, |t| t.len() as u32))
    }

    fn timeline_items(
        &self,
        timeline: TimelineHandle,
        track: TrackType,
        index: u32,
    ) -> Option<Vec<TimelineItemHandle>> {
        if !self.attempt(EditorOp::TimelineItems) || index == 0 {
            return None;
        }
        let record = self.timelines.get(&timeline)?;
        record
            .tracks
            .get(&track)?
            .get(index as usize - 1)
            .cloned()
    }

    fn create_compound_clip(
        &mut self,
        timeline: TimelineHandle,
        items: &[TimelineItemHandle],
    ) -> Option<TimelineItemHandle> {
        if !self.attempt(EditorOp::CreateCompoundClip) || items.is_empty() {
            return None;
        }
        let on_timeline = self.timelines.get(&timeline).is_some_and(|record| {
            items
                .iter()
                .all(|item| record.tracks.values().flatten().flatten().any(|i| i == item))
        });
        if !on_timeline {
            return None;
        }

        self.compound_count += 1;
        let name = format!("Compound Clip {}", self.compound_count);
        let clip = self.new_clip(&name, 0, None);
        if let Some(record) = self.clips.get_mut(&clip) {
            record.compound = true;
        }
        let compound_item = self.new_item(clip);

        if let Some(record) = self.timelines.get_mut(&timeline) {
            for track in record.tracks.values_mut().flatten() {
                track.retain(|item| !items.contains(item));
            }
            if let Some(first) = record
                .tracks
                .get_mut(&TrackType::Video)
                .and_then(|t| t.first_mut())
            {
                first.insert(0, compound_item);
            }
        }
        Some(compound_item)
    }

    fn media_pool_item(&self, item: TimelineItemHandle) -> Option<ClipHandle> {
        if !self.attempt(EditorOp::MediaPoolItem) {
            return None;
        }
        self.items
            .get(&item)
            .copied()
            .flatten()
            .filter(|clip| self.clips.contains_key(clip))
    }
}
