//! Boundary to the host editing application.
//!
//! - [`EditorHost`]: the raw scripting surface, one method per host call
//! - [`MediaPool`]: typed wrapper turning host sentinels into [`ApiError`]s
//! - Handles: identity-bearing references to host objects
//! - [`MemoryEditor`]: an in-memory host for dry runs and tests

mod api;
mod errors;
mod handles;
pub mod memory;
mod pool;

pub use api::{EditorHost, MarkerSpec, TrackType};
pub use errors::{ApiError, ApiResult};
pub use handles::{
    ClipHandle, FolderHandle, HostId, HostObject, PoolHandle, TimelineHandle, TimelineItemHandle,
};
pub use memory::{EditorOp, MemoryEditor};
pub use pool::{MediaPool, CLIP_NAME_PROPERTY, CLIP_START_PROPERTY};
