//! Identity-bearing handles for objects owned by the host editor.
//!
//! Handles never own the object they point at. Two handles are equal
//! exactly when they wrap the same host object, whatever their origin.

use serde::{Deserialize, Serialize};

/// Native identity of an object living inside the host editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HostId(u64);

impl HostId {
    /// Wrap a raw host identity.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw identity value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for HostId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Capability shared by every handle type: exposing the identity of the
/// wrapped host object.
pub trait HostObject {
    fn host_id(&self) -> HostId;
}

macro_rules! host_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(HostId);

        impl $name {
            pub const fn new(id: HostId) -> Self {
                Self(id)
            }
        }

        impl HostObject for $name {
            fn host_id(&self) -> HostId {
                self.0
            }
        }

        impl From<HostId> for $name {
            fn from(id: HostId) -> Self {
                Self(id)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{} {}", stringify!($name), self.0)
            }
        }
    };
}

host_handle!(
    /// A media pool item (master clip, still, audio file or compound clip).
    ClipHandle
);
host_handle!(
    /// An item placed on a timeline track.
    TimelineItemHandle
);
host_handle!(
    /// A timeline living in the media pool.
    TimelineHandle
);
host_handle!(
    /// A folder (bin) inside the media pool.
    FolderHandle
);
host_handle!(
    /// The media pool of the current project.
    PoolHandle
);
