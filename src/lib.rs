//! Houdini inputs - change detection for host objects fed to a procedural engine
//!
//! Wraps host scene objects (meshes, components, actors, brushes, cameras)
//! as input objects that cache a snapshot, answer drift queries against the
//! live scene and queue their engine nodes for deletion exactly once.

// Runtime services (deletion queue, in-memory host)
pub mod core;

pub mod config;
pub mod entities;

pub use config::{init_logging, SyncSettings};
pub use self::core::memory_scene::{MemoryObject, MemoryScene};
pub use self::core::pending_delete::PendingDeleteQueue;
pub use entities::{
    classify, InputContext, InputObject, InputObjectKind, InputSnapshot, NodeId, NodeReleaser, ObjectId,
    ObjectType, SceneHost, SnapshotRecord,
};
