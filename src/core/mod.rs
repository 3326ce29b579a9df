//! Runtime services behind the entity traits.
//!
//! The deferred deletion queue and an in-memory scene host. Both are plain
//! implementations of [`crate::entities::traits`], swappable by embedders.

pub mod memory_scene;
pub mod pending_delete;

pub use memory_scene::{MemoryObject, MemoryScene};
pub use pending_delete::PendingDeleteQueue;
