//! Entities - input objects and the types they snapshot.
//!
//! - [`InputObject`]: wrapper over one host object (identity, handles, flags)
//! - [`InputSnapshot`]: per-kind cached state, dispatched via [`SnapshotRecord`]
//! - [`classify`]: runtime type to [`InputObjectKind`]
//! - [`traits`]: host scene and node deletion interfaces

pub mod actor_input;
pub mod asset_input;
pub mod brush_input;
pub mod camera_input;
pub mod component_input;
pub mod context;
pub mod input_object;
pub mod keys;
pub mod mesh_input;
pub mod node_ids;
pub mod object_type;
pub mod snapshot;
pub mod source;
pub mod spline_input;
pub mod traits;
pub mod transform;

pub use brush_input::{BrushInfo, BrushPoly, BrushType};
pub use camera_input::{CameraParams, ProjectionMode};
pub use context::{InputContext, Probe};
pub use input_object::InputObject;
pub use node_ids::NodeHandles;
pub use object_type::{classify, classify_object, InputObjectKind, ObjectType};
pub use snapshot::{InputSnapshot, SnapshotRecord};
pub use source::{ObjectId, SoftRef, WorldId};
pub use spline_input::{CurveMethod, CurveType};
pub use traits::{NodeId, NodeReleaser, SceneHost, INVALID_NODE_ID};
pub use transform::{Aabb, Bounds, Transform, DEFAULT_TOLERANCE};
