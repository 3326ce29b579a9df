//! Abstract traits for dependency inversion.
//!
//! Input objects reach the host scene and the procedural engine only through
//! these interfaces. Implementations live in the host integration;
//! [`MemoryScene`](crate::core::memory_scene::MemoryScene) and
//! [`PendingDeleteQueue`](crate::core::pending_delete::PendingDeleteQueue)
//! are the in-process ones.

use std::sync::Arc;

use super::brush_input::{BrushPoly, BrushType};
use super::camera_input::CameraParams;
use super::object_type::ObjectType;
use super::source::{ObjectId, WorldId};
use super::spline_input::{CurveMethod, CurveType};
use super::transform::{Aabb, Bounds, Transform};

/// Procedural engine node handle. Non-negative when assigned.
pub type NodeId = i32;

/// Handle value meaning "no node".
pub const INVALID_NODE_ID: NodeId = -1;

/// Deferred node deletion sink.
///
/// Deletion is never performed inline: handles are queued here and the
/// engine session drains them at a sync point of its own choosing.
pub trait NodeReleaser: Send + Sync {
    /// Queue `node_id` for deletion. Never called with a negative id.
    fn mark_node_id_as_pending_delete(&self, node_id: NodeId);
}

impl<T: NodeReleaser + ?Sized> NodeReleaser for Arc<T> {
    fn mark_node_id_as_pending_delete(&self, node_id: NodeId) {
        (**self).mark_node_id_as_pending_delete(node_id)
    }
}

/// Read access to the live host scene.
///
/// Every lookup is synchronous and may fail for objects that were unloaded
/// or destroyed. Transforms are world space unless stated otherwise.
pub trait SceneHost: Send + Sync {
    /// Runtime type, `None` if the object cannot be resolved.
    fn object_type(&self, id: ObjectId) -> Option<ObjectType>;

    /// Object is being destroyed but still resolvable.
    fn is_pending_kill(&self, id: ObjectId) -> bool;

    fn object_name(&self, id: ObjectId) -> Option<String>;

    /// Actor owning a scene component.
    fn owner_actor(&self, component: ObjectId) -> Option<ObjectId>;

    fn actor_transform(&self, actor: ObjectId) -> Option<Transform>;

    fn component_transform(&self, component: ObjectId) -> Option<Transform>;

    /// All scene components of an actor, following the attachment tree.
    fn scene_components(&self, actor: ObjectId) -> Vec<ObjectId>;

    /// Mesh asset assigned to a mesh component.
    fn static_mesh(&self, component: ObjectId) -> Option<ObjectId>;

    /// Material per slot of a mesh component.
    fn materials(&self, component: ObjectId) -> Vec<Option<ObjectId>>;

    /// Static meshes referenced by a blueprint asset.
    fn blueprint_static_meshes(&self, blueprint: ObjectId) -> Vec<ObjectId>;

    fn instance_count(&self, component: ObjectId) -> usize;

    fn instance_transform(&self, component: ObjectId, index: usize) -> Option<Transform>;

    fn spline_point_count(&self, spline: ObjectId) -> usize;

    /// Control point transform in the spline's local space.
    fn spline_point_transform(&self, spline: ObjectId, index: usize) -> Option<Transform>;

    fn spline_length(&self, spline: ObjectId) -> f32;

    fn spline_is_closed_loop(&self, spline: ObjectId) -> bool;

    /// Curve type and method of a procedural curve component.
    fn curve_settings(&self, component: ObjectId) -> Option<(CurveType, CurveMethod)>;

    /// Node id of the asset hosted by a procedural asset component.
    fn asset_node_id(&self, component: ObjectId) -> Option<NodeId>;

    fn camera_params(&self, camera: ObjectId) -> Option<CameraParams>;

    fn brush_type(&self, brush: ObjectId) -> Option<BrushType>;

    /// Static brushes take part in level CSG; volumes do not.
    fn is_static_brush(&self, brush: ObjectId) -> bool {
        self.object_type(brush)
            .is_some_and(|ty| ty.is_a(ObjectType::Brush) && !ty.is_a(ObjectType::Volume))
    }

    /// Actor bounds (origin + extent), colliding components only.
    fn actor_bounds(&self, actor: ObjectId) -> Option<Bounds>;

    /// Box around every component of the actor.
    fn components_bounding_box(&self, actor: ObjectId) -> Option<Aabb> {
        self.actor_bounds(actor).map(|b| b.to_box())
    }

    /// Brush polygons in model storage order. `None` without a valid model.
    fn brush_polys(&self, brush: ObjectId) -> Option<Vec<BrushPoly>>;

    fn world_of(&self, actor: ObjectId) -> Option<WorldId>;

    /// Actors of `class` overlapping any of `bounds`, in level order.
    fn find_actors_in_bounds(&self, world: WorldId, class: ObjectType, bounds: &[Aabb]) -> Vec<ObjectId>;
}
