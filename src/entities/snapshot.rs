//! Per-kind snapshot records.
//!
//! [`SnapshotRecord`] is the diff protocol every variant payload implements;
//! [`InputSnapshot`] is the closed set of payloads, dispatched through
//! `enum_dispatch`. Records only ever see a resolved source (a [`Probe`]);
//! absent sources are handled by the owning [`InputObject`].

use enum_dispatch::enum_dispatch;
use std::sync::Arc;

use super::actor_input::{ActorSnapshot, LandscapeSnapshot};
use super::asset_input::ProceduralAssetSnapshot;
use super::brush_input::BrushSnapshot;
use super::camera_input::CameraSnapshot;
use super::component_input::{InstancedMeshSnapshot, MeshComponentSnapshot, SceneComponentSnapshot};
use super::context::{InputContext, Probe};
use super::input_object::InputObject;
use super::mesh_input::{SkeletalMeshSnapshot, StaticMeshSnapshot};
use super::object_type::InputObjectKind;
use super::spline_input::{ProceduralSplineSnapshot, SplineSnapshot};

/// Cached state of one source plus the queries diffing it against the host.
///
/// Queries are read-only. Every query defaults to "no drift" so a variant
/// only overrides what it actually tracks.
#[enum_dispatch]
pub trait SnapshotRecord {
    /// Re-capture from the live source.
    fn update(&mut self, probe: &Probe<'_>);

    /// Source no longer resolves during an update.
    fn source_lost(&mut self) {}

    fn has_actor_transform_changed(&self, _probe: &Probe<'_>) -> bool {
        false
    }

    fn has_component_transform_changed(&self, _probe: &Probe<'_>) -> bool {
        false
    }

    fn has_component_changed(&self, _probe: &Probe<'_>) -> bool {
        false
    }

    fn has_content_changed(&self, _probe: &Probe<'_>) -> bool {
        false
    }

    fn has_instances_changed(&self, _probe: &Probe<'_>) -> bool {
        false
    }

    /// Child wrappers owned by this record.
    fn children(&self) -> &[InputObject] {
        &[]
    }

    fn children_mut(&mut self) -> &mut [InputObject] {
        &mut []
    }

    /// Deep copy. Child wrappers are duplicated into `owner` with fresh
    /// identities and no node handles.
    fn duplicate(&self, ctx: &Arc<InputContext>, owner: &str) -> InputSnapshot;
}

#[enum_dispatch(SnapshotRecord)]
#[derive(Debug)]
pub enum InputSnapshot {
    Object(ObjectSnapshot),
    StaticMesh(StaticMeshSnapshot),
    SkeletalMesh(SkeletalMeshSnapshot),
    SceneComponent(SceneComponentSnapshot),
    MeshComponent(MeshComponentSnapshot),
    InstancedMeshComponent(InstancedMeshSnapshot),
    SplineComponent(SplineSnapshot),
    ProceduralSplineComponent(ProceduralSplineSnapshot),
    ProceduralAssetComponent(ProceduralAssetSnapshot),
    Actor(ActorSnapshot),
    Landscape(LandscapeSnapshot),
    Brush(BrushSnapshot),
    CameraComponent(CameraSnapshot),
}

impl InputSnapshot {
    /// Blank record for `kind`, `None` for `Invalid`.
    pub fn empty_for(kind: InputObjectKind) -> Option<Self> {
        use InputObjectKind as K;
        let snapshot: InputSnapshot = match kind {
            K::Invalid => return None,
            K::Object => ObjectSnapshot.into(),
            K::StaticMesh => StaticMeshSnapshot::default().into(),
            K::SkeletalMesh => SkeletalMeshSnapshot.into(),
            K::SceneComponent => SceneComponentSnapshot::default().into(),
            K::MeshComponent => MeshComponentSnapshot::default().into(),
            K::InstancedMeshComponent => InstancedMeshSnapshot::default().into(),
            K::SplineComponent => SplineSnapshot::default().into(),
            K::ProceduralSplineComponent => ProceduralSplineSnapshot::default().into(),
            K::ProceduralAssetComponent => ProceduralAssetSnapshot::default().into(),
            K::Actor => ActorSnapshot::default().into(),
            K::Landscape => LandscapeSnapshot::default().into(),
            K::Brush => BrushSnapshot::default().into(),
            K::CameraComponent => CameraSnapshot::default().into(),
        };
        Some(snapshot)
    }

    /// Kind this record belongs to.
    pub fn kind(&self) -> InputObjectKind {
        use InputObjectKind as K;
        match self {
            Self::Object(_) => K::Object,
            Self::StaticMesh(_) => K::StaticMesh,
            Self::SkeletalMesh(_) => K::SkeletalMesh,
            Self::SceneComponent(_) => K::SceneComponent,
            Self::MeshComponent(_) => K::MeshComponent,
            Self::InstancedMeshComponent(_) => K::InstancedMeshComponent,
            Self::SplineComponent(_) => K::SplineComponent,
            Self::ProceduralSplineComponent(_) => K::ProceduralSplineComponent,
            Self::ProceduralAssetComponent(_) => K::ProceduralAssetComponent,
            Self::Actor(_) => K::Actor,
            Self::Landscape(_) => K::Landscape,
            Self::Brush(_) => K::Brush,
            Self::CameraComponent(_) => K::CameraComponent,
        }
    }

    pub fn as_brush(&self) -> Option<&BrushSnapshot> {
        match self {
            Self::Brush(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_brush_mut(&mut self) -> Option<&mut BrushSnapshot> {
        match self {
            Self::Brush(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_static_mesh_mut(&mut self) -> Option<&mut StaticMeshSnapshot> {
        match self {
            Self::StaticMesh(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_spline(&self) -> Option<&SplineSnapshot> {
        match self {
            Self::SplineComponent(s) => Some(s),
            _ => None,
        }
    }
}

/// Generic object: only the source reference is tracked.
#[derive(Clone, Copy, Debug, Default)]
pub struct ObjectSnapshot;

impl SnapshotRecord for ObjectSnapshot {
    fn update(&mut self, _probe: &Probe<'_>) {}

    fn duplicate(&self, _ctx: &Arc<InputContext>, _owner: &str) -> InputSnapshot {
        (*self).into()
    }
}
