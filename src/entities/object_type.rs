//! Host runtime types and the classifier mapping them to input kinds.
//!
//! [`ObjectType`] mirrors the slice of the host class hierarchy that matters
//! for inputs. [`classify`] walks it with ordered is-a checks, subtype before
//! supertype, so an instanced mesh component never lands in the plain mesh
//! component bucket and a landscape or brush never lands in the actor one.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::keys::*;
use super::source::ObjectId;
use super::traits::SceneHost;

/// Runtime class of a host object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectType {
    Object,
    StaticMesh,
    SkeletalMesh,
    /// Reusable asset wrapper (blueprint) holding static meshes.
    Blueprint,
    SceneComponent,
    StaticMeshComponent,
    InstancedStaticMeshComponent,
    HierarchicalInstancedStaticMeshComponent,
    SplineComponent,
    /// Curve component owned by the procedural engine plugin.
    ProceduralSplineComponent,
    /// Component hosting a procedural asset node.
    ProceduralAssetComponent,
    CameraComponent,
    Actor,
    LandscapeProxy,
    Landscape,
    Brush,
    /// Brush-derived volume; never a static brush.
    Volume,
}

impl ObjectType {
    /// Direct superclass, `None` for the root.
    pub fn parent(self) -> Option<ObjectType> {
        use ObjectType::*;
        match self {
            Object => None,
            StaticMesh | SkeletalMesh | Blueprint | SceneComponent | Actor => Some(Object),
            StaticMeshComponent => Some(SceneComponent),
            InstancedStaticMeshComponent => Some(StaticMeshComponent),
            HierarchicalInstancedStaticMeshComponent => Some(InstancedStaticMeshComponent),
            SplineComponent | ProceduralSplineComponent | ProceduralAssetComponent | CameraComponent => {
                Some(SceneComponent)
            }
            LandscapeProxy => Some(Actor),
            Landscape => Some(LandscapeProxy),
            Brush => Some(Actor),
            Volume => Some(Brush),
        }
    }

    /// True if `self` is `ancestor` or derives from it.
    pub fn is_a(self, ancestor: ObjectType) -> bool {
        let mut current = Some(self);
        while let Some(ty) = current {
            if ty == ancestor {
                return true;
            }
            current = ty.parent();
        }
        false
    }
}

/// Input wrapper variant. Fixed for the lifetime of a wrapper.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputObjectKind {
    #[default]
    Invalid,
    Object,
    StaticMesh,
    SkeletalMesh,
    SceneComponent,
    MeshComponent,
    InstancedMeshComponent,
    SplineComponent,
    ProceduralSplineComponent,
    ProceduralAssetComponent,
    Actor,
    Landscape,
    Brush,
    CameraComponent,
}

impl InputObjectKind {
    pub fn as_str(self) -> &'static str {
        use InputObjectKind::*;
        match self {
            Invalid => "Invalid",
            Object => "Object",
            StaticMesh => "StaticMesh",
            SkeletalMesh => "SkeletalMesh",
            SceneComponent => "SceneComponent",
            MeshComponent => "MeshComponent",
            InstancedMeshComponent => "InstancedMeshComponent",
            SplineComponent => "SplineComponent",
            ProceduralSplineComponent => "ProceduralSplineComponent",
            ProceduralAssetComponent => "ProceduralAssetComponent",
            Actor => "Actor",
            Landscape => "Landscape",
            Brush => "Brush",
            CameraComponent => "CameraComponent",
        }
    }

    /// Prefix for generated wrapper names.
    pub fn name_prefix(self) -> &'static str {
        use InputObjectKind::*;
        match self {
            Invalid | Object => N_OBJECT,
            StaticMesh => N_STATIC_MESH,
            SkeletalMesh => N_SKELETAL_MESH,
            SceneComponent => N_SCENE_COMPONENT,
            MeshComponent => N_MESH_COMPONENT,
            InstancedMeshComponent => N_INSTANCED_MESH_COMPONENT,
            SplineComponent => N_SPLINE,
            ProceduralSplineComponent => N_PROCEDURAL_SPLINE,
            ProceduralAssetComponent => N_PROCEDURAL_ASSET,
            Actor => N_ACTOR,
            Landscape => N_LANDSCAPE,
            Brush => N_BRUSH,
            CameraComponent => N_CAMERA,
        }
    }

    pub fn is_scene_component(self) -> bool {
        use InputObjectKind::*;
        matches!(
            self,
            SceneComponent
                | MeshComponent
                | InstancedMeshComponent
                | SplineComponent
                | ProceduralSplineComponent
                | ProceduralAssetComponent
                | CameraComponent
        )
    }

    /// Whether a source of runtime type `ty` can feed this variant.
    pub fn accepts(self, ty: ObjectType) -> bool {
        use InputObjectKind as K;
        use ObjectType as T;
        match self {
            K::Invalid => false,
            K::Object => true,
            K::StaticMesh => ty.is_a(T::StaticMesh) || ty.is_a(T::Blueprint),
            K::SkeletalMesh => ty.is_a(T::SkeletalMesh),
            K::SceneComponent => ty.is_a(T::SceneComponent),
            K::MeshComponent => ty.is_a(T::StaticMeshComponent),
            K::InstancedMeshComponent => ty.is_a(T::InstancedStaticMeshComponent),
            K::SplineComponent => ty.is_a(T::SplineComponent),
            K::ProceduralSplineComponent => ty.is_a(T::ProceduralSplineComponent),
            K::ProceduralAssetComponent => ty.is_a(T::ProceduralAssetComponent),
            K::Actor => ty.is_a(T::Actor),
            K::Landscape => ty.is_a(T::LandscapeProxy),
            K::Brush => ty.is_a(T::Brush),
            K::CameraComponent => ty.is_a(T::CameraComponent),
        }
    }
}

impl fmt::Display for InputObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a runtime type to the wrapper variant. `Invalid` only for `None`.
pub fn classify(object_type: Option<ObjectType>) -> InputObjectKind {
    use InputObjectKind as K;
    use ObjectType as T;

    let Some(ty) = object_type else {
        return K::Invalid;
    };

    if ty.is_a(T::SceneComponent) {
        // Instanced derives from the mesh component: test it first
        if ty.is_a(T::InstancedStaticMeshComponent) {
            K::InstancedMeshComponent
        } else if ty.is_a(T::StaticMeshComponent) {
            K::MeshComponent
        } else if ty.is_a(T::SplineComponent) {
            K::SplineComponent
        } else if ty.is_a(T::ProceduralSplineComponent) {
            K::ProceduralSplineComponent
        } else if ty.is_a(T::ProceduralAssetComponent) {
            K::ProceduralAssetComponent
        } else if ty.is_a(T::CameraComponent) {
            K::CameraComponent
        } else {
            K::SceneComponent
        }
    } else if ty.is_a(T::Actor) {
        if ty.is_a(T::LandscapeProxy) {
            K::Landscape
        } else if ty.is_a(T::Brush) {
            K::Brush
        } else {
            K::Actor
        }
    } else if ty.is_a(T::Blueprint) || ty.is_a(T::StaticMesh) {
        K::StaticMesh
    } else if ty.is_a(T::SkeletalMesh) {
        K::SkeletalMesh
    } else {
        K::Object
    }
}

/// Resolve `source` in the host and classify it.
pub fn classify_object(host: &dyn SceneHost, source: Option<ObjectId>) -> InputObjectKind {
    classify(source.and_then(|id| host.object_type(id)))
}
