//! Name prefix constants for generated input object names.
//!
//! Names are `<prefix>_<name>`, made unique per owner.
//! Usage: `format!("{}_{}", N_SPLINE, actor_name)`

/// Plain object
pub const N_OBJECT: &str = "InputObject";
/// Static mesh asset (or blueprint)
pub const N_STATIC_MESH: &str = "InputObject_SM";
/// Skeletal mesh asset
pub const N_SKELETAL_MESH: &str = "InputObject_SkelMesh";
/// Generic scene component
pub const N_SCENE_COMPONENT: &str = "InputObject_SceneComp";
/// Static mesh component
pub const N_MESH_COMPONENT: &str = "InputObject_SMC";
/// Instanced static mesh component
pub const N_INSTANCED_MESH_COMPONENT: &str = "InputObject_ISMC";
/// Spline component
pub const N_SPLINE: &str = "InputObject_Spline";
/// Procedural engine curve component
pub const N_PROCEDURAL_SPLINE: &str = "InputObject_HoudiniSpline";
/// Procedural asset component
pub const N_PROCEDURAL_ASSET: &str = "InputObject_HAC";
/// Actor
pub const N_ACTOR: &str = "InputObject_Actor";
/// Landscape proxy
pub const N_LANDSCAPE: &str = "InputObject_Landscape";
/// CSG brush
pub const N_BRUSH: &str = "InputObject_Brush";
/// Camera component
pub const N_CAMERA: &str = "InputObject_Camera";
