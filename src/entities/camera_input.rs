//! Camera component record.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::component_input::SceneComponentSnapshot;
use super::context::{InputContext, Probe};
use super::snapshot::{InputSnapshot, SnapshotRecord};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectionMode {
    #[default]
    Perspective,
    Orthographic,
}

/// Projection parameters read from a camera component.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraParams {
    pub projection: ProjectionMode,
    /// Horizontal field of view in degrees.
    pub field_of_view: f32,
    pub aspect_ratio: f32,
    pub ortho_width: f32,
    pub ortho_near_clip: f32,
    pub ortho_far_clip: f32,
}

impl Default for CameraParams {
    fn default() -> Self {
        Self {
            projection: ProjectionMode::Perspective,
            field_of_view: 0.0,
            aspect_ratio: 1.0,
            ortho_width: 2.0,
            ortho_near_clip: 0.0,
            ortho_far_clip: -1.0,
        }
    }
}

impl CameraParams {
    pub fn is_orthographic(&self) -> bool {
        self.projection == ProjectionMode::Orthographic
    }
}

#[derive(Clone, Debug, Default)]
pub struct CameraSnapshot {
    pub scene: SceneComponentSnapshot,
    pub params: CameraParams,
}

impl SnapshotRecord for CameraSnapshot {
    fn update(&mut self, probe: &Probe<'_>) {
        self.scene.capture(probe);
        if probe.is_pending_kill() {
            return;
        }
        if let Some(params) = probe.host().camera_params(probe.id) {
            self.params = params;
        }
    }

    fn has_actor_transform_changed(&self, probe: &Probe<'_>) -> bool {
        self.scene.actor_transform_changed(probe)
    }

    fn has_component_transform_changed(&self, probe: &Probe<'_>) -> bool {
        self.scene.component_transform_changed(probe)
    }

    /// Any projection parameter differs. Exact comparison.
    fn has_component_changed(&self, probe: &Probe<'_>) -> bool {
        if probe.is_pending_kill() {
            return false;
        }
        probe
            .host()
            .camera_params(probe.id)
            .is_some_and(|live| live != self.params)
    }

    fn duplicate(&self, _ctx: &Arc<InputContext>, _owner: &str) -> InputSnapshot {
        self.clone().into()
    }
}
