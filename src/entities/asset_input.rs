//! Procedural asset component record.
//!
//! The component already lives in the procedural engine: its node id is
//! adopted by the wrapper at creation and never released by it.

use std::sync::Arc;

use super::component_input::SceneComponentSnapshot;
use super::context::{InputContext, Probe};
use super::snapshot::{InputSnapshot, SnapshotRecord};

#[derive(Clone, Debug)]
pub struct ProceduralAssetSnapshot {
    pub scene: SceneComponentSnapshot,
    /// Asset output fed downstream. Only the first output is supported;
    /// -1 until the first update.
    pub asset_output_index: i32,
}

impl Default for ProceduralAssetSnapshot {
    fn default() -> Self {
        Self {
            scene: SceneComponentSnapshot::default(),
            asset_output_index: -1,
        }
    }
}

impl SnapshotRecord for ProceduralAssetSnapshot {
    fn update(&mut self, probe: &Probe<'_>) {
        self.scene.capture(probe);
        self.asset_output_index = 0;
    }

    fn has_actor_transform_changed(&self, probe: &Probe<'_>) -> bool {
        self.scene.actor_transform_changed(probe)
    }

    fn has_component_transform_changed(&self, probe: &Probe<'_>) -> bool {
        self.scene.component_transform_changed(probe)
    }

    fn duplicate(&self, _ctx: &Arc<InputContext>, _owner: &str) -> InputSnapshot {
        self.clone().into()
    }
}
