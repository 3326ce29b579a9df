//! Scene component records: plain scene components, mesh components and
//! instanced mesh components.

use std::sync::Arc;

use super::context::{InputContext, Probe};
use super::snapshot::{InputSnapshot, SnapshotRecord};
use super::source::ObjectId;
use super::transform::Transform;

/// Component world transform plus the owning actor's transform.
#[derive(Clone, Debug, Default)]
pub struct SceneComponentSnapshot {
    pub transform: Transform,
    pub actor_transform: Transform,
}

impl SceneComponentSnapshot {
    pub fn capture(&mut self, probe: &Probe<'_>) {
        let host = probe.host();
        if let Some(t) = host.component_transform(probe.id) {
            self.transform = t;
        }
        if let Some(t) = host.owner_actor(probe.id).and_then(|a| host.actor_transform(a)) {
            self.actor_transform = t;
        }
    }

    pub fn actor_transform_changed(&self, probe: &Probe<'_>) -> bool {
        if probe.is_pending_kill() {
            return false;
        }
        let host = probe.host();
        let Some(actor) = host.owner_actor(probe.id) else {
            return false;
        };
        host.actor_transform(actor)
            .is_some_and(|t| !self.actor_transform.equals(&t, probe.tolerance()))
    }

    pub fn component_transform_changed(&self, probe: &Probe<'_>) -> bool {
        if probe.is_pending_kill() {
            return false;
        }
        probe
            .host()
            .component_transform(probe.id)
            .is_some_and(|t| !self.transform.equals(&t, probe.tolerance()))
    }
}

impl SnapshotRecord for SceneComponentSnapshot {
    fn update(&mut self, probe: &Probe<'_>) {
        self.capture(probe);
    }

    fn has_actor_transform_changed(&self, probe: &Probe<'_>) -> bool {
        self.actor_transform_changed(probe)
    }

    fn has_component_transform_changed(&self, probe: &Probe<'_>) -> bool {
        self.component_transform_changed(probe)
    }

    fn duplicate(&self, _ctx: &Arc<InputContext>, _owner: &str) -> InputSnapshot {
        self.clone().into()
    }
}

/// Static mesh component: assigned mesh and per-slot materials.
#[derive(Clone, Debug, Default)]
pub struct MeshComponentSnapshot {
    pub scene: SceneComponentSnapshot,
    pub static_mesh: Option<ObjectId>,
    pub materials: Vec<Option<ObjectId>>,
}

impl MeshComponentSnapshot {
    fn capture(&mut self, probe: &Probe<'_>) {
        self.scene.capture(probe);
        self.static_mesh = probe.host().static_mesh(probe.id);
        self.materials = probe.host().materials(probe.id);
    }

    fn mesh_changed(&self, probe: &Probe<'_>) -> bool {
        self.static_mesh != probe.host().static_mesh(probe.id)
    }
}

impl SnapshotRecord for MeshComponentSnapshot {
    fn update(&mut self, probe: &Probe<'_>) {
        self.capture(probe);
    }

    fn has_actor_transform_changed(&self, probe: &Probe<'_>) -> bool {
        self.scene.actor_transform_changed(probe)
    }

    fn has_component_transform_changed(&self, probe: &Probe<'_>) -> bool {
        self.scene.component_transform_changed(probe)
    }

    fn has_component_changed(&self, probe: &Probe<'_>) -> bool {
        self.mesh_changed(probe)
    }

    fn duplicate(&self, _ctx: &Arc<InputContext>, _owner: &str) -> InputSnapshot {
        self.clone().into()
    }
}

/// Instanced mesh component: mesh record plus every instance transform.
#[derive(Clone, Debug, Default)]
pub struct InstancedMeshSnapshot {
    pub mesh: MeshComponentSnapshot,
    pub instance_transforms: Vec<Transform>,
}

impl SnapshotRecord for InstancedMeshSnapshot {
    fn update(&mut self, probe: &Probe<'_>) {
        self.mesh.capture(probe);
        let host = probe.host();
        let count = host.instance_count(probe.id);
        self.instance_transforms = (0..count)
            .map(|i| host.instance_transform(probe.id, i).unwrap_or_default())
            .collect();
    }

    fn has_actor_transform_changed(&self, probe: &Probe<'_>) -> bool {
        self.mesh.scene.actor_transform_changed(probe)
    }

    /// Component transform, or any instance moved.
    fn has_component_transform_changed(&self, probe: &Probe<'_>) -> bool {
        self.mesh.scene.component_transform_changed(probe) || self.has_instances_changed(probe)
    }

    fn has_component_changed(&self, probe: &Probe<'_>) -> bool {
        self.mesh.mesh_changed(probe)
    }

    fn has_instances_changed(&self, probe: &Probe<'_>) -> bool {
        let host = probe.host();
        let count = host.instance_count(probe.id);
        if count != self.instance_transforms.len() {
            return true;
        }
        let tolerance = probe.tolerance();
        self.instance_transforms.iter().enumerate().any(|(i, cached)| {
            let live = host.instance_transform(probe.id, i).unwrap_or_default();
            !cached.equals(&live, tolerance)
        })
    }

    fn duplicate(&self, _ctx: &Arc<InputContext>, _owner: &str) -> InputSnapshot {
        self.clone().into()
    }
}
