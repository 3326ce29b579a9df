//! Mesh asset records.
//!
//! A static mesh input may also be fed a blueprint; it then owns one child
//! static mesh input per mesh the blueprint references.

use log::debug;
use std::sync::Arc;

use super::context::{InputContext, Probe};
use super::input_object::InputObject;
use super::object_type::{InputObjectKind, ObjectType};
use super::snapshot::{InputSnapshot, SnapshotRecord};

#[derive(Debug, Default)]
pub struct StaticMeshSnapshot {
    pub is_blueprint: bool,
    pub blueprint_meshes: Vec<InputObject>,
}

impl StaticMeshSnapshot {
    /// Bring the blueprint children in line with `from`.
    ///
    /// Child `i` is reused when it matches `from[i]` and takes over its state,
    /// otherwise `from[i]` is duplicated into `owner`. Children left over are
    /// dropped, which invalidates them.
    pub fn reconcile_blueprint_meshes(&mut self, from: &[InputObject], owner: &str) {
        let mut previous: Vec<Option<InputObject>> =
            std::mem::take(&mut self.blueprint_meshes).into_iter().map(Some).collect();

        let mut next = Vec::with_capacity(from.len());
        for (i, src) in from.iter().enumerate() {
            let reused = previous
                .get_mut(i)
                .and_then(|slot| if slot.as_ref().is_some_and(|c| c.matches(src)) { slot.take() } else { None });
            let child = match reused {
                Some(mut child) => {
                    child.copy_state_from(src, true);
                    child
                }
                None => src.duplicate_and_copy_state(owner),
            };
            next.push(child);
        }
        self.blueprint_meshes = next;

        let stale = previous.into_iter().flatten().count();
        if stale > 0 {
            debug!("Dropping {} stale blueprint mesh inputs", stale);
        }
    }
}

impl SnapshotRecord for StaticMeshSnapshot {
    fn update(&mut self, probe: &Probe<'_>) {
        self.is_blueprint = probe.object_type.is_a(ObjectType::Blueprint);
        if !self.is_blueprint {
            self.blueprint_meshes.clear();
            return;
        }

        let host = probe.host();
        let name = host.object_name(probe.id).unwrap_or_default();
        self.blueprint_meshes = host
            .blueprint_static_meshes(probe.id)
            .into_iter()
            .filter(|m| host.object_type(*m).is_some_and(|ty| ty.is_a(ObjectType::StaticMesh)))
            .filter_map(|m| InputObject::create(probe.ctx, InputObjectKind::StaticMesh, Some(m), probe.owner, &name))
            .collect();
    }

    fn source_lost(&mut self) {
        self.is_blueprint = false;
    }

    fn children(&self) -> &[InputObject] {
        &self.blueprint_meshes
    }

    fn children_mut(&mut self) -> &mut [InputObject] {
        &mut self.blueprint_meshes
    }

    fn duplicate(&self, _ctx: &Arc<InputContext>, owner: &str) -> InputSnapshot {
        StaticMeshSnapshot {
            is_blueprint: self.is_blueprint,
            blueprint_meshes: self
                .blueprint_meshes
                .iter()
                .map(|m| m.duplicate_and_copy_state(owner))
                .collect(),
        }
        .into()
    }
}

/// Skeletal meshes carry no state beyond the source reference.
#[derive(Clone, Copy, Debug, Default)]
pub struct SkeletalMeshSnapshot;

impl SnapshotRecord for SkeletalMeshSnapshot {
    fn update(&mut self, _probe: &Probe<'_>) {}

    fn duplicate(&self, _ctx: &Arc<InputContext>, _owner: &str) -> InputSnapshot {
        (*self).into()
    }
}
