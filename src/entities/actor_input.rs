//! Actor records.
//!
//! An actor input owns one child input per live scene component of the
//! actor, rebuilt wholesale on every update. Landscapes are actors with no
//! extra state.

use log::trace;
use std::sync::Arc;

use super::context::{InputContext, Probe};
use super::input_object::InputObject;
use super::snapshot::{InputSnapshot, SnapshotRecord};
use super::transform::Transform;

#[derive(Debug, Default)]
pub struct ActorSnapshot {
    pub transform: Transform,
    pub components: Vec<InputObject>,
}

impl ActorSnapshot {
    pub fn transform_changed(&self, probe: &Probe<'_>) -> bool {
        probe
            .host()
            .actor_transform(probe.id)
            .is_some_and(|t| !self.transform.equals(&t, probe.tolerance()))
    }

    pub(super) fn duplicate_actor(&self, owner: &str) -> ActorSnapshot {
        ActorSnapshot {
            transform: self.transform,
            components: self
                .components
                .iter()
                .map(|c| c.duplicate_and_copy_state(owner))
                .collect(),
        }
    }
}

impl SnapshotRecord for ActorSnapshot {
    fn update(&mut self, probe: &Probe<'_>) {
        let host = probe.host();
        if let Some(t) = host.actor_transform(probe.id) {
            self.transform = t;
        }

        let actor_name = host.object_name(probe.id).unwrap_or_default();
        let components: Vec<InputObject> = host
            .scene_components(probe.id)
            .into_iter()
            .filter(|c| !host.is_pending_kill(*c))
            .filter_map(|c| InputObject::create_typed(probe.ctx, Some(c), probe.owner, &actor_name))
            .filter(|input| input.kind().is_scene_component())
            .collect();
        trace!("Actor {} has {} component inputs", probe.id, components.len());
        self.components = components;
    }

    fn has_actor_transform_changed(&self, probe: &Probe<'_>) -> bool {
        self.transform_changed(probe)
    }

    fn children(&self) -> &[InputObject] {
        &self.components
    }

    fn children_mut(&mut self) -> &mut [InputObject] {
        &mut self.components
    }

    fn duplicate(&self, _ctx: &Arc<InputContext>, owner: &str) -> InputSnapshot {
        self.duplicate_actor(owner).into()
    }
}

#[derive(Debug, Default)]
pub struct LandscapeSnapshot {
    pub actor: ActorSnapshot,
}

impl SnapshotRecord for LandscapeSnapshot {
    fn update(&mut self, probe: &Probe<'_>) {
        self.actor.update(probe);
    }

    fn has_actor_transform_changed(&self, probe: &Probe<'_>) -> bool {
        self.actor.transform_changed(probe)
    }

    fn children(&self) -> &[InputObject] {
        &self.actor.components
    }

    fn children_mut(&mut self) -> &mut [InputObject] {
        &mut self.actor.components
    }

    fn duplicate(&self, _ctx: &Arc<InputContext>, owner: &str) -> InputSnapshot {
        LandscapeSnapshot {
            actor: self.actor.duplicate_actor(owner),
        }
        .into()
    }
}
