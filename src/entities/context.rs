//! Shared context for input objects.
//!
//! Every wrapper holds an `Arc<InputContext>`: the host scene, the deferred
//! deletion sink, the sync settings and the per-owner name registry. Both
//! collaborators are injected so tests can substitute fakes.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::config::SyncSettings;

use super::object_type::ObjectType;
use super::source::ObjectId;
use super::traits::{NodeReleaser, SceneHost};

pub struct InputContext {
    host: Arc<dyn SceneHost>,
    releaser: Arc<dyn NodeReleaser>,
    settings: SyncSettings,
    /// (owner, base name) -> next suffix
    names: Mutex<HashMap<(String, String), u32>>,
}

impl InputContext {
    pub fn new(host: Arc<dyn SceneHost>, releaser: Arc<dyn NodeReleaser>) -> Arc<Self> {
        Self::with_settings(host, releaser, SyncSettings::default())
    }

    pub fn with_settings(
        host: Arc<dyn SceneHost>,
        releaser: Arc<dyn NodeReleaser>,
        settings: SyncSettings,
    ) -> Arc<Self> {
        Arc::new(Self {
            host,
            releaser,
            settings,
            names: Mutex::new(HashMap::new()),
        })
    }

    pub fn host(&self) -> &dyn SceneHost {
        &*self.host
    }

    pub fn releaser(&self) -> &dyn NodeReleaser {
        &*self.releaser
    }

    pub fn settings(&self) -> &SyncSettings {
        &self.settings
    }

    /// Reserve a name unique within `owner`: `base`, then `base_1`, `base_2`...
    pub fn unique_name(&self, owner: &str, base: &str) -> String {
        let mut names = self.names.lock().unwrap_or_else(|e| e.into_inner());
        let next = names.entry((owner.to_string(), base.to_string())).or_insert(0);
        let name = if *next == 0 {
            base.to_string()
        } else {
            format!("{}_{}", base, next)
        };
        *next += 1;
        name
    }
}

/// A resolved source, handed to snapshot records for one update or query.
pub struct Probe<'a> {
    pub ctx: &'a Arc<InputContext>,
    pub id: ObjectId,
    pub object_type: ObjectType,
    /// Owner scope for naming child wrappers.
    pub owner: &'a str,
}

impl Probe<'_> {
    pub fn host(&self) -> &dyn SceneHost {
        self.ctx.host()
    }

    pub fn tolerance(&self) -> f64 {
        self.ctx.settings().transform_tolerance
    }

    pub fn is_pending_kill(&self) -> bool {
        self.host().is_pending_kill(self.id)
    }
}

/// Records every release in call order, duplicates included.
#[cfg(test)]
#[derive(Default)]
pub(crate) struct RecordingReleaser {
    released: Mutex<Vec<super::traits::NodeId>>,
}

#[cfg(test)]
impl RecordingReleaser {
    pub fn drain(&self) -> Vec<super::traits::NodeId> {
        std::mem::take(&mut *self.released.lock().unwrap_or_else(|e| e.into_inner()))
    }

    pub fn is_empty(&self) -> bool {
        self.released.lock().unwrap_or_else(|e| e.into_inner()).is_empty()
    }
}

#[cfg(test)]
impl NodeReleaser for RecordingReleaser {
    fn mark_node_id_as_pending_delete(&self, node_id: super::traits::NodeId) {
        self.released.lock().unwrap_or_else(|e| e.into_inner()).push(node_id);
    }
}

#[cfg(test)]
pub(crate) fn test_context() -> (
    Arc<crate::core::memory_scene::MemoryScene>,
    Arc<RecordingReleaser>,
    Arc<InputContext>,
) {
    let scene = Arc::new(crate::core::memory_scene::MemoryScene::new());
    let releaser = Arc::new(RecordingReleaser::default());
    let ctx = InputContext::new(scene.clone(), releaser.clone());
    (scene, releaser, ctx)
}
