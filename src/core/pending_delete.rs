//! Process-wide queue of engine nodes awaiting deletion.
//!
//! Input objects push handles here when they are invalidated; the engine
//! session drains the queue at a sync point in its cook cycle. Pushes are
//! lock-free on the channel side and may come from any thread. A handle that
//! is already pending is not queued again.

use crossbeam_channel::{unbounded, Receiver, Sender};
use log::trace;
use std::collections::HashSet;
use std::sync::Mutex;

use crate::entities::traits::{NodeId, NodeReleaser};

pub struct PendingDeleteQueue {
    tx: Sender<NodeId>,
    rx: Receiver<NodeId>,
    /// Ids currently in the channel
    pending: Mutex<HashSet<NodeId>>,
}

impl Default for PendingDeleteQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl PendingDeleteQueue {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self {
            tx,
            rx,
            pending: Mutex::new(HashSet::new()),
        }
    }

    /// Queue a handle. Returns false for negative or already pending ids.
    pub fn push(&self, node_id: NodeId) -> bool {
        if node_id < 0 {
            return false;
        }
        if !self.pending.lock().unwrap_or_else(|e| e.into_inner()).insert(node_id) {
            trace!("Node {} already pending delete", node_id);
            return false;
        }
        // Receiver lives in self, send cannot fail
        let _ = self.tx.send(node_id);
        trace!("Node {} marked pending delete", node_id);
        true
    }

    /// Take every queued handle in push order.
    pub fn drain(&self) -> Vec<NodeId> {
        let drained: Vec<NodeId> = self.rx.try_iter().collect();
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        for id in &drained {
            pending.remove(id);
        }
        drained
    }

    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

impl NodeReleaser for PendingDeleteQueue {
    fn mark_node_id_as_pending_delete(&self, node_id: NodeId) {
        self.push(node_id);
    }
}
