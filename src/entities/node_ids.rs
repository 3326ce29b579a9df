//! Engine node handles owned by one input object.
//!
//! An input object owns up to two handles: the input node and its parent
//! object node. [`NodeHandles::release`] queues each assigned handle once and
//! clears it, so a second release has nothing left to queue.

use serde::{Deserialize, Serialize};

use super::traits::{NodeId, NodeReleaser, INVALID_NODE_ID};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeHandles {
    node_id: NodeId,
    object_node_id: NodeId,
}

impl Default for NodeHandles {
    fn default() -> Self {
        Self::NONE
    }
}

impl NodeHandles {
    pub const NONE: NodeHandles = NodeHandles {
        node_id: INVALID_NODE_ID,
        object_node_id: INVALID_NODE_ID,
    };

    pub fn new(node_id: NodeId, object_node_id: NodeId) -> Self {
        Self { node_id, object_node_id }
    }

    pub fn node_id(&self) -> NodeId {
        self.node_id
    }

    pub fn object_node_id(&self) -> NodeId {
        self.object_node_id
    }

    pub fn set_node_id(&mut self, id: NodeId) {
        self.node_id = id;
    }

    pub fn set_object_node_id(&mut self, id: NodeId) {
        self.object_node_id = id;
    }

    /// No handle assigned.
    pub fn is_empty(&self) -> bool {
        self.node_id < 0 && self.object_node_id < 0
    }

    /// Forget both handles without queuing them.
    pub fn clear(&mut self) {
        *self = Self::NONE;
    }

    /// Queue every assigned handle, then clear. Returns how many were queued.
    pub fn release(&mut self, releaser: &dyn NodeReleaser) -> usize {
        let mut released = 0;
        if self.node_id >= 0 {
            releaser.mark_node_id_as_pending_delete(self.node_id);
            released += 1;
        }
        // ... and the parent object node, unless it is the same node
        if self.object_node_id >= 0 && self.object_node_id != self.node_id {
            releaser.mark_node_id_as_pending_delete(self.object_node_id);
            released += 1;
        }
        self.clear();
        released
    }

    /// [`release`](Self::release), except that a handle equal to its
    /// counterpart in `borrowed` is cleared without being queued.
    pub fn release_unless_borrowed(&mut self, releaser: &dyn NodeReleaser, borrowed: &NodeHandles) -> usize {
        if self.node_id == borrowed.node_id {
            self.node_id = INVALID_NODE_ID;
        }
        if self.object_node_id == borrowed.object_node_id {
            self.object_node_id = INVALID_NODE_ID;
        }
        self.release(releaser)
    }
}
