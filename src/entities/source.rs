//! Host object identifiers and soft references.
//!
//! A [`SoftRef`] never owns the host object. Resolving it is a synchronous
//! lookup that may legitimately fail when the object was unloaded or
//! destroyed; callers treat that as "nothing to diff", not as an error.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::object_type::ObjectType;
use super::traits::SceneHost;

/// Opaque id of a host-owned object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjectId(pub u64);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "obj#{}", self.0)
    }
}

/// Opaque id of a host world (level container).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorldId(pub u32);

/// Weak, resolvable reference to a host object.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SoftRef {
    id: Option<ObjectId>,
}

impl SoftRef {
    pub const NONE: SoftRef = SoftRef { id: None };

    pub fn new(id: ObjectId) -> Self {
        Self { id: Some(id) }
    }

    pub fn id(&self) -> Option<ObjectId> {
        self.id
    }

    pub fn is_null(&self) -> bool {
        self.id.is_none()
    }

    pub fn reset(&mut self) {
        self.id = None;
    }

    /// Look the object up in the host. `None` if unset or gone.
    pub fn resolve(&self, host: &dyn SceneHost) -> Option<(ObjectId, ObjectType)> {
        let id = self.id?;
        host.object_type(id).map(|ty| (id, ty))
    }
}

impl From<ObjectId> for SoftRef {
    fn from(id: ObjectId) -> Self {
        Self::new(id)
    }
}
