//! Transforms and bounds cached by snapshots.
//!
//! Uses glam double precision types (host engines run large worlds in f64).
//! Equality follows the host convention: translation, rotation and scale are
//! compared independently against a tolerance, never as a single matrix.
//! Rotation equality accepts `q` and `-q` since both encode one orientation.

use glam::{DQuat, DVec3, DVec4, EulerRot};
use serde::{Deserialize, Serialize};

/// Default tolerance for transform and bounds comparisons.
pub const DEFAULT_TOLERANCE: f64 = 1e-4;

/// Translation / rotation / scale triple.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub translation: DVec3,
    pub rotation: DQuat,
    pub scale: DVec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translation: DVec3::ZERO,
        rotation: DQuat::IDENTITY,
        scale: DVec3::ONE,
    };

    pub fn new(translation: DVec3, rotation: DQuat, scale: DVec3) -> Self {
        Self { translation, rotation, scale }
    }

    pub fn from_translation(translation: DVec3) -> Self {
        Self { translation, ..Self::IDENTITY }
    }

    pub fn from_rotation(rotation: DQuat) -> Self {
        Self { rotation, ..Self::IDENTITY }
    }

    pub fn location(&self) -> DVec3 {
        self.translation
    }

    /// Rotation as Euler angles in degrees: `[pitch, yaw, roll]`.
    ///
    /// ZYX order (yaw first), matching the host's rotator layout.
    pub fn rotator(&self) -> DVec3 {
        let (yaw, pitch, roll) = self.rotation.to_euler(EulerRot::ZYX);
        DVec3::new(pitch.to_degrees(), yaw.to_degrees(), roll.to_degrees())
    }

    /// Component-wise equality within `tolerance`.
    pub fn equals(&self, other: &Transform, tolerance: f64) -> bool {
        rotations_equal(self.rotation, other.rotation, tolerance)
            && vectors_equal(self.translation, other.translation, tolerance)
            && vectors_equal(self.scale, other.scale, tolerance)
    }
}

/// Per-axis |a - b| <= tolerance.
#[inline]
pub fn vectors_equal(a: DVec3, b: DVec3, tolerance: f64) -> bool {
    (a - b).abs().max_element() <= tolerance
}

#[inline]
fn rotations_equal(a: DQuat, b: DQuat, tolerance: f64) -> bool {
    let a = DVec4::from(a);
    let b = DVec4::from(b);
    (a - b).abs().max_element() <= tolerance || (a + b).abs().max_element() <= tolerance
}

/// Actor bounds as origin + half extent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub origin: DVec3,
    pub extent: DVec3,
}

impl Bounds {
    pub fn new(origin: DVec3, extent: DVec3) -> Self {
        Self { origin, extent }
    }

    pub fn equals(&self, other: &Bounds, tolerance: f64) -> bool {
        vectors_equal(self.origin, other.origin, tolerance)
            && vectors_equal(self.extent, other.extent, tolerance)
    }

    pub fn to_box(&self) -> Aabb {
        Aabb {
            min: self.origin - self.extent,
            max: self.origin + self.extent,
        }
    }
}

/// Axis-aligned box used by spatial queries.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: DVec3,
    pub max: DVec3,
}

impl Aabb {
    pub fn new(min: DVec3, max: DVec3) -> Self {
        Self { min, max }
    }

    /// Touching boxes count as intersecting.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.cmple(other.max).all() && other.min.cmple(self.max).all()
    }
}
