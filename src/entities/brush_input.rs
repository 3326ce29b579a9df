//! Brush actor record.
//!
//! A brush input stands for the CSG result of the brush itself plus every
//! static subtractive brush overlapping it. Per contributing brush we cache
//! transform, bounds, brush type and a rolling hash of its polygons. The
//! hash folds polygons in storage order, so reordering alone is a change.

use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::config::SyncSettings;

use super::actor_input::ActorSnapshot;
use super::context::{InputContext, Probe};
use super::input_object::InputObject;
use super::object_type::ObjectType;
use super::snapshot::{InputSnapshot, SnapshotRecord};
use super::source::ObjectId;
use super::traits::SceneHost;
use super::transform::{Bounds, Transform};

/// CSG role of a brush.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BrushType {
    #[default]
    Default,
    Add,
    Subtract,
}

/// One polygon of a brush model.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BrushPoly {
    pub vertices: Vec<DVec3>,
    pub base: DVec3,
    pub normal: DVec3,
    pub texture_u: DVec3,
    pub texture_v: DVec3,
    pub material: Option<ObjectId>,
    pub poly_flags: u32,
    pub smoothing_mask: u32,
    pub light_map_scale: f32,
}

#[inline]
fn hash_vec<H: Hasher>(v: DVec3, state: &mut H) {
    v.x.to_bits().hash(state);
    v.y.to_bits().hash(state);
    v.z.to_bits().hash(state);
}

impl BrushPoly {
    /// Hash of every surface property of this polygon.
    pub fn surface_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.vertices.len().hash(&mut hasher);
        for v in &self.vertices {
            hash_vec(*v, &mut hasher);
        }
        hash_vec(self.base, &mut hasher);
        hash_vec(self.normal, &mut hasher);
        hash_vec(self.texture_u, &mut hasher);
        hash_vec(self.texture_v, &mut hasher);
        self.material.hash(&mut hasher);
        self.poly_flags.hash(&mut hasher);
        self.smoothing_mask.hash(&mut hasher);
        self.light_map_scale.to_bits().hash(&mut hasher);
        hasher.finish()
    }
}

/// Fold one polygon into a running hash.
#[inline]
pub fn combine_poly_hash(seed: u64, poly: &BrushPoly) -> u64 {
    let h = poly.surface_hash();
    seed ^ h
        .wrapping_add(0x9e37_79b9_7f4a_7c15)
        .wrapping_add(seed << 6)
        .wrapping_add(seed >> 2)
}

/// Rolling hash over `polys` in storage order. Zero for no polygons.
pub fn surface_hash(polys: &[BrushPoly]) -> u64 {
    polys.iter().fold(0, combine_poly_hash)
}

/// Cached state of one contributing brush.
#[derive(Clone, Debug, PartialEq)]
pub struct BrushInfo {
    pub brush: ObjectId,
    pub transform: Transform,
    pub bounds: Bounds,
    pub brush_type: BrushType,
    pub surface_hash: u64,
}

impl BrushInfo {
    /// Snapshot `brush`. `None` if it does not resolve.
    pub fn capture(host: &dyn SceneHost, brush: ObjectId, settings: &SyncSettings) -> Option<Self> {
        host.object_type(brush)?;
        let surface_hash = if settings.hash_brush_surfaces {
            host.brush_polys(brush).map(|p| surface_hash(&p)).unwrap_or(0)
        } else {
            0
        };
        Some(Self {
            brush,
            transform: host.actor_transform(brush).unwrap_or_default(),
            bounds: host.actor_bounds(brush).unwrap_or_default(),
            brush_type: host.brush_type(brush).unwrap_or_default(),
            surface_hash,
        })
    }

    /// Slot for a brush that did not resolve when cached.
    pub fn unresolved(brush: ObjectId) -> Self {
        Self {
            brush,
            transform: Transform::default(),
            bounds: Bounds::default(),
            brush_type: BrushType::default(),
            surface_hash: 0,
        }
    }

    /// Live brush differs from the cache. False once the brush is gone.
    pub fn has_changed(&self, host: &dyn SceneHost, settings: &SyncSettings) -> bool {
        if host.object_type(self.brush).is_none() {
            return false;
        }

        let transform = host.actor_transform(self.brush).unwrap_or_default();
        if !transform.equals(&self.transform, settings.transform_tolerance) {
            return true;
        }
        if host.brush_type(self.brush).unwrap_or_default() != self.brush_type {
            return true;
        }
        let bounds = host.actor_bounds(self.brush).unwrap_or_default();
        if !bounds.equals(&self.bounds, settings.bounds_tolerance) {
            return true;
        }

        if !settings.hash_brush_surfaces {
            return false;
        }
        match host.brush_polys(self.brush) {
            Some(polys) => surface_hash(&polys) != self.surface_hash,
            None => self.surface_hash != 0,
        }
    }
}

/// The brush itself plus every static subtractive brush overlapping it,
/// in level order.
pub fn find_intersecting_subtractive_brushes(host: &dyn SceneHost, brush: ObjectId) -> Vec<ObjectId> {
    let (Some(bbox), Some(world)) = (host.components_bounding_box(brush), host.world_of(brush)) else {
        return Vec::new();
    };

    let mut out = Vec::new();
    for actor in host.find_actors_in_bounds(world, ObjectType::Brush, &[bbox]) {
        // Keep the input brush at its level position for CSG order
        if actor == brush {
            out.push(actor);
            continue;
        }
        if !host.is_static_brush(actor) {
            continue;
        }
        if host.brush_type(actor) == Some(BrushType::Subtract) {
            out.push(actor);
        }
    }
    out
}

#[derive(Debug, Default)]
pub struct BrushSnapshot {
    pub actor: ActorSnapshot,
    /// Combined CSG model built from `brushes_info`.
    pub combined_model: Option<ObjectId>,
    pub brushes_info: Vec<BrushInfo>,
    pub cached_input_brush_type: BrushType,
    pub ignore_input_object: bool,
}

impl BrushSnapshot {
    /// Non-additive or non-static brushes are ignored, unless the brush
    /// type flipped since it was cached.
    pub fn should_ignore_this_input(&self, host: &dyn SceneHost, brush: ObjectId) -> bool {
        let Some(live) = host.brush_type(brush) else {
            return true;
        };
        if live != self.cached_input_brush_type {
            return false;
        }
        live != BrushType::Add || !host.is_static_brush(brush)
    }

    /// Compare `brushes` element by element against the cached infos.
    pub fn has_brushes_changed(&self, host: &dyn SceneHost, settings: &SyncSettings, brushes: &[ObjectId]) -> bool {
        if brushes.len() != self.brushes_info.len() {
            return true;
        }
        brushes.iter().zip(&self.brushes_info).any(|(id, info)| {
            host.object_type(info.brush).is_none() || *id != info.brush || info.has_changed(host, settings)
        })
    }

    /// Store the combined model and cache one slot per brush, in order.
    pub fn update_cached_data(
        &mut self,
        host: &dyn SceneHost,
        settings: &SyncSettings,
        input_brush: Option<ObjectId>,
        combined_model: Option<ObjectId>,
        brushes: &[ObjectId],
    ) {
        if let Some(t) = input_brush.and_then(|b| host.brush_type(b)) {
            self.cached_input_brush_type = t;
        }
        self.combined_model = combined_model;
        self.brushes_info = brushes
            .iter()
            .map(|b| BrushInfo::capture(host, *b, settings).unwrap_or_else(|| BrushInfo::unresolved(*b)))
            .collect();
    }
}

impl SnapshotRecord for BrushSnapshot {
    fn update(&mut self, probe: &Probe<'_>) {
        self.actor.update(probe);
        match probe.host().brush_type(probe.id) {
            Some(t) => {
                self.cached_input_brush_type = t;
                self.ignore_input_object = self.should_ignore_this_input(probe.host(), probe.id);
            }
            None => self.ignore_input_object = true,
        }
    }

    fn source_lost(&mut self) {
        self.ignore_input_object = true;
    }

    fn has_actor_transform_changed(&self, probe: &Probe<'_>) -> bool {
        if self.ignore_input_object {
            return false;
        }
        self.actor.transform_changed(probe)
    }

    fn has_content_changed(&self, probe: &Probe<'_>) -> bool {
        let host = probe.host();
        let Some(live) = host.brush_type(probe.id) else {
            return false;
        };
        if live != self.cached_input_brush_type {
            return true;
        }
        if self.ignore_input_object {
            return false;
        }
        let brushes = find_intersecting_subtractive_brushes(host, probe.id);
        self.has_brushes_changed(host, probe.ctx.settings(), &brushes)
    }

    fn children(&self) -> &[InputObject] {
        &self.actor.components
    }

    fn children_mut(&mut self) -> &mut [InputObject] {
        &mut self.actor.components
    }

    fn duplicate(&self, _ctx: &Arc<InputContext>, owner: &str) -> InputSnapshot {
        BrushSnapshot {
            actor: self.actor.duplicate_actor(owner),
            combined_model: self.combined_model,
            brushes_info: self.brushes_info.clone(),
            cached_input_brush_type: self.cached_input_brush_type,
            ignore_input_object: self.ignore_input_object,
        }
        .into()
    }
}
