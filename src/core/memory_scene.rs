//! In-memory scene host.
//!
//! Objects live in a `BTreeMap` keyed by spawn order, so spatial queries
//! return actors in level order. Interior mutability lets callers edit the
//! scene while input objects hold an `Arc` to it; used by the test suite and
//! for headless runs without a host engine.

use glam::DVec3;
use log::trace;
use std::collections::BTreeMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::entities::brush_input::{BrushPoly, BrushType};
use crate::entities::camera_input::CameraParams;
use crate::entities::object_type::ObjectType;
use crate::entities::source::{ObjectId, WorldId};
use crate::entities::spline_input::{polyline_length, CurveMethod, CurveType};
use crate::entities::traits::{NodeId, SceneHost};
use crate::entities::transform::{Aabb, Bounds, Transform};

/// One host object. Fields irrelevant to its type stay at their defaults.
#[derive(Clone, Debug)]
pub struct MemoryObject {
    pub object_type: ObjectType,
    pub name: String,
    pub pending_kill: bool,
    pub world: Option<WorldId>,
    /// Owning actor (components only)
    pub owner: Option<ObjectId>,
    /// Root components of an actor, or children attached to a component
    pub attached: Vec<ObjectId>,
    /// World transform (actors and components)
    pub transform: Transform,
    pub static_mesh: Option<ObjectId>,
    pub materials: Vec<Option<ObjectId>>,
    pub instances: Vec<Transform>,
    /// Local space control points
    pub spline_points: Vec<Transform>,
    pub spline_closed: bool,
    pub curve: Option<(CurveType, CurveMethod)>,
    pub asset_node_id: Option<NodeId>,
    pub camera: Option<CameraParams>,
    pub brush_type: Option<BrushType>,
    pub bounds: Option<Bounds>,
    pub polys: Option<Vec<BrushPoly>>,
    pub blueprint_meshes: Vec<ObjectId>,
}

impl MemoryObject {
    pub fn new(object_type: ObjectType) -> Self {
        Self {
            object_type,
            name: String::new(),
            pending_kill: false,
            world: None,
            owner: None,
            attached: Vec::new(),
            transform: Transform::IDENTITY,
            static_mesh: None,
            materials: Vec::new(),
            instances: Vec::new(),
            spline_points: Vec::new(),
            spline_closed: false,
            curve: None,
            asset_node_id: None,
            camera: None,
            brush_type: None,
            bounds: None,
            polys: None,
            blueprint_meshes: Vec::new(),
        }
    }

    pub fn named(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn in_world(mut self, world: WorldId) -> Self {
        self.world = Some(world);
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_static_mesh(mut self, mesh: ObjectId) -> Self {
        self.static_mesh = Some(mesh);
        self
    }

    pub fn with_instances(mut self, instances: Vec<Transform>) -> Self {
        self.instances = instances;
        self
    }

    pub fn with_spline(mut self, points: Vec<Transform>, closed: bool) -> Self {
        self.spline_points = points;
        self.spline_closed = closed;
        self
    }

    pub fn with_curve(mut self, curve_type: CurveType, method: CurveMethod) -> Self {
        self.curve = Some((curve_type, method));
        self
    }

    pub fn with_asset_node(mut self, node_id: NodeId) -> Self {
        self.asset_node_id = Some(node_id);
        self
    }

    pub fn with_camera(mut self, params: CameraParams) -> Self {
        self.camera = Some(params);
        self
    }

    pub fn with_brush(mut self, brush_type: BrushType, bounds: Bounds) -> Self {
        self.brush_type = Some(brush_type);
        self.bounds = Some(bounds);
        self
    }

    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn with_polys(mut self, polys: Vec<BrushPoly>) -> Self {
        self.polys = Some(polys);
        self
    }

    pub fn with_blueprint_meshes(mut self, meshes: Vec<ObjectId>) -> Self {
        self.blueprint_meshes = meshes;
        self
    }
}

pub struct MemoryScene {
    objects: RwLock<BTreeMap<ObjectId, MemoryObject>>,
    next_id: AtomicU64,
}

impl Default for MemoryScene {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryScene {
    pub fn new() -> Self {
        Self {
            objects: RwLock::new(BTreeMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn spawn(&self, object: MemoryObject) -> ObjectId {
        let id = ObjectId(self.next_id.fetch_add(1, Ordering::Relaxed));
        trace!("Spawned {:?} {}", object.object_type, id);
        self.objects
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(id, object);
        id
    }

    /// Spawn a component as a root component of `actor`.
    pub fn attach_component(&self, actor: ObjectId, mut component: MemoryObject) -> ObjectId {
        let world = self.read(actor, |a| a.world).flatten();
        component.owner = Some(actor);
        component.world = component.world.or(world);
        let id = self.spawn(component);
        self.edit(actor, |a| a.attached.push(id));
        id
    }

    /// Spawn a component attached under another component.
    pub fn attach_to_component(&self, parent: ObjectId, mut component: MemoryObject) -> ObjectId {
        let (owner, world) = self.read(parent, |p| (p.owner, p.world)).unwrap_or((None, None));
        component.owner = owner;
        component.world = component.world.or(world);
        let id = self.spawn(component);
        self.edit(parent, |p| p.attached.push(id));
        id
    }

    /// Mutate an object in place. False if it does not exist.
    pub fn edit(&self, id: ObjectId, f: impl FnOnce(&mut MemoryObject)) -> bool {
        let mut objects = self.objects.write().unwrap_or_else(|e| e.into_inner());
        match objects.get_mut(&id) {
            Some(object) => {
                f(object);
                true
            }
            None => false,
        }
    }

    /// Remove an object; soft references to it stop resolving.
    pub fn destroy(&self, id: ObjectId) -> bool {
        self.objects
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&id)
            .is_some()
    }

    pub fn mark_pending_kill(&self, id: ObjectId) -> bool {
        self.edit(id, |o| o.pending_kill = true)
    }

    fn read<R>(&self, id: ObjectId, f: impl FnOnce(&MemoryObject) -> R) -> Option<R> {
        self.objects
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&id)
            .map(f)
    }

    fn read_if<R>(&self, id: ObjectId, class: ObjectType, f: impl FnOnce(&MemoryObject) -> R) -> Option<R> {
        self.read(id, |o| o.object_type.is_a(class).then(|| f(o))).flatten()
    }
}

impl SceneHost for MemoryScene {
    fn object_type(&self, id: ObjectId) -> Option<ObjectType> {
        self.read(id, |o| o.object_type)
    }

    fn is_pending_kill(&self, id: ObjectId) -> bool {
        self.read(id, |o| o.pending_kill).unwrap_or(false)
    }

    fn object_name(&self, id: ObjectId) -> Option<String> {
        self.read(id, |o| o.name.clone())
    }

    fn owner_actor(&self, component: ObjectId) -> Option<ObjectId> {
        self.read(component, |o| o.owner).flatten()
    }

    fn actor_transform(&self, actor: ObjectId) -> Option<Transform> {
        self.read_if(actor, ObjectType::Actor, |o| o.transform)
    }

    fn component_transform(&self, component: ObjectId) -> Option<Transform> {
        self.read_if(component, ObjectType::SceneComponent, |o| o.transform)
    }

    fn scene_components(&self, actor: ObjectId) -> Vec<ObjectId> {
        let objects = self.objects.read().unwrap_or_else(|e| e.into_inner());
        let mut out = Vec::new();
        let mut stack: Vec<ObjectId> = match objects.get(&actor) {
            Some(a) => a.attached.iter().rev().copied().collect(),
            None => return out,
        };
        // Depth-first, parents before their attached children
        while let Some(id) = stack.pop() {
            let Some(component) = objects.get(&id) else {
                continue;
            };
            if component.object_type.is_a(ObjectType::SceneComponent) {
                out.push(id);
            }
            stack.extend(component.attached.iter().rev().copied());
        }
        out
    }

    fn static_mesh(&self, component: ObjectId) -> Option<ObjectId> {
        self.read(component, |o| o.static_mesh).flatten()
    }

    fn materials(&self, component: ObjectId) -> Vec<Option<ObjectId>> {
        self.read(component, |o| o.materials.clone()).unwrap_or_default()
    }

    fn blueprint_static_meshes(&self, blueprint: ObjectId) -> Vec<ObjectId> {
        self.read_if(blueprint, ObjectType::Blueprint, |o| o.blueprint_meshes.clone())
            .unwrap_or_default()
    }

    fn instance_count(&self, component: ObjectId) -> usize {
        self.read(component, |o| o.instances.len()).unwrap_or(0)
    }

    fn instance_transform(&self, component: ObjectId, index: usize) -> Option<Transform> {
        self.read(component, |o| o.instances.get(index).copied()).flatten()
    }

    fn spline_point_count(&self, spline: ObjectId) -> usize {
        self.read(spline, |o| o.spline_points.len()).unwrap_or(0)
    }

    fn spline_point_transform(&self, spline: ObjectId, index: usize) -> Option<Transform> {
        self.read(spline, |o| o.spline_points.get(index).copied()).flatten()
    }

    fn spline_length(&self, spline: ObjectId) -> f32 {
        self.read(spline, |o| {
            let points: Vec<DVec3> = o.spline_points.iter().map(|p| p.translation).collect();
            polyline_length(&points, o.spline_closed) as f32
        })
        .unwrap_or(0.0)
    }

    fn spline_is_closed_loop(&self, spline: ObjectId) -> bool {
        self.read(spline, |o| o.spline_closed).unwrap_or(false)
    }

    fn curve_settings(&self, component: ObjectId) -> Option<(CurveType, CurveMethod)> {
        self.read(component, |o| o.curve).flatten()
    }

    fn asset_node_id(&self, component: ObjectId) -> Option<NodeId> {
        self.read_if(component, ObjectType::ProceduralAssetComponent, |o| o.asset_node_id)
            .flatten()
    }

    fn camera_params(&self, camera: ObjectId) -> Option<CameraParams> {
        self.read_if(camera, ObjectType::CameraComponent, |o| o.camera)
            .flatten()
    }

    fn brush_type(&self, brush: ObjectId) -> Option<BrushType> {
        self.read_if(brush, ObjectType::Brush, |o| o.brush_type.unwrap_or_default())
    }

    fn actor_bounds(&self, actor: ObjectId) -> Option<Bounds> {
        self.read(actor, |o| o.bounds).flatten()
    }

    fn brush_polys(&self, brush: ObjectId) -> Option<Vec<BrushPoly>> {
        self.read(brush, |o| o.polys.clone()).flatten()
    }

    fn world_of(&self, actor: ObjectId) -> Option<WorldId> {
        self.read(actor, |o| o.world).flatten()
    }

    fn find_actors_in_bounds(&self, world: WorldId, class: ObjectType, bounds: &[Aabb]) -> Vec<ObjectId> {
        let objects = self.objects.read().unwrap_or_else(|e| e.into_inner());
        objects
            .iter()
            .filter(|(_, o)| o.world == Some(world) && o.object_type.is_a(class))
            .filter(|(_, o)| {
                o.bounds
                    .map(|b| b.to_box())
                    .is_some_and(|b| bounds.iter().any(|q| q.intersects(&b)))
            })
            .map(|(id, _)| *id)
            .collect()
    }
}
