//! Input object wrapper.
//!
//! An [`InputObject`] pairs a soft reference to a host object with a cached
//! [`InputSnapshot`] and the procedural engine node handles built from it.
//! Change queries diff the snapshot against the live object on demand; a
//! source that no longer resolves never reports drift.
//!
//! Lifecycle: [`InputObject::create`] snapshots immediately and marks the
//! wrapper changed. The owner polls the `has_*` queries and calls
//! [`InputObject::update`] on drift. Handles are queued for deletion once,
//! by [`InputObject::invalidate`], [`InputObject::dispose`] or drop.

use log::{debug, trace, warn};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

use super::brush_input::{self, BrushInfo};
use super::context::{InputContext, Probe};
use super::node_ids::NodeHandles;
use super::object_type::{classify_object, InputObjectKind};
use super::snapshot::{InputSnapshot, SnapshotRecord};
use super::source::{ObjectId, SoftRef};
use super::traits::{NodeId, INVALID_NODE_ID};

pub struct InputObject {
    uuid: Uuid,
    /// `<prefix>_<name>` before uniquing; duplicates are uniqued from it.
    base_name: String,
    name: String,
    owner: String,
    kind: InputObjectKind,
    source: SoftRef,
    handles: NodeHandles,
    /// Handles taken over from another wrapper, which keeps owning them.
    borrowed: NodeHandles,
    has_changed: bool,
    needs_update_trigger: bool,
    transform_changed: bool,
    import_as_reference: bool,
    can_delete_external_nodes: bool,
    snapshot: InputSnapshot,
    ctx: Arc<InputContext>,
}

impl InputObject {
    // === Construction ===

    /// Create a `kind` wrapper for `source` inside `owner` and snapshot it.
    ///
    /// `None` if `source` is absent or `kind` is `Invalid`. Procedural asset
    /// wrappers adopt the asset's node id, invalid until the asset is built.
    pub fn create(
        ctx: &Arc<InputContext>,
        kind: InputObjectKind,
        source: Option<ObjectId>,
        owner: &str,
        name: &str,
    ) -> Option<Self> {
        let source = source?;
        let snapshot = InputSnapshot::empty_for(kind)?;

        let handles = if kind == InputObjectKind::ProceduralAssetComponent {
            let node_id = ctx.host().asset_node_id(source).unwrap_or(INVALID_NODE_ID);
            NodeHandles::new(node_id, node_id)
        } else {
            NodeHandles::NONE
        };

        let base_name = format!("{}_{}", kind.name_prefix(), name);
        let name = ctx.unique_name(owner, &base_name);
        let mut input = Self {
            uuid: Uuid::new_v4(),
            base_name,
            name,
            owner: owner.to_string(),
            kind,
            source: SoftRef::NONE,
            handles,
            borrowed: NodeHandles::NONE,
            has_changed: false,
            needs_update_trigger: false,
            transform_changed: false,
            import_as_reference: false,
            can_delete_external_nodes: true,
            snapshot,
            ctx: Arc::clone(ctx),
        };
        input.update(Some(source));
        input.has_changed = true;
        debug!("Created {} input {} for {}", kind, input.name, source);
        Some(input)
    }

    /// Classify `source` and create the matching wrapper.
    ///
    /// Generic scene components are skipped when
    /// `wrap_generic_scene_components` is off.
    pub fn create_typed(ctx: &Arc<InputContext>, source: Option<ObjectId>, owner: &str, name: &str) -> Option<Self> {
        let kind = classify_object(ctx.host(), source);
        match kind {
            InputObjectKind::Invalid => None,
            InputObjectKind::SceneComponent if !ctx.settings().wrap_generic_scene_components => {
                trace!("Skipping generic scene component {:?}", source);
                None
            }
            _ => Self::create(ctx, kind, source, owner, name),
        }
    }

    /// Re-snapshot from `source`.
    ///
    /// Feeding a source of the wrong type is a contract violation: it
    /// asserts in debug builds and keeps the stale snapshot otherwise.
    pub fn update(&mut self, source: Option<ObjectId>) {
        let object_type = source.and_then(|id| self.ctx.host().object_type(id));
        let accepted = object_type.is_none_or(|ty| self.kind.accepts(ty));
        debug_assert!(accepted, "{} input {} cannot be fed {:?}", self.kind, self.name, object_type);
        if !accepted {
            warn!("{} input {} cannot be fed {:?}, keeping snapshot", self.kind, self.name, object_type);
            return;
        }

        self.source = source.map(SoftRef::new).unwrap_or_default();
        let ctx = Arc::clone(&self.ctx);
        match (source, object_type) {
            (Some(id), Some(object_type)) => {
                let probe = Probe { ctx: &ctx, id, object_type, owner: &self.owner };
                self.snapshot.update(&probe);
            }
            _ => {
                trace!("Input {} source did not resolve", self.name);
                self.snapshot.source_lost();
            }
        }

        // Children follow our deletion rights
        let can_delete = self.can_delete_external_nodes;
        for child in self.snapshot.children_mut() {
            child.set_can_delete_external_nodes(can_delete);
        }
    }

    /// Re-snapshot from the current source.
    pub fn refresh(&mut self) {
        self.update(self.source.id());
    }

    /// Same kind and same node handles.
    pub fn matches(&self, other: &InputObject) -> bool {
        self.kind == other.kind
            && self.handles.node_id() == other.handles.node_id()
            && self.handles.object_node_id() == other.handles.object_node_id()
    }

    // === Node lifecycle ===

    /// Queue owned handles for deletion and clear them. Children first.
    ///
    /// Procedural asset wrappers and wrappers that may not delete external
    /// nodes only clear. Calling it again is a no-op.
    pub fn invalidate(&mut self) {
        for child in self.snapshot.children_mut() {
            child.invalidate();
        }
        self.release_own_handles();
    }

    fn release_own_handles(&mut self) {
        let borrowed = std::mem::take(&mut self.borrowed);
        if self.kind == InputObjectKind::ProceduralAssetComponent || !self.can_delete_external_nodes {
            self.handles.clear();
            return;
        }
        let released = self.handles.release_unless_borrowed(self.ctx.releaser(), &borrowed);
        if released > 0 {
            trace!("Input {} released {} nodes", self.name, released);
        }
    }

    /// Invalidate and drop.
    pub fn dispose(mut self) {
        self.invalidate();
    }

    /// Structural copy inside `owner`: fresh identity, no node handles.
    ///
    /// Procedural asset wrappers keep the asset's node id; they never
    /// release it.
    pub fn duplicate_and_copy_state(&self, owner: &str) -> InputObject {
        let mut source = self.source;
        if self.kind == InputObjectKind::ProceduralSplineComponent {
            source.reset();
        }
        let handles = match self.kind {
            InputObjectKind::ProceduralAssetComponent => self.handles,
            _ => NodeHandles::NONE,
        };
        InputObject {
            uuid: Uuid::new_v4(),
            base_name: self.base_name.clone(),
            name: self.ctx.unique_name(owner, &self.base_name),
            owner: owner.to_string(),
            kind: self.kind,
            source,
            handles,
            borrowed: NodeHandles::NONE,
            has_changed: self.has_changed,
            needs_update_trigger: self.needs_update_trigger,
            transform_changed: self.transform_changed,
            import_as_reference: self.import_as_reference,
            can_delete_external_nodes: self.can_delete_external_nodes,
            snapshot: self.snapshot.duplicate(&self.ctx, owner),
            ctx: Arc::clone(&self.ctx),
        }
    }

    /// Take over `other`'s state.
    ///
    /// With `copy_all` the source and snapshot are copied too (blueprint
    /// children are reconciled rather than replaced). Node handles move
    /// over: ours are released first. `other` keeps owning the adopted
    /// ones, so they are never queued from here; a handle assigned later
    /// through the setters is ours again.
    pub fn copy_state_from(&mut self, other: &InputObject, copy_all: bool) {
        debug_assert_eq!(self.kind, other.kind, "copy_state_from across kinds");
        if self.kind != other.kind {
            warn!("Cannot copy {} input state into {} input {}", other.kind, self.kind, self.name);
            return;
        }

        if copy_all {
            self.source = other.source;
            self.import_as_reference = other.import_as_reference;
            let owner = self.owner.clone();
            let reconciled = match (self.snapshot.as_static_mesh_mut(), &other.snapshot) {
                (Some(mine), InputSnapshot::StaticMesh(theirs)) => {
                    mine.is_blueprint = theirs.is_blueprint;
                    mine.reconcile_blueprint_meshes(&theirs.blueprint_meshes, &owner);
                    true
                }
                _ => false,
            };
            if !reconciled {
                self.snapshot = other.snapshot.duplicate(&self.ctx, &owner);
            }
        }

        if self.handles != other.handles {
            self.release_own_handles();
            self.handles = other.handles;
            self.borrowed = other.handles;
        }

        self.has_changed = other.has_changed;
        self.needs_update_trigger = other.needs_update_trigger;
        self.transform_changed = other.transform_changed;

        if self.kind == InputObjectKind::ProceduralSplineComponent {
            self.source.reset();
        }
    }

    // === Change detection ===

    fn probe(&self) -> Option<Probe<'_>> {
        let (id, object_type) = self.source.resolve(self.ctx.host())?;
        Some(Probe { ctx: &self.ctx, id, object_type, owner: &self.owner })
    }

    pub fn has_actor_transform_changed(&self) -> bool {
        self.probe().is_some_and(|p| self.snapshot.has_actor_transform_changed(&p))
    }

    pub fn has_component_transform_changed(&self) -> bool {
        self.probe().is_some_and(|p| self.snapshot.has_component_transform_changed(&p))
    }

    pub fn has_component_changed(&self) -> bool {
        self.probe().is_some_and(|p| self.snapshot.has_component_changed(&p))
    }

    pub fn has_content_changed(&self) -> bool {
        self.probe().is_some_and(|p| self.snapshot.has_content_changed(&p))
    }

    pub fn has_instances_changed(&self) -> bool {
        self.probe().is_some_and(|p| self.snapshot.has_instances_changed(&p))
    }

    /// Spline resampling check. Always false.
    pub fn has_spline_component_changed(&self, resolution: f32) -> bool {
        self.snapshot
            .as_spline()
            .is_some_and(|s| s.has_spline_component_changed(resolution))
    }

    /// Any query reports drift, here or in a child.
    pub fn has_changed_since_snapshot(&self) -> bool {
        let drifted = self.probe().is_some_and(|p| {
            self.snapshot.has_actor_transform_changed(&p)
                || self.snapshot.has_component_transform_changed(&p)
                || self.snapshot.has_component_changed(&p)
                || self.snapshot.has_content_changed(&p)
        });
        drifted || self.children().iter().any(|c| c.has_changed_since_snapshot())
    }

    // === Brush ===

    /// Non-brush inputs are never ignored; brushes without a live source are.
    pub fn should_ignore_this_input(&self) -> bool {
        let Some(brush) = self.snapshot.as_brush() else {
            return false;
        };
        match self.source.id() {
            Some(id) => brush.should_ignore_this_input(self.ctx.host(), id),
            None => true,
        }
    }

    /// Ignore flag cached by the last update.
    pub fn is_ignored(&self) -> bool {
        self.snapshot.as_brush().is_some_and(|b| b.ignore_input_object)
    }

    /// Brushes contributing to this brush input's CSG result, in level order.
    pub fn find_intersecting_subtractive_brushes(&self) -> Vec<ObjectId> {
        match (self.kind, self.source.id()) {
            (InputObjectKind::Brush, Some(id)) => brush_input::find_intersecting_subtractive_brushes(self.ctx.host(), id),
            _ => Vec::new(),
        }
    }

    pub fn has_brushes_changed(&self, brushes: &[ObjectId]) -> bool {
        self.snapshot
            .as_brush()
            .is_some_and(|b| b.has_brushes_changed(self.ctx.host(), self.ctx.settings(), brushes))
    }

    /// Cache the combined CSG model and the brushes it was built from.
    pub fn update_cached_data(&mut self, combined_model: Option<ObjectId>, brushes: &[ObjectId]) {
        let source = self.source.id();
        let ctx = Arc::clone(&self.ctx);
        if let Some(brush) = self.snapshot.as_brush_mut() {
            brush.update_cached_data(ctx.host(), ctx.settings(), source, combined_model, brushes);
        }
    }

    pub fn combined_model(&self) -> Option<ObjectId> {
        self.snapshot.as_brush().and_then(|b| b.combined_model)
    }

    pub fn brushes_info(&self) -> &[BrushInfo] {
        self.snapshot.as_brush().map(|b| b.brushes_info.as_slice()).unwrap_or(&[])
    }

    // === Flags ===

    pub fn has_changed(&self) -> bool {
        self.has_changed
    }

    pub fn needs_update_trigger(&self) -> bool {
        self.needs_update_trigger
    }

    pub fn transform_changed(&self) -> bool {
        self.transform_changed
    }

    pub fn mark_changed(&mut self, changed: bool) {
        self.has_changed = changed;
        self.needs_update_trigger = changed;
    }

    pub fn mark_transform_changed(&mut self, changed: bool) {
        self.transform_changed = changed;
        self.needs_update_trigger = changed;
    }

    pub fn set_needs_update_trigger(&mut self, trigger: bool) {
        self.needs_update_trigger = trigger;
    }

    /// Host undo hook.
    pub fn post_edit_undo(&mut self) {
        self.mark_changed(true);
    }

    pub fn import_as_reference(&self) -> bool {
        self.import_as_reference
    }

    pub fn set_import_as_reference(&mut self, as_reference: bool) {
        self.import_as_reference = as_reference;
    }

    pub fn can_delete_external_nodes(&self) -> bool {
        self.can_delete_external_nodes
    }

    /// Applies to child inputs as well.
    pub fn set_can_delete_external_nodes(&mut self, can_delete: bool) {
        self.can_delete_external_nodes = can_delete;
        for child in self.snapshot.children_mut() {
            child.set_can_delete_external_nodes(can_delete);
        }
    }

    // === Accessors ===

    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn kind(&self) -> InputObjectKind {
        self.kind
    }

    pub fn source(&self) -> SoftRef {
        self.source
    }

    pub fn handles(&self) -> NodeHandles {
        self.handles
    }

    pub fn node_id(&self) -> NodeId {
        self.handles.node_id()
    }

    pub fn object_node_id(&self) -> NodeId {
        self.handles.object_node_id()
    }

    pub fn set_node_id(&mut self, id: NodeId) {
        self.handles.set_node_id(id);
    }

    pub fn set_object_node_id(&mut self, id: NodeId) {
        self.handles.set_object_node_id(id);
    }

    pub fn snapshot(&self) -> &InputSnapshot {
        &self.snapshot
    }

    /// Blueprint meshes or actor components.
    pub fn children(&self) -> &[InputObject] {
        self.snapshot.children()
    }
}

impl Drop for InputObject {
    fn drop(&mut self) {
        self.invalidate();
    }
}

impl fmt::Debug for InputObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputObject")
            .field("uuid", &self.uuid)
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("source", &self.source)
            .field("handles", &self.handles)
            .field("borrowed", &self.borrowed)
            .field("has_changed", &self.has_changed)
            .field("can_delete_external_nodes", &self.can_delete_external_nodes)
            .field("snapshot", &self.snapshot)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SyncSettings;
    use crate::core::memory_scene::{MemoryObject, MemoryScene};
    use crate::core::pending_delete::PendingDeleteQueue;
    use crate::entities::context::RecordingReleaser;
    use crate::entities::brush_input::BrushType;
    use crate::entities::context::test_context;
    use crate::entities::object_type::ObjectType;
    use crate::entities::source::WorldId;
    use crate::entities::transform::{Bounds, Transform};
    use glam::{DQuat, DVec3};

    fn mesh_component(scene: &MemoryScene) -> (ObjectId, ObjectId) {
        let mesh = scene.spawn(MemoryObject::new(ObjectType::StaticMesh));
        let smc = scene.spawn(MemoryObject::new(ObjectType::StaticMeshComponent).with_static_mesh(mesh));
        (mesh, smc)
    }

    #[test]
    fn test_create_snapshots_and_marks_changed() {
        let (scene, _queue, ctx) = test_context();
        let (mesh, smc) = mesh_component(&scene);
        let input = InputObject::create(&ctx, InputObjectKind::MeshComponent, Some(smc), "input_0", "Chair")
            .expect("input");
        assert!(input.has_changed());
        assert_eq!(input.name(), "InputObject_SMC_Chair");
        assert_eq!(input.source().id(), Some(smc));
        assert_eq!(input.handles(), NodeHandles::NONE);
        match input.snapshot() {
            InputSnapshot::MeshComponent(s) => assert_eq!(s.static_mesh, Some(mesh)),
            other => panic!("unexpected snapshot {:?}", other),
        }

        let second = InputObject::create(&ctx, InputObjectKind::MeshComponent, Some(smc), "input_0", "Chair")
            .expect("input");
        assert_eq!(second.name(), "InputObject_SMC_Chair_1");
        assert_ne!(second.uuid(), input.uuid());
    }

    #[test]
    fn test_create_rejects_absent_or_invalid() {
        let (scene, _queue, ctx) = test_context();
        let (_mesh, smc) = mesh_component(&scene);
        assert!(InputObject::create(&ctx, InputObjectKind::MeshComponent, None, "o", "n").is_none());
        assert!(InputObject::create(&ctx, InputObjectKind::Invalid, Some(smc), "o", "n").is_none());
        assert!(InputObject::create_typed(&ctx, None, "o", "n").is_none());
        scene.destroy(smc);
        assert!(InputObject::create_typed(&ctx, Some(smc), "o", "n").is_none());
    }

    #[test]
    fn test_create_typed_classifies() {
        let (scene, _queue, ctx) = test_context();
        let ismc = scene.spawn(MemoryObject::new(ObjectType::HierarchicalInstancedStaticMeshComponent));
        let input = InputObject::create_typed(&ctx, Some(ismc), "o", "Trees").expect("input");
        assert_eq!(input.kind(), InputObjectKind::InstancedMeshComponent);
        assert_eq!(input.name(), "InputObject_ISMC_Trees");
    }

    #[test]
    fn test_generic_scene_components_setting() {
        let scene = Arc::new(MemoryScene::new());
        let queue = Arc::new(PendingDeleteQueue::new());
        let settings = SyncSettings { wrap_generic_scene_components: false, ..Default::default() };
        let ctx = InputContext::with_settings(scene.clone(), queue, settings);
        let actor = scene.spawn(MemoryObject::new(ObjectType::Actor));
        let generic = scene.attach_component(actor, MemoryObject::new(ObjectType::SceneComponent));
        let spline = scene.attach_component(actor, MemoryObject::new(ObjectType::SplineComponent));

        assert!(InputObject::create_typed(&ctx, Some(generic), "o", "g").is_none());
        let input = InputObject::create(&ctx, InputObjectKind::Actor, Some(actor), "o", "a").expect("input");
        assert_eq!(input.children().len(), 1);
        assert_eq!(input.children()[0].source().id(), Some(spline));
    }

    #[test]
    fn test_invalidate_is_idempotent() {
        let (scene, queue, ctx) = test_context();
        let (_mesh, smc) = mesh_component(&scene);
        let mut input = InputObject::create(&ctx, InputObjectKind::MeshComponent, Some(smc), "o", "n").expect("input");
        input.set_node_id(3);
        input.set_object_node_id(5);

        input.invalidate();
        input.invalidate();
        assert_eq!(input.node_id(), -1);
        assert_eq!(input.object_node_id(), -1);
        input.dispose();
        assert_eq!(queue.drain(), vec![3, 5]);
    }

    #[test]
    fn test_drop_releases_handles() {
        let (scene, queue, ctx) = test_context();
        let (_mesh, smc) = mesh_component(&scene);
        {
            let mut input = InputObject::create(&ctx, InputObjectKind::MeshComponent, Some(smc), "o", "n").expect("input");
            input.set_node_id(21);
        }
        assert_eq!(queue.drain(), vec![21]);
    }

    #[test]
    fn test_suppressed_deletion_only_clears() {
        let (scene, queue, ctx) = test_context();
        let (_mesh, smc) = mesh_component(&scene);
        let mut input = InputObject::create(&ctx, InputObjectKind::MeshComponent, Some(smc), "o", "n").expect("input");
        input.set_node_id(3);
        input.set_can_delete_external_nodes(false);
        input.invalidate();
        assert_eq!(input.node_id(), -1);
        drop(input);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_procedural_asset_adopts_and_never_releases() {
        let (scene, queue, ctx) = test_context();
        let hac = scene.spawn(MemoryObject::new(ObjectType::ProceduralAssetComponent).with_asset_node(42));
        let mut input = InputObject::create_typed(&ctx, Some(hac), "o", "Rocks").expect("input");
        assert_eq!(input.kind(), InputObjectKind::ProceduralAssetComponent);
        assert_eq!(input.node_id(), 42);
        assert_eq!(input.object_node_id(), 42);
        assert_eq!(input.name(), "InputObject_HAC_Rocks");

        input.invalidate();
        assert_eq!(input.node_id(), -1);
        drop(input);
        assert!(queue.is_empty());

        let no_asset = scene.spawn(MemoryObject::new(ObjectType::ProceduralAssetComponent));
        let unbuilt = InputObject::create_typed(&ctx, Some(no_asset), "o", "Empty").expect("input");
        assert_eq!(unbuilt.node_id(), -1);
        assert_eq!(unbuilt.object_node_id(), -1);
        drop(unbuilt);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_actor_keeps_unbuilt_procedural_asset() {
        let (scene, _queue, ctx) = test_context();
        let actor = scene.spawn(MemoryObject::new(ObjectType::Actor).named("Cliff"));
        let hac = scene.attach_component(actor, MemoryObject::new(ObjectType::ProceduralAssetComponent));
        let input = InputObject::create_typed(&ctx, Some(actor), "o", "Cliff").expect("input");
        assert_eq!(input.children().len(), 1);
        assert_eq!(input.children()[0].source().id(), Some(hac));
        assert_eq!(input.children()[0].node_id(), -1);
    }

    #[test]
    fn test_duplicate_procedural_asset_keeps_node() {
        let (scene, queue, ctx) = test_context();
        let hac = scene.spawn(MemoryObject::new(ObjectType::ProceduralAssetComponent).with_asset_node(42));
        let input = InputObject::create_typed(&ctx, Some(hac), "o", "Rocks").expect("input");
        let copy = input.duplicate_and_copy_state("o");
        assert_eq!(copy.node_id(), 42);
        assert!(copy.matches(&input));
        drop(copy);
        drop(input);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_snapshot_diff_round_trip() {
        let (scene, _queue, ctx) = test_context();
        let (_mesh, smc) = mesh_component(&scene);
        let other_mesh = scene.spawn(MemoryObject::new(ObjectType::StaticMesh));
        let mut input = InputObject::create(&ctx, InputObjectKind::MeshComponent, Some(smc), "o", "n").expect("input");
        assert!(!input.has_changed_since_snapshot());

        scene.edit(smc, |c| c.static_mesh = Some(other_mesh));
        assert!(input.has_component_changed());
        // Queries leave the snapshot alone
        assert!(input.has_component_changed());

        input.refresh();
        assert!(!input.has_component_changed());
        assert!(!input.has_changed_since_snapshot());
    }

    #[test]
    fn test_absent_source_reports_no_drift() {
        let (scene, _queue, ctx) = test_context();
        let ismc = scene.spawn(
            MemoryObject::new(ObjectType::InstancedStaticMeshComponent).with_instances(vec![Transform::IDENTITY]),
        );
        let input = InputObject::create_typed(&ctx, Some(ismc), "o", "n").expect("input");
        scene.edit(ismc, |c| {
            c.instances.clear();
            c.transform = Transform::from_translation(DVec3::X);
        });
        assert!(input.has_component_transform_changed());

        scene.destroy(ismc);
        assert!(!input.has_actor_transform_changed());
        assert!(!input.has_component_transform_changed());
        assert!(!input.has_component_changed());
        assert!(!input.has_content_changed());
        assert!(!input.has_instances_changed());
        assert!(!input.has_changed_since_snapshot());
    }

    #[test]
    fn test_instance_drift_end_to_end() {
        let (scene, _queue, ctx) = test_context();
        let ismc = scene.spawn(
            MemoryObject::new(ObjectType::InstancedStaticMeshComponent)
                .with_instances(vec![Transform::IDENTITY, Transform::from_translation(DVec3::X)]),
        );
        let mut input = InputObject::create_typed(&ctx, Some(ismc), "o", "n").expect("input");
        assert!(!input.has_instances_changed());

        scene.edit(ismc, |c| c.instances[0].rotation = DQuat::from_rotation_x(0.2));
        assert!(input.has_instances_changed());
        assert!(input.has_component_transform_changed());
        input.refresh();

        scene.edit(ismc, |c| {
            c.instances.pop();
        });
        assert!(input.has_instances_changed());
    }

    #[test]
    fn test_spline_end_to_end() {
        let (scene, _queue, ctx) = test_context();
        let points: Vec<Transform> = (0..3)
            .map(|i| Transform::from_translation(DVec3::new(i as f64, 0.0, 0.0)))
            .collect();
        let spline = scene.spawn(MemoryObject::new(ObjectType::SplineComponent).with_spline(points, false));
        let mut input = InputObject::create_typed(&ctx, Some(spline), "o", "Path").expect("input");
        assert!(!input.has_component_changed());

        scene.edit(spline, |s| s.spline_points.push(Transform::from_translation(DVec3::new(3.0, 0.0, 0.0))));
        assert!(input.has_component_changed());

        input.refresh();
        assert!(!input.has_component_changed());
        assert!(!input.has_spline_component_changed(1.0));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic]
    fn test_update_with_wrong_type_asserts() {
        let (scene, _queue, ctx) = test_context();
        let spline = scene.spawn(MemoryObject::new(ObjectType::SplineComponent));
        let (_mesh, smc) = mesh_component(&scene);
        let mut input = InputObject::create_typed(&ctx, Some(spline), "o", "n").expect("input");
        input.update(Some(smc));
    }

    #[test]
    fn test_update_to_vanished_source() {
        let (scene, _queue, ctx) = test_context();
        let (_mesh, smc) = mesh_component(&scene);
        let gone = scene.spawn(MemoryObject::new(ObjectType::StaticMeshComponent));
        scene.destroy(gone);
        let mut input = InputObject::create_typed(&ctx, Some(smc), "o", "n").expect("input");
        input.update(Some(gone));
        assert_eq!(input.source().id(), Some(gone));
        assert!(!input.has_changed_since_snapshot());
    }

    #[test]
    fn test_matches() {
        let (scene, _queue, ctx) = test_context();
        let (_mesh, smc) = mesh_component(&scene);
        let mut a = InputObject::create_typed(&ctx, Some(smc), "o", "a").expect("input");
        let mut b = InputObject::create_typed(&ctx, Some(smc), "o", "b").expect("input");
        assert!(a.matches(&b));
        a.set_node_id(1);
        assert!(!a.matches(&b));
        b.set_node_id(1);
        assert!(a.matches(&b));
        b.set_node_id(-1);
        b.set_object_node_id(1);
        assert!(!a.matches(&b));
    }

    #[test]
    fn test_duplicate_shares_no_handles() {
        let (scene, queue, ctx) = test_context();
        let actor = scene.spawn(MemoryObject::new(ObjectType::Actor).named("Crate"));
        scene.attach_component(actor, MemoryObject::new(ObjectType::SceneComponent));
        let mut input = InputObject::create(&ctx, InputObjectKind::Actor, Some(actor), "input_0", "Crate")
            .expect("input");
        input.set_node_id(7);
        input.set_object_node_id(8);
        input.set_import_as_reference(true);

        let copy = input.duplicate_and_copy_state("input_0");
        assert_ne!(copy.uuid(), input.uuid());
        assert_eq!(copy.name(), "InputObject_Actor_Crate_1");
        assert_eq!(copy.handles(), NodeHandles::NONE);
        assert_eq!(copy.source(), input.source());
        assert!(copy.import_as_reference());
        assert!(copy.has_changed());
        assert_eq!(copy.children().len(), 1);
        assert_ne!(copy.children()[0].uuid(), input.children()[0].uuid());

        drop(copy);
        assert!(queue.is_empty());
        drop(input);
        assert_eq!(queue.drain(), vec![7, 8]);
    }

    #[test]
    fn test_duplicate_into_other_owner() {
        let (scene, _queue, ctx) = test_context();
        let (_mesh, smc) = mesh_component(&scene);
        let input = InputObject::create_typed(&ctx, Some(smc), "input_0", "n").expect("input");
        let copy = input.duplicate_and_copy_state("input_1");
        assert_eq!(copy.name(), input.name());
        assert_eq!(copy.owner(), "input_1");
    }

    #[test]
    fn test_copy_state_moves_handles() {
        let (scene, queue, ctx) = test_context();
        let (_mesh, smc) = mesh_component(&scene);
        let mut from = InputObject::create_typed(&ctx, Some(smc), "o", "from").expect("input");
        from.set_node_id(10);
        from.set_object_node_id(11);
        from.mark_changed(false);
        from.mark_transform_changed(true);

        let mut to = InputObject::create_typed(&ctx, Some(smc), "o", "to").expect("input");
        to.set_node_id(2);
        to.copy_state_from(&from, false);

        assert_eq!(queue.drain(), vec![2]);
        assert_eq!(to.node_id(), 10);
        assert_eq!(to.object_node_id(), 11);
        assert!(to.can_delete_external_nodes());
        assert!(!to.has_changed());
        assert!(to.transform_changed());
        assert!(to.needs_update_trigger());

        // The adopted handles stay with `from`
        drop(to);
        assert!(queue.is_empty());
        drop(from);
        assert_eq!(queue.drain(), vec![10, 11]);
    }

    #[test]
    fn test_handles_assigned_after_adoption_are_released() {
        let (scene, queue, ctx) = test_context();
        let (_mesh, smc) = mesh_component(&scene);
        let mut from = InputObject::create_typed(&ctx, Some(smc), "o", "from").expect("input");
        from.set_node_id(10);
        let mut to = InputObject::create_typed(&ctx, Some(smc), "o", "to").expect("input");
        to.copy_state_from(&from, false);

        drop(from);
        assert_eq!(queue.drain(), vec![10]);
        to.invalidate();
        assert!(queue.is_empty());

        to.set_node_id(20);
        to.set_object_node_id(21);
        drop(to);
        assert_eq!(queue.drain(), vec![20, 21]);
    }

    #[test]
    fn test_partial_reassignment_after_adoption() {
        let (scene, queue, ctx) = test_context();
        let (_mesh, smc) = mesh_component(&scene);
        let mut from = InputObject::create_typed(&ctx, Some(smc), "o", "from").expect("input");
        from.set_node_id(10);
        from.set_object_node_id(11);
        let mut to = InputObject::create_typed(&ctx, Some(smc), "o", "to").expect("input");
        to.copy_state_from(&from, false);

        // Only the replaced handle belongs to `to`
        to.set_node_id(30);
        drop(to);
        assert_eq!(queue.drain(), vec![30]);
        drop(from);
        assert_eq!(queue.drain(), vec![10, 11]);
    }

    #[test]
    fn test_copy_all_copies_source_and_snapshot() {
        let (scene, _queue, ctx) = test_context();
        let (_mesh_a, smc_a) = mesh_component(&scene);
        let (mesh_b, smc_b) = mesh_component(&scene);
        let mut from = InputObject::create_typed(&ctx, Some(smc_b), "o", "from").expect("input");
        from.set_import_as_reference(true);
        let mut to = InputObject::create_typed(&ctx, Some(smc_a), "o", "to").expect("input");

        to.copy_state_from(&from, true);
        assert_eq!(to.source().id(), Some(smc_b));
        assert!(to.import_as_reference());
        match to.snapshot() {
            InputSnapshot::MeshComponent(s) => assert_eq!(s.static_mesh, Some(mesh_b)),
            other => panic!("unexpected snapshot {:?}", other),
        }
        // Empty handles on both sides: deletion rights untouched
        assert!(to.can_delete_external_nodes());
    }

    #[test]
    fn test_copy_state_resets_procedural_spline_source() {
        let (scene, _queue, ctx) = test_context();
        let curve = scene.spawn(MemoryObject::new(ObjectType::ProceduralSplineComponent));
        let from = InputObject::create_typed(&ctx, Some(curve), "o", "a").expect("input");
        let mut to = InputObject::create_typed(&ctx, Some(curve), "o", "b").expect("input");
        to.copy_state_from(&from, true);
        assert!(to.source().is_null());
        assert!(from.duplicate_and_copy_state("o").source().is_null());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic]
    fn test_copy_state_across_kinds_asserts() {
        let (scene, _queue, ctx) = test_context();
        let (mesh, smc) = mesh_component(&scene);
        let from = InputObject::create_typed(&ctx, Some(mesh), "o", "a").expect("input");
        let mut to = InputObject::create_typed(&ctx, Some(smc), "o", "b").expect("input");
        to.copy_state_from(&from, false);
    }

    #[test]
    fn test_blueprint_children_follow_deletion_rights() {
        let (scene, queue, ctx) = test_context();
        let rock = scene.spawn(MemoryObject::new(ObjectType::StaticMesh));
        let bp = scene.spawn(MemoryObject::new(ObjectType::Blueprint).with_blueprint_meshes(vec![rock]));
        let mut input = InputObject::create_typed(&ctx, Some(bp), "o", "BP").expect("input");
        assert_eq!(input.children().len(), 1);

        input.set_can_delete_external_nodes(false);
        assert!(!input.children()[0].can_delete_external_nodes());
        input.set_can_delete_external_nodes(true);
        assert!(input.children()[0].can_delete_external_nodes());

        input.set_can_delete_external_nodes(false);
        input.refresh();
        assert!(!input.children()[0].can_delete_external_nodes());
        input.set_can_delete_external_nodes(true);

        input.set_node_id(1);
        input.copy_state_from(&InputObject::create_typed(&ctx, Some(bp), "o", "BP").expect("input"), true);
        assert_eq!(queue.drain(), vec![1]);
        assert_eq!(input.children().len(), 1);
    }

    #[test]
    fn test_flags() {
        let (scene, _queue, ctx) = test_context();
        let (_mesh, smc) = mesh_component(&scene);
        let mut input = InputObject::create_typed(&ctx, Some(smc), "o", "n").expect("input");
        input.mark_changed(false);
        assert!(!input.has_changed());
        assert!(!input.needs_update_trigger());

        input.post_edit_undo();
        assert!(input.has_changed());
        assert!(input.needs_update_trigger());

        input.mark_changed(false);
        input.mark_transform_changed(true);
        assert!(input.transform_changed());
        assert!(input.needs_update_trigger());
        input.set_needs_update_trigger(false);
        assert!(!input.needs_update_trigger());
    }

    #[test]
    fn test_actor_aggregates_child_drift() {
        let (scene, _queue, ctx) = test_context();
        let actor = scene.spawn(MemoryObject::new(ObjectType::Actor));
        let other = scene.spawn(MemoryObject::new(ObjectType::StaticMesh));
        let smc = scene.attach_component(actor, MemoryObject::new(ObjectType::StaticMeshComponent));
        let input = InputObject::create_typed(&ctx, Some(actor), "o", "n").expect("input");
        assert!(!input.has_changed_since_snapshot());

        scene.edit(smc, |c| c.static_mesh = Some(other));
        assert!(!input.has_actor_transform_changed());
        assert!(input.has_changed_since_snapshot());
    }

    fn brush_scene() -> (Arc<MemoryScene>, Arc<RecordingReleaser>, Arc<InputContext>, ObjectId, ObjectId) {
        let (scene, queue, ctx) = test_context();
        let world = WorldId(0);
        let bounds = |x: f64| Bounds::new(DVec3::new(x, 0.0, 0.0), DVec3::splat(1.0));
        let add = scene.spawn(
            MemoryObject::new(ObjectType::Brush)
                .named("Room")
                .in_world(world)
                .with_brush(BrushType::Add, bounds(0.0)),
        );
        let sub = scene.spawn(
            MemoryObject::new(ObjectType::Brush)
                .named("Door")
                .in_world(world)
                .with_brush(BrushType::Subtract, bounds(1.0)),
        );
        (scene, queue, ctx, add, sub)
    }

    #[test]
    fn test_brush_content_change() {
        let (scene, _queue, ctx, add, sub) = brush_scene();
        let mut input = InputObject::create_typed(&ctx, Some(add), "o", "Room").expect("input");
        assert_eq!(input.kind(), InputObjectKind::Brush);
        assert!(!input.is_ignored());

        let brushes = input.find_intersecting_subtractive_brushes();
        assert_eq!(brushes, vec![add, sub]);
        input.update_cached_data(Some(ObjectId(500)), &brushes);
        assert_eq!(input.combined_model(), Some(ObjectId(500)));
        assert_eq!(input.brushes_info().len(), 2);
        assert!(!input.has_content_changed());

        scene.edit(sub, |b| b.transform = Transform::from_translation(DVec3::new(0.0, 0.0, 0.5)));
        assert!(input.has_content_changed());
        let brushes = input.find_intersecting_subtractive_brushes();
        input.update_cached_data(Some(ObjectId(501)), &brushes);
        assert!(!input.has_content_changed());

        // Subtractive brush moved away
        scene.edit(sub, |b| b.bounds = Some(Bounds::new(DVec3::splat(100.0), DVec3::ONE)));
        assert!(input.has_content_changed());
    }

    #[test]
    fn test_ignored_brush() {
        let (scene, _queue, ctx, _add, sub) = brush_scene();
        let mut input = InputObject::create_typed(&ctx, Some(sub), "o", "Door").expect("input");
        assert!(input.is_ignored());
        assert!(input.should_ignore_this_input());

        scene.edit(sub, |b| b.transform = Transform::from_translation(DVec3::X));
        assert!(!input.has_actor_transform_changed());
        assert!(!input.has_content_changed());

        // Flipping the brush type always counts
        scene.edit(sub, |b| b.brush_type = Some(BrushType::Add));
        assert!(input.has_content_changed());
        assert!(!input.should_ignore_this_input());

        input.refresh();
        assert!(!input.is_ignored());
        assert!(!input.has_actor_transform_changed());
    }

    #[test]
    fn test_brush_source_lost_is_ignored() {
        let (scene, _queue, ctx, add, _sub) = brush_scene();
        let mut input = InputObject::create_typed(&ctx, Some(add), "o", "Room").expect("input");
        scene.destroy(add);
        input.refresh();
        assert!(input.is_ignored());
        assert!(input.should_ignore_this_input());
        assert!(!input.has_content_changed());
        assert!(input.find_intersecting_subtractive_brushes().is_empty());
    }
}
