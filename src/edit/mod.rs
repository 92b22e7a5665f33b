//=======================================================================//
// MODULES
//
//=======================================================================//

pub mod class_name;
pub mod creation;
pub mod entity_edits;
pub mod field;
pub mod layer;
pub mod property;
pub mod terrain;

//=======================================================================//
// IMPORTS
//
//=======================================================================//

use glam::{Quat, Vec3};

use crate::{
    object_class::ClassHandles,
    world::{
        context::EditContext,
        entities::{BranchWeight, LightingSettings, ObjectKind, PathNode, PlanningHub, Polygon}
    }
};

//=======================================================================//
// MACROS
//
//=======================================================================//

/// Generates [`EditKind`]'s `apply`/`revert`/`is_coalescable`/`coalesce` dispatch. Variants listed in
/// `plain` forward straight to the wrapped type's own methods; variants listed in `classed` also
/// thread the `&dyn ClassHandles` through (they touch an object's class handle).
macro_rules! edit_kind
{
    (plain: [$($plain:ident),+ $(,)?], classed: [$($classed:ident),+ $(,)?]) =>
    {
        #[inline]
        pub fn apply(&mut self, ctx: &mut EditContext, classes: &dyn ClassHandles)
        {
            match self
            {
                $(Self::$plain(e) => e.apply(ctx),)+
                $(Self::$classed(e) => e.apply(ctx, classes),)+
            }
        }

        #[inline]
        pub fn revert(&mut self, ctx: &mut EditContext, classes: &dyn ClassHandles)
        {
            match self
            {
                $(Self::$plain(e) => e.revert(ctx),)+
                $(Self::$classed(e) => e.revert(ctx, classes),)+
            }
        }

        #[inline]
        #[must_use]
        pub fn is_coalescable(&self, other: &Self) -> bool
        {
            match (self, other)
            {
                $((Self::$plain(a), Self::$plain(b)) => a.is_coalescable(b),)+
                $((Self::$classed(a), Self::$classed(b)) => a.is_coalescable(b),)+
                _ => false
            }
        }

        #[inline]
        pub fn coalesce(&mut self, other: Self)
        {
            match (self, other)
            {
                $((Self::$plain(a), Self::$plain(b)) => a.coalesce(b),)+
                $((Self::$classed(a), Self::$classed(b)) => a.coalesce(b),)+
                _ => panic!("coalesce called on a non-coalescable pair of edits")
            }
        }
    };
}

//=======================================================================//
// TYPES
//
//=======================================================================//

/// Every concrete edit the engine can apply, as a closed tagged union rather than `Box<dyn Edit>`
/// (REDESIGN FLAGS: a fixed, enumerable set of edit shapes doesn't need open-ended dispatch, and the
/// enum lets `EditStack` match same-variant pairs for coalescing without a downcast). `SetClassName`
/// and `CreationEntitySet` are the only variants that touch an object's class handle, so only they
/// need the `&dyn ClassHandles` the stack threads through every apply/revert.
#[must_use]
#[derive(Debug)]
pub enum EditKind
{
    SetObjectPosition(field::SetField<ObjectKind, Vec3>),
    SetObjectRotation(field::SetField<ObjectKind, Quat>),
    SetObjectScale(field::SetField<ObjectKind, Vec3>),
    SetObjectName(field::SetField<ObjectKind, String>),
    SetPlanningHubBranchWeight(field::SetFieldIndexed<PlanningHub, BranchWeight>),
    SetPathNodePosition(field::SetPathNodeField<Vec3>),
    SetPathNodeStandbyTime(field::SetPathNodeField<f32>),
    SetPathNodeMovementSpeed(field::SetPathNodeField<f32>),
    InsertObject(entity_edits::Insert<ObjectKind>),
    DeleteObject(entity_edits::Delete<ObjectKind>),
    DeletePlanningHub(entity_edits::DeletePlanningHub),
    InsertPathNode(entity_edits::InsertNode),
    DeletePathNode(entity_edits::DeleteNode),
    SetObjectProperty(property::SetObjectProperty),
    SetWorldLighting(field::SetWorldField<LightingSettings>),
    CreationValuePosition(creation::CreationValue<Vec3>),
    CreationValueScale(creation::CreationValue<Vec3>),
    CreationValueWithMeta(creation::CreationValueWithMeta),
    /// Moves the anchor point of a staged [`crate::world::context::EntityGroup`] (copy-paste/prefab)
    /// before the paste is committed.
    CreationLocation(creation::CreationValue<Vec3>),
    /// Edits the node currently being placed while a path is drawn interactively.
    CreationPathNodeValue(creation::CreationValue<PathNode>),
    CreationRegionMetrics(creation::CreationValue<Polygon>),
    CreationSectorPoint(creation::CreationValue<Polygon>),
    CreationPortalSize(creation::CreationValue<Polygon>),
    CreationBarrierMetrics(creation::CreationValue<Polygon>),
    /// Drags the far endpoint of a [`crate::world::entities::Measurement`] under construction; the
    /// near endpoint is fixed when the tool is first clicked and never revisited by this edit.
    CreationMeasurementPoints(creation::CreationValue<Vec3>),
    SetTerrainArea(terrain::SetTerrainArea),
    RenameLayer(layer::RenameLayer),
    DeleteWorldReqList(layer::DeleteWorldReqList),
    SetClassName(class_name::SetClassName),
    CreationEntitySet(creation::CreationEntitySet)
}

impl EditKind
{
    edit_kind!(
        plain: [
            SetObjectPosition,
            SetObjectRotation,
            SetObjectScale,
            SetObjectName,
            SetPlanningHubBranchWeight,
            SetPathNodePosition,
            SetPathNodeStandbyTime,
            SetPathNodeMovementSpeed,
            InsertObject,
            DeleteObject,
            DeletePlanningHub,
            InsertPathNode,
            DeletePathNode,
            SetObjectProperty,
            SetWorldLighting,
            CreationValuePosition,
            CreationValueScale,
            CreationValueWithMeta,
            CreationLocation,
            CreationPathNodeValue,
            CreationRegionMetrics,
            CreationSectorPoint,
            CreationPortalSize,
            CreationBarrierMetrics,
            CreationMeasurementPoints,
            SetTerrainArea,
            RenameLayer,
            DeleteWorldReqList
        ],
        classed: [SetClassName, CreationEntitySet]
    );
}

//=======================================================================//

/// Two ordered sequences of applied and reverted edits, plus a coalescing mode. Apply
/// always clears *reverted*; revert/reapply move edits between the two sequences, each reverting or
/// re-applying them in turn, so a full revert followed by a full reapply reproduces the exact
/// sequence of `apply` calls that would have happened without the detour.
#[must_use]
#[derive(Default)]
pub struct EditStack
{
    applied:  Vec<EditKind>,
    reverted: Vec<EditKind>,
    /// Whether the top of `applied` is eligible to coalesce with the next edit pushed. Closed by
    /// default; a caller opens it for the duration of an interactive gesture (e.g. a pointer drag)
    /// and calls [`Self::close_last`] when the gesture ends.
    open: bool
}

impl EditStack
{
    #[inline]
    pub fn new() -> Self { Self::default() }

    /// Marks the stack open for coalescing: the next [`Self::apply`] may fold into the current top
    /// of `applied` instead of pushing a new entry.
    #[inline]
    pub fn open_gesture(&mut self) { self.open = true; }

    /// Ends the current gesture: the top of `applied` becomes ineligible for further coalescence.
    #[inline]
    pub fn close_last(&mut self) { self.open = false; }

    /// Applies `edit`. If the stack is open and coalescable with the current top, the top is
    /// reverted, folded into `edit`, and the coalesced edit is applied and pushed in its place;
    /// otherwise `edit` is applied and pushed as-is. Either way, `reverted` is cleared.
    #[inline]
    pub fn apply(&mut self, mut edit: EditKind, ctx: &mut EditContext, classes: &dyn ClassHandles)
    {
        if self.open
        {
            if let Some(top) = self.applied.last()
            {
                if edit.is_coalescable(top)
                {
                    let mut top = self.applied.pop().expect("checked Some above");
                    top.revert(ctx, classes);
                    edit.coalesce(top);
                }
            }
        }

        edit.apply(ctx, classes);
        self.applied.push(edit);
        self.reverted.clear();
    }

    /// Reverts up to `n` edits from `applied`, most recent first, pushing each onto `reverted`.
    /// Saturates at `applied`'s length.
    #[inline]
    pub fn revert(&mut self, n: usize, ctx: &mut EditContext, classes: &dyn ClassHandles)
    {
        for _ in 0..n.min(self.applied.len())
        {
            let mut edit = self.applied.pop().expect("bounded by applied.len()");
            edit.revert(ctx, classes);
            self.reverted.push(edit);
        }
    }

    /// Symmetric to [`Self::revert`]: re-applies up to `n` edits from `reverted` back onto `applied`,
    /// in the order they were originally applied.
    #[inline]
    pub fn reapply(&mut self, n: usize, ctx: &mut EditContext, classes: &dyn ClassHandles)
    {
        for _ in 0..n.min(self.reverted.len())
        {
            let mut edit = self.reverted.pop().expect("bounded by reverted.len()");
            edit.apply(ctx, classes);
            self.applied.push(edit);
        }
    }

    #[inline]
    pub fn revert_all(&mut self, ctx: &mut EditContext, classes: &dyn ClassHandles)
    {
        self.revert(self.applied.len(), ctx, classes);
    }

    #[inline]
    pub fn reapply_all(&mut self, ctx: &mut EditContext, classes: &dyn ClassHandles)
    {
        self.reapply(self.reverted.len(), ctx, classes);
    }

    #[inline]
    #[must_use]
    pub fn applied_len(&self) -> usize { self.applied.len() }

    #[inline]
    #[must_use]
    pub fn reverted_len(&self) -> usize { self.reverted.len() }
}

//=======================================================================//
// TESTS
//
//=======================================================================//

#[cfg(test)]
mod tests
{
    use std::path::{Path as StdPath, PathBuf};

    use threadpool::ThreadPool;

    use super::*;
    use crate::{
        assets::library::{AssetLibrary, AssetLoadError, AssetLoader},
        object_class::{MeshModel, ObjectClassLibrary, OdfDefinition},
        world::entities::Object
    };

    struct NullLoader<T>(std::marker::PhantomData<T>);

    impl<T: Default> AssetLoader<T> for NullLoader<T>
    {
        fn load(&self, _path: &StdPath) -> Result<T, AssetLoadError>
        {
            Ok(T::default())
        }
    }

    fn classes() -> ObjectClassLibrary<NullLoader<OdfDefinition>, NullLoader<MeshModel>>
    {
        let odfs = AssetLibrary::new(NullLoader(std::marker::PhantomData), ThreadPool::new(1));
        let meshes = AssetLibrary::new(NullLoader(std::marker::PhantomData), ThreadPool::new(1));
        odfs.add(PathBuf::from("soldier.odf"));
        meshes.add(PathBuf::from("soldier.msh"));
        ObjectClassLibrary::new(odfs, meshes)
    }

    fn object() -> Object
    {
        Object {
            name: "soldier".to_owned(),
            layer: None,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            class_name: String::new(),
            class_handle: Default::default(),
            properties: Default::default()
        }
    }

    #[test]
    fn revert_all_then_reapply_all_restores_the_same_state()
    {
        let classes = classes();
        let mut ctx = EditContext::new();
        let id = ctx.world.next_object_id();
        ctx.world.objects.insert(id, object());

        let mut stack = EditStack::new();

        let a = field::SetField::new(&mut ctx.world, id, |o: &mut Object| &mut o.position, Vec3::X);
        stack.apply(EditKind::SetObjectPosition(a), &mut ctx, &classes);

        let b = field::SetField::new(&mut ctx.world, id, |o: &mut Object| &mut o.scale, Vec3::ONE * 2.0);
        stack.apply(EditKind::SetObjectScale(b), &mut ctx, &classes);

        assert_eq!(ctx.world.objects[&id].position, Vec3::X);
        assert_eq!(ctx.world.objects[&id].scale, Vec3::ONE * 2.0);

        stack.revert_all(&mut ctx, &classes);
        assert_eq!(ctx.world.objects[&id].position, Vec3::ZERO);
        assert_eq!(ctx.world.objects[&id].scale, Vec3::ONE);

        stack.reapply_all(&mut ctx, &classes);
        assert_eq!(ctx.world.objects[&id].position, Vec3::X);
        assert_eq!(ctx.world.objects[&id].scale, Vec3::ONE * 2.0);
    }

    #[test]
    fn open_gesture_coalesces_consecutive_matching_edits()
    {
        let classes = classes();
        let mut ctx = EditContext::new();
        let id = ctx.world.next_object_id();
        ctx.world.objects.insert(id, object());

        let mut stack = EditStack::new();
        stack.open_gesture();

        let a = field::SetField::new(&mut ctx.world, id, |o: &mut Object| &mut o.position, Vec3::X);
        stack.apply(EditKind::SetObjectPosition(a), &mut ctx, &classes);

        let b = field::SetField::new(&mut ctx.world, id, |o: &mut Object| &mut o.position, Vec3::Y);
        stack.apply(EditKind::SetObjectPosition(b), &mut ctx, &classes);

        assert_eq!(stack.applied_len(), 1);

        stack.close_last();
        stack.revert_all(&mut ctx, &classes);
        assert_eq!(ctx.world.objects[&id].position, Vec3::ZERO);
    }

    #[test]
    fn apply_after_revert_truncates_the_reverted_sequence()
    {
        let classes = classes();
        let mut ctx = EditContext::new();
        let id = ctx.world.next_object_id();
        ctx.world.objects.insert(id, object());

        let mut stack = EditStack::new();
        let a = field::SetField::new(&mut ctx.world, id, |o: &mut Object| &mut o.position, Vec3::X);
        stack.apply(EditKind::SetObjectPosition(a), &mut ctx, &classes);
        stack.revert_all(&mut ctx, &classes);
        assert_eq!(stack.reverted_len(), 1);

        let b = field::SetField::new(&mut ctx.world, id, |o: &mut Object| &mut o.scale, Vec3::ONE * 3.0);
        stack.apply(EditKind::SetObjectScale(b), &mut ctx, &classes);
        assert_eq!(stack.reverted_len(), 0);
    }

    #[test]
    fn creation_path_node_value_edits_the_last_node_under_construction()
    {
        use crate::world::{context::CreationEntity, entities::PathNode, path::Path};

        let classes = classes();
        let mut ctx = EditContext::new();
        let mut path = Path::default();
        path.insert_node(0, PathNode {
            position:       Vec3::ZERO,
            standby_time:   0.0,
            movement_speed: 1.0
        });
        ctx.creation = CreationEntity::Path(path);

        let mut stack = EditStack::new();
        let edit = creation::CreationValue::new(
            &mut ctx,
            |c: &mut CreationEntity| &mut c.as_path_mut().unwrap().last_node_mut().unwrap().position,
            Vec3::new(4.0, 0.0, 0.0)
        );
        stack.apply(EditKind::CreationPathNodeValue(edit), &mut ctx, &classes);
        assert_eq!(ctx.creation.as_path_mut().unwrap().last_node_mut().unwrap().position.x, 4.0);

        stack.revert_all(&mut ctx, &classes);
        assert_eq!(ctx.creation.as_path_mut().unwrap().last_node_mut().unwrap().position.x, 0.0);
    }

    #[test]
    fn creation_measurement_points_only_drags_the_far_endpoint()
    {
        use crate::world::{context::CreationEntity, entities::Measurement};

        let classes = classes();
        let mut ctx = EditContext::new();
        ctx.creation = CreationEntity::Measurement(Measurement {
            name:  String::new(),
            layer: None,
            from:  Vec3::ZERO,
            to:    Vec3::ZERO,
            label: None
        });

        let mut stack = EditStack::new();
        let edit = creation::CreationValue::new(
            &mut ctx,
            |c: &mut CreationEntity| &mut c.as_measurement_mut().unwrap().to,
            Vec3::new(10.0, 0.0, 0.0)
        );
        stack.apply(EditKind::CreationMeasurementPoints(edit), &mut ctx, &classes);

        assert_eq!(ctx.creation.as_measurement_mut().unwrap().from, Vec3::ZERO);
        assert_eq!(ctx.creation.as_measurement_mut().unwrap().to, Vec3::new(10.0, 0.0, 0.0));
    }
}
