//=======================================================================//
// IMPORTS
//
//=======================================================================//

use crate::{
    identifiers::EntityId,
    world::{context::EditContext, entities::PathKind, path::Path, EntityStore}
};

//=======================================================================//
// TYPES
//
//=======================================================================//

/// Writes a single scalar field of an entity, remembering the value it overwrote. `field` is a plain
/// accessor function pointer rather than a closure so two `SetField`s touching the same field compare
/// equal and can coalesce.
#[must_use]
#[derive(Debug)]
pub struct SetField<K, F>
where
    K: crate::identifiers::EntityKind,
    crate::world::World: EntityStore<K>
{
    pub entity_id: EntityId<K>,
    pub field:     fn(&mut <crate::world::World as EntityStore<K>>::Entity) -> &mut F,
    pub new:       F,
    pub old:       F
}

impl<K, F> SetField<K, F>
where
    K: crate::identifiers::EntityKind,
    crate::world::World: EntityStore<K>,
    F: Clone
{
    /// Reads the current value of `field` on `entity_id` as `old`.
    #[inline]
    pub fn new(
        world: &mut crate::world::World,
        entity_id: EntityId<K>,
        field: fn(&mut <crate::world::World as EntityStore<K>>::Entity) -> &mut F,
        new: F
    ) -> Self
    {
        let old = (field)(world.entity_mut(entity_id).expect("SetField target missing")).clone();
        Self { entity_id, field, new, old }
    }

    #[inline]
    pub fn apply(&mut self, ctx: &mut EditContext)
    {
        let entity = ctx.world.entity_mut(self.entity_id).expect("SetField target missing");
        *(self.field)(entity) = self.new.clone();
    }

    #[inline]
    pub fn revert(&mut self, ctx: &mut EditContext)
    {
        let entity = ctx.world.entity_mut(self.entity_id).expect("SetField target missing");
        *(self.field)(entity) = self.old.clone();
    }

    #[inline]
    #[must_use]
    pub fn is_coalescable(&self, other: &Self) -> bool
    {
        self.entity_id == other.entity_id && self.field == other.field
    }

    /// Folds `other`, the edit immediately below `self` on the stack, into `self`: keeps `self.new`
    /// and adopts `other.old` so reverting restores the state before `other` was first applied.
    #[inline]
    pub fn coalesce(&mut self, other: Self) { self.old = other.old; }
}

//=======================================================================//

/// Writes one element of a `Vec<F>` field by index. Reverting with a stale `index` is a programming
/// error and panics, matching the fatal-on-corruption contract edits operate under.
#[must_use]
#[derive(Debug)]
pub struct SetFieldIndexed<K, F>
where
    K: crate::identifiers::EntityKind,
    crate::world::World: EntityStore<K>
{
    pub entity_id: EntityId<K>,
    pub field: fn(&mut <crate::world::World as EntityStore<K>>::Entity) -> &mut Vec<F>,
    pub index:     usize,
    pub new:       F,
    pub old:       F
}

impl<K, F> SetFieldIndexed<K, F>
where
    K: crate::identifiers::EntityKind,
    crate::world::World: EntityStore<K>,
    F: Clone
{
    #[inline]
    pub fn new(
        world: &mut crate::world::World,
        entity_id: EntityId<K>,
        field: fn(&mut <crate::world::World as EntityStore<K>>::Entity) -> &mut Vec<F>,
        index: usize,
        new: F
    ) -> Self
    {
        let entity = world.entity_mut(entity_id).expect("SetFieldIndexed target missing");
        let old = (field)(entity)[index].clone();
        Self { entity_id, field, index, new, old }
    }

    #[inline]
    pub fn apply(&mut self, ctx: &mut EditContext)
    {
        let entity = ctx.world.entity_mut(self.entity_id).expect("SetFieldIndexed target missing");
        (self.field)(entity)[self.index] = self.new.clone();
    }

    #[inline]
    pub fn revert(&mut self, ctx: &mut EditContext)
    {
        let entity = ctx.world.entity_mut(self.entity_id).expect("SetFieldIndexed target missing");
        (self.field)(entity)[self.index] = self.old.clone();
    }

    #[inline]
    #[must_use]
    pub fn is_coalescable(&self, other: &Self) -> bool
    {
        self.entity_id == other.entity_id && self.field == other.field && self.index == other.index
    }

    #[inline]
    pub fn coalesce(&mut self, other: Self) { self.old = other.old; }
}

//=======================================================================//

/// Writes a single scalar field of a path node, nested one level deeper than a plain entity (the
/// indexed variant is just `F = Vec<_>` element access through the same accessor, so one type covers
/// both).
#[must_use]
#[derive(Debug)]
pub struct SetPathNodeField<F>
{
    pub path_id:    EntityId<PathKind>,
    pub node_index: usize,
    pub field:      fn(&mut crate::world::entities::PathNode) -> &mut F,
    pub new:        F,
    pub old:        F
}

impl<F: Clone> SetPathNodeField<F>
{
    #[inline]
    pub fn new(
        path: &mut Path,
        path_id: EntityId<PathKind>,
        node_index: usize,
        field: fn(&mut crate::world::entities::PathNode) -> &mut F,
        new: F
    ) -> Self
    {
        let node = path.node_mut(node_index).expect("SetPathNodeField target node missing");
        let old = (field)(node).clone();
        Self { path_id, node_index, field, new, old }
    }

    #[inline]
    pub fn apply(&mut self, ctx: &mut EditContext)
    {
        let path = ctx.world.paths.get_mut(&self.path_id).expect("SetPathNodeField path missing");
        let node = path.node_mut(self.node_index).expect("SetPathNodeField target node missing");
        *(self.field)(node) = self.new.clone();
    }

    #[inline]
    pub fn revert(&mut self, ctx: &mut EditContext)
    {
        let path = ctx.world.paths.get_mut(&self.path_id).expect("SetPathNodeField path missing");
        let node = path.node_mut(self.node_index).expect("SetPathNodeField target node missing");
        *(self.field)(node) = self.old.clone();
    }

    #[inline]
    #[must_use]
    pub fn is_coalescable(&self, other: &Self) -> bool
    {
        self.path_id == other.path_id &&
            self.node_index == other.node_index &&
            self.field == other.field
    }

    #[inline]
    pub fn coalesce(&mut self, other: Self) { self.old = other.old; }
}

//=======================================================================//

/// Writes a single scalar field of [`crate::world::World`] itself, for world-level settings that
/// aren't entities (e.g. [`crate::world::entities::LightingSettings`]). Mirrors [`SetField`]'s
/// shape minus the `EntityId`.
#[must_use]
#[derive(Debug)]
pub struct SetWorldField<F>
{
    pub field: fn(&mut crate::world::World) -> &mut F,
    pub new:   F,
    pub old:   F
}

impl<F: Clone> SetWorldField<F>
{
    #[inline]
    pub fn new(
        world: &mut crate::world::World,
        field: fn(&mut crate::world::World) -> &mut F,
        new: F
    ) -> Self
    {
        let old = (field)(world).clone();
        Self { field, new, old }
    }

    #[inline]
    pub fn apply(&mut self, ctx: &mut EditContext) { *(self.field)(&mut ctx.world) = self.new.clone(); }

    #[inline]
    pub fn revert(&mut self, ctx: &mut EditContext) { *(self.field)(&mut ctx.world) = self.old.clone(); }

    #[inline]
    #[must_use]
    pub fn is_coalescable(&self, other: &Self) -> bool { self.field == other.field }

    #[inline]
    pub fn coalesce(&mut self, other: Self) { self.old = other.old; }
}

//=======================================================================//
// TESTS
//
//=======================================================================//

#[cfg(test)]
mod tests
{
    use glam::Vec3;

    use super::*;
    use crate::world::{entities::Object, World};

    fn object() -> Object
    {
        Object {
            name: "soldier".to_owned(),
            layer: None,
            position: Vec3::ZERO,
            rotation: glam::Quat::IDENTITY,
            scale: Vec3::ONE,
            class_name: String::new(),
            class_handle: Default::default(),
            properties: Default::default()
        }
    }

    #[test]
    fn set_field_apply_then_revert_round_trips()
    {
        let mut world = World::new();
        let id = world.next_object_id();
        world.objects.insert(id, object());

        let mut ctx = EditContext::new();
        ctx.world = world;

        let mut edit = SetField::new(&mut ctx.world, id, |o: &mut Object| &mut o.position, Vec3::X);
        edit.apply(&mut ctx);
        assert_eq!(ctx.world.objects[&id].position, Vec3::X);

        edit.revert(&mut ctx);
        assert_eq!(ctx.world.objects[&id].position, Vec3::ZERO);
    }

    #[test]
    fn coalescing_keeps_the_earliest_old_value()
    {
        let mut world = World::new();
        let id = world.next_object_id();
        world.objects.insert(id, object());

        let first = SetField::new(&mut world, id, |o: &mut Object| &mut o.position, Vec3::X);
        let mut second = SetField::new(&mut world, id, |o: &mut Object| &mut o.position, Vec3::Y);

        assert!(second.is_coalescable(&first));
        second.coalesce(first);

        assert_eq!(second.old, Vec3::ZERO);
        assert_eq!(second.new, Vec3::Y);
    }

    #[test]
    fn different_fields_do_not_coalesce()
    {
        let mut world = World::new();
        let id = world.next_object_id();
        world.objects.insert(id, object());

        let position = SetField::new(&mut world, id, |o: &mut Object| &mut o.position, Vec3::X);
        let scale = SetField::new(&mut world, id, |o: &mut Object| &mut o.scale, Vec3::ONE * 2.0);

        assert!(!scale.is_coalescable(&position));
    }

    #[test]
    fn set_field_indexed_applies_only_at_its_index()
    {
        use crate::world::entities::{
            AiPathFlags,
            BranchWeight,
            PlanningConnection,
            PlanningHub,
            PlanningHubEntity
        };

        let mut world = World::new();
        let id = world.planning_hub_ids.new_id();
        world.planning_hubs.insert(id, PlanningHubEntity {
            name: "hub".to_owned(),
            layer: None,
            position: Vec3::ZERO,
            radius: 1.0,
            branch_weights: vec![
                BranchWeight {
                    target_hub: "other".to_owned(),
                    connection: EntityId::<PlanningConnection>::NONE,
                    weight:     1.0,
                    flags:      AiPathFlags::default()
                },
                BranchWeight {
                    target_hub: "other".to_owned(),
                    connection: EntityId::<PlanningConnection>::NONE,
                    weight:     2.0,
                    flags:      AiPathFlags::default()
                }
            ]
        });

        let mut edit = SetFieldIndexed::new(
            &mut world,
            id,
            |h: &mut PlanningHubEntity| &mut h.branch_weights,
            1,
            BranchWeight {
                target_hub: "other".to_owned(),
                connection: EntityId::<PlanningConnection>::NONE,
                weight:     9.0,
                flags:      AiPathFlags::default()
            }
        );

        let mut ctx = EditContext::new();
        ctx.world = world;

        edit.apply(&mut ctx);
        assert_eq!(ctx.world.planning_hubs[&id].branch_weights[0].weight, 1.0);
        assert_eq!(ctx.world.planning_hubs[&id].branch_weights[1].weight, 9.0);

        edit.revert(&mut ctx);
        assert_eq!(ctx.world.planning_hubs[&id].branch_weights[1].weight, 2.0);
    }

    #[test]
    fn set_world_field_apply_then_revert_round_trips()
    {
        use crate::world::entities::LightingSettings;

        let mut world = World::new();
        let new = LightingSettings {
            env_map_texture: "skybox.tga".to_owned(),
            ..Default::default()
        };

        let mut edit = SetWorldField::new(&mut world, |w| &mut w.lighting, new.clone());

        let mut ctx = EditContext::new();
        ctx.world = world;

        edit.apply(&mut ctx);
        assert_eq!(ctx.world.lighting.env_map_texture, "skybox.tga");

        edit.revert(&mut ctx);
        assert_eq!(ctx.world.lighting.env_map_texture, LightingSettings::default().env_map_texture);
    }
}
