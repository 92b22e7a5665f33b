//=======================================================================//
// IMPORTS
//
//=======================================================================//

use crate::{
    identifiers::{EntityId, EntityKind},
    world::{
        context::EditContext,
        entities::{PathKind, PathNode, PlanningConnection, PlanningConnectionEntity, PlanningHub, PlanningHubEntity},
        EntityCollection
    }
};

//=======================================================================//
// TYPES
//
//=======================================================================//

/// Appends an entity with a pre-allocated id; reverting removes it by id and stashes it back inside
/// the edit. Never coalesces: two inserts are always two distinct entities.
#[must_use]
#[derive(Debug)]
pub struct Insert<K>
where
    K: EntityKind,
    crate::world::World: EntityCollection<K>
{
    entity_id: EntityId<K>,
    entity:    Option<<crate::world::World as crate::world::EntityStore<K>>::Entity>
}

impl<K> Insert<K>
where
    K: EntityKind,
    crate::world::World: EntityCollection<K>
{
    #[inline]
    pub fn new(
        entity_id: EntityId<K>,
        entity: <crate::world::World as crate::world::EntityStore<K>>::Entity
    ) -> Self
    {
        Self { entity_id, entity: Some(entity) }
    }

    #[inline]
    pub fn apply(&mut self, ctx: &mut EditContext)
    {
        let entity = self.entity.take().expect("Insert applied twice without an intervening revert");
        ctx.world.insert_entity(self.entity_id, entity);
    }

    #[inline]
    pub fn revert(&mut self, ctx: &mut EditContext)
    {
        let entity = ctx
            .world
            .remove_entity(self.entity_id)
            .expect("Insert target missing on revert");
        self.entity = Some(entity);
    }

    /// `Insert` never coalesces: two inserts are always two distinct entities.
    #[inline]
    #[must_use]
    pub fn is_coalescable(&self, _other: &Self) -> bool { false }

    #[inline]
    pub fn coalesce(&mut self, _other: Self) { unreachable!("Insert never reports coalescable") }
}

//=======================================================================//

/// Removes an entity by id, stashing it for restoration on revert. The exact structural
/// inverse of [`Insert`]. Never coalesces.
#[must_use]
#[derive(Debug)]
pub struct Delete<K>
where
    K: EntityKind,
    crate::world::World: EntityCollection<K>
{
    entity_id: EntityId<K>,
    entity:    Option<<crate::world::World as crate::world::EntityStore<K>>::Entity>
}

impl<K> Delete<K>
where
    K: EntityKind,
    crate::world::World: EntityCollection<K>
{
    #[inline]
    pub fn new(entity_id: EntityId<K>) -> Self { Self { entity_id, entity: None } }

    #[inline]
    pub fn apply(&mut self, ctx: &mut EditContext)
    {
        let entity = ctx
            .world
            .remove_entity(self.entity_id)
            .expect("Delete target missing on apply");
        self.entity = Some(entity);
    }

    #[inline]
    pub fn revert(&mut self, ctx: &mut EditContext)
    {
        let entity = self.entity.take().expect("Delete reverted without a prior apply");
        ctx.world.insert_entity(self.entity_id, entity);
    }

    #[inline]
    #[must_use]
    pub fn is_coalescable(&self, _other: &Self) -> bool { false }

    #[inline]
    pub fn coalesce(&mut self, _other: Self) { unreachable!("Delete never reports coalescable") }
}

//=======================================================================//

/// Removes a [`PlanningHub`] together with every [`PlanningConnectionEntity`] that references it as
/// `start` or `end`, so reverting never leaves a connection dangling on a hub id nothing points at.
/// The generic [`Delete`] can't carry this cascade since it stays uniform across every entity kind.
/// Never coalesces.
#[must_use]
#[derive(Debug)]
pub struct DeletePlanningHub
{
    hub_id:      EntityId<PlanningHub>,
    hub:         Option<PlanningHubEntity>,
    connections: Vec<(EntityId<PlanningConnection>, PlanningConnectionEntity)>
}

impl DeletePlanningHub
{
    #[inline]
    pub fn new(hub_id: EntityId<PlanningHub>) -> Self
    {
        Self { hub_id, hub: None, connections: Vec::new() }
    }

    #[inline]
    pub fn apply(&mut self, ctx: &mut EditContext)
    {
        let hub = ctx
            .world
            .planning_hubs
            .remove(&self.hub_id)
            .expect("DeletePlanningHub target missing");

        let dangling: Vec<_> = ctx
            .world
            .planning_connections
            .iter()
            .filter(|(_, connection)| connection.start == self.hub_id || connection.end == self.hub_id)
            .map(|(id, _)| *id)
            .collect();

        self.connections = dangling
            .into_iter()
            .map(|id| {
                let connection = ctx
                    .world
                    .planning_connections
                    .remove(&id)
                    .expect("dangling connection vanished between scan and removal");
                (id, connection)
            })
            .collect();

        self.hub = Some(hub);
    }

    #[inline]
    pub fn revert(&mut self, ctx: &mut EditContext)
    {
        let hub = self.hub.take().expect("DeletePlanningHub reverted without a prior apply");
        ctx.world.planning_hubs.insert(self.hub_id, hub);

        for (id, connection) in self.connections.drain(..)
        {
            ctx.world.planning_connections.insert(id, connection);
        }
    }

    #[inline]
    #[must_use]
    pub fn is_coalescable(&self, _other: &Self) -> bool { false }

    #[inline]
    pub fn coalesce(&mut self, _other: Self)
    {
        unreachable!("DeletePlanningHub never reports coalescable")
    }
}

//=======================================================================//

/// Inserts a node at `index` into a path's node list, shifting every later node one slot forward.
/// Never coalesces.
#[must_use]
#[derive(Debug)]
pub struct InsertNode
{
    path_id: EntityId<PathKind>,
    index:   usize,
    node:    Option<PathNode>
}

impl InsertNode
{
    #[inline]
    pub fn new(path_id: EntityId<PathKind>, index: usize, node: PathNode) -> Self
    {
        Self { path_id, index, node: Some(node) }
    }

    #[inline]
    pub fn apply(&mut self, ctx: &mut EditContext)
    {
        let node = self.node.take().expect("InsertNode applied twice without a revert");
        let path = ctx.world.paths.get_mut(&self.path_id).expect("InsertNode path missing");
        path.insert_node(self.index, node);
    }

    #[inline]
    pub fn revert(&mut self, ctx: &mut EditContext)
    {
        let path = ctx.world.paths.get_mut(&self.path_id).expect("InsertNode path missing");
        self.node = Some(path.remove_node(self.index));
    }

    #[inline]
    #[must_use]
    pub fn is_coalescable(&self, _other: &Self) -> bool { false }

    #[inline]
    pub fn coalesce(&mut self, _other: Self) { unreachable!("InsertNode never reports coalescable") }
}

//=======================================================================//

/// Removes the node at `index` from a path's node list. The exact structural inverse of
/// [`InsertNode`].
#[must_use]
#[derive(Debug)]
pub struct DeleteNode
{
    path_id: EntityId<PathKind>,
    index:   usize,
    node:    Option<PathNode>
}

impl DeleteNode
{
    #[inline]
    pub fn new(path_id: EntityId<PathKind>, index: usize) -> Self
    {
        Self { path_id, index, node: None }
    }

    #[inline]
    pub fn apply(&mut self, ctx: &mut EditContext)
    {
        let path = ctx.world.paths.get_mut(&self.path_id).expect("DeleteNode path missing");
        self.node = Some(path.remove_node(self.index));
    }

    #[inline]
    pub fn revert(&mut self, ctx: &mut EditContext)
    {
        let node = self.node.take().expect("DeleteNode reverted without a prior apply");
        let path = ctx.world.paths.get_mut(&self.path_id).expect("DeleteNode path missing");
        path.insert_node(self.index, node);
    }

    #[inline]
    #[must_use]
    pub fn is_coalescable(&self, _other: &Self) -> bool { false }

    #[inline]
    pub fn coalesce(&mut self, _other: Self) { unreachable!("DeleteNode never reports coalescable") }
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
    use crate::world::{entities::ObjectKind, World};

    fn object() -> crate::world::entities::Object
    {
        crate::world::entities::Object {
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
    fn insert_then_revert_removes_the_entity()
    {
        let mut ctx = EditContext::new();
        let id: EntityId<ObjectKind> = ctx.world.next_object_id();

        let mut edit = Insert::new(id, object());
        edit.apply(&mut ctx);
        assert!(ctx.world.objects.contains_key(&id));

        edit.revert(&mut ctx);
        assert!(!ctx.world.objects.contains_key(&id));
    }

    #[test]
    fn delete_then_revert_restores_the_entity()
    {
        let mut ctx = EditContext::new();
        let id = ctx.world.next_object_id();
        ctx.world.objects.insert(id, object());

        let mut edit = Delete::new(id);
        edit.apply(&mut ctx);
        assert!(!ctx.world.objects.contains_key(&id));

        edit.revert(&mut ctx);
        assert_eq!(ctx.world.objects[&id].name, "soldier");
    }

    #[test]
    fn deleting_a_hub_also_removes_its_dangling_connections()
    {
        use crate::world::entities::{AiPathFlags, PlanningConnectionEntity, PlanningHubEntity};

        let mut ctx = EditContext::new();
        let hub_a = ctx.world.next_planning_hub_id();
        let hub_b = ctx.world.next_planning_hub_id();

        ctx.world.planning_hubs.insert(hub_a, PlanningHubEntity {
            name: "a".to_owned(),
            layer: None,
            position: Vec3::ZERO,
            radius: 1.0,
            branch_weights: Vec::new()
        });
        ctx.world.planning_hubs.insert(hub_b, PlanningHubEntity {
            name: "b".to_owned(),
            layer: None,
            position: Vec3::ZERO,
            radius: 1.0,
            branch_weights: Vec::new()
        });

        let connection_id = ctx.world.next_planning_connection_id();
        ctx.world.planning_connections.insert(connection_id, PlanningConnectionEntity {
            name: "a_to_b".to_owned(),
            layer: None,
            start: hub_a,
            end: hub_b,
            flags: AiPathFlags::default(),
            jump: false,
            jetjump: false,
            oneway: false,
            dynamic_group: None
        });

        let mut edit = DeletePlanningHub::new(hub_a);
        edit.apply(&mut ctx);
        assert!(!ctx.world.planning_hubs.contains_key(&hub_a));
        assert!(!ctx.world.planning_connections.contains_key(&connection_id));

        edit.revert(&mut ctx);
        assert!(ctx.world.planning_hubs.contains_key(&hub_a));
        assert_eq!(ctx.world.planning_connections[&connection_id].start, hub_a);
    }

    #[test]
    fn insert_node_then_revert_restores_original_indices()
    {
        let mut ctx = EditContext::new();
        let path_id = ctx.world.path_ids.new_id();
        ctx.world.paths.insert(path_id, Default::default());

        let node = PathNode {
            position:       Vec3::ONE,
            standby_time:   0.0,
            movement_speed: 1.0
        };

        let mut edit = InsertNode::new(path_id, 0, node);
        edit.apply(&mut ctx);
        assert_eq!(ctx.world.paths[&path_id].len(), 1);

        edit.revert(&mut ctx);
        assert!(ctx.world.paths[&path_id].is_empty());
    }
}
