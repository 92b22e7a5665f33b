//=======================================================================//
// MODULES
//
//=======================================================================//

pub mod context;
pub mod entities;
pub mod path;
pub mod properties;
pub mod terrain;

//=======================================================================//
// IMPORTS
//
//=======================================================================//

use hashbrown::HashMap;
use paste::paste;

use crate::{
    identifiers::{EntityId, IdGenerator},
    world::{
        entities::{
            Barrier,
            BarrierKind,
            Boundary,
            BoundaryKind,
            GameMode,
            HintNode,
            HintNodeKind,
            LayerDescription,
            LightingSettings,
            Light,
            LightKind,
            Measurement,
            MeasurementKind,
            Object,
            ObjectKind,
            PathKind,
            PlanningConnection,
            PlanningConnectionEntity,
            PlanningHub,
            PlanningHubEntity,
            Portal,
            PortalKind,
            Region,
            RegionKind,
            Requirement,
            Sector,
            SectorKind
        },
        path::Path as PathEntity,
        terrain::Terrain
    }
};

//=======================================================================//
// TRAITS
//
//=======================================================================//

/// Maps an [`EntityId`]'s kind `K` to the entity struct it addresses inside a [`World`], and gives
/// mutable access to a live one. Lets the generic field-set edits in [`crate::edit`] reach the right
/// map without matching on `K` themselves.
pub trait EntityStore<K: crate::identifiers::EntityKind>
{
    /// The entity struct this kind stores.
    type Entity;

    /// Returns a mutable reference to the entity `id` names, if it is still live.
    fn entity_mut(&mut self, id: EntityId<K>) -> Option<&mut Self::Entity>;
}

/// Extends [`EntityStore`] with insertion and removal, used by the `Insert`/`Delete` edit pair.
pub trait EntityCollection<K: crate::identifiers::EntityKind>: EntityStore<K>
{
    /// Inserts `entity` under `id`, overwriting anything already there.
    fn insert_entity(&mut self, id: EntityId<K>, entity: Self::Entity);

    /// Removes and returns the entity `id` names, if any.
    fn remove_entity(&mut self, id: EntityId<K>) -> Option<Self::Entity>;
}

macro_rules! entity_store {
    ($(($kind:ty, $entity:ty, $field:ident, $ids:ident, $suffix:ident)),+ $(,)?) => {$(
        impl EntityStore<$kind> for World
        {
            type Entity = $entity;

            #[inline]
            fn entity_mut(&mut self, id: EntityId<$kind>) -> Option<&mut Self::Entity>
            {
                self.$field.get_mut(&id)
            }
        }

        impl EntityCollection<$kind> for World
        {
            #[inline]
            fn insert_entity(&mut self, id: EntityId<$kind>, entity: Self::Entity)
            {
                self.$field.insert(id, entity);
            }

            #[inline]
            fn remove_entity(&mut self, id: EntityId<$kind>) -> Option<Self::Entity>
            {
                self.$field.remove(&id)
            }
        }

        paste! {
            impl World
            {
                /// Allocates a fresh id for this kind without inserting anything. Used by edits
                /// that need to know the id an insertion will receive before building the edit to
                /// push.
                #[inline]
                pub fn [<next_ $suffix _id>](&mut self) -> EntityId<$kind> { self.$ids.new_id() }
            }
        }
    )+};
}

entity_store!(
    (ObjectKind, Object, objects, object_ids, object),
    (LightKind, Light, lights, light_ids, light),
    (PathKind, PathEntity, paths, path_ids, path),
    (RegionKind, Region, regions, region_ids, region),
    (SectorKind, Sector, sectors, sector_ids, sector),
    (PortalKind, Portal, portals, portal_ids, portal),
    (HintNodeKind, HintNode, hint_nodes, hint_node_ids, hint_node),
    (BarrierKind, Barrier, barriers, barrier_ids, barrier),
    (PlanningHub, PlanningHubEntity, planning_hubs, planning_hub_ids, planning_hub),
    (
        PlanningConnection,
        PlanningConnectionEntity,
        planning_connections,
        planning_connection_ids,
        planning_connection
    ),
    (BoundaryKind, Boundary, boundaries, boundary_ids, boundary),
    (MeasurementKind, Measurement, measurements, measurement_ids, measurement)
);

//=======================================================================//
// TYPES
//
//=======================================================================//

/// The full state of a level being edited: every entity collection, the terrain, and the
/// world-level metadata tables. Kept as one aggregate so an [`crate::edit::EditStack`]
/// can borrow it mutably for the duration of a single edit application.
#[must_use]
#[derive(Default)]
pub struct World
{
    pub objects:              HashMap<EntityId<ObjectKind>, Object>,
    pub object_ids:           IdGenerator<ObjectKind>,

    pub lights:               HashMap<EntityId<LightKind>, Light>,
    pub light_ids:            IdGenerator<LightKind>,

    pub paths:                HashMap<EntityId<PathKind>, PathEntity>,
    pub path_ids:             IdGenerator<PathKind>,

    pub regions:              HashMap<EntityId<RegionKind>, Region>,
    pub region_ids:           IdGenerator<RegionKind>,

    pub sectors:              HashMap<EntityId<SectorKind>, Sector>,
    pub sector_ids:           IdGenerator<SectorKind>,

    pub portals:              HashMap<EntityId<PortalKind>, Portal>,
    pub portal_ids:           IdGenerator<PortalKind>,

    pub hint_nodes:           HashMap<EntityId<HintNodeKind>, HintNode>,
    pub hint_node_ids:        IdGenerator<HintNodeKind>,

    pub barriers:             HashMap<EntityId<BarrierKind>, Barrier>,
    pub barrier_ids:          IdGenerator<BarrierKind>,

    pub planning_hubs:        HashMap<EntityId<PlanningHub>, PlanningHubEntity>,
    pub planning_hub_ids:     IdGenerator<PlanningHub>,

    pub planning_connections: HashMap<EntityId<PlanningConnection>, PlanningConnectionEntity>,
    pub planning_connection_ids: IdGenerator<PlanningConnection>,

    pub boundaries:           HashMap<EntityId<BoundaryKind>, Boundary>,
    pub boundary_ids:         IdGenerator<BoundaryKind>,

    pub measurements:         HashMap<EntityId<MeasurementKind>, Measurement>,
    pub measurement_ids:      IdGenerator<MeasurementKind>,

    pub layer_descriptions:   Vec<LayerDescription>,
    pub game_modes:           Vec<GameMode>,
    pub requirements:         Vec<Requirement>,
    /// Old names recorded by [`crate::edit::layer::RenameLayer`] so a later munge pass can clean up
    /// artifacts left under the layer's previous name.
    pub deleted_layers:       Vec<String>,

    pub terrain:              Terrain,
    pub lighting:             LightingSettings
}

impl World
{
    /// Returns a new, empty world with a default-sized terrain.
    #[inline]
    pub fn new() -> Self { Self::default() }
}

//=======================================================================//
// TESTS
//
//=======================================================================//

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn new_world_is_empty()
    {
        let world = World::new();
        assert!(world.objects.is_empty());
        assert!(world.planning_hubs.is_empty());
        assert_eq!(world.terrain.length, 32);
    }
}
