//=======================================================================//
// IMPORTS
//
//=======================================================================//

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::world::{
    entities::{Barrier, Boundary, Measurement, Object, Portal, Region, Sector},
    path::Path,
    World
};

//=======================================================================//
// TYPES
//
//=======================================================================//

/// A group of already-placed entities staged together, e.g. a copy-paste clipboard or a prefab
/// being assembled before insertion. Opaque beyond its member count and anchor: the edit engine only
/// needs to know a group is occupying the creation slot and where it will be dropped, not reach into
/// its members.
#[must_use]
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EntityGroup
{
    pub member_count: usize,
    /// The point the group will be inserted at, set interactively before the paste is committed.
    pub position: Vec3
}

//=======================================================================//

/// The entity currently being authored through the creation tools, represented as a closed sum
/// type over the entity kinds that can be created. Replaces the original's
/// pointer-to-abstract-creation-entity with a tagged variant, per the redesign flag favoring closed
/// enums over open-ended virtual dispatch for a fixed, small set of kinds.
#[must_use]
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub enum CreationEntity
{
    #[default]
    None,
    Object(Object),
    Path(Path),
    Region(Region),
    Sector(Sector),
    Portal(Portal),
    Barrier(Barrier),
    Boundary(Boundary),
    Measurement(Measurement),
    EntityGroup(EntityGroup)
}

impl CreationEntity
{
    #[inline]
    #[must_use]
    pub const fn is_none(&self) -> bool { matches!(self, Self::None) }

    #[inline]
    #[must_use]
    pub fn as_object(&self) -> Option<&Object>
    {
        match self
        {
            Self::Object(object) => Some(object),
            _ => None
        }
    }

    #[inline]
    #[must_use]
    pub fn as_object_mut(&mut self) -> Option<&mut Object>
    {
        match self
        {
            Self::Object(object) => Some(object),
            _ => None
        }
    }

    #[inline]
    #[must_use]
    pub fn as_path_mut(&mut self) -> Option<&mut Path>
    {
        match self
        {
            Self::Path(path) => Some(path),
            _ => None
        }
    }

    #[inline]
    #[must_use]
    pub fn as_region_mut(&mut self) -> Option<&mut Region>
    {
        match self
        {
            Self::Region(region) => Some(region),
            _ => None
        }
    }

    #[inline]
    #[must_use]
    pub fn as_sector_mut(&mut self) -> Option<&mut Sector>
    {
        match self
        {
            Self::Sector(sector) => Some(sector),
            _ => None
        }
    }

    #[inline]
    #[must_use]
    pub fn as_portal_mut(&mut self) -> Option<&mut Portal>
    {
        match self
        {
            Self::Portal(portal) => Some(portal),
            _ => None
        }
    }

    #[inline]
    #[must_use]
    pub fn as_barrier_mut(&mut self) -> Option<&mut Barrier>
    {
        match self
        {
            Self::Barrier(barrier) => Some(barrier),
            _ => None
        }
    }

    #[inline]
    #[must_use]
    pub fn as_measurement_mut(&mut self) -> Option<&mut Measurement>
    {
        match self
        {
            Self::Measurement(measurement) => Some(measurement),
            _ => None
        }
    }

    #[inline]
    #[must_use]
    pub fn as_entity_group_mut(&mut self) -> Option<&mut EntityGroup>
    {
        match self
        {
            Self::EntityGroup(group) => Some(group),
            _ => None
        }
    }
}

//=======================================================================//

/// Bundles the mutable [`World`] together with the entity currently under creation and the
/// ancillary per-session state the creation widgets need. Every edit targets an
/// `EditContext`, never a bare `World`, so creation-entity edits and world edits share one entry
/// point.
#[must_use]
#[derive(Default)]
pub struct EditContext
{
    pub world:    World,
    pub creation: CreationEntity,
    /// Euler-angle mirror of the creation object's canonical quaternion rotation, kept in sync by
    /// the "with meta" creation-value edits so the rotation widget can display and edit degrees
    /// without re-deriving them from the quaternion on every frame.
    pub euler_rotation: Vec3
}

impl EditContext
{
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
    fn fresh_context_has_no_creation_entity()
    {
        let ctx = EditContext::new();
        assert!(ctx.creation.is_none());
    }
}
