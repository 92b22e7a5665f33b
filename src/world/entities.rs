//=======================================================================//
// IMPORTS
//
//=======================================================================//

use bitflags::bitflags;
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::{
    identifiers::{EntityId, EntityKind},
    object_class::ObjectClassHandle,
    world::properties::Value
};

//=======================================================================//
// ENTITY KINDS
//
//=======================================================================//

macro_rules! entity_kind {
    ($($kind:ident, $name:literal),+ $(,)?) => {$(
        #[allow(missing_docs)]
        #[derive(Debug)]
        pub struct $kind;

        impl EntityKind for $kind
        {
            const NAME: &'static str = $name;
        }
    )+};
}

entity_kind!(
    ObjectKind, "object",
    LightKind, "light",
    PathKind, "path",
    RegionKind, "region",
    SectorKind, "sector",
    PortalKind, "portal",
    HintNodeKind, "hint_node",
    BarrierKind, "barrier",
    PlanningHub, "planning_hub",
    PlanningConnection, "planning_connection",
    BoundaryKind, "boundary",
    MeasurementKind, "measurement"
);

//=======================================================================//
// TYPES
//
//=======================================================================//

bitflags! {
    /// Creature/vehicle traversal classes a [`PlanningConnection`] or [`BranchWeight`] is usable by,
    /// grounded on `original_source/src/world/ai_path_flags.hpp`.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct AiPathFlags: u32
    {
        const SOLDIER = 1 << 0;
        const HOVER   = 1 << 1;
        const SMALL   = 1 << 2;
        const MEDIUM  = 1 << 3;
        const HUGE    = 1 << 4;
        const FLYER   = 1 << 5;
    }
}

impl Default for AiPathFlags
{
    #[inline]
    fn default() -> Self { Self::empty() }
}

//=======================================================================//

/// A weighted branch taken by the AI planner out of a [`PlanningHub`], grounded on
/// `original_source/src/world/planning.hpp`'s `planning_hub::branch_weight`.
#[must_use]
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BranchWeight
{
    pub target_hub: String,
    pub connection: EntityId<PlanningConnection>,
    pub weight:     f32,
    pub flags:      AiPathFlags
}

//=======================================================================//

/// A placed instance of an object class. The invariant `class_handle.is_some() iff a class library
/// is attached` is enforced by [`crate::object_class::ObjectClassLibrary`], not by this struct:
/// `Object` itself only stores the class name, which is always valid.
#[must_use]
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Object
{
    pub name:       String,
    pub layer:      Option<u32>,
    pub position:   Vec3,
    /// Canonical orientation storage. The Euler-angle display used by the rotation widget is
    /// tracked separately, in `EditContext::euler_rotation`, and kept in sync by the creation-value
    /// edits that touch it.
    pub rotation:   Quat,
    pub scale:      Vec3,
    pub class_name: String,
    /// Handle into the attached [`crate::object_class::ObjectClassLibrary`], acquired for
    /// `class_name` on insert or class-name change. Not serialized: reloading a level reacquires it
    /// from `class_name`.
    #[serde(skip, default)]
    pub class_handle: ObjectClassHandle,
    pub properties: hashbrown::HashMap<String, Value>
}

//=======================================================================//

/// A point light.
#[must_use]
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Light
{
    pub name:     String,
    pub layer:    Option<u32>,
    pub position: Vec3,
    pub color:    [f32; 3],
    pub radius:   f32,
    pub intensity: f32
}

//=======================================================================//

/// A single node of a [`crate::world::path::Path`], addressable only through its owning path's
/// node vector: `PathNode` carries no id of its own, matching the original's node-index addressing
/// (resolved in favor of index addressing - see `DESIGN.md`).
#[must_use]
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PathNode
{
    pub position:       Vec3,
    pub standby_time:   f32,
    pub movement_speed: f32
}

//=======================================================================//

/// A convex polygonal trigger volume (`Region`/`Sector` share this shape but differ in semantics:
/// a `Region` fires scripted events, a `Sector` partitions the level for streaming). Most level
/// polygons are small, so vertices are stored inline up to 8 before spilling to the heap.
#[must_use]
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Polygon
{
    pub vertices: SmallVec<[Vec3; 8]>
}

#[must_use]
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Region
{
    pub name:   String,
    pub layer:  Option<u32>,
    pub shape:  Polygon,
    pub script: Option<String>
}

#[must_use]
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Sector
{
    pub name:  String,
    pub layer: Option<u32>,
    pub shape: Polygon
}

//=======================================================================//

/// A connection between two sectors that can be opened or closed at runtime.
#[must_use]
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Portal
{
    pub name:     String,
    pub layer:    Option<u32>,
    pub sector_a: EntityId<SectorKind>,
    pub sector_b: EntityId<SectorKind>,
    pub shape:    Polygon
}

//=======================================================================//

/// A named point used by scripted logic to reason about the world without a physical presence.
#[must_use]
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HintNode
{
    pub name:     String,
    pub layer:    Option<u32>,
    pub position: Vec3,
    pub hint:     String
}

//=======================================================================//

/// A blocking or openable obstacle placed along a path or sector boundary.
#[must_use]
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Barrier
{
    pub name:   String,
    pub layer:  Option<u32>,
    pub shape:  Polygon,
    pub height: f32
}

//=======================================================================//

/// A navigation-mesh waypoint the AI planner routes through, grounded on
/// `original_source/include/world/planning.hpp`'s `planning_hub`.
#[must_use]
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlanningHubEntity
{
    pub name:           String,
    pub layer:          Option<u32>,
    pub position:       Vec3,
    pub radius:         f32,
    pub branch_weights: Vec<BranchWeight>
}

//=======================================================================//

/// A directed traversable edge between two [`PlanningHub`]s, grounded on
/// `original_source/include/world/planning.hpp`'s `planning_connection`. Whether `start`/`end` are
/// string names or ids is resolved in favor of `EntityId<PlanningHub>` (see `DESIGN.md`): the
/// original addresses hubs by index into the same array the connection lives alongside, which an
/// `EntityId` models directly without a name lookup.
#[must_use]
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlanningConnectionEntity
{
    pub name:          String,
    pub layer:         Option<u32>,
    pub start:         EntityId<PlanningHub>,
    pub end:           EntityId<PlanningHub>,
    pub flags:         AiPathFlags,
    pub jump:          bool,
    pub jetjump:       bool,
    pub oneway:        bool,
    pub dynamic_group: Option<i32>
}

//=======================================================================//

/// A region that defines the outer playable bounds of the level.
#[must_use]
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Boundary
{
    pub name:  String,
    pub layer: Option<u32>,
    pub shape: Polygon
}

//=======================================================================//

/// A designer annotation recording a distance or angle between two points, purely informational.
#[must_use]
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Measurement
{
    pub name:  String,
    pub layer: Option<u32>,
    pub from:  Vec3,
    pub to:    Vec3,
    pub label: Option<String>
}

//=======================================================================//

/// A named, toggleable grouping of entities.
#[must_use]
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct LayerDescription
{
    pub name:    String,
    pub visible: bool,
    pub locked:  bool
}

//=======================================================================//

/// A named selection of layers plus its own asset requirements, grounded on
/// `original_source/tests/src/edits/rename_layer_tests.cpp`'s `game_mode` fixtures (e.g. `"conquest"`,
/// layer index `2`, a nested `requirements` list).
#[must_use]
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GameMode
{
    pub name:         String,
    pub layers:       Vec<u32>,
    pub requirements: Vec<Requirement>
}

//=======================================================================//

/// A list of asset-file entries a level or game mode declares it needs present to load, grounded on
/// `original_source/tests/src/edits/rename_layer_tests.cpp`'s `requirement_list` (`file_type` plus
/// `entries`).
#[must_use]
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Requirement
{
    pub file_type: String,
    pub entries:   Vec<String>
}

//=======================================================================//

/// World-level ambient lighting, grounded on `original_source/src/world/lighting_settings.hpp`.
#[must_use]
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LightingSettings
{
    pub global_lights:       [String; 2],
    pub ambient_sky_color:   Vec3,
    pub ambient_ground_color: Vec3,
    pub env_map_texture:     String
}

impl Default for LightingSettings
{
    #[inline]
    fn default() -> Self
    {
        Self {
            global_lights:        Default::default(),
            ambient_sky_color:    Vec3::splat(0.5),
            ambient_ground_color: Vec3::splat(0.3),
            env_map_texture:      String::new()
        }
    }
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
    fn ai_path_flags_default_to_empty()
    {
        assert_eq!(AiPathFlags::default(), AiPathFlags::empty());
    }

    #[test]
    fn ai_path_flags_combine()
    {
        let flags = AiPathFlags::SOLDIER | AiPathFlags::HOVER;
        assert!(flags.contains(AiPathFlags::SOLDIER));
        assert!(flags.contains(AiPathFlags::HOVER));
        assert!(!flags.contains(AiPathFlags::FLYER));
    }

    #[test]
    fn lighting_settings_default_matches_original_constants()
    {
        let lighting = LightingSettings::default();
        assert_eq!(lighting.ambient_sky_color, Vec3::splat(0.5));
        assert_eq!(lighting.ambient_ground_color, Vec3::splat(0.3));
        assert!(lighting.env_map_texture.is_empty());
    }
}
