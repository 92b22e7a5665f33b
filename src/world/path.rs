//=======================================================================//
// IMPORTS
//
//=======================================================================//

use serde::{Deserialize, Serialize};

use crate::world::entities::PathNode;

//=======================================================================//
// TYPES
//
//=======================================================================//

/// An ordered sequence of [`PathNode`]s an object patrols, grounded on the node-vector addressing
/// used by a `map::path` module: nodes are addressed by their position in the vector, so inserting
/// or erasing a node shifts the index of every later node. Edits that reference a node by index
/// (`SetPathNodeField`/`InsertNode`/`DeleteNode`) must be applied and reverted in strict LIFO order
/// relative to other node-index edits on the same path, or the indices they capture will drift.
#[must_use]
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Path
{
    nodes: Vec<PathNode>
}

impl Path
{
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize { self.nodes.len() }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool { self.nodes.is_empty() }

    #[inline]
    #[must_use]
    pub fn node(&self, index: usize) -> Option<&PathNode> { self.nodes.get(index) }

    #[inline]
    #[must_use]
    pub fn node_mut(&mut self, index: usize) -> Option<&mut PathNode> { self.nodes.get_mut(index) }

    /// The node currently being placed while a path is under interactive construction: always the
    /// last one appended.
    #[inline]
    #[must_use]
    pub fn last_node_mut(&mut self) -> Option<&mut PathNode> { self.nodes.last_mut() }

    #[inline]
    #[must_use]
    pub fn nodes(&self) -> &[PathNode] { &self.nodes }

    /// Inserts `node` at `index`, shifting every node at or after `index` one slot later.
    #[inline]
    pub fn insert_node(&mut self, index: usize, node: PathNode) { self.nodes.insert(index, node); }

    /// Removes and returns the node at `index`, shifting every later node one slot earlier.
    #[inline]
    pub fn remove_node(&mut self, index: usize) -> PathNode { self.nodes.remove(index) }
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

    fn node(x: f32) -> PathNode
    {
        PathNode {
            position:       Vec3::new(x, 0.0, 0.0),
            standby_time:   0.0,
            movement_speed: 1.0
        }
    }

    #[test]
    fn insert_shifts_later_nodes()
    {
        let mut path = Path::default();
        path.insert_node(0, node(0.0));
        path.insert_node(1, node(1.0));
        path.insert_node(1, node(0.5));

        assert_eq!(path.node(0).unwrap().position.x, 0.0);
        assert_eq!(path.node(1).unwrap().position.x, 0.5);
        assert_eq!(path.node(2).unwrap().position.x, 1.0);
    }

    #[test]
    fn remove_shifts_later_nodes_back()
    {
        let mut path = Path::default();
        path.insert_node(0, node(0.0));
        path.insert_node(1, node(1.0));
        path.insert_node(2, node(2.0));

        let removed = path.remove_node(1);
        assert_eq!(removed.position.x, 1.0);
        assert_eq!(path.node(1).unwrap().position.x, 2.0);
        assert_eq!(path.len(), 2);
    }
}
