//! Broadphase collision detection over a quadtree.

use std::collections::BTreeSet;

use hecs::Entity;
use tracing::trace;

use crate::geometry::Aabb;

use super::contact::ContactPair;
use super::quadtree::QuadTree;
use super::rigid_body::RigidBody;

/// Spatial partition of every body's bounding box, rebuilt each frame.
pub struct BroadPhase {
    tree: QuadTree<Entity>,
}

impl BroadPhase {
    pub fn new(bounds: Aabb, max_objects: usize, max_depth: u8) -> Self {
        Self {
            tree: QuadTree::new(bounds, max_objects, max_depth),
        }
    }

    pub fn tree(&self) -> &QuadTree<Entity> {
        &self.tree
    }

    /// Reinsert every body at its current bounds.
    pub fn rebuild(&mut self, bodies: &hecs::World) {
        self.tree.clear();
        for (entity, rb) in bodies.query::<&RigidBody>().iter() {
            self.tree.insert(rb.bounds(), entity);
        }
        trace!(bodies = self.tree.len(), "broadphase rebuilt");
    }

    /// Bodies whose bounds overlap `area`, as of the last rebuild.
    pub fn query(&self, area: &Aabb) -> Vec<Entity> {
        self.tree.query(area)
    }

    /// Find all pairs of bodies whose bounding boxes overlap.
    ///
    /// Only pairs where at least one body is active and dynamic are
    /// returned, sorted and without duplicates. When `visible` is given,
    /// both bodies must belong to it.
    pub fn find_pairs(
        &self,
        bodies: &hecs::World,
        visible: Option<&BTreeSet<Entity>>,
    ) -> Vec<ContactPair> {
        let admitted = |e: Entity| visible.map_or(true, |set| set.contains(&e));
        let mut pairs = BTreeSet::new();
        let mut candidates = Vec::new();

        for (entity, rb) in bodies.query::<&RigidBody>().iter() {
            if !rb.is_active() || rb.is_static() || !admitted(entity) {
                continue;
            }
            candidates.clear();
            self.tree.query_into(&rb.bounds(), &mut candidates);
            for &other in &candidates {
                if other != entity && admitted(other) {
                    pairs.insert(ContactPair::new(entity, other));
                }
            }
        }

        trace!(pairs = pairs.len(), "broadphase pairs");
        pairs.into_iter().collect()
    }
}
