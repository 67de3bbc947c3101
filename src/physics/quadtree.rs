//! Region quadtree over axis-aligned boxes.

use tracing::trace;

use crate::geometry::Aabb;

/// Quadtree storing `T` keyed by bounding box.
///
/// An item that does not fit entirely inside one quadrant stays in the node
/// where it straddles the split lines.
#[derive(Debug, Clone)]
pub struct QuadTree<T> {
    bounds: Aabb,
    max_objects: usize,
    max_depth: u8,
    /// level of nesting of this node
    level: u8,
    items: Vec<(Aabb, T)>,
    children: Option<Box<[QuadTree<T>; 4]>>,
}

impl<T: Copy> QuadTree<T> {
    pub fn new(bounds: Aabb, max_objects: usize, max_depth: u8) -> Self {
        Self {
            bounds,
            max_objects: max_objects.max(1),
            max_depth,
            level: 0,
            items: Vec::new(),
            children: None,
        }
    }

    fn nested(bounds: Aabb, parent: &QuadTree<T>) -> Self {
        Self {
            bounds,
            max_objects: parent.max_objects,
            max_depth: parent.max_depth,
            level: parent.level + 1,
            items: Vec::new(),
            children: None,
        }
    }

    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.children = None;
    }

    /// Number of stored items in this node and below.
    pub fn len(&self) -> usize {
        self.items.len()
            + self
                .children
                .as_ref()
                .map_or(0, |c| c.iter().map(QuadTree::len).sum())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Depth of the deepest node, the root being 0.
    pub fn depth(&self) -> u8 {
        self.children.as_ref().map_or(self.level, |c| {
            c.iter().map(QuadTree::depth).max().unwrap_or(self.level)
        })
    }

    pub fn insert(&mut self, aabb: Aabb, item: T) {
        if let Some(children) = &mut self.children {
            if let Some(index) = quadrant(&self.bounds, &aabb) {
                children[index].insert(aabb, item);
                return;
            }
        }

        self.items.push((aabb, item));

        if self.items.len() > self.max_objects && self.level < self.max_depth {
            if self.children.is_none() {
                trace!(level = self.level, "quadtree split");
                self.split();
            }
            let Some(children) = &mut self.children else {
                return;
            };
            let mut i = 0;
            while i < self.items.len() {
                match quadrant(&self.bounds, &self.items[i].0) {
                    Some(index) => {
                        let (aabb, item) = self.items.swap_remove(i);
                        children[index].insert(aabb, item);
                    }
                    None => i += 1,
                }
            }
        }
    }

    /// Items whose box overlaps `area`.
    pub fn query(&self, area: &Aabb) -> Vec<T> {
        let mut result = Vec::new();
        self.query_into(area, &mut result);
        result
    }

    pub fn query_into(&self, area: &Aabb, result: &mut Vec<T>) {
        result.extend(
            self.items
                .iter()
                .filter(|(aabb, _)| aabb.overlaps(area))
                .map(|(_, item)| *item),
        );
        if let Some(children) = &self.children {
            for child in children.iter() {
                if child.bounds.overlaps(area) {
                    child.query_into(area, result);
                }
            }
        }
    }

    fn split(&mut self) {
        let min = self.bounds.min;
        let center = self.bounds.center();
        let max = self.bounds.max;
        let quads = [
            Aabb::new(min, center),
            Aabb::new(glam::Vec2::new(center.x, min.y), glam::Vec2::new(max.x, center.y)),
            Aabb::new(glam::Vec2::new(min.x, center.y), glam::Vec2::new(center.x, max.y)),
            Aabb::new(center, max),
        ];
        self.children = Some(Box::new(quads.map(|b| QuadTree::nested(b, self))));
    }
}

/// Index of the quadrant of `bounds` that fully contains `aabb`.
fn quadrant(bounds: &Aabb, aabb: &Aabb) -> Option<usize> {
    let center = bounds.center();
    let left = aabb.max.x < center.x && aabb.min.x >= bounds.min.x;
    let right = aabb.min.x > center.x && aabb.max.x <= bounds.max.x;
    let bottom = aabb.max.y < center.y && aabb.min.y >= bounds.min.y;
    let top = aabb.min.y > center.y && aabb.max.y <= bounds.max.y;
    match (left, right, bottom, top) {
        (true, _, true, _) => Some(0),
        (_, true, true, _) => Some(1),
        (true, _, _, true) => Some(2),
        (_, true, _, true) => Some(3),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn small_box(x: f32, y: f32) -> Aabb {
        Aabb::from_center_half_extents(Vec2::new(x, y), Vec2::splat(0.5))
    }

    #[test]
    fn test_split_and_query() {
        let mut tree = QuadTree::new(Aabb::new(Vec2::ZERO, Vec2::splat(100.0)), 2, 8);
        for i in 0..10 {
            tree.insert(small_box(10.0 + i as f32 * 2.0, 10.0), i);
        }
        tree.insert(small_box(90.0, 90.0), 100);
        assert_eq!(tree.len(), 11);
        assert!(tree.depth() > 0);

        let found = tree.query(&small_box(90.0, 90.0));
        assert_eq!(found, vec![100]);

        let mut near = tree.query(&Aabb::new(Vec2::new(9.0, 9.0), Vec2::new(13.0, 11.0)));
        near.sort();
        assert_eq!(near, vec![0, 1]);
    }

    #[test]
    fn test_straddling_item_stays_in_parent() {
        let mut tree = QuadTree::new(Aabb::new(Vec2::ZERO, Vec2::splat(100.0)), 1, 8);
        tree.insert(small_box(10.0, 10.0), 0);
        tree.insert(small_box(90.0, 10.0), 1);
        // Sits on the vertical split line.
        tree.insert(small_box(50.0, 20.0), 2);
        assert_eq!(tree.items.len(), 1);
        assert_eq!(tree.items[0].1, 2);
        assert_eq!(tree.query(&small_box(50.0, 20.0)), vec![2]);
    }

    #[test]
    fn test_depth_limit_and_clear() {
        let mut tree = QuadTree::new(Aabb::new(Vec2::ZERO, Vec2::splat(64.0)), 1, 3);
        for i in 0..20 {
            tree.insert(small_box(1.0, 1.0), i);
        }
        assert!(tree.depth() <= 3);
        assert_eq!(tree.len(), 20);
        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(tree.depth(), 0);
    }
}
