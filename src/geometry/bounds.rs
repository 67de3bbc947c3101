use glam::Vec2;

use crate::math::EPSILON;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Create a new AABB. The corners are reordered if needed.
    pub fn new(a: Vec2, b: Vec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn from_center_half_extents(center: Vec2, half_extents: Vec2) -> Self {
        let half = half_extents.max(Vec2::ZERO);
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Create an AABB from a set of points. An empty set yields a
    /// degenerate box at the origin.
    pub fn from_points(points: impl IntoIterator<Item = Vec2>) -> Self {
        let mut min = Vec2::splat(f32::MAX);
        let mut max = Vec2::splat(f32::MIN);
        let mut any = false;

        for p in points {
            min = min.min(p);
            max = max.max(p);
            any = true;
        }

        if any {
            Self { min, max }
        } else {
            Self {
                min: Vec2::ZERO,
                max: Vec2::ZERO,
            }
        }
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn half_extents(&self) -> Vec2 {
        (self.max - self.min) * 0.5
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn area(&self) -> f32 {
        let size = self.size();
        size.x * size.y
    }

    /// Inclusive overlap test with [`EPSILON`] tolerance; touching boxes
    /// overlap.
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x + EPSILON
            && self.max.x + EPSILON >= other.min.x
            && self.min.y <= other.max.y + EPSILON
            && self.max.y + EPSILON >= other.min.y
    }

    #[inline]
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.min.x - EPSILON
            && point.x <= self.max.x + EPSILON
            && point.y >= self.min.y - EPSILON
            && point.y <= self.max.y + EPSILON
    }

    /// Whether `other` lies entirely inside this box.
    pub fn contains(&self, other: &Aabb) -> bool {
        self.contains_point(other.min) && self.contains_point(other.max)
    }

    /// Overlapping region, if any.
    pub fn intersection(&self, other: &Aabb) -> Option<Aabb> {
        let min = self.min.max(other.min);
        let max = self.max.min(other.max);
        if min.x <= max.x && min.y <= max.y {
            Some(Aabb { min, max })
        } else {
            None
        }
    }

    /// Area of the overlapping region, zero when disjoint.
    pub fn overlap_area(&self, other: &Aabb) -> f32 {
        self.intersection(other).map_or(0.0, |r| r.area())
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn expanded(&self, margin: f32) -> Aabb {
        Aabb {
            min: self.min - Vec2::splat(margin),
            max: self.max + Vec2::splat(margin),
        }
    }

    pub fn translated(&self, delta: Vec2) -> Aabb {
        Aabb {
            min: self.min + delta,
            max: self.max + delta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb_overlap() {
        let a = Aabb::new(Vec2::new(-1.0, -1.0), Vec2::new(1.0, 1.0));
        let b = Aabb::new(Vec2::new(0.5, 0.5), Vec2::new(2.0, 2.0));
        let c = Aabb::new(Vec2::new(2.0, 2.0), Vec2::new(3.0, 3.0));
        let touching = Aabb::new(Vec2::new(1.0, -1.0), Vec2::new(2.0, 1.0));
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c));
        assert!(a.overlaps(&touching));
    }

    #[test]
    fn test_aabb_from_points_and_reorder() {
        let aabb = Aabb::from_points([Vec2::new(3.0, -1.0), Vec2::new(-2.0, 4.0)]);
        assert_eq!(aabb.min, Vec2::new(-2.0, -1.0));
        assert_eq!(aabb.max, Vec2::new(3.0, 4.0));
        assert_eq!(Aabb::new(aabb.max, aabb.min), aabb);
        assert_eq!(Aabb::from_points(std::iter::empty()).area(), 0.0);
    }

    #[test]
    fn test_overlap_area() {
        let a = Aabb::from_center_half_extents(Vec2::ZERO, Vec2::splat(2.0));
        let b = Aabb::from_center_half_extents(Vec2::new(3.0, 3.0), Vec2::splat(2.0));
        assert!((a.overlap_area(&b) - 1.0).abs() < 1e-5);
        let far = a.translated(Vec2::new(10.0, 0.0));
        assert_eq!(a.overlap_area(&far), 0.0);
    }

    #[test]
    fn test_contains() {
        let outer = Aabb::from_center_half_extents(Vec2::ZERO, Vec2::splat(5.0));
        let inner = Aabb::from_center_half_extents(Vec2::new(1.0, 1.0), Vec2::splat(1.0));
        assert!(outer.contains(&inner));
        assert!(!inner.contains(&outer));
        assert!(outer.contains_point(Vec2::new(5.0, -5.0)));
    }
}
