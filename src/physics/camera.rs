//! Cameras as visibility query regions.

use glam::Vec2;

use crate::geometry::{Aabb, Rectangle};

/// A view rectangle in world space.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    view: Rectangle,
}

impl Camera {
    pub fn new(view: Rectangle) -> Self {
        Self { view }
    }

    pub fn view(&self) -> &Rectangle {
        &self.view
    }

    pub fn set_view(&mut self, view: Rectangle) {
        self.view = view;
    }

    /// Centre the view on `center`.
    pub fn move_to(&mut self, center: Vec2) {
        self.view.set_position(center);
    }

    pub fn is_visible(&self, bounds: &Aabb) -> bool {
        self.view.bounds().overlaps(bounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_visibility() {
        let mut camera = Camera::new(Rectangle::new(Vec2::ZERO, Vec2::new(4.0, 3.0)));
        let near = Aabb::from_center_half_extents(Vec2::new(3.5, 0.0), Vec2::ONE);
        let far = Aabb::from_center_half_extents(Vec2::new(20.0, 0.0), Vec2::ONE);
        assert!(camera.is_visible(&near));
        assert!(!camera.is_visible(&far));

        camera.move_to(Vec2::new(20.0, 0.0));
        assert!(camera.is_visible(&far));
        assert!(!camera.is_visible(&near));
    }
}
