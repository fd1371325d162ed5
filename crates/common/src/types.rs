use serde::{Deserialize, Serialize};

use crate::math::Vector2;

/// Collision shape of a body.
///
/// Rectangles collide by their axis-aligned hitbox, circles use the hitbox
/// width as radius. Polygons can be described and drawn but have no
/// narrow-phase test.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    #[default]
    Rectangle,
    Circle,
    Polygon,
}

/// An axis-aligned rectangle in world units, used for the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Vector2,
    pub max: Vector2,
}

impl Bounds {
    pub const fn new(min: Vector2, max: Vector2) -> Self {
        Self { min, max }
    }

    /// Bounds anchored at the origin with the given width and height.
    pub const fn from_size(width: f32, height: f32) -> Self {
        Self {
            min: Vector2::ZERO,
            max: Vector2::new(width, height),
        }
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn contains(&self, p: Vector2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::from_size(800.0, 600.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bounds_match_canvas() {
        let b = Bounds::default();
        assert_eq!(b.width(), 800.0);
        assert_eq!(b.height(), 600.0);
    }

    #[test]
    fn contains_is_inclusive() {
        let b = Bounds::from_size(10.0, 10.0);
        assert!(b.contains(Vector2::new(0.0, 10.0)));
        assert!(!b.contains(Vector2::new(-0.1, 5.0)));
    }

    #[test]
    fn shape_defaults_to_rectangle() {
        assert_eq!(ShapeKind::default(), ShapeKind::Rectangle);
    }
}
