use std::collections::BTreeSet;

use glam::Vec2;
use pwasson_common::{Bounds, CoreError, ShapeKind, Vector2};

slotmap::new_key_type! {
    /// Generation-checked handle to a body stored in a [`crate::World`].
    ///
    /// A handle outlives its body safely: once the body is removed the handle
    /// resolves to nothing, even if the slot is later reused.
    pub struct BodyKey;
}

/// Collision extents of a body, which may be inset from its visual size.
///
/// For rectangles the hitbox is centered on the visual rectangle and then
/// shifted by `offset`. For circles the center is the body position plus
/// `offset`, and `size.x` is the radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hitbox {
    pub offset: Vector2,
    pub size: Vector2,
}

/// State recorded at construction, restored by [`Body::reset_to_base`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaseState {
    pub position: Vector2,
    pub velocity: Vector2,
    pub size: Vector2,
    pub rotation: f32,
}

/// Physical and visual state of one entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    /// Optional label for the game layer.
    pub name: Option<String>,
    /// Top-left corner for rectangles, center for circles.
    pub position: Vector2,
    /// Displacement applied once per step.
    pub velocity: Vector2,
    /// Width and height. Circles use `size.x` as radius.
    pub size: Vector2,
    /// Rotation in degrees. Visual only: hitboxes stay axis-aligned.
    pub rotation: f32,
    pub shape: ShapeKind,
    pub hitbox: Hitbox,
    pub collision_group: u32,
    /// Groups this body collides against. Only the moving body's mask is consulted.
    pub collide_against: BTreeSet<u32>,
    /// Static bodies are never integrated or pushed.
    pub is_static: bool,
    pub gravity_affected: bool,
    /// Bodies with this cleared are skipped by the world step.
    pub needs_update: bool,
    /// Overrides the world friction for this body.
    pub friction: Option<Vector2>,
    pub(crate) last_collision_partner: Option<BodyKey>,
    base: BaseState,
}

impl Body {
    /// Create a body whose hitbox matches its visual size.
    pub fn new(shape: ShapeKind, position: Vector2, size: Vector2) -> Self {
        Self {
            name: None,
            position,
            velocity: Vector2::ZERO,
            size,
            rotation: 0.0,
            shape,
            hitbox: Hitbox {
                offset: Vector2::ZERO,
                size,
            },
            collision_group: 0,
            collide_against: BTreeSet::from([0]),
            is_static: false,
            gravity_affected: true,
            needs_update: true,
            friction: None,
            last_collision_partner: None,
            base: BaseState {
                position,
                velocity: Vector2::ZERO,
                size,
                rotation: 0.0,
            },
        }
    }

    pub fn rectangle(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(
            ShapeKind::Rectangle,
            Vector2::new(x, y),
            Vector2::new(width, height),
        )
    }

    pub fn circle(x: f32, y: f32, radius: f32) -> Self {
        Self::new(
            ShapeKind::Circle,
            Vector2::new(x, y),
            Vector2::new(radius, radius),
        )
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_group(mut self, group: u32) -> Self {
        self.collision_group = group;
        self
    }

    pub fn with_mask(mut self, groups: impl IntoIterator<Item = u32>) -> Self {
        self.collide_against = groups.into_iter().collect();
        self
    }

    pub fn with_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }

    pub fn with_gravity(mut self, gravity_affected: bool) -> Self {
        self.gravity_affected = gravity_affected;
        self
    }

    pub fn with_velocity(mut self, velocity: Vector2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_friction(mut self, friction: Vector2) -> Self {
        self.friction = Some(friction);
        self
    }

    pub fn with_hitbox(mut self, hitbox: Hitbox) -> Self {
        self.hitbox = hitbox;
        self
    }

    /// The collision partner remembered from the last resolution, if any.
    pub fn last_collision_partner(&self) -> Option<BodyKey> {
        self.last_collision_partner
    }

    pub fn base(&self) -> &BaseState {
        &self.base
    }

    /// Resize the hitbox, keeping its offset.
    pub fn set_hitbox_size(&mut self, size: Vector2) -> Result<(), CoreError> {
        if !size.is_finite() || size.x < 0.0 || size.y < 0.0 {
            return Err(CoreError::InvalidArgument(format!(
                "hitbox size must be finite and non-negative, got ({}, {})",
                size.x, size.y
            )));
        }
        self.hitbox.size = size;
        Ok(())
    }

    /// Restore position, velocity, size and rotation recorded at construction.
    pub fn reset_to_base(&mut self) {
        self.position = self.base.position;
        self.velocity = self.base.velocity;
        self.size = self.base.size;
        self.rotation = self.base.rotation;
        self.needs_update = true;
    }

    /// True when the body lies outside `bounds` by more than its own size on any side.
    pub fn is_offscreen(&self, bounds: &Bounds) -> bool {
        let p = self.position;
        let s = self.size;
        p.x - s.x > bounds.max.x
            || p.y - s.y > bounds.max.y
            || bounds.min.x - (p.x + s.x) > s.x
            || bounds.min.y - (p.y + s.y) > s.y
    }

    /// Visual hit test used for pointer picking.
    pub fn contains_point(&self, point: Vector2) -> bool {
        match self.shape {
            ShapeKind::Circle => {
                Vec2::from(point).distance_squared(self.position.into()) <= self.size.x * self.size.x
            }
            ShapeKind::Rectangle | ShapeKind::Polygon => {
                self.position.x <= point.x
                    && point.x <= self.position.x + self.size.x
                    && self.position.y <= point.y
                    && point.y <= self.position.y + self.size.y
            }
        }
    }

    /// Center of the collision extents.
    pub fn hitbox_center(&self) -> Vec2 {
        let offset = Vec2::from(self.hitbox.offset);
        match self.shape {
            ShapeKind::Circle => Vec2::from(self.position) + offset,
            ShapeKind::Rectangle | ShapeKind::Polygon => {
                Vec2::from(self.position) + Vec2::from(self.size) * 0.5 + offset
            }
        }
    }

    pub fn hitbox_half_extents(&self) -> Vec2 {
        Vec2::from(self.hitbox.size) * 0.5
    }

    /// Check that every value is finite and sizes are non-negative.
    pub fn validate(&self) -> Result<(), CoreError> {
        let finite = self.position.is_finite()
            && self.velocity.is_finite()
            && self.size.is_finite()
            && self.hitbox.offset.is_finite()
            && self.hitbox.size.is_finite()
            && self.rotation.is_finite()
            && self.friction.is_none_or(|f| f.is_finite());
        if !finite {
            return Err(CoreError::InvalidArgument(format!(
                "body {:?} has non-finite state",
                self.name
            )));
        }
        if self.size.x < 0.0 || self.size.y < 0.0 || self.hitbox.size.x < 0.0 || self.hitbox.size.y < 0.0 {
            return Err(CoreError::InvalidArgument(format!(
                "body {:?} has a negative size",
                self.name
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_body_defaults() {
        let b = Body::rectangle(10.0, 20.0, 30.0, 40.0);
        assert_eq!(b.collision_group, 0);
        assert!(b.collide_against.contains(&0));
        assert!(b.gravity_affected);
        assert!(b.needs_update);
        assert!(!b.is_static);
        assert_eq!(b.hitbox.size, b.size);
        assert!(b.last_collision_partner().is_none());
    }

    #[test]
    fn reset_restores_construction_state() {
        let mut b = Body::rectangle(1.0, 2.0, 3.0, 4.0).with_velocity(Vector2::new(5.0, 5.0));
        b.position = Vector2::new(100.0, 100.0);
        b.velocity = Vector2::new(-3.0, 7.0);
        b.size = Vector2::new(9.0, 9.0);
        b.rotation = 45.0;
        b.needs_update = false;

        b.reset_to_base();
        assert_eq!(b.position, Vector2::new(1.0, 2.0));
        assert_eq!(b.velocity, Vector2::ZERO);
        assert_eq!(b.size, Vector2::new(3.0, 4.0));
        assert_eq!(b.rotation, 0.0);
        assert!(b.needs_update);
    }

    #[test]
    fn offscreen_uses_configured_bounds() {
        let small = Bounds::from_size(100.0, 100.0);
        let large = Bounds::from_size(1000.0, 1000.0);
        let b = Body::rectangle(150.0, 10.0, 20.0, 20.0);
        assert!(b.is_offscreen(&small));
        assert!(!b.is_offscreen(&large));
    }

    #[test]
    fn offscreen_needs_more_than_own_size() {
        let bounds = Bounds::from_size(100.0, 100.0);
        assert!(!Body::rectangle(110.0, 0.0, 20.0, 20.0).is_offscreen(&bounds));
        assert!(Body::rectangle(121.0, 0.0, 20.0, 20.0).is_offscreen(&bounds));
        assert!(!Body::rectangle(-35.0, 0.0, 20.0, 20.0).is_offscreen(&bounds));
        assert!(Body::rectangle(-41.0, 0.0, 20.0, 20.0).is_offscreen(&bounds));
        assert!(Body::rectangle(0.0, -41.0, 20.0, 20.0).is_offscreen(&bounds));
    }

    #[test]
    fn hitbox_center_includes_inset_and_offset() {
        let mut b = Body::rectangle(0.0, 0.0, 40.0, 20.0);
        b.set_hitbox_size(Vector2::new(20.0, 10.0)).unwrap();
        assert_eq!(b.hitbox_center(), Vec2::new(20.0, 10.0));
        assert_eq!(b.hitbox_half_extents(), Vec2::new(10.0, 5.0));

        b.hitbox.offset = Vector2::new(2.0, -1.0);
        assert_eq!(b.hitbox_center(), Vec2::new(22.0, 9.0));

        let c = Body::circle(5.0, 5.0, 3.0);
        assert_eq!(c.hitbox_center(), Vec2::new(5.0, 5.0));
    }

    #[test]
    fn negative_hitbox_is_rejected() {
        let mut b = Body::rectangle(0.0, 0.0, 10.0, 10.0);
        assert!(b.set_hitbox_size(Vector2::new(-1.0, 5.0)).is_err());
        assert_eq!(b.hitbox.size, Vector2::new(10.0, 10.0));
    }

    #[test]
    fn contains_point_by_shape() {
        let r = Body::rectangle(0.0, 0.0, 10.0, 10.0);
        assert!(r.contains_point(Vector2::new(10.0, 5.0)));
        assert!(!r.contains_point(Vector2::new(10.5, 5.0)));

        let c = Body::circle(0.0, 0.0, 5.0);
        assert!(c.contains_point(Vector2::new(3.0, 4.0)));
        assert!(!c.contains_point(Vector2::new(4.0, 4.0)));
    }

    #[test]
    fn validate_rejects_bad_state() {
        assert!(Body::rectangle(0.0, 0.0, 1.0, 1.0).validate().is_ok());
        assert!(Body::rectangle(f32::NAN, 0.0, 1.0, 1.0).validate().is_err());
        assert!(Body::rectangle(0.0, 0.0, -1.0, 1.0).validate().is_err());
        let b = Body::rectangle(0.0, 0.0, 1.0, 1.0).with_friction(Vector2::new(f32::INFINITY, 1.0));
        assert!(matches!(b.validate(), Err(CoreError::InvalidArgument(_))));
    }
}
