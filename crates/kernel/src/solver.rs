use pwasson_common::{CoreError, ShapeKind, Vector2};

use crate::body::{Body, BodyKey};

/// Side of the moving body that was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// The moving body's top hit the other body from below.
    Top,
    /// The moving body's left side hit the other body.
    Left,
    /// The moving body's right side hit the other body.
    Right,
    /// The moving body landed on the other body.
    Bottom,
}

/// Caller-supplied veto for detected collisions.
///
/// Returning `false` leaves the overlap uncorrected (a pass-through contact).
/// Both bodies are handed over mutably so the game layer can react, e.g. by
/// zeroing velocities or ending a jump.
pub trait CollisionListener {
    fn confirm(&mut self, direction: Direction, a: &mut Body, b: &mut Body) -> bool;
}

impl<F> CollisionListener for F
where
    F: FnMut(Direction, &mut Body, &mut Body) -> bool,
{
    fn confirm(&mut self, direction: Direction, a: &mut Body, b: &mut Body) -> bool {
        self(direction, a, b)
    }
}

/// Confirms every collision. Used when no listener is supplied.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysConfirm;

impl CollisionListener for AlwaysConfirm {
    fn confirm(&mut self, _: Direction, _: &mut Body, _: &mut Body) -> bool {
        true
    }
}

/// Overlap between two rectangle hitboxes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub direction: Direction,
    /// Penetration depth per axis.
    pub depth: Vector2,
}

/// Stateless pairwise narrow-phase test and resolution.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollisionSolver;

impl CollisionSolver {
    pub fn new() -> Self {
        Self
    }

    /// Test `a` against `b` and resolve the overlap on `a` only.
    ///
    /// Returns `Ok(true)` when an overlap was detected, whether or not the
    /// listener confirmed it. `b` is identified by `b_key` for the
    /// one-partner memo on `a`.
    pub fn resolve<L>(
        &self,
        a: &mut Body,
        b_key: BodyKey,
        b: &mut Body,
        listener: &mut L,
    ) -> Result<bool, CoreError>
    where
        L: CollisionListener + ?Sized,
    {
        if !a.collide_against.contains(&b.collision_group) {
            a.last_collision_partner = None;
            return Ok(false);
        }

        match (a.shape, b.shape) {
            (ShapeKind::Rectangle, ShapeKind::Rectangle) => {
                Ok(self.rectangle_rectangle(a, b_key, b, listener))
            }
            (ShapeKind::Circle, ShapeKind::Circle) => Ok(self.circle_circle(a, b, listener)),
            (sa, sb) => Err(CoreError::UnsupportedCollisionPair { a: sa, b: sb }),
        }
    }

    /// Closed-form AABB test on the hitboxes, with least-penetration axis
    /// selection. Ties resolve vertically.
    pub fn detect_rectangles(&self, a: &Body, b: &Body) -> Option<Contact> {
        let v = a.hitbox_center() - b.hitbox_center();
        let half = a.hitbox_half_extents() + b.hitbox_half_extents();
        if v.x.abs() >= half.x || v.y.abs() >= half.y {
            return None;
        }

        let depth = half - v.abs();
        let direction = if depth.x >= depth.y {
            if v.y > 0.0 {
                Direction::Top
            } else {
                Direction::Bottom
            }
        } else if v.x > 0.0 {
            Direction::Left
        } else {
            Direction::Right
        };
        Some(Contact {
            direction,
            depth: depth.into(),
        })
    }

    fn rectangle_rectangle<L>(
        &self,
        a: &mut Body,
        b_key: BodyKey,
        b: &mut Body,
        listener: &mut L,
    ) -> bool
    where
        L: CollisionListener + ?Sized,
    {
        // Still touching the partner resolved last time: hold still.
        if a.last_collision_partner == Some(b_key) {
            a.velocity = Vector2::ZERO;
            return true;
        }

        let Some(contact) = self.detect_rectangles(a, b) else {
            a.last_collision_partner = None;
            return false;
        };

        if listener.confirm(contact.direction, a, b) {
            push_out(a, contact);
        }
        a.last_collision_partner = Some(b_key);
        true
    }

    fn circle_circle<L>(&self, a: &mut Body, b: &mut Body, listener: &mut L) -> bool
    where
        L: CollisionListener + ?Sized,
    {
        let radii = a.hitbox.size.x + b.hitbox.size.x;
        let distance_sq = a.hitbox_center().distance_squared(b.hitbox_center());
        if distance_sq >= radii * radii {
            return false;
        }
        // No contact normal is derived for circles, so no correction is applied.
        listener.confirm(Direction::Bottom, a, b);
        true
    }
}

fn push_out(a: &mut Body, contact: Contact) {
    let Contact { direction, depth } = contact;
    match direction {
        Direction::Top => {
            a.position.y += depth.y;
            a.velocity.y = 0.0;
        }
        Direction::Bottom => {
            a.position.y -= depth.y;
            a.velocity.y = 0.0;
        }
        Direction::Left => {
            a.position.x += depth.x;
            a.velocity.x = 0.0;
        }
        Direction::Right => {
            a.position.x -= depth.x;
            a.velocity.x = 0.0;
        }
    }
}
