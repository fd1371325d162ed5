use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A 2D float pair used for positions, sizes, velocities and per-axis factors.
///
/// Arithmetic is component-wise and mutates the receiver, returning it so calls
/// can be chained: `v.add(a).multiply(b)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector2 {
    pub x: f32,
    pub y: f32,
}

impl Vector2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };
    pub const ONE: Self = Self { x: 1.0, y: 1.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Build a vector, rejecting NaN or infinite components.
    pub fn try_new(x: f32, y: f32) -> Result<Self, CoreError> {
        let v = Self { x, y };
        if v.is_finite() {
            Ok(v)
        } else {
            Err(CoreError::InvalidArgument(format!(
                "vector components must be finite, got ({x}, {y})"
            )))
        }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Overwrite this vector with `source`.
    pub fn copy(&mut self, source: Vector2) -> &mut Self {
        self.x = source.x;
        self.y = source.y;
        self
    }

    pub fn add(&mut self, source: Vector2) -> &mut Self {
        self.x += source.x;
        self.y += source.y;
        self
    }

    pub fn sub(&mut self, source: Vector2) -> &mut Self {
        self.x -= source.x;
        self.y -= source.y;
        self
    }

    pub fn multiply(&mut self, source: Vector2) -> &mut Self {
        self.x *= source.x;
        self.y *= source.y;
        self
    }

    /// Component-wise division. Dividing by zero follows IEEE rules; use
    /// [`Vector2::checked_divide`] when the divisor is untrusted.
    pub fn divide(&mut self, source: Vector2) -> &mut Self {
        self.x /= source.x;
        self.y /= source.y;
        self
    }

    /// Component-wise division that refuses a zero divisor component.
    pub fn checked_divide(&mut self, source: Vector2) -> Result<&mut Self, CoreError> {
        if source.x == 0.0 || source.y == 0.0 {
            return Err(CoreError::InvalidArgument(format!(
                "cannot divide by a vector with a zero component: ({}, {})",
                source.x, source.y
            )));
        }
        Ok(self.divide(source))
    }
}

impl From<Vec2> for Vector2 {
    fn from(v: Vec2) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<Vector2> for Vec2 {
    fn from(v: Vector2) -> Self {
        Vec2::new(v.x, v.y)
    }
}

impl From<(f32, f32)> for Vector2 {
    fn from((x, y): (f32, f32)) -> Self {
        Self::new(x, y)
    }
}

impl TryFrom<&[f32]> for Vector2 {
    type Error = CoreError;

    fn try_from(values: &[f32]) -> Result<Self, Self::Error> {
        match values {
            [x, y] => Self::try_new(*x, *y),
            other => Err(CoreError::InvalidArgument(format!(
                "a vector needs exactly 2 components, got {}",
                other.len()
            ))),
        }
    }
}
