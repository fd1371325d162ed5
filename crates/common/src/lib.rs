//! Shared types for the pwasson engine: vector math, shape kinds, viewport
//! bounds, the error taxonomy and engine configuration.
//!
//! # Invariants
//! - Values entering the engine through fallible constructors are finite.
//! - Configuration is explicit and passed by value; there is no global state.

pub mod config;
pub mod error;
pub mod math;
pub mod types;

pub use config::{EngineConfig, PhysicsConfig};
pub use error::{ConfigError, CoreError};
pub use math::Vector2;
pub use types::{Bounds, ShapeKind};

pub fn crate_info() -> &'static str {
    "pwasson-common v0.1.0"
}
