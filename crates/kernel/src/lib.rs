//! Physics kernel: bodies, pairwise collision resolution and the fixed-step
//! world integrator.
//!
//! # Invariants
//! - Static bodies are never integrated or pushed.
//! - Resolution acts on the moving body only, in insertion order; order is observable.
//! - A removed body's handle never resolves to another body.
//! - Unsupported shape pairs are reported, never treated as "no collision".

pub mod body;
pub mod solver;
pub mod world;

pub use body::{BaseState, Body, BodyKey, Hitbox};
pub use solver::{AlwaysConfirm, CollisionListener, CollisionSolver, Contact, Direction};
pub use world::{StepStats, World};

pub fn crate_info() -> &'static str {
    "pwasson-kernel v0.1.0"
}
