//! Scene layer: the fixed-step loop driver, the node graph drawn from the
//! physics world, and pointer handling.
//!
//! # Invariants
//! - At most one world step per frame, released by the [`FrameClock`].
//! - Node handles are generation-checked; removal never shifts other nodes.
//! - A held body is static for the duration of the drag.

pub mod clock;
pub mod handler;
pub mod node;
pub mod scene;

pub use clock::{FrameClock, StepTick};
pub use handler::{NodeEvents, SceneHandler};
pub use node::{BodyNode, ButtonOverlay, Node, NodeKey, Style, TextOverlay};
pub use scene::{FrameReport, Scene, SceneError};

pub fn crate_info() -> &'static str {
    "pwasson-scene v0.1.0"
}
