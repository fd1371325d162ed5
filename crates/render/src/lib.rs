//! Render sink: renderer-agnostic interface over the scene.
//!
//! # Invariants
//! - Renderers read the scene; they never mutate bodies or nodes.
//! - Output is derived from scene state and the view alone.

mod renderer;

pub use renderer::{DebugTextRenderer, RenderView, Renderer};

pub fn crate_info() -> &'static str {
    "pwasson-render v0.1.0"
}
