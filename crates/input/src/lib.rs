//! Keyboard input: a held-key map fed by key-down/key-up events and bindings
//! that turn the held keys into game actions once per step.
//!
//! # Invariants
//! - Key events only touch the held-key map; actions are sampled, never queued.
//! - Repeated key-down events for a held key are idempotent.

pub mod action;
pub mod key;

pub use action::{Action, ActionSet, Bindings};
pub use key::{Key, KeyParseError, KeyState};

pub fn crate_info() -> &'static str {
    "pwasson-input v0.1.0"
}
