use serde::{Deserialize, Serialize};

use crate::key::{Key, KeyState};

/// A game-level action. The game layer consumes actions, never raw keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Jump,
    MoveLeft,
    MoveRight,
}

/// Actions active during one step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionSet {
    pub jump: bool,
    pub move_left: bool,
    pub move_right: bool,
}

impl ActionSet {
    pub fn contains(&self, action: Action) -> bool {
        match action {
            Action::Jump => self.jump,
            Action::MoveLeft => self.move_left,
            Action::MoveRight => self.move_right,
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.jump || self.move_left || self.move_right)
    }
}

/// Keys bound to each action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bindings {
    pub jump: Vec<Key>,
    pub move_left: Vec<Key>,
    pub move_right: Vec<Key>,
}

impl Default for Bindings {
    fn default() -> Self {
        Self {
            jump: vec![Key::ArrowUp, Key::Space, Key::W, Key::Z],
            move_left: vec![Key::ArrowLeft, Key::A, Key::Q],
            move_right: vec![Key::ArrowRight, Key::D],
        }
    }
}

impl Bindings {
    pub fn keys_for(&self, action: Action) -> &[Key] {
        match action {
            Action::Jump => &self.jump,
            Action::MoveLeft => &self.move_left,
            Action::MoveRight => &self.move_right,
        }
    }

    /// Sample the held keys into the set of active actions.
    pub fn active(&self, keys: &KeyState) -> ActionSet {
        ActionSet {
            jump: keys.any_held(&self.jump),
            move_left: keys.any_held(&self.move_left),
            move_right: keys.any_held(&self.move_right),
        }
    }
}
