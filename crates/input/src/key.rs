use std::collections::HashSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A keyboard key, identified by its DOM key code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Space,
    A,
    D,
    Q,
    S,
    W,
    Z,
    /// Any key without a dedicated variant.
    Other(u32),
}

impl Key {
    pub fn from_key_code(code: u32) -> Self {
        match code {
            32 => Key::Space,
            37 => Key::ArrowLeft,
            38 => Key::ArrowUp,
            39 => Key::ArrowRight,
            40 => Key::ArrowDown,
            65 => Key::A,
            68 => Key::D,
            81 => Key::Q,
            83 => Key::S,
            87 => Key::W,
            90 => Key::Z,
            other => Key::Other(other),
        }
    }

    pub fn key_code(self) -> u32 {
        match self {
            Key::Space => 32,
            Key::ArrowLeft => 37,
            Key::ArrowUp => 38,
            Key::ArrowRight => 39,
            Key::ArrowDown => 40,
            Key::A => 65,
            Key::D => 68,
            Key::Q => 81,
            Key::S => 83,
            Key::W => 87,
            Key::Z => 90,
            Key::Other(code) => code,
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown key name: {0:?}")]
pub struct KeyParseError(pub String);

impl FromStr for Key {
    type Err = KeyParseError;

    /// Parses a key name (`up`, `space`, `w`, ...) or a numeric key code.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        let key = match name.as_str() {
            "up" | "arrowup" => Key::ArrowUp,
            "down" | "arrowdown" => Key::ArrowDown,
            "left" | "arrowleft" => Key::ArrowLeft,
            "right" | "arrowright" => Key::ArrowRight,
            "space" => Key::Space,
            "a" => Key::A,
            "d" => Key::D,
            "q" => Key::Q,
            "s" => Key::S,
            "w" => Key::W,
            "z" => Key::Z,
            other => match other.parse::<u32>() {
                Ok(code) => Key::from_key_code(code),
                Err(_) => return Err(KeyParseError(s.to_string())),
            },
        };
        Ok(key)
    }
}

/// Keys currently held down.
#[derive(Debug, Clone, Default)]
pub struct KeyState {
    held: HashSet<Key>,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: Key) {
        if self.held.insert(key) {
            tracing::trace!(?key, "key down");
        }
    }

    pub fn key_up(&mut self, key: Key) {
        if self.held.remove(&key) {
            tracing::trace!(?key, "key up");
        }
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn any_held(&self, keys: &[Key]) -> bool {
        keys.iter().any(|k| self.held.contains(k))
    }

    /// Release every key, e.g. when the window loses focus.
    pub fn clear(&mut self) {
        self.held.clear();
    }

    pub fn len(&self) -> usize {
        self.held.len()
    }

    pub fn is_empty(&self) -> bool {
        self.held.is_empty()
    }
}
