use pwasson_common::{Bounds, Vector2};
use pwasson_kernel::{BodyKey, World};

slotmap::new_key_type! {
    /// Handle to a node in a [`crate::Scene`].
    pub struct NodeKey;
}

/// Visual style for body nodes and buttons.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub fill: String,
    pub border: Option<String>,
    pub border_size: f32,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            fill: "black".to_string(),
            border: None,
            border_size: 0.0,
        }
    }
}

impl Style {
    pub fn filled(fill: impl Into<String>) -> Self {
        Self {
            fill: fill.into(),
            ..Self::default()
        }
    }
}

/// A drawable view of a body stored in the world arena.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyNode {
    pub body: BodyKey,
    pub style: Style,
    /// Whether the pointer can pick the body up and move it.
    pub draggable: bool,
}

/// A text label. Not part of the physics world.
#[derive(Debug, Clone, PartialEq)]
pub struct TextOverlay {
    pub text: String,
    pub position: Vector2,
    pub font_size: f32,
    pub color: String,
}

impl TextOverlay {
    pub fn new(text: impl Into<String>, position: Vector2) -> Self {
        Self {
            text: text.into(),
            position,
            font_size: 14.0,
            color: "black".to_string(),
        }
    }

    /// Approximate extents, assuming glyphs are 0.6 em wide.
    pub fn size(&self) -> Vector2 {
        let chars = self.text.chars().count() as f32;
        Vector2::new(chars * self.font_size * 0.6, self.font_size)
    }
}

/// A clickable rectangle with a caption.
#[derive(Debug, Clone, PartialEq)]
pub struct ButtonOverlay {
    pub text: String,
    pub position: Vector2,
    pub size: Vector2,
    pub style: Style,
}

impl ButtonOverlay {
    pub fn new(text: impl Into<String>, position: Vector2, size: Vector2) -> Self {
        Self {
            text: text.into(),
            position,
            size,
            style: Style::default(),
        }
    }
}

/// Everything a scene can hold.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Body(BodyNode),
    Text(TextOverlay),
    Button(ButtonOverlay),
}

impl Node {
    pub fn body(body: BodyKey) -> Self {
        Node::Body(BodyNode {
            body,
            style: Style::default(),
            draggable: false,
        })
    }

    pub fn body_key(&self) -> Option<BodyKey> {
        match self {
            Node::Body(n) => Some(n.body),
            Node::Text(_) | Node::Button(_) => None,
        }
    }

    /// Visual rectangle of the node. `None` when its body is gone.
    pub fn bounds(&self, world: &World) -> Option<Bounds> {
        let (position, size) = match self {
            Node::Body(n) => {
                let body = world.get(n.body)?;
                (body.position, body.size)
            }
            Node::Text(t) => (t.position, t.size()),
            Node::Button(b) => (b.position, b.size),
        };
        let mut max = position;
        max.add(size);
        Some(Bounds::new(position, max))
    }

    /// Pointer hit test.
    pub fn contains_point(&self, world: &World, point: Vector2) -> bool {
        match self {
            Node::Body(n) => world.get(n.body).is_some_and(|b| b.contains_point(point)),
            Node::Text(_) | Node::Button(_) => {
                self.bounds(world).is_some_and(|b| b.contains(point))
            }
        }
    }
}
