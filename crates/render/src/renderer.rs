use pwasson_common::{ShapeKind, Vector2};
use pwasson_scene::{Node, Scene};

/// Per-frame view configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderView {
    pub frame: u64,
    pub fps: u32,
    /// Camera offset subtracted from every drawn position.
    pub offset: Vector2,
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads the scene and a view, then produces output. Body state
/// is owned by the world; a renderer only draws it.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame.
    fn render(&self, scene: &Scene, view: &RenderView) -> Self::Output;
}

/// Produces a human-readable listing of the scene, one line per node.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, scene: &Scene, view: &RenderView) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "=== Scene '{}' (frame={}, fps={}) ===\n",
            scene.name(),
            view.frame,
            view.fps
        ));
        out.push_str(&format!("Nodes: {}\n", scene.child_count()));

        let at = |p: Vector2| Vector2::new(p.x - view.offset.x, p.y - view.offset.y);
        for (_, node) in scene.nodes() {
            match node {
                Node::Body(n) => {
                    let Some(body) = scene.world().get(n.body) else {
                        out.push_str("  body <removed>\n");
                        continue;
                    };
                    let shape = match body.shape {
                        ShapeKind::Rectangle => "rect",
                        ShapeKind::Circle => "circle",
                        ShapeKind::Polygon => "polygon",
                    };
                    let p = at(body.position);
                    out.push_str(&format!(
                        "  {shape} {} pos=({:.2}, {:.2}) size=({:.1}, {:.1}) rot={:.1} fill={}{}\n",
                        body.name.as_deref().unwrap_or("-"),
                        p.x,
                        p.y,
                        body.size.x,
                        body.size.y,
                        body.rotation,
                        n.style.fill,
                        if body.is_static { " static" } else { "" }
                    ));
                }
                Node::Text(t) => {
                    let p = at(t.position);
                    out.push_str(&format!(
                        "  text {:?} pos=({:.2}, {:.2})\n",
                        t.text, p.x, p.y
                    ));
                }
                Node::Button(b) => {
                    let p = at(b.position);
                    out.push_str(&format!(
                        "  button {:?} pos=({:.2}, {:.2}) size=({:.1}, {:.1})\n",
                        b.text, p.x, p.y, b.size.x, b.size.y
                    ));
                }
            }
        }

        out
    }
}
