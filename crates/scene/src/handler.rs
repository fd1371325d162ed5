use pwasson_common::Vector2;
use pwasson_kernel::{Body, CollisionListener, Direction, World};

use crate::clock::StepTick;
use crate::node::NodeKey;

/// Game-layer hooks driven by [`crate::Scene::advance`].
pub trait SceneHandler {
    /// Called once per released step, before the world steps. Velocities set
    /// here are integrated by the same step.
    fn update(&mut self, world: &mut World, tick: &StepTick);

    /// Confirm or veto a detected collision. Vetoed contacts pass through.
    fn collide(&mut self, direction: Direction, a: &mut Body, b: &mut Body) -> bool {
        let _ = (direction, a, b);
        true
    }
}

impl SceneHandler for () {
    fn update(&mut self, _: &mut World, _: &StepTick) {}
}

/// Routes the world's confirm callback to a [`SceneHandler`].
pub(crate) struct HandlerListener<'a, H: ?Sized>(pub(crate) &'a mut H);

impl<H: SceneHandler + ?Sized> CollisionListener for HandlerListener<'_, H> {
    fn confirm(&mut self, direction: Direction, a: &mut Body, b: &mut Body) -> bool {
        self.0.collide(direction, a, b)
    }
}

/// Per-node pointer callbacks. Every method defaults to a no-op.
pub trait NodeEvents {
    fn on_mouse_down(&mut self, node: NodeKey, position: Vector2) {
        let _ = (node, position);
    }

    fn on_mouse_release(&mut self, node: NodeKey, position: Vector2) {
        let _ = (node, position);
    }

    /// Press and release landed on the same node.
    fn on_click(&mut self, node: NodeKey, position: Vector2) {
        let _ = (node, position);
    }

    /// The pointer moved over the node.
    fn on_hover(&mut self, node: NodeKey, position: Vector2) {
        let _ = (node, position);
    }

    /// The pointer left the node.
    fn on_out(&mut self, node: NodeKey) {
        let _ = node;
    }
}

impl NodeEvents for () {}
