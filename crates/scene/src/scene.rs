use std::cell::Cell;
use std::collections::HashSet;
use std::time::Duration;

use pwasson_common::{Bounds, CoreError, EngineConfig, Vector2};
use pwasson_kernel::{Body, BodyKey, StepStats, World};
use slotmap::SlotMap;

use crate::clock::{FrameClock, StepTick};
use crate::handler::{HandlerListener, NodeEvents, SceneHandler};
use crate::node::{BodyNode, Node, NodeKey, Style};

#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("node not found: {0:?}")]
    NodeNotFound(NodeKey),
}

/// What one released step did.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub tick: StepTick,
    pub stats: StepStats,
    /// Nodes to hand to the render pass, in draw order.
    pub updated: Vec<NodeKey>,
}

#[derive(Debug, Clone)]
struct Entry {
    node: Node,
    counted: bool,
}

#[derive(Debug, Clone, Copy)]
struct Drag {
    node: NodeKey,
    body: BodyKey,
    grab_offset: Vector2,
    /// The body was dynamic before the grab and is released as dynamic.
    made_static: bool,
}

/// A physics world plus the nodes drawn from it, driven by a [`FrameClock`].
#[derive(Debug)]
pub struct Scene {
    name: String,
    world: World,
    nodes: SlotMap<NodeKey, Entry>,
    /// Insertion order, which is draw order. Later nodes sit on top.
    order: Vec<NodeKey>,
    clock: FrameClock,
    viewport: Bounds,
    cached_count: Cell<Option<usize>>,
    hovered: HashSet<NodeKey>,
    pressed: Option<NodeKey>,
    drag: Option<Drag>,
}

impl Scene {
    pub fn new(name: impl Into<String>, config: &EngineConfig) -> Result<Self, SceneError> {
        config.validate()?;
        let name = name.into();
        tracing::info!(scene = %name, max_fps = config.max_fps, "scene started");
        Ok(Self {
            name,
            world: World::with_config(config.physics),
            nodes: SlotMap::with_key(),
            order: Vec::new(),
            clock: FrameClock::new(config.max_fps)?,
            viewport: config.viewport,
            cached_count: Cell::new(None),
            hovered: HashSet::new(),
            pressed: None,
            drag: None,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut FrameClock {
        &mut self.clock
    }

    pub fn viewport(&self) -> Bounds {
        self.viewport
    }

    /// Add a body to the world and a node drawing it.
    pub fn add_body(&mut self, body: Body, style: Style) -> Result<NodeKey, SceneError> {
        let key = self.world.add_child(body)?;
        Ok(self.add_node(Node::Body(BodyNode {
            body: key,
            style,
            draggable: false,
        })))
    }

    pub fn add_node(&mut self, node: Node) -> NodeKey {
        self.insert(node, true)
    }

    /// Add a node that is left out of [`Scene::child_count`], e.g. a HUD label.
    pub fn add_uncounted(&mut self, node: Node) -> NodeKey {
        self.insert(node, false)
    }

    fn insert(&mut self, node: Node, counted: bool) -> NodeKey {
        let key = self.nodes.insert(Entry { node, counted });
        self.order.push(key);
        self.cached_count.set(None);
        tracing::debug!(?key, counted, "node added");
        key
    }

    /// Remove a node, leaving its slot empty. A body node also removes its body
    /// from the world.
    pub fn remove_node(&mut self, key: NodeKey) -> Result<Node, SceneError> {
        let entry = self.nodes.remove(key).ok_or(SceneError::NodeNotFound(key))?;
        self.order.retain(|&k| k != key);
        self.cached_count.set(None);
        self.hovered.remove(&key);
        if self.pressed == Some(key) {
            self.pressed = None;
        }
        if self.drag.is_some_and(|d| d.node == key) {
            self.drag = None;
        }
        if let Some(body) = entry.node.body_key() {
            if self.world.remove_child(body).is_err() {
                tracing::debug!(?key, ?body, "body already gone from the world");
            }
        }
        tracing::debug!(?key, "node removed");
        Ok(entry.node)
    }

    /// Live nodes, excluding uncounted ones. Cached until the next add or remove.
    pub fn child_count(&self) -> usize {
        if let Some(count) = self.cached_count.get() {
            return count;
        }
        let count = self.nodes.values().filter(|e| e.counted).count();
        self.cached_count.set(Some(count));
        count
    }

    pub fn node(&self, key: NodeKey) -> Option<&Node> {
        self.nodes.get(key).map(|e| &e.node)
    }

    pub fn node_mut(&mut self, key: NodeKey) -> Option<&mut Node> {
        self.nodes.get_mut(key).map(|e| &mut e.node)
    }

    /// Nodes in draw order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeKey, &Node)> {
        self.entries().map(|(k, e)| (k, &e.node))
    }

    fn entries(&self) -> impl Iterator<Item = (NodeKey, &Entry)> {
        self.order
            .iter()
            .filter_map(|&k| self.nodes.get(k).map(|e| (k, e)))
    }

    /// The body drawn by a body node.
    pub fn body_of(&self, key: NodeKey) -> Option<&Body> {
        self.node(key)?.body_key().and_then(|b| self.world.get(b))
    }

    /// First body carrying `name`, in insertion order.
    pub fn find_body(&self, name: &str) -> Option<BodyKey> {
        self.world
            .iter()
            .find(|(_, b)| b.name.as_deref() == Some(name))
            .map(|(k, _)| k)
    }

    /// Feed one frame's elapsed real time. When a step is due: the handler's
    /// `update` runs, then the world steps with the handler confirming
    /// collisions.
    pub fn advance<H>(
        &mut self,
        elapsed: Duration,
        handler: &mut H,
    ) -> Result<Option<FrameReport>, SceneError>
    where
        H: SceneHandler + ?Sized,
    {
        let Some(tick) = self.clock.tick(elapsed) else {
            return Ok(None);
        };

        handler.update(&mut self.world, &tick);
        let stats = self.world.step_with(tick.dt, &mut HandlerListener(handler))?;

        let world = &self.world;
        let updated = self
            .entries()
            .filter(|(_, e)| match &e.node {
                Node::Body(n) => world.get(n.body).is_some_and(|b| b.needs_update),
                Node::Text(_) | Node::Button(_) => true,
            })
            .map(|(k, _)| k)
            .collect();

        Ok(Some(FrameReport {
            tick,
            stats,
            updated,
        }))
    }

    /// Topmost node under the pointer.
    pub fn pick(&self, point: Vector2) -> Option<NodeKey> {
        self.entries()
            .filter(|(_, e)| e.node.contains_point(&self.world, point))
            .map(|(k, _)| k)
            .last()
    }

    /// Press on the topmost node under the pointer. A draggable body is held
    /// static until release.
    pub fn pointer_down<E>(&mut self, point: Vector2, events: &mut E) -> Option<NodeKey>
    where
        E: NodeEvents + ?Sized,
    {
        let key = self.pick(point)?;
        self.pressed = Some(key);

        if self.drag.is_none() {
            if let Some(Node::Body(n)) = self.nodes.get(key).map(|e| &e.node) {
                if n.draggable {
                    let body_key = n.body;
                    if let Some(body) = self.world.get_mut(body_key) {
                        let made_static = !body.is_static;
                        body.is_static = true;
                        let mut grab_offset = body.position;
                        grab_offset.sub(point);
                        self.drag = Some(Drag {
                            node: key,
                            body: body_key,
                            grab_offset,
                            made_static,
                        });
                        tracing::debug!(?key, "drag started");
                    }
                }
            }
        }

        events.on_mouse_down(key, point);
        Some(key)
    }

    /// Move a held body with the pointer and report hover changes.
    pub fn pointer_move<E>(&mut self, point: Vector2, events: &mut E)
    where
        E: NodeEvents + ?Sized,
    {
        if let Some(drag) = self.drag {
            if let Some(body) = self.world.get_mut(drag.body) {
                body.position = point;
                body.position.add(drag.grab_offset);
            }
        }

        let dragged = self.drag.map(|d| d.node);
        for &key in &self.order {
            let Some(entry) = self.nodes.get(key) else {
                continue;
            };
            if entry.node.contains_point(&self.world, point) {
                self.hovered.insert(key);
                if dragged != Some(key) {
                    events.on_hover(key, point);
                }
            } else if self.hovered.remove(&key) {
                events.on_out(key);
            }
        }
    }

    /// Release the pointer. A dragged body becomes dynamic again, at rest.
    pub fn pointer_up<E>(&mut self, point: Vector2, events: &mut E) -> Option<NodeKey>
    where
        E: NodeEvents + ?Sized,
    {
        if let Some(drag) = self.drag.take() {
            if let Some(body) = self.world.get_mut(drag.body) {
                if drag.made_static {
                    body.is_static = false;
                    body.velocity = Vector2::ZERO;
                }
            }
            tracing::debug!(node = ?drag.node, "drag released");
        }

        let pressed = self.pressed.take();
        let key = self.pick(point)?;
        events.on_mouse_release(key, point);
        if pressed == Some(key) {
            events.on_click(key, point);
        }
        Some(key)
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{ButtonOverlay, TextOverlay};
    use approx::assert_abs_diff_eq;
    use pwasson_common::PhysicsConfig;
    use pwasson_kernel::Direction;

    fn config() -> EngineConfig {
        EngineConfig {
            physics: PhysicsConfig {
                gravity: Vector2::new(0.0, 9.8),
                friction: Vector2::ONE,
                ..PhysicsConfig::default()
            },
            max_fps: 50,
            ..EngineConfig::default()
        }
    }

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[derive(Default)]
    struct Recorder {
        updates: usize,
        collisions: Vec<Direction>,
        confirm: bool,
        events: Vec<(&'static str, NodeKey)>,
    }

    impl SceneHandler for Recorder {
        fn update(&mut self, _: &mut World, _: &StepTick) {
            self.updates += 1;
        }

        fn collide(&mut self, direction: Direction, _: &mut Body, _: &mut Body) -> bool {
            self.collisions.push(direction);
            self.confirm
        }
    }

    impl NodeEvents for Recorder {
        fn on_mouse_down(&mut self, node: NodeKey, _: Vector2) {
            self.events.push(("down", node));
        }

        fn on_mouse_release(&mut self, node: NodeKey, _: Vector2) {
            self.events.push(("release", node));
        }

        fn on_click(&mut self, node: NodeKey, _: Vector2) {
            self.events.push(("click", node));
        }

        fn on_hover(&mut self, node: NodeKey, _: Vector2) {
            self.events.push(("hover", node));
        }

        fn on_out(&mut self, node: NodeKey) {
            self.events.push(("out", node));
        }
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = EngineConfig {
            max_fps: 0,
            ..EngineConfig::default()
        };
        assert!(matches!(
            Scene::new("bad", &config),
            Err(SceneError::Core(CoreError::InvalidArgument(_)))
        ));
    }

    #[test]
    fn child_count_skips_uncounted_and_removed() {
        let mut scene = Scene::new("count", &config()).unwrap();
        let a = scene
            .add_body(Body::rectangle(0.0, 0.0, 10.0, 10.0), Style::default())
            .unwrap();
        scene.add_body(Body::rectangle(20.0, 0.0, 10.0, 10.0), Style::default())
            .unwrap();
        scene.add_uncounted(Node::Text(TextOverlay::new("fps", Vector2::ZERO)));
        assert_eq!(scene.child_count(), 2);
        assert_eq!(scene.child_count(), 2);

        let body = scene.node(a).unwrap().body_key().unwrap();
        scene.remove_node(a).unwrap();
        assert_eq!(scene.child_count(), 1);
        assert!(scene.node(a).is_none());
        assert!(!scene.world().contains(body));
        assert!(matches!(scene.remove_node(a), Err(SceneError::NodeNotFound(_))));
    }

    #[test]
    fn advance_waits_for_the_interval() {
        let mut scene = Scene::new("loop", &config()).unwrap();
        let node = scene
            .add_body(Body::rectangle(0.0, 0.0, 10.0, 10.0), Style::default())
            .unwrap();
        let mut handler = Recorder::default();

        assert!(scene.advance(ms(10), &mut handler).unwrap().is_none());
        assert_eq!(handler.updates, 0);

        let report = scene.advance(ms(11), &mut handler).unwrap().unwrap();
        assert_eq!(handler.updates, 1);
        assert_eq!(report.stats.integrated, 1);
        assert_eq!(report.updated, vec![node]);
        assert_abs_diff_eq!(report.tick.elapsed, 0.021, epsilon = 1e-6);
        // Gravity is scaled by the releasing frame's 11 ms delta.
        let body = scene.body_of(node).unwrap();
        assert_abs_diff_eq!(body.velocity.y, 9.8 * 0.011, epsilon = 1e-5);
        assert_abs_diff_eq!(body.position.y, 9.8 * 0.011, epsilon = 1e-5);
    }

    #[test]
    fn handler_confirms_collisions() {
        let mut scene = Scene::new("collide", &config()).unwrap();
        scene
            .add_body(
                Body::rectangle(0.0, 100.0, 200.0, 20.0).with_static(true),
                Style::default(),
            )
            .unwrap();
        let faller = scene
            .add_body(Body::rectangle(0.0, 75.0, 30.0, 30.0), Style::default())
            .unwrap();

        let mut confirming = Recorder {
            confirm: true,
            ..Recorder::default()
        };
        scene.advance(ms(21), &mut confirming).unwrap().unwrap();
        assert_eq!(confirming.collisions, vec![Direction::Bottom]);
        assert_abs_diff_eq!(scene.body_of(faller).unwrap().position.y, 70.0, epsilon = 1e-4);
    }

    #[test]
    fn vetoed_collisions_pass_through() {
        let mut scene = Scene::new("veto", &config()).unwrap();
        scene
            .add_body(
                Body::rectangle(0.0, 100.0, 200.0, 20.0).with_static(true),
                Style::default(),
            )
            .unwrap();
        let faller = scene
            .add_body(Body::rectangle(0.0, 75.0, 30.0, 30.0), Style::default())
            .unwrap();

        let mut vetoing = Recorder::default();
        scene.advance(ms(21), &mut vetoing).unwrap().unwrap();
        assert_eq!(vetoing.collisions, vec![Direction::Bottom]);
        assert!(scene.body_of(faller).unwrap().position.y > 75.0);
    }

    #[test]
    fn paused_scene_does_not_step() {
        let mut scene = Scene::new("paused", &config()).unwrap();
        scene.clock_mut().pause();
        assert!(scene.advance(ms(100), &mut ()).unwrap().is_none());
        assert_eq!(scene.world().tick(), 0);
    }

    #[test]
    fn bodies_not_needing_update_are_not_reported() {
        let mut scene = Scene::new("report", &config()).unwrap();
        let mut frozen = Body::rectangle(0.0, 0.0, 10.0, 10.0);
        frozen.needs_update = false;
        scene.add_body(frozen, Style::default()).unwrap();
        let label = scene.add_uncounted(Node::Text(TextOverlay::new("hud", Vector2::ZERO)));

        let report = scene.advance(ms(21), &mut ()).unwrap().unwrap();
        assert_eq!(report.updated, vec![label]);
    }

    #[test]
    fn dragging_holds_the_body_then_drops_it_at_rest() {
        let mut scene = Scene::new("drag", &config()).unwrap();
        let body = Body::rectangle(100.0, 100.0, 20.0, 20.0).with_velocity(Vector2::new(3.0, 3.0));
        let node = scene.add_body(body, Style::default()).unwrap();
        if let Some(Node::Body(n)) = scene.node_mut(node) {
            n.draggable = true;
        }
        let mut events = Recorder::default();

        assert_eq!(scene.pointer_down(Vector2::new(105.0, 110.0), &mut events), Some(node));
        assert!(scene.is_dragging());
        assert!(scene.body_of(node).unwrap().is_static);

        scene.pointer_move(Vector2::new(205.0, 60.0), &mut events);
        assert_eq!(scene.body_of(node).unwrap().position, Vector2::new(200.0, 50.0));

        // Held bodies ignore gravity.
        scene.advance(ms(21), &mut ()).unwrap();
        assert_eq!(scene.body_of(node).unwrap().position, Vector2::new(200.0, 50.0));

        assert_eq!(scene.pointer_up(Vector2::new(205.0, 60.0), &mut events), Some(node));
        let body = scene.body_of(node).unwrap();
        assert!(!body.is_static);
        assert_eq!(body.velocity, Vector2::ZERO);
        assert!(!scene.is_dragging());
        assert_eq!(
            events.events,
            vec![("down", node), ("release", node), ("click", node)]
        );
    }

    #[test]
    fn static_bodies_stay_static_after_drag() {
        let mut scene = Scene::new("drag", &config()).unwrap();
        let node = scene
            .add_body(
                Body::rectangle(0.0, 0.0, 50.0, 50.0).with_static(true),
                Style::default(),
            )
            .unwrap();
        if let Some(Node::Body(n)) = scene.node_mut(node) {
            n.draggable = true;
        }
        scene.pointer_down(Vector2::new(10.0, 10.0), &mut ());
        scene.pointer_move(Vector2::new(20.0, 10.0), &mut ());
        scene.pointer_up(Vector2::new(20.0, 10.0), &mut ());
        let body = scene.body_of(node).unwrap();
        assert!(body.is_static);
        assert_eq!(body.position, Vector2::new(10.0, 0.0));
    }

    #[test]
    fn non_draggable_nodes_only_get_events() {
        let mut scene = Scene::new("buttons", &config()).unwrap();
        let button = scene.add_node(Node::Button(ButtonOverlay::new(
            "Start",
            Vector2::new(10.0, 10.0),
            Vector2::new(50.0, 20.0),
        )));
        let mut events = Recorder::default();

        scene.pointer_move(Vector2::new(20.0, 20.0), &mut events);
        scene.pointer_down(Vector2::new(20.0, 20.0), &mut events);
        assert!(!scene.is_dragging());
        // Released elsewhere: no click.
        scene.pointer_move(Vector2::new(200.0, 200.0), &mut events);
        assert_eq!(scene.pointer_up(Vector2::new(200.0, 200.0), &mut events), None);

        assert_eq!(
            events.events,
            vec![("hover", button), ("down", button), ("out", button)]
        );
    }

    #[test]
    fn pick_prefers_the_topmost_node() {
        let mut scene = Scene::new("pick", &config()).unwrap();
        scene
            .add_body(Body::rectangle(0.0, 0.0, 50.0, 50.0), Style::default())
            .unwrap();
        let top = scene
            .add_body(Body::rectangle(10.0, 10.0, 10.0, 10.0), Style::default())
            .unwrap();
        assert_eq!(scene.pick(Vector2::new(15.0, 15.0)), Some(top));
        assert_eq!(scene.pick(Vector2::new(100.0, 100.0)), None);
    }

    #[test]
    fn node_added_after_removal_is_drawn_on_top() {
        let mut scene = Scene::new("order", &config()).unwrap();
        let first = scene
            .add_body(Body::rectangle(0.0, 0.0, 50.0, 50.0), Style::default())
            .unwrap();
        let middle = scene
            .add_body(Body::rectangle(0.0, 0.0, 50.0, 50.0), Style::default())
            .unwrap();
        scene.remove_node(first).unwrap();
        let last = scene
            .add_body(Body::rectangle(0.0, 0.0, 50.0, 50.0), Style::default())
            .unwrap();

        let order: Vec<_> = scene.nodes().map(|(k, _)| k).collect();
        assert_eq!(order, vec![middle, last]);
        assert_eq!(scene.pick(Vector2::new(25.0, 25.0)), Some(last));
    }

    #[test]
    fn find_body_by_name() {
        let mut scene = Scene::new("names", &config()).unwrap();
        scene
            .add_body(Body::rectangle(0.0, 0.0, 1.0, 1.0).with_name("player"), Style::default())
            .unwrap();
        let key = scene.find_body("player").unwrap();
        assert_eq!(scene.world().get(key).unwrap().name.as_deref(), Some("player"));
        assert!(scene.find_body("enemy").is_none());
    }
}
