use pwasson_common::Bounds;
use pwasson_input::{Bindings, KeyState};
use pwasson_kernel::{Body, BodyKey, Direction, World};
use pwasson_scene::{Node, NodeKey, Scene, SceneError, SceneHandler, StepTick, Style};

pub const PLAYER: &str = "player";

/// Deterministic generator for block placement.
struct SplitMix64(u64);

impl SplitMix64 {
    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }

    /// Uniform in `[0, 1)`.
    fn unit(&mut self) -> f32 {
        (self.next_u64() >> 40) as f32 / (1u64 << 24) as f32
    }

    /// Whole number in `[lo, hi)`.
    fn whole(&mut self, lo: f32, hi: f32) -> f32 {
        lo + (self.unit() * (hi - lo)).floor()
    }
}

/// The platform demo: a ground, a keyboard-driven player and random blocks.
#[derive(Debug)]
pub struct Demo {
    player: BodyKey,
    keys: KeyState,
    bindings: Bindings,
    viewport: Bounds,
    jumping: bool,
    landings: u64,
    resets: u64,
}

impl Demo {
    /// Populate `scene` and return the handler driving it.
    pub fn build(scene: &mut Scene, blocks: usize, seed: u64) -> Result<Self, SceneError> {
        let mut rng = SplitMix64(seed);
        for _ in 0..blocks {
            let x = 100.0 + (rng.unit() * 600.0).floor();
            let y = 50.0 + (rng.unit() * 400.0).floor();
            let w = rng.whole(25.0, 100.0);
            let h = rng.whole(25.0, 100.0);
            let (color, group, mask): (&str, u32, &[u32]) = if rng.unit() > 0.5 {
                ("lime", 2, &[0, 2])
            } else {
                ("blue", 3, &[0, 1, 3])
            };
            let body = Body::rectangle(x, y, w, h)
                .with_group(group)
                .with_mask(mask.iter().copied());
            let style = Style {
                fill: "none".to_string(),
                border: Some(color.to_string()),
                border_size: 1.0,
            };
            let node = scene.add_body(body, style)?;
            set_draggable(scene, node);
        }

        let ground = Body::rectangle(100.0, 500.0, 600.0, 30.0)
            .with_static(true)
            .with_group(0);
        let ground_style = Style {
            fill: "none".to_string(),
            border: Some("red".to_string()),
            border_size: 1.0,
        };
        scene.add_body(ground, ground_style)?;

        let player = Body::rectangle(400.0, 100.0, 30.0, 30.0)
            .with_name(PLAYER)
            .with_group(1)
            .with_mask([0, 1, 3]);
        let player_node = scene.add_body(player, Style::filled("skyblue"))?;
        set_draggable(scene, player_node);
        let player = scene
            .node(player_node)
            .and_then(Node::body_key)
            .ok_or(SceneError::NodeNotFound(player_node))?;

        tracing::info!(blocks, seed, "demo populated");
        Ok(Self {
            player,
            keys: KeyState::new(),
            bindings: Bindings::default(),
            viewport: scene.viewport(),
            jumping: false,
            landings: 0,
            resets: 0,
        })
    }

    pub fn keys_mut(&mut self) -> &mut KeyState {
        &mut self.keys
    }

    pub fn player(&self) -> BodyKey {
        self.player
    }

    pub fn is_jumping(&self) -> bool {
        self.jumping
    }

    pub fn landings(&self) -> u64 {
        self.landings
    }

    pub fn resets(&self) -> u64 {
        self.resets
    }
}

fn set_draggable(scene: &mut Scene, node: NodeKey) {
    if let Some(Node::Body(n)) = scene.node_mut(node) {
        n.draggable = true;
    }
}

impl SceneHandler for Demo {
    fn update(&mut self, world: &mut World, tick: &StepTick) {
        let actions = self.bindings.active(&self.keys);
        let Some(player) = world.get_mut(self.player) else {
            return;
        };
        let delta_ms = tick.elapsed * 1000.0;

        if actions.jump && !self.jumping {
            self.jumping = true;
            player.velocity.y -= 10.0;
        }
        if actions.move_right {
            player.velocity.x += 10.0;
            if delta_ms > 0.0 {
                player.rotation += 200.0 / delta_ms;
            }
        }
        if actions.move_left {
            player.velocity.x -= 10.0;
            if delta_ms > 0.0 {
                player.rotation -= 200.0 / delta_ms;
            }
        }

        if player.is_offscreen(&self.viewport) {
            player.reset_to_base();
            self.resets += 1;
            tracing::debug!(frame = tick.frame, "player offscreen, reset");
        }
    }

    fn collide(&mut self, direction: Direction, a: &mut Body, b: &mut Body) -> bool {
        if direction == Direction::Bottom {
            a.velocity.y = 0.0;
            b.velocity.y = 0.0;
            if a.name.as_deref() == Some(PLAYER) {
                if self.jumping {
                    tracing::trace!("player landed");
                }
                self.jumping = false;
                a.rotation = 0.0;
                self.landings += 1;
            }
        }
        true
    }
}
