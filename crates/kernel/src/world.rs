use pwasson_common::{CoreError, PhysicsConfig, Vector2};
use slotmap::SlotMap;

use crate::body::{Body, BodyKey};
use crate::solver::{AlwaysConfirm, CollisionListener, CollisionSolver};

/// Counters describing one completed step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepStats {
    /// Tick number after the step.
    pub tick: u64,
    /// Bodies whose velocity and position were integrated.
    pub integrated: usize,
    /// Pairs for which an overlap was detected.
    pub contacts: usize,
    /// Pairs skipped because their shape combination is unsupported.
    pub skipped_pairs: usize,
}

/// The physical world: an arena of bodies plus the global physics parameters.
///
/// Bodies are addressed by generation-checked [`BodyKey`]s. Removal leaves a
/// hole; a stale key never resolves to a different body. Iteration and
/// resolution follow insertion order: a body added after a removal goes last,
/// even when it lands in the freed slot.
#[derive(Debug, Clone, Default)]
pub struct World {
    bodies: SlotMap<BodyKey, Body>,
    order: Vec<BodyKey>,
    config: PhysicsConfig,
    solver: CollisionSolver,
    tick: u64,
}

impl World {
    /// Create an empty world with the default physics parameters.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: PhysicsConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    pub fn gravity(&self) -> Vector2 {
        self.config.gravity
    }

    pub fn set_gravity(&mut self, gravity: Vector2) {
        self.config.gravity = gravity;
    }

    pub fn friction(&self) -> Vector2 {
        self.config.friction
    }

    pub fn set_friction(&mut self, friction: Vector2) {
        self.config.friction = friction;
    }

    pub fn restitution(&self) -> Vector2 {
        self.config.restitution
    }

    /// Number of completed steps.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Add a body and return its handle. Rejects bodies with invalid state.
    pub fn add_child(&mut self, body: Body) -> Result<BodyKey, CoreError> {
        body.validate()?;
        let name = body.name.clone();
        let key = self.bodies.insert(body);
        self.order.push(key);
        tracing::debug!(?key, ?name, "body added");
        Ok(key)
    }

    /// Remove a body, leaving its slot empty. Fails for stale or removed handles.
    pub fn remove_child(&mut self, key: BodyKey) -> Result<Body, CoreError> {
        let body = self
            .bodies
            .remove(key)
            .ok_or_else(|| CoreError::IndexNotFound(format!("{key:?}")))?;
        self.order.retain(|&k| k != key);
        tracing::debug!(?key, "body removed");
        Ok(body)
    }

    /// Number of live bodies.
    pub fn child_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn contains(&self, key: BodyKey) -> bool {
        self.bodies.contains_key(key)
    }

    pub fn get(&self, key: BodyKey) -> Option<&Body> {
        self.bodies.get(key)
    }

    pub fn get_mut(&mut self, key: BodyKey) -> Option<&mut Body> {
        self.bodies.get_mut(key)
    }

    /// Live handles in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = BodyKey> + '_ {
        self.order.iter().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (BodyKey, &Body)> {
        self.order
            .iter()
            .filter_map(|&k| self.bodies.get(k).map(|b| (k, b)))
    }

    /// Run the solver for one ordered pair outside of a step.
    pub fn resolve_pair<L>(
        &mut self,
        a: BodyKey,
        b: BodyKey,
        listener: &mut L,
    ) -> Result<bool, CoreError>
    where
        L: CollisionListener + ?Sized,
    {
        if a == b {
            return Err(CoreError::InvalidArgument(
                "a body cannot collide with itself".into(),
            ));
        }
        let [body_a, body_b] = self
            .bodies
            .get_disjoint_mut([a, b])
            .ok_or_else(|| CoreError::IndexNotFound(format!("{a:?} or {b:?}")))?;
        self.solver.resolve(body_a, b, body_b, listener)
    }

    /// Advance one step, confirming every detected collision.
    pub fn step(&mut self, dt: f32) -> Result<StepStats, CoreError> {
        self.step_with(dt, &mut AlwaysConfirm)
    }

    /// Advance one step.
    ///
    /// Every updatable dynamic body, in insertion order: velocity x is damped by
    /// friction, gravity scaled by `dt` is added to velocity y, the body is
    /// resolved against every other body, then its velocity is added to its
    /// position as a per-step displacement (not scaled by `dt`).
    ///
    /// Unsupported pairs are logged and skipped; the step carries on.
    pub fn step_with<L>(&mut self, dt: f32, listener: &mut L) -> Result<StepStats, CoreError>
    where
        L: CollisionListener + ?Sized,
    {
        if !dt.is_finite() || dt < 0.0 {
            return Err(CoreError::InvalidArgument(format!(
                "step dt must be finite and non-negative, got {dt}"
            )));
        }
        let _span = tracing::info_span!("world_step", tick = self.tick + 1).entered();

        let keys = self.order.clone();
        let mut stats = StepStats::default();

        for &ka in &keys {
            let Some(a) = self.bodies.get_mut(ka) else {
                continue;
            };
            if !a.needs_update || a.is_static {
                continue;
            }

            let friction = a.friction.unwrap_or(self.config.friction);
            a.velocity.x *= friction.x;
            if a.gravity_affected {
                a.velocity.y += self.config.gravity.y * dt;
            }

            for &kb in &keys {
                if kb == ka {
                    continue;
                }
                let Some([a, b]) = self.bodies.get_disjoint_mut([ka, kb]) else {
                    continue;
                };
                match self.solver.resolve(a, kb, b, listener) {
                    Ok(true) => stats.contacts += 1,
                    Ok(false) => {}
                    Err(err) => {
                        stats.skipped_pairs += 1;
                        tracing::debug!(a = ?ka, b = ?kb, %err, "skipping pair");
                    }
                }
            }

            if let Some(a) = self.bodies.get_mut(ka) {
                let displacement = a.velocity;
                a.position.add(displacement);
                stats.integrated += 1;
            }
        }

        self.tick += 1;
        stats.tick = self.tick;
        tracing::trace!(
            tick = stats.tick,
            integrated = stats.integrated,
            contacts = stats.contacts,
            skipped = stats.skipped_pairs,
            "world step complete"
        );
        Ok(stats)
    }
}
