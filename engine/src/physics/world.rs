//! Physics World
//!
//! Owns every body and drives the simulation. One call to
//! [`PhysicsWorld::update`] runs four phases, strictly in order:
//!
//! 1. **Integrate** - semi-implicit Euler for active dynamic bodies, then
//!    refresh their collider geometry.
//! 2. **Detect** - test every unordered pair of active bodies. Each colliding
//!    pair records one contact and publishes one [`CollisionEvent`].
//! 3. **Resolve** - re-measure each contact against current geometry, then
//!    positional correction split by inverse mass and an impulse along the
//!    contact normal. Pairs already pushed apart by an earlier contact this
//!    step are skipped.
//! 4. **Clear** - contacts never outlive the step.
//!
//! Detection is O(n²) in the number of active bodies. Fine for the small
//! scenes this engine targets.
//!
//! # Example
//!
//! ```
//! use cinder_engine::physics::{BodyDesc, ColliderShape, PhysicsWorld};
//! use glam::Vec3;
//!
//! let mut world = PhysicsWorld::new(Vec3::new(0.0, -9.81, 0.0));
//! let floor = world.add_body(&BodyDesc::fixed(Vec3::ZERO)).unwrap();
//! world.add_collider(floor, ColliderShape::cuboid(Vec3::new(5.0, 0.5, 5.0))).unwrap();
//!
//! let crate_box = world.add_body(&BodyDesc::dynamic(Vec3::new(0.0, 3.0, 0.0), 1.0)).unwrap();
//! world.add_collider(crate_box, ColliderShape::cuboid(Vec3::splat(0.5))).unwrap();
//!
//! for _ in 0..240 {
//!     world.update(1.0 / 60.0);
//! }
//! assert!(world.body(crate_box).unwrap().is_grounded());
//! ```

use glam::Vec3;
use slotmap::SlotMap;
use tracing::{debug, trace, warn};

use super::body::{BodyDesc, BodyHandle, PhysicsBody};
use super::collider::{Collider, ColliderShape};
use super::collision::{
    CollisionData, aabb_surface_normal, collide, ray_aabb_intersect, ray_sphere_intersect,
};
use super::config::PhysicsConfig;
use super::error::PhysicsError;
use super::events::CollisionEvent;
use super::pose::BodyPose;
use crate::clock::FixedTimestep;
use crate::event::{EventBus, SubscriptionId};

/// Result of [`PhysicsWorld::ray_cast`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Body whose collider was hit
    pub body: BodyHandle,
    /// World-space position where the ray entered the collider
    pub point: Vec3,
    /// Outward surface normal at `point`.
    pub normal: Vec3,
    /// Distance from the ray origin to `point`
    pub distance: f32,
}

/// The simulation: owns every body, runs the fixed-order step and publishes
/// collision events.
///
/// There is no global instance. The host creates a world, steps it from its
/// game loop and drops it (or calls [`PhysicsWorld::destroy`]) on shutdown.
pub struct PhysicsWorld {
    config: PhysicsConfig,
    bodies: SlotMap<BodyHandle, PhysicsBody>,
    /// Contacts found this step. Always empty between steps.
    contacts: Vec<CollisionData>,
    /// Active bodies with colliders, rebuilt each detection pass
    candidates: Vec<BodyHandle>,
    collision_events: EventBus<CollisionEvent>,
    last_contact_count: usize,
    step_count: u64,
}

impl std::fmt::Debug for PhysicsWorld {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhysicsWorld")
            .field("config", &self.config)
            .field("bodies", &self.bodies.len())
            .field("step_count", &self.step_count)
            .finish()
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::from_valid_config(PhysicsConfig::default())
    }
}

impl PhysicsWorld {
    /// Create a world with default settings and the given gravity.
    ///
    /// # Arguments
    ///
    /// * `gravity` - Gravitational acceleration in m/s²
    ///
    /// Non-finite gravity is not an error here: it is logged with `warn!` and
    /// the default `(0, -9.81, 0)` is kept. Callers that need bad input
    /// reported should build a [`PhysicsConfig`] and use
    /// [`PhysicsWorld::with_config`], which returns
    /// [`PhysicsError::InvalidConfig`] instead.
    pub fn new(gravity: Vec3) -> Self {
        let mut world = Self::default();
        world.set_gravity(gravity);
        world
    }

    /// Create a world from a validated config.
    ///
    /// # Returns
    ///
    /// * `Ok(world)` - An empty world using `config`
    /// * `Err(PhysicsError::InvalidConfig)` - `config` failed validation
    pub fn with_config(config: PhysicsConfig) -> Result<Self, PhysicsError> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: PhysicsConfig) -> Self {
        debug!(gravity = %config.gravity, "creating physics world");
        Self {
            config,
            bodies: SlotMap::with_key(),
            contacts: Vec::new(),
            candidates: Vec::new(),
            collision_events: EventBus::new(),
            last_contact_count: 0,
            step_count: 0,
        }
    }

    /// Tear the world down, releasing every body.
    pub fn destroy(mut self) {
        debug!(bodies = self.bodies.len(), steps = self.step_count, "destroying physics world");
        self.bodies.clear();
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    pub fn gravity(&self) -> Vec3 {
        self.config.gravity
    }

    /// Returns `false` (and keeps the old value) for non-finite gravity.
    pub fn set_gravity(&mut self, gravity: Vec3) -> bool {
        if !gravity.is_finite() {
            warn!(%gravity, "rejecting non-finite gravity");
            return false;
        }
        self.config.gravity = gravity;
        true
    }

    // ====== Bodies ======

    /// Create a body from `desc` and insert it into the world.
    ///
    /// The body starts at rest with no collider; attach one with
    /// [`PhysicsWorld::add_collider`] for it to take part in collisions.
    ///
    /// # Returns
    ///
    /// * `Ok(handle)` - Handle to the new body
    /// * `Err(PhysicsError::InvalidMass | InvalidRestitution | InvalidConfig)` -
    ///   The descriptor was rejected and the world is unchanged
    pub fn add_body(&mut self, desc: &BodyDesc) -> Result<BodyHandle, PhysicsError> {
        let body = PhysicsBody::new(desc).inspect_err(|err| warn!(%err, "rejecting body"))?;
        let handle = self.bodies.insert(body);
        debug!(?handle, kind = ?desc.kind, position = %desc.position, "added body");
        Ok(handle)
    }

    /// Attach a collider to `handle`, replacing any previous one.
    ///
    /// The body's visual scale is set to the shape's full extent and the
    /// collider geometry is computed at the body's current position.
    ///
    /// # Arguments
    ///
    /// * `handle` - Body to attach to
    /// * `shape` - Box half extents or sphere radius, all strictly positive
    ///
    /// # Returns
    ///
    /// * `Ok(collider)` - The new collider, so callers can label it
    /// * `Err(PhysicsError::UnknownBody)` - `handle` is stale
    /// * `Err(PhysicsError::InvalidShape)` - Degenerate shape; the body is unchanged
    pub fn add_collider(
        &mut self,
        handle: BodyHandle,
        shape: ColliderShape,
    ) -> Result<&mut Collider, PhysicsError> {
        let body = self
            .bodies
            .get_mut(handle)
            .ok_or(PhysicsError::UnknownBody(handle))?;
        let collider = Collider::new(shape, handle, body.position())
            .inspect_err(|err| warn!(?handle, %err, "rejecting collider"))?;

        if body.attach_collider(collider).is_some() {
            debug!(?handle, ?shape, "replaced collider");
        } else {
            debug!(?handle, ?shape, "added collider");
        }

        body.collider_mut().ok_or(PhysicsError::UnknownBody(handle))
    }

    /// Remove a body. Its handle stays invalid afterwards.
    pub fn remove_body(&mut self, handle: BodyHandle) -> Option<PhysicsBody> {
        let removed = self.bodies.remove(handle);
        if removed.is_some() {
            debug!(?handle, "removed body");
        }
        removed
    }

    /// Look up a body. `None` for stale handles.
    pub fn body(&self, handle: BodyHandle) -> Option<&PhysicsBody> {
        self.bodies.get(handle)
    }

    /// Mutable access for setters such as
    /// [`PhysicsBody::set_position`] or [`PhysicsBody::set_active`].
    pub fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut PhysicsBody> {
        self.bodies.get_mut(handle)
    }

    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.bodies.contains_key(handle)
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// All bodies in arena order, which is also the pair order used by detection.
    pub fn bodies(&self) -> impl Iterator<Item = (BodyHandle, &PhysicsBody)> {
        self.bodies.iter()
    }

    // ====== Forces ======

    /// Accumulate a force on `handle` for the next step. Returns `false` for
    /// a stale handle; static bodies accept and ignore the call.
    pub fn apply_force(&mut self, handle: BodyHandle, force: Vec3) -> bool {
        match self.bodies.get_mut(handle) {
            Some(body) => {
                body.apply_force(force);
                true
            }
            None => false,
        }
    }

    /// Instant velocity change on `handle`. Returns `false` for a stale handle.
    pub fn apply_linear_impulse(&mut self, handle: BodyHandle, impulse: Vec3) -> bool {
        match self.bodies.get_mut(handle) {
            Some(body) => {
                body.apply_linear_impulse(impulse);
                true
            }
            None => false,
        }
    }

    // ====== Events ======

    /// The collision bus, for unsubscribing or inspecting subscribers.
    pub fn collision_events_mut(&mut self) -> &mut EventBus<CollisionEvent> {
        &mut self.collision_events
    }

    /// Shorthand for subscribing to collision events.
    pub fn on_collision<F>(&mut self, handler: F) -> SubscriptionId
    where
        F: FnMut(&CollisionEvent) + 'static,
    {
        self.collision_events.subscribe(handler)
    }

    // ====== Simulation ======

    /// Advance the simulation by `dt` seconds.
    ///
    /// Runs integrate, detect, resolve and clear, in that order. Collision
    /// events are published synchronously during detect. Each contact is
    /// re-measured against current geometry before it is resolved, so a body
    /// touching several others is not pushed out more than once for the same
    /// penetration.
    ///
    /// Non-positive or non-finite deltas are ignored with a warning.
    pub fn update(&mut self, dt: f32) {
        if !(dt.is_finite() && dt > 0.0) {
            warn!(dt, "skipping physics step with invalid delta");
            return;
        }

        self.integrate(dt);
        self.detect_collisions();
        self.resolve_collisions();

        self.last_contact_count = self.contacts.len();
        self.contacts.clear();
        self.step_count += 1;
    }

    /// Feed a frame delta through `clock` and run the fixed steps it yields.
    pub fn step_frame(&mut self, clock: &mut FixedTimestep, frame_delta: f32) -> usize {
        let steps = clock.advance(frame_delta);
        for _ in 0..steps {
            self.update(clock.step());
        }
        steps
    }

    /// Fixed-step clock matching this world's config.
    pub fn fixed_timestep(&self) -> FixedTimestep {
        FixedTimestep::new(self.config.fixed_timestep, self.config.max_steps_per_frame)
    }

    /// Number of contacts resolved during the last step.
    pub fn last_contact_count(&self) -> usize {
        self.last_contact_count
    }

    /// Number of completed `update` steps.
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    fn integrate(&mut self, dt: f32) {
        let gravity = self.config.gravity;
        for body in self.bodies.values_mut() {
            body.integrate(gravity, dt);
        }
    }

    fn detect_collisions(&mut self) {
        self.candidates.clear();
        self.candidates.extend(
            self.bodies
                .iter()
                .filter(|(_, body)| body.is_active() && body.collider().is_some())
                .map(|(handle, _)| handle),
        );

        let bodies = &self.bodies;
        let candidates = &self.candidates;
        for (i, &handle_a) in candidates.iter().enumerate() {
            let body_a = &bodies[handle_a];
            let Some(collider_a) = body_a.collider() else {
                continue;
            };

            for &handle_b in &candidates[i + 1..] {
                let body_b = &bodies[handle_b];
                let Some(collider_b) = body_b.collider() else {
                    continue;
                };

                if let Some(data) = collide(collider_a, collider_b) {
                    trace!(
                        a = ?handle_a,
                        b = ?handle_b,
                        normal = %data.normal,
                        depth = data.depth,
                        "contact"
                    );
                    let event = CollisionEvent::new(&data, body_a.entity(), body_b.entity());
                    self.collision_events.publish(&event);
                    self.contacts.push(data);
                }
            }
        }
    }

    fn resolve_collisions(&mut self) {
        let threshold = self.config.grounded_normal_threshold;

        for contact in &self.contacts {
            let (Some(a), Some(b)) = (self.bodies.get(contact.body_a), self.bodies.get(contact.body_b))
            else {
                continue;
            };

            let inv_a = a.inverse_mass();
            let inv_b = b.inverse_mass();
            let inv_sum = inv_a + inv_b;
            // Two infinite masses: nothing can move
            if inv_sum <= 0.0 {
                continue;
            }

            let (Some(collider_a), Some(collider_b)) = (a.collider(), b.collider()) else {
                continue;
            };
            // Earlier contacts this step may already have pushed the pair apart
            let Some(current) = collide(collider_a, collider_b) else {
                trace!(a = ?contact.body_a, b = ?contact.body_b, "contact separated before resolution");
                continue;
            };

            let normal = current.normal;
            let correction = normal * (current.depth / inv_sum);

            let velocity_along_normal = (b.linear_velocity() - a.linear_velocity()).dot(normal);
            let impulse = if velocity_along_normal < 0.0 {
                let restitution = a.restitution() * b.restitution();
                normal * (-(1.0 + restitution) * velocity_along_normal / inv_sum)
            } else {
                Vec3::ZERO
            };

            if let Some(a) = self.bodies.get_mut(contact.body_a) {
                a.resolve_contact(-correction * inv_a, -impulse, -normal.y >= threshold);
            }
            if let Some(b) = self.bodies.get_mut(contact.body_b) {
                b.resolve_contact(correction * inv_b, impulse, normal.y >= threshold);
            }
        }
    }

    // ====== Queries ======

    /// Nearest active collider hit by the ray within `max_distance`.
    ///
    /// # Arguments
    ///
    /// * `origin` - Starting point of the ray
    /// * `direction` - Ray direction; normalized internally
    /// * `max_distance` - Hits further than this are ignored
    ///
    /// # Returns
    ///
    /// * `Some(hit)` - The closest hit (slab test for boxes, analytic for spheres)
    /// * `None` - Nothing hit, or `direction` is zero
    pub fn ray_cast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit> {
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO {
            return None;
        }

        let mut best: Option<RayHit> = None;
        for (handle, body) in self.bodies.iter() {
            if !body.is_active() {
                continue;
            }
            let Some(collider) = body.collider() else {
                continue;
            };

            let hit = match collider.shape() {
                ColliderShape::Box { .. } => {
                    ray_aabb_intersect(origin, direction, collider.min(), collider.max()).map(|t| {
                        let point = origin + direction * t;
                        (t, point, aabb_surface_normal(point, collider.min(), collider.max()))
                    })
                }
                ColliderShape::Sphere { radius } => {
                    ray_sphere_intersect(origin, direction, collider.center(), radius).map(|t| {
                        let point = origin + direction * t;
                        (t, point, (point - collider.center()).normalize_or_zero())
                    })
                }
            };

            if let Some((distance, point, normal)) = hit {
                let closer = best.is_none_or(|b| distance < b.distance);
                if distance <= max_distance && closer {
                    best = Some(RayHit {
                        body: handle,
                        point,
                        normal,
                        distance,
                    });
                }
            }
        }
        best
    }

    /// Replace `out` with one render pose per body, in arena order.
    pub fn write_poses(&self, out: &mut Vec<BodyPose>) {
        out.clear();
        out.extend(self.bodies.values().map(BodyPose::from_body));
    }
}
