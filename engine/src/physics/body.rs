//! Rigid bodies
//!
//! A body carries its pose, linear motion state, mass properties and at most
//! one collider. Bodies are created and owned by the
//! [`PhysicsWorld`](super::world::PhysicsWorld); callers refer to them through
//! [`BodyHandle`]s.
//!
//! # Example
//!
//! ```
//! use cinder_engine::physics::{BodyDesc, BodyKind, EntityId};
//! use glam::Vec3;
//!
//! let desc = BodyDesc::dynamic(Vec3::new(0.0, 10.0, 0.0), 2.0)
//!     .with_restitution(0.3)
//!     .with_entity(EntityId(42));
//! assert_eq!(desc.kind, BodyKind::Dynamic);
//! ```

use glam::Vec3;

use super::collider::Collider;
use super::error::PhysicsError;
use crate::math::Transform;

slotmap::new_key_type! {
    /// Generational handle to a body owned by a world. Stays invalid once the
    /// body is removed, even if its slot is reused.
    pub struct BodyHandle;
}

/// Typed back-reference to the gameplay entity that owns a body.
/// The physics world never interprets it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u64);

/// How a body takes part in the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BodyKind {
    /// Infinite mass. Never moved by the integrator or the resolver.
    Static,
    /// Integrated every step and moved by contact resolution.
    #[default]
    Dynamic,
}

/// Creation parameters for a body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyDesc {
    /// Initial world position (must be finite)
    pub position: Vec3,
    /// Static or dynamic
    pub kind: BodyKind,
    /// Mass in kg. Must be > 0 for dynamic bodies, ignored for static ones.
    pub mass: f32,
    /// Bounciness in `0..=1`. Combined multiplicatively per contact.
    pub restitution: f32,
    /// Inactive bodies are skipped by every phase of the step
    pub is_active: bool,
    /// Gameplay entity echoed back in collision events
    pub entity: Option<EntityId>,
}

impl Default for BodyDesc {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            kind: BodyKind::Dynamic,
            mass: 1.0,
            restitution: 0.0,
            is_active: true,
            entity: None,
        }
    }
}

impl BodyDesc {
    /// A dynamic body with the given mass in kg.
    pub fn dynamic(position: Vec3, mass: f32) -> Self {
        Self {
            position,
            mass,
            ..Self::default()
        }
    }

    /// A static body. The name avoids the `static` keyword.
    pub fn fixed(position: Vec3) -> Self {
        Self {
            position,
            kind: BodyKind::Static,
            mass: 0.0,
            ..Self::default()
        }
    }

    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution;
        self
    }

    pub fn with_entity(mut self, entity: EntityId) -> Self {
        self.entity = Some(entity);
        self
    }

    /// Start the body switched off. See [`PhysicsBody::set_active`].
    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }
}

/// A simulated rigid object.
///
/// Fields are private so the collider geometry can never drift from the
/// transform: every setter that moves the body refreshes it.
#[derive(Debug, Clone)]
pub struct PhysicsBody {
    transform: Transform,
    linear_velocity: Vec3,
    // Reserved for rotational dynamics; never integrated
    angular_velocity: Vec3,
    accumulated_force: Vec3,
    mass: f32,
    inverse_mass: f32,
    restitution: f32,
    kind: BodyKind,
    is_active: bool,
    collider: Option<Collider>,
    entity: Option<EntityId>,
}

impl PhysicsBody {
    /// Validate `desc` and build a body at rest.
    ///
    /// # Returns
    ///
    /// * `Ok(body)` - Zero velocity and force, `inverse_mass = 1 / mass` for
    ///   dynamic bodies and 0 for static ones
    /// * `Err(PhysicsError::InvalidMass)` - Dynamic body with a mass that is
    ///   not finite and positive
    /// * `Err(PhysicsError::InvalidRestitution)` - Restitution outside `0..=1`
    /// * `Err(PhysicsError::InvalidConfig)` - Non-finite position
    pub fn new(desc: &BodyDesc) -> Result<Self, PhysicsError> {
        let inverse_mass = match desc.kind {
            BodyKind::Static => 0.0,
            BodyKind::Dynamic => {
                if !desc.mass.is_finite() || desc.mass <= 0.0 {
                    return Err(PhysicsError::InvalidMass(desc.mass));
                }
                1.0 / desc.mass
            }
        };
        if !(0.0..=1.0).contains(&desc.restitution) {
            return Err(PhysicsError::InvalidRestitution(desc.restitution));
        }
        if !desc.position.is_finite() {
            return Err(PhysicsError::InvalidConfig(format!(
                "body position must be finite, got {}",
                desc.position
            )));
        }

        Ok(Self {
            transform: Transform::new(desc.position),
            linear_velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            accumulated_force: Vec3::ZERO,
            mass: desc.mass,
            inverse_mass,
            restitution: desc.restitution,
            kind: desc.kind,
            is_active: desc.is_active,
            collider: None,
            entity: desc.entity,
        })
    }

    pub fn kind(&self) -> BodyKind {
        self.kind
    }

    pub fn is_static(&self) -> bool {
        self.kind == BodyKind::Static
    }

    pub fn is_dynamic(&self) -> bool {
        self.kind == BodyKind::Dynamic
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Toggle simulation. Geometry is refreshed so a reactivated body is never
    /// tested with stale extents.
    pub fn set_active(&mut self, active: bool) {
        self.is_active = active;
        self.refresh_collider();
    }

    /// Pose used for rendering. Its scale is the collider's full extent.
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn position(&self) -> Vec3 {
        self.transform.position()
    }

    /// Teleport the body. Allowed for static bodies too (level editing).
    pub fn set_position(&mut self, position: Vec3) {
        self.transform.set_position(position);
        self.refresh_collider();
    }

    /// Visual rotation only; collision stays axis-aligned.
    pub fn set_rotation(&mut self, rotation: Vec3) {
        self.transform.set_rotation(rotation);
    }

    pub fn linear_velocity(&self) -> Vec3 {
        self.linear_velocity
    }

    /// Ignored for static bodies.
    pub fn set_linear_velocity(&mut self, velocity: Vec3) {
        if self.is_dynamic() {
            self.linear_velocity = velocity;
        }
    }

    /// Always zero; kept so hosts can read a complete motion state.
    pub fn angular_velocity(&self) -> Vec3 {
        self.angular_velocity
    }

    /// Forces applied since the last integration. Zero right after a step.
    pub fn accumulated_force(&self) -> Vec3 {
        self.accumulated_force
    }

    /// Mass as given at creation. Meaningless for static bodies.
    pub fn mass(&self) -> f32 {
        self.mass
    }

    /// `1 / mass` for dynamic bodies, 0 for static ones.
    pub fn inverse_mass(&self) -> f32 {
        self.inverse_mass
    }

    pub fn restitution(&self) -> f32 {
        self.restitution
    }

    pub fn entity(&self) -> Option<EntityId> {
        self.entity
    }

    pub fn collider(&self) -> Option<&Collider> {
        self.collider.as_ref()
    }

    pub fn collider_mut(&mut self) -> Option<&mut Collider> {
        self.collider.as_mut()
    }

    /// Whether the body rested on a floor-like contact during the last step.
    pub fn is_grounded(&self) -> bool {
        self.collider.as_ref().is_some_and(|c| c.is_grounded)
    }

    /// Attach `collider`, replacing and returning any previous one. The
    /// visual scale follows the collider's full extent.
    pub fn attach_collider(&mut self, mut collider: Collider) -> Option<Collider> {
        self.transform.set_scale(collider.shape().full_extents());
        collider.update_points(self.transform.position());
        self.collider.replace(collider)
    }

    /// Accumulate a force for the next integration step. No-op on static bodies.
    pub fn apply_force(&mut self, force: Vec3) {
        if self.is_static() {
            return;
        }
        self.accumulated_force += force;
    }

    /// Instant velocity change scaled by inverse mass. No-op on static bodies.
    pub fn apply_linear_impulse(&mut self, impulse: Vec3) {
        if self.is_static() {
            return;
        }
        self.linear_velocity += impulse * self.inverse_mass;
    }

    /// Semi-implicit Euler step. Returns `false` when the body was skipped
    /// (inactive or static).
    pub(super) fn integrate(&mut self, gravity: Vec3, dt: f32) -> bool {
        if !self.is_active || self.is_static() {
            return false;
        }

        if let Some(collider) = self.collider.as_mut() {
            collider.is_grounded = false;
        }

        // Gravity is an acceleration; scaling by mass makes every body fall alike
        self.accumulated_force += gravity * self.mass;

        let acceleration = self.accumulated_force * self.inverse_mass;
        self.linear_velocity += acceleration * dt;
        self.transform.translate(self.linear_velocity * dt);
        self.refresh_collider();

        self.accumulated_force = Vec3::ZERO;
        true
    }

    /// Apply one contact's share of positional correction and impulse.
    pub(super) fn resolve_contact(&mut self, displacement: Vec3, impulse: Vec3, grounded: bool) {
        if self.is_static() {
            return;
        }

        self.transform.translate(displacement);
        self.apply_linear_impulse(impulse);
        self.refresh_collider();

        if grounded {
            if let Some(collider) = self.collider.as_mut() {
                collider.is_grounded = true;
            }
        }
    }

    fn refresh_collider(&mut self) {
        let position = self.transform.position();
        if let Some(collider) = self.collider.as_mut() {
            collider.update_points(position);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::collider::ColliderShape;

    #[test]
    fn test_dynamic_body_mass_properties() {
        let body = PhysicsBody::new(&BodyDesc::dynamic(Vec3::ZERO, 4.0)).unwrap();
        assert_eq!(body.inverse_mass(), 0.25);
        assert_eq!(body.linear_velocity(), Vec3::ZERO);
        assert_eq!(body.accumulated_force(), Vec3::ZERO);
        assert!(body.is_dynamic());
    }

    #[test]
    fn test_static_body_has_zero_inverse_mass() {
        let body = PhysicsBody::new(&BodyDesc::fixed(Vec3::ONE)).unwrap();
        assert_eq!(body.inverse_mass(), 0.0);
        assert!(body.is_static());
    }

    #[test]
    fn test_rejects_bad_descriptors() {
        assert!(matches!(
            PhysicsBody::new(&BodyDesc::dynamic(Vec3::ZERO, 0.0)),
            Err(PhysicsError::InvalidMass(_))
        ));
        assert!(matches!(
            PhysicsBody::new(&BodyDesc::dynamic(Vec3::ZERO, -2.0)),
            Err(PhysicsError::InvalidMass(_))
        ));
        assert!(matches!(
            PhysicsBody::new(&BodyDesc::dynamic(Vec3::ZERO, f32::INFINITY)),
            Err(PhysicsError::InvalidMass(_))
        ));
        assert!(matches!(
            PhysicsBody::new(&BodyDesc::dynamic(Vec3::ZERO, 1.0).with_restitution(1.5)),
            Err(PhysicsError::InvalidRestitution(_))
        ));
    }

    #[test]
    fn test_forces_ignored_on_static() {
        let mut body = PhysicsBody::new(&BodyDesc::fixed(Vec3::ZERO)).unwrap();
        body.apply_force(Vec3::X);
        body.apply_linear_impulse(Vec3::X);
        body.set_linear_velocity(Vec3::Y);
        assert_eq!(body.accumulated_force(), Vec3::ZERO);
        assert_eq!(body.linear_velocity(), Vec3::ZERO);
        assert!(!body.integrate(Vec3::new(0.0, -9.81, 0.0), 0.1));
        assert_eq!(body.position(), Vec3::ZERO);
    }

    #[test]
    fn test_impulse_scales_by_inverse_mass() {
        let mut body = PhysicsBody::new(&BodyDesc::dynamic(Vec3::ZERO, 2.0)).unwrap();
        body.apply_linear_impulse(Vec3::new(4.0, 0.0, 0.0));
        assert_eq!(body.linear_velocity(), Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn test_integrate_clears_force() {
        let mut body = PhysicsBody::new(&BodyDesc::dynamic(Vec3::ZERO, 2.0)).unwrap();
        body.apply_force(Vec3::new(4.0, 0.0, 0.0));
        assert!(body.integrate(Vec3::ZERO, 0.5));
        // a = 2, v = 1, x = 0.5
        assert_eq!(body.linear_velocity(), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(body.position(), Vec3::new(0.5, 0.0, 0.0));
        assert_eq!(body.accumulated_force(), Vec3::ZERO);
    }

    #[test]
    fn test_attach_collider_rescales_and_replaces() {
        let mut body = PhysicsBody::new(&BodyDesc::dynamic(Vec3::new(0.0, 2.0, 0.0), 1.0)).unwrap();
        let first = Collider::new(
            ColliderShape::cuboid(Vec3::new(1.0, 0.5, 0.25)),
            BodyHandle::default(),
            Vec3::ZERO,
        )
        .unwrap();
        assert!(body.attach_collider(first).is_none());
        assert_eq!(body.transform().scale(), Vec3::new(2.0, 1.0, 0.5));
        // Geometry follows the body, not the position the collider was built at
        assert_eq!(body.collider().unwrap().min(), Vec3::new(-1.0, 1.5, -0.25));

        let second =
            Collider::new(ColliderShape::ball(0.75), BodyHandle::default(), Vec3::ZERO).unwrap();
        let old = body.attach_collider(second).unwrap();
        assert!(!old.shape().is_sphere());
        assert_eq!(body.transform().scale(), Vec3::splat(1.5));
    }

    fn boxed_body(desc: &BodyDesc) -> PhysicsBody {
        let mut body = PhysicsBody::new(desc).unwrap();
        let collider = Collider::new(
            ColliderShape::cuboid(Vec3::splat(0.5)),
            BodyHandle::default(),
            desc.position,
        )
        .unwrap();
        body.attach_collider(collider);
        body
    }

    #[test]
    fn test_set_position_refreshes_collider() {
        let mut body = boxed_body(&BodyDesc::fixed(Vec3::ZERO));
        body.set_position(Vec3::new(3.0, 1.0, -2.0));

        let collider = body.collider().unwrap();
        assert_eq!(collider.center(), Vec3::new(3.0, 1.0, -2.0));
        assert_eq!(collider.min(), Vec3::new(2.5, 0.5, -2.5));
        assert_eq!(collider.max(), Vec3::new(3.5, 1.5, -1.5));
        assert_eq!(body.transform().world_matrix().w_axis.truncate(), Vec3::new(3.0, 1.0, -2.0));
    }

    #[test]
    fn test_set_rotation_is_visual_only() {
        let mut body = boxed_body(&BodyDesc::dynamic(Vec3::ZERO, 1.0));
        let matrix_before = body.transform().world_matrix();
        let collider_before = body.collider().unwrap().clone();

        body.set_rotation(Vec3::new(0.0, 0.7, 0.0));

        assert_ne!(body.transform().world_matrix(), matrix_before);
        assert_eq!(body.transform().rotation(), Vec3::new(0.0, 0.7, 0.0));
        assert_eq!(body.collider().unwrap(), &collider_before);
        assert_eq!(body.position(), Vec3::ZERO);
    }

    #[test]
    fn test_inactive_body_skips_integration_until_reactivated() {
        let mut body = boxed_body(&BodyDesc::dynamic(Vec3::ZERO, 1.0).inactive());
        let gravity = Vec3::new(0.0, -10.0, 0.0);
        assert!(!body.integrate(gravity, 0.1));
        assert_eq!(body.position(), Vec3::ZERO);

        body.set_active(true);
        assert!(body.is_active());
        assert!(body.integrate(gravity, 0.1));
        assert!(body.position().y < 0.0);
        assert_eq!(body.collider().unwrap().center(), body.position());
    }
}
