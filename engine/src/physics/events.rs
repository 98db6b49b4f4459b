//! Collision events
//!
//! Published once per colliding pair per step, during detection. Listeners
//! see every event before any contact of that step is resolved.

use glam::Vec3;

use super::body::{BodyHandle, EntityId};
use super::collision::CollisionData;

/// Payload handed to collision subscribers.
///
/// All geometry is the pre-resolution state of the step that found the pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionEvent {
    /// First body of the pair (lower arena order)
    pub body_a: BodyHandle,
    /// Second body of the pair
    pub body_b: BodyHandle,
    /// Gameplay entity owning `body_a`, if one was set
    pub entity_a: Option<EntityId>,
    /// Gameplay entity owning `body_b`, if one was set
    pub entity_b: Option<EntityId>,
    /// Unit normal pointing from A toward B.
    pub normal: Vec3,
    /// Penetration depth along `normal`
    pub depth: f32,
    /// World-space contact point, halfway between the two deepest surface
    /// points. Useful for spawning impact effects.
    pub point: Vec3,
}

impl CollisionEvent {
    /// Build the event for `data`, tagging both sides with their entities.
    pub fn new(data: &CollisionData, entity_a: Option<EntityId>, entity_b: Option<EntityId>) -> Self {
        Self {
            body_a: data.body_a,
            body_b: data.body_b,
            entity_a,
            entity_b,
            normal: data.normal,
            depth: data.depth,
            point: (data.point_a + data.point_b) * 0.5,
        }
    }

    /// True if `entity` is one of the two participants.
    pub fn involves(&self, entity: EntityId) -> bool {
        self.entity_a == Some(entity) || self.entity_b == Some(entity)
    }

    /// The participant that is not `entity`, if `entity` took part.
    ///
    /// # Returns
    ///
    /// * `Some(other)` - `entity` is in the pair; `other` is the opposite
    ///   side's entity, which may itself be unset
    /// * `None` - `entity` is not part of this collision
    pub fn other(&self, entity: EntityId) -> Option<Option<EntityId>> {
        if self.entity_a == Some(entity) {
            Some(self.entity_b)
        } else if self.entity_b == Some(entity) {
            Some(self.entity_a)
        } else {
            None
        }
    }
}
