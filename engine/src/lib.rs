//! Cinder Engine Library
//!
//! Core of a small real-time 3D engine: a rigid-body physics world plus the
//! leaf utilities it is built on. Rendering, windowing and asset loading live
//! in the host application and talk to this crate through body poses and
//! collision events.
//!
//! # Modules
//!
//! - [`physics`] - Bodies, colliders, collision detection/response, world
//! - [`math`] - Transform with cached world matrix
//! - [`event`] - Typed publish/subscribe bus
//! - [`clock`] - Fixed timestep accumulator
//!
//! # Example
//!
//! ```
//! use cinder_engine::physics::{BodyDesc, ColliderShape, PhysicsWorld};
//! use glam::Vec3;
//!
//! let mut world = PhysicsWorld::new(Vec3::new(0.0, -9.81, 0.0));
//! let ball = world.add_body(&BodyDesc::dynamic(Vec3::new(0.0, 5.0, 0.0), 1.0)).unwrap();
//! world.add_collider(ball, ColliderShape::ball(0.5)).unwrap();
//!
//! world.on_collision(|event| {
//!     let _ = (event.body_a, event.body_b, event.depth);
//! });
//!
//! let mut clock = world.fixed_timestep();
//! world.step_frame(&mut clock, 1.0 / 60.0);
//! ```

pub mod clock;
pub mod event;
pub mod math;
pub mod physics;

pub use clock::FixedTimestep;
pub use event::{EventBus, SubscriptionId};
pub use math::Transform;
pub use physics::{
    BodyDesc, BodyHandle, BodyKind, ColliderShape, CollisionEvent, EntityId, PhysicsBody,
    PhysicsConfig, PhysicsError, PhysicsWorld,
};
