//! Physics module for the Cinder engine
//!
//! Rigid-body simulation: semi-implicit Euler
//! integration, box/sphere collision detection, impulse-based resolution and
//! collision events.
//!
//! # Unit System
//!
//! **1 unit = 1 meter** (SI units throughout)
//!
//! - Distances in meters
//! - Velocities in m/s
//! - Accelerations in m/s²
//! - Mass in kg
//!
//! # Submodules
//!
//! - [`body`] - Rigid bodies, descriptors and handles
//! - [`collider`] - Collider shapes and cached world geometry
//! - [`collision`] - Broad/narrow phase and ray tests
//! - [`world`] - The simulation loop
//! - [`events`] - Collision event payload
//! - [`config`] - JSON-loadable world settings
//! - [`pose`] - GPU-ready body poses for the renderer
//!
//! # Known limitation
//!
//! Collision is axis-aligned: box rotation is visual only. Rotated boxes
//! would need the full separating-axis test with edge cross-product axes.

pub mod body;
pub mod collider;
pub mod collision;
pub mod config;
pub mod error;
pub mod events;
pub mod pose;
pub mod world;

pub use body::{BodyDesc, BodyHandle, BodyKind, EntityId, PhysicsBody};
pub use collider::{Collider, ColliderShape};
pub use collision::CollisionData;
pub use config::PhysicsConfig;
pub use error::PhysicsError;
pub use events::CollisionEvent;
pub use pose::BodyPose;
pub use world::{PhysicsWorld, RayHit};
