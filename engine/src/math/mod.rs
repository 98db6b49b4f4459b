//! Math Module
//!
//! Pose helpers shared by bodies and renderables. Vector and matrix types come
//! straight from glam.

pub mod transform;

pub use glam::{Mat4, Quat, Vec3};
pub use transform::Transform;
