//! Body poses for rendering
//!
//! GPU-ready per-instance data the renderer uploads as-is. One entry per
//! body, written by [`PhysicsWorld::write_poses`](super::world::PhysicsWorld::write_poses).

use bytemuck::{Pod, Zeroable};

use super::body::PhysicsBody;

/// Set when the body is dynamic.
pub const POSE_FLAG_DYNAMIC: u32 = 1 << 0;
/// Set when the body rested on a floor during the last step.
pub const POSE_FLAG_GROUNDED: u32 = 1 << 1;
/// Set when the collider is a sphere (renderer picks the sphere mesh).
pub const POSE_FLAG_SPHERE: u32 = 1 << 2;

/// Per-instance pose. Layout matches the WGSL instance struct:
/// - offset 0:  model (mat4x4<f32>) = 64 bytes
/// - offset 64: half_extents (vec3<f32>) = 12 bytes
/// - offset 76: flags (u32) = 4 bytes
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct BodyPose {
    pub model: [[f32; 4]; 4],
    pub half_extents: [f32; 3],
    pub flags: u32,
}

static_assertions::assert_eq_size!(BodyPose, [u8; 80]);

impl BodyPose {
    pub fn from_body(body: &PhysicsBody) -> Self {
        let transform = body.transform();
        let half_extents = match body.collider() {
            Some(collider) => collider.shape().half_extents(),
            None => transform.scale() * 0.5,
        };

        let mut flags = 0;
        if body.is_dynamic() {
            flags |= POSE_FLAG_DYNAMIC;
        }
        if body.is_grounded() {
            flags |= POSE_FLAG_GROUNDED;
        }
        if body.collider().is_some_and(|c| c.shape().is_sphere()) {
            flags |= POSE_FLAG_SPHERE;
        }

        Self {
            model: transform.world_matrix().to_cols_array_2d(),
            half_extents: half_extents.to_array(),
            flags,
        }
    }
}
