//! Transform
//!
//! Position/rotation/scale with a cached world matrix. The matrix is rebuilt
//! by every setter so readers never see a stale pose.

use glam::{EulerRot, Mat4, Quat, Vec3};

/// Pose of an entity in world space.
///
/// `rotation` is an Euler XYZ vector in radians. Collision ignores it; it only
/// feeds the world matrix handed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    position: Vec3,
    rotation: Vec3,
    scale: Vec3,
    world_matrix: Mat4,
}

impl Default for Transform {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}

impl Transform {
    /// Create a transform at `position` with no rotation and unit scale.
    pub fn new(position: Vec3) -> Self {
        Self::with_parts(position, Vec3::ZERO, Vec3::ONE)
    }

    pub fn with_parts(position: Vec3, rotation: Vec3, scale: Vec3) -> Self {
        let mut transform = Self {
            position,
            rotation,
            scale,
            world_matrix: Mat4::IDENTITY,
        };
        transform.rebuild();
        transform
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    /// Cached `translate * rotate * scale` matrix.
    pub fn world_matrix(&self) -> Mat4 {
        self.world_matrix
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.rebuild();
    }

    /// Move by `offset` relative to the current position.
    pub fn translate(&mut self, offset: Vec3) {
        self.position += offset;
        self.rebuild();
    }

    pub fn set_rotation(&mut self, rotation: Vec3) {
        self.rotation = rotation;
        self.rebuild();
    }

    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
        self.rebuild();
    }

    fn rebuild(&mut self) {
        let rotation = Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        );
        self.world_matrix =
            Mat4::from_scale_rotation_translation(self.scale, rotation, self.position);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_mat(a: Mat4, b: Mat4) -> bool {
        a.abs_diff_eq(b, 1e-5)
    }

    #[test]
    fn test_new_is_pure_translation() {
        let t = Transform::new(Vec3::new(1.0, 2.0, 3.0));
        assert!(approx_mat(
            t.world_matrix(),
            Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0))
        ));
    }

    #[test]
    fn test_setters_rebuild_matrix() {
        let mut t = Transform::default();
        t.set_scale(Vec3::new(2.0, 1.0, 4.0));
        t.set_rotation(Vec3::new(0.0, std::f32::consts::FRAC_PI_2, 0.0));
        t.set_position(Vec3::new(5.0, 0.0, 0.0));

        let expected = Mat4::from_translation(Vec3::new(5.0, 0.0, 0.0))
            * Mat4::from_quat(Quat::from_euler(
                EulerRot::XYZ,
                0.0,
                std::f32::consts::FRAC_PI_2,
                0.0,
            ))
            * Mat4::from_scale(Vec3::new(2.0, 1.0, 4.0));
        assert!(approx_mat(t.world_matrix(), expected));
    }

    #[test]
    fn test_translate_accumulates() {
        let mut t = Transform::new(Vec3::ONE);
        t.translate(Vec3::new(0.0, -0.5, 0.0));
        t.translate(Vec3::new(0.0, -0.5, 0.0));
        assert_eq!(t.position(), Vec3::new(1.0, 0.0, 1.0));
        assert!(approx_mat(
            t.world_matrix(),
            Mat4::from_translation(Vec3::new(1.0, 0.0, 1.0))
        ));
    }
}
