//! Colliders
//!
//! Shape description attached to a body plus the world-space data derived
//! from the body's position: AABB extrema and the eight box corners.
//!
//! ```text
//!     7----------6        min = corner 0
//!    /|         /|        max = corner 6
//!   3----------2 |
//!   | 4--------|-5        y
//!   |/         |/         | z
//!   0----------1          |/__ x
//! ```
//!
//! Geometry is cached and must be refreshed with [`Collider::update_points`]
//! whenever the owning body moves. The world does this for every active body
//! before collision detection runs.

use glam::Vec3;

use super::body::BodyHandle;
use super::error::PhysicsError;

/// Number of cached corner points per collider.
pub const CORNER_COUNT: usize = 8;

/// Shape of a collider in body-local space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColliderShape {
    /// Axis-aligned box, described by half its size on each axis.
    Box { half_extents: Vec3 },
    /// Sphere centered on the body position. Its AABB is a cube of side
    /// `2 * radius`.
    Sphere { radius: f32 },
}

impl ColliderShape {
    /// Box shape from half extents. Validated when attached.
    pub fn cuboid(half_extents: Vec3) -> Self {
        Self::Box { half_extents }
    }

    /// Sphere shape from a radius. Validated when attached.
    pub fn ball(radius: f32) -> Self {
        Self::Sphere { radius }
    }

    /// Reject degenerate shapes that would poison the solver with NaNs.
    pub fn validate(&self) -> Result<(), PhysicsError> {
        match *self {
            Self::Box { half_extents } => {
                if !half_extents.is_finite() || half_extents.min_element() <= 0.0 {
                    return Err(PhysicsError::InvalidShape(format!(
                        "box half extents must be finite and > 0, got {half_extents}"
                    )));
                }
            }
            Self::Sphere { radius } => {
                if !radius.is_finite() || radius <= 0.0 {
                    return Err(PhysicsError::InvalidShape(format!(
                        "sphere radius must be finite and > 0, got {radius}"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Half size of the shape's bounding box.
    pub fn half_extents(&self) -> Vec3 {
        match *self {
            Self::Box { half_extents } => half_extents,
            Self::Sphere { radius } => Vec3::splat(radius),
        }
    }

    /// Full size of the shape's bounding box. Used as the visual scale.
    pub fn full_extents(&self) -> Vec3 {
        self.half_extents() * 2.0
    }

    pub fn is_sphere(&self) -> bool {
        matches!(self, Self::Sphere { .. })
    }
}

/// A shape attached to exactly one body, with cached world-space geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct Collider {
    shape: ColliderShape,
    owner: BodyHandle,
    center: Vec3,
    min: Vec3,
    max: Vec3,
    corner_points: [Vec3; CORNER_COUNT],
    /// Set by collision resolution when the owner rests on a floor-like
    /// surface; reset each step the owner is integrated.
    pub is_grounded: bool,
    /// Debug label. Never used for identity; the owner handle is.
    pub identifier: Option<String>,
}

impl Collider {
    /// Build a collider for `owner` and compute its geometry at `position`.
    ///
    /// # Arguments
    ///
    /// * `shape` - Box or sphere, with strictly positive finite size
    /// * `owner` - Body this collider belongs to
    /// * `position` - Owner's current world position
    ///
    /// # Returns
    ///
    /// * `Ok(collider)` - Geometry already computed
    /// * `Err(PhysicsError::InvalidShape)` - Degenerate shape
    pub fn new(shape: ColliderShape, owner: BodyHandle, position: Vec3) -> Result<Self, PhysicsError> {
        shape.validate()?;
        let mut collider = Self {
            shape,
            owner,
            center: position,
            min: position,
            max: position,
            corner_points: [position; CORNER_COUNT],
            is_grounded: false,
            identifier: None,
        };
        collider.update_points(position);
        Ok(collider)
    }

    /// Attach a debug label, e.g. for log output.
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    pub fn shape(&self) -> ColliderShape {
        self.shape
    }

    /// Body this collider belongs to. Used as identity in contacts.
    pub fn owner(&self) -> BodyHandle {
        self.owner
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    /// Minimum corner of the world-space AABB (corner 0).
    pub fn min(&self) -> Vec3 {
        self.min
    }

    /// Maximum corner of the world-space AABB (corner 6).
    pub fn max(&self) -> Vec3 {
        self.max
    }

    /// The eight corners, numbered as in the module diagram.
    pub fn corner_points(&self) -> &[Vec3; CORNER_COUNT] {
        &self.corner_points
    }

    /// Recompute extrema and corners from the owner's position.
    pub fn update_points(&mut self, position: Vec3) {
        let half = self.shape.half_extents();
        let min = position - half;
        let max = position + half;

        self.center = position;
        self.min = min;
        self.max = max;
        self.corner_points = [
            min,
            Vec3::new(max.x, min.y, min.z),
            Vec3::new(max.x, max.y, min.z),
            Vec3::new(min.x, max.y, min.z),
            Vec3::new(min.x, min.y, max.z),
            Vec3::new(max.x, min.y, max.z),
            max,
            Vec3::new(min.x, max.y, max.z),
        ];
    }

    /// Project the corners onto `axis` and return the `(min, max)` interval.
    pub fn project(&self, axis: Vec3) -> (f32, f32) {
        let first = self.corner_points[0].dot(axis);
        self.corner_points[1..]
            .iter()
            .map(|p| p.dot(axis))
            .fold((first, first), |(lo, hi), proj| (lo.min(proj), hi.max(proj)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::KeyData;

    fn handle() -> BodyHandle {
        BodyHandle::from(KeyData::from_ffi(1))
    }

    #[test]
    fn test_box_geometry() {
        let c = Collider::new(
            ColliderShape::cuboid(Vec3::new(1.0, 0.5, 2.0)),
            handle(),
            Vec3::new(10.0, 0.0, -1.0),
        )
        .unwrap();

        assert_eq!(c.min(), Vec3::new(9.0, -0.5, -3.0));
        assert_eq!(c.max(), Vec3::new(11.0, 0.5, 1.0));
        assert_eq!(c.corner_points()[0], c.min());
        assert_eq!(c.corner_points()[6], c.max());
        assert_eq!(c.corner_points()[1], Vec3::new(11.0, -0.5, -3.0));
        assert_eq!(c.corner_points()[7], Vec3::new(9.0, 0.5, 1.0));
    }

    #[test]
    fn test_update_points_is_idempotent() {
        let mut c =
            Collider::new(ColliderShape::cuboid(Vec3::splat(0.5)), handle(), Vec3::ZERO).unwrap();
        let pos = Vec3::new(3.25, -1.5, 0.125);
        c.update_points(pos);
        let first = c.clone();
        c.update_points(pos);
        assert_eq!(c, first);
    }

    #[test]
    fn test_project_interval() {
        let c = Collider::new(ColliderShape::cuboid(Vec3::ONE), handle(), Vec3::new(5.0, 0.0, 0.0))
            .unwrap();
        assert_eq!(c.project(Vec3::X), (4.0, 6.0));
        assert_eq!(c.project(Vec3::Y), (-1.0, 1.0));
    }

    #[test]
    fn test_identifier_is_a_label_only() {
        let plain = Collider::new(ColliderShape::ball(1.0), handle(), Vec3::ZERO).unwrap();
        let labelled = plain.clone().with_identifier("crate_01");
        assert_eq!(labelled.identifier.as_deref(), Some("crate_01"));
        assert_eq!(labelled.owner(), plain.owner());
        assert_eq!(labelled.min(), plain.min());
    }

    #[test]
    fn test_sphere_bounds() {
        let c = Collider::new(ColliderShape::ball(2.0), handle(), Vec3::Y).unwrap();
        assert_eq!(c.min(), Vec3::new(-2.0, -1.0, -2.0));
        assert_eq!(c.max(), Vec3::new(2.0, 3.0, 2.0));
        assert!(c.shape().is_sphere());
    }

    #[test]
    fn test_invalid_shapes() {
        assert!(ColliderShape::cuboid(Vec3::new(1.0, 0.0, 1.0)).validate().is_err());
        assert!(ColliderShape::cuboid(Vec3::new(1.0, f32::NAN, 1.0)).validate().is_err());
        assert!(ColliderShape::ball(-1.0).validate().is_err());
        assert!(Collider::new(ColliderShape::ball(0.0), handle(), Vec3::ZERO).is_err());
    }
}
