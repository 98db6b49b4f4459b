//! Collision detection module
//!
//! Broad phase, narrow phase and ray queries for box and sphere colliders.
//!
//! # Box-Box (separating axis)
//!
//! Both boxes are projected onto the three world axes. Any axis where the
//! projections do not strictly overlap proves there is no collision. When all
//! three overlap, the axis with the smallest overlap becomes the contact
//! normal and the overlap the penetration depth (minimum translation vector).
//! Only world axes are tested, so this is exact for axis-aligned boxes only.
//!
//! Touching exactly is not a collision. Stacked bodies would otherwise report
//! a zero-depth contact every frame.
//!
//! # Normal convention
//!
//! [`CollisionData::normal`] always points from body A toward body B, so
//! resolving means pushing A along `-normal` and B along `+normal`.

use glam::Vec3;

use super::body::BodyHandle;
use super::collider::{Collider, ColliderShape};

/// Axes tested by the separating-axis test, in tie-break order.
const SAT_AXES: [Vec3; 3] = [Vec3::X, Vec3::Y, Vec3::Z];

/// Distances below this are treated as coincident centers.
const CENTER_EPSILON: f32 = 1e-6;

/// One overlapping pair found during detection. Lives for a single step.
///
/// `point_a` and `point_b` are not used by resolution, which only needs the
/// normal and depth. Their midpoint is published as
/// [`CollisionEvent::point`](super::events::CollisionEvent::point).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionData {
    /// Owner of the first collider passed to [`collide`]
    pub body_a: BodyHandle,
    /// Owner of the second collider
    pub body_b: BodyHandle,
    /// Unit normal pointing from A toward B.
    pub normal: Vec3,
    /// Penetration depth along `normal`, always > 0.
    pub depth: f32,
    /// Deepest point of A's surface inside B.
    pub point_a: Vec3,
    /// Deepest point of B's surface inside A.
    pub point_b: Vec3,
}

/// Shape-level contact before it is tagged with body handles.
///
/// Same conventions as [`CollisionData`]: the normal points from the first
/// shape toward the second.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit normal from shape A toward shape B
    pub normal: Vec3,
    /// Penetration depth along `normal` (> 0)
    pub depth: f32,
    /// Deepest point of A inside B
    pub point_a: Vec3,
    /// Deepest point of B inside A
    pub point_b: Vec3,
}

impl Contact {
    fn flipped(self) -> Self {
        Self {
            normal: -self.normal,
            depth: self.depth,
            point_a: self.point_b,
            point_b: self.point_a,
        }
    }
}

/// Broad phase: strict overlap of the cached AABBs.
///
/// Cheap rejection before the narrow phase. Boxes that only share a face
/// do not overlap.
///
/// # Arguments
///
/// * `a` - First collider, with up-to-date geometry
/// * `b` - Second collider, with up-to-date geometry
///
/// # Returns
///
/// `true` if the bounding boxes overlap on all three axes.
pub fn aabb_overlap(a: &Collider, b: &Collider) -> bool {
    let (a_min, a_max, b_min, b_max) = (a.min(), a.max(), b.min(), b.max());
    a_min.x < b_max.x
        && b_min.x < a_max.x
        && a_min.y < b_max.y
        && b_min.y < a_max.y
        && a_min.z < b_max.z
        && b_min.z < a_max.z
}

/// Full test for a pair of colliders: broad phase, then the narrow phase
/// matching their shapes.
///
/// A sphere against a box reuses the box-sphere test and flips the result,
/// so the normal always points from `a` toward `b`.
///
/// # Arguments
///
/// * `a` - First collider; becomes `body_a` of the result
/// * `b` - Second collider; becomes `body_b` of the result
///
/// # Returns
///
/// * `Some(data)` - The pair strictly overlaps
/// * `None` - Separated or exactly touching
pub fn collide(a: &Collider, b: &Collider) -> Option<CollisionData> {
    if !aabb_overlap(a, b) {
        return None;
    }

    let contact = match (a.shape(), b.shape()) {
        (ColliderShape::Box { .. }, ColliderShape::Box { .. }) => box_box(a, b),
        (ColliderShape::Sphere { radius: ra }, ColliderShape::Sphere { radius: rb }) => {
            sphere_sphere(a.center(), ra, b.center(), rb)
        }
        (ColliderShape::Box { .. }, ColliderShape::Sphere { radius }) => {
            box_sphere(a.min(), a.max(), b.center(), radius)
        }
        (ColliderShape::Sphere { radius }, ColliderShape::Box { .. }) => {
            box_sphere(b.min(), b.max(), a.center(), radius).map(Contact::flipped)
        }
    }?;

    Some(CollisionData {
        body_a: a.owner(),
        body_b: b.owner(),
        normal: contact.normal,
        depth: contact.depth,
        point_a: contact.point_a,
        point_b: contact.point_b,
    })
}

/// Separating-axis test over the world axes using the cached corner points.
///
/// # Arguments
///
/// * `a` - First box collider
/// * `b` - Second box collider
///
/// # Returns
///
/// * `Some(contact)` - Normal along the world axis of least overlap (ties
///   resolved X, then Y, then Z), with contact points at the centre of the
///   overlap region offset by half the depth
/// * `None` - Some world axis separates the boxes
pub fn box_box(a: &Collider, b: &Collider) -> Option<Contact> {
    let mut depth = f32::MAX;
    let mut axis = Vec3::X;

    for candidate in SAT_AXES {
        let (a_lo, a_hi) = a.project(candidate);
        let (b_lo, b_hi) = b.project(candidate);

        // Separated (or just touching) on this axis: no collision
        if a_lo >= b_hi || b_lo >= a_hi {
            return None;
        }

        let overlap = (b_hi - a_lo).min(a_hi - b_lo);
        // Strict comparison keeps the first tested axis on ties
        if overlap < depth {
            depth = overlap;
            axis = candidate;
        }
    }

    let normal = if (b.center() - a.center()).dot(axis) < 0.0 {
        -axis
    } else {
        axis
    };

    let overlap_min = a.min().max(b.min());
    let overlap_max = a.max().min(b.max());
    let mid = (overlap_min + overlap_max) * 0.5;
    let half = normal * (depth * 0.5);

    Some(Contact {
        normal,
        depth,
        point_a: mid + half,
        point_b: mid - half,
    })
}

/// Sphere-sphere test on center distance.
///
/// # Arguments
///
/// * `center_a` / `radius_a` - First sphere
/// * `center_b` / `radius_b` - Second sphere
///
/// # Returns
///
/// * `Some(contact)` - Distance strictly below the radius sum. Coincident
///   centers use `+X` as the normal.
/// * `None` - Separated or touching
pub fn sphere_sphere(center_a: Vec3, radius_a: f32, center_b: Vec3, radius_b: f32) -> Option<Contact> {
    let delta = center_b - center_a;
    let radii = radius_a + radius_b;
    let dist_sq = delta.length_squared();
    if dist_sq >= radii * radii {
        return None;
    }

    let dist = dist_sq.sqrt();
    let normal = if dist > CENTER_EPSILON {
        delta / dist
    } else {
        Vec3::X
    };

    Some(Contact {
        normal,
        depth: radii - dist,
        point_a: center_a + normal * radius_a,
        point_b: center_b - normal * radius_b,
    })
}

/// Box (A) against sphere (B). The normal points from the box toward the
/// sphere.
///
/// Uses the closest point on the box to the sphere center. When the center
/// is inside the box, the sphere is pushed out through the nearest face.
///
/// # Arguments
///
/// * `box_min` - Minimum corner of the box
/// * `box_max` - Maximum corner of the box
/// * `center` - Sphere center
/// * `radius` - Sphere radius
///
/// # Returns
///
/// * `Some(contact)` - Sphere and box strictly overlap
/// * `None` - No overlap, including exact touching
pub fn box_sphere(box_min: Vec3, box_max: Vec3, center: Vec3, radius: f32) -> Option<Contact> {
    let closest = center.clamp(box_min, box_max);
    let delta = center - closest;
    let dist_sq = delta.length_squared();

    if dist_sq > CENTER_EPSILON * CENTER_EPSILON {
        // Center outside the box
        if dist_sq >= radius * radius {
            return None;
        }
        let dist = dist_sq.sqrt();
        let normal = delta / dist;
        return Some(Contact {
            normal,
            depth: radius - dist,
            point_a: closest,
            point_b: center - normal * radius,
        });
    }

    // Center inside the box: push out through the nearest face
    let mut normal = Vec3::X;
    let mut face_distance = f32::MAX;
    for axis in SAT_AXES {
        let to_max = (box_max - center).dot(axis);
        let to_min = (center - box_min).dot(axis);
        let (distance, direction) = if to_max <= to_min {
            (to_max, axis)
        } else {
            (to_min, -axis)
        };
        if distance < face_distance {
            normal = direction;
            face_distance = distance;
        }
    }

    Some(Contact {
        normal,
        depth: face_distance + radius,
        point_a: center + normal * face_distance,
        point_b: center - normal * radius,
    })
}

/// Ray-AABB intersection using the slab method.
///
/// # Arguments
///
/// * `ray_origin` - Starting point of the ray
/// * `ray_dir` - Direction of the ray (must be normalized)
/// * `aabb_min` - Minimum corner of the AABB
/// * `aabb_max` - Maximum corner of the AABB
///
/// # Returns
///
/// * `Some(t)` - Distance to the entry point, or to the exit point when the
///   origin is inside the box
/// * `None` - The box is missed or lies entirely behind the origin
pub fn ray_aabb_intersect(ray_origin: Vec3, ray_dir: Vec3, aabb_min: Vec3, aabb_max: Vec3) -> Option<f32> {
    // Near-zero direction components become huge inverse values so the slab
    // for that axis is either always or never satisfied
    let inv = |d: f32| {
        if d.abs() > 1e-10 {
            1.0 / d
        } else {
            f32::MAX * if d.is_sign_negative() { -1.0 } else { 1.0 }
        }
    };
    let inv_dir = Vec3::new(inv(ray_dir.x), inv(ray_dir.y), inv(ray_dir.z));

    let t1 = (aabb_min - ray_origin) * inv_dir;
    let t2 = (aabb_max - ray_origin) * inv_dir;

    let t_min = t1.min(t2).max_element();
    let t_max = t1.max(t2).min_element();

    if t_max >= t_min && t_max >= 0.0 {
        if t_min >= 0.0 { Some(t_min) } else { Some(t_max) }
    } else {
        None
    }
}

/// Outward normal of the AABB face closest to `point`.
///
/// # Arguments
///
/// * `point` - Point on (or near) the AABB surface
/// * `aabb_min` - Minimum corner of the AABB
/// * `aabb_max` - Maximum corner of the AABB
///
/// # Returns
///
/// A unit world axis, signed to point away from the box center.
pub fn aabb_surface_normal(point: Vec3, aabb_min: Vec3, aabb_max: Vec3) -> Vec3 {
    let center = (aabb_min + aabb_max) * 0.5;
    let half_extents = (aabb_max - aabb_min) * 0.5;
    let normalized = (point - center) / half_extents;
    let abs = normalized.abs();

    if abs.x >= abs.y && abs.x >= abs.z {
        Vec3::new(normalized.x.signum(), 0.0, 0.0)
    } else if abs.y >= abs.z {
        Vec3::new(0.0, normalized.y.signum(), 0.0)
    } else {
        Vec3::new(0.0, 0.0, normalized.z.signum())
    }
}

/// Ray-sphere intersection.
///
/// # Arguments
///
/// * `ray_origin` - Starting point of the ray
/// * `ray_dir` - Direction of the ray (must be normalized)
/// * `center` - Sphere center
/// * `radius` - Sphere radius
///
/// # Returns
///
/// * `Some(t)` - Distance to the nearest intersection at or ahead of the
///   origin (the exit point when starting inside)
/// * `None` - The sphere is missed or behind the origin
pub fn ray_sphere_intersect(ray_origin: Vec3, ray_dir: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let oc = ray_origin - center;
    let b = oc.dot(ray_dir);
    let c = oc.length_squared() - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let sqrt_disc = disc.sqrt();
    let near = -b - sqrt_disc;
    let far = -b + sqrt_disc;
    if near >= 0.0 {
        Some(near)
    } else if far >= 0.0 {
        Some(far)
    } else {
        None
    }
}
