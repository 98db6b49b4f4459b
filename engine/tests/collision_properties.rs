//! Collision Property Tests
//!
//! Randomized checks of the separating-axis test and the integrator:
//! - no false positives when any world axis separates two boxes
//! - strictly overlapping boxes always collide along a world axis
//! - collider geometry refresh is idempotent
//! - static bodies never move, whatever the gravity

use cinder_engine::physics::collision::collide;
use cinder_engine::physics::{BodyDesc, BodyHandle, Collider, ColliderShape, PhysicsWorld};
use glam::Vec3;
use proptest::prelude::*;

fn vec3(range: std::ops::Range<f32>) -> impl Strategy<Value = Vec3> {
    (range.clone(), range.clone(), range).prop_map(|(x, y, z)| Vec3::new(x, y, z))
}

fn cuboid(position: Vec3, half_extents: Vec3) -> Collider {
    Collider::new(ColliderShape::cuboid(half_extents), BodyHandle::default(), position)
        .expect("positive extents")
}

proptest! {
    #[test]
    fn separated_boxes_never_collide(
        center_a in vec3(-50.0..50.0),
        half_a in vec3(0.05..5.0),
        half_b in vec3(0.05..5.0),
        offset_b in vec3(-10.0..10.0),
        axis in 0usize..3,
        gap in 0.0f32..5.0,
        negative in any::<bool>(),
    ) {
        let mut center_b = center_a + offset_b;
        let separation = half_a[axis] + half_b[axis] + gap;
        center_b[axis] = if negative {
            center_a[axis] - separation - 1e-3
        } else {
            center_a[axis] + separation + 1e-3
        };

        let a = cuboid(center_a, half_a);
        let b = cuboid(center_b, half_b);
        prop_assert!(collide(&a, &b).is_none());
        prop_assert!(collide(&b, &a).is_none());
    }

    #[test]
    fn overlapping_boxes_collide_along_world_axis(
        center_a in vec3(-50.0..50.0),
        half_a in vec3(0.05..5.0),
        half_b in vec3(0.05..5.0),
        fraction in vec3(-0.9..0.9),
    ) {
        let offset = (half_a + half_b) * fraction;
        let a = cuboid(center_a, half_a);
        let b = cuboid(center_a + offset, half_b);

        let hit = collide(&a, &b);
        prop_assert!(hit.is_some());
        let hit = hit.unwrap();
        prop_assert!(hit.depth > 0.0);

        let abs = hit.normal.abs();
        let unit_axes = [Vec3::X, Vec3::Y, Vec3::Z];
        prop_assert!(unit_axes.contains(&abs), "normal {} is not a world axis", hit.normal);
        // Never deeper than the overlap on the axis it picked
        let axis = unit_axes.iter().position(|a| *a == abs).unwrap();
        let overlap = (half_a[axis] + half_b[axis]) - offset[axis].abs();
        prop_assert!(hit.depth <= overlap + 1e-3);
    }

    #[test]
    fn update_points_is_idempotent(
        half in vec3(0.05..5.0),
        position in vec3(-100.0..100.0),
    ) {
        let mut collider = cuboid(Vec3::ZERO, half);
        collider.update_points(position);
        let once = collider.clone();
        collider.update_points(position);
        prop_assert_eq!(collider, once);
    }

    #[test]
    fn static_bodies_never_move(
        gravity in vec3(-30.0..30.0),
        anchor in vec3(-5.0..5.0),
        drop_height in 0.5f32..4.0,
        steps in 1usize..120,
    ) {
        let mut world = PhysicsWorld::new(gravity);
        let fixed = world.add_body(&BodyDesc::fixed(anchor)).unwrap();
        world.add_collider(fixed, ColliderShape::cuboid(Vec3::new(3.0, 0.5, 3.0))).unwrap();

        let falling = world
            .add_body(&BodyDesc::dynamic(anchor + Vec3::Y * drop_height, 1.0).with_restitution(1.0))
            .unwrap();
        world.add_collider(falling, ColliderShape::cuboid(Vec3::splat(0.5))).unwrap();

        for _ in 0..steps {
            world.update(1.0 / 60.0);
            prop_assert_eq!(world.body(fixed).unwrap().position(), anchor);
        }
    }
}
