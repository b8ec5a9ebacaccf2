//! Physics stepping, system ordering, and body-to-transform sync.

use bevy::prelude::*;
use nalgebra::{Point3, UnitQuaternion};

use lanyard_physics::{Chain, PhysicsWorld, RigidBodyHandle};

/// Proportional gain pulling the card's yaw back toward the screen.
const TILT_GAIN: f32 = 0.25;

/// Systems that write body state ahead of the step (drag drive, tilt).
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct PrePhysicsSet;

/// Systems that read freshly stepped state (transform sync).
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct PostPhysicsSet;

/// Simulation world owned by the app as a single resource.
#[derive(Resource)]
pub struct Physics {
    /// The Rapier world wrapper.
    pub world: PhysicsWorld,
}

/// Handle registry for the scene's fixed body set.
#[derive(Resource, Clone, Copy)]
pub struct BandRig {
    /// Anchor, links, and card handles.
    pub chain: Chain,
}

/// Attaches an entity's `Transform` to a physics body.
#[derive(Component)]
pub struct PhysicsBody(pub RigidBodyHandle);

/// Plugin wiring the fixed-timestep simulation loop.
pub struct PhysicsPlugin;

impl Plugin for PhysicsPlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(FixedUpdate, PrePhysicsSet.before(PostPhysicsSet))
            .add_systems(
                FixedUpdate,
                (
                    settle_card_tilt.in_set(PrePhysicsSet),
                    step_physics.after(PrePhysicsSet).before(PostPhysicsSet),
                    sync_body_transforms.in_set(PostPhysicsSet),
                ),
            );
    }
}

fn step_physics(mut physics: ResMut<Physics>) {
    physics.world.step();
}

/// Tilt the card back toward the screen.
///
/// Runs every simulated frame regardless of drag state: the y angular
/// velocity becomes `ay - yaw * 0.25`, x and z pass through.
fn settle_card_tilt(mut physics: ResMut<Physics>, rig: Res<BandRig>) {
    let card = rig.chain.card;
    physics.world.settle_yaw(card, TILT_GAIN);
}

/// Copy body poses onto the transforms of tracked entities.
fn sync_body_transforms(physics: Res<Physics>, mut bodies: Query<(&PhysicsBody, &mut Transform)>) {
    for (body, mut transform) in &mut bodies {
        transform.translation = to_vec3(physics.world.body_translation(body.0));
        transform.rotation = to_quat(physics.world.body_rotation(body.0));
    }
}

/// nalgebra point to glam vector.
pub(crate) fn to_vec3(p: Point3<f32>) -> Vec3 {
    Vec3::new(p.x, p.y, p.z)
}

/// glam vector to nalgebra point.
pub(crate) fn to_point(v: Vec3) -> Point3<f32> {
    Point3::new(v.x, v.y, v.z)
}

/// nalgebra quaternion to glam.
pub(crate) fn to_quat(q: UnitQuaternion<f32>) -> Quat {
    Quat::from_xyzw(q.i, q.j, q.k, q.w)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn quaternion_conversion_preserves_rotation() {
        let na = UnitQuaternion::from_euler_angles(0.0, FRAC_PI_2, 0.0);
        let glam = to_quat(na);

        let rotated = glam * Vec3::X;
        // A quarter turn about +Y maps +X onto -Z.
        assert!((rotated - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn point_conversions_round_trip() {
        let v = Vec3::new(1.5, -2.0, 0.25);
        assert_eq!(to_vec3(to_point(v)), v);
    }
}
