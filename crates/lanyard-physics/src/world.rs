//! Physics world management using Rapier3d.

use nalgebra::{Point3, UnitQuaternion, Vector3};
use rapier3d::dynamics::{
    CCDSolver, ImpulseJointSet, IntegrationParameters, IslandManager, MultibodyJointSet,
    RigidBodyBuilder, RigidBodyHandle, RigidBodySet, RigidBodyType,
};
use rapier3d::geometry::{BroadPhaseMultiSap, ColliderBuilder, ColliderSet, NarrowPhase};
use rapier3d::pipeline::{PhysicsPipeline, QueryPipeline};

use parry3d::shape::SharedShape;

/// Collider outline data for the debug overlay.
///
/// Shapes the world cannot outline exactly (convex hulls) are reported
/// through their local bounding box.
#[derive(Debug, Clone, Copy)]
pub enum ColliderShape {
    /// A ball of the given radius.
    Ball {
        /// Ball radius.
        radius: f32,
    },
    /// A box with the given half extents.
    Cuboid {
        /// Half extents along each local axis.
        half_extents: Vector3<f32>,
    },
    /// Any other shape, outlined by its local AABB half extents.
    Hull {
        /// Half extents of the local bounding box.
        half_extents: Vector3<f32>,
    },
}

/// Rigid-body simulation world for the lanyard scene.
///
/// Owns the complete Rapier pipeline. The body set is fixed for the
/// lifetime of the scene, so every accessor treats a stale handle as a
/// programming error and panics.
pub struct PhysicsWorld {
    pipeline: PhysicsPipeline,
    gravity: Vector3<f32>,
    integration_params: IntegrationParameters,
    islands: IslandManager,
    broad_phase: BroadPhaseMultiSap,
    narrow_phase: NarrowPhase,
    pub(crate) bodies: RigidBodySet,
    pub(crate) colliders: ColliderSet,
    pub(crate) impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
}

impl PhysicsWorld {
    /// Create an empty world with the given gravity and fixed timestep.
    pub fn new(gravity: Vector3<f32>, timestep: f32) -> Self {
        let mut integration_params = IntegrationParameters::default();
        integration_params.dt = timestep;

        Self {
            pipeline: PhysicsPipeline::new(),
            gravity,
            integration_params,
            islands: IslandManager::new(),
            broad_phase: BroadPhaseMultiSap::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
        }
    }

    /// Advance the simulation by one fixed timestep.
    pub fn step(&mut self) {
        self.pipeline.step(
            &self.gravity,
            &self.integration_params,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }

    /// World position of a body.
    pub fn body_translation(&self, handle: RigidBodyHandle) -> Point3<f32> {
        let body = self.bodies.get(handle).expect("stale rigid body handle");
        body.position().translation.vector.into()
    }

    /// World orientation of a body.
    pub fn body_rotation(&self, handle: RigidBodyHandle) -> UnitQuaternion<f32> {
        let body = self.bodies.get(handle).expect("stale rigid body handle");
        *body.rotation()
    }

    /// Switch a body between position-driven kinematic and fully dynamic.
    ///
    /// The card is kinematic only while dragged; joints and gravity take
    /// over again as soon as it reverts to dynamic.
    pub fn set_kinematic(&mut self, handle: RigidBodyHandle, kinematic: bool) {
        let body = self.bodies.get_mut(handle).expect("stale rigid body handle");
        let kind = if kinematic {
            RigidBodyType::KinematicPositionBased
        } else {
            RigidBodyType::Dynamic
        };
        body.set_body_type(kind, true);
    }

    /// Set the position a kinematic body will assume at the next step.
    pub fn set_next_kinematic_translation(&mut self, handle: RigidBodyHandle, target: Point3<f32>) {
        let body = self.bodies.get_mut(handle).expect("stale rigid body handle");
        body.set_next_kinematic_translation(target.coords);
    }

    /// Pull a body's yaw back toward zero with a proportional term.
    ///
    /// Reads the angular velocity `(ax, ay, az)` and the rotation's Euler
    /// angle about +Y, then writes `(ax, ay - yaw * gain, az)`. The x and z
    /// components pass through untouched.
    pub fn settle_yaw(&mut self, handle: RigidBodyHandle, gain: f32) {
        let body = self.bodies.get_mut(handle).expect("stale rigid body handle");
        let ang = *body.angvel();
        // nalgebra orders euler_angles as rotations about (x, y, z); the
        // scene is y-up, so the middle angle is the yaw.
        let (_, yaw, _) = body.rotation().euler_angles();
        body.set_angvel(Vector3::new(ang.x, ang.y - yaw * gain, ang.z), true);
    }

    /// Angular velocity of a body.
    pub fn body_angvel(&self, handle: RigidBodyHandle) -> Vector3<f32> {
        let body = self.bodies.get(handle).expect("stale rigid body handle");
        *body.angvel()
    }

    /// Insert a free dynamic body with the given collision shape.
    ///
    /// Used for loose props (the free keyring) that take part in the
    /// simulation but not in the chain.
    pub fn insert_free_body(
        &mut self,
        position: Point3<f32>,
        damping: f32,
        shape: SharedShape,
    ) -> RigidBodyHandle {
        let body = RigidBodyBuilder::dynamic()
            .translation(position.coords)
            .linear_damping(damping)
            .angular_damping(damping)
            .build();
        let handle = self.bodies.insert(body);
        self.colliders
            .insert_with_parent(ColliderBuilder::new(shape).build(), handle, &mut self.bodies);
        handle
    }

    /// Positions, orientations, and outline shapes of every collider.
    pub fn collider_outlines(&self) -> Vec<(Point3<f32>, UnitQuaternion<f32>, ColliderShape)> {
        self.colliders
            .iter()
            .map(|(_, collider)| {
                let position = collider.position();
                let shape = collider.shape();
                if let Some(ball) = shape.as_ball() {
                    (
                        position.translation.vector.into(),
                        position.rotation,
                        ColliderShape::Ball { radius: ball.radius },
                    )
                } else if let Some(cuboid) = shape.as_cuboid() {
                    (
                        position.translation.vector.into(),
                        position.rotation,
                        ColliderShape::Cuboid { half_extents: cuboid.half_extents },
                    )
                } else {
                    let aabb = shape.compute_local_aabb();
                    (
                        position * aabb.center(),
                        position.rotation,
                        ColliderShape::Hull { half_extents: aabb.half_extents() },
                    )
                }
            })
            .collect()
    }

    /// Number of rigid bodies in the world.
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Number of impulse joints in the world.
    pub fn joint_count(&self) -> usize {
        self.impulse_joints.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_body_world() -> (PhysicsWorld, RigidBodyHandle) {
        let mut world = PhysicsWorld::new(Vector3::new(0.0, -40.0, 0.0), 1.0 / 60.0);
        let body = RigidBodyBuilder::dynamic().build();
        let handle = world.bodies.insert(body);
        world.colliders.insert_with_parent(
            ColliderBuilder::ball(0.1).build(),
            handle,
            &mut world.bodies,
        );
        (world, handle)
    }

    #[test]
    fn free_body_falls_under_gravity() {
        let (mut world, handle) = single_body_world();
        for _ in 0..60 {
            world.step();
        }
        assert!(world.body_translation(handle).y < -10.0);
    }

    #[test]
    fn kinematic_body_follows_commanded_position() {
        let (mut world, handle) = single_body_world();
        world.set_kinematic(handle, true);
        let target = Point3::new(1.0, 2.0, 3.0);
        world.set_next_kinematic_translation(handle, target);
        world.step();

        let pos = world.body_translation(handle);
        assert!((pos - target).norm() < 1e-5);

        // A kinematic body ignores gravity entirely.
        world.step();
        assert!((world.body_translation(handle) - target).norm() < 1e-5);
    }

    #[test]
    fn settle_yaw_damps_only_the_y_component() {
        let (mut world, handle) = single_body_world();
        {
            let body = world.bodies.get_mut(handle).unwrap();
            body.set_rotation(UnitQuaternion::from_euler_angles(0.0, 0.8, 0.0), true);
            body.set_angvel(Vector3::new(0.1, 0.5, -0.2), true);
        }

        world.settle_yaw(handle, 0.25);

        let ang = world.body_angvel(handle);
        assert!((ang.x - 0.1).abs() < 1e-6);
        assert!((ang.y - (0.5 - 0.8 * 0.25)).abs() < 1e-5);
        assert!((ang.z - (-0.2)).abs() < 1e-6);
    }

    #[test]
    fn settle_yaw_is_identity_at_zero_rotation() {
        let (mut world, handle) = single_body_world();
        world
            .bodies
            .get_mut(handle)
            .unwrap()
            .set_angvel(Vector3::new(0.3, 0.7, 0.9), true);

        world.settle_yaw(handle, 0.25);

        let ang = world.body_angvel(handle);
        assert!((ang - Vector3::new(0.3, 0.7, 0.9)).norm() < 1e-6);
    }
}
