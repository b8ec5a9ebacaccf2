//! Assembly of the band chain: fixed anchor, three links, and the card.

use nalgebra::{Point3, Vector3};
use rapier3d::dynamics::{
    RigidBodyBuilder, RigidBodyHandle, RopeJointBuilder, SphericalJointBuilder,
};
use rapier3d::geometry::ColliderBuilder;

use crate::world::PhysicsWorld;

/// Tunable parameters for the chain assembly.
///
/// The defaults hang the anchor at `(0, 2, 0)` with the links laid out
/// level beside it and the card at the free end.
#[derive(Debug, Clone)]
pub struct ChainParams {
    /// World position of the fixed anchor body.
    pub anchor: Point3<f32>,
    /// Initial world positions of the three intermediate links, ordered
    /// from the anchor outward.
    pub links: [Point3<f32>; 3],
    /// Initial world position of the card body.
    pub card: Point3<f32>,
    /// Maximum length of each rope segment.
    pub rope_length: f32,
    /// Ball collider radii for the three links.
    pub link_radii: [f32; 3],
    /// Half extents of the card's cuboid collider.
    pub card_half_extents: Vector3<f32>,
    /// Anchor of the spherical joint in the card's local frame.
    pub card_anchor: Point3<f32>,
    /// Linear and angular damping applied to every dynamic body.
    pub damping: f32,
}

impl Default for ChainParams {
    fn default() -> Self {
        Self {
            anchor: Point3::new(0.0, 2.0, 0.0),
            links: [
                Point3::new(0.5, 2.0, 0.0),
                Point3::new(1.0, 2.0, 0.0),
                Point3::new(1.5, 2.0, 0.0),
            ],
            card: Point3::new(2.0, 2.0, 0.0),
            rope_length: 1.0,
            link_radii: [0.1, 0.1, 0.05],
            card_half_extents: Vector3::new(0.8, 1.125, 0.01),
            card_anchor: Point3::new(0.0, 0.0, 0.55),
            damping: 2.0,
        }
    }
}

/// Handles for the assembled chain, ordered from the fixed anchor outward.
#[derive(Debug, Clone, Copy)]
pub struct Chain {
    /// The fixed anchor body.
    pub anchor: RigidBodyHandle,
    /// The three intermediate links, `links[0]` nearest the anchor.
    pub links: [RigidBodyHandle; 3],
    /// The card body at the free end.
    pub card: RigidBodyHandle,
}

/// Build the chain in `world` and return the body handles.
///
/// Creates one fixed body, three ball-collider links, and the card, tied
/// together by three rope joints and one spherical joint:
/// `anchor -rope- j1 -rope- j2 -rope- j3 -spherical- card`. Joints are
/// created exactly once and never reconfigured.
pub fn build_chain(world: &mut PhysicsWorld, params: &ChainParams) -> Chain {
    let anchor = world.bodies.insert(
        RigidBodyBuilder::fixed()
            .translation(params.anchor.coords)
            .build(),
    );

    let mut links = [RigidBodyHandle::invalid(); 3];
    for (i, position) in params.links.iter().enumerate() {
        let body = RigidBodyBuilder::dynamic()
            .translation(position.coords)
            .linear_damping(params.damping)
            .angular_damping(params.damping)
            .build();
        let handle = world.bodies.insert(body);
        world.colliders.insert_with_parent(
            ColliderBuilder::ball(params.link_radii[i]).build(),
            handle,
            &mut world.bodies,
        );
        links[i] = handle;
    }

    let card = world.bodies.insert(
        RigidBodyBuilder::dynamic()
            .translation(params.card.coords)
            .linear_damping(params.damping)
            .angular_damping(params.damping)
            .build(),
    );
    let extents = params.card_half_extents;
    world.colliders.insert_with_parent(
        ColliderBuilder::cuboid(extents.x, extents.y, extents.z).build(),
        card,
        &mut world.bodies,
    );

    let mut prev = anchor;
    for &link in &links {
        let rope = RopeJointBuilder::new(params.rope_length)
            .local_anchor1(Point3::origin())
            .local_anchor2(Point3::origin());
        world.impulse_joints.insert(prev, link, rope, true);
        prev = link;
    }

    let spherical = SphericalJointBuilder::new()
        .local_anchor1(Point3::origin())
        .local_anchor2(params.card_anchor);
    world.impulse_joints.insert(prev, card, spherical, true);

    Chain { anchor, links, card }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain_world(params: &ChainParams) -> (PhysicsWorld, Chain) {
        let mut world = PhysicsWorld::new(Vector3::new(0.0, -40.0, 0.0), 1.0 / 60.0);
        let chain = build_chain(&mut world, params);
        (world, chain)
    }

    #[test]
    fn assembles_five_bodies_and_four_joints() {
        let (world, chain) = chain_world(&ChainParams::default());

        assert_eq!(world.body_count(), 5);
        assert_eq!(world.joint_count(), 4);
        assert_ne!(chain.anchor, chain.card);
    }

    #[test]
    fn bodies_start_at_configured_positions() {
        let params = ChainParams::default();
        let (world, chain) = chain_world(&params);

        assert_eq!(world.body_translation(chain.anchor), params.anchor);
        for (i, &link) in chain.links.iter().enumerate() {
            assert_eq!(world.body_translation(link), params.links[i]);
        }
        assert_eq!(world.body_translation(chain.card), params.card);
    }

    #[test]
    fn chain_sags_without_exceeding_rope_lengths() {
        // Links start below the anchor so gravity has to sort the chain out.
        let params = ChainParams {
            anchor: Point3::new(0.0, 2.0, 0.0),
            links: [
                Point3::new(0.5, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(1.5, 0.0, 0.0),
            ],
            card: Point3::new(2.0, 0.0, 0.0),
            ..ChainParams::default()
        };
        let (mut world, chain) = chain_world(&params);

        // 15 simulated seconds is plenty for the damped chain to settle.
        for _ in 0..900 {
            world.step();
        }

        let anchor = world.body_translation(chain.anchor);
        let positions: Vec<_> = chain
            .links
            .iter()
            .map(|&link| world.body_translation(link))
            .collect();

        // Rope joints bound, but do not fix, the span between neighbours.
        let max_span = params.rope_length * 1.05;
        assert!((positions[0] - anchor).norm() <= max_span);
        assert!((positions[1] - positions[0]).norm() <= max_span);
        assert!((positions[2] - positions[1]).norm() <= max_span);

        // The whole chain hangs below its anchor.
        for position in &positions {
            assert!(position.y < anchor.y);
        }
        assert!(world.body_translation(chain.card).y < anchor.y);
    }

    #[test]
    fn card_stays_within_chain_reach() {
        let (mut world, chain) = chain_world(&ChainParams::default());

        for _ in 0..900 {
            world.step();
        }

        // Three rope segments plus the card's joint offset bound how far
        // the card can drift from the anchor.
        let anchor = world.body_translation(chain.anchor);
        let card = world.body_translation(chain.card);
        let reach = 3.0 * 1.05 + 0.55 + 0.1;
        assert!((card - anchor).norm() <= reach);
    }
}
