//! Scene entity setup: the draggable card and its picking observers.

use bevy::prelude::*;

use crate::drag;
use crate::physics::{to_vec3, BandRig, Physics, PhysicsBody};

/// Marker component for the draggable card entity.
#[derive(Component)]
pub struct Card;

/// Plugin spawning the card.
pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_card);
    }
}

/// Spawn the card's visible plane at the card body's position.
///
/// The plane doubles as the pointer hit region; the drag observers live on
/// this entity. Its transform follows the physics body every step.
fn spawn_card(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    physics: Res<Physics>,
    rig: Res<BandRig>,
) {
    let position = to_vec3(physics.world.body_translation(rig.chain.card));

    let mesh = meshes.add(Plane3d::new(Vec3::Z, Vec2::new(0.8, 1.125)));
    let material = materials.add(StandardMaterial {
        base_color: Color::WHITE,
        unlit: true,
        double_sided: true,
        cull_mode: None,
        ..default()
    });

    commands
        .spawn((
            Card,
            PhysicsBody(rig.chain.card),
            Mesh3d(mesh),
            MeshMaterial3d(material),
            Transform::from_translation(position),
        ))
        .observe(drag::on_card_pressed)
        .observe(drag::on_card_over)
        .observe(drag::on_card_out);
}
