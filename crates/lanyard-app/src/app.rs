//! Bevy application setup

use bevy::prelude::*;
use bevy_egui::EguiPlugin;
use bevy_picking::{prelude::MeshPickingPlugin, DefaultPickingPlugins};
use nalgebra::Vector3;

use lanyard_physics::{build_chain, ChainParams, PhysicsWorld};
use lanyard_scene::{
    BandRig, BandSettings, CameraSettings, DebugSettings, KeyringSettings, LanyardScenePlugin,
    Physics,
};

use crate::config::Config;
use crate::ui::UiPlugin;

/// Build the physics world and run the Bevy application.
pub fn run(config: Config) {
    let gravity = Vector3::from(config.physics.gravity);
    let mut world = PhysicsWorld::new(gravity, config.physics.timestep);
    let chain = build_chain(&mut world, &ChainParams::default());

    App::new()
        .insert_resource(ClearColor(Color::srgb(0.1, 0.1, 0.15)))
        .insert_resource(Time::<Fixed>::from_seconds(config.physics.timestep as f64))
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Lanyard".to_string(),
                ..default()
            }),
            ..default()
        }))
        // DefaultPickingPlugins provides core picking; MeshPickingPlugin adds
        // 3D mesh raycasting. Both must be added BEFORE EguiPlugin so it can
        // detect PickingPlugin.
        .add_plugins(DefaultPickingPlugins)
        .add_plugins(MeshPickingPlugin)
        .add_plugins(EguiPlugin::default())
        .insert_resource(Physics { world })
        .insert_resource(BandRig { chain })
        .insert_resource(CameraSettings {
            position: Vec3::from(config.camera.position),
            fov_degrees: config.camera.fov_degrees,
        })
        .insert_resource(BandSettings {
            width: config.scene.band_width,
        })
        .insert_resource(KeyringSettings {
            model: config.scene.model.clone(),
        })
        .insert_resource(DebugSettings {
            show_colliders: config.scene.debug,
        })
        .add_plugins(LanyardScenePlugin)
        .add_plugins(UiPlugin)
        .run();
}
