//! Camera setup for the fixed lanyard viewpoint.

use bevy::prelude::*;

/// Camera placement for the fixed lanyard framing.
#[derive(Debug, Clone, Resource)]
pub struct CameraSettings {
    /// World position of the camera.
    pub position: Vec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 13.0),
            fov_degrees: 25.0,
        }
    }
}

/// Marker component for the main camera
#[derive(Component)]
pub struct MainCamera;

/// Plugin spawning the scene camera.
pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CameraSettings>()
            .add_systems(Startup, spawn_camera);
    }
}

fn spawn_camera(mut commands: Commands, settings: Res<CameraSettings>) {
    commands.spawn((
        MainCamera,
        Camera3d::default(),
        Projection::from(PerspectiveProjection {
            fov: settings.fov_degrees.to_radians(),
            ..default()
        }),
        Transform::from_translation(settings.position).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}
