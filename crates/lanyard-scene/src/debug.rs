//! Physics collider visualization overlay.

use bevy::color::palettes::css::LIME;
use bevy::prelude::*;

use lanyard_physics::ColliderShape;

use crate::physics::{to_quat, to_vec3, Physics};

/// Developer toggles for the physics overlay.
#[derive(Debug, Clone, Default, Resource)]
pub struct DebugSettings {
    /// Draw every collider as a gizmo outline.
    pub show_colliders: bool,
}

/// Plugin drawing the collider overlay when enabled.
pub struct DebugOverlayPlugin;

impl Plugin for DebugOverlayPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DebugSettings>()
            .add_systems(Update, draw_colliders);
    }
}

fn draw_colliders(settings: Res<DebugSettings>, physics: Res<Physics>, mut gizmos: Gizmos) {
    if !settings.show_colliders {
        return;
    }

    for (position, rotation, shape) in physics.world.collider_outlines() {
        let translation = to_vec3(position);
        let rotation = to_quat(rotation);
        match shape {
            ColliderShape::Ball { radius } => {
                gizmos.sphere(Isometry3d::new(translation, rotation), radius, LIME);
            }
            ColliderShape::Cuboid { half_extents } | ColliderShape::Hull { half_extents } => {
                let size = Vec3::new(half_extents.x, half_extents.y, half_extents.z) * 2.0;
                gizmos.cuboid(
                    Transform::from_translation(translation)
                        .with_rotation(rotation)
                        .with_scale(size),
                    LIME,
                );
            }
        }
    }
}
