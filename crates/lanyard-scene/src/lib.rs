//! Lanyard Scene - Bevy plugins for the interactive keyring scene
//!
//! This crate provides everything visual and interactive: physics stepping
//! and transform sync, the fixed camera, the draggable card, the band
//! ribbon that follows the chain, the keyring model, and the collider
//! debug overlay. Simulation state itself lives in `lanyard-physics`;
//! systems here only hold body handles.

pub mod band;
pub mod camera;
pub mod debug;
pub mod drag;
pub mod keyring;
pub mod physics;
pub mod scene;

use bevy::prelude::*;

/// Plugin bundle for the complete lanyard scene.
pub struct LanyardScenePlugin;

impl Plugin for LanyardScenePlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(physics::PhysicsPlugin)
            .add_plugins(camera::CameraPlugin)
            .add_plugins(scene::ScenePlugin)
            .add_plugins(band::BandPlugin)
            .add_plugins(drag::DragPlugin)
            .add_plugins(keyring::KeyringPlugin)
            .add_plugins(debug::DebugOverlayPlugin);
    }
}

// Re-export commonly used types
pub use band::BandSettings;
pub use camera::{CameraSettings, MainCamera};
pub use debug::DebugSettings;
pub use drag::DragState;
pub use keyring::KeyringSettings;
pub use physics::{BandRig, Physics};
