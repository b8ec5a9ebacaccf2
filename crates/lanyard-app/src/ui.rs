//! Debug panel using bevy_egui

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts, EguiPrimaryContextPass};

use lanyard_scene::DebugSettings;

/// Plugin for the developer control panel.
pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        // Runs in EguiPrimaryContextPass for proper input handling
        app.add_systems(EguiPrimaryContextPass, debug_panel);
    }
}

fn debug_panel(mut contexts: EguiContexts, mut settings: ResMut<DebugSettings>) {
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    egui::Window::new("Debug")
        .resizable(false)
        .show(ctx, |ui| {
            ui.checkbox(&mut settings.show_colliders, "Show colliders");
        });
}
