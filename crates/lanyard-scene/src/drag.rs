//! Pointer-drag control of the card body.
//!
//! While a drag is active the card is switched to a position-driven
//! kinematic body and commanded every simulated frame from the pointer;
//! releasing it hands the body back to the dynamic solver so joints and
//! gravity take over again.

use bevy::prelude::*;
use bevy::window::{PrimaryWindow, SystemCursorIcon};
use bevy::window::CursorIcon;
use bevy_picking::events::{Out, Over, Pointer, Press};
use bevy_picking::pointer::PointerButton;

use crate::camera::MainCamera;
use crate::keyring::SpinState;
use crate::physics::{to_point, to_vec3, BandRig, Physics, PrePhysicsSet};

/// Drag interaction state for the card.
#[derive(Debug, Clone, Copy, Default, Resource)]
pub enum DragState {
    /// No drag in progress.
    #[default]
    Idle,
    /// Pointer grab in progress.
    Dragging {
        /// Hit point minus card position, captured at drag start.
        grab_offset: Vec3,
    },
}

/// Whether the pointer is currently over the card, for cursor feedback.
#[derive(Debug, Default, Resource)]
pub struct CardHover(pub bool);

/// Plugin wiring the drag state machine and the per-step kinematic drive.
pub struct DragPlugin;

impl Plugin for DragPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DragState>()
            .init_resource::<CardHover>()
            .add_systems(Update, (end_drag_on_release, update_cursor_icon))
            .add_systems(FixedUpdate, drive_drag.in_set(PrePhysicsSet));
    }
}

/// Begin a drag from a pointer press on the card.
pub(crate) fn on_card_pressed(
    trigger: On<Pointer<Press>>,
    mut drag: ResMut<DragState>,
    mut spin: ResMut<SpinState>,
    mut physics: ResMut<Physics>,
    rig: Res<BandRig>,
) {
    if trigger.event().button != PointerButton::Primary {
        return;
    }
    let Some(hit) = trigger.event().hit.position else {
        return;
    };

    let card_position = to_vec3(physics.world.body_translation(rig.chain.card));
    *drag = DragState::Dragging {
        grab_offset: hit - card_position,
    };
    // A new drag owns the cosmetic effect: any pending spin window dies here.
    spin.cancel();
    physics.world.set_kinematic(rig.chain.card, true);
}

pub(crate) fn on_card_over(_trigger: On<Pointer<Over>>, mut hover: ResMut<CardHover>) {
    hover.0 = true;
}

pub(crate) fn on_card_out(_trigger: On<Pointer<Out>>, mut hover: ResMut<CardHover>) {
    hover.0 = false;
}

/// End the drag on any primary release, wherever the pointer is.
///
/// Release is sampled globally rather than through a picking observer:
/// a fast drag can leave the card's hit region before the button comes up,
/// and the card must be dropped regardless.
fn end_drag_on_release(
    mouse: Res<ButtonInput<MouseButton>>,
    touches: Res<Touches>,
    mut drag: ResMut<DragState>,
    mut spin: ResMut<SpinState>,
    mut physics: ResMut<Physics>,
    rig: Res<BandRig>,
) {
    if matches!(*drag, DragState::Idle) {
        return;
    }
    if !mouse.just_released(MouseButton::Left)
        && !touches.any_just_released()
        && !touches.any_just_canceled()
    {
        return;
    }

    *drag = DragState::Idle;
    physics.world.set_kinematic(rig.chain.card, false);
    spin.begin();
}

/// Command the card from the pointer, once per simulated frame.
fn drive_drag(
    drag: Res<DragState>,
    windows: Query<&Window, With<PrimaryWindow>>,
    camera: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    mut physics: ResMut<Physics>,
    rig: Res<BandRig>,
) {
    let DragState::Dragging { grab_offset } = *drag else {
        return;
    };
    let Ok(window) = windows.single() else {
        return;
    };
    let Ok((camera, camera_transform)) = camera.single() else {
        return;
    };
    let Some(cursor) = window.cursor_position() else {
        return;
    };

    let size = Vec2::new(window.width(), window.height());
    let ndc = Vec2::new(
        cursor.x / size.x * 2.0 - 1.0,
        1.0 - cursor.y / size.y * 2.0,
    );
    let Some(pointer_world) = camera.ndc_to_world(camera_transform, ndc.extend(0.5)) else {
        return;
    };

    let target = drag_target(pointer_world, camera_transform.translation(), grab_offset);
    physics
        .world
        .set_next_kinematic_translation(rig.chain.card, to_point(target));
}

/// Project the unprojected pointer point out along the camera ray by the
/// camera's distance from the origin, then subtract the grab offset.
///
/// This is an approximation of intersecting the pointer ray with a plane
/// at the camera's distance, not a true plane intersection; it keeps the
/// card roughly in the scene's depth plane while tracking the pointer
/// exactly in screen space.
pub fn drag_target(pointer_world: Vec3, camera_position: Vec3, grab_offset: Vec3) -> Vec3 {
    let dir = (pointer_world - camera_position).normalize_or_zero();
    pointer_world + dir * camera_position.length() - grab_offset
}

/// Swap the window cursor between default, grab, and grabbing.
fn update_cursor_icon(
    drag: Res<DragState>,
    hover: Res<CardHover>,
    windows: Query<Entity, With<PrimaryWindow>>,
    mut commands: Commands,
) {
    if !drag.is_changed() && !hover.is_changed() {
        return;
    }
    let Ok(window) = windows.single() else {
        return;
    };

    let icon = match (*drag, hover.0) {
        (DragState::Dragging { .. }, _) => SystemCursorIcon::Grabbing,
        (DragState::Idle, true) => SystemCursorIcon::Grab,
        (DragState::Idle, false) => SystemCursorIcon::Default,
    };
    commands.entity(window).insert(CursorIcon::from(icon));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_pointer_lands_on_the_camera_axis() {
        // Camera on +Z looking at the origin; a centered pointer unprojects
        // somewhere on the axis. The target extends camera-distance further
        // down the same ray, past the origin.
        let camera = Vec3::new(0.0, 0.0, 13.0);
        let pointer_world = Vec3::new(0.0, 0.0, 12.0);

        let target = drag_target(pointer_world, camera, Vec3::ZERO);

        assert!((target - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn grab_offset_is_subtracted_from_the_target() {
        let camera = Vec3::new(0.0, 0.0, 13.0);
        let pointer_world = Vec3::new(0.0, 0.0, 12.0);
        let offset = Vec3::new(0.25, -0.5, 0.0);

        let with_offset = drag_target(pointer_world, camera, offset);
        let without = drag_target(pointer_world, camera, Vec3::ZERO);

        assert!((without - with_offset - offset).length() < 1e-6);
    }

    #[test]
    fn off_axis_pointer_extends_along_its_own_ray() {
        let camera = Vec3::new(0.0, 0.0, 13.0);
        let pointer_world = Vec3::new(1.0, 1.0, 12.0);

        let target = drag_target(pointer_world, camera, Vec3::ZERO);

        // The target stays on the camera->pointer ray.
        let dir = (pointer_world - camera).normalize();
        let along = (target - camera).normalize();
        assert!((dir - along).length() < 1e-5);
        // And sits camera-distance beyond the unprojected point.
        assert!(((target - pointer_world).length() - camera.length()).abs() < 1e-4);
    }
}
