//! Keyring model loading and the cosmetic ring spin.
//!
//! The keyring model is an external asset: a GLTF file with a mesh named
//! "Circle". It is required; a missing file or mesh name is a fatal
//! startup error, not a degraded scene.

use std::time::Duration;

use bevy::asset::LoadState;
use bevy::gltf::{Gltf, GltfMesh};
use bevy::prelude::*;
use bevy::mesh::VertexAttributeValues;
use bevy_picking::Pickable;
use rand::Rng;
use tracing::{error, info};

use lanyard_physics::collider_from_points;

use crate::physics::{to_vec3, Physics, PhysicsBody};
use crate::scene::Card;

/// Name of the ring mesh inside the keyring model.
const RING_MESH: &str = "Circle";
/// Duration of the cosmetic spin window after a drag ends.
const SPIN_WINDOW: Duration = Duration::from_millis(500);
/// Upper bound of the randomized spin rate, radians per second.
const SPIN_RATE_MAX: f32 = 10.0;
/// Uniform scale of the ring attached to the card.
const CARD_RING_SCALE: f32 = 0.6;
/// Uniform scale of the free-floating ring.
const FREE_RING_SCALE: f32 = 0.4;
/// Spawn position of the free-floating ring body.
const FREE_RING_POSITION: Vec3 = Vec3::new(0.5, 2.0, 0.0);

/// One-shot cosmetic spin effect, armed when a drag ends.
///
/// At most one window is ever pending: starting a new drag cancels it, so
/// two effects can never overlap.
#[derive(Debug, Default, Resource)]
pub struct SpinState {
    timer: Option<Timer>,
}

impl SpinState {
    /// Arm the spin window, restarting it if one is already pending.
    pub fn begin(&mut self) {
        self.timer = Some(Timer::new(SPIN_WINDOW, TimerMode::Once));
    }

    /// Cancel any pending window.
    pub fn cancel(&mut self) {
        self.timer = None;
    }

    /// Whether the effect is currently active.
    pub fn active(&self) -> bool {
        self.timer.is_some()
    }

    /// Advance the window, returning whether the effect is still active.
    pub fn tick(&mut self, delta: Duration) -> bool {
        let Some(timer) = self.timer.as_mut() else {
            return false;
        };
        if timer.tick(delta).finished() {
            self.timer = None;
            return false;
        }
        true
    }
}

/// Asset path of the keyring model.
#[derive(Debug, Clone, Resource)]
pub struct KeyringSettings {
    /// Path relative to the assets directory.
    pub model: String,
}

impl Default for KeyringSettings {
    fn default() -> Self {
        Self {
            model: "keyring.glb".to_string(),
        }
    }
}

/// Handle to the keyring model while it loads.
#[derive(Resource)]
struct KeyringModel {
    gltf: Handle<Gltf>,
    spawned: bool,
}

/// Marker for the ring attached to the card.
#[derive(Component)]
pub struct CardRing;

/// Marker for the free-floating ring.
#[derive(Component)]
pub struct FreeRing;

/// Plugin loading the keyring model and driving the spin effect.
pub struct KeyringPlugin;

impl Plugin for KeyringPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SpinState>()
            .init_resource::<KeyringSettings>()
            .add_systems(Startup, load_keyring)
            .add_systems(Update, (spawn_rings_when_loaded, spin_ring));
    }
}

fn load_keyring(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    settings: Res<KeyringSettings>,
) {
    info!(model = %settings.model, "Loading keyring model");
    let gltf = asset_server.load(settings.model.clone());
    commands.insert_resource(KeyringModel { gltf, spawned: false });
}

/// Once the model is in, attach the ring to the card and drop a second
/// free ring into the world.
#[allow(clippy::too_many_arguments)]
fn spawn_rings_when_loaded(
    mut model: ResMut<KeyringModel>,
    asset_server: Res<AssetServer>,
    settings: Res<KeyringSettings>,
    gltfs: Res<Assets<Gltf>>,
    gltf_meshes: Res<Assets<GltfMesh>>,
    meshes: Res<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    card: Query<Entity, With<Card>>,
    mut physics: ResMut<Physics>,
    mut commands: Commands,
) {
    if model.spawned {
        return;
    }
    if let LoadState::Failed(err) = asset_server.load_state(&model.gltf) {
        error!(model = %settings.model, %err, "Keyring model failed to load");
        std::process::exit(1);
    }
    let Some(gltf) = gltfs.get(&model.gltf) else {
        return;
    };

    let Some(ring_handle) = gltf.named_meshes.get(RING_MESH) else {
        error!(model = %settings.model, mesh = RING_MESH, "Keyring model has no such mesh");
        std::process::exit(1);
    };
    let Some(gltf_mesh) = gltf_meshes.get(ring_handle) else {
        return;
    };
    let Some(primitive) = gltf_mesh.primitives.first() else {
        error!(mesh = RING_MESH, "Ring mesh has no primitives");
        std::process::exit(1);
    };
    let mesh_handle = primitive.mesh.clone();
    let Some(mesh) = meshes.get(&mesh_handle) else {
        return;
    };
    let Ok(card_entity) = card.single() else {
        return;
    };

    let material = materials.add(StandardMaterial {
        base_color: Color::srgba(1.0, 1.0, 1.0, 0.25),
        unlit: true,
        alpha_mode: AlphaMode::Blend,
        double_sided: true,
        cull_mode: None,
        ..default()
    });

    // Ring riding on the card, purely visual; the card keeps its cuboid
    // collider.
    commands.entity(card_entity).with_children(|parent| {
        parent.spawn((
            CardRing,
            Mesh3d(mesh_handle.clone()),
            MeshMaterial3d(material.clone()),
            Pickable::IGNORE,
            Transform::from_translation(Vec3::new(0.0, -0.07, 0.0))
                .with_rotation(Quat::from_rotation_y(std::f32::consts::FRAC_PI_2))
                .with_scale(Vec3::splat(CARD_RING_SCALE)),
        ));
    });

    // The free ring does collide, with a hull built from the same mesh.
    let points = ring_collider_points(mesh);
    match collider_from_points(&points, RING_MESH) {
        Ok(shape) => {
            let handle =
                physics
                    .world
                    .insert_free_body(crate::physics::to_point(FREE_RING_POSITION), 2.0, shape);
            commands
                .spawn((
                    FreeRing,
                    PhysicsBody(handle),
                    Transform::from_translation(to_vec3(
                        physics.world.body_translation(handle),
                    )),
                    Visibility::default(),
                ))
                .with_children(|parent| {
                    parent.spawn((
                        Mesh3d(mesh_handle),
                        MeshMaterial3d(material),
                        Pickable::IGNORE,
                        Transform::from_rotation(Quat::from_rotation_x(
                            std::f32::consts::FRAC_PI_2,
                        ))
                        .with_scale(Vec3::splat(FREE_RING_SCALE)),
                    ));
                });
        }
        Err(err) => {
            error!(%err, "Keyring collider construction failed");
            std::process::exit(1);
        }
    }

    info!("Keyring model ready");
    model.spawned = true;
}

/// Mesh vertices transformed the way the visual child is: rotated a
/// quarter turn about +X, then scaled, so collider and render line up.
fn ring_collider_points(mesh: &Mesh) -> Vec<[f32; 3]> {
    let Some(VertexAttributeValues::Float32x3(positions)) =
        mesh.attribute(Mesh::ATTRIBUTE_POSITION)
    else {
        return Vec::new();
    };
    positions
        .iter()
        .map(|&[x, y, z]| {
            [
                x * FREE_RING_SCALE,
                -z * FREE_RING_SCALE,
                y * FREE_RING_SCALE,
            ]
        })
        .collect()
}

/// Spin the card's ring at a randomized rate while the window is open.
fn spin_ring(
    time: Res<Time>,
    mut spin: ResMut<SpinState>,
    mut rings: Query<&mut Transform, With<CardRing>>,
) {
    if !spin.tick(time.delta()) {
        return;
    }
    let mut rng = rand::rng();
    for mut transform in &mut rings {
        transform.rotate_y(time.delta_secs() * rng.random_range(0.0..SPIN_RATE_MAX));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spin_window_lasts_exactly_its_duration() {
        let mut spin = SpinState::default();
        spin.begin();
        assert!(spin.active());

        assert!(spin.tick(Duration::from_millis(499)));
        assert!(!spin.tick(Duration::from_millis(1)));
        assert!(!spin.active());
    }

    #[test]
    fn spin_window_is_independent_of_drag_duration() {
        // However long the drag ran, the window opens at release and runs
        // its full course.
        let mut spin = SpinState::default();
        spin.begin();
        assert!(spin.tick(Duration::from_millis(250)));
        assert!(spin.tick(Duration::from_millis(249)));
        assert!(!spin.tick(Duration::from_millis(10)));
    }

    #[test]
    fn new_drag_cancels_a_pending_window() {
        let mut spin = SpinState::default();
        spin.begin();
        spin.cancel();

        assert!(!spin.active());
        assert!(!spin.tick(Duration::from_millis(100)));
    }

    #[test]
    fn rearming_restarts_the_window() {
        let mut spin = SpinState::default();
        spin.begin();
        assert!(spin.tick(Duration::from_millis(400)));

        spin.begin();
        assert!(spin.tick(Duration::from_millis(400)));
        assert!(!spin.tick(Duration::from_millis(150)));
    }
}
