//! Band curve reconstruction and ribbon mesh regeneration.
//!
//! Every frame the four chain body positions are copied into a Catmull-Rom
//! curve and the ribbon mesh is rebuilt from a fixed number of samples.
//! This runs unconditionally, not only while dragging: the chain keeps
//! moving under gravity and joint constraints.

use bevy::prelude::*;
use bevy::mesh::PrimitiveTopology;
use bevy::asset::RenderAssetUsages;
use bevy_picking::Pickable;

use lanyard_physics::{Chain, PhysicsWorld};

use crate::camera::MainCamera;
use crate::physics::{to_vec3, BandRig, Physics};

/// Number of points sampled from the reconstructed curve each frame.
pub const BAND_SAMPLES: usize = 32;

/// Ribbon appearance settings.
#[derive(Debug, Clone, Resource)]
pub struct BandSettings {
    /// Ribbon width in world units.
    pub width: f32,
}

impl Default for BandSettings {
    fn default() -> Self {
        Self { width: 0.05 }
    }
}

/// Marker component for the ribbon mesh entity.
#[derive(Component)]
pub struct BandRibbon;

/// Plugin owning the ribbon entity and its per-frame rebuild.
pub struct BandPlugin;

impl Plugin for BandPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<BandSettings>()
            .add_systems(Startup, spawn_band)
            .add_systems(Update, rebuild_band);
    }
}

fn spawn_band(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    // Vertex buffers are filled in by the first rebuild.
    let mesh = meshes.add(Mesh::new(
        PrimitiveTopology::TriangleStrip,
        RenderAssetUsages::default(),
    ));
    let material = materials.add(StandardMaterial {
        base_color: Color::srgba(1.0, 1.0, 1.0, 0.25),
        unlit: true,
        alpha_mode: AlphaMode::Blend,
        double_sided: true,
        cull_mode: None,
        ..default()
    });

    commands.spawn((
        BandRibbon,
        Mesh3d(mesh),
        MeshMaterial3d(material),
        Pickable::IGNORE,
    ));
}

/// Rebuild the ribbon from the current chain pose.
fn rebuild_band(
    physics: Res<Physics>,
    rig: Res<BandRig>,
    settings: Res<BandSettings>,
    camera: Query<&GlobalTransform, With<MainCamera>>,
    band: Query<&Mesh3d, With<BandRibbon>>,
    mut meshes: ResMut<Assets<Mesh>>,
) {
    let Ok(camera) = camera.single() else {
        return;
    };
    let Ok(mesh_handle) = band.single() else {
        return;
    };
    let Some(mesh) = meshes.get_mut(&mesh_handle.0) else {
        return;
    };

    let points = control_points(&physics.world, &rig.chain);
    let samples = sample_curve(&points);
    write_ribbon(mesh, &samples, camera.translation(), settings.width);
}

/// Copy the chain body positions into curve control points, chain tip
/// first: `[j3, j2, j1, anchor]`. Reversing this order would flip the
/// rendered band relative to the anchor.
pub fn control_points(world: &PhysicsWorld, chain: &Chain) -> [Vec3; 4] {
    [
        to_vec3(world.body_translation(chain.links[2])),
        to_vec3(world.body_translation(chain.links[1])),
        to_vec3(world.body_translation(chain.links[0])),
        to_vec3(world.body_translation(chain.anchor)),
    ]
}

/// Sample the Catmull-Rom curve through the control points at
/// [`BAND_SAMPLES`] evenly spaced parameter values.
pub fn sample_curve(points: &[Vec3; 4]) -> Vec<Vec3> {
    let curve = CubicCardinalSpline::new_catmull_rom(*points)
        .to_curve()
        .expect("four control points always form a curve");
    let t_max = curve.segments().len() as f32;

    (0..BAND_SAMPLES)
        .map(|i| curve.position(t_max * i as f32 / (BAND_SAMPLES - 1) as f32))
        .collect()
}

/// Regenerate the ribbon vertex buffers in place: two camera-facing
/// vertices per sample, stitched as a triangle strip.
fn write_ribbon(mesh: &mut Mesh, samples: &[Vec3], view_from: Vec3, width: f32) {
    let mut positions = Vec::with_capacity(samples.len() * 2);
    let mut normals = Vec::with_capacity(samples.len() * 2);

    for (i, &point) in samples.iter().enumerate() {
        let tangent = if i + 1 < samples.len() {
            samples[i + 1] - point
        } else {
            point - samples[i - 1]
        };
        let view = (view_from - point).normalize_or_zero();
        let side = tangent.cross(view).normalize_or(Vec3::X) * (width * 0.5);

        positions.push((point - side).to_array());
        positions.push((point + side).to_array());
        normals.push(view.to_array());
        normals.push(view.to_array());
    }

    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
}

#[cfg(test)]
mod tests {
    use super::*;
    use lanyard_physics::{build_chain, ChainParams};
    use nalgebra::Vector3;

    #[test]
    fn control_points_run_from_chain_tip_to_anchor() {
        let params = ChainParams::default();
        let mut world = PhysicsWorld::new(Vector3::new(0.0, -40.0, 0.0), 1.0 / 60.0);
        let chain = build_chain(&mut world, &params);

        let points = control_points(&world, &chain);

        assert_eq!(points.len(), 4);
        assert_eq!(points[0], to_vec3(params.links[2]));
        assert_eq!(points[1], to_vec3(params.links[1]));
        assert_eq!(points[2], to_vec3(params.links[0]));
        assert_eq!(points[3], to_vec3(params.anchor));
    }

    #[test]
    fn curve_yields_exactly_thirty_two_samples() {
        let points = [
            Vec3::new(1.5, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.5, 0.0, 0.0),
            Vec3::new(0.0, 2.0, 0.0),
        ];

        let samples = sample_curve(&points);
        assert_eq!(samples.len(), BAND_SAMPLES);
    }

    #[test]
    fn curve_passes_through_first_and_last_control_points() {
        let points = [
            Vec3::new(1.5, -0.5, 0.2),
            Vec3::new(1.0, 0.1, 0.0),
            Vec3::new(0.5, 0.4, -0.1),
            Vec3::new(0.0, 2.0, 0.0),
        ];

        let samples = sample_curve(&points);
        assert!((samples[0] - points[0]).length() < 1e-4);
        assert!((samples[BAND_SAMPLES - 1] - points[3]).length() < 1e-4);
    }

    #[test]
    fn ribbon_emits_two_vertices_per_sample() {
        let points = [
            Vec3::new(1.5, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.5, 0.0, 0.0),
            Vec3::new(0.0, 2.0, 0.0),
        ];
        let samples = sample_curve(&points);

        let mut mesh = Mesh::new(
            PrimitiveTopology::TriangleStrip,
            RenderAssetUsages::default(),
        );
        write_ribbon(&mut mesh, &samples, Vec3::new(0.0, 0.0, 13.0), 0.05);

        let positions = mesh.attribute(Mesh::ATTRIBUTE_POSITION).unwrap();
        assert_eq!(positions.len(), BAND_SAMPLES * 2);
        let normals = mesh.attribute(Mesh::ATTRIBUTE_NORMAL).unwrap();
        assert_eq!(normals.len(), BAND_SAMPLES * 2);
    }

    #[test]
    fn ribbon_width_is_respected() {
        // A straight band viewed from +Z: paired vertices sit one width apart.
        let samples: Vec<Vec3> = (0..BAND_SAMPLES)
            .map(|i| Vec3::new(i as f32 * 0.1, 0.0, 0.0))
            .collect();

        let mut mesh = Mesh::new(
            PrimitiveTopology::TriangleStrip,
            RenderAssetUsages::default(),
        );
        let width = 0.08;
        write_ribbon(&mut mesh, &samples, Vec3::new(0.0, 0.0, 13.0), width);

        let Some(bevy::mesh::VertexAttributeValues::Float32x3(positions)) =
            mesh.attribute(Mesh::ATTRIBUTE_POSITION)
        else {
            panic!("ribbon positions missing");
        };
        let a = Vec3::from(positions[0]);
        let b = Vec3::from(positions[1]);
        assert!((a.distance(b) - width).abs() < 1e-4);
    }
}
