//! Collision shape construction from mesh data.

use nalgebra::Point3;
use parry3d::shape::SharedShape;

use crate::error::PhysicsError;

/// Build a convex-hull collision shape from raw mesh vertex positions.
///
/// Used for props whose geometry comes from a model file (the keyring).
/// The hull approximates the mesh; exact trimesh collision is not needed
/// for a purely decorative body.
pub fn collider_from_points(points: &[[f32; 3]], name: &str) -> Result<SharedShape, PhysicsError> {
    if points.len() < 4 {
        return Err(PhysicsError::CollisionShape {
            name: name.to_string(),
            reason: format!("need at least 4 points for a convex hull, got {}", points.len()),
        });
    }

    let points: Vec<Point3<f32>> = points
        .iter()
        .map(|p| Point3::new(p[0], p[1], p[2]))
        .collect();

    SharedShape::convex_hull(&points).ok_or_else(|| PhysicsError::CollisionShape {
        name: name.to_string(),
        reason: "degenerate point cloud".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_hull_from_cube_corners() {
        let points = [
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
            [1.0, 1.0, 0.0],
            [1.0, 0.0, 1.0],
            [0.0, 1.0, 1.0],
            [1.0, 1.0, 1.0],
        ];

        let shape = collider_from_points(&points, "cube").unwrap();
        assert!(shape.as_convex_polyhedron().is_some());
    }

    #[test]
    fn rejects_too_few_points() {
        let points = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];

        let err = collider_from_points(&points, "triangle").unwrap_err();
        assert!(matches!(err, PhysicsError::CollisionShape { .. }));
    }

    #[test]
    fn rejects_degenerate_point_cloud() {
        // All points identical: no hull exists.
        let points = [[1.0, 1.0, 1.0]; 8];

        assert!(collider_from_points(&points, "degenerate").is_err());
    }
}
