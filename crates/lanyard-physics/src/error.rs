//! Error types for the physics layer.

use thiserror::Error;

/// Errors that can occur while building physics state.
#[derive(Error, Debug)]
pub enum PhysicsError {
    /// Failed to create a collision shape.
    #[error("Failed to create collision shape for {name}: {reason}")]
    CollisionShape {
        /// Name of the mesh or body the shape was built for.
        name: String,
        /// Reason for failure.
        reason: String,
    },
}
