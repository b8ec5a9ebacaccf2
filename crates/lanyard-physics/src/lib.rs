#![warn(missing_docs)]

//! Rigid-body simulation for the lanyard scene, built on Rapier3d.
//!
//! This crate owns every piece of simulation state: the Rapier pipeline,
//! the rigid bodies and colliders of the band chain, and the joints tying
//! them together. Everything outside refers to bodies through the handles
//! returned at assembly time; nothing else aliases simulation state.
//!
//! # Example
//!
//! ```ignore
//! use lanyard_physics::{build_chain, ChainParams, PhysicsWorld};
//! use nalgebra::Vector3;
//!
//! let mut world = PhysicsWorld::new(Vector3::new(0.0, -40.0, 0.0), 1.0 / 60.0);
//! let chain = build_chain(&mut world, &ChainParams::default());
//!
//! // Advance the simulation one fixed step at a time.
//! world.step();
//!
//! // Drive the card kinematically while it is dragged.
//! world.set_kinematic(chain.card, true);
//! ```

mod chain;
mod colliders;
mod error;
mod world;

pub use chain::{build_chain, Chain, ChainParams};
pub use colliders::collider_from_points;
pub use error::PhysicsError;
pub use world::{ColliderShape, PhysicsWorld};

pub use parry3d::shape::SharedShape;
pub use rapier3d::dynamics::RigidBodyHandle;
