//! # flexion-collision
//!
//! Point-primitive (sphere) collision elements.
//!
//! Collision pipelines query spheres through per-index accessors and feed
//! their bounding boxes to a broad-phase hierarchy. Detection and contact
//! response live downstream.
//!
//! ## Key Types
//!
//! - [`SphereCollisionModel`]: spheres centered on a motion state's coordinates
//! - [`Sphere`]: per-index accessor handed to collision pipelines
//! - [`SphereGeometry`]: contact-point geometry per representation
//! - [`Aabb`] / [`BoundingTreeBuilder`]: per-element boxes and their consumer

pub mod bounding;
pub mod config;
pub mod sphere;

pub use bounding::{Aabb, AabbTree, BoundingTreeBuilder};
pub use config::SphereModelConfig;
pub use sphere::{Sphere, SphereCollisionModel, SphereGeometry};
