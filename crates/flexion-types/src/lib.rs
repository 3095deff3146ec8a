//! # flexion-types
//!
//! Shared types, identifiers, error types, and defaults
//! for the Flexion material and collision engine.
//!
//! This crate has zero domain logic; it defines the vocabulary
//! that all other Flexion crates share.

pub mod constants;
pub mod error;
pub mod ids;
pub mod scalar;

pub use error::{FlexionError, FlexionResult};
pub use ids::{ElementId, NodeId};
pub use scalar::Scalar;
