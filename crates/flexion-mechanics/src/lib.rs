//! # flexion-mechanics
//!
//! Motion state, scene context, and the material force-field engine.
//!
//! ## Key Types
//!
//! - [`MotionState`]: positions, velocities, and free positions per element
//! - [`NodeContext`]: scene node exposing a state and a volume provider
//! - [`ForceField`]: interface consumed by integrators and constraint solvers
//! - [`MaterialForceField`]: per-element material engine with K/B/C assembly
//! - [`ForceFieldConfig`]: operator assembly and role flags

pub mod assembly;
pub mod config;
pub mod context;
pub mod forcefield;
pub mod state;
pub mod traits;

pub use assembly::OperatorKind;
pub use config::{ForceFieldConfig, LinearizationFactors};
pub use context::{GaussPointSampler, NodeContext, VolumeProvider};
pub use forcefield::MaterialForceField;
pub use state::{MotionState, StateHandle};
pub use traits::ForceField;
