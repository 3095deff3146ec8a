//! Force-field configuration.
//!
//! Four independent flags control which operators are assembled and which
//! role the field plays. Defaults give a matrix-free stiffness field.

use flexion_types::Scalar;
use serde::{Deserialize, Serialize};

/// Configuration of a material force field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForceFieldConfig {
    /// Keep the compliance operator C assembled.
    pub assemble_compliance: bool,

    /// Keep the stiffness operator K assembled. When set, linearized forces
    /// are applied through K instead of per element.
    pub assemble_stiffness: bool,

    /// Keep the damping operator B assembled.
    pub assemble_damping: bool,

    /// Act as a compliance: contribute no direct force, expose C instead of K.
    pub is_compliance: bool,
}

impl Default for ForceFieldConfig {
    fn default() -> Self {
        Self::matrix_free()
    }
}

impl ForceFieldConfig {
    /// Stiffness role, nothing assembled.
    pub fn matrix_free() -> Self {
        Self {
            assemble_compliance: false,
            assemble_stiffness: false,
            assemble_damping: false,
            is_compliance: false,
        }
    }

    /// Stiffness role with K and B assembled.
    pub fn assembled() -> Self {
        Self {
            assemble_stiffness: true,
            assemble_damping: true,
            ..Self::matrix_free()
        }
    }

    /// Compliance role with C assembled.
    pub fn compliance() -> Self {
        Self {
            assemble_compliance: true,
            is_compliance: true,
            ..Self::matrix_free()
        }
    }

    /// True if any operator is kept assembled.
    pub fn assembles_any(&self) -> bool {
        self.assemble_compliance || self.assemble_stiffness || self.assemble_damping
    }
}

/// Scalar factors of a linearized force evaluation.
///
/// `df = k_factor · ∂f/∂x · dx + b_factor · ∂f/∂v · dx`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearizationFactors {
    /// Weight of the stiffness term.
    pub k_factor: Scalar,
    /// Weight of the damping term.
    pub b_factor: Scalar,
}

impl LinearizationFactors {
    pub fn new(k_factor: Scalar, b_factor: Scalar) -> Self {
        Self { k_factor, b_factor }
    }

    /// Factors of an implicit Euler step: `k = -dt²`, `b = -dt`.
    pub fn implicit_euler(dt: Scalar) -> Self {
        Self {
            k_factor: -dt * dt,
            b_factor: -dt,
        }
    }
}

impl Default for LinearizationFactors {
    fn default() -> Self {
        Self {
            k_factor: 1.0,
            b_factor: 0.0,
        }
    }
}
