//! Cubic hardening material.
//!
//! Nonlinear elastic law whose restoring force grows with the cube of the
//! strain magnitude:
//!
//! ```text
//! f = -V · (k₁ + k₃·|x|²) · x  -  V · η · v
//! K = -V · (k₁·I + k₃·(|x|²·I + 2·x·xᵀ))
//! ```
//!
//! `K` depends on the state, so the block caches the tangent at the last
//! force evaluation and reports `CONSTANT_STIFFNESS = false`. The force
//! field then rebuilds its assembled operators after every `add_force`.

use flexion_math::{Mat3, Vec3, Vec3Types};
use flexion_types::constants::SINGULAR_DETERMINANT;
use flexion_types::{FlexionError, FlexionResult, Scalar};

use crate::properties::MaterialProperties;
use crate::traits::MaterialBlock;

/// Nonlinear (cubic) hardening elastic block.
#[derive(Debug, Clone, PartialEq)]
pub struct CubicHardeningMaterial {
    /// Linear stiffness k₁.
    pub linear_stiffness: Scalar,
    /// Cubic hardening coefficient k₃.
    pub hardening: Scalar,
    /// Linear viscosity η.
    pub viscosity: Scalar,
    volume: Option<Scalar>,
    /// Strain at the last force evaluation.
    last_strain: Vec3,
}

impl CubicHardeningMaterial {
    /// Create a block at rest (zero strain).
    pub fn new(linear_stiffness: Scalar, hardening: Scalar, viscosity: Scalar) -> FlexionResult<Self> {
        if linear_stiffness < 0.0 || hardening < 0.0 || viscosity < 0.0 {
            return Err(FlexionError::InvalidMaterial(format!(
                "cubic hardening needs non-negative parameters, got k1={linear_stiffness}, k3={hardening}, eta={viscosity}"
            )));
        }
        Ok(Self {
            linear_stiffness,
            hardening,
            viscosity,
            volume: None,
            last_strain: Vec3::ZERO,
        })
    }

    /// Create from material properties.
    pub fn from_properties(properties: &MaterialProperties) -> FlexionResult<Self> {
        properties.validate()?;
        Self::new(properties.youngs_modulus, properties.hardening, properties.viscosity)
    }

    /// Strain the cached tangent was computed at.
    pub fn last_strain(&self) -> Vec3 {
        self.last_strain
    }

    /// Tangent stiffness per unit volume at strain `x` (positive definite).
    fn tangent(&self, x: Vec3) -> Mat3 {
        let r2 = x.length_squared();
        let outer = Mat3::from_cols(x * x.x, x * x.y, x * x.z);
        Mat3::from_diagonal(Vec3::splat(self.linear_stiffness + self.hardening * r2))
            + outer * (2.0 * self.hardening)
    }
}

impl MaterialBlock for CubicHardeningMaterial {
    type Types = Vec3Types;
    type Block = Mat3;

    const CONSTANT_STIFFNESS: bool = false;

    fn volume(&self) -> Option<Scalar> {
        self.volume
    }

    fn set_volume(&mut self, volume: Option<Scalar>) {
        self.volume = volume;
    }

    fn add_force(&mut self, f: &mut Vec3, x: &Vec3, v: &Vec3) {
        self.last_strain = *x;
        let vol = self.effective_volume();
        let k = self.linear_stiffness + self.hardening * x.length_squared();
        *f -= vol * (k * *x + self.viscosity * *v);
    }

    fn add_dforce(&self, df: &mut Vec3, dx: &Vec3, k_factor: Scalar, b_factor: Scalar) {
        let vol = self.effective_volume();
        let tangent = self.tangent(self.last_strain);
        *df -= vol * (k_factor * (tangent * *dx) + b_factor * self.viscosity * *dx);
    }

    fn stiffness_block(&self) -> Mat3 {
        self.tangent(self.last_strain) * -self.effective_volume()
    }

    fn damping_block(&self) -> Mat3 {
        Mat3::from_diagonal(Vec3::splat(-self.effective_volume() * self.viscosity))
    }

    fn compliance_block(&self) -> Mat3 {
        let k = self.tangent(self.last_strain) * self.effective_volume();
        if k.determinant().abs() > SINGULAR_DETERMINANT {
            k.inverse()
        } else {
            Mat3::ZERO
        }
    }

    fn potential_energy(&self, x: &Vec3) -> Scalar {
        let r2 = x.length_squared();
        self.effective_volume() * (0.5 * self.linear_stiffness * r2 + 0.25 * self.hardening * r2 * r2)
    }

    fn name(&self) -> &str {
        "cubic_hardening"
    }
}
