//! Isotropic Hookean material.
//!
//! Linear elastic law on a strain-like coordinate with linear viscosity:
//!
//! ```text
//! f = -V · (E · x + η · v)
//! K = -V · E · I     B = -V · η · I     C = I / (V · E)
//! ```
//!
//! Stiffness is constant, so assembled operators can be reused across steps.

use flexion_math::{Mat3, Vec3, Vec3Types};
use flexion_types::{FlexionError, FlexionResult, Scalar};

use crate::properties::MaterialProperties;
use crate::traits::MaterialBlock;

/// Isotropic linear elastic block with linear viscosity.
#[derive(Debug, Clone, PartialEq)]
pub struct IsotropicHookeMaterial {
    /// Young's modulus (restoring stiffness per unit volume).
    pub youngs_modulus: Scalar,
    /// Viscosity (damping per unit volume).
    pub viscosity: Scalar,
    volume: Option<Scalar>,
}

impl IsotropicHookeMaterial {
    /// Creates a block, rejecting negative parameters.
    pub fn new(youngs_modulus: Scalar, viscosity: Scalar) -> FlexionResult<Self> {
        if youngs_modulus < 0.0 || viscosity < 0.0 {
            return Err(FlexionError::InvalidMaterial(format!(
                "isotropic hooke needs non-negative parameters, got E={youngs_modulus}, eta={viscosity}"
            )));
        }
        Ok(Self {
            youngs_modulus,
            viscosity,
            volume: None,
        })
    }

    /// Create from material properties.
    pub fn from_properties(properties: &MaterialProperties) -> FlexionResult<Self> {
        properties.validate()?;
        Self::new(properties.youngs_modulus, properties.viscosity)
    }
}

impl Default for IsotropicHookeMaterial {
    fn default() -> Self {
        Self {
            youngs_modulus: 1.0,
            viscosity: 0.0,
            volume: None,
        }
    }
}

impl MaterialBlock for IsotropicHookeMaterial {
    type Types = Vec3Types;
    type Block = Mat3;

    const CONSTANT_STIFFNESS: bool = true;

    fn volume(&self) -> Option<Scalar> {
        self.volume
    }

    fn set_volume(&mut self, volume: Option<Scalar>) {
        self.volume = volume;
    }

    fn add_force(&mut self, f: &mut Vec3, x: &Vec3, v: &Vec3) {
        let vol = self.effective_volume();
        *f -= vol * (self.youngs_modulus * *x + self.viscosity * *v);
    }

    fn add_dforce(&self, df: &mut Vec3, dx: &Vec3, k_factor: Scalar, b_factor: Scalar) {
        let vol = self.effective_volume();
        *df -= vol * (k_factor * self.youngs_modulus + b_factor * self.viscosity) * *dx;
    }

    fn stiffness_block(&self) -> Mat3 {
        Mat3::from_diagonal(Vec3::splat(-self.effective_volume() * self.youngs_modulus))
    }

    fn damping_block(&self) -> Mat3 {
        Mat3::from_diagonal(Vec3::splat(-self.effective_volume() * self.viscosity))
    }

    fn compliance_block(&self) -> Mat3 {
        let k = self.effective_volume() * self.youngs_modulus;
        if k > 0.0 {
            Mat3::from_diagonal(Vec3::splat(1.0 / k))
        } else {
            Mat3::ZERO
        }
    }

    fn potential_energy(&self, x: &Vec3) -> Scalar {
        0.5 * self.effective_volume() * self.youngs_modulus * x.length_squared()
    }

    fn name(&self) -> &str {
        "isotropic_hooke"
    }
}
