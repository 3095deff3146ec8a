//! Orthotropic Hookean material.
//!
//! Direction-dependent linear elasticity: each material axis has its own
//! modulus, so the blocks are diagonal but not multiples of identity.
//! Viscosity stays isotropic.

use flexion_math::{Mat3, Vec3, Vec3Types};
use flexion_types::{FlexionError, FlexionResult, Scalar};

use crate::properties::MaterialProperties;
use crate::traits::MaterialBlock;

/// Orthotropic linear elastic block.
#[derive(Debug, Clone, PartialEq)]
pub struct OrthotropicHookeMaterial {
    /// Modulus along each material axis.
    pub moduli: Vec3,
    /// Isotropic viscosity.
    pub viscosity: Scalar,
    volume: Option<Scalar>,
}

impl OrthotropicHookeMaterial {
    /// Create a block with per-axis moduli.
    pub fn new(moduli: Vec3, viscosity: Scalar) -> FlexionResult<Self> {
        if moduli.min_element() < 0.0 || viscosity < 0.0 {
            return Err(FlexionError::InvalidMaterial(format!(
                "orthotropic hooke needs non-negative parameters, got moduli={moduli}, eta={viscosity}"
            )));
        }
        Ok(Self {
            moduli,
            viscosity,
            volume: None,
        })
    }

    /// Create from material properties (modulus scaled by the anisotropy weights).
    pub fn from_properties(properties: &MaterialProperties) -> FlexionResult<Self> {
        properties.validate()?;
        Self::new(properties.axis_moduli(), properties.viscosity)
    }

    /// Ratio of the stiffest to the softest axis.
    pub fn anisotropy_ratio(&self) -> Scalar {
        let min = self.moduli.min_element();
        if min > 1e-8 {
            self.moduli.max_element() / min
        } else {
            1.0
        }
    }
}

impl MaterialBlock for OrthotropicHookeMaterial {
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
        *f -= vol * (self.moduli * *x + self.viscosity * *v);
    }

    fn add_dforce(&self, df: &mut Vec3, dx: &Vec3, k_factor: Scalar, b_factor: Scalar) {
        let vol = self.effective_volume();
        *df -= vol * (k_factor * self.moduli + Vec3::splat(b_factor * self.viscosity)) * *dx;
    }

    fn stiffness_block(&self) -> Mat3 {
        Mat3::from_diagonal(-self.effective_volume() * self.moduli)
    }

    fn damping_block(&self) -> Mat3 {
        Mat3::from_diagonal(Vec3::splat(-self.effective_volume() * self.viscosity))
    }

    fn compliance_block(&self) -> Mat3 {
        let vol = self.effective_volume();
        let inv = |k: Scalar| if vol * k > 0.0 { 1.0 / (vol * k) } else { 0.0 };
        Mat3::from_diagonal(Vec3::new(
            inv(self.moduli.x),
            inv(self.moduli.y),
            inv(self.moduli.z),
        ))
    }

    fn potential_energy(&self, x: &Vec3) -> Scalar {
        0.5 * self.effective_volume() * (self.moduli * *x * *x).element_sum()
    }

    fn name(&self) -> &str {
        "orthotropic_hooke"
    }
}
