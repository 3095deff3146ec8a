//! Physical material parameters.
//!
//! A [`MaterialProperties`] record is the serializable source every block
//! type is built from. Fields a law does not use are ignored by it.

use flexion_math::Vec3;
use flexion_types::{FlexionError, FlexionResult, Scalar};
use serde::{Deserialize, Serialize};

/// Physical properties of an element material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialProperties {
    /// Human-readable name (e.g., "natural_rubber").
    pub name: String,

    /// Young's modulus (linear restoring stiffness per unit volume).
    pub youngs_modulus: Scalar,

    /// Relative modulus along each material axis. `[1, 1, 1]` is isotropic.
    pub anisotropy: [Scalar; 3],

    /// Viscosity (damping per unit volume).
    pub viscosity: Scalar,

    /// Cubic hardening coefficient. Zero gives a linear material.
    pub hardening: Scalar,
}

impl MaterialProperties {
    /// Rejects negative or non-finite parameters.
    pub fn validate(&self) -> FlexionResult<()> {
        let values = [
            self.youngs_modulus,
            self.viscosity,
            self.hardening,
            self.anisotropy[0],
            self.anisotropy[1],
            self.anisotropy[2],
        ];
        if values.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(FlexionError::InvalidMaterial(format!(
                "material `{}` has negative or non-finite parameters",
                self.name
            )));
        }
        Ok(())
    }

    /// Modulus along each material axis.
    pub fn axis_moduli(&self) -> Vec3 {
        Vec3::from_array(self.anisotropy) * self.youngs_modulus
    }

    /// Returns true if the axis moduli differ by more than 5%.
    pub fn is_anisotropic(&self) -> bool {
        let a = Vec3::from_array(self.anisotropy);
        let min = a.min_element();
        min <= 1e-8 || (a.max_element() / min - 1.0).abs() > 0.05
    }

    /// Returns true if the material has no state-dependent stiffness.
    pub fn is_linear(&self) -> bool {
        self.hardening == 0.0
    }
}
