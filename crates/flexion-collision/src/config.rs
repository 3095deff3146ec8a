//! Sphere collision model configuration.

use flexion_types::constants::{DEFAULT_CONTACT_STIFFNESS, DEFAULT_PROXIMITY, DEFAULT_SPHERE_RADIUS};
use flexion_types::{FlexionError, FlexionResult, Scalar};
use serde::{Deserialize, Serialize};

/// Configuration of a [`SphereCollisionModel`](crate::SphereCollisionModel).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SphereModelConfig {
    /// Per-element radii. Empty broadcasts `default_radius` to every element.
    pub radius: Vec<Scalar>,

    /// Radius used when `radius` is empty.
    pub default_radius: Scalar,

    /// Distance kept between the model and the actual surface.
    pub proximity: Scalar,

    /// Stiffness reported to contact responses.
    pub contact_stiffness: Scalar,

    /// Takes part in collision detection.
    pub active: bool,

    /// Elements move during the simulation; static models build their
    /// bounding tree once.
    pub moving: bool,

    /// Positions are driven by the simulation.
    pub simulated: bool,
}

impl Default for SphereModelConfig {
    fn default() -> Self {
        Self {
            radius: Vec::new(),
            default_radius: DEFAULT_SPHERE_RADIUS,
            proximity: DEFAULT_PROXIMITY,
            contact_stiffness: DEFAULT_CONTACT_STIFFNESS,
            active: true,
            moving: true,
            simulated: true,
        }
    }
}

impl SphereModelConfig {
    /// Every element shares one radius.
    pub fn uniform(radius: Scalar) -> Self {
        Self {
            default_radius: radius,
            ..Self::default()
        }
    }

    /// One radius per element.
    pub fn per_element(radius: Vec<Scalar>) -> Self {
        Self {
            radius,
            ..Self::default()
        }
    }

    /// Fixed obstacle: never moves, not simulated.
    pub fn obstacle(radius: Scalar) -> Self {
        Self {
            moving: false,
            simulated: false,
            ..Self::uniform(radius)
        }
    }

    /// Rejects negative or non-finite lengths.
    pub fn validate(&self) -> FlexionResult<()> {
        let check = |what: &str, value: Scalar| {
            if value.is_finite() && value >= 0.0 {
                Ok(())
            } else {
                Err(FlexionError::InvalidConfig(format!("{what} must be non-negative, got {value}")))
            }
        };
        check("default_radius", self.default_radius)?;
        check("proximity", self.proximity)?;
        check("contact_stiffness", self.contact_stiffness)?;
        for (i, &r) in self.radius.iter().enumerate() {
            check(&format!("radius[{i}]"), r)?;
        }
        Ok(())
    }
}
