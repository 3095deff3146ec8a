//! # flexion-material
//!
//! Per-element constitutive laws ("material blocks") and a material database.
//!
//! ## Design
//!
//! The [`MaterialBlock`] trait is the capability set the force-field engine
//! is generic over: force evaluation, linearized force evaluation, the three
//! per-element matrix blocks (stiffness, damping, compliance), and a
//! constant-stiffness flag. Adding a constitutive law never touches the
//! operator assembly.
//!
//! The [`MaterialDatabase`] stores named parameter presets that every
//! block type can be built from.

pub mod database;
pub mod hardening;
pub mod isotropic;
pub mod orthotropic;
pub mod properties;
pub mod traits;

pub use database::MaterialDatabase;
pub use hardening::CubicHardeningMaterial;
pub use isotropic::IsotropicHookeMaterial;
pub use orthotropic::OrthotropicHookeMaterial;
pub use properties::MaterialProperties;
pub use traits::MaterialBlock;
