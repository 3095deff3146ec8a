//! Scalar type alias for the engine.
//!
//! Matches the `f32` storage of the glam vector types used for
//! coordinates. Operator storage promotes to `f64` only at the
//! solver boundary.

/// The floating-point type used for coordinates, weights, and operator blocks.
pub type Scalar = f32;
