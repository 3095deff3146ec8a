//! # flexion-math
//!
//! Linear algebra primitives for the Flexion engine.
//!
//! Provides:
//! - Re-exports of `glam` types (`Vec3`, `Mat3`, `Quat`)
//! - Representation descriptors ([`DataTypes`]) for plain vectors and rigid frames
//! - Block-sparse operators built row by row from per-element dense blocks
//! - Scalar CSR export and a faer Cholesky check for assembled operators

pub mod block_sparse;
pub mod datatypes;
pub mod faer_solver;
pub mod sparse;

pub use block_sparse::{BlockSparseMatrix, DenseBlock};
pub use datatypes::{DataTypes, Rigid3Types, RigidCoord, RigidDeriv, Vec3Types};
pub use sparse::CsrMatrix;

// Re-export glam types as the canonical math types for Flexion.
pub use glam::{Mat3, Quat, Vec3};
