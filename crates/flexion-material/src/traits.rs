//! Material block trait, the core material abstraction.
//!
//! One block exists per element of the motion state. The force field
//! calls the block with that element's coordinate and derivative only,
//! so every law here is strictly local.

use std::fmt::Debug;

use flexion_math::{DataTypes, DenseBlock};
use flexion_types::Scalar;
use flexion_types::constants::UNIT_VOLUME;

/// Derivative type of a block's representation.
pub type DerivOf<M> = <<M as MaterialBlock>::Types as DataTypes>::Deriv;

/// Coordinate type of a block's representation.
pub type CoordOf<M> = <<M as MaterialBlock>::Types as DataTypes>::Coord;

/// Constitutive law evaluated on a single element.
///
/// # Contract
///
/// - `add_force` accumulates `f += force(x, v)`; laws whose stiffness depends
///   on state cache what they need for the linearization here.
/// - `add_dforce` accumulates `df += k_factor · K · dx + b_factor · B · dx`
///   using the blocks returned by [`stiffness_block`](Self::stiffness_block)
///   and [`damping_block`](Self::damping_block), so the matrix-free path and
///   the assembled path agree.
/// - Every contribution is scaled by [`effective_volume`](Self::effective_volume).
pub trait MaterialBlock: Clone + Debug + Send + Sync {
    /// Representation the law operates on.
    type Types: DataTypes;

    /// Dense matrix block, `DERIV_DIM × DERIV_DIM`.
    type Block: DenseBlock + Copy + Debug + PartialEq;

    /// True when the stiffness block does not depend on the current state.
    const CONSTANT_STIFFNESS: bool;

    /// Quadrature weight bound to this block, `None` when unweighted.
    fn volume(&self) -> Option<Scalar>;

    /// Binds (or clears) the quadrature weight.
    fn set_volume(&mut self, volume: Option<Scalar>);

    /// Weight applied to every contribution; unit when unweighted.
    fn effective_volume(&self) -> Scalar {
        self.volume().unwrap_or(UNIT_VOLUME)
    }

    /// Accumulate the internal force for coordinate `x` and derivative `v`.
    fn add_force(&mut self, f: &mut DerivOf<Self>, x: &CoordOf<Self>, v: &DerivOf<Self>);

    /// Accumulate the linearized force for a coordinate delta.
    fn add_dforce(&self, df: &mut DerivOf<Self>, dx: &DerivOf<Self>, k_factor: Scalar, b_factor: Scalar);

    /// ∂f/∂x at the last evaluated state.
    fn stiffness_block(&self) -> Self::Block;

    /// ∂f/∂v.
    fn damping_block(&self) -> Self::Block;

    /// Inverse of the restoring stiffness, used when the law acts as a compliance.
    fn compliance_block(&self) -> Self::Block;

    /// Elastic energy stored at coordinate `x`.
    fn potential_energy(&self, x: &CoordOf<Self>) -> Scalar;

    /// Returns the name of this law.
    fn name(&self) -> &str;
}
