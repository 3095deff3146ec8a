//! Force field trait, the interface the integration and constraint stages consume.

use flexion_math::{BlockSparseMatrix, DataTypes};

use crate::config::LinearizationFactors;
use crate::context::NodeContext;

/// A component contributing internal forces and their linearization.
///
/// The owning runtime calls these methods in order:
///
/// ```text
/// field.init(&node);
/// loop {
///     field.add_force(f, x, v);
///     field.add_dforce(df, dx, factors);   // once per linear-solver product
/// }
/// ```
///
/// Operator accessors may rebuild the operator they return; they are not
/// guaranteed to be O(1). `None` means the operator does not apply to the
/// field's current role.
pub trait ForceField<T: DataTypes> {
    /// Bind collaborators from the scene context and assemble enabled operators.
    fn init(&mut self, ctx: &NodeContext<T>);

    /// Rebuild every enabled operator.
    fn reinit(&mut self);

    /// `f += force(x, v)`.
    fn add_force(&mut self, f: &mut [T::Deriv], x: &[T::Coord], v: &[T::Deriv]);

    /// `df += k_factor · K · dx + b_factor · B · dx`.
    fn add_dforce(&self, df: &mut [T::Deriv], dx: &[T::Deriv], factors: LinearizationFactors);

    /// Assembled K, or `None` when the field acts as a compliance.
    fn stiffness_matrix(&mut self) -> Option<&BlockSparseMatrix>;

    /// Assembled B.
    fn damping_matrix(&mut self) -> Option<&BlockSparseMatrix>;

    /// Assembled C, or `None` when the field acts as a stiffness.
    fn compliance_matrix(&mut self) -> Option<&BlockSparseMatrix>;

    /// Returns the component's name.
    fn name(&self) -> &str;
}
