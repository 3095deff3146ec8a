//! Operator assembly from per-element material blocks.
//!
//! Every operator (compliance C, stiffness K, damping B) is rebuilt the
//! same way: resize to `n × n` blocks, one diagonal block per element
//! taken from the matching material accessor, then compress.
//!
//! The result is strictly block-diagonal; coupling between elements is
//! introduced by mappings outside this crate.

use flexion_material::MaterialBlock;
use flexion_math::BlockSparseMatrix;
use flexion_types::FlexionResult;
use serde::{Deserialize, Serialize};

/// Role of an assembled operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperatorKind {
    /// C, inverse restoring stiffness.
    Compliance,
    /// K = ∂f/∂x.
    Stiffness,
    /// B = ∂f/∂v.
    Damping,
}

impl OperatorKind {
    /// All kinds, in rebuild order.
    pub const ALL: [OperatorKind; 3] = [Self::Compliance, Self::Stiffness, Self::Damping];

    /// The block element `material` contributes to this operator.
    #[inline]
    pub fn block_of<M: MaterialBlock>(self, material: &M) -> M::Block {
        match self {
            Self::Compliance => material.compliance_block(),
            Self::Stiffness => material.stiffness_block(),
            Self::Damping => material.damping_block(),
        }
    }

    /// Short label used in logs.
    pub fn label(self) -> &'static str {
        match self {
            Self::Compliance => "C",
            Self::Stiffness => "K",
            Self::Damping => "B",
        }
    }

    pub(crate) fn slot(self) -> usize {
        match self {
            Self::Compliance => 0,
            Self::Stiffness => 1,
            Self::Damping => 2,
        }
    }
}

/// Rebuild `operator` as the block diagonal of `kind` blocks of `material`,
/// one block row per element.
pub fn rebuild_operator<M: MaterialBlock>(
    operator: &mut BlockSparseMatrix,
    kind: OperatorKind,
    material: &[M],
) -> FlexionResult<()> {
    let n = material.len();
    operator.resize_blocks(n, n);
    for (i, block) in material.iter().enumerate() {
        operator.begin_block_row(i)?;
        operator.create_block(i, &kind.block_of(block))?;
        operator.end_block_row()?;
    }
    operator.compress()
}
