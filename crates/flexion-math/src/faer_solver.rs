//! Cholesky factorization of assembled operators, backed by `faer`.
//!
//! Used to check that a compressed operator is usable by a linear solve:
//! K and B are negative definite, C is positive definite, so
//! [`FaerSolver::factorize_operator`] takes a sign and factorizes `sign · A`
//! as a symmetric positive definite matrix. Entries are widened to f64 for
//! the factorization and narrowed back on output.

use faer::Side;
use faer::linalg::solvers::Solve;
use faer::sparse::linalg::solvers::{Llt, SymbolicLlt};
use faer::sparse::{SparseColMat, Triplet};
use flexion_types::{FlexionError, FlexionResult, Scalar};
use tracing::debug;

use crate::block_sparse::BlockSparseMatrix;
use crate::datatypes::DataTypes;

/// Sparse LLᵀ of one operator. The factorization is reused until the
/// next [`factorize_operator`](Self::factorize_operator) call.
#[derive(Default)]
pub struct FaerSolver {
    llt: Option<Llt<usize, f64>>,
    dimension: usize,
}

impl FaerSolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scalar dimension of the factorized system.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn is_factorized(&self) -> bool {
        self.llt.is_some()
    }

    /// Factorizes `sign · op`. Pass `-1.0` for stiffness and damping
    /// operators, `1.0` for compliance.
    pub fn factorize_operator(&mut self, op: &BlockSparseMatrix, sign: Scalar) -> FlexionResult<()> {
        self.llt = None;
        if !op.is_compressed() {
            return Err(FlexionError::invalid_operator("operator factorized before compress"));
        }
        let bs = op.block_size();
        let (rows, cols) = (op.block_rows() * bs, op.block_cols() * bs);
        if rows != cols {
            return Err(FlexionError::Solver(format!("operator is not square ({rows}×{cols})")));
        }
        if rows == 0 {
            return Err(FlexionError::Solver("nothing to factorize".into()));
        }

        let sign = f64::from(sign);
        let mut entries: Vec<Triplet<usize, usize, f64>> = Vec::with_capacity(op.nnz_blocks() * bs * bs);
        for (row, col, block) in op.blocks() {
            for (k, &v) in block.iter().enumerate() {
                if v != 0.0 {
                    entries.push(Triplet {
                        row: row * bs + k / bs,
                        col: col * bs + k % bs,
                        val: sign * f64::from(v),
                    });
                }
            }
        }

        let csc = SparseColMat::try_new_from_triplets(rows, cols, &entries)
            .map_err(|e| FlexionError::Solver(format!("entry layout rejected: {e:?}")))?;
        let symbolic = SymbolicLlt::try_new(csc.symbolic().as_ref(), Side::Upper)
            .map_err(|e| FlexionError::Solver(format!("symbolic analysis failed: {e:?}")))?;
        let llt = Llt::try_new_with_symbolic(symbolic, csc.as_ref(), Side::Upper)
            .map_err(|e| FlexionError::Solver(format!("operator is not positive definite: {e:?}")))?;

        debug!(dimension = rows, entries = entries.len(), "operator factorized");
        self.llt = Some(llt);
        self.dimension = rows;
        Ok(())
    }

    /// Solves `sign · op · out = rhs` on derivative buffers of representation `T`.
    pub fn solve_derivs<T: DataTypes>(&self, rhs: &[T::Deriv], out: &mut [T::Deriv]) -> FlexionResult<()> {
        let Some(llt) = self.llt.as_ref() else {
            return Err(FlexionError::Solver("no factorization available".into()));
        };
        let dim = T::DERIV_DIM;
        let n = self.dimension;
        if rhs.len() * dim != n || out.len() * dim != n {
            return Err(FlexionError::Solver(format!(
                "system of dimension {n} given {} and {} derivatives of size {dim}",
                rhs.len(),
                out.len()
            )));
        }

        let mut flat = vec![0.0; n];
        for (chunk, v) in flat.chunks_exact_mut(dim).zip(rhs) {
            T::write_deriv(v, chunk);
        }
        let b = faer::Mat::from_fn(n, 1, |i, _| f64::from(flat[i]));
        let x = llt.solve(&b);
        for (i, s) in flat.iter_mut().enumerate() {
            *s = x[(i, 0)] as Scalar;
        }
        for (o, chunk) in out.iter_mut().zip(flat.chunks_exact(dim)) {
            *o = T::read_deriv(chunk);
        }
        Ok(())
    }
}
