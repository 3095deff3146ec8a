//! Block-sparse linear operators.
//!
//! A [`BlockSparseMatrix`] stores square dense blocks at block (row, column)
//! coordinates in block-CSR order. It is filled with a row protocol:
//!
//! ```text
//! m.resize_blocks(n, n);          // clears everything
//! for i in 0..n {
//!     m.begin_block_row(i)?;      // rows strictly increasing
//!     m.create_block(j, &block)?; // columns strictly increasing within a row
//!     m.end_block_row()?;
//! }
//! m.compress()?;                  // ready for add_mult / to_csr
//! ```
//!
//! The operator is not incrementally updatable: every assembly is a full
//! rebuild starting at `resize_blocks`.

use flexion_types::{FlexionError, FlexionResult, Scalar};
use serde::{Deserialize, Serialize};

use crate::datatypes::DataTypes;
use crate::sparse::CsrMatrix;

/// A dense square block that can be stored in a [`BlockSparseMatrix`].
pub trait DenseBlock {
    /// Number of rows (and columns) of the block.
    const DIM: usize;

    /// Write the block in row-major order into `out[..DIM * DIM]`.
    fn write_row_major(&self, out: &mut [Scalar]);
}

impl DenseBlock for Scalar {
    const DIM: usize = 1;

    #[inline]
    fn write_row_major(&self, out: &mut [Scalar]) {
        out[0] = *self;
    }
}

impl DenseBlock for glam::Mat3 {
    const DIM: usize = 3;

    #[inline]
    fn write_row_major(&self, out: &mut [Scalar]) {
        // glam is column-major
        let cols = self.to_cols_array_2d();
        for (r, row) in out[..9].chunks_exact_mut(3).enumerate() {
            for (c, v) in row.iter_mut().enumerate() {
                *v = cols[c][r];
            }
        }
    }
}

impl<const N: usize> DenseBlock for [[Scalar; N]; N] {
    const DIM: usize = N;

    fn write_row_major(&self, out: &mut [Scalar]) {
        for (r, row) in self.iter().enumerate() {
            out[r * N..(r + 1) * N].copy_from_slice(row);
        }
    }
}

/// Block-CSR operator with square blocks of a fixed size.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockSparseMatrix {
    /// Scalar rows (and columns) per block.
    block_size: usize,
    /// Number of block rows.
    block_rows: usize,
    /// Number of block columns.
    block_cols: usize,
    /// `row_ptr[i]..row_ptr[i+1]` indexes the blocks of block row `i`.
    /// Only complete after [`compress`](Self::compress).
    row_ptr: Vec<usize>,
    /// Block column of each stored block.
    col_idx: Vec<usize>,
    /// Block values, `block_size²` scalars per block, row-major.
    values: Vec<Scalar>,

    // ─── Build protocol ───
    open_row: Option<usize>,
    next_row: usize,
    compressed: bool,
}

impl BlockSparseMatrix {
    /// Creates an empty 0×0 operator with the given block size.
    pub fn new(block_size: usize) -> Self {
        Self {
            block_size,
            block_rows: 0,
            block_cols: 0,
            row_ptr: vec![0],
            col_idx: Vec::new(),
            values: Vec::new(),
            open_row: None,
            next_row: 0,
            compressed: true,
        }
    }

    /// Creates an empty operator sized for the derivative of `T`.
    pub fn for_types<T: DataTypes>() -> Self {
        Self::new(T::DERIV_DIM)
    }

    /// Discards all blocks and sets the block dimensions.
    pub fn resize_blocks(&mut self, block_rows: usize, block_cols: usize) {
        self.block_rows = block_rows;
        self.block_cols = block_cols;
        self.row_ptr.clear();
        self.row_ptr.push(0);
        self.col_idx.clear();
        self.values.clear();
        self.open_row = None;
        self.next_row = 0;
        self.compressed = false;
    }

    /// Opens block row `row`. Rows must be opened in strictly increasing order.
    pub fn begin_block_row(&mut self, row: usize) -> FlexionResult<()> {
        if let Some(open) = self.open_row {
            return Err(FlexionError::invalid_operator(format!(
                "cannot open block row {row}: row {open} is still open"
            )));
        }
        if row >= self.block_rows {
            return Err(FlexionError::invalid_operator(format!(
                "block row {row} outside {} block rows",
                self.block_rows
            )));
        }
        if row < self.next_row {
            return Err(FlexionError::invalid_operator(format!(
                "block row {row} opened out of order (next row is {})",
                self.next_row
            )));
        }

        // Skipped rows stay empty.
        while self.row_ptr.len() < row + 1 {
            self.row_ptr.push(self.col_idx.len());
        }

        self.open_row = Some(row);
        self.compressed = false;
        Ok(())
    }

    /// Inserts `block` at block column `col` of the open row.
    pub fn create_block<B: DenseBlock>(&mut self, col: usize, block: &B) -> FlexionResult<()> {
        let row = self
            .open_row
            .ok_or_else(|| FlexionError::invalid_operator("create_block called with no open row"))?;
        if B::DIM != self.block_size {
            return Err(FlexionError::invalid_operator(format!(
                "block of size {} inserted into operator with block size {}",
                B::DIM,
                self.block_size
            )));
        }
        if col >= self.block_cols {
            return Err(FlexionError::invalid_operator(format!(
                "block column {col} outside {} block columns",
                self.block_cols
            )));
        }
        let row_start = self.row_ptr[row];
        if self.col_idx.len() > row_start && self.col_idx[self.col_idx.len() - 1] >= col {
            return Err(FlexionError::invalid_operator(format!(
                "block column {col} not increasing in row {row}"
            )));
        }

        let bs2 = self.block_size * self.block_size;
        let start = self.values.len();
        self.values.resize(start + bs2, 0.0);
        block.write_row_major(&mut self.values[start..]);
        self.col_idx.push(col);
        Ok(())
    }

    /// Closes the open row.
    pub fn end_block_row(&mut self) -> FlexionResult<()> {
        let row = self
            .open_row
            .take()
            .ok_or_else(|| FlexionError::invalid_operator("end_block_row called with no open row"))?;
        self.next_row = row + 1;
        Ok(())
    }

    /// Finalizes the row structure so the operator can be applied or exported.
    pub fn compress(&mut self) -> FlexionResult<()> {
        if let Some(open) = self.open_row {
            return Err(FlexionError::invalid_operator(format!(
                "cannot compress while block row {open} is open"
            )));
        }
        while self.row_ptr.len() < self.block_rows + 1 {
            self.row_ptr.push(self.col_idx.len());
        }
        self.compressed = true;
        Ok(())
    }

    // ─── Queries ───

    /// Scalar rows (and columns) per block.
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Number of block rows.
    pub fn block_rows(&self) -> usize {
        self.block_rows
    }

    /// Number of block columns.
    pub fn block_cols(&self) -> usize {
        self.block_cols
    }

    /// Number of stored blocks.
    pub fn nnz_blocks(&self) -> usize {
        self.col_idx.len()
    }

    /// True once [`compress`](Self::compress) has run since the last edit.
    pub fn is_compressed(&self) -> bool {
        self.compressed
    }

    /// Row-major values of the block at `(row, col)`, if stored.
    pub fn block(&self, row: usize, col: usize) -> Option<&[Scalar]> {
        if !self.compressed || row >= self.block_rows {
            return None;
        }
        let bs2 = self.block_size * self.block_size;
        (self.row_ptr[row]..self.row_ptr[row + 1])
            .find(|&k| self.col_idx[k] == col)
            .map(|k| &self.values[k * bs2..(k + 1) * bs2])
    }

    /// Iterates stored blocks as `(row, col, values)` in row order.
    pub fn blocks(&self) -> impl Iterator<Item = (usize, usize, &[Scalar])> + '_ {
        let bs2 = self.block_size * self.block_size;
        (0..self.row_ptr.len().saturating_sub(1)).flat_map(move |row| {
            (self.row_ptr[row]..self.row_ptr[row + 1])
                .map(move |k| (row, self.col_idx[k], &self.values[k * bs2..(k + 1) * bs2]))
        })
    }

    // ─── Application ───

    /// `out += factor * A * x` on flat scalar vectors.
    pub fn add_mult_scalars(&self, out: &mut [Scalar], x: &[Scalar], factor: Scalar) -> FlexionResult<()> {
        if !self.compressed {
            return Err(FlexionError::invalid_operator("operator applied before compress"));
        }
        let bs = self.block_size;
        if x.len() != self.block_cols * bs || out.len() != self.block_rows * bs {
            return Err(FlexionError::invalid_operator(format!(
                "operator of {}×{} blocks (size {bs}) applied to vectors of length {} -> {}",
                self.block_rows,
                self.block_cols,
                x.len(),
                out.len()
            )));
        }

        let bs2 = bs * bs;
        for row in 0..self.block_rows {
            let y = &mut out[row * bs..(row + 1) * bs];
            for k in self.row_ptr[row]..self.row_ptr[row + 1] {
                let col = self.col_idx[k];
                let block = &self.values[k * bs2..(k + 1) * bs2];
                let xj = &x[col * bs..(col + 1) * bs];
                for (r, yr) in y.iter_mut().enumerate() {
                    let dot: Scalar = block[r * bs..(r + 1) * bs]
                        .iter()
                        .zip(xj)
                        .map(|(a, b)| a * b)
                        .sum();
                    *yr += factor * dot;
                }
            }
        }
        Ok(())
    }

    /// `out += factor * A * x` on derivative buffers of representation `T`.
    pub fn add_mult<T: DataTypes>(
        &self,
        out: &mut [T::Deriv],
        x: &[T::Deriv],
        factor: Scalar,
    ) -> FlexionResult<()> {
        if T::DERIV_DIM != self.block_size {
            return Err(FlexionError::invalid_operator(format!(
                "{} derivatives applied to operator with block size {}",
                T::name(),
                self.block_size
            )));
        }
        let dim = T::DERIV_DIM;

        let mut x_flat = vec![0.0; x.len() * dim];
        for (chunk, v) in x_flat.chunks_exact_mut(dim).zip(x) {
            T::write_deriv(v, chunk);
        }
        let mut y_flat = vec![0.0; out.len() * dim];
        self.add_mult_scalars(&mut y_flat, &x_flat, factor)?;

        for (o, chunk) in out.iter_mut().zip(y_flat.chunks_exact(dim)) {
            *o += T::read_deriv(chunk);
        }
        Ok(())
    }

    /// Expands the blocks into a scalar CSR matrix for solver consumption.
    pub fn to_csr(&self) -> FlexionResult<CsrMatrix> {
        if !self.compressed {
            return Err(FlexionError::invalid_operator("operator exported before compress"));
        }
        let bs = self.block_size;
        let mut triplets = Vec::with_capacity(self.values.len());
        for (row, col, block) in self.blocks() {
            for r in 0..bs {
                for c in 0..bs {
                    let v = block[r * bs + c];
                    if v != 0.0 {
                        triplets.push((row * bs + r, col * bs + c, v));
                    }
                }
            }
        }
        Ok(CsrMatrix::from_triplets(
            self.block_rows * bs,
            self.block_cols * bs,
            &triplets,
        ))
    }
}
