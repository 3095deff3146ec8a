//! Scalar sparse matrices.
//!
//! Block operators are exported to [`CsrMatrix`] when an external
//! linear solver or constraint stage needs scalar entries.

use flexion_types::Scalar;
use serde::{Deserialize, Serialize};

/// Compressed Sparse Row (CSR) matrix.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsrMatrix {
    /// Number of rows.
    pub rows: usize,
    /// Number of columns.
    pub cols: usize,
    /// Row pointer array (length = rows + 1).
    /// `row_ptr[i]..row_ptr[i+1]` are the indices into `col_idx` and `values`
    /// for non-zeros in row `i`.
    pub row_ptr: Vec<usize>,
    /// Column indices of non-zero entries, increasing within each row.
    pub col_idx: Vec<usize>,
    /// Non-zero values.
    pub values: Vec<Scalar>,
}

impl CsrMatrix {
    /// Creates an empty CSR matrix with the given dimensions.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            row_ptr: vec![0; rows + 1],
            col_idx: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Returns the number of stored entries.
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Creates a CSR matrix from `(row, col, value)` triplets.
    ///
    /// Duplicate entries are summed.
    pub fn from_triplets(rows: usize, cols: usize, triplets: &[(usize, usize, Scalar)]) -> Self {
        let mut sorted = triplets.to_vec();
        sorted.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));

        let mut row_ptr = vec![0usize; rows + 1];
        let mut col_idx: Vec<usize> = Vec::with_capacity(sorted.len());
        let mut values: Vec<Scalar> = Vec::with_capacity(sorted.len());
        let mut last: Option<(usize, usize)> = None;

        for (r, c, v) in sorted {
            if last == Some((r, c)) {
                if let Some(acc) = values.last_mut() {
                    *acc += v;
                }
                continue;
            }
            col_idx.push(c);
            values.push(v);
            row_ptr[r + 1] += 1;
            last = Some((r, c));
        }

        for i in 0..rows {
            row_ptr[i + 1] += row_ptr[i];
        }

        Self {
            rows,
            cols,
            row_ptr,
            col_idx,
            values,
        }
    }

    /// Value at `(row, col)`, zero when not stored.
    pub fn get(&self, row: usize, col: usize) -> Scalar {
        if row >= self.rows {
            return 0.0;
        }
        let range = self.row_ptr[row]..self.row_ptr[row + 1];
        self.col_idx[range.clone()]
            .binary_search(&col)
            .map(|k| self.values[range.start + k])
            .unwrap_or(0.0)
    }

    /// `y = A * x`.
    pub fn mul_vec(&self, x: &[Scalar]) -> Vec<Scalar> {
        (0..self.rows)
            .map(|row| {
                (self.row_ptr[row]..self.row_ptr[row + 1])
                    .map(|k| self.values[k] * x[self.col_idx[k]])
                    .sum()
            })
            .collect()
    }
}
