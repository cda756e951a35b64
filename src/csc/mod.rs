#[cfg(test)]
mod tests;

use ndarray::{s, Array1, ArrayView1};

use crate::error::{ReadSparseError, Result};
use crate::extent::ExtentTracker;
use crate::row::FinalizedRow;

/// A compressed-sparse-column matrix assembled from one parse run.
///
/// Orientation: each output column is one input line, and the output row
/// indices are the column indices parsed from the input, so the matrix is
/// the CSC form of the transpose of the logical input. Consumers of the
/// legacy format rely on this and it is preserved as-is.
///
/// Invariants: `col_ptr[0] == 0`, `col_ptr` is non-decreasing and
/// `col_ptr[n_cols] == nnz`.
#[derive(Debug, Clone, PartialEq)]
pub struct CscMatrix {
    n_rows: usize,
    n_cols: usize,
    col_ptr: Array1<usize>,
    row_idx: Array1<usize>,
    values: Array1<f64>,
}

impl CscMatrix {
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    pub fn col_ptr(&self) -> ArrayView1<usize> {
        self.col_ptr.view()
    }

    pub fn row_idx(&self) -> ArrayView1<usize> {
        self.row_idx.view()
    }

    pub fn values(&self) -> ArrayView1<f64> {
        self.values.view()
    }

    /// Borrowed view over the three CSC arrays.
    pub fn view(&self) -> CscView<'_> {
        CscView::new(self.values.view(), self.row_idx.view(), self.col_ptr.view())
    }

    /// The `(row indices, values)` slice of column `j`.
    pub fn col(&self, j: usize) -> (ArrayView1<usize>, ArrayView1<f64>) {
        let start = self.col_ptr[j];
        let end = self.col_ptr[j + 1];
        (
            self.row_idx.slice(s![start..end]),
            self.values.slice(s![start..end]),
        )
    }
}

/// Borrowed CSC triple, the shape downstream numeric code consumes.
#[derive(Debug, Clone, PartialEq)]
pub struct CscView<'a> {
    pub data: ArrayView1<'a, f64>,
    pub indices: ArrayView1<'a, usize>,
    pub indptr: ArrayView1<'a, usize>,
}

impl<'a> CscView<'a> {
    pub fn new(
        data: ArrayView1<'a, f64>,
        indices: ArrayView1<'a, usize>,
        indptr: ArrayView1<'a, usize>,
    ) -> CscView<'a> {
        CscView {
            data,
            indices,
            indptr,
        }
    }
}

/// Single ordered pass turning finalized rows into the CSC arrays.
///
/// `rows.len()` must match the extent's row count, and the final write
/// offset must land exactly on the extent's nonzero count; otherwise no
/// matrix is emitted. The index and value arrays are preallocated to the
/// tracked nonzero count exactly.
pub fn assemble(rows: Vec<FinalizedRow>, extent: &ExtentTracker) -> Result<CscMatrix> {
    if rows.len() != extent.rows_read() {
        return Err(ReadSparseError::RowCountMismatch {
            rows: rows.len(),
            tracked: extent.rows_read(),
        });
    }

    let nnz = extent.total_nonzeros();
    let mut col_ptr: Vec<usize> = Vec::new();
    col_ptr.try_reserve_exact(rows.len() + 1)?;
    let mut row_idx: Vec<usize> = Vec::new();
    row_idx.try_reserve_exact(nnz)?;
    let mut values: Vec<f64> = Vec::new();
    values.try_reserve_exact(nnz)?;

    let mut offset = 0;
    for row in &rows {
        col_ptr.push(offset);
        if offset + row.len() > nnz {
            return Err(ReadSparseError::AssemblyInconsistency {
                expected: nnz,
                actual: offset + row.len(),
            });
        }
        for entry in row.entries() {
            row_idx.push(entry.column);
            values.push(entry.value);
        }
        offset += row.len();
    }
    col_ptr.push(offset);

    if offset != nnz {
        return Err(ReadSparseError::AssemblyInconsistency {
            expected: nnz,
            actual: offset,
        });
    }

    Ok(CscMatrix {
        n_rows: extent.final_column_count(),
        n_cols: rows.len(),
        col_ptr: Array1::from_vec(col_ptr),
        row_idx: Array1::from_vec(row_idx),
        values: Array1::from_vec(values),
    })
}
