//! Sparse matrix built from coordinate triplets, stored as CSR.

use nalgebra::DMatrix;
use sprs::{CsMat, TriMat};

use super::{DenseMatrix, Matrix};
use crate::error::{PropagationError, Result};

/// Compressed sparse row matrix backed by [`sprs::CsMat`].
///
/// Built from `(row, col, value)` triplets. Duplicate coordinates are summed,
/// never deduplicated, so an edge listed twice becomes a weight of `2.0`.
#[derive(Debug, Clone, PartialEq)]
pub struct SparseMatrix {
    inner: CsMat<f32>,
}

impl SparseMatrix {
    /// All-zero matrix with nothing stored.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            inner: TriMat::new((rows, cols)).to_csr(),
        }
    }

    /// Build from coordinate triplets, summing duplicates.
    pub fn from_triplets(
        shape: (usize, usize),
        triplets: impl IntoIterator<Item = (usize, usize, f32)>,
    ) -> Result<Self> {
        let (rows, cols) = shape;
        let mut coo = TriMat::new(shape);
        for (row, col, value) in triplets {
            if row >= rows || col >= cols {
                return Err(PropagationError::IndexOutOfBounds { row, col, shape });
            }
            coo.add_triplet(row, col, value);
        }
        // COO -> CSR conversion sums repeated coordinates
        Ok(Self {
            inner: coo.to_csr(),
        })
    }

    /// Number of stored entries.
    pub fn nnz(&self) -> usize {
        self.inner.nnz()
    }

    /// Stored entries of one row as `(col, value)` pairs, columns ascending.
    /// Empty when `row` is out of range.
    pub fn row_entries(&self, row: usize) -> Vec<(usize, f32)> {
        self.inner
            .outer_view(row)
            .map(|view| view.iter().map(|(col, &value)| (col, value)).collect())
            .unwrap_or_default()
    }

    fn check_same_shape(&self, rhs: &Self) -> Result<()> {
        if self.shape() != rhs.shape() {
            return Err(PropagationError::ShapeMismatch {
                expected: self.shape(),
                actual: rhs.shape(),
            });
        }
        Ok(())
    }
}

impl Matrix for SparseMatrix {
    fn identity(n: usize) -> Self {
        Self {
            inner: CsMat::eye(n),
        }
    }

    fn from_diagonal(diagonal: &[f32]) -> Self {
        let n = diagonal.len();
        let mut coo = TriMat::with_capacity((n, n), n);
        for (i, &value) in diagonal.iter().enumerate() {
            coo.add_triplet(i, i, value);
        }
        Self {
            inner: coo.to_csr(),
        }
    }

    fn shape(&self) -> (usize, usize) {
        (self.inner.rows(), self.inner.cols())
    }

    fn get(&self, row: usize, col: usize) -> Option<f32> {
        let (rows, cols) = self.shape();
        if row >= rows || col >= cols {
            return None;
        }
        Some(self.inner.get(row, col).copied().unwrap_or(0.0))
    }

    fn stored_values(&self) -> &[f32] {
        self.inner.data()
    }

    fn row_sums(&self) -> Vec<f32> {
        // Folding from +0.0: an empty f32 `sum()` is -0.0
        self.inner
            .outer_iterator()
            .map(|row| row.iter().fold(0.0_f32, |acc, (_, &value)| acc + value))
            .collect()
    }

    fn powf(&self, exponent: f32) -> Self {
        Self {
            inner: self
                .inner
                .map(|&v| if v != 0.0 { v.powf(exponent) } else { 0.0 }),
        }
    }

    fn add_matrix(&self, rhs: &Self) -> Result<Self> {
        self.check_same_shape(rhs)?;
        Ok(Self {
            inner: &self.inner + &rhs.inner,
        })
    }

    fn matmul(&self, rhs: &Self) -> Result<Self> {
        if self.inner.cols() != rhs.inner.rows() {
            return Err(PropagationError::ShapeMismatch {
                expected: (self.inner.cols(), rhs.inner.cols()),
                actual: rhs.shape(),
            });
        }
        Ok(Self {
            inner: &self.inner * &rhs.inner,
        })
    }

    fn to_dense(&self) -> DenseMatrix {
        let (rows, cols) = self.shape();
        let mut dense = DMatrix::zeros(rows, cols);
        for (row, entries) in self.inner.outer_iterator().enumerate() {
            for (col, &value) in entries.iter() {
                dense[(row, col)] = value;
            }
        }
        DenseMatrix::from_nalgebra(dense)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_triplets_sums_duplicates() {
        let m = SparseMatrix::from_triplets((2, 2), vec![(0, 1, 1.0), (0, 1, 1.0), (1, 0, 1.0)])
            .unwrap();
        assert_eq!(m.nnz(), 2);
        assert_eq!(m.get(0, 1), Some(2.0));
        assert_eq!(m.get(1, 0), Some(1.0));
        assert_eq!(m.get(0, 0), Some(0.0));
    }

    #[test]
    fn test_from_triplets_out_of_bounds() {
        let err = SparseMatrix::from_triplets((2, 2), vec![(0, 2, 1.0)]).unwrap_err();
        assert_eq!(
            err,
            PropagationError::IndexOutOfBounds {
                row: 0,
                col: 2,
                shape: (2, 2)
            }
        );
    }

    #[test]
    fn test_get_out_of_bounds_is_none() {
        let m = SparseMatrix::identity(3);
        assert_eq!(m.get(3, 0), None);
        assert_eq!(m.get(0, 3), None);
        assert_eq!(m.get(2, 2), Some(1.0));
    }

    #[test]
    fn test_empty_rows_in_csr() {
        // Rows 0 and 2 empty, row 1 has one entry, row 3 empty
        let m = SparseMatrix::from_triplets((4, 4), vec![(1, 3, 5.0)]).unwrap();
        assert_eq!(m.row_sums(), vec![0.0, 5.0, 0.0, 0.0]);
        assert_eq!(m.row_entries(1), vec![(3, 5.0)]);
        assert!(m.row_entries(0).is_empty());
        assert!(m.row_entries(9).is_empty());
    }

    #[test]
    fn test_empty_row_sums_are_positive_zero() {
        let m = SparseMatrix::from_triplets((3, 3), vec![(0, 1, 1.0)]).unwrap();
        let sums = m.row_sums();
        assert!(sums[1] == 0.0 && sums[1].is_sign_positive());
        assert!(sums[2].is_sign_positive());
        assert!(SparseMatrix::zeros(2, 2)
            .row_sums()
            .iter()
            .all(|d| d.is_sign_positive()));
    }

    #[test]
    fn test_add_matrix() {
        let a = SparseMatrix::from_triplets((2, 2), vec![(0, 1, 1.0), (1, 0, 1.0)]).unwrap();
        let sum = a.add_matrix(&SparseMatrix::identity(2)).unwrap();
        assert_eq!(sum.nnz(), 4);
        assert_eq!(sum.row_sums(), vec![2.0, 2.0]);
    }

    #[test]
    fn test_add_matrix_shape_mismatch() {
        let a = SparseMatrix::zeros(2, 2);
        let err = a.add_matrix(&SparseMatrix::identity(3)).unwrap_err();
        assert!(matches!(err, PropagationError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_powf_skips_zeros() {
        let d = SparseMatrix::from_diagonal(&[4.0, 0.0, 1.0]);
        let inv_sqrt = d.powf(-0.5);
        assert_eq!(inv_sqrt.get(0, 0), Some(0.5));
        assert_eq!(inv_sqrt.get(1, 1), Some(0.0));
        assert_eq!(inv_sqrt.get(2, 2), Some(1.0));
        assert!(inv_sqrt.stored_values().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_matmul_matches_dense() {
        let a = SparseMatrix::from_triplets(
            (2, 3),
            vec![(0, 0, 1.0), (0, 2, 2.0), (1, 1, 3.0)],
        )
        .unwrap();
        let b = SparseMatrix::from_triplets((3, 2), vec![(0, 1, 4.0), (1, 0, 5.0), (2, 0, 6.0)])
            .unwrap();

        let product = a.matmul(&b).unwrap();
        assert_eq!(product.shape(), (2, 2));
        // [1 0 2] · B = [12, 4]; [0 3 0] · B = [15, 0]
        assert_eq!(product.get(0, 0), Some(12.0));
        assert_eq!(product.get(0, 1), Some(4.0));
        assert_eq!(product.get(1, 0), Some(15.0));
        assert_eq!(product.get(1, 1), Some(0.0));

        let dense = a.to_dense().matmul(&b.to_dense()).unwrap();
        assert!(product.to_dense().approx_eq(&dense, 0.0));
    }

    #[test]
    fn test_matmul_inner_dimension_mismatch() {
        let a = SparseMatrix::zeros(2, 3);
        let b = SparseMatrix::zeros(2, 3);
        assert!(matches!(
            a.matmul(&b),
            Err(PropagationError::ShapeMismatch { .. })
        ));
    }
}
