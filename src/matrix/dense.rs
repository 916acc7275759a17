//! Dense matrix.
//!
//! Used for the propagator output and for the exact-mode inverse, which has no
//! sparse counterpart: `(I − (1 − α)·Â)^(−1)` is dense for any connected graph.

use candle_core::{Device, Tensor};
use nalgebra::{DMatrix, DVector};
use serde::{Serialize, Serializer};

use super::Matrix;
use crate::error::{PropagationError, Result};

/// Condition numbers beyond this make an `f32` inverse meaningless.
pub const MAX_CONDITION_NUMBER: f64 = 1.0 / f32::EPSILON as f64;

/// Fully materialized `rows × cols` matrix backed by [`nalgebra::DMatrix`].
#[derive(Debug, Clone, PartialEq)]
pub struct DenseMatrix {
    data: DMatrix<f32>,
}

impl DenseMatrix {
    /// Wrap row-major `data`. Its length must be `rows * cols`.
    pub fn new(rows: usize, cols: usize, data: Vec<f32>) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(PropagationError::ShapeMismatch {
                expected: (rows, cols),
                actual: (data.len() / cols.max(1), cols),
            });
        }
        Ok(Self {
            data: DMatrix::from_row_slice(rows, cols, &data),
        })
    }

    pub(crate) fn from_nalgebra(data: DMatrix<f32>) -> Self {
        Self { data }
    }

    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self::from_nalgebra(DMatrix::zeros(rows, cols))
    }

    /// Row `i`. Panics if `i >= rows`.
    pub fn row(&self, i: usize) -> Vec<f32> {
        self.data.row(i).iter().copied().collect()
    }

    /// Every entry, in storage (column-major) order.
    pub fn as_slice(&self) -> &[f32] {
        self.data.as_slice()
    }

    /// Every entry, row by row.
    pub fn to_row_major(&self) -> Vec<f32> {
        self.data.transpose().as_slice().to_vec()
    }

    /// Sum of the main diagonal.
    pub fn trace(&self) -> f32 {
        let (rows, cols) = self.shape();
        (0..rows.min(cols)).fold(0.0, |acc, i| acc + self.data[(i, i)])
    }

    /// Multiply every entry by `factor`.
    pub fn scale(&self, factor: f32) -> Self {
        Self::from_nalgebra(self.data.map(|v| v * factor))
    }

    /// Element-wise `self − rhs`.
    pub fn subtract(&self, rhs: &Self) -> Result<Self> {
        self.check_same_shape(rhs)?;
        Ok(Self::from_nalgebra(&self.data - &rhs.data))
    }

    pub fn transpose(&self) -> Self {
        Self::from_nalgebra(self.data.transpose())
    }

    /// Same shape and every entry within `tolerance`.
    pub fn approx_eq(&self, other: &Self, tolerance: f32) -> bool {
        self.shape() == other.shape()
            && self
                .data
                .iter()
                .zip(other.data.iter())
                .all(|(a, b)| (a - b).abs() <= tolerance)
    }

    pub fn is_symmetric(&self, tolerance: f32) -> bool {
        self.is_square() && self.approx_eq(&self.transpose(), tolerance)
    }

    /// Inverse through an LU factorization with partial pivoting.
    ///
    /// The factorization runs in `f64`. Fails with
    /// [`PropagationError::SingularMatrix`] when a pivot of `U` vanishes relative
    /// to the largest entry, or when `‖M‖₁ · ‖M⁻¹‖₁` exceeds [`MAX_CONDITION_NUMBER`].
    pub fn inverse(&self) -> Result<Self> {
        let (rows, cols) = self.shape();
        if rows != cols {
            return Err(PropagationError::ShapeMismatch {
                expected: (rows, rows),
                actual: (rows, cols),
            });
        }
        let n = rows;
        if n == 0 {
            return Ok(Self::zeros(0, 0));
        }

        let system: DMatrix<f64> = self.data.map(f64::from);
        if system.iter().any(|v| !v.is_finite()) {
            return Err(PropagationError::SingularMatrix(format!(
                "{n}x{n} matrix has non-finite entries"
            )));
        }
        let max_abs = system.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
        if max_abs == 0.0 {
            return Err(PropagationError::SingularMatrix(format!(
                "{n}x{n} matrix is all zeros"
            )));
        }
        let pivot_tolerance = n as f64 * f64::from(f32::EPSILON) * max_abs;

        let lu = system.clone().lu();
        if let Some((col, pivot)) = lu
            .u()
            .diagonal()
            .iter()
            .enumerate()
            .find(|(_, pivot)| pivot.abs() <= pivot_tolerance)
        {
            return Err(PropagationError::SingularMatrix(format!(
                "pivot {pivot:e} in column {col} is below tolerance {pivot_tolerance:e}"
            )));
        }
        let inverse = lu.try_inverse().ok_or_else(|| {
            PropagationError::SingularMatrix(format!("{n}x{n} LU factors are not invertible"))
        })?;

        let condition = norm_one(&system) * norm_one(&inverse);
        if !condition.is_finite() || condition > MAX_CONDITION_NUMBER {
            return Err(PropagationError::SingularMatrix(format!(
                "condition number {condition:e} exceeds {MAX_CONDITION_NUMBER:e}"
            )));
        }

        Ok(Self::from_nalgebra(inverse.map(|v| v as f32)))
    }

    /// Export as a `[rows, cols]` `f32` tensor for candle-based models.
    pub fn to_tensor(&self, device: &Device) -> candle_core::Result<Tensor> {
        Tensor::from_vec(self.to_row_major(), self.shape(), device)
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

/// Maximum absolute column sum.
fn norm_one(m: &DMatrix<f64>) -> f64 {
    m.column_iter()
        .map(|col| col.iter().map(|v| v.abs()).sum::<f64>())
        .fold(0.0_f64, f64::max)
}

/// Written as `{ rows, cols, data }` with `data` row-major.
impl Serialize for DenseMatrix {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct RowMajor {
            rows: usize,
            cols: usize,
            data: Vec<f32>,
        }

        let (rows, cols) = self.shape();
        RowMajor {
            rows,
            cols,
            data: self.to_row_major(),
        }
        .serialize(serializer)
    }
}

impl Matrix for DenseMatrix {
    fn identity(n: usize) -> Self {
        Self::from_nalgebra(DMatrix::identity(n, n))
    }

    fn from_diagonal(diagonal: &[f32]) -> Self {
        Self::from_nalgebra(DMatrix::from_diagonal(&DVector::from_column_slice(diagonal)))
    }

    fn shape(&self) -> (usize, usize) {
        self.data.shape()
    }

    fn get(&self, row: usize, col: usize) -> Option<f32> {
        self.data.get((row, col)).copied()
    }

    fn stored_values(&self) -> &[f32] {
        self.data.as_slice()
    }

    fn row_sums(&self) -> Vec<f32> {
        // Folding from +0.0: an empty f32 `sum()` is -0.0
        self.data
            .row_iter()
            .map(|row| row.iter().fold(0.0_f32, |acc, &v| acc + v))
            .collect()
    }

    fn powf(&self, exponent: f32) -> Self {
        Self::from_nalgebra(
            self.data
                .map(|v| if v != 0.0 { v.powf(exponent) } else { 0.0 }),
        )
    }

    fn add_matrix(&self, rhs: &Self) -> Result<Self> {
        self.check_same_shape(rhs)?;
        Ok(Self::from_nalgebra(&self.data + &rhs.data))
    }

    fn matmul(&self, rhs: &Self) -> Result<Self> {
        let (_, cols) = self.shape();
        let (rhs_rows, rhs_cols) = rhs.shape();
        if cols != rhs_rows {
            return Err(PropagationError::ShapeMismatch {
                expected: (cols, rhs_cols),
                actual: rhs.shape(),
            });
        }
        Ok(Self::from_nalgebra(&self.data * &rhs.data))
    }

    fn to_dense(&self) -> DenseMatrix {
        self.clone()
    }
}
