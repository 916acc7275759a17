//! Matrix representations used by the propagation pipeline.
//!
//! ## Architecture
//!
//! ```text
//!                 Matrix (capability trait)
//!                  │                     │
//!           SparseMatrix            DenseMatrix
//!   (sprs CSR, built from         (nalgebra, LU inverse,
//!   triplets): adjacency, Â       candle export)
//!                  │                     ▲
//!                  └──── to_dense() ─────┘
//! ```
//!
//! The normalizer is written against [`Matrix`] and works on either variant.
//! Only the exact propagator needs a dense inverse, and it converts explicitly
//! with [`Matrix::to_dense`].

pub mod dense;
pub mod sparse;

pub use dense::DenseMatrix;
pub use sparse::SparseMatrix;

use crate::error::Result;

/// Numeric matrix capability shared by the sparse and dense variants.
///
/// All arithmetic is `f32`. Operations return new values; matrices are never
/// mutated after construction.
pub trait Matrix: Sized {
    /// `n × n` identity.
    fn identity(n: usize) -> Self;

    /// Square diagonal matrix with `diagonal` on the main diagonal.
    fn from_diagonal(diagonal: &[f32]) -> Self;

    /// `(rows, cols)`.
    fn shape(&self) -> (usize, usize);

    /// Entry at `(row, col)`, or `None` when the coordinate is out of bounds.
    fn get(&self, row: usize, col: usize) -> Option<f32>;

    /// Materialized values: every entry for dense matrices, stored entries for sparse.
    fn stored_values(&self) -> &[f32];

    /// Sum of each row.
    fn row_sums(&self) -> Vec<f32>;

    /// Element-wise power over non-zero entries. Zeros stay zero, so a negative
    /// exponent on a diagonal matrix inverts only the diagonal.
    fn powf(&self, exponent: f32) -> Self;

    /// Element-wise sum. Shapes must match.
    fn add_matrix(&self, rhs: &Self) -> Result<Self>;

    /// Matrix product `self · rhs`. Inner dimensions must match.
    fn matmul(&self, rhs: &Self) -> Result<Self>;

    fn to_dense(&self) -> DenseMatrix;

    fn is_square(&self) -> bool {
        let (rows, cols) = self.shape();
        rows == cols
    }
}
