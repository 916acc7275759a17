//! Self-loop augmentation and symmetric degree normalization.
//!
//! `Â = D^(-1/2) · (A + I) · D^(-1/2)` where `D` holds the row sums of `A + I`.
//! The result is symmetric whenever `A` is.

use crate::error::{PropagationError, Result};
use crate::matrix::Matrix;

/// Normalize adjacency `a` against the identity `identity` of the same shape.
///
/// Works on either matrix variant. Fails with
/// - [`PropagationError::ShapeMismatch`] if `a` is not square or `identity` differs in shape,
/// - [`PropagationError::DegenerateMatrix`] if `a` holds negative or non-finite
///   entries, or a degree of `A + I` is not strictly positive.
pub fn normalize_adjacency<M: Matrix>(a: &M, identity: &M) -> Result<M> {
    let (rows, cols) = a.shape();
    if rows != cols {
        return Err(PropagationError::ShapeMismatch {
            expected: (rows, rows),
            actual: (rows, cols),
        });
    }
    if identity.shape() != a.shape() {
        return Err(PropagationError::ShapeMismatch {
            expected: a.shape(),
            actual: identity.shape(),
        });
    }
    if let Some(bad) = a
        .stored_values()
        .iter()
        .find(|v| !v.is_finite() || **v < 0.0)
    {
        return Err(PropagationError::DegenerateMatrix(format!(
            "adjacency entries must be finite and non-negative, found {bad}"
        )));
    }

    let a_tilde = a.add_matrix(identity)?;
    let degrees = a_tilde.row_sums();
    if let Some((node, degree)) = degrees
        .iter()
        .enumerate()
        .find(|(_, d)| !d.is_finite() || **d <= 0.0)
    {
        return Err(PropagationError::DegenerateMatrix(format!(
            "node {node} has degree {degree}"
        )));
    }

    let d_inv_sqrt = M::from_diagonal(&degrees).powf(-0.5);
    let normalized = d_inv_sqrt.matmul(&a_tilde)?.matmul(&d_inv_sqrt)?;

    tracing::debug!(
        "Normalized {}x{} adjacency, degree range [{}, {}]",
        rows,
        cols,
        degrees.iter().copied().fold(f32::INFINITY, f32::min),
        degrees.iter().copied().fold(f32::NEG_INFINITY, f32::max)
    );
    Ok(normalized)
}
