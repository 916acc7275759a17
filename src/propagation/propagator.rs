//! Propagator construction: the single entry point of the pipeline.

use candle_core::{Device, Tensor};
use serde::Serialize;

use super::adjacency::build_adjacency;
use super::models::Graph;
use super::normalize::normalize_adjacency;
use crate::config::{PropagationConfig, PropagationMode};
use crate::error::Result;
use crate::matrix::{DenseMatrix, Matrix, SparseMatrix};

/// Final `N × N` propagation matrix, in the node order of the input graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Propagator {
    mode: PropagationMode,
    alpha: f32,
    matrix: DenseMatrix,
}

impl Propagator {
    pub fn mode(&self) -> PropagationMode {
        self.mode
    }

    /// The `alpha` the propagator was requested with. Approximate propagators
    /// carry it for reference only.
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn matrix(&self) -> &DenseMatrix {
        &self.matrix
    }

    /// Number of nodes.
    pub fn dimension(&self) -> usize {
        self.matrix.shape().0
    }

    /// Export for a candle-based downstream model.
    pub fn to_tensor(&self, device: &Device) -> candle_core::Result<Tensor> {
        self.matrix.to_tensor(device)
    }
}

/// Build `Â = D^(-1/2) (A + I) D^(-1/2)` for a graph.
pub fn normalized_adjacency(graph: &Graph) -> Result<SparseMatrix> {
    let adjacency = build_adjacency(graph)?;
    let identity = SparseMatrix::identity(adjacency.shape().0);
    normalize_adjacency(&adjacency, &identity)
}

/// Compute the propagator for `graph` under `config`.
///
/// - [`PropagationMode::Exact`]: `α · (I − (1 − α) · Â)^(−1)`. Fails with
///   [`crate::PropagationError::SingularMatrix`] if the system cannot be inverted;
///   there is no fallback to the approximate form.
/// - [`PropagationMode::Approximate`]: `Â` densified. `α` has no effect.
pub fn compute_propagator(graph: &Graph, config: &PropagationConfig) -> Result<Propagator> {
    let a_hat = normalized_adjacency(graph)?;

    let matrix = match config.mode() {
        PropagationMode::Exact => exact_propagator(&a_hat, config.alpha())?,
        PropagationMode::Approximate => a_hat.to_dense(),
    };

    tracing::debug!(
        "Computed {} propagator for {} nodes (alpha = {})",
        config.mode(),
        matrix.shape().0,
        config.alpha()
    );

    Ok(Propagator {
        mode: config.mode(),
        alpha: config.alpha(),
        matrix,
    })
}

/// `α · (I − (1 − α) · Â)^(−1)`. At `α = 1` the system is `I` and so is the result.
fn exact_propagator(a_hat: &SparseMatrix, alpha: f32) -> Result<DenseMatrix> {
    let a_hat = a_hat.to_dense();
    let identity = DenseMatrix::identity(a_hat.shape().0);
    let system = identity.subtract(&a_hat.scale(1.0 - alpha))?;
    Ok(system.inverse()?.scale(alpha))
}
