//! Error types for propagator construction and for the data sources feeding it.
//!
//! [`PropagationError`] covers every deterministic precondition of the core
//! pipeline. None of them are retryable: a failing call fails for good with the
//! same inputs. [`SourceError`] covers the readers in [`crate::io`].

use std::path::PathBuf;

/// Failure of the adjacency → normalization → propagator pipeline.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PropagationError {
    /// Negative node ids, or an edge endpoint outside the declared node range.
    #[error("invalid graph: {0}")]
    InvalidGraph(String),

    /// Two matrices that must agree in shape do not.
    #[error("shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    /// A coordinate entry falls outside the matrix it is inserted into.
    #[error("index ({row}, {col}) out of bounds for matrix of shape {shape:?}")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        shape: (usize, usize),
    },

    /// A degree is zero, negative or non-finite going into `D^(-1/2)`.
    #[error("degenerate matrix: {0}")]
    DegenerateMatrix(String),

    /// The exact-mode inversion target is not invertible within tolerance.
    #[error("singular matrix: {0}")]
    SingularMatrix(String),

    /// `alpha` outside `(0, 1]`, or an unrecognized mode string.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

pub type Result<T> = std::result::Result<T, PropagationError>;

/// Failure while loading a graph, feature matrix or target vector.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Structurally valid input whose content cannot be interpreted.
    #[error("malformed input at record {record}: {reason}")]
    Malformed { record: u64, reason: String },

    #[error("missing column `{0}`")]
    MissingColumn(String),

    #[error(transparent)]
    Graph(#[from] PropagationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = PropagationError::InvalidParameter {
            name: "alpha",
            reason: "must be in (0, 1], got 0".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid parameter `alpha`: must be in (0, 1], got 0"
        );

        let err = PropagationError::ShapeMismatch {
            expected: (3, 3),
            actual: (2, 2),
        };
        assert_eq!(
            err.to_string(),
            "shape mismatch: expected (3, 3), got (2, 2)"
        );
    }

    #[test]
    fn test_source_error_wraps_graph_error() {
        let err: SourceError = PropagationError::InvalidGraph("negative node id -1".into()).into();
        assert!(matches!(err, SourceError::Graph(PropagationError::InvalidGraph(_))));
        assert_eq!(err.to_string(), "invalid graph: negative node id -1");
    }
}
