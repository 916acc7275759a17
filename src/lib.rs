//! Graph Propagator
//!
//! Precomputes the propagation matrix of a personalized-propagation graph model:
//! - Sparse adjacency construction from an edge list
//! - Self-loop augmentation and symmetric degree normalization
//! - Exact propagator `α(I − (1 − α)Â)^(−1)` or approximate propagator `Â`
//! - CSV / JSON readers for edges, features and targets
//! - Export to candle tensors for the downstream model
//!
//! ```no_run
//! use graph_propagator::{compute_propagator, Graph, PropagationConfig};
//!
//! let graph = Graph::from_edges(vec![(0, 1), (1, 0), (1, 2), (2, 1)])?;
//! let propagator = compute_propagator(&graph, &PropagationConfig::exact(0.1)?)?;
//! assert_eq!(propagator.dimension(), 3);
//! # Ok::<(), graph_propagator::PropagationError>(())
//! ```

pub mod config;
pub mod error;
pub mod io;
pub mod matrix;
pub mod propagation;
pub mod report;

pub use config::{PropagationConfig, PropagationMode, RunConfig};
pub use error::{PropagationError, SourceError};
pub use matrix::{DenseMatrix, Matrix, SparseMatrix};
pub use propagation::{compute_propagator, Graph, Propagator};
