//! Propagator construction pipeline.
//!
//! Turns a graph into the fixed propagation matrix consumed by a personalized
//! propagation model.
//!
//! ## Architecture
//!
//! ```text
//! Graph ──► adjacency ──► A (sparse)
//!                          │
//!                      normalize (+ I)
//!                          │
//!                          Â = D^(-1/2)(A + I)D^(-1/2)
//!                          │
//!                      propagator (+ alpha, mode)
//!                          │
//!              Exact: α(I − (1 − α)Â)^(−1)   Approximate: Â
//! ```
//!
//! ## Modules
//!
//! - [`models`] — `Graph` input type
//! - [`adjacency`] — edge list → sparse adjacency
//! - [`normalize`] — self-loops and symmetric degree normalization
//! - [`propagator`] — `compute_propagator` entry point and `Propagator` output
//!
//! Every call is a pure function of its inputs. Nothing is cached or shared, so
//! independent calls may run on separate threads.

pub mod adjacency;
pub mod models;
pub mod normalize;
pub mod propagator;

pub use adjacency::build_adjacency;
pub use models::Graph;
pub use normalize::normalize_adjacency;
pub use propagator::{compute_propagator, normalized_adjacency, Propagator};
