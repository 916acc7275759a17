//! Data sources feeding the propagation pipeline and the downstream model.
//!
//! Each source is a trait so callers can plug in other backing stores; the
//! file-backed implementations read the formats the pipeline is usually fed:
//!
//! - [`EdgeListFile`] — CSV with a header row, first two columns are endpoints
//! - [`FeatureJsonFile`] — `{"node": [feature, ...], ...}`
//! - [`TargetCsvFile`] — CSV with a named numeric target column
//!
//! All I/O happens here, before the core runs.

pub mod edges;
pub mod features;
pub mod target;

pub use edges::EdgeListFile;
pub use features::FeatureJsonFile;
pub use target::TargetCsvFile;

use std::fs::File;
use std::path::Path;

use crate::error::SourceError;
use crate::matrix::SparseMatrix;
use crate::propagation::Graph;

/// Supplies the graph a propagator is built from.
pub trait GraphSource {
    fn load_graph(&self) -> Result<Graph, SourceError>;
}

/// Supplies a sparse `nodes × features` matrix of unit entries.
pub trait FeatureSource {
    fn load_features(&self) -> Result<SparseMatrix, SourceError>;
}

/// Supplies one numeric label per node, in node order.
pub trait TargetSource {
    fn load_target(&self) -> Result<Vec<f64>, SourceError>;
}

fn open(path: &Path) -> Result<File, SourceError> {
    File::open(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Line number of a CSV record, falling back to its ordinal (+1 for the header).
fn record_line(record: &csv::StringRecord, index: usize) -> u64 {
    record
        .position()
        .map_or(index as u64 + 2, |position| position.line())
}
