//! JSON feature reader.

use std::io::Read;
use std::path::{Path, PathBuf};

use serde_json::Value;

use super::{open, FeatureSource};
use crate::error::SourceError;
use crate::matrix::SparseMatrix;

/// Sparse binary features stored as a JSON object of node id → feature indices.
///
/// ```json
/// {"0": [3, 17], "1": [3], "2": []}
/// ```
///
/// Every `(node, feature)` pair becomes a `1.0` entry; a feature listed twice for
/// the same node sums to `2.0`. The matrix is `(max node id + 1) × (max feature + 1)`.
#[derive(Debug, Clone)]
pub struct FeatureJsonFile {
    path: PathBuf,
}

impl FeatureJsonFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse features from any reader.
    pub fn read_from<R: Read>(reader: R) -> Result<SparseMatrix, SourceError> {
        let value: Value = serde_json::from_reader(reader)?;
        let object = value.as_object().ok_or_else(|| SourceError::Malformed {
            record: 0,
            reason: "expected a JSON object of node id -> feature indices".to_string(),
        })?;

        let mut triplets = Vec::new();
        let mut max_node = None;
        for (position, (key, features)) in object.iter().enumerate() {
            let record = position as u64;
            let node: usize = key.trim().parse().map_err(|_| SourceError::Malformed {
                record,
                reason: format!("node id `{key}` is not a non-negative integer"),
            })?;
            max_node = max_node.max(Some(node));

            let features = features.as_array().ok_or_else(|| SourceError::Malformed {
                record,
                reason: format!("features of node {node} are not an array"),
            })?;
            for feature in features {
                triplets.push((node, parse_feature(feature, record)?, 1.0));
            }
        }

        let node_count = max_node.map(|n| n + 1).ok_or_else(|| SourceError::Malformed {
            record: 0,
            reason: "feature object is empty".to_string(),
        })?;
        let feature_count = triplets
            .iter()
            .map(|&(_, feature, _)| feature + 1)
            .max()
            .ok_or_else(|| SourceError::Malformed {
                record: 0,
                reason: "no node lists any feature".to_string(),
            })?;

        let matrix = SparseMatrix::from_triplets((node_count, feature_count), triplets)?;
        tracing::debug!(
            "Read features: {} nodes x {} features, {} stored entries",
            node_count,
            feature_count,
            matrix.nnz()
        );
        Ok(matrix)
    }
}

impl FeatureSource for FeatureJsonFile {
    fn load_features(&self) -> Result<SparseMatrix, SourceError> {
        Self::read_from(open(&self.path)?)
    }
}

/// Feature indices may be JSON integers or integer strings.
fn parse_feature(value: &Value, record: u64) -> Result<usize, SourceError> {
    let parsed = match value {
        Value::Number(n) => n.as_u64().and_then(|n| usize::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| SourceError::Malformed {
        record,
        reason: format!("feature index {value} is not a non-negative integer"),
    })
}
