//! CSV edge list reader.

use std::io::Read;
use std::path::{Path, PathBuf};

use super::{open, record_line, GraphSource};
use crate::error::SourceError;
use crate::propagation::Graph;

/// Edge list stored as CSV: a header row, then one `source,target` pair per line.
///
/// Extra columns are ignored. Self-loops are dropped. With `undirected`, each
/// distinct pair is emitted once in both directions, so listing `(0, 1)` and
/// `(1, 0)` is the same as listing either.
#[derive(Debug, Clone)]
pub struct EdgeListFile {
    path: PathBuf,
    undirected: bool,
}

impl EdgeListFile {
    pub fn new(path: impl Into<PathBuf>, undirected: bool) -> Self {
        Self {
            path: path.into(),
            undirected,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse an edge list from any reader.
    pub fn read_from<R: Read>(reader: R, undirected: bool) -> Result<Graph, SourceError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut edges = Vec::new();
        for (index, record) in rdr.records().enumerate() {
            let record = record?;
            let line = record_line(&record, index);
            if record.len() < 2 {
                return Err(SourceError::Malformed {
                    record: line,
                    reason: format!("expected two endpoint columns, found {}", record.len()),
                });
            }
            edges.push((
                parse_node(&record[0], line)?,
                parse_node(&record[1], line)?,
            ));
        }

        let graph = Graph::from_edges(edges)?;
        tracing::debug!(
            "Read {} edges over {} nodes ({} self-loops dropped)",
            graph.edge_count(),
            graph.node_count(),
            graph.self_loops_removed()
        );

        Ok(if undirected {
            graph.to_undirected()
        } else {
            graph
        })
    }
}

impl GraphSource for EdgeListFile {
    fn load_graph(&self) -> Result<Graph, SourceError> {
        Self::read_from(open(&self.path)?, self.undirected)
    }
}

fn parse_node(field: &str, line: u64) -> Result<i64, SourceError> {
    field.parse().map_err(|_| SourceError::Malformed {
        record: line,
        reason: format!("node id `{field}` is not an integer"),
    })
}
