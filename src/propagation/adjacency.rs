//! Graph → sparse adjacency matrix.

use super::models::Graph;
use crate::error::Result;
use crate::matrix::SparseMatrix;

/// Build the `N × N` adjacency matrix with `A[i, j] = 1` per edge `(i, j)`.
///
/// Edges are placed as given, without adding the reverse direction. A repeated
/// edge accumulates, so listing `(0, 1)` twice yields `A[0, 1] = 2`. This mirrors
/// naive coordinate construction and is kept deliberately; collapse the graph
/// with [`Graph::to_undirected`] first for unit weights.
pub fn build_adjacency(graph: &Graph) -> Result<SparseMatrix> {
    let n = graph.node_count();
    let adjacency = SparseMatrix::from_triplets(
        (n, n),
        graph.edges().map(|(source, target)| (source, target, 1.0)),
    )?;

    tracing::debug!(
        "Built adjacency: {}x{}, {} edges, {} stored entries",
        n,
        n,
        graph.edge_count(),
        adjacency.nnz()
    );
    Ok(adjacency)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::Matrix;

    #[test]
    fn test_shape_and_entries() {
        let g = Graph::from_edges(vec![(0, 1), (1, 0), (1, 2), (2, 1)]).unwrap();
        let a = build_adjacency(&g).unwrap();
        assert_eq!(a.shape(), (3, 3));
        assert_eq!(a.nnz(), 4);
        assert_eq!(a.get(0, 1), Some(1.0));
        assert_eq!(a.get(0, 2), Some(0.0));
        assert_eq!(a.row_sums(), vec![1.0, 2.0, 1.0]);
    }

    #[test]
    fn test_directional_placement() {
        let g = Graph::from_edges(vec![(0, 1)]).unwrap();
        let a = build_adjacency(&g).unwrap();
        assert_eq!(a.get(0, 1), Some(1.0));
        assert_eq!(a.get(1, 0), Some(0.0));
    }

    #[test]
    fn test_duplicate_edges_accumulate() {
        let g = Graph::from_edges(vec![(0, 1), (0, 1)]).unwrap();
        let a = build_adjacency(&g).unwrap();
        assert_eq!(a.get(0, 1), Some(2.0));
    }

    #[test]
    fn test_stripped_loop_does_not_widen_matrix() {
        let g = Graph::from_edges(vec![(0, 1), (1, 0), (2, 2)]).unwrap();
        let a = build_adjacency(&g).unwrap();
        assert_eq!(a.shape(), (2, 2));
        assert_eq!(a.row_sums(), vec![1.0, 1.0]);
    }

    #[test]
    fn test_empty_graph_is_1x1_zero() {
        let g = Graph::from_edges(Vec::new()).unwrap();
        let a = build_adjacency(&g).unwrap();
        assert_eq!(a.shape(), (1, 1));
        assert_eq!(a.nnz(), 0);
        assert_eq!(a.get(0, 0), Some(0.0));
    }
}
