//! Graph input model.
//!
//! A [`Graph`] is an edge list over contiguous node ids `0..N`, held in a
//! `petgraph::DiGraph` so that node indices and edge insertion order are stable.
//! Edges are kept exactly as given: an undirected graph must list both
//! directions (see [`Graph::to_undirected`]), and a repeated edge stays repeated.

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::BTreeSet;

use crate::error::{PropagationError, Result};

/// Simple graph over node ids `0..node_count()`, self-loops stripped.
#[derive(Debug, Clone)]
pub struct Graph {
    graph: DiGraph<(), ()>,
    self_loops_removed: usize,
}

impl Graph {
    /// Build from raw endpoint pairs.
    ///
    /// Negative ids are rejected and self-loops are dropped. The node count is
    /// `max id + 1` over the edges that remain, and at least 1 so that an empty
    /// (or loop-only) edge list still describes a single isolated node.
    pub fn from_edges(edges: impl IntoIterator<Item = (i64, i64)>) -> Result<Self> {
        let edges = validate_endpoints(edges)?;
        let node_count = edges
            .iter()
            .filter(|&&(source, target)| source != target)
            .map(|&(source, target)| source.max(target) + 1)
            .max()
            .unwrap_or(1);
        Ok(Self::assemble(node_count, edges))
    }

    /// Build with a declared node count. Every endpoint must be `< node_count`.
    pub fn with_node_count(
        node_count: usize,
        edges: impl IntoIterator<Item = (i64, i64)>,
    ) -> Result<Self> {
        if node_count == 0 {
            return Err(PropagationError::InvalidGraph(
                "a graph needs at least one node".to_string(),
            ));
        }
        let edges = validate_endpoints(edges)?;
        if let Some(&(source, target)) = edges
            .iter()
            .find(|&&(source, target)| source >= node_count || target >= node_count)
        {
            return Err(PropagationError::InvalidGraph(format!(
                "edge ({source}, {target}) references a node outside 0..{node_count}"
            )));
        }
        Ok(Self::assemble(node_count, edges))
    }

    fn assemble(node_count: usize, edges: Vec<(usize, usize)>) -> Self {
        let mut graph = DiGraph::with_capacity(node_count, edges.len());
        for _ in 0..node_count {
            graph.add_node(());
        }

        let mut self_loops_removed = 0;
        for (source, target) in edges {
            if source == target {
                self_loops_removed += 1;
                continue;
            }
            graph.add_edge(NodeIndex::new(source), NodeIndex::new(target), ());
        }

        Self {
            graph,
            self_loops_removed,
        }
    }

    /// Collapse to distinct unordered pairs and emit each in both directions.
    ///
    /// This is how a plain undirected edge list is meant to be read: `(0, 1)`,
    /// `(1, 0)` and a repeated `(0, 1)` all describe the same single edge.
    pub fn to_undirected(&self) -> Self {
        let pairs: BTreeSet<(usize, usize)> = self
            .edges()
            .map(|(source, target)| (source.min(target), source.max(target)))
            .collect();

        let mut graph = DiGraph::with_capacity(self.node_count(), pairs.len() * 2);
        for _ in 0..self.node_count() {
            graph.add_node(());
        }
        for (a, b) in pairs {
            graph.add_edge(NodeIndex::new(a), NodeIndex::new(b), ());
            graph.add_edge(NodeIndex::new(b), NodeIndex::new(a), ());
        }

        Self {
            graph,
            self_loops_removed: self.self_loops_removed,
        }
    }

    /// Number of nodes, which is also the propagator dimension.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of directed edges, duplicates included.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Edges as `(source, target)` in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.graph
            .edge_references()
            .map(|edge| (edge.source().index(), edge.target().index()))
    }

    /// How many self-loop edges were dropped while building.
    pub fn self_loops_removed(&self) -> usize {
        self.self_loops_removed
    }
}

fn validate_endpoints(
    edges: impl IntoIterator<Item = (i64, i64)>,
) -> Result<Vec<(usize, usize)>> {
    edges
        .into_iter()
        .map(|(source, target)| {
            match (usize::try_from(source), usize::try_from(target)) {
                (Ok(s), Ok(t)) => Ok((s, t)),
                _ => Err(PropagationError::InvalidGraph(format!(
                    "edge ({source}, {target}) has a negative node id"
                ))),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_count_is_max_id_plus_one() {
        let g = Graph::from_edges(vec![(0, 1), (1, 4)]).unwrap();
        assert_eq!(g.node_count(), 5);
        assert_eq!(g.edge_count(), 2);
    }

    #[test]
    fn test_empty_edge_list_is_single_node() {
        let g = Graph::from_edges(Vec::new()).unwrap();
        assert_eq!(g.node_count(), 1);
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn test_self_loops_stripped() {
        let g = Graph::from_edges(vec![(0, 0), (0, 1), (2, 2)]).unwrap();
        assert_eq!(g.edges().collect::<Vec<_>>(), vec![(0, 1)]);
        assert_eq!(g.self_loops_removed(), 2);
        assert_eq!(g.node_count(), 2);
    }

    #[test]
    fn test_loop_only_graph_is_single_node() {
        let g = Graph::from_edges(vec![(5, 5)]).unwrap();
        assert_eq!(g.node_count(), 1);
        assert_eq!(g.edge_count(), 0);
        assert_eq!(g.self_loops_removed(), 1);
    }

    #[test]
    fn test_declared_count_keeps_stripped_loop_nodes() {
        let g = Graph::with_node_count(3, vec![(0, 1), (2, 2)]).unwrap();
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn test_negative_id_rejected() {
        let err = Graph::from_edges(vec![(0, 1), (-1, 2)]).unwrap_err();
        assert!(matches!(err, PropagationError::InvalidGraph(_)));
    }

    #[test]
    fn test_declared_node_count() {
        let g = Graph::with_node_count(4, vec![(0, 1)]).unwrap();
        assert_eq!(g.node_count(), 4);

        let err = Graph::with_node_count(2, vec![(0, 2)]).unwrap_err();
        assert!(matches!(err, PropagationError::InvalidGraph(_)));

        assert!(Graph::with_node_count(0, Vec::new()).is_err());
    }

    #[test]
    fn test_edges_keep_order_and_duplicates() {
        let g = Graph::from_edges(vec![(2, 1), (0, 1), (0, 1)]).unwrap();
        assert_eq!(g.edges().collect::<Vec<_>>(), vec![(2, 1), (0, 1), (0, 1)]);
    }

    #[test]
    fn test_to_undirected() {
        let g = Graph::from_edges(vec![(0, 1), (1, 0), (0, 1), (2, 1)]).unwrap();
        let u = g.to_undirected();
        assert_eq!(u.node_count(), 3);
        assert_eq!(
            u.edges().collect::<Vec<_>>(),
            vec![(0, 1), (1, 0), (1, 2), (2, 1)]
        );
    }
}
