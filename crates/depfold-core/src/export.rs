//! Read-only views of the live graph for clients and debugging.
//!
//! - [`DependencyGraph::condensation`] copies the live nodes into a petgraph
//!   `DiGraph` so clients can reuse petgraph's algorithms on the DAG.
//! - [`DependencyGraph::summary`] produces a serializable [`GraphSummary`].

use std::hash::Hash;

use indexmap::IndexMap;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};

use crate::graph::DependencyGraph;
use crate::id::NodeId;

/// One live node in a [`GraphSummary`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSummary<K> {
    pub id: NodeId,
    pub label: Vec<K>,
    pub successors: Vec<NodeId>,
}

/// Serializable snapshot of the live nodes, in creation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSummary<K> {
    pub nodes: Vec<NodeSummary<K>>,
}

impl<K: Serialize> GraphSummary<K> {
    /// Renders the summary as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl<K: Clone + Eq + Hash> DependencyGraph<K> {
    /// Copies the live graph into a petgraph `DiGraph`.
    ///
    /// Node weights are the labels. Nodes are added in creation order and
    /// edges in successor order, so indices are reproducible. Self-loops
    /// are copied as-is.
    pub fn condensation(&self) -> DiGraph<Vec<K>, ()> {
        let mut graph = DiGraph::with_capacity(self.live_node_count(), 0);
        let mut index_of: IndexMap<NodeId, NodeIndex> = IndexMap::new();

        for node in self.nodes() {
            let index = graph.add_node(node.label().iter().cloned().collect());
            index_of.insert(node.id(), index);
        }
        for node in self.nodes() {
            let from = index_of[&node.id()];
            for successor in node.successors() {
                graph.add_edge(from, index_of[successor], ());
            }
        }
        graph
    }

    /// Snapshot of every live node's label and successors.
    pub fn summary(&self) -> GraphSummary<K> {
        let nodes = self
            .nodes()
            .map(|node| NodeSummary {
                id: node.id(),
                label: node.label().iter().cloned().collect(),
                successors: node.successors().iter().copied().collect(),
            })
            .collect();
        GraphSummary { nodes }
    }
}

#[cfg(test)]
mod tests {
    use petgraph::algo::toposort;
    use petgraph::visit::EdgeRef;

    use super::*;

    #[test]
    fn condensation_of_contracted_cycle() {
        let mut graph = DependencyGraph::new();
        for (from, to) in [(1u32, 2), (2, 3), (3, 1), (4, 1)] {
            graph.add_dependency(from, to);
        }
        graph.merge_strongly_connected_components();

        let dag = graph.condensation();
        assert_eq!(dag.node_count(), 2);
        assert_eq!(dag[NodeIndex::new(0)], vec![1, 2, 3]);
        assert_eq!(dag[NodeIndex::new(1)], vec![4]);

        // The contracted cycle keeps its self-loop; drop it before sorting.
        let mut acyclic = dag.clone();
        acyclic.retain_edges(|g, e| {
            let (a, b) = g.edge_endpoints(e).unwrap();
            a != b
        });
        let order = toposort(&acyclic, None).unwrap();
        assert_eq!(order, vec![NodeIndex::new(1), NodeIndex::new(0)]);

        let self_loops = dag.edge_references().filter(|e| e.source() == e.target()).count();
        assert_eq!(self_loops, 1);
    }

    #[test]
    fn summary_lists_live_nodes_only() {
        let mut graph = DependencyGraph::new();
        graph.add_dependency("a", "b");
        graph.add_dependency("b", "a");
        graph.add_dependency("b", "c");
        graph.merge_strongly_connected_components();

        let summary = graph.summary();
        assert_eq!(summary.nodes.len(), 2);
        assert_eq!(summary.nodes[0].label, vec!["a", "b"]);
        assert_eq!(summary.nodes[1].label, vec!["c"]);
        assert!(summary.nodes[0].successors.contains(&summary.nodes[1].id));
    }

    #[test]
    fn summary_json_roundtrip() {
        let mut graph = DependencyGraph::new();
        graph.add_dependency(10u64, 20);
        let summary = graph.summary();

        let json = summary.to_json_pretty().unwrap();
        let back: GraphSummary<u64> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, summary);
    }
}
