//! Equivalence-class vertices of the dependency graph.
//!
//! A [`Node`] starts out representing a single original id. Merges grow
//! its label and rewire its edges; a node folded into another one keeps its
//! arena slot but is no longer live and has no edges or label left.

use indexmap::IndexSet;

use crate::id::NodeId;

/// A vertex of the [`DependencyGraph`](crate::graph::DependencyGraph).
///
/// Edge sets and the label iterate in insertion order.
#[derive(Debug, Clone)]
pub struct Node<K> {
    id: NodeId,
    label: IndexSet<K>,
    successors: IndexSet<NodeId>,
    predecessors: IndexSet<NodeId>,
    merged_into: Option<NodeId>,
}

impl<K> Node<K> {
    pub(crate) fn singleton(id: NodeId, key: K) -> Self
    where
        K: std::hash::Hash + Eq,
    {
        let mut label = IndexSet::with_capacity(1);
        label.insert(key);
        Node {
            id,
            label,
            successors: IndexSet::new(),
            predecessors: IndexSet::new(),
            merged_into: None,
        }
    }

    /// This node's arena handle.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The original ids this node currently represents.
    pub fn label(&self) -> &IndexSet<K> {
        &self.label
    }

    /// Direct successors. May contain `self.id()` after a merge.
    pub fn successors(&self) -> &IndexSet<NodeId> {
        &self.successors
    }

    /// Direct predecessors. May contain `self.id()` after a merge.
    pub fn predecessors(&self) -> &IndexSet<NodeId> {
        &self.predecessors
    }

    /// Returns false once this node has been folded into another node.
    pub fn is_live(&self) -> bool {
        self.merged_into.is_none()
    }

    /// The node this one was folded into, if any. This is the primary of
    /// that merge, which may itself have been merged away later.
    pub fn merged_into(&self) -> Option<NodeId> {
        self.merged_into
    }

    /// Returns true if the node has an edge to itself.
    pub fn has_self_loop(&self) -> bool {
        self.successors.contains(&self.id)
    }

    /// Returns true iff at least one direct successor satisfies `predicate`.
    ///
    /// A self-loop makes the node its own successor, so `predicate` may be
    /// called with `self.id()`.
    pub fn has_successor_that_matches(&self, predicate: impl FnMut(NodeId) -> bool) -> bool {
        self.successors.iter().copied().any(predicate)
    }

    pub(crate) fn successors_mut(&mut self) -> &mut IndexSet<NodeId> {
        &mut self.successors
    }

    pub(crate) fn predecessors_mut(&mut self) -> &mut IndexSet<NodeId> {
        &mut self.predecessors
    }

    pub(crate) fn label_mut(&mut self) -> &mut IndexSet<K> {
        &mut self.label
    }

    /// Strips the node for folding into `primary`, handing back its label
    /// and edges.
    pub(crate) fn retire(
        &mut self,
        primary: NodeId,
    ) -> (IndexSet<K>, IndexSet<NodeId>, IndexSet<NodeId>) {
        self.merged_into = Some(primary);
        (
            std::mem::take(&mut self.label),
            std::mem::take(&mut self.predecessors),
            std::mem::take(&mut self.successors),
        )
    }
}
