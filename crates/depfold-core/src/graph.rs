//! DependencyGraph: the registry, edge builder and SCC contraction driver.
//!
//! [`DependencyGraph`] interns every original id the client registers and
//! gives it a singleton [`Node`]. The client adds dependency edges, calls
//! [`merge_strongly_connected_components`](DependencyGraph::merge_strongly_connected_components)
//! once, and then walks the resulting acyclic condensation with one-hop
//! queries.
//!
//! # Registry
//!
//! Ids are interned in an `IndexSet`, so the n-th registered id owns arena
//! slot n and `NodeId(n)`. A `petgraph` union-find over those slots tracks
//! which nodes have been folded together; `representative[root]` names the
//! live node for each union-find root. Resolving an id is therefore
//! `representative[find(slot)]`, and a merge updates the union-find, the
//! edge sets and the labels in one step.
//!
//! # Determinism
//!
//! Every collection here iterates in insertion order. Merge order, primary
//! selection and edge order are a pure function of the order in which the
//! client registered ids and edges.

use std::hash::Hash;

use indexmap::IndexSet;
use petgraph::unionfind::UnionFind;
use tracing::{debug, debug_span, trace};

use crate::error::GraphError;
use crate::id::NodeId;
use crate::node::Node;
use crate::options::ContractOptions;
use crate::scc::SccFinder;
use crate::worklist::IdentityWorklist;

/// Dependency graph over client-owned original ids of type `K`.
#[derive(Debug, Clone)]
pub struct DependencyGraph<K> {
    /// Interned original ids; index n created `NodeId(n)`.
    keys: IndexSet<K>,
    /// Node arena, including nodes that were merged away.
    nodes: Vec<Node<K>>,
    /// Disjoint sets over arena slots.
    sets: UnionFind<u32>,
    /// Live node for each union-find root, indexed by root slot.
    representative: Vec<NodeId>,
    /// Number of live nodes.
    live: usize,
    options: ContractOptions,
}

impl<K: Clone + Eq + Hash> DependencyGraph<K> {
    /// Creates an empty graph with default [`ContractOptions`].
    pub fn new() -> Self {
        Self::with_options(ContractOptions::default())
    }

    /// Creates an empty graph configured by `options`.
    pub fn with_options(options: ContractOptions) -> Self {
        let capacity = options.node_capacity;
        DependencyGraph {
            keys: IndexSet::with_capacity(capacity),
            nodes: Vec::with_capacity(capacity),
            sets: UnionFind::new(0),
            representative: Vec::with_capacity(capacity),
            live: 0,
            options,
        }
    }

    /// Returns the options this graph was built with.
    pub fn options(&self) -> &ContractOptions {
        &self.options
    }

    // -----------------------------------------------------------------------
    // Registry
    // -----------------------------------------------------------------------

    /// Returns the live node for `key`, creating a singleton node the first
    /// time `key` is seen.
    pub fn create_node_if_absent(&mut self, key: K) -> NodeId {
        if let Some(slot) = self.keys.get_index_of(&key) {
            return self.resolve(slot);
        }

        let id = slot_id(self.keys.len());
        self.keys.insert(key.clone());
        let set = self.sets.new_set();
        debug_assert_eq!(set, id.0);
        self.representative.push(id);
        self.nodes.push(Node::singleton(id, key));
        self.live += 1;
        id
    }

    /// Returns the live node currently representing `key`, if registered.
    pub fn find(&self, key: &K) -> Option<NodeId> {
        self.keys.get_index_of(key).map(|slot| self.resolve(slot))
    }

    fn resolve(&self, slot: usize) -> NodeId {
        let root = self.sets.find(slot_id(slot).0);
        self.representative[root as usize]
    }

    /// Number of original ids ever registered.
    pub fn registered_count(&self) -> usize {
        self.keys.len()
    }

    /// Number of live nodes. Never increases across a merge.
    pub fn live_node_count(&self) -> usize {
        self.live
    }

    /// Registered original ids, in registration order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.keys.iter()
    }

    // -----------------------------------------------------------------------
    // Node access
    // -----------------------------------------------------------------------

    /// Returns the node at `id`, live or merged away.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not handed out by this graph.
    pub fn node(&self, id: NodeId) -> &Node<K> {
        match self.nodes.get(id.index()) {
            Some(node) => node,
            None => panic!("{}", GraphError::NodeNotFound { id }),
        }
    }

    /// Returns the node at `id`, or `None` if `id` is out of range.
    pub fn get(&self, id: NodeId) -> Option<&Node<K>> {
        self.nodes.get(id.index())
    }

    /// Returns true if `id` names a node that has not been merged away.
    pub fn is_live(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(Node::is_live)
    }

    /// Iterates all live nodes in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node<K>> {
        self.nodes.iter().filter(|node| node.is_live())
    }

    /// Snapshot of the ids of all live nodes, in creation order.
    pub fn live_node_ids(&self) -> Vec<NodeId> {
        self.nodes().map(Node::id).collect()
    }

    /// The original ids `id` represents.
    pub fn label(&self, id: NodeId) -> &IndexSet<K> {
        self.node(id).label()
    }

    /// Direct successors of `id`.
    pub fn successors(&self, id: NodeId) -> &IndexSet<NodeId> {
        self.node(id).successors()
    }

    /// Direct predecessors of `id`.
    pub fn predecessors(&self, id: NodeId) -> &IndexSet<NodeId> {
        self.node(id).predecessors()
    }

    /// Returns true iff a direct successor of `id` satisfies `predicate`.
    ///
    /// Unlike [`Node::has_successor_that_matches`], the predicate sees the
    /// successor node itself, label included. With a self-loop the node is
    /// its own successor.
    pub fn has_successor_that_matches(
        &self,
        id: NodeId,
        mut predicate: impl FnMut(&Node<K>) -> bool,
    ) -> bool {
        self.node(id)
            .successors()
            .iter()
            .any(|&successor| predicate(self.node(successor)))
    }

    pub(crate) fn arena_len(&self) -> usize {
        self.nodes.len()
    }

    fn check_live(&self, id: NodeId) -> Result<(), GraphError> {
        let node = self.get(id).ok_or(GraphError::NodeNotFound { id })?;
        match node.merged_into() {
            None => Ok(()),
            Some(into) => Err(GraphError::MergedAway { id, into }),
        }
    }

    fn expect_live(&self, id: NodeId) {
        if let Err(err) = self.check_live(id) {
            panic!("{err}");
        }
    }

    // -----------------------------------------------------------------------
    // Edges
    // -----------------------------------------------------------------------

    /// Adds the edge `from -> to`. Duplicate edges collapse and self-edges
    /// are allowed.
    ///
    /// # Panics
    ///
    /// Panics if either endpoint is unknown or has been merged away.
    pub fn add_directed_edge(&mut self, from: NodeId, to: NodeId) {
        self.expect_live(from);
        self.expect_live(to);
        self.nodes[from.index()].successors_mut().insert(to);
        self.nodes[to.index()].predecessors_mut().insert(from);
    }

    /// Registers both original ids if needed and adds an edge between their
    /// live nodes.
    pub fn add_dependency(&mut self, from: K, to: K) -> (NodeId, NodeId) {
        let from = self.create_node_if_absent(from);
        let to = self.create_node_if_absent(to);
        self.add_directed_edge(from, to);
        (from, to)
    }

    // -----------------------------------------------------------------------
    // Merging
    // -----------------------------------------------------------------------

    /// Folds every node of `nodes` into the first one and returns it.
    ///
    /// # Panics
    ///
    /// Panics if `nodes` is empty or names a node that is unknown or has
    /// already been merged away. See [`try_merge_nodes`](Self::try_merge_nodes).
    pub fn merge_nodes(&mut self, nodes: impl IntoIterator<Item = NodeId>) -> NodeId {
        match self.try_merge_nodes(nodes) {
            Ok(primary) => primary,
            Err(err) => panic!("{err}"),
        }
    }

    /// Folds every node of `nodes` into the first one (the primary).
    ///
    /// Each secondary's incoming and outgoing edges are moved onto the
    /// primary, its label is appended to the primary's label, and the
    /// registry is redirected so its ids resolve to the primary. Nodes that
    /// were adjacent to each other leave a self-loop on the primary.
    ///
    /// All inputs are validated before anything is mutated. Repeated ids in
    /// `nodes` are ignored.
    pub fn try_merge_nodes(
        &mut self,
        nodes: impl IntoIterator<Item = NodeId>,
    ) -> Result<NodeId, GraphError> {
        let nodes: IndexSet<NodeId> = nodes.into_iter().collect();
        let primary = *nodes.first().ok_or(GraphError::EmptyMerge)?;
        for &id in &nodes {
            self.check_live(id)?;
        }

        for &secondary in nodes.iter().skip(1) {
            self.fold_into(primary, secondary);
        }
        Ok(primary)
    }

    fn fold_into(&mut self, primary: NodeId, secondary: NodeId) {
        let (label, predecessors, successors) = self.nodes[secondary.index()].retire(primary);
        // Edges between the two nodes, or a self-loop on the secondary,
        // become self-loops on the primary.
        let redirect = |id: NodeId| if id == secondary { primary } else { id };

        for predecessor in predecessors.into_iter().map(redirect) {
            let node = &mut self.nodes[predecessor.index()];
            node.successors_mut().swap_remove(&secondary);
            node.successors_mut().insert(primary);
            self.nodes[primary.index()].predecessors_mut().insert(predecessor);
        }
        for successor in successors.into_iter().map(redirect) {
            let node = &mut self.nodes[successor.index()];
            node.predecessors_mut().swap_remove(&secondary);
            node.predecessors_mut().insert(primary);
            self.nodes[primary.index()].successors_mut().insert(successor);
        }

        self.nodes[primary.index()].label_mut().extend(label);

        self.sets.union(primary.0, secondary.0);
        let root = self.sets.find_mut(primary.0);
        self.representative[root as usize] = primary;
        self.live -= 1;

        trace!(%primary, %secondary, "folded node");
    }

    // -----------------------------------------------------------------------
    // Contraction
    // -----------------------------------------------------------------------

    /// Contracts every strongly connected component into a single node.
    ///
    /// Every live node seeds a worklist. Each round takes the next node not
    /// yet processed, finds the SCCs reachable from it, merges each of them
    /// and marks all of their members processed. The search never enters a
    /// processed node: everything reachable from one is processed too, so
    /// no unprocessed node can share its component.
    ///
    /// Afterwards the live graph is acyclic apart from self-loops, and each
    /// original SCC is exactly one node.
    ///
    /// # Panics
    ///
    /// Panics if a node would be processed twice, or if
    /// [`ContractOptions::verify_after_contraction`] is set and the result
    /// fails [`verify`](Self::verify) or [`verify_acyclic`](Self::verify_acyclic).
    pub fn merge_strongly_connected_components(&mut self) {
        let _span = debug_span!("merge_strongly_connected_components", live = self.live).entered();

        let mut worklist = IdentityWorklist::with_items(self.live_node_ids());
        let mut rounds = 0usize;
        let mut folded = 0usize;

        while let Some(seed) = worklist.next() {
            let components = {
                let nodes = &self.nodes;
                let processed = &worklist;
                SccFinder::new(move |id: NodeId| {
                    nodes[id.index()]
                        .successors()
                        .iter()
                        .copied()
                        .filter(move |&successor| !processed.is_done(successor))
                })
                .compute_scc(seed)
            };
            rounds += 1;

            for component in components {
                for &member in &component {
                    if !worklist.mark_done(member) {
                        panic!("{}", GraphError::ProcessedTwice { id: member });
                    }
                }
                folded += component.len() - 1;
                self.merge_nodes(component);
            }
        }

        debug!(rounds, folded, live = self.live, "contracted strongly connected components");

        if self.options.verify_after_contraction {
            if let Err(err) = self.verify().and_then(|()| self.verify_acyclic()) {
                panic!("contraction left the graph inconsistent: {err}");
            }
        }
    }
}

/// Handle for arena slot `slot`. Slots past `u32::MAX` cannot be addressed
/// by the union-find and abort registration.
fn slot_id(slot: usize) -> NodeId {
    match u32::try_from(slot) {
        Ok(index) => NodeId(index),
        Err(_) => panic!("{}", GraphError::TooManyNodes { slot }),
    }
}

impl<K: Clone + Eq + Hash> Default for DependencyGraph<K> {
    fn default() -> Self {
        Self::new()
    }
}
