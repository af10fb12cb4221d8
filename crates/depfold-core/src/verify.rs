//! Invariant checks for a [`DependencyGraph`].
//!
//! These walk the whole graph and are meant for tests and for the
//! post-contraction check enabled by
//! [`ContractOptions::verify_after_contraction`](crate::options::ContractOptions).

use std::hash::Hash;

use crate::error::GraphError;
use crate::graph::DependencyGraph;
use crate::id::NodeId;
use crate::node::Node;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    Unvisited,
    OnPath,
    Finished,
}

impl<K: Clone + Eq + Hash> DependencyGraph<K> {
    /// Checks edge symmetry, the label partition and registry resolution.
    ///
    /// - every edge of a live node points at a live node and is recorded on
    ///   both endpoints;
    /// - every live label is non-empty and each of its ids resolves to the
    ///   node holding it;
    /// - the live labels together hold exactly the registered ids.
    pub fn verify(&self) -> Result<(), GraphError> {
        let mut labelled = 0usize;
        let mut live = 0usize;

        for node in self.nodes() {
            let id = node.id();
            live += 1;

            for &successor in node.successors() {
                let target = self.live_endpoint(successor)?;
                if !target.predecessors().contains(&id) {
                    return Err(GraphError::EdgeAsymmetry {
                        from: id,
                        to: successor,
                    });
                }
            }
            for &predecessor in node.predecessors() {
                let source = self.live_endpoint(predecessor)?;
                if !source.successors().contains(&id) {
                    return Err(GraphError::EdgeAsymmetry {
                        from: predecessor,
                        to: id,
                    });
                }
            }

            if node.label().is_empty() {
                return Err(GraphError::LabelOverlap { id });
            }
            for key in node.label() {
                if self.find(key) != Some(id) {
                    return Err(GraphError::LabelOverlap { id });
                }
            }
            labelled += node.label().len();
        }

        if labelled != self.registered_count() {
            return Err(GraphError::RegistryMismatch {
                reason: format!(
                    "live labels hold {labelled} ids but {} were registered",
                    self.registered_count()
                ),
            });
        }
        if live != self.live_node_count() {
            return Err(GraphError::RegistryMismatch {
                reason: format!(
                    "{live} live nodes found but {} are counted",
                    self.live_node_count()
                ),
            });
        }
        Ok(())
    }

    /// Checks that no live node can reach itself through another node.
    ///
    /// Self-loops are accepted: contraction leaves one wherever two merged
    /// nodes were adjacent, and it adds no reachability.
    pub fn verify_acyclic(&self) -> Result<(), GraphError> {
        let mut state = vec![Visit::Unvisited; self.arena_len()];

        for root in self.live_node_ids() {
            if state[root.index()] != Visit::Unvisited {
                continue;
            }
            state[root.index()] = Visit::OnPath;
            let mut stack = vec![(root, self.successors(root).iter())];

            while let Some((node, successors)) = stack.last_mut() {
                let current = *node;
                match successors.next() {
                    Some(&successor) if successor == current => {}
                    Some(&successor) => match state[successor.index()] {
                        Visit::Unvisited => {
                            state[successor.index()] = Visit::OnPath;
                            stack.push((successor, self.successors(successor).iter()));
                        }
                        Visit::OnPath => return Err(GraphError::Cycle { through: successor }),
                        Visit::Finished => {}
                    },
                    None => {
                        state[current.index()] = Visit::Finished;
                        stack.pop();
                    }
                }
            }
        }
        Ok(())
    }

    fn live_endpoint(&self, id: NodeId) -> Result<&Node<K>, GraphError> {
        let node = self.get(id).ok_or(GraphError::NodeNotFound { id })?;
        match node.merged_into() {
            None => Ok(node),
            Some(into) => Err(GraphError::MergedAway { id, into }),
        }
    }
}
