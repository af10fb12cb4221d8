//! Options controlling graph construction and contraction.

use serde::{Deserialize, Serialize};

/// Options consumed by [`DependencyGraph::with_options`](crate::graph::DependencyGraph::with_options).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractOptions {
    /// Re-check every graph invariant, and that the result is acyclic,
    /// after `merge_strongly_connected_components` returns. A violation
    /// panics. Defaults to on in debug builds.
    pub verify_after_contraction: bool,

    /// Number of nodes to reserve arena space for up front.
    pub node_capacity: usize,
}

impl Default for ContractOptions {
    fn default() -> Self {
        ContractOptions {
            verify_after_contraction: cfg!(debug_assertions),
            node_capacity: 0,
        }
    }
}
