//! Cyclic dependency-graph contraction for whole-program dataflow analyses.
//!
//! A client analysis registers the program values it cares about, adds an
//! edge wherever one value's property may depend on another's, and calls
//! [`DependencyGraph::merge_strongly_connected_components`]. Every cycle is
//! folded into a single node, leaving an acyclic condensation the client can
//! walk with one-hop queries such as [`Node::has_successor_that_matches`].
//!
//! # Modules
//!
//! - [`worklist`] -- FIFO identity worklist with bulk "done" marking
//! - [`scc`] -- path-based SCC search over an explicit stack
//! - [`node`] -- equivalence-class vertices
//! - [`graph`] -- registry, merging and the contraction driver
//! - [`verify`] -- invariant checks
//! - [`export`] -- petgraph and serde views of the live graph
//!
//! All iteration orders depend only on insertion history, so repeated runs
//! over the same input merge the same nodes in the same order.

pub mod error;
pub mod export;
pub mod graph;
pub mod id;
pub mod node;
pub mod options;
pub mod scc;
pub mod verify;
pub mod worklist;

// Re-export commonly used types
pub use error::GraphError;
pub use export::{GraphSummary, NodeSummary};
pub use graph::DependencyGraph;
pub use id::NodeId;
pub use node::Node;
pub use options::ContractOptions;
pub use scc::{compute_scc, SccFinder};
pub use worklist::IdentityWorklist;
