//! Error types for depfold-core.
//!
//! Uses `thiserror` for structured, matchable variants. Every variant is an
//! internal invariant violation: inputs come from already-validated compiler
//! phases, so any of these surfacing means a bug upstream or in the engine.

use thiserror::Error;

use crate::id::NodeId;

/// Errors produced by graph mutation and verification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// `merge_nodes` was handed an empty collection, so there is no primary.
    #[error("cannot merge an empty set of nodes")]
    EmptyMerge,

    /// A node index is outside the arena.
    #[error("node not found: NodeId({id})", id = id.0)]
    NodeNotFound { id: NodeId },

    /// A node was used after it had been folded into another node.
    #[error("node {id} was already merged into node {into}")]
    MergedAway { id: NodeId, into: NodeId },

    /// The contraction driver reached a node it had already processed.
    #[error("node {id} was processed twice during contraction")]
    ProcessedTwice { id: NodeId },

    /// A successor edge has no matching predecessor edge, or vice versa.
    #[error("edge {from} -> {to} is not recorded on both endpoints")]
    EdgeAsymmetry { from: NodeId, to: NodeId },

    /// An original id appears in more than one live label, or in none.
    #[error("original id of node {id} is not in exactly one live label")]
    LabelOverlap { id: NodeId },

    /// The registry does not resolve an id to the live node holding it.
    #[error("registry mismatch: {reason}")]
    RegistryMismatch { reason: String },

    /// More original ids were registered than a `u32` node handle can name.
    #[error("cannot address node slot {slot}: node handles are 32-bit")]
    TooManyNodes { slot: usize },

    /// The live graph still contains a cycle through more than one node.
    #[error("cycle through node {through} survived contraction")]
    Cycle { through: NodeId },
}
