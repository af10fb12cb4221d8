//! Strongly connected components via the path-based (Dijkstra/Gabow)
//! algorithm.
//!
//! The traversal is driven by an explicit frame stack rather than native
//! recursion: program graphs can contain paths hundreds of thousands of
//! nodes long, and the search depth equals the longest simple path.
//!
//! # Bookkeeping
//!
//! - **discovery number**: assigned on first visit, strictly increasing.
//! - **unassigned stack/set**: visited nodes not yet placed in a component.
//! - **preorder stack**: candidate component roots. Discovery numbers
//!   strictly increase from bottom to top.
//!
//! When a successor is found that is visited but still unassigned, every
//! preorder entry discovered after it is popped, fusing the current path
//! into the successor's pending component. A node that is still the top of
//! the preorder stack when its successors are exhausted is the root of a
//! finished component.
//!
//! Components are emitted in reverse topological order of the condensation:
//! a component is returned only after every component reachable from it.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use indexmap::IndexSet;

/// One suspended visit: the node and how far through its successors we are.
struct Frame<N, I> {
    node: N,
    successors: I,
}

/// Single-use SCC search from one root.
///
/// `compute_scc` consumes the finder, so discovery numbering always starts
/// from zero. Build a fresh finder for each independent root.
pub struct SccFinder<N, F> {
    successors: F,
    current_time: u32,
    discover_time: HashMap<N, u32>,
    unassigned_set: HashSet<N>,
    unassigned_stack: Vec<N>,
    preorder_stack: Vec<N>,
    components: Vec<IndexSet<N>>,
}

impl<N, F, I> SccFinder<N, F>
where
    N: Copy + Eq + Hash,
    F: FnMut(N) -> I,
    I: IntoIterator<Item = N>,
{
    /// Creates a finder that walks edges through `successors`.
    pub fn new(successors: F) -> Self {
        SccFinder {
            successors,
            current_time: 0,
            discover_time: HashMap::new(),
            unassigned_set: HashSet::new(),
            unassigned_stack: Vec::new(),
            preorder_stack: Vec::new(),
            components: Vec::new(),
        }
    }

    /// Returns the SCCs reachable from `start`, in reverse topological order.
    ///
    /// Every node reachable from `start` appears in exactly one component.
    /// Within a component, members are listed in discovery order, so the
    /// component root comes first.
    pub fn compute_scc(mut self, start: N) -> Vec<IndexSet<N>> {
        let mut stack: Vec<Frame<N, I::IntoIter>> = Vec::new();
        let root = self.discover(start);
        stack.push(root);

        while let Some(frame) = stack.last_mut() {
            match frame.successors.next() {
                Some(successor) => {
                    if !self.discover_time.contains_key(&successor) {
                        let child = self.discover(successor);
                        stack.push(child);
                    } else if self.unassigned_set.contains(&successor) {
                        self.fuse_path_into(successor);
                    }
                    // Otherwise the successor sits in a finished component.
                }
                None => {
                    let node = frame.node;
                    stack.pop();
                    self.finish(node);
                }
            }
        }

        self.components
    }

    fn discover(&mut self, node: N) -> Frame<N, I::IntoIter> {
        self.discover_time.insert(node, self.current_time);
        self.current_time += 1;
        self.unassigned_set.insert(node);
        self.unassigned_stack.push(node);
        self.preorder_stack.push(node);
        Frame {
            node,
            successors: (self.successors)(node).into_iter(),
        }
    }

    /// Pops every preorder entry discovered after `target`. This need not
    /// coincide with the cycle just closed, because an enclosing cycle may
    /// already have popped some of them.
    fn fuse_path_into(&mut self, target: N) {
        let target_time = self.discovery_number(target);
        while let Some(&top) = self.preorder_stack.last() {
            if self.discovery_number(top) <= target_time {
                break;
            }
            self.preorder_stack.pop();
        }
    }

    fn finish(&mut self, node: N) {
        if self.preorder_stack.last() != Some(&node) {
            return;
        }
        // `node` roots a component made of itself and everything above it
        // on the unassigned stack.
        let start = self
            .unassigned_stack
            .iter()
            .rposition(|&member| member == node)
            .expect("component root must still be on the unassigned stack");
        let component: IndexSet<N> = self.unassigned_stack.drain(start..).collect();
        for member in &component {
            self.unassigned_set.remove(member);
        }
        self.components.push(component);
        self.preorder_stack.pop();
    }

    fn discovery_number(&self, node: N) -> u32 {
        match self.discover_time.get(&node) {
            Some(&time) => time,
            None => panic!("node missing from the discovery map during SCC search"),
        }
    }
}

/// Convenience wrapper: builds a fresh [`SccFinder`] and runs it from `start`.
pub fn compute_scc<N, F, I>(start: N, successors: F) -> Vec<IndexSet<N>>
where
    N: Copy + Eq + Hash,
    F: FnMut(N) -> I,
    I: IntoIterator<Item = N>,
{
    SccFinder::new(successors).compute_scc(start)
}
