//! Property tests checked against petgraph as an independent oracle.

use std::collections::BTreeSet;

use depfold_core::{compute_scc, DependencyGraph, NodeId};
use petgraph::algo::{has_path_connecting, is_cyclic_directed, tarjan_scc};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Dfs;
use proptest::prelude::*;

/// Node count plus an edge list over `0..n`.
fn arb_graph(max_nodes: u32, max_edges: usize) -> impl Strategy<Value = (u32, Vec<(u32, u32)>)> {
    (1..=max_nodes).prop_flat_map(move |n| {
        let edges = prop::collection::vec((0..n, 0..n), 0..=max_edges);
        (Just(n), edges)
    })
}

fn build(n: u32, edges: &[(u32, u32)]) -> DependencyGraph<u32> {
    let mut graph = DependencyGraph::new();
    for key in 0..n {
        graph.create_node_if_absent(key);
    }
    for &(from, to) in edges {
        graph.add_dependency(from, to);
    }
    graph
}

fn oracle(n: u32, edges: &[(u32, u32)]) -> DiGraph<(), ()> {
    let mut graph = DiGraph::new();
    for _ in 0..n {
        graph.add_node(());
    }
    for &(from, to) in edges {
        graph.add_edge(NodeIndex::new(from as usize), NodeIndex::new(to as usize), ());
    }
    graph
}

fn partition(sets: impl IntoIterator<Item = Vec<u32>>) -> BTreeSet<BTreeSet<u32>> {
    sets.into_iter().map(|set| set.into_iter().collect()).collect()
}

fn labels(graph: &DependencyGraph<u32>) -> BTreeSet<BTreeSet<u32>> {
    partition(graph.nodes().map(|node| node.label().iter().copied().collect()))
}

proptest! {
    #[test]
    fn contraction_matches_tarjan((n, edges) in arb_graph(30, 90)) {
        let mut graph = build(n, &edges);
        graph.merge_strongly_connected_components();

        let expected = partition(
            tarjan_scc(&oracle(n, &edges))
                .into_iter()
                .map(|scc| scc.into_iter().map(|ix| ix.index() as u32).collect()),
        );
        prop_assert_eq!(labels(&graph), expected);
        prop_assert_eq!(graph.verify(), Ok(()));
    }

    #[test]
    fn contraction_is_acyclic((n, edges) in arb_graph(30, 90)) {
        let mut graph = build(n, &edges);
        graph.merge_strongly_connected_components();
        prop_assert_eq!(graph.verify_acyclic(), Ok(()));

        let mut dag = graph.condensation();
        dag.retain_edges(|g, e| {
            let (a, b) = g.edge_endpoints(e).unwrap();
            a != b
        });
        prop_assert!(!is_cyclic_directed(&dag));
    }

    #[test]
    fn contraction_preserves_reachability((n, edges) in arb_graph(16, 40)) {
        let original = oracle(n, &edges);
        let mut graph = build(n, &edges);
        graph.merge_strongly_connected_components();
        let dag = graph.condensation();
        let position = |key: u32| {
            let id = graph.find(&key).unwrap();
            let slot = graph.live_node_ids().iter().position(|&live| live == id).unwrap();
            NodeIndex::new(slot)
        };

        for from in 0..n {
            for to in 0..n {
                if from == to {
                    continue;
                }
                let before = has_path_connecting(
                    &original,
                    NodeIndex::new(from as usize),
                    NodeIndex::new(to as usize),
                    None,
                );
                let (a, b) = (position(from), position(to));
                let after = a == b || has_path_connecting(&dag, a, b, None);
                prop_assert_eq!(before, after, "{} -> {}", from, to);
            }
        }
    }

    #[test]
    fn contraction_is_idempotent((n, edges) in arb_graph(30, 90)) {
        let mut graph = build(n, &edges);
        graph.merge_strongly_connected_components();
        let once = graph.summary();
        graph.merge_strongly_connected_components();
        prop_assert_eq!(graph.summary(), once);
    }

    #[test]
    fn contraction_is_deterministic((n, edges) in arb_graph(30, 90)) {
        let mut first = build(n, &edges);
        let mut second = build(n, &edges);
        first.merge_strongly_connected_components();
        second.merge_strongly_connected_components();
        prop_assert_eq!(first.summary(), second.summary());
    }

    #[test]
    fn self_loops_do_not_change_the_partition(
        (n, edges) in arb_graph(20, 50),
        looped in prop::collection::vec(any::<prop::sample::Index>(), 0..10),
    ) {
        let mut plain = build(n, &edges);
        let mut with_loops = build(n, &edges);
        for index in looped {
            let key = index.index(n as usize) as u32;
            with_loops.add_dependency(key, key);
        }
        plain.merge_strongly_connected_components();
        with_loops.merge_strongly_connected_components();
        prop_assert_eq!(labels(&plain), labels(&with_loops));
    }

    #[test]
    fn arbitrary_merges_keep_the_partition(
        (n, edges) in arb_graph(20, 40),
        groups in prop::collection::vec(
            prop::collection::vec(any::<prop::sample::Index>(), 1..4),
            0..8,
        ),
    ) {
        let mut graph = build(n, &edges);
        for group in groups {
            // Resolve keys to their current live nodes, as a client would.
            let nodes: Vec<NodeId> = group
                .iter()
                .map(|index| graph.find(&(index.index(n as usize) as u32)).unwrap())
                .collect();
            graph.merge_nodes(nodes);
            prop_assert_eq!(graph.verify(), Ok(()));
        }

        let covered: BTreeSet<u32> = graph
            .nodes()
            .flat_map(|node| node.label().iter().copied())
            .collect();
        prop_assert_eq!(covered, (0..n).collect::<BTreeSet<u32>>());
        let total: usize = graph.nodes().map(|node| node.label().len()).sum();
        prop_assert_eq!(total, n as usize);
    }

    #[test]
    fn compute_scc_covers_exactly_the_reachable_set(
        (n, edges) in arb_graph(30, 90),
        start in any::<prop::sample::Index>(),
    ) {
        let start = start.index(n as usize) as u32;
        let original = oracle(n, &edges);
        let components = compute_scc(start, |node: u32| {
            original
                .neighbors(NodeIndex::new(node as usize))
                .map(|ix| ix.index() as u32)
                .collect::<Vec<_>>()
        });

        let mut reachable = BTreeSet::new();
        let mut dfs = Dfs::new(&original, NodeIndex::new(start as usize));
        while let Some(ix) = dfs.next(&original) {
            reachable.insert(ix.index() as u32);
        }

        let emitted: Vec<u32> = components.iter().flatten().copied().collect();
        let unique: BTreeSet<u32> = emitted.iter().copied().collect();
        prop_assert_eq!(emitted.len(), unique.len());
        prop_assert_eq!(unique, reachable);

        // Reverse topological emission: an edge never points at a
        // component emitted later.
        let position = |node: u32| components.iter().position(|c| c.contains(&node)).unwrap();
        for &(from, to) in &edges {
            if components.iter().any(|c| c.contains(&from)) {
                prop_assert!(position(to) <= position(from));
            }
        }
    }
}
