//! Load order computation
//!
//! A depth-first post-order walk from the start package emits every package
//! only after the packages it depends on. On an acyclic graph this satisfies
//! every recorded edge. Inside a cycle no linear order can satisfy every edge;
//! the walk still terminates and still lists each reachable package once.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::debug;

use depviz_core::PackageName;

use crate::graph::DependencyGraph;

/// Explored packages reachable from a start package, dependencies first
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadOrder {
    start: PackageName,
    order: Vec<PackageName>,
}

impl LoadOrder {
    /// The package the walk started from
    pub fn start(&self) -> &str {
        &self.start
    }

    pub fn as_slice(&self) -> &[PackageName] {
        &self.order
    }

    pub fn into_vec(self) -> Vec<PackageName> {
        self.order
    }

    /// Number of reachable explored packages
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Zero-based position of `name` in the order
    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.order.iter().position(|entry| entry == name)
    }

    /// Zero-based position of the start package
    pub fn start_position(&self) -> Option<usize> {
        self.position_of(&self.start)
    }

    /// Recorded edges `(dependent, dependency)` the order does not respect.
    ///
    /// Always empty for acyclic graphs; on cyclic graphs it names the edges
    /// that had to be broken.
    pub fn violations(&self, graph: &DependencyGraph) -> Vec<(PackageName, PackageName)> {
        let positions: HashMap<&str, usize> = self
            .order
            .iter()
            .enumerate()
            .map(|(index, name)| (name.as_str(), index))
            .collect();

        let mut violations = Vec::new();
        for (index, name) in self.order.iter().enumerate() {
            for dependency in graph.dependencies_of(name).unwrap_or(&[]) {
                if let Some(&dep_index) = positions.get(dependency.as_str()) {
                    if dep_index > index {
                        violations.push((name.clone(), dependency.clone()));
                    }
                }
            }
        }
        violations
    }
}

/// Compute a dependencies-first order of every explored package reachable from `start`.
///
/// A start package that was never explored yields an empty order. Dependencies
/// on unexplored leaves are skipped.
pub fn load_order(graph: &DependencyGraph, start: &str) -> LoadOrder {
    let mut order = Vec::new();

    if graph.is_explored(start) {
        let mut visited: HashSet<&str> = HashSet::new();
        // (package, index of the next dependency to look at)
        let mut frames: Vec<(&str, usize)> = Vec::new();

        if let Some(start) = graph.keys().find(|key| *key == start) {
            visited.insert(start);
            frames.push((start, 0));
        }

        while let Some((node, cursor)) = frames.last().copied() {
            let dependencies = graph.dependencies_of(node).unwrap_or(&[]);

            match dependencies.get(cursor) {
                Some(dependency) => {
                    if let Some(frame) = frames.last_mut() {
                        frame.1 += 1;
                    }
                    let dependency = dependency.as_str();
                    if graph.is_explored(dependency) && visited.insert(dependency) {
                        frames.push((dependency, 0));
                    }
                }
                None => {
                    frames.pop();
                    order.push(node.to_string());
                }
            }
        }
    }

    debug!(start, packages = order.len(), "Computed load order");
    LoadOrder {
        start: start.to_string(),
        order,
    }
}

/// Differences between a computed order and an externally supplied one.
///
/// This is a diagnostic. Agreement does not mean the two tools behave the
/// same, and disagreement on independent packages is expected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OrderComparison {
    /// Names present in both orders, in computed order
    pub common: Vec<PackageName>,
    /// Names only the computed order contains
    pub only_computed: Vec<PackageName>,
    /// Names only the reference order contains
    pub only_reference: Vec<PackageName>,
    /// Pairs `(a, b)` where the computed order puts `a` first but the reference puts `b` first
    pub inversions: Vec<(PackageName, PackageName)>,
}

impl OrderComparison {
    /// Both orders list the same packages in the same relative order
    pub fn is_consistent(&self) -> bool {
        self.only_computed.is_empty() && self.only_reference.is_empty() && self.inversions.is_empty()
    }
}

/// Compare a computed load order against a reference order.
///
/// Duplicate names in either input count at their first occurrence.
pub fn compare_with_reference(computed: &[PackageName], reference: &[PackageName]) -> OrderComparison {
    let reference_positions = first_positions(reference);
    let computed_positions = first_positions(computed);

    let mut comparison = OrderComparison::default();
    for (name, _) in ordered_unique(computed) {
        if reference_positions.contains_key(name) {
            comparison.common.push(name.to_string());
        } else {
            comparison.only_computed.push(name.to_string());
        }
    }
    for (name, _) in ordered_unique(reference) {
        if !computed_positions.contains_key(name) {
            comparison.only_reference.push(name.to_string());
        }
    }

    for (i, first) in comparison.common.iter().enumerate() {
        for second in &comparison.common[i + 1..] {
            if reference_positions[first.as_str()] > reference_positions[second.as_str()] {
                comparison.inversions.push((first.clone(), second.clone()));
            }
        }
    }

    comparison
}

fn first_positions(names: &[PackageName]) -> HashMap<&str, usize> {
    let mut positions = HashMap::new();
    for (index, name) in names.iter().enumerate() {
        positions.entry(name.as_str()).or_insert(index);
    }
    positions
}

fn ordered_unique(names: &[PackageName]) -> impl Iterator<Item = (&str, usize)> {
    let mut seen = HashSet::new();
    names
        .iter()
        .enumerate()
        .filter(move |&(_, name)| seen.insert(name.as_str()))
        .map(|(index, name)| (name.as_str(), index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn graph(edges: &[(&str, &[&str])]) -> DependencyGraph {
        edges
            .iter()
            .map(|(name, deps)| (*name, deps.to_vec()))
            .collect()
    }

    fn names(items: &[&str]) -> Vec<PackageName> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn diamond() -> DependencyGraph {
        graph(&[
            ("A", &["B", "C"]),
            ("B", &["D"]),
            ("C", &["D"]),
            ("D", &[]),
        ])
    }

    #[test]
    fn test_diamond_order_respects_edges() {
        let graph = diamond();
        let order = load_order(&graph, "A");

        assert_eq!(order.as_slice(), ["D", "B", "C", "A"]);
        assert_eq!(order.len(), 4);
        assert_eq!(order.start_position(), Some(3));
        assert!(order.violations(&graph).is_empty());
    }

    #[test]
    fn test_only_reachable_packages_are_listed() {
        let graph = diamond();
        let order = load_order(&graph, "B");

        assert_eq!(order.as_slice(), ["D", "B"]);
        assert_eq!(order.start(), "B");
    }

    #[test]
    fn test_unexplored_leaves_are_skipped() {
        let graph = graph(&[("A", &["B", "leaf"]), ("B", &["leaf"])]);
        let order = load_order(&graph, "A");

        assert_eq!(order.as_slice(), ["B", "A"]);
        assert_eq!(order.position_of("leaf"), None);
    }

    #[test]
    fn test_unknown_start_yields_empty_order() {
        let order = load_order(&diamond(), "missing");

        assert!(order.is_empty());
        assert_eq!(order.start_position(), None);
    }

    #[test]
    fn test_cycle_terminates_with_full_coverage() {
        let graph = graph(&[("A", &["B"]), ("B", &["C"]), ("C", &["A"])]);
        let order = load_order(&graph, "A");

        assert_eq!(order.as_slice(), ["C", "B", "A"]);
        // Only the edge back into the cycle entry can be broken
        assert_eq!(order.violations(&graph), vec![("C".to_string(), "A".to_string())]);
    }

    #[test]
    fn test_self_dependency() {
        let graph = graph(&[("A", &["A"])]);
        let order = load_order(&graph, "A");

        assert_eq!(order.as_slice(), ["A"]);
        assert!(order.violations(&graph).is_empty());
    }

    #[test]
    fn test_long_chain_does_not_recurse() {
        let chain: Vec<(String, Vec<String>)> = (0..100_000)
            .map(|i| (format!("p{}", i), vec![format!("p{}", i + 1)]))
            .collect();
        let graph: DependencyGraph = chain.into_iter().collect();

        let order = load_order(&graph, "p0");

        assert_eq!(order.len(), 100_000);
        assert_eq!(order.as_slice()[0], "p99999");
        assert_eq!(order.start_position(), Some(99_999));
    }

    #[test]
    fn test_compare_identical_orders() {
        let computed = names(&["D", "B", "C", "A"]);
        let comparison = compare_with_reference(&computed, &computed);

        assert!(comparison.is_consistent());
        assert_eq!(comparison.common, computed);
    }

    #[test]
    fn test_compare_reports_differences() {
        let computed = names(&["D", "B", "C", "A"]);
        let reference = names(&["D", "C", "B", "A", "E"]);

        let comparison = compare_with_reference(&computed, &reference);

        assert!(!comparison.is_consistent());
        assert_eq!(comparison.only_reference, names(&["E"]));
        assert!(comparison.only_computed.is_empty());
        assert_eq!(
            comparison.inversions,
            vec![("B".to_string(), "C".to_string())]
        );
    }

    #[test]
    fn test_compare_ignores_duplicates() {
        let computed = names(&["a", "b"]);
        let reference = names(&["a", "b", "a"]);

        let comparison = compare_with_reference(&computed, &reference);

        assert!(comparison.is_consistent());
    }

    proptest! {
        #[test]
        fn load_order_is_valid_on_dags(
            num_packages in 1usize..8,
            edges in prop::collection::vec((0usize..8, 0usize..8), 0..20)
        ) {
            // Only forward edges, so the graph is acyclic
            let mut adjacency: Vec<(String, Vec<String>)> =
                (0..num_packages).map(|i| (format!("pkg{}", i), Vec::new())).collect();
            for (from, to) in edges {
                if from < to && to < num_packages {
                    adjacency[from].1.push(format!("pkg{}", to));
                }
            }
            let graph: DependencyGraph = adjacency.into_iter().collect();

            let order = load_order(&graph, "pkg0");

            prop_assert!(order.violations(&graph).is_empty());
            let unique: HashSet<_> = order.iter().collect();
            prop_assert_eq!(unique.len(), order.len());
            prop_assert_eq!(order.start_position(), Some(order.len() - 1));
        }

        #[test]
        fn load_order_covers_reachable_keys_on_any_graph(
            edges in prop::collection::vec((0usize..6, 0usize..6), 0..16)
        ) {
            let mut adjacency: Vec<(String, Vec<String>)> =
                (0..6).map(|i| (format!("pkg{}", i), Vec::new())).collect();
            for (from, to) in edges {
                adjacency[from].1.push(format!("pkg{}", to));
            }
            let graph: DependencyGraph = adjacency.into_iter().collect();

            let order = load_order(&graph, "pkg0");

            let mut reachable = HashSet::from(["pkg0"]);
            let mut stack = vec!["pkg0"];
            while let Some(node) = stack.pop() {
                for dep in graph.dependencies_of(node).unwrap() {
                    if reachable.insert(dep.as_str()) {
                        stack.push(dep.as_str());
                    }
                }
            }

            let listed: HashSet<_> = order.iter().collect();
            prop_assert_eq!(listed.len(), order.len());
            prop_assert_eq!(listed, reachable);
        }
    }
}
