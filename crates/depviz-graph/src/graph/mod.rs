//! Dependency graph representation
//!
//! A `DependencyGraph` maps every *explored* package to its direct
//! dependencies in discovery order. A name that shows up only inside some
//! dependency list was never explored (the depth bound stopped short of it);
//! it is an unexplored leaf, not a package without dependencies.

use std::collections::{HashMap, HashSet};
use std::fmt;

use indexmap::IndexMap;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};

use depviz_core::PackageName;

/// Explored packages and their direct dependencies.
///
/// Key order is BFS discovery order and only matters for deterministic
/// presentation. Order inside each dependency list is the order the package
/// source returned (minus filtered entries) and is preserved exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DependencyGraph {
    adjacency: IndexMap<PackageName, Vec<PackageName>>,
}

/// Node weight of the petgraph view used for DOT export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphNode {
    /// Package name
    pub name: PackageName,
    /// Whether the package's own dependencies were recorded
    pub explored: bool,
}

impl fmt::Display for GraphNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl DependencyGraph {
    /// Create a new empty dependency graph
    pub fn new() -> Self {
        Self {
            adjacency: IndexMap::new(),
        }
    }

    /// Record the dependency list of an explored package.
    ///
    /// Only the builder records; the first recording of a name wins.
    pub(crate) fn record(&mut self, name: PackageName, dependencies: Vec<PackageName>) {
        self.adjacency.entry(name).or_insert(dependencies);
    }

    /// Number of explored packages
    pub fn len(&self) -> usize {
        self.adjacency.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// Explored package names in discovery order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.adjacency.keys().map(String::as_str)
    }

    /// Explored packages with their dependency lists, in discovery order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[PackageName])> {
        self.adjacency
            .iter()
            .map(|(name, deps)| (name.as_str(), deps.as_slice()))
    }

    /// Direct dependencies of an explored package, `None` if it was never explored
    pub fn dependencies_of(&self, name: &str) -> Option<&[PackageName]> {
        self.adjacency.get(name).map(Vec::as_slice)
    }

    /// Whether `name` had its dependency list fetched and recorded
    pub fn is_explored(&self, name: &str) -> bool {
        self.adjacency.contains_key(name)
    }

    /// Total number of recorded dependency edges, including edges to leaves
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum()
    }

    /// Names referenced by some dependency list but never explored, in first-reference order
    pub fn unexplored_leaves(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.adjacency
            .values()
            .flatten()
            .map(String::as_str)
            .filter(|dep| !self.is_explored(dep) && seen.insert(*dep))
            .collect()
    }

    /// Build a petgraph view over explored packages and unexplored leaves
    pub fn to_petgraph(&self) -> DiGraph<GraphNode, ()> {
        let mut graph = DiGraph::new();
        let mut indices: HashMap<&str, NodeIndex> = HashMap::new();

        for name in self.keys() {
            let index = graph.add_node(GraphNode {
                name: name.to_string(),
                explored: true,
            });
            indices.insert(name, index);
        }

        for (name, deps) in self.iter() {
            let from = indices[name];
            for dep in deps {
                let to = *indices.entry(dep.as_str()).or_insert_with(|| {
                    graph.add_node(GraphNode {
                        name: dep.clone(),
                        explored: false,
                    })
                });
                graph.add_edge(from, to, ());
            }
        }

        graph
    }
}

impl<N, D> FromIterator<(N, Vec<D>)> for DependencyGraph
where
    N: Into<PackageName>,
    D: Into<PackageName>,
{
    fn from_iter<I: IntoIterator<Item = (N, Vec<D>)>>(iter: I) -> Self {
        let mut graph = DependencyGraph::new();
        for (name, deps) in iter {
            graph.record(name.into(), deps.into_iter().map(Into::into).collect());
        }
        graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain_with_leaf() -> DependencyGraph {
        DependencyGraph::from_iter([
            ("app", vec!["http", "log"]),
            ("http", vec!["log", "tls"]),
            ("log", vec![]),
        ])
    }

    #[test]
    fn test_dependency_graph_creation() {
        let graph = DependencyGraph::new();
        assert!(graph.is_empty());
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.unexplored_leaves().is_empty());
    }

    #[test]
    fn test_keys_keep_discovery_order() {
        let graph = chain_with_leaf();
        assert_eq!(graph.keys().collect::<Vec<_>>(), vec!["app", "http", "log"]);
        assert_eq!(graph.dependencies_of("http").unwrap(), ["log", "tls"]);
    }

    #[test]
    fn test_unexplored_leaf_is_not_a_key() {
        let graph = chain_with_leaf();

        assert!(!graph.is_explored("tls"));
        assert!(graph.dependencies_of("tls").is_none());
        assert_eq!(graph.unexplored_leaves(), vec!["tls"]);

        // An explored package without dependencies is different from a leaf
        assert!(graph.is_explored("log"));
        assert_eq!(graph.dependencies_of("log").unwrap().len(), 0);
    }

    #[test]
    fn test_first_recording_wins() {
        let mut graph = DependencyGraph::new();
        graph.record("a".to_string(), vec!["b".to_string()]);
        graph.record("a".to_string(), vec![]);
        assert_eq!(graph.dependencies_of("a").unwrap(), ["b"]);
    }

    #[test]
    fn test_edge_count_includes_leaf_edges() {
        assert_eq!(chain_with_leaf().edge_count(), 4);
    }

    #[test]
    fn test_to_petgraph() {
        let graph = chain_with_leaf();
        let view = graph.to_petgraph();

        assert_eq!(view.node_count(), 4);
        assert_eq!(view.edge_count(), 4);

        let leaf = view
            .node_weights()
            .find(|node| node.name == "tls")
            .unwrap();
        assert!(!leaf.explored);
    }

    #[test]
    fn test_serializes_as_ordered_map() {
        let graph = DependencyGraph::from_iter([("b", vec!["a"]), ("a", vec![])]);
        let json = serde_json::to_string(&graph).unwrap();
        assert_eq!(json, r#"{"b":["a"],"a":[]}"#);
    }
}
