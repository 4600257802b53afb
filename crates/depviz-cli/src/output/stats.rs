//! Graph statistics

use std::collections::{HashMap, VecDeque};
use std::fmt;

use serde::Serialize;

use depviz_graph::DependencyGraph;

/// Summary numbers for one explored graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphStats {
    pub root: String,
    /// Packages whose dependencies were recorded
    pub explored: usize,
    /// Referenced packages that were never explored
    pub unexplored: usize,
    pub edges: usize,
    /// Longest shortest-path distance from the root
    pub depth: usize,
    /// Package with the most direct dependencies
    pub widest: Option<(String, usize)>,
    /// Package the most explored packages depend on
    pub most_depended_on: Option<(String, usize)>,
    pub cycles: usize,
}

impl GraphStats {
    pub fn collect(graph: &DependencyGraph, root: &str, cycles: usize) -> Self {
        let widest = graph
            .iter()
            .filter(|(_, deps)| !deps.is_empty())
            .fold(None::<(&str, usize)>, |best, (name, deps)| match best {
                Some((_, count)) if count >= deps.len() => best,
                _ => Some((name, deps.len())),
            })
            .map(|(name, count)| (name.to_string(), count));

        let mut dependents: HashMap<&str, usize> = HashMap::new();
        let mut first_seen: Vec<&str> = Vec::new();
        for (_, deps) in graph.iter() {
            for dep in deps {
                let count = dependents.entry(dep.as_str()).or_insert(0);
                if *count == 0 {
                    first_seen.push(dep.as_str());
                }
                *count += 1;
            }
        }
        let most_depended_on = first_seen
            .into_iter()
            .fold(None::<(&str, usize)>, |best, name| {
                let count = dependents[name];
                match best {
                    Some((_, top)) if top >= count => best,
                    _ => Some((name, count)),
                }
            })
            .map(|(name, count)| (name.to_string(), count));

        Self {
            root: root.to_string(),
            explored: graph.len(),
            unexplored: graph.unexplored_leaves().len(),
            edges: graph.edge_count(),
            depth: depth_from(graph, root),
            widest,
            most_depended_on,
            cycles,
        }
    }
}

fn depth_from(graph: &DependencyGraph, root: &str) -> usize {
    let mut distances: HashMap<&str, usize> = HashMap::new();
    let mut queue = VecDeque::new();

    if let Some(root) = graph.keys().find(|key| *key == root) {
        distances.insert(root, 0);
        queue.push_back(root);
    }

    let mut deepest = 0;
    while let Some(node) = queue.pop_front() {
        let distance = distances[node];
        deepest = deepest.max(distance);
        for dep in graph.dependencies_of(node).unwrap_or(&[]) {
            if !distances.contains_key(dep.as_str()) {
                distances.insert(dep.as_str(), distance + 1);
                queue.push_back(dep.as_str());
            }
        }
    }
    deepest
}

impl fmt::Display for GraphStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Statistics for {}:", self.root)?;
        writeln!(f, "  explored packages   : {}", self.explored)?;
        writeln!(f, "  unexplored packages : {}", self.unexplored)?;
        writeln!(f, "  dependency edges    : {}", self.edges)?;
        writeln!(f, "  depth reached       : {}", self.depth)?;
        if let Some((name, count)) = &self.widest {
            writeln!(f, "  most dependencies   : {} ({})", name, count)?;
        }
        if let Some((name, count)) = &self.most_depended_on {
            writeln!(f, "  most depended on    : {} ({})", name, count)?;
        }
        write!(f, "  cycles              : {}", self.cycles)
    }
}
