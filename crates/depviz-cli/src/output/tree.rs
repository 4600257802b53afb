//! ASCII dependency tree.
//!
//! Children appear in recorded order. A package is expanded the first time it
//! is printed; later occurrences, including back-references inside a cycle,
//! are marked `(*)`. Names that were referenced but never explored are marked
//! `(not explored)`.

use std::collections::HashSet;
use std::fmt::Write;

use depviz_graph::DependencyGraph;

const REPEAT_MARKER: &str = " (*)";
const LEAF_MARKER: &str = " (not explored)";

struct Line<'a> {
    name: &'a str,
    prefix: String,
    last: bool,
    root: bool,
}

/// Render the tree below `root`
pub fn render_tree(graph: &DependencyGraph, root: &str) -> String {
    let mut out = String::new();
    let mut expanded: HashSet<&str> = HashSet::new();
    let mut stack = vec![Line {
        name: root,
        prefix: String::new(),
        last: true,
        root: true,
    }];

    while let Some(line) = stack.pop() {
        let connector = match (line.root, line.last) {
            (true, _) => "",
            (false, true) => "└── ",
            (false, false) => "├── ",
        };

        let marker = match graph.dependencies_of(line.name) {
            None => LEAF_MARKER,
            Some(_) if !expanded.insert(line.name) => REPEAT_MARKER,
            Some(dependencies) => {
                let child_prefix = match (line.root, line.last) {
                    (true, _) => String::new(),
                    (false, true) => format!("{}    ", line.prefix),
                    (false, false) => format!("{}│   ", line.prefix),
                };
                let count = dependencies.len();
                // Reversed so the first dependency is popped first
                for (index, dependency) in dependencies.iter().enumerate().rev() {
                    stack.push(Line {
                        name: dependency,
                        prefix: child_prefix.clone(),
                        last: index + 1 == count,
                        root: false,
                    });
                }
                ""
            }
        };

        let _ = writeln!(out, "{}{}{}{}", line.prefix, connector, line.name, marker);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(edges: &[(&str, &[&str])]) -> DependencyGraph {
        edges.iter().map(|(name, deps)| (*name, deps.to_vec())).collect()
    }

    #[test]
    fn test_diamond_tree() {
        let graph = graph(&[
            ("A", &["B", "C"]),
            ("B", &["D"]),
            ("C", &["D", "E"]),
            ("D", &[]),
        ]);

        let expected = "\
A
├── B
│   └── D
└── C
    ├── D (*)
    └── E (not explored)
";
        assert_eq!(render_tree(&graph, "A"), expected);
    }

    #[test]
    fn test_cycle_back_reference_is_marked() {
        let graph = graph(&[("A", &["B"]), ("B", &["A"])]);

        assert_eq!(render_tree(&graph, "A"), "A\n└── B\n    └── A (*)\n");
    }

    #[test]
    fn test_unexplored_root() {
        let graph = DependencyGraph::new();
        assert_eq!(render_tree(&graph, "ghost"), "ghost (not explored)\n");
    }
}
