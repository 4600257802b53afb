//! Cycle detection over explored packages
//!
//! A depth-first walk from every not-yet-visited key tracks the current path.
//! Reaching a package that is still on that path closes a cycle. The same loop
//! is found once per entry point, so cycles are deduplicated by their set of
//! participants. Edges into unexplored leaves are never followed: a leaf has
//! no recorded dependencies and cannot close a loop.

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use serde::Serialize;
use tracing::debug;

use depviz_core::PackageName;

use crate::graph::DependencyGraph;

/// A closed dependency walk: each member depends on the next, the last on the first
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Cycle {
    members: Vec<PackageName>,
}

impl Cycle {
    /// Members in walk order, starting where the cycle was entered
    pub fn members(&self) -> &[PackageName] {
        &self.members
    }

    /// The distinct packages taking part, independent of start and direction
    pub fn participants(&self) -> BTreeSet<&str> {
        self.members.iter().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.members.iter().any(|member| member == name)
    }
}

impl fmt::Display for Cycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_cycle(&self.members))
    }
}

/// Format cycle as "a -> b -> c -> a"
pub fn format_cycle(members: &[PackageName]) -> String {
    match members.first() {
        None => "No cycle".to_string(),
        Some(first) => {
            let mut closed: Vec<&str> = members.iter().map(String::as_str).collect();
            closed.push(first);
            closed.join(" -> ")
        }
    }
}

/// Find every distinct cycle among explored packages, in discovery order.
///
/// Each key roots a depth-first exploration at most once overall, so the
/// traversal is linear in the number of recorded edges.
pub fn find_cycles(graph: &DependencyGraph) -> Vec<Cycle> {
    let mut cycles = Vec::new();
    let mut seen_participants: HashSet<BTreeSet<&str>> = HashSet::new();

    let mut visited: HashSet<&str> = HashSet::new();
    let mut on_path: HashSet<&str> = HashSet::new();
    let mut path: Vec<&str> = Vec::new();
    // (package, index of the next dependency to look at)
    let mut frames: Vec<(&str, usize)> = Vec::new();

    for start in graph.keys() {
        if !visited.insert(start) {
            continue;
        }
        on_path.insert(start);
        path.push(start);
        frames.push((start, 0));

        while let Some((node, cursor)) = frames.last().copied() {
            let dependencies = graph.dependencies_of(node).unwrap_or(&[]);

            let Some(next) = dependencies.get(cursor).map(String::as_str) else {
                frames.pop();
                path.pop();
                on_path.remove(node);
                continue;
            };
            if let Some(frame) = frames.last_mut() {
                frame.1 += 1;
            }

            if on_path.contains(next) {
                let entry = path.iter().position(|member| *member == next).unwrap_or(0);
                let members = &path[entry..];
                let participants: BTreeSet<&str> = members.iter().copied().collect();

                if seen_participants.insert(participants) {
                    debug!(cycle = %members.join(" -> "), "Found dependency cycle");
                    cycles.push(Cycle {
                        members: members.iter().map(|m| m.to_string()).collect(),
                    });
                }
            } else if graph.is_explored(next) && visited.insert(next) {
                on_path.insert(next);
                path.push(next);
                frames.push((next, 0));
            }
        }
    }

    cycles
}
