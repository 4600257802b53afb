//! Breadth-first graph construction
//!
//! Explores the dependency relation level by level from a root package,
//! asking a `PackageSource` for each package's direct dependencies exactly
//! once. A visited set keeps diamond and cyclic dependencies from being
//! scheduled twice, and the depth bound caps how far expansion goes.

use std::collections::{HashSet, VecDeque};

use tracing::{debug, trace};

use depviz_core::{PackageName, PackageSource};

use crate::graph::DependencyGraph;

/// Depth-bounded, optionally filtered breadth-first explorer.
///
/// The builder only holds options. Every `build` call starts from a fresh
/// graph and visited set, so one builder can be reused across roots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphBuilder {
    /// Deepest level whose packages are still expanded is `max_depth - 1`
    max_depth: usize,
    /// Dependencies whose name contains this substring are dropped
    filter: Option<String>,
}

impl GraphBuilder {
    /// Create a builder that expands packages at depths `0..max_depth`
    pub fn new(max_depth: usize) -> Self {
        Self {
            max_depth,
            filter: None,
        }
    }

    /// Exclude every dependency whose name contains `filter` (case-sensitive).
    ///
    /// An empty filter excludes nothing.
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        let filter = filter.into();
        self.filter = if filter.is_empty() { None } else { Some(filter) };
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    /// Explore the dependencies of `root` breadth-first.
    ///
    /// Every dequeued package becomes a key of the result, including packages
    /// at the depth boundary. Their dependencies are recorded but only
    /// scheduled for exploration while `depth < max_depth`.
    pub async fn build<S>(&self, root: &str, source: &S) -> DependencyGraph
    where
        S: PackageSource,
    {
        let mut graph = DependencyGraph::new();
        let mut queue: VecDeque<(PackageName, usize)> = VecDeque::new();
        let mut visited: HashSet<PackageName> = HashSet::new();

        queue.push_back((root.to_string(), 0));
        visited.insert(root.to_string());

        while let Some((name, depth)) = queue.pop_front() {
            let dependencies = self.direct_dependencies(&name, source).await;
            debug!(
                package = %name,
                depth,
                dependencies = dependencies.len(),
                "Explored package"
            );

            if depth < self.max_depth {
                for dependency in &dependencies {
                    if visited.insert(dependency.clone()) {
                        trace!(package = %dependency, depth = depth + 1, "Scheduling dependency");
                        queue.push_back((dependency.clone(), depth + 1));
                    }
                }
            } else {
                trace!(package = %name, depth, "Depth bound reached, not expanding");
            }

            graph.record(name, dependencies);
        }

        debug!(
            root,
            packages = graph.len(),
            edges = graph.edge_count(),
            "Dependency graph complete"
        );
        graph
    }

    /// Filtered direct dependencies of a single package, without exploring further
    pub async fn direct_dependencies<S>(&self, name: &str, source: &S) -> Vec<PackageName>
    where
        S: PackageSource,
    {
        let raw = source.direct_dependencies(name).await;
        self.apply_filter(raw)
    }

    /// Drop filtered names while keeping the source's order
    fn apply_filter(&self, dependencies: Vec<PackageName>) -> Vec<PackageName> {
        match self.filter.as_deref() {
            Some(filter) => dependencies
                .into_iter()
                .filter(|dependency| {
                    let excluded = dependency.contains(filter);
                    if excluded {
                        trace!(package = %dependency, filter, "Filtered out dependency");
                    }
                    !excluded
                })
                .collect(),
            None => dependencies,
        }
    }
}
