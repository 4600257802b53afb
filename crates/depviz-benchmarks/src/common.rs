//! Common utilities for benchmarks

use criterion::Criterion;
use depviz_core::{PackageName, PackageSource};
use depviz_graph::DependencyGraph;
use indexmap::IndexMap;
use pprof::criterion::{Output, PProfProfiler};

/// Configure criterion with flamegraph profiling support
pub fn criterion_config() -> Criterion {
    Criterion::default()
        .warm_up_time(std::time::Duration::from_secs(3))
        .measurement_time(std::time::Duration::from_secs(10))
        .sample_size(100)
        .with_profiler(PProfProfiler::new(100, Output::Flamegraph(None)))
}

/// In-memory package source over a synthetic ecosystem
#[derive(Debug, Clone, Default)]
pub struct SyntheticSource {
    packages: IndexMap<PackageName, Vec<PackageName>>,
}

impl SyntheticSource {
    /// Layered ecosystem of `size` packages named `pkg-0` .. `pkg-{size-1}`.
    ///
    /// Package `i` depends on up to `fanout` packages with higher indices, so
    /// the graph is acyclic and `pkg-0` reaches everything.
    pub fn layered(size: usize, fanout: usize) -> Self {
        let packages = (0..size)
            .map(|i| {
                let deps = (1..=fanout)
                    .map(|step| i * fanout + step)
                    .filter(|&j| j < size)
                    .map(package_name)
                    .collect();
                (package_name(i), deps)
            })
            .collect();
        Self { packages }
    }

    /// Same as [`SyntheticSource::layered`], plus an edge from every leaf back to
    /// the root so the graph is full of cycles.
    pub fn cyclic(size: usize, fanout: usize) -> Self {
        let mut source = Self::layered(size, fanout);
        let root = package_name(0);
        for deps in source.packages.values_mut() {
            if deps.is_empty() {
                deps.push(root.clone());
            }
        }
        source
    }

    /// The whole ecosystem as an already explored graph
    pub fn to_graph(&self) -> DependencyGraph {
        self.packages
            .iter()
            .map(|(name, deps)| (name.clone(), deps.clone()))
            .collect()
    }

    /// The ecosystem rendered in the line-oriented test repository format
    pub fn to_repository_text(&self) -> String {
        let mut text = String::from("# synthetic ecosystem\n");
        for (name, deps) in &self.packages {
            if deps.is_empty() {
                text.push_str(name);
            } else {
                text.push_str(&format!("{}: {}", name, deps.join(", ")));
            }
            text.push('\n');
        }
        text
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

impl PackageSource for SyntheticSource {
    async fn direct_dependencies(&self, name: &str) -> Vec<PackageName> {
        self.packages.get(name).cloned().unwrap_or_default()
    }
}

/// Name of the `index`th synthetic package
pub fn package_name(index: usize) -> PackageName {
    format!("pkg-{}", index)
}

/// Runtime for driving async exploration inside benchmarks
pub fn bench_runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("Failed to create benchmark runtime")
}
