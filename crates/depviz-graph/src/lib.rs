//! Dependency graph exploration engine for depviz
//!
//! This crate explores the transitive dependencies of a package breadth-first
//! under a depth bound, then analyzes the resulting graph: it finds every
//! distinct dependency cycle and computes a load order in which dependencies
//! come before their dependents.
//!
//! The graph is built once and never mutated afterwards; cycle detection and
//! load-order computation are independent read-only passes over it.

pub mod builder;
pub mod cycles;
pub mod graph;
pub mod order;

// Re-export main types
pub use builder::GraphBuilder;
pub use cycles::{find_cycles, format_cycle, Cycle};
pub use graph::{DependencyGraph, GraphNode};
pub use order::{compare_with_reference, load_order, LoadOrder, OrderComparison};
