//! depviz benchmarking suite
//!
//! Benchmarks for graph exploration, cycle detection, load-order computation
//! and test repository parsing over synthetic package ecosystems.

pub mod common;

pub use common::*;
