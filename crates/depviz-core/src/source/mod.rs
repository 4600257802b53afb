//! The direct-dependency lookup contract.
//!
//! Every backend (HTTP registry, manifest tree, test fixture) answers the same
//! question: "what does this package directly depend on?". Failures are never
//! surfaced through this trait. A backend that cannot answer returns an empty
//! list, so graph exploration always terminates.

use crate::types::PackageName;

/// A provider of direct dependency lists.
///
/// Implementations must return dependencies in their natural declaration
/// order; graph builders preserve that order for rendering.
#[allow(async_fn_in_trait)]
pub trait PackageSource {
    /// Direct dependencies of `name`, in declaration order.
    ///
    /// Returns an empty list both for packages with no dependencies and for
    /// packages whose lookup failed.
    async fn direct_dependencies(&self, name: &str) -> Vec<PackageName>;
}

impl<S: PackageSource> PackageSource for &S {
    async fn direct_dependencies(&self, name: &str) -> Vec<PackageName> {
        (**self).direct_dependencies(name).await
    }
}
