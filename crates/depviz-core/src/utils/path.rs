//! Path utilities for walking on-disk package trees.
//!
//! Package names come from untrusted manifests. Before a name is turned into a
//! directory under `node_modules` it must not be able to climb out of the tree.

use crate::error::{DepvizError, DepvizResult};
use std::path::{Component, Path, PathBuf};

/// Normalize a path by resolving . and .. components
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut components = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {},
            Component::ParentDir => {
                // A leading .. is kept so the caller can still see the escape
                if components.is_empty() {
                    components.push(component);
                } else {
                    components.pop();
                }
            },
            other => components.push(other),
        }
    }

    components.iter().collect()
}

/// Check if a relative path stays inside its base directory
pub fn is_safe_path(path: &Path) -> bool {
    if path.is_absolute() {
        return false;
    }

    let mut depth = 0i32;

    for component in path.components() {
        match component {
            Component::CurDir => {},
            Component::ParentDir => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            },
            Component::Normal(_) => depth += 1,
            _ => return false,
        }
    }

    true
}

/// Directory of an installed package inside `root/node_modules`.
///
/// Scoped names (`@org/pkg`) map to nested directories just like npm lays
/// them out.
pub fn installed_package_dir(root: &Path, name: &str) -> DepvizResult<PathBuf> {
    let relative = Path::new(name);
    if name.is_empty() || !is_safe_path(relative) {
        return Err(DepvizError::PathTraversal {
            path: name.to_string(),
        });
    }

    Ok(root.join("node_modules").join(normalize_path(relative)))
}

/// Get the file extension as a lowercase string
pub fn get_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}
