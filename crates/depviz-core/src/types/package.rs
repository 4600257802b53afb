//! Package identity.

/// Opaque, case-sensitive package identifier.
///
/// Equality is exact string equality: `Lodash` and `lodash` are different
/// packages as far as graph exploration is concerned.
pub type PackageName = String;

/// Check whether a name can be handed to a package source at all.
///
/// This is deliberately loose: registries, fixtures and manifests accept
/// very different alphabets, so only names that could never identify a
/// package anywhere are rejected.
pub fn is_valid_name(name: &str) -> bool {
    let trimmed = name.trim();
    !trimmed.is_empty() && trimmed.len() == name.len() && !name.chars().any(char::is_control)
}
