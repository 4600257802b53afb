//! Test repository files
//!
//! A test repository describes a whole dependency relation in one file so the
//! explorer can be exercised without a network. Two layouts are accepted:
//!
//! ```text
//! # text (also covers simple YAML)      // JSON
//! A: B, C                               { "A": ["B", "C"],
//! B: [D]                                  "B": ["D"],
//! C:                                      "C": [] }
//!   - D
//! D
//! ```
//!
//! The whole file is parsed up front. A malformed file is a configuration
//! error; once loaded, lookups never fail.

use std::path::{Path, PathBuf};

use indexmap::map::Entry;
use indexmap::IndexMap;
use tracing::debug;

use depviz_core::error::DepvizError;
use depviz_core::utils::get_extension;
use depviz_core::{PackageName, PackageSource};

use crate::RegistryResult;

/// In-memory dependency relation loaded from a test repository file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixtureSource {
    packages: IndexMap<PackageName, Vec<PackageName>>,
}

impl FixtureSource {
    /// Load a test repository, choosing the layout from the file extension
    pub async fn load(path: impl AsRef<Path>) -> RegistryResult<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| DepvizError::io(format!("Failed to read {}", path.display()), e))?;

        let source = match get_extension(path).as_deref() {
            Some("json") => Self::from_json(&content, path)?,
            _ => Self::from_text(&content, path)?,
        };
        debug!(path = %path.display(), packages = source.len(), "Loaded test repository");
        Ok(source)
    }

    /// Parse the JSON layout: an object of name to array of names
    pub fn from_json(content: &str, path: &Path) -> RegistryResult<Self> {
        let packages: IndexMap<PackageName, Vec<PackageName>> = serde_json::from_str(content)
            .map_err(|e| DepvizError::FixtureParse {
                path: path.display().to_string(),
                line: e.line(),
                message: e.to_string(),
            })?;
        Ok(Self { packages })
    }

    /// Parse the line layout
    pub fn from_text(content: &str, path: &Path) -> RegistryResult<Self> {
        let mut packages: IndexMap<PackageName, Vec<PackageName>> = IndexMap::new();
        let mut current: Option<PackageName> = None;

        for (index, raw_line) in content.lines().enumerate() {
            let line_number = index + 1;
            let line = strip_comment(raw_line).trim();
            if line.is_empty() {
                continue;
            }

            if let Some(item) = line.strip_prefix('-') {
                let owner = current.as_ref().ok_or_else(|| {
                    parse_error(path, line_number, "list item without a package above it")
                })?;
                let dependency = unquote(item.trim());
                if dependency.is_empty() {
                    return Err(parse_error(path, line_number, "empty list item"));
                }
                packages
                    .entry(owner.clone())
                    .or_default()
                    .push(dependency.to_string());
                continue;
            }

            let (name, rest) = match line.split_once(':') {
                Some((name, rest)) => (unquote(name.trim()), rest),
                None => (unquote(line), ""),
            };
            if name.is_empty() {
                return Err(parse_error(path, line_number, "missing package name"));
            }
            if name.chars().any(char::is_whitespace) {
                return Err(parse_error(
                    path,
                    line_number,
                    &format!("package name '{}' contains whitespace", name),
                ));
            }

            match packages.entry(name.to_string()) {
                Entry::Occupied(_) => {
                    return Err(parse_error(
                        path,
                        line_number,
                        &format!("package '{}' is listed twice", name),
                    ));
                }
                Entry::Vacant(slot) => {
                    slot.insert(split_dependencies(rest));
                }
            }
            current = Some(name.to_string());
        }

        Ok(Self { packages })
    }

    /// Number of packages described by the file
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.packages.contains_key(name)
    }

    /// Package names in file order
    pub fn package_names(&self) -> impl Iterator<Item = &str> {
        self.packages.keys().map(String::as_str)
    }
}

impl<N, D> FromIterator<(N, Vec<D>)> for FixtureSource
where
    N: Into<PackageName>,
    D: Into<PackageName>,
{
    fn from_iter<I: IntoIterator<Item = (N, Vec<D>)>>(iter: I) -> Self {
        Self {
            packages: iter
                .into_iter()
                .map(|(name, deps)| (name.into(), deps.into_iter().map(Into::into).collect()))
                .collect(),
        }
    }
}

impl PackageSource for FixtureSource {
    async fn direct_dependencies(&self, name: &str) -> Vec<PackageName> {
        self.packages.get(name).cloned().unwrap_or_default()
    }
}

fn strip_comment(line: &str) -> &str {
    line.split_once('#').map_or(line, |(before, _)| before)
}

fn unquote(value: &str) -> &str {
    value.trim_matches(|c| c == '"' || c == '\'')
}

/// Split `B, C`, `B C` or `[B, C]` into names
fn split_dependencies(rest: &str) -> Vec<PackageName> {
    rest.trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .split(|c: char| c == ',' || c.is_whitespace())
        .map(unquote)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_error(path: &Path, line: usize, message: &str) -> DepvizError {
    DepvizError::FixtureParse {
        path: PathBuf::from(path).display().to_string(),
        line,
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn text(content: &str) -> RegistryResult<FixtureSource> {
        FixtureSource::from_text(content, Path::new("repo.txt"))
    }

    #[tokio::test]
    async fn test_text_layout() {
        let source = text(
            "# sample repository\n\
             A: B, C\n\
             B: D E   # trailing comment\n\
             C:\n\
             D\n",
        )
        .unwrap();

        assert_eq!(source.package_names().collect::<Vec<_>>(), vec!["A", "B", "C", "D"]);
        assert_eq!(source.direct_dependencies("A").await, vec!["B", "C"]);
        assert_eq!(source.direct_dependencies("B").await, vec!["D", "E"]);
        assert!(source.direct_dependencies("C").await.is_empty());
        assert!(source.direct_dependencies("D").await.is_empty());
        assert!(source.direct_dependencies("E").await.is_empty());
    }

    #[tokio::test]
    async fn test_simple_yaml_layout() {
        let source = text(
            "A: [B, C]\n\
             B:\n\
             \x20 - \"D\"\n\
             \x20 - E\n\
             C: []\n",
        )
        .unwrap();

        assert_eq!(source.direct_dependencies("A").await, vec!["B", "C"]);
        assert_eq!(source.direct_dependencies("B").await, vec!["D", "E"]);
        assert!(source.direct_dependencies("C").await.is_empty());
    }

    #[test]
    fn test_text_errors_carry_line_numbers() {
        match text("A: B\n\n: C\n") {
            Err(DepvizError::FixtureParse { line, .. }) => assert_eq!(line, 3),
            other => panic!("Expected FixtureParse error, got {:?}", other),
        }

        assert!(matches!(
            text("- B\n"),
            Err(DepvizError::FixtureParse { line: 1, .. })
        ));
        assert!(matches!(
            text("A: B\nA: C\n"),
            Err(DepvizError::FixtureParse { line: 2, .. })
        ));
        assert!(text("my package: B\n").is_err());
    }

    #[tokio::test]
    async fn test_json_layout_keeps_order() {
        let source = FixtureSource::from_json(
            r#"{ "root": ["zlib", "abc"], "zlib": [], "abc": ["root"] }"#,
            Path::new("repo.json"),
        )
        .unwrap();

        assert_eq!(source.direct_dependencies("root").await, vec!["zlib", "abc"]);
        assert_eq!(source.direct_dependencies("abc").await, vec!["root"]);
    }

    #[test]
    fn test_malformed_json() {
        let result = FixtureSource::from_json(r#"{ "A": "B" }"#, Path::new("repo.json"));
        assert!(matches!(result, Err(DepvizError::FixtureParse { .. })));
    }

    #[tokio::test]
    async fn test_load_picks_layout_from_extension() {
        let temp_dir = TempDir::new().unwrap();

        let json_path = temp_dir.path().join("repo.json");
        tokio::fs::write(&json_path, r#"{ "A": ["B"] }"#).await.unwrap();
        let from_json = FixtureSource::load(&json_path).await.unwrap();
        assert_eq!(from_json.direct_dependencies("A").await, vec!["B"]);

        let yaml_path = temp_dir.path().join("repo.yaml");
        tokio::fs::write(&yaml_path, "A: [B]\n").await.unwrap();
        let from_yaml = FixtureSource::load(&yaml_path).await.unwrap();
        assert_eq!(from_json, from_yaml);
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let result = FixtureSource::load("/definitely/not/here.json").await;
        assert!(matches!(result, Err(DepvizError::Io { .. })));
    }
}
