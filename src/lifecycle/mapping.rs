//! Group identifier to lifecycle product name mapping
//!
//! The mapping file uses a properties-like syntax:
//!
//! ```text
//! # comment
//! org.springframework = spring-framework
//! com.fasterxml.jackson.core: jackson
//! ```

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, info, warn};

#[cfg(test)]
use mockall::automock;

/// Remaps a dependency group to the product name used by the lifecycle source
#[cfg_attr(test, automock)]
pub trait ProductMapping: Send + Sync {
    fn lookup(&self, group: &str) -> Option<String>;
}

/// Product name for a group, falling back to the group itself
pub fn product_for(mapping: &dyn ProductMapping, group: &str) -> String {
    mapping.lookup(group).unwrap_or_else(|| group.to_string())
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MappingTable {
    entries: HashMap<String, String>,
}

impl MappingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse mapping file content; lines without a separator are skipped
    pub fn parse(content: &str) -> Self {
        let mut entries = HashMap::new();

        for (index, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }

            let Some(separator) = line.find(['=', ':']) else {
                debug!("Ignoring mapping line {}: '{}'", index + 1, line);
                continue;
            };

            let group = line[..separator].trim();
            let product = line[separator + 1..].trim();
            if group.is_empty() || product.is_empty() {
                debug!("Ignoring mapping line {}: '{}'", index + 1, line);
                continue;
            }

            entries.insert(group.to_string(), product.to_string());
        }

        Self { entries }
    }

    /// Load a mapping file; a missing or unreadable file yields an empty table
    pub fn from_file(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let table = Self::parse(&content);
                info!("Loaded {} mappings from {:?}", table.len(), path);
                table
            }
            Err(e) => {
                warn!(
                    "Mapping file {:?} could not be read ({}); using group identifiers as product names",
                    path, e
                );
                Self::new()
            }
        }
    }

    pub fn insert(&mut self, group: impl Into<String>, product: impl Into<String>) {
        self.entries.insert(group.into(), product.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ProductMapping for MappingTable {
    fn lookup(&self, group: &str) -> Option<String> {
        self.entries.get(group).cloned()
    }
}

impl<G: Into<String>, P: Into<String>> FromIterator<(G, P)> for MappingTable {
    fn from_iter<I: IntoIterator<Item = (G, P)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (group, product) in iter {
            table.insert(group, product);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;

    #[rstest]
    #[case("org.springframework = spring-framework", "org.springframework", "spring-framework")]
    #[case("org.springframework=spring-framework", "org.springframework", "spring-framework")]
    #[case("com.fasterxml.jackson.core: jackson", "com.fasterxml.jackson.core", "jackson")]
    #[case("  io.netty   =   netty  ", "io.netty", "netty")]
    fn parse_reads_separators(#[case] line: &str, #[case] group: &str, #[case] product: &str) {
        let table = MappingTable::parse(line);

        assert_eq!(table.lookup(group), Some(product.to_string()));
    }

    #[test]
    fn parse_skips_comments_and_invalid_lines() {
        let content = r#"
# Spring
! legacy comment
org.springframework = spring-framework
no separator here
= missing-group
org.empty =
"#;
        let table = MappingTable::parse(content);

        assert_eq!(table.len(), 1);
        assert_eq!(
            table.lookup("org.springframework"),
            Some("spring-framework".to_string())
        );
    }

    #[test]
    fn parse_last_entry_wins() {
        let table = MappingTable::parse("org.slf4j = slf4j\norg.slf4j = slf4j-api\n");

        assert_eq!(table.lookup("org.slf4j"), Some("slf4j-api".to_string()));
    }

    #[test]
    fn product_for_falls_back_to_group() {
        let table: MappingTable = [("org.springframework", "spring-framework")]
            .into_iter()
            .collect();

        assert_eq!(product_for(&table, "org.springframework"), "spring-framework");
        assert_eq!(product_for(&table, "com.google.guava"), "com.google.guava");
    }

    #[test]
    fn from_file_loads_entries() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "org.springframework = spring-framework").unwrap();

        let table = MappingTable::from_file(file.path());

        assert_eq!(table.len(), 1);
    }

    #[test]
    fn from_file_missing_yields_empty_table() {
        let dir = tempfile::TempDir::new().unwrap();

        let table = MappingTable::from_file(&dir.path().join("mapping.conf"));

        assert!(table.is_empty());
    }
}
