//! Common types for manifest parsing

use std::fmt;

/// Flavour of Gradle manifest a file is written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ManifestDialect {
    /// `build.gradle`: `implementation 'group:artifact:version'`
    Declarations,
    /// Shared `libraries.gradle`: `guava: 'group:artifact:version@jar'`
    LibraryTable,
}

impl ManifestDialect {
    /// Returns the string representation of the dialect
    pub fn as_str(&self) -> &'static str {
        match self {
            ManifestDialect::Declarations => "declarations",
            ManifestDialect::LibraryTable => "library_table",
        }
    }
}

/// Detect the manifest dialect based on a file path or URL
pub fn detect_dialect(path: &str) -> Option<ManifestDialect> {
    let file_name = path
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(path)
        .split('?')
        .next()
        .unwrap_or_default();

    match file_name {
        "build.gradle" => Some(ManifestDialect::Declarations),
        "libraries.gradle" => Some(ManifestDialect::LibraryTable),
        _ => None,
    }
}

/// A library coordinate found in a manifest
///
/// `version` may still hold `${name}` placeholders until it is resolved.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Dependency {
    pub group: String,
    pub artifact: String,
    pub version: String,
}

impl Dependency {
    pub fn new(
        group: impl Into<String>,
        artifact: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            artifact: artifact.into(),
            version: version.into(),
        }
    }

    /// Returns the same coordinate with a different version
    pub fn with_version(&self, version: impl Into<String>) -> Self {
        Self {
            group: self.group.clone(),
            artifact: self.artifact.clone(),
            version: version.into(),
        }
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.artifact, self.version)
    }
}

/// A dependency together with where it was declared
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredDependency {
    pub dependency: Dependency,
    /// Line number (0-indexed) of the statement that completed the coordinate
    pub line: usize,
}

/// Non-fatal problem found while scanning a manifest
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseDiagnostic {
    /// A declaration whose coordinate does not split into 2-3 non-empty segments
    #[error("line {}: malformed declaration '{text}'", line + 1)]
    MalformedDeclaration { line: usize, text: String },

    /// A `group:artifact` declaration that never received a `strictly` version
    #[error("line {}: no version found for '{key}'", line + 1)]
    MissingOverrideVersion { line: usize, key: String },
}

/// Result of scanning one manifest
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedManifest {
    pub dependencies: Vec<DeclaredDependency>,
    pub diagnostics: Vec<ParseDiagnostic>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("build.gradle", Some(ManifestDialect::Declarations))]
    #[case("/project/app/build.gradle", Some(ManifestDialect::Declarations))]
    #[case("gradle\\libraries.gradle", Some(ManifestDialect::LibraryTable))]
    #[case(
        "https://raw.githubusercontent.com/acme/app/main/libraries.gradle",
        Some(ManifestDialect::LibraryTable)
    )]
    #[case(
        "https://raw.githubusercontent.com/acme/app/main/build.gradle?token=abc",
        Some(ManifestDialect::Declarations)
    )]
    #[case("/project/build.gradle.kts", None)]
    #[case("/project/settings.gradle", None)]
    #[case("mybuild.gradle", None)]
    fn detect_dialect_returns_expected(
        #[case] path: &str,
        #[case] expected: Option<ManifestDialect>,
    ) {
        assert_eq!(detect_dialect(path), expected);
    }

    #[test]
    fn dependency_displays_as_coordinate() {
        let dep = Dependency::new("org.springframework", "spring-core", "5.3.9");
        assert_eq!(dep.to_string(), "org.springframework:spring-core:5.3.9");
    }

    #[test]
    fn diagnostic_messages_use_one_based_lines() {
        let diag = ParseDiagnostic::MalformedDeclaration {
            line: 0,
            text: "badformat".to_string(),
        };
        assert_eq!(diag.to_string(), "line 1: malformed declaration 'badformat'");
    }
}
