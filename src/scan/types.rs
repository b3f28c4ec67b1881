//! Manifest files handed to the parser

use crate::parser::types::ManifestDialect;

/// Directory names never descended into while looking for manifests
pub const SKIPPED_DIRS: &[&str] = &[".git", "build", ".gradle"];

/// One manifest and where it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestFile {
    /// Repository (or local root directory) name
    pub repository: String,
    /// Path relative to the repository root, `/`-separated
    pub path: String,
    pub dialect: ManifestDialect,
    pub content: String,
}
