//! Parser trait definition

#[cfg(test)]
use mockall::automock;

use crate::parser::types::ParsedManifest;
use crate::parser::variables::VariableTable;

/// Trait for parsing build manifests
#[cfg_attr(test, automock)]
pub trait ManifestParser: Send + Sync {
    /// Check if this parser can handle the given path or URL
    fn can_parse(&self, path: &str) -> bool;

    /// Scan the content line by line
    ///
    /// Variable assignments are recorded into `variables`; the caller owns
    /// the table and decides its scope (one per manifest file).
    /// Malformed lines never abort the scan; they are reported as
    /// diagnostics in the returned [`ParsedManifest`].
    fn parse(&self, content: &str, variables: &mut VariableTable) -> ParsedManifest;
}
