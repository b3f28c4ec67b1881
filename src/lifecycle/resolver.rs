//! Substitution of `${name}` placeholders in declared versions

use regex::{Captures, Regex};

use crate::parser::variables::VariableTable;

/// Resolves `${name}` placeholders against a manifest's variable table
///
/// Substitution is a single textual pass: every known placeholder is
/// replaced, unknown ones are left verbatim, and substituted values are
/// never scanned again.
pub struct VersionResolver {
    placeholder_re: Regex,
}

impl VersionResolver {
    pub fn new() -> Self {
        Self {
            placeholder_re: Regex::new(r"\$\{([^}]*)\}").unwrap(),
        }
    }

    /// Replace every known placeholder in `version`
    pub fn resolve(&self, version: &str, variables: &VariableTable) -> String {
        self.placeholder_re
            .replace_all(version, |caps: &Captures| {
                let name = caps[1].trim();
                variables
                    .get(name)
                    .map_or_else(|| caps[0].to_string(), str::to_string)
            })
            .into_owned()
    }

    /// Names of the placeholders still present in `version`
    pub fn unresolved<'v>(&self, version: &'v str) -> Vec<&'v str> {
        self.placeholder_re
            .captures_iter(version)
            .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
            .collect()
    }

    /// True while any `${...}` is left, known or not
    pub fn has_placeholder(&self, version: &str) -> bool {
        self.placeholder_re.is_match(version)
    }
}

impl Default for VersionResolver {
    fn default() -> Self {
        Self::new()
    }
}
