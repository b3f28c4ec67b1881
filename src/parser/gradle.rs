//! Gradle manifest parser
//!
//! Scans `build.gradle` and shared `libraries.gradle` files line by line.
//! Recognized statements:
//! - Declaration: `implementation 'org.slf4j:slf4j-api:2.0.9'`
//!   (also `api`, `compile`, `testImplementation`, single or double quotes,
//!   optional parentheses)
//! - Map form, on one line or spread until the closing parenthesis:
//!   `implementation group: 'org.slf4j', name: 'slf4j-api', version: '2.0.9'`
//! - Partial declaration pinned by a later `strictly`:
//!   ```text
//!   implementation('com.google.guava:guava') {
//!       version { strictly '30.1-jre' }
//!   }
//!   ```
//! - Variable assignment: `ext.guavaVersion = '30.1'`
//! - Library table entry: `guava: 'com.google.guava:guava:${guavaVersion}@jar'`
//!
//! `//` line comments and `/* ... */` block comments are stripped before a
//! line is matched; code around a closed comment is still scanned.

use indexmap::IndexMap;
use regex::{Captures, Regex};
use tracing::{debug, warn};

use crate::parser::traits::ManifestParser;
use crate::parser::types::{
    DeclaredDependency, Dependency, ParseDiagnostic, ParsedManifest, detect_dialect,
};
use crate::parser::variables::VariableTable;

/// Where the scanner is between two lines
#[derive(Debug, Clone, PartialEq, Eq)]
enum ScanState {
    Normal,
    /// Inside `/* ... */`; `resume` is restored once the comment closes
    InBlockComment { resume: Box<ScanState> },
    /// A `group:artifact` declaration is open and may receive a `strictly` version
    AwaitingOverrideVersion { key: String },
    /// Collecting `group:`/`name:`/`version:` entries of a map-form declaration
    InMapDeclaration(MapDeclaration),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct MapDeclaration {
    line: usize,
    /// Opened with `(`; entries run until the matching `)`
    parenthesized: bool,
    group: Option<String>,
    name: Option<String>,
    version: Option<String>,
    /// `'g:a:v'` written inside a bare `implementation(` block
    positional: Option<String>,
}

impl MapDeclaration {
    fn new(line: usize, parenthesized: bool) -> Self {
        Self {
            line,
            parenthesized,
            group: None,
            name: None,
            version: None,
            positional: None,
        }
    }

    fn is_empty(&self) -> bool {
        self.group.is_none() && self.name.is_none() && self.version.is_none()
    }

    fn describe(&self) -> String {
        [&self.group, &self.name, &self.version]
            .iter()
            .map(|part| part.as_deref().unwrap_or(""))
            .collect::<Vec<_>>()
            .join(":")
    }
}

#[derive(Debug)]
struct PendingDeclaration {
    group: String,
    artifact: String,
    line: usize,
}

/// Coordinate split into its colon-delimited segments
#[derive(Debug, PartialEq, Eq)]
enum Coordinate<'a> {
    Full {
        group: &'a str,
        artifact: &'a str,
        version: &'a str,
    },
    Partial {
        group: &'a str,
        artifact: &'a str,
    },
    Malformed,
}

impl<'a> Coordinate<'a> {
    fn split(text: &'a str) -> Self {
        let segments: Vec<&str> = text.split(':').map(str::trim).collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Coordinate::Malformed;
        }
        match segments[..] {
            [group, artifact, version] => Coordinate::Full {
                group,
                artifact,
                version,
            },
            [group, artifact] => Coordinate::Partial { group, artifact },
            _ => Coordinate::Malformed,
        }
    }
}

/// Mutable state for scanning a single manifest
#[derive(Debug)]
struct ManifestScan {
    state: ScanState,
    pending: IndexMap<String, PendingDeclaration>,
    output: ParsedManifest,
}

impl ManifestScan {
    fn new() -> Self {
        Self {
            state: ScanState::Normal,
            pending: IndexMap::new(),
            output: ParsedManifest::default(),
        }
    }

    fn emit(&mut self, dependency: Dependency, line: usize) {
        debug!("Extracted dependency {} at line {}", dependency, line + 1);
        self.output
            .dependencies
            .push(DeclaredDependency { dependency, line });
    }

    fn malformed(&mut self, line: usize, text: &str) {
        warn!(
            "Skipping malformed declaration at line {}: '{}'",
            line + 1,
            text
        );
        self.output
            .diagnostics
            .push(ParseDiagnostic::MalformedDeclaration {
                line,
                text: text.to_string(),
            });
        self.state = ScanState::Normal;
    }

    fn open_pending(&mut self, group: &str, artifact: &str, line: usize) {
        let key = format!("{}:{}", group, artifact);
        debug!("Awaiting strictly version for {} (line {})", key, line + 1);
        self.pending.insert(
            key.clone(),
            PendingDeclaration {
                group: group.to_string(),
                artifact: artifact.to_string(),
                line,
            },
        );
        self.state = ScanState::AwaitingOverrideVersion { key };
    }

    /// Turn collected map entries into a dependency or a pending declaration
    fn complete_map(&mut self, map: MapDeclaration) {
        self.state = ScanState::Normal;

        if map.is_empty() {
            match map.positional.as_deref() {
                Some(coordinate) => self.complete_coordinate(coordinate, map.line),
                None => debug!("Empty declaration at line {}", map.line + 1),
            }
            return;
        }

        let group = map.group.as_deref().map(str::trim).unwrap_or_default();
        let name = map.name.as_deref().map(str::trim).unwrap_or_default();
        if group.is_empty() || name.is_empty() {
            self.malformed(map.line, &map.describe());
            return;
        }

        match map.version.as_deref().map(str::trim) {
            Some("") => self.malformed(map.line, &map.describe()),
            Some(version) => self.emit(Dependency::new(group, name, version), map.line),
            None => self.open_pending(group, name, map.line),
        }
    }

    fn complete_coordinate(&mut self, coordinate: &str, line: usize) {
        match Coordinate::split(coordinate) {
            Coordinate::Full {
                group,
                artifact,
                version,
            } => {
                self.emit(Dependency::new(group, artifact, version), line);
                self.state = ScanState::Normal;
            }
            Coordinate::Partial { group, artifact } => self.open_pending(group, artifact, line),
            Coordinate::Malformed => self.malformed(line, coordinate),
        }
    }

    fn enter_block_comment(&mut self) {
        let resume = match std::mem::replace(&mut self.state, ScanState::Normal) {
            ScanState::InBlockComment { resume } => resume,
            other => Box::new(other),
        };
        self.state = ScanState::InBlockComment { resume };
    }

    fn leave_block_comment(&mut self) {
        if let ScanState::InBlockComment { resume } =
            std::mem::replace(&mut self.state, ScanState::Normal)
        {
            self.state = *resume;
        }
    }

    fn finish(mut self) -> ParsedManifest {
        let state = match std::mem::replace(&mut self.state, ScanState::Normal) {
            ScanState::InBlockComment { resume } => {
                debug!("Manifest ended inside a block comment");
                *resume
            }
            other => other,
        };
        if let ScanState::InMapDeclaration(map) = state {
            warn!("Map declaration at line {} is never closed", map.line + 1);
            self.complete_map(map);
        }

        for (key, pending) in self.pending.drain(..) {
            warn!(
                "Dropping '{}' declared at line {}: no version was supplied",
                key,
                pending.line + 1
            );
            self.output
                .diagnostics
                .push(ParseDiagnostic::MissingOverrideVersion {
                    line: pending.line,
                    key,
                });
        }
        self.output
    }
}

/// Parser for Gradle Groovy manifests
pub struct GradleParser {
    /// `ext.name = 'value'`
    variable_re: Regex,
    /// `implementation 'g:a:v'`, `api("g:a")`, ...
    declaration_re: Regex,
    /// `strictly '1.2.3'` anywhere in a line
    strictly_re: Regex,
    /// `key: 'g:a:v@classifier'`
    table_entry_re: Regex,
    /// `implementation group: ...` or `implementation(` opening a map form
    map_start_re: Regex,
    /// `group: 'g'`, `name: 'a'`, `version: 'v'`
    map_entry_re: Regex,
    /// Leading quoted string, e.g. a coordinate on its own line
    positional_re: Regex,
}

impl GradleParser {
    pub fn new() -> Self {
        Self {
            variable_re: Regex::new(r#"^ext\.([A-Za-z_]\w*)\s*=\s*(?:'([^']*)'|"([^"]*)")"#)
                .unwrap(),
            declaration_re: Regex::new(
                r#"^(implementation|api|compile|testImplementation)(?:\s+|\s*\(\s*)(?:'([^']*)'|"([^"]*)")"#,
            )
            .unwrap(),
            strictly_re: Regex::new(r#"\bstrictly\s*\(?\s*(?:'([^']+)'|"([^"]+)")"#).unwrap(),
            table_entry_re: Regex::new(
                r#"^([A-Za-z_][\w.\-]*)\s*:\s*(?:'([^']*)'|"([^"]*)")\s*,?$"#,
            )
            .unwrap(),
            map_start_re: Regex::new(
                r#"^(?:implementation|api|compile|testImplementation)(?:(\s*\()\s*$|(\s+|\s*\(\s*)((?:group|name|version)\s*:.*)$)"#,
            )
            .unwrap(),
            map_entry_re: Regex::new(r#"\b(group|name|version)\s*:\s*(?:'([^']*)'|"([^"]*)")"#)
                .unwrap(),
            positional_re: Regex::new(r#"^(?:'([^']*)'|"([^"]*)")"#).unwrap(),
        }
    }

    fn scan_line(
        &self,
        scan: &mut ManifestScan,
        line_num: usize,
        line: &str,
        variables: &mut VariableTable,
    ) {
        let mut line = line;
        if matches!(scan.state, ScanState::InBlockComment { .. }) {
            let Some(end) = line.find("*/") else {
                return;
            };
            scan.leave_block_comment();
            line = &line[end + 2..];
        }

        let (live, left_open) = strip_comments(line);
        let live = live.trim();
        if !live.is_empty() {
            self.scan_statement(scan, line_num, live, variables);
        }

        if left_open {
            scan.enter_block_comment();
        }
    }

    fn scan_statement(
        &self,
        scan: &mut ManifestScan,
        line_num: usize,
        line: &str,
        variables: &mut VariableTable,
    ) {
        if let ScanState::InMapDeclaration(map) = &mut scan.state {
            self.collect_map_entries(map, line);
            let close = if map.parenthesized {
                line.find(')')
            } else if line.ends_with(',') {
                None
            } else {
                Some(line.len())
            };
            if let Some(close) = close {
                if let ScanState::InMapDeclaration(map) =
                    std::mem::replace(&mut scan.state, ScanState::Normal)
                {
                    self.close_map(scan, map, line.get(close + 1..).unwrap_or(""), line_num);
                }
            }
            return;
        }

        if let Some(caps) = self.variable_re.captures(line) {
            let name = &caps[1];
            let value = quoted(&caps, 2, 3);
            debug!("Variable {} = '{}' at line {}", name, value, line_num + 1);
            variables.insert(name, value);
            return;
        }

        if let Some(caps) = self.declaration_re.captures(line) {
            scan.complete_coordinate(quoted(&caps, 2, 3), line_num);
            if matches!(scan.state, ScanState::AwaitingOverrideVersion { .. }) {
                // `implementation('g:a') { version { strictly '1.0' } }`
                let end = caps.get(0).map_or(line.len(), |m| m.end());
                self.apply_override(scan, &line[end..], line_num);
            }
            return;
        }

        if let Some(caps) = self.map_start_re.captures(line) {
            self.open_map(scan, &caps, line_num);
            return;
        }

        if self.apply_override(scan, line, line_num) {
            return;
        }

        if let Some(caps) = self.table_entry_re.captures(line) {
            let value = quoted(&caps, 2, 3);
            // Only colon-delimited values are coordinates
            if value.contains("://") || !value.contains(':') {
                return;
            }
            let coordinate = value.split_once('@').map_or(value, |(coord, _)| coord);
            match Coordinate::split(coordinate) {
                Coordinate::Full {
                    group,
                    artifact,
                    version,
                } => {
                    scan.emit(Dependency::new(group, artifact, version), line_num);
                    scan.state = ScanState::Normal;
                }
                _ => scan.malformed(line_num, value),
            }
        }
    }

    fn open_map(&self, scan: &mut ManifestScan, caps: &Captures<'_>, line_num: usize) {
        // Bare `implementation(` continues on the following lines
        if caps.get(1).is_some() {
            scan.state = ScanState::InMapDeclaration(MapDeclaration::new(line_num, true));
            return;
        }

        let parenthesized = caps.get(2).is_some_and(|m| m.as_str().contains('('));
        let entries = caps.get(3).map_or("", |m| m.as_str());
        let mut map = MapDeclaration::new(line_num, parenthesized);
        self.collect_map_entries(&mut map, entries);

        let close = if parenthesized {
            entries.find(')')
        } else if entries.ends_with(',') {
            None
        } else {
            Some(entries.len())
        };
        match close {
            Some(close) => {
                self.close_map(scan, map, entries.get(close + 1..).unwrap_or(""), line_num)
            }
            None => scan.state = ScanState::InMapDeclaration(map),
        }
    }

    fn collect_map_entries(&self, map: &mut MapDeclaration, text: &str) {
        if map.positional.is_none() {
            if let Some(caps) = self.positional_re.captures(text) {
                map.positional = Some(quoted(&caps, 1, 2).to_string());
            }
        }
        for caps in self.map_entry_re.captures_iter(text) {
            let value = Some(quoted(&caps, 2, 3).to_string());
            match &caps[1] {
                "group" => map.group = value,
                "name" => map.name = value,
                _ => map.version = value,
            }
        }
    }

    /// Finish a map declaration; `rest` is what follows it on the closing line
    fn close_map(&self, scan: &mut ManifestScan, map: MapDeclaration, rest: &str, line_num: usize) {
        scan.complete_map(map);
        if matches!(scan.state, ScanState::AwaitingOverrideVersion { .. }) {
            // `implementation(group: 'g', name: 'a') { version { strictly '1.0' } }`
            self.apply_override(scan, rest, line_num);
        }
    }

    /// Apply a `strictly` version found in `text` to the open declaration
    ///
    /// Returns true when `text` contained a `strictly` statement.
    fn apply_override(&self, scan: &mut ManifestScan, text: &str, line_num: usize) -> bool {
        let Some(caps) = self.strictly_re.captures(text) else {
            return false;
        };
        let version = quoted(&caps, 1, 2).trim();

        let ScanState::AwaitingOverrideVersion { key } = &scan.state else {
            debug!(
                "Ignoring strictly '{}' at line {}: no open declaration",
                version,
                line_num + 1
            );
            return true;
        };

        if let Some(pending) = scan.pending.shift_remove(key) {
            scan.emit(
                Dependency::new(pending.group, pending.artifact, version),
                pending.line,
            );
        }
        scan.state = ScanState::Normal;
        true
    }
}

impl Default for GradleParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ManifestParser for GradleParser {
    fn can_parse(&self, path: &str) -> bool {
        detect_dialect(path).is_some()
    }

    fn parse(&self, content: &str, variables: &mut VariableTable) -> ParsedManifest {
        let mut scan = ManifestScan::new();

        for (line_num, line) in content.lines().enumerate() {
            self.scan_line(&mut scan, line_num, line.trim(), variables);
        }

        scan.finish()
    }
}

/// Text of whichever quote alternative matched
fn quoted<'t>(caps: &Captures<'t>, single: usize, double: usize) -> &'t str {
    caps.get(single)
        .or_else(|| caps.get(double))
        .map_or("", |m| m.as_str())
}

/// Code left on a line once comments are removed
///
/// Closed `/* ... */` spans become a single space and `//` ends the line.
/// Comment markers inside quoted strings are kept. The flag is set when a
/// `/*` is still open at the end of the line.
fn strip_comments(line: &str) -> (String, bool) {
    let mut live = String::with_capacity(line.len());
    let mut quote: Option<char> = None;
    let mut rest = line;

    while let Some(c) = rest.chars().next() {
        if let Some(open) = quote {
            if c == open {
                quote = None;
            }
        } else if c == '\'' || c == '"' {
            quote = Some(c);
        } else if rest.starts_with("//") {
            return (live, false);
        } else if let Some(comment) = rest.strip_prefix("/*") {
            match comment.find("*/") {
                Some(end) => {
                    live.push(' ');
                    rest = &comment[end + 2..];
                    continue;
                }
                None => return (live, true),
            }
        }
        live.push(c);
        rest = &rest[c.len_utf8()..];
    }

    (live, false)
}
