use semver::Version;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareResult {
    Latest,
    Outdated,
    Newer,
    Invalid,
}

/// Parse a version string into a semver::Version, normalizing partial versions.
///
/// Handles partial versions like "1" or "1.2" by padding with zeros.
///
/// Examples:
/// - "1" -> Version(1, 0, 0)
/// - "1.2" -> Version(1, 2, 0)
/// - "1.2.3" -> Version(1, 2, 3)
pub fn parse_version(version: &str) -> Option<Version> {
    let parts: Vec<&str> = version.split('.').collect();
    let normalized = match parts.len() {
        1 => format!("{}.0.0", parts[0]),
        2 => format!("{}.{}.0", parts[0], parts[1]),
        _ => version.to_string(),
    };
    Version::parse(&normalized).ok()
}

/// Parse the numeric core of a Maven version
///
/// Qualifiers are dropped before parsing:
/// - "5.3.9.RELEASE" -> Version(5, 3, 9)
/// - "30.1-jre" -> Version(30, 1, 0)
/// - "2.15.2.1" -> Version(2, 15, 2)
pub fn parse_maven_version(version: &str) -> Option<Version> {
    let base = version.split(['-', '+']).next().unwrap_or_default();
    let numeric: Vec<&str> = base
        .split('.')
        .take_while(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit()))
        .take(3)
        .collect();

    if numeric.is_empty() {
        return None;
    }

    parse_version(&numeric.join("."))
}

/// Compare a declared version against the latest published one
pub fn compare_versions(current_version: &str, latest_version: &str) -> CompareResult {
    let (Some(current), Some(latest)) = (
        parse_maven_version(current_version),
        parse_maven_version(latest_version),
    ) else {
        return CompareResult::Invalid;
    };

    match current.cmp(&latest) {
        std::cmp::Ordering::Less => CompareResult::Outdated,
        std::cmp::Ordering::Equal => CompareResult::Latest,
        std::cmp::Ordering::Greater => CompareResult::Newer,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1", Some(Version::new(1, 0, 0)))]
    #[case("1.2", Some(Version::new(1, 2, 0)))]
    #[case("1.2.3", Some(Version::new(1, 2, 3)))]
    #[case("invalid", None)]
    fn test_parse_version(#[case] input: &str, #[case] expected: Option<Version>) {
        assert_eq!(parse_version(input), expected);
    }

    #[rstest]
    #[case("5.3.9.RELEASE", Some(Version::new(5, 3, 9)))]
    #[case("30.1-jre", Some(Version::new(30, 1, 0)))]
    #[case("2.15.2.1", Some(Version::new(2, 15, 2)))]
    #[case("1.0.0-rc1", Some(Version::new(1, 0, 0)))]
    #[case("Finchley.SR2", None)]
    #[case("", None)]
    fn test_parse_maven_version(#[case] input: &str, #[case] expected: Option<Version>) {
        assert_eq!(parse_maven_version(input), expected);
    }

    #[rstest]
    #[case("5.3.9", "6.1.14", CompareResult::Outdated)]
    #[case("30.1-jre", "33.3.1-jre", CompareResult::Outdated)]
    #[case("6.1.14", "6.1.14", CompareResult::Latest)]
    #[case("5.3.9.RELEASE", "5.3.9", CompareResult::Latest)]
    #[case("7.0.0", "6.1.14", CompareResult::Newer)]
    #[case("Finchley.SR2", "2.0.0", CompareResult::Invalid)]
    #[case("1.0.0", "latest", CompareResult::Invalid)]
    fn test_compare_versions(
        #[case] current: &str,
        #[case] latest: &str,
        #[case] expected: CompareResult,
    ) {
        assert_eq!(compare_versions(current, latest), expected);
    }
}
