//! Selection of the lifecycle cycle that applies to a version
//!
//! A cycle is a candidate when the version string starts with its label,
//! so label `5` covers `5.3.9`. The longest candidate label wins and ties
//! go to the first record in source order.
//!
//! Known limitation: the prefix test is textual, so label `1` also covers
//! `11.2` when no longer label matches.

use crate::lifecycle::types::LifecycleCycle;

/// Granularity at which a lifecycle source tracks its release lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleGranularity {
    /// Labels like `5`
    Major,
    /// Labels like `5.3`
    MajorMinor,
}

impl CycleGranularity {
    /// Inferred from the first record's label
    pub fn detect(cycles: &[LifecycleCycle]) -> Self {
        match cycles.first() {
            Some(cycle) if cycle.label.contains('.') => CycleGranularity::MajorMinor,
            _ => CycleGranularity::Major,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CycleMatcher;

impl CycleMatcher {
    /// `major.minor` or `major` part of `version`, depending on the source's granularity
    pub fn comparison_key(&self, version: &str, cycles: &[LifecycleCycle]) -> String {
        let take = match CycleGranularity::detect(cycles) {
            CycleGranularity::Major => 1,
            CycleGranularity::MajorMinor => 2,
        };
        version.split('.').take(take).collect::<Vec<_>>().join(".")
    }

    /// Find the cycle that applies to `version`, if any
    pub fn find_cycle<'a>(
        &self,
        version: &str,
        cycles: &'a [LifecycleCycle],
    ) -> Option<&'a LifecycleCycle> {
        cycles
            .iter()
            .filter(|cycle| !cycle.label.is_empty() && version.starts_with(cycle.label.as_str()))
            .fold(None, |best: Option<&LifecycleCycle>, candidate| match best {
                Some(current) if current.label.len() >= candidate.label.len() => Some(current),
                _ => Some(candidate),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rstest::rstest;

    fn cycles(labels: &[&str]) -> Vec<LifecycleCycle> {
        labels
            .iter()
            .map(|label| LifecycleCycle::new(*label, None))
            .collect()
    }

    #[rstest]
    #[case(&["5", "5.3"], "5.3.9", Some("5.3"))]
    #[case(&["5.3", "5"], "5.3.9", Some("5.3"))]
    #[case(&["6", "5"], "5.3.9", Some("5"))]
    #[case(&["6.0", "5.3", "5.2"], "5.2.22.RELEASE", Some("5.2"))]
    #[case(&["6", "7"], "5.3.9", None)]
    #[case(&[], "5.3.9", None)]
    #[case(&["1"], "11.2", Some("1"))]
    #[case(&["11", "1"], "11.2", Some("11"))]
    #[case(&["", "5"], "5.0", Some("5"))]
    fn find_cycle_returns_expected(
        #[case] labels: &[&str],
        #[case] version: &str,
        #[case] expected: Option<&str>,
    ) {
        let cycles = cycles(labels);
        let result = CycleMatcher.find_cycle(version, &cycles);

        assert_eq!(result.map(|c| c.label.as_str()), expected);
    }

    #[test]
    fn find_cycle_prefers_first_record_on_equal_length() {
        let first = NaiveDate::from_ymd_opt(2024, 1, 1);
        let second = NaiveDate::from_ymd_opt(2025, 1, 1);
        let cycles = vec![
            LifecycleCycle::new("5.3", first),
            LifecycleCycle::new("5.3", second),
        ];

        let result = CycleMatcher.find_cycle("5.3.9", &cycles).unwrap();

        assert_eq!(result.eol_date, first);
    }

    #[test]
    fn find_cycle_returns_cycle_without_eol_date() {
        let cycles = cycles(&["5"]);

        let result = CycleMatcher.find_cycle("5.3.9", &cycles).unwrap();

        assert_eq!(result.eol_date, None);
    }

    #[rstest]
    #[case(&["5.3", "5.2"], "5.3.9", "5.3")]
    #[case(&["6", "5"], "5.3.9", "5")]
    #[case(&[], "5.3.9", "5")]
    #[case(&["5.3"], "30", "30")]
    fn comparison_key_follows_first_label_granularity(
        #[case] labels: &[&str],
        #[case] version: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(CycleMatcher.comparison_key(version, &cycles(labels)), expected);
    }
}
