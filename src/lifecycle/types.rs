//! Lifecycle records as published by endoflife.date

use chrono::NaiveDate;
use serde::Deserialize;

/// Date format used by the lifecycle source (`2024-11-30`)
pub const EOL_DATE_FORMAT: &str = "%Y-%m-%d";

/// A release line and its end-of-life boundary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleCycle {
    /// Release line label (`5`, `5.3`, ...)
    pub label: String,
    /// End-of-life date; `None` when no end of life is scheduled
    pub eol_date: Option<NaiveDate>,
}

impl LifecycleCycle {
    pub fn new(label: impl Into<String>, eol_date: Option<NaiveDate>) -> Self {
        Self {
            label: label.into(),
            eol_date,
        }
    }
}

/// Raw cycle record from the lifecycle API
#[derive(Debug, Clone, Deserialize)]
pub struct CycleRecord {
    pub cycle: CycleLabel,
    #[serde(default)]
    pub eol: Option<EolField>,
}

/// Cycle labels are usually strings but some products publish bare numbers
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CycleLabel {
    Text(String),
    Number(serde_json::Number),
}

impl CycleLabel {
    pub fn into_string(self) -> String {
        match self {
            CycleLabel::Text(text) => text,
            CycleLabel::Number(number) => number.to_string(),
        }
    }
}

/// `eol` is either a date string or a boolean sentinel
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum EolField {
    Date(String),
    Flag(bool),
}

impl From<CycleRecord> for LifecycleCycle {
    fn from(record: CycleRecord) -> Self {
        let eol_date = match record.eol {
            Some(EolField::Date(text)) => parse_eol_date(&text),
            Some(EolField::Flag(_)) | None => None,
        };
        LifecycleCycle::new(record.cycle.into_string(), eol_date)
    }
}

/// Parse a `YYYY-MM-DD` date; anything else means "no date"
pub fn parse_eol_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), EOL_DATE_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[rstest]
    #[case(r#"{"cycle": "5.3", "eol": "2024-12-31"}"#, "5.3", Some(date(2024, 12, 31)))]
    #[case(r#"{"cycle": "6", "eol": false}"#, "6", None)]
    #[case(r#"{"cycle": "4", "eol": true}"#, "4", None)]
    #[case(r#"{"cycle": "7"}"#, "7", None)]
    #[case(r#"{"cycle": "8", "eol": null}"#, "8", None)]
    #[case(r#"{"cycle": 11, "eol": "2026-09-30"}"#, "11", Some(date(2026, 9, 30)))]
    #[case(r#"{"cycle": "2.7", "eol": "not-a-date"}"#, "2.7", None)]
    fn cycle_record_converts_to_lifecycle_cycle(
        #[case] json: &str,
        #[case] expected_label: &str,
        #[case] expected_eol: Option<NaiveDate>,
    ) {
        let record: CycleRecord = serde_json::from_str(json).unwrap();
        let cycle = LifecycleCycle::from(record);

        assert_eq!(cycle, LifecycleCycle::new(expected_label, expected_eol));
    }
}
