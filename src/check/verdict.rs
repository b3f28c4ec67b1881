//! End-of-life verdicts

use std::fmt;

use chrono::NaiveDate;

use crate::parser::types::Dependency;

/// Support status of a dependency's release line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EolStatus {
    /// The matched cycle has no scheduled end of life
    Supported,
    /// The matched cycle ended before the evaluation date
    EndOfLife,
    /// The matched cycle ends on or after the evaluation date
    ApproachingEol,
    /// The lifecycle source has no cycle covering the version
    NoMatchingCycle,
    /// The version still holds an unresolved `${name}` placeholder
    Unknown,
    /// The lifecycle source could not be queried
    ApiError,
}

impl EolStatus {
    /// All statuses in report order
    pub const ALL: [EolStatus; 6] = [
        EolStatus::Supported,
        EolStatus::ApproachingEol,
        EolStatus::EndOfLife,
        EolStatus::NoMatchingCycle,
        EolStatus::Unknown,
        EolStatus::ApiError,
    ];

    /// Status of a matched cycle, derived from its end-of-life date
    pub fn from_eol_date(eol_date: Option<NaiveDate>, today: NaiveDate) -> Self {
        match eol_date {
            None => EolStatus::Supported,
            Some(date) if date < today => EolStatus::EndOfLife,
            Some(_) => EolStatus::ApproachingEol,
        }
    }

    /// Human readable label used in reports
    pub fn label(&self) -> &'static str {
        match self {
            EolStatus::Supported => "Supported",
            EolStatus::EndOfLife => "End of Life",
            EolStatus::ApproachingEol => "Approaching EOL",
            EolStatus::NoMatchingCycle => "No matching cycle",
            EolStatus::Unknown => "Unknown",
            EolStatus::ApiError => "API Error",
        }
    }
}

impl fmt::Display for EolStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of evaluating one dependency
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    /// Dependency with its version resolved as far as possible
    pub dependency: Dependency,
    /// Product name queried; `None` when no lookup was made
    pub product: Option<String>,
    /// Label of the matched cycle
    pub cycle: Option<String>,
    pub eol_date: Option<NaiveDate>,
    pub status: EolStatus,
}

impl Verdict {
    pub fn unknown(dependency: Dependency) -> Self {
        Self {
            dependency,
            product: None,
            cycle: None,
            eol_date: None,
            status: EolStatus::Unknown,
        }
    }

    pub fn api_error(dependency: Dependency, product: String) -> Self {
        Self {
            dependency,
            product: Some(product),
            cycle: None,
            eol_date: None,
            status: EolStatus::ApiError,
        }
    }

    pub fn no_matching_cycle(dependency: Dependency, product: String) -> Self {
        Self {
            dependency,
            product: Some(product),
            cycle: None,
            eol_date: None,
            status: EolStatus::NoMatchingCycle,
        }
    }
}
