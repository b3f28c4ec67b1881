//! Report rendering
//! - csv.rs: CSV summary file
//! - table.rs: console table with status totals

pub mod csv;
pub mod table;

use std::io::{self, Write};

use chrono::NaiveDate;
use indexmap::IndexMap;

use crate::check::verdict::{EolStatus, Verdict};
use crate::lifecycle::types::EOL_DATE_FORMAT;
use crate::registry::{CompareResult, ReleaseInfo};

pub use self::csv::CsvReport;
pub use self::table::TableReport;

/// One checked dependency as it appears in reports
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub repository: String,
    pub manifest: String,
    pub group: String,
    pub artifact: String,
    pub version: String,
    pub product: Option<String>,
    pub cycle: Option<String>,
    pub eol_date: Option<NaiveDate>,
    pub status: EolStatus,
    pub latest_version: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub latest_release_date: Option<NaiveDate>,
    /// Declared version compared with `latest_version`
    pub comparison: Option<CompareResult>,
}

impl ReportRow {
    pub fn new(
        repository: &str,
        manifest: &str,
        verdict: Verdict,
        release: Option<ReleaseInfo>,
    ) -> Self {
        let release = release.unwrap_or_default();
        Self {
            repository: repository.to_string(),
            manifest: manifest.to_string(),
            group: verdict.dependency.group,
            artifact: verdict.dependency.artifact,
            version: verdict.dependency.version,
            product: verdict.product,
            cycle: verdict.cycle,
            eol_date: verdict.eol_date,
            status: verdict.status,
            latest_version: release.latest_version,
            release_date: release.release_date,
            latest_release_date: release.latest_release_date,
            comparison: release.comparison,
        }
    }
}

/// Dependency totals per status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub by_status: IndexMap<EolStatus, usize>,
}

impl Summary {
    pub fn from_rows(rows: &[ReportRow]) -> Self {
        let mut by_status: IndexMap<EolStatus, usize> =
            EolStatus::ALL.iter().map(|status| (*status, 0)).collect();
        for row in rows {
            *by_status.entry(row.status).or_default() += 1;
        }

        Self {
            total: rows.len(),
            by_status,
        }
    }

    pub fn count(&self, status: EolStatus) -> usize {
        self.by_status.get(&status).copied().unwrap_or(0)
    }
}

/// Renders report rows to a writer
pub trait ReportSink {
    fn write<W: Write>(&self, rows: &[ReportRow], writer: &mut W) -> io::Result<()>;
}

pub(crate) fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format(EOL_DATE_FORMAT).to_string())
        .unwrap_or_default()
}
