use std::io::{self, Write};

use crate::report::{ReportRow, ReportSink, format_date};

pub const CSV_HEADER: &str = "Repository,Manifest,Group,Artifact,Version,Product,Cycle,EOL Date,Status,Latest Version,Release Date,Latest Release Date";

/// CSV summary, one line per checked dependency
pub struct CsvReport;

impl CsvReport {
    /// Quote fields holding separators, quotes or line breaks; inner quotes double
    fn escape_field(value: &str) -> String {
        if !value.contains([',', '"', '\n']) {
            return value.to_string();
        }
        format!("\"{}\"", value.replace('"', "\"\""))
    }
}

impl ReportSink for CsvReport {
    fn write<W: Write>(&self, rows: &[ReportRow], writer: &mut W) -> io::Result<()> {
        writeln!(writer, "{}", CSV_HEADER)?;

        for row in rows {
            let fields = [
                row.repository.clone(),
                row.manifest.clone(),
                row.group.clone(),
                row.artifact.clone(),
                row.version.clone(),
                row.product.clone().unwrap_or_default(),
                row.cycle.clone().unwrap_or_default(),
                format_date(row.eol_date),
                row.status.label().to_string(),
                row.latest_version.clone().unwrap_or_default(),
                format_date(row.release_date),
                format_date(row.latest_release_date),
            ];

            let line = fields
                .iter()
                .map(|field| Self::escape_field(field))
                .collect::<Vec<_>>()
                .join(",");
            writeln!(writer, "{}", line)?;
        }

        Ok(())
    }
}
