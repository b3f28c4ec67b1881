use std::io::{self, Write};

use crate::registry::CompareResult;
use crate::report::{ReportRow, ReportSink, Summary, format_date};

const HEADERS: [&str; 8] = [
    "Repository",
    "Group",
    "Artifact",
    "Version",
    "Cycle",
    "EOL Date",
    "Status",
    "Latest",
];

/// Fixed-width console table followed by status totals
pub struct TableReport;

impl TableReport {
    fn cells(row: &ReportRow) -> [String; 8] {
        let latest = match (&row.latest_version, row.comparison) {
            (Some(latest), Some(CompareResult::Outdated)) => format!("{} (update)", latest),
            (Some(latest), _) => latest.clone(),
            (None, _) => String::new(),
        };

        [
            row.repository.clone(),
            row.group.clone(),
            row.artifact.clone(),
            row.version.clone(),
            row.cycle.clone().unwrap_or_default(),
            format_date(row.eol_date),
            row.status.label().to_string(),
            latest,
        ]
    }

    fn write_line<W: Write>(writer: &mut W, cells: &[String], widths: &[usize]) -> io::Result<()> {
        let line = cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!(" {:<width$} ", cell, width = width))
            .collect::<Vec<_>>()
            .join("|");
        writeln!(writer, "|{}|", line)
    }

    fn write_rule<W: Write>(writer: &mut W, widths: &[usize]) -> io::Result<()> {
        let rule = widths
            .iter()
            .map(|width| "-".repeat(width + 2))
            .collect::<Vec<_>>()
            .join("+");
        writeln!(writer, "+{}+", rule)
    }
}

impl ReportSink for TableReport {
    fn write<W: Write>(&self, rows: &[ReportRow], writer: &mut W) -> io::Result<()> {
        let header: Vec<String> = HEADERS.iter().map(|h| h.to_string()).collect();
        let body: Vec<[String; 8]> = rows.iter().map(Self::cells).collect();

        let mut widths: Vec<usize> = HEADERS.iter().map(|h| h.len()).collect();
        for cells in &body {
            for (width, cell) in widths.iter_mut().zip(cells) {
                *width = (*width).max(cell.chars().count());
            }
        }

        Self::write_rule(writer, &widths)?;
        Self::write_line(writer, &header, &widths)?;
        Self::write_rule(writer, &widths)?;
        for cells in &body {
            Self::write_line(writer, cells, &widths)?;
        }
        Self::write_rule(writer, &widths)?;

        let summary = Summary::from_rows(rows);
        writeln!(writer)?;
        writeln!(writer, "Total dependencies checked: {}", summary.total)?;
        for (status, count) in &summary.by_status {
            if *count > 0 {
                writeln!(writer, "  {}: {}", status, count)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::verdict::EolStatus;
    use crate::report::fixtures::row;

    fn render(rows: &[ReportRow]) -> String {
        let mut output = Vec::new();
        TableReport.write(rows, &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn table_report_aligns_columns() {
        let output = render(&[
            row("spring-core", EolStatus::EndOfLife),
            row("spring-webmvc", EolStatus::Supported),
        ]);

        let lines: Vec<&str> = output.lines().collect();
        assert!(lines[1].starts_with("| Repository | Group "));
        assert_eq!(lines[0].len(), lines[3].len());
        assert_eq!(lines[3].len(), lines[4].len());
        assert!(lines[3].contains("| spring-core   |"));
        assert!(lines[4].contains("| spring-webmvc |"));
    }

    #[test]
    fn table_report_prints_totals() {
        let output = render(&[
            row("spring-core", EolStatus::EndOfLife),
            row("spring-web", EolStatus::EndOfLife),
            row("spring-jdbc", EolStatus::ApiError),
        ]);

        assert!(output.contains("Total dependencies checked: 3\n"));
        assert!(output.contains("  End of Life: 2\n"));
        assert!(output.contains("  API Error: 1\n"));
        assert!(!output.contains("Supported:"));
    }

    #[test]
    fn table_report_marks_outdated_versions() {
        let mut outdated = row("spring-core", EolStatus::EndOfLife);
        outdated.latest_version = Some("6.1.14".to_string());
        outdated.comparison = Some(CompareResult::Outdated);

        let output = render(&[outdated]);

        assert!(output.contains("6.1.14 (update)"));
    }
}
