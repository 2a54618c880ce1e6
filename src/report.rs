use std::io::Write;

use anyhow::{Context, Result};
use chrono::NaiveDate;

use crate::combine::round1;
use crate::constants::{CSV_PREFIX, HIGHLIGHT_THRESHOLD_F};
use crate::models::ReportRow;

/// Direction of a day's change, used to highlight report rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Warming,
    Cooling,
    Neutral,
}

impl Trend {
    /// Classifies a change; both thresholds are inclusive
    pub fn classify(change: Option<f64>) -> Self {
        match change {
            Some(c) if c >= HIGHLIGHT_THRESHOLD_F => Trend::Warming,
            Some(c) if c <= -HIGHLIGHT_THRESHOLD_F => Trend::Cooling,
            _ => Trend::Neutral,
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            Trend::Warming => "warming",
            Trend::Cooling => "cooling",
            Trend::Neutral => "neutral",
        }
    }
}

/// Sign of a change, styled independently of the row highlight
pub fn change_sign_class(change: Option<f64>) -> &'static str {
    match change {
        Some(c) if c > 0.0 => "pos",
        Some(c) if c < 0.0 => "neg",
        _ => "zero",
    }
}

/// Difference from the previous day. The first day never has one, and a
/// missing value on either side leaves the change missing.
pub fn day_over_day_changes(weighted: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut changes = Vec::with_capacity(weighted.len());
    if weighted.is_empty() {
        return changes;
    }
    changes.push(None);
    changes.extend(weighted.windows(2).map(|pair| match (pair[0], pair[1]) {
        (Some(prev), Some(curr)) => Some(round1(curr - prev)),
        _ => None,
    }));
    changes
}

/// Zips the per-day columns into report rows, one per forecast date
pub fn build_rows(
    dates: &[NaiveDate],
    weighted: &[Option<f64>],
    normal_10yr: &[Option<f64>],
    normal_30yr: &[Option<f64>],
) -> Vec<ReportRow> {
    let changes = day_over_day_changes(weighted);
    dates
        .iter()
        .enumerate()
        .map(|(i, &date)| ReportRow {
            date,
            weighted_avg: weighted.get(i).copied().flatten(),
            change: changes.get(i).copied().flatten(),
            normal_10yr: normal_10yr.get(i).copied().flatten(),
            normal_30yr: normal_30yr.get(i).copied().flatten(),
        })
        .collect()
}

/// File name of the CSV report, keyed by the first forecast date
pub fn csv_file_name(first_date: NaiveDate) -> String {
    format!("{}_{}.csv", CSV_PREFIX, first_date.format("%Y-%m-%d"))
}

/// Writes rows as CSV with a header line; missing values become empty fields
pub fn write_csv<W: Write>(writer: W, rows: &[ReportRow]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer
            .serialize(row)
            .with_context(|| format!("Failed to write CSV row for {}", row.date))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Parses a CSV report previously produced by [`write_csv`]
#[cfg(test)]
pub fn read_csv<R: std::io::Read>(reader: R) -> Result<Vec<ReportRow>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut rows = Vec::new();
    for record in csv_reader.deserialize() {
        rows.push(record.context("Failed to parse CSV row")?);
    }
    Ok(rows)
}
