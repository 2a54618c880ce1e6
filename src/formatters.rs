use maud::{html, Markup, PreEscaped, DOCTYPE};

use crate::models::{ReportRow, Station};
use crate::report::{change_sign_class, Trend};

/// Inline stylesheet so the document has no external assets
const REPORT_STYLES: &str = r#"
body { font-family: -apple-system, "Segoe UI", Helvetica, Arial, sans-serif; color: #222; margin: 24px; }
h1 { font-size: 20px; margin-bottom: 4px; }
.generated { color: #666; font-size: 12px; margin-top: 0; }
table { border-collapse: collapse; margin-top: 16px; }
th, td { border: 1px solid #ddd; padding: 6px 10px; text-align: right; }
th { background: #f4f4f4; }
td.date, th.date { text-align: left; }
tr.warming { background: #fde8e4; }
tr.cooling { background: #e4eefd; }
td.pos { color: #c0392b; font-weight: 600; }
td.neg { color: #1f5fbf; font-weight: 600; }
td.zero { color: #555; }
.stations { font-size: 12px; color: #555; margin-top: 16px; }
.footer { font-size: 12px; color: #666; margin-top: 16px; }
"#;

/// Renders one optional temperature to one decimal, blank when absent
fn format_value(value: Option<f64>) -> String {
    value.map(|v| format!("{:.1}", v)).unwrap_or_default()
}

fn format_change(change: Option<f64>) -> String {
    match change {
        Some(c) if c > 0.0 => format!("+{:.1}", c),
        Some(c) => format!("{:.1}", c),
        None => String::new(),
    }
}

/// Formats the complete HTML report
pub fn format_html_report(
    rows: &[ReportRow],
    stations: &[Station],
    generated_at: &str,
    csv_name: &str,
) -> String {
    report_document(rows, stations, generated_at, csv_name).into_string()
}

fn report_document(
    rows: &[ReportRow],
    stations: &[Station],
    generated_at: &str,
    csv_name: &str,
) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                title { "Weighted Ohio Forecast" }
                style { (PreEscaped(REPORT_STYLES)) }
            }
            body {
                h1 { "Weighted Ohio 15-Day Mean Temperature" }
                p class="generated" { "Generated " (generated_at) }

                (report_table(rows))
                (station_weights(stations))

                p class="footer" {
                    "Rows shaded red warmed and blue cooled by at least 2.0\u{00b0}F from the previous day. "
                    "The full data is attached separately as " strong { (csv_name) } "."
                }
            }
        }
    }
}

fn report_table(rows: &[ReportRow]) -> Markup {
    html! {
        table {
            thead {
                tr {
                    th class="date" { "Date" }
                    th { "Weighted Avg (\u{00b0}F)" }
                    th { "Day-over-Day (\u{00b0}F)" }
                    th { "10-yr Normal (\u{00b0}F)" }
                    th { "30-yr Normal (\u{00b0}F)" }
                }
            }
            tbody {
                @for row in rows {
                    tr class=(Trend::classify(row.change).css_class()) {
                        td class="date" { (row.date.format("%a %Y-%m-%d").to_string()) }
                        td { (format_value(row.weighted_avg)) }
                        td class=(change_sign_class(row.change)) { (format_change(row.change)) }
                        td { (format_value(row.normal_10yr)) }
                        td { (format_value(row.normal_30yr)) }
                    }
                }
            }
        }
    }
}

fn station_weights(stations: &[Station]) -> Markup {
    html! {
        p class="stations" {
            "Stations: "
            @for (i, station) in stations.iter().enumerate() {
                @if i > 0 { ", " }
                (station.name) " (" (station.id) ") " (format!("{:.0}%", station.weight * 100.0))
            }
        }
    }
}

/// Comma-separated weighted series for the console, blank where absent
pub fn format_weighted_series(weighted: &[Option<f64>]) -> String {
    weighted
        .iter()
        .map(|&v| format_value(v))
        .collect::<Vec<_>>()
        .join(",")
}
