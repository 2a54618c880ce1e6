use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::combine::{weighted_forecast, weighted_normals};
use crate::constants::{FORECAST_DAYS, HTML_FILENAME, NORMALS_10YR, NORMALS_30YR};
use crate::formatters::format_html_report;
use crate::models::{DailySeries, ReportRow, Station, StationNormals};
use crate::report::{build_rows, csv_file_name, write_csv};
use crate::service::WeatherSource;

/// Everything a run produced
#[derive(Debug)]
pub struct ReportOutput {
    pub weighted: Vec<Option<f64>>,
    pub rows: Vec<ReportRow>,
    pub csv_path: PathBuf,
    pub html_path: PathBuf,
}

/// Runs the whole forecast report, one request at a time.
///
/// A failed forecast fetch returns before anything is written. Normals are
/// best-effort and only ever leave cells empty.
pub async fn run<S: WeatherSource>(
    source: &S,
    stations: &[Station],
    output_dir: &Path,
    generated_at: &str,
) -> Result<ReportOutput> {
    let mut forecasts: Vec<(Station, DailySeries)> = Vec::with_capacity(stations.len());
    for station in stations {
        let series = source
            .fetch_forecast(station, FORECAST_DAYS)
            .await
            .with_context(|| format!("Failed to fetch forecast for {}", station.id))?;
        tracing::debug!("{} returned {} forecast days", station.id, series.len());
        forecasts.push((*station, series));
    }

    let Some((_, reference)) = forecasts.first() else {
        bail!("No stations configured");
    };
    if reference.is_empty() {
        bail!("Forecast returned no days");
    }
    let dates = reference.dates().to_vec();

    let weighted = weighted_forecast(&forecasts)?;

    let mut normals_10yr: Vec<(Station, StationNormals)> = Vec::with_capacity(stations.len());
    let mut normals_30yr: Vec<(Station, StationNormals)> = Vec::with_capacity(stations.len());
    for station in stations {
        normals_10yr.push((*station, source.fetch_normals(station, &NORMALS_10YR).await));
        normals_30yr.push((*station, source.fetch_normals(station, &NORMALS_30YR).await));
    }

    let rows = build_rows(
        &dates,
        &weighted,
        &weighted_normals(&dates, &normals_10yr),
        &weighted_normals(&dates, &normals_30yr),
    );

    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    let csv_name = csv_file_name(dates[0]);
    let csv_path = output_dir.join(&csv_name);
    let file = File::create(&csv_path)
        .with_context(|| format!("Failed to create {}", csv_path.display()))?;
    write_csv(file, &rows)?;
    tracing::info!("Wrote {} rows to {}", rows.len(), csv_path.display());

    let html_path = output_dir.join(HTML_FILENAME);
    let html = format_html_report(&rows, stations, generated_at, &csv_name);
    fs::write(&html_path, html)
        .with_context(|| format!("Failed to write {}", html_path.display()))?;
    tracing::info!("Wrote HTML report to {}", html_path.display());

    Ok(ReportOutput {
        weighted,
        rows,
        csv_path,
        html_path,
    })
}
