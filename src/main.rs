mod combine;
mod constants;
mod formatters;
mod models;
mod normals;
mod pipeline;
mod report;
mod service;

use std::path::Path;

use anyhow::Result;
use chrono::Local;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::constants::{OUTPUT_DIR, STATIONS};
use crate::formatters::format_weighted_series;
use crate::service::OpenMeteoService;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ohio_forecast=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting weighted Ohio forecast for {} stations", STATIONS.len());

    let service = OpenMeteoService::new()?;
    let generated_at = Local::now().format("%Y-%m-%d %H:%M %Z").to_string();
    let output = pipeline::run(&service, STATIONS, Path::new(OUTPUT_DIR), &generated_at).await?;

    let missing_normals = output
        .rows
        .iter()
        .filter(|row| row.normal_10yr.is_none() || row.normal_30yr.is_none())
        .count();
    if missing_normals > 0 {
        tracing::warn!(
            "{} of {} days have no normal for at least one window",
            missing_normals,
            output.rows.len()
        );
    }

    println!("{}", format_weighted_series(&output.weighted));
    println!("Saved: {}", output.csv_path.display());
    println!("Saved: {}", output.html_path.display());

    tracing::info!("Forecast report complete");
    Ok(())
}
