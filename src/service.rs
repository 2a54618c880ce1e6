use chrono::NaiveDate;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;

use crate::constants::{
    DAILY_METRIC, FORECAST_TIMEZONE, OPEN_METEO_API_BASE, OPEN_METEO_CLIMATE_BASE,
    REQUEST_TIMEOUT, USER_AGENT,
};
use crate::models::{DailySeries, NormalsWindow, OpenMeteoDailyResponse, Station, StationNormals};
use crate::normals::aggregate_by_month_day;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("request failed with status: {0}")]
    Status(StatusCode),
    #[error("response has {dates} dates but {values} values")]
    LengthMismatch { dates: usize, values: usize },
    #[error("invalid date in response: {0}")]
    InvalidDate(String),
}

/// Source of per-station daily temperatures.
///
/// Forecast failures are returned to the caller. Normals are best-effort:
/// every failure folds into [`StationNormals::Unavailable`].
pub trait WeatherSource {
    async fn fetch_forecast(&self, station: &Station, days: u32)
        -> Result<DailySeries, ClientError>;

    async fn fetch_normals(&self, station: &Station, window: &NormalsWindow) -> StationNormals;
}

/// Open-Meteo client for the forecast and climate endpoints
pub struct OpenMeteoService {
    client: Client,
    forecast_base: String,
    climate_base: String,
}

impl OpenMeteoService {
    /// Creates a new service against the public Open-Meteo endpoints
    pub fn new() -> Result<Self, ClientError> {
        Self::with_base_urls(OPEN_METEO_API_BASE, OPEN_METEO_CLIMATE_BASE)
    }

    /// Creates a service against the given forecast and climate API roots
    pub fn with_base_urls(forecast_base: &str, climate_base: &str) -> Result<Self, ClientError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            forecast_base: forecast_base.trim_end_matches('/').to_string(),
            climate_base: climate_base.trim_end_matches('/').to_string(),
        })
    }

    /// Makes an HTTP GET request and deserializes the JSON response
    async fn make_request<T: for<'de> Deserialize<'de>>(&self, url: &str) -> Result<T, ClientError> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(ClientError::Status(response.status()));
        }

        let data = response.json::<T>().await?;
        Ok(data)
    }
}

impl WeatherSource for OpenMeteoService {
    async fn fetch_forecast(
        &self,
        station: &Station,
        days: u32,
    ) -> Result<DailySeries, ClientError> {
        tracing::info!("Fetching {}-day forecast for {}", days, station.id);

        let url = forecast_url(&self.forecast_base, station, days);
        let response = self.make_request::<OpenMeteoDailyResponse>(&url).await?;
        parse_forecast(response)
    }

    async fn fetch_normals(&self, station: &Station, window: &NormalsWindow) -> StationNormals {
        tracing::info!(
            "Fetching {} normals ({}-{}) for {}",
            window.label,
            window.start_year,
            window.end_year,
            station.id
        );

        let url = climate_url(&self.climate_base, station, window);
        match self.make_request::<OpenMeteoDailyResponse>(&url).await {
            Ok(response) => {
                let normals =
                    aggregate_by_month_day(&response.daily.time, &response.daily.temperature_mean);
                if !normals.is_available() {
                    tracing::warn!(
                        "{} normals for {} unusable, treating as no data",
                        window.label,
                        station.id
                    );
                }
                normals
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to fetch {} normals for {}: {}",
                    window.label,
                    station.id,
                    e
                );
                StationNormals::Unavailable
            }
        }
    }
}

fn forecast_url(base: &str, station: &Station, days: u32) -> String {
    format!(
        "{}/forecast?latitude={}&longitude={}&daily={}&temperature_unit=fahrenheit&timezone={}&forecast_days={}",
        base, station.latitude, station.longitude, DAILY_METRIC, FORECAST_TIMEZONE, days
    )
}

fn climate_url(base: &str, station: &Station, window: &NormalsWindow) -> String {
    format!(
        "{}/climate?latitude={}&longitude={}&daily={}&temperature_unit=fahrenheit&start_year={}&end_year={}&timezone=UTC",
        base,
        station.latitude,
        station.longitude,
        DAILY_METRIC,
        window.start_year,
        window.end_year
    )
}

/// Validates a forecast payload into a series of matching dates and values
fn parse_forecast(response: OpenMeteoDailyResponse) -> Result<DailySeries, ClientError> {
    let daily = response.daily;
    let (date_count, value_count) = (daily.time.len(), daily.temperature_mean.len());

    let dates = daily
        .time
        .into_iter()
        .map(|t| NaiveDate::parse_from_str(&t, "%Y-%m-%d").map_err(|_| ClientError::InvalidDate(t)))
        .collect::<Result<Vec<_>, _>>()?;

    DailySeries::new(dates, daily.temperature_mean).ok_or(ClientError::LengthMismatch {
        dates: date_count,
        values: value_count,
    })
}
