use std::time::Duration;

use crate::models::{NormalsWindow, Station};

/// User agent string for HTTP requests
pub const USER_AGENT: &str = "ohio-forecast/0.1.0";

/// Open-Meteo forecast API base URL
pub const OPEN_METEO_API_BASE: &str = "https://api.open-meteo.com/v1";

/// Open-Meteo climate API base URL
pub const OPEN_METEO_CLIMATE_BASE: &str = "https://climate-api.open-meteo.com/v1";

/// Daily metric requested from both endpoints
pub const DAILY_METRIC: &str = "temperature_2m_mean";

/// Timezone used to bucket forecast days, URL-encoded
pub const FORECAST_TIMEZONE: &str = "America%2FNew_York";

/// Per-request timeout for both endpoints
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(40);

/// Number of forecast days requested per station
pub const FORECAST_DAYS: u32 = 15;

/// Day-over-day change (°F) at or beyond which a row is highlighted
pub const HIGHLIGHT_THRESHOLD_F: f64 = 2.0;

/// Directory the reports are written to, created on demand
pub const OUTPUT_DIR: &str = "data";

/// CSV report name prefix; the first forecast date is appended
pub const CSV_PREFIX: &str = "weighted_ohio_forecast";

/// Fixed name of the HTML report
pub const HTML_FILENAME: &str = "weighted_ohio_forecast.html";

/// Ohio airports and their contribution to the weighted average
pub const STATIONS: &[Station] = &[
    Station {
        id: "CLE",
        name: "Cleveland",
        latitude: 41.4117,
        longitude: -81.8498,
        weight: 0.54,
    },
    Station {
        id: "CAK",
        name: "Akron",
        latitude: 40.9163,
        longitude: -81.4422,
        weight: 0.32,
    },
    Station {
        id: "YNG",
        name: "Youngstown",
        latitude: 41.2607,
        longitude: -80.6791,
        weight: 0.13,
    },
    Station {
        id: "CMH",
        name: "Columbus",
        latitude: 39.9980,
        longitude: -82.8919,
        weight: 0.01,
    },
];

/// Last ten complete years
pub const NORMALS_10YR: NormalsWindow = NormalsWindow {
    label: "10yr",
    start_year: 2015,
    end_year: 2024,
};

/// WMO standard normals period
pub const NORMALS_30YR: NormalsWindow = NormalsWindow {
    label: "30yr",
    start_year: 1991,
    end_year: 2020,
};
