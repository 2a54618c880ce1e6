use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

// ============================================================================
// Open-Meteo API Models
// ============================================================================

/// Shared shape of the forecast and climate endpoints for a single daily metric
#[derive(Debug, Deserialize)]
pub struct OpenMeteoDailyResponse {
    pub daily: DailyData,
}

#[derive(Debug, Deserialize)]
pub struct DailyData {
    #[serde(default)]
    pub time: Vec<String>,
    #[serde(rename = "temperature_2m_mean", default)]
    pub temperature_mean: Vec<Option<f64>>,
}

// ============================================================================
// Domain Models
// ============================================================================

/// A weather station contributing to the weighted average
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Station {
    pub id: &'static str,
    pub name: &'static str,
    pub latitude: f64,
    pub longitude: f64,
    /// Relative contribution; weights need not sum to 1
    pub weight: f64,
}

/// Inclusive range of years averaged into a normal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalsWindow {
    pub label: &'static str,
    pub start_year: i32,
    pub end_year: i32,
}

/// Ordered daily values for one station. A `None` value is a day the
/// upstream service reported as null.
#[derive(Debug, Clone, PartialEq)]
pub struct DailySeries {
    dates: Vec<NaiveDate>,
    values: Vec<Option<f64>>,
}

impl DailySeries {
    /// Returns `None` when the two arrays disagree in length
    pub fn new(dates: Vec<NaiveDate>, values: Vec<Option<f64>>) -> Option<Self> {
        (dates.len() == values.len()).then_some(Self { dates, values })
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// Calendar day independent of year, rendered as `MM-DD`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthDay {
    month: u32,
    day: u32,
}

impl MonthDay {
    #[cfg(test)]
    pub fn new(month: u32, day: u32) -> Option<Self> {
        // 2000 is a leap year, so 02-29 is accepted
        NaiveDate::from_ymd_opt(2000, month, day).map(|_| Self { month, day })
    }
}

impl From<NaiveDate> for MonthDay {
    fn from(date: NaiveDate) -> Self {
        Self {
            month: date.month(),
            day: date.day(),
        }
    }
}

impl fmt::Display for MonthDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:02}", self.month, self.day)
    }
}

/// Climatological mean per calendar day
pub type NormalsMap = BTreeMap<MonthDay, f64>;

/// Outcome of a best-effort normals fetch.
///
/// `Unavailable` covers every failure mode (transport, status, malformed
/// payload). It contributes nothing to weighting, same as a missing day.
#[derive(Debug, Clone, PartialEq)]
pub enum StationNormals {
    Available(NormalsMap),
    Unavailable,
}

impl StationNormals {
    pub fn get(&self, key: &MonthDay) -> Option<f64> {
        match self {
            StationNormals::Available(map) => map.get(key).copied(),
            StationNormals::Unavailable => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, StationNormals::Available(_))
    }
}

/// One line of the final report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub date: NaiveDate,
    #[serde(rename = "weighted_avg_f")]
    pub weighted_avg: Option<f64>,
    #[serde(rename = "day_over_day_change_f")]
    pub change: Option<f64>,
    #[serde(rename = "normal_10yr_f")]
    pub normal_10yr: Option<f64>,
    #[serde(rename = "normal_30yr_f")]
    pub normal_30yr: Option<f64>,
}
