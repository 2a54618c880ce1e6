use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{DailySeries, MonthDay, Station, StationNormals};

#[derive(Debug, Error, PartialEq)]
pub enum CombineError {
    #[error("no station series to combine")]
    NoStations,
    #[error("station {station} returned {found} days, expected {expected}")]
    LengthMismatch {
        station: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("station {station} reported day {index} as {found}, expected {expected}")]
    DateMismatch {
        station: &'static str,
        index: usize,
        expected: NaiveDate,
        found: NaiveDate,
    },
}

/// Rounds to one decimal place, halves away from zero
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Sums terms in ascending order so the result does not depend on the
/// order stations were listed in.
fn canonical_sum(mut terms: Vec<f64>) -> f64 {
    terms.sort_by(f64::total_cmp);
    terms.into_iter().sum()
}

/// Combines per-station forecasts into one weighted series.
///
/// Entry `i` is `round(sum(weight * value[i]), 1)`. When any station has no
/// value for day `i` the combined entry is `None`.
pub fn weighted_forecast(
    stations: &[(Station, DailySeries)],
) -> Result<Vec<Option<f64>>, CombineError> {
    let Some((_, first)) = stations.first() else {
        return Err(CombineError::NoStations);
    };
    let days = first.len();

    for (station, series) in stations {
        if series.len() != days {
            return Err(CombineError::LengthMismatch {
                station: station.id,
                expected: days,
                found: series.len(),
            });
        }
        let shifted = first
            .dates()
            .iter()
            .zip(series.dates())
            .enumerate()
            .find(|(_, (expected, found))| expected != found);
        if let Some((index, (&expected, &found))) = shifted {
            return Err(CombineError::DateMismatch {
                station: station.id,
                index,
                expected,
                found,
            });
        }
    }

    let combined = (0..days)
        .map(|i| {
            stations
                .iter()
                .map(|(station, series)| series.values()[i].map(|v| v * station.weight))
                .collect::<Option<Vec<f64>>>()
                .map(|terms| round1(canonical_sum(terms)))
        })
        .collect();

    Ok(combined)
}

/// Weighted normal for each date, looked up by month-day.
///
/// Only stations holding a value for that month-day contribute, and the sum
/// is divided by their weights alone. No contributor gives `None`.
pub fn weighted_normals(
    dates: &[NaiveDate],
    stations: &[(Station, StationNormals)],
) -> Vec<Option<f64>> {
    dates
        .iter()
        .map(|&date| {
            let key = MonthDay::from(date);
            let (terms, weights): (Vec<f64>, Vec<f64>) = stations
                .iter()
                .filter_map(|(station, normals)| {
                    normals
                        .get(&key)
                        .map(|value| (value * station.weight, station.weight))
                })
                .unzip();

            let weight_sum = canonical_sum(weights);
            if terms.is_empty() || weight_sum <= 0.0 {
                return None;
            }
            Some(round1(canonical_sum(terms) / weight_sum))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NormalsMap;

    fn station(id: &'static str, weight: f64) -> Station {
        Station {
            id,
            name: id,
            latitude: 0.0,
            longitude: 0.0,
            weight,
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, d).unwrap()
    }

    fn series(values: &[Option<f64>]) -> DailySeries {
        let dates = (0..values.len()).map(|i| day(i as u32 + 1)).collect();
        DailySeries::new(dates, values.to_vec()).unwrap()
    }

    fn normals(entries: &[(u32, u32, f64)]) -> StationNormals {
        let map: NormalsMap = entries
            .iter()
            .map(|&(m, d, v)| (MonthDay::new(m, d).unwrap(), v))
            .collect();
        StationNormals::Available(map)
    }

    #[test]
    fn round1_rounds_half_away_from_zero() {
        assert_eq!(round1(45.25), 45.3);
        assert_eq!(round1(-1.25), -1.3);
        assert_eq!(round1(45.24), 45.2);
    }

    #[test]
    fn combines_with_fixed_weights() {
        let stations = vec![
            (station("A", 0.5), series(&[Some(40.0), Some(50.0)])),
            (station("B", 0.3), series(&[Some(30.0), Some(60.0)])),
            (station("C", 0.2), series(&[Some(20.0), Some(55.0)])),
        ];

        let combined = weighted_forecast(&stations).unwrap();

        // 20 + 9 + 4, 25 + 18 + 11
        assert_eq!(combined, vec![Some(33.0), Some(54.0)]);
    }

    #[test]
    fn weights_need_not_sum_to_one() {
        let stations = vec![
            (station("A", 1.0), series(&[Some(40.0)])),
            (station("B", 1.0), series(&[Some(30.0)])),
        ];

        assert_eq!(weighted_forecast(&stations).unwrap(), vec![Some(70.0)]);
    }

    #[test]
    fn station_order_does_not_change_result() {
        let a = (station("A", 0.54), series(&[Some(41.37), Some(39.91)]));
        let b = (station("B", 0.32), series(&[Some(43.12), Some(38.05)]));
        let c = (station("C", 0.13), series(&[Some(40.77), Some(37.49)]));
        let d = (station("D", 0.01), series(&[Some(47.03), Some(44.44)]));

        let forward = weighted_forecast(&[a.clone(), b.clone(), c.clone(), d.clone()]).unwrap();
        let reversed = weighted_forecast(&[d.clone(), c.clone(), b.clone(), a.clone()]).unwrap();
        let shuffled = weighted_forecast(&[c, a, d, b]).unwrap();

        assert_eq!(forward, reversed);
        assert_eq!(forward, shuffled);
    }

    #[test]
    fn missing_station_value_makes_day_absent() {
        let stations = vec![
            (station("A", 0.6), series(&[Some(40.0), None, Some(42.0)])),
            (station("B", 0.4), series(&[Some(30.0), Some(31.0), Some(32.0)])),
        ];

        assert_eq!(
            weighted_forecast(&stations).unwrap(),
            vec![Some(36.0), None, Some(38.0)]
        );
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let stations = vec![
            (station("A", 0.6), series(&[Some(40.0), Some(41.0)])),
            (station("B", 0.4), series(&[Some(30.0)])),
        ];

        assert_eq!(
            weighted_forecast(&stations),
            Err(CombineError::LengthMismatch {
                station: "B",
                expected: 2,
                found: 1
            })
        );
        assert_eq!(weighted_forecast(&[]), Err(CombineError::NoStations));
    }

    #[test]
    fn shifted_dates_are_rejected() {
        let shifted = DailySeries::new(vec![day(2), day(3)], vec![Some(30.0), Some(31.0)]).unwrap();
        let stations = vec![
            (station("A", 0.6), series(&[Some(40.0), Some(41.0)])),
            (station("B", 0.4), shifted),
        ];

        assert_eq!(
            weighted_forecast(&stations),
            Err(CombineError::DateMismatch {
                station: "B",
                index: 0,
                expected: day(1),
                found: day(2),
            })
        );
    }

    #[test]
    fn normals_renormalize_by_contributing_weight() {
        let stations = vec![
            (station("A", 0.6), normals(&[(7, 5, 70.0)])),
            (station("B", 0.4), normals(&[(7, 4, 80.0), (7, 5, 75.0)])),
        ];

        let combined = weighted_normals(&[day(4), day(5)], &stations);

        // 07-04 only from B, so 0.4 * 80 / 0.4
        assert_eq!(combined, vec![Some(80.0), Some(72.0)]);
    }

    #[test]
    fn normals_without_contributors_are_absent() {
        let stations = vec![
            (station("A", 0.6), StationNormals::Unavailable),
            (station("B", 0.4), normals(&[(7, 5, 75.0)])),
        ];

        let combined = weighted_normals(&[day(4), day(5)], &stations);

        assert_eq!(combined, vec![None, Some(75.0)]);
    }

    #[test]
    fn normals_ignore_year_of_forecast_date() {
        let stations = vec![(station("A", 1.0), normals(&[(2, 29, 33.3)]))];
        let leap = NaiveDate::from_ymd_opt(2028, 2, 29).unwrap();

        assert_eq!(weighted_normals(&[leap], &stations), vec![Some(33.3)]);
    }
}
