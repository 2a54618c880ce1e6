use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::combine::round1;
use crate::models::{MonthDay, NormalsMap, StationNormals};

/// Collapses a multi-year daily series into a mean per calendar day.
///
/// Null values are left out of both the sum and the count, and entries whose
/// date cannot be parsed are skipped. A calendar day with no valid value is
/// absent from the map. Empty or mismatched arrays are `Unavailable`.
pub fn aggregate_by_month_day(times: &[String], values: &[Option<f64>]) -> StationNormals {
    if times.is_empty() || values.is_empty() || times.len() != values.len() {
        tracing::debug!(
            "Normals series unusable: {} dates, {} values",
            times.len(),
            values.len()
        );
        return StationNormals::Unavailable;
    }

    let mut buckets: BTreeMap<MonthDay, (f64, u32)> = BTreeMap::new();
    for (time, value) in times.iter().zip(values) {
        let Some(value) = value else { continue };
        let Ok(date) = NaiveDate::parse_from_str(time, "%Y-%m-%d") else {
            tracing::debug!("Skipping unparseable date {:?}", time);
            continue;
        };
        let bucket = buckets.entry(MonthDay::from(date)).or_insert((0.0, 0));
        bucket.0 += value;
        bucket.1 += 1;
    }

    let map: NormalsMap = buckets
        .into_iter()
        .map(|(key, (sum, count))| (key, round1(sum / f64::from(count))))
        .collect();

    StationNormals::Available(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn averages_across_years_ignoring_year() {
        let times = strings(&["2019-01-15", "2020-01-15", "2021-01-15", "2021-01-16"]);
        let values = vec![Some(20.0), Some(25.0), Some(27.0), Some(30.0)];

        let StationNormals::Available(map) = aggregate_by_month_day(&times, &values) else {
            panic!("expected normals");
        };

        assert_eq!(map.len(), 2);
        assert_eq!(map[&MonthDay::new(1, 15).unwrap()], 24.0);
        assert_eq!(map[&MonthDay::new(1, 16).unwrap()], 30.0);
    }

    #[test]
    fn leap_day_null_excluded_from_mean_and_count() {
        let times = strings(&["2012-02-29", "2016-02-29", "2020-02-29"]);
        let values = vec![Some(30.0), None, Some(33.0)];

        let normals = aggregate_by_month_day(&times, &values);

        // (30 + 33) / 2, not (30 + 0 + 33) / 3
        assert_eq!(normals.get(&MonthDay::new(2, 29).unwrap()), Some(31.5));
    }

    #[test]
    fn day_with_only_nulls_is_absent() {
        let times = strings(&["2020-03-01", "2021-03-01", "2021-03-02"]);
        let values = vec![None, None, Some(40.0)];

        let StationNormals::Available(map) = aggregate_by_month_day(&times, &values) else {
            panic!("expected normals");
        };

        assert!(!map.contains_key(&MonthDay::new(3, 1).unwrap()));
        assert_eq!(map.get(&MonthDay::new(3, 2).unwrap()), Some(&40.0));
    }

    #[test]
    fn mean_is_rounded_to_one_decimal() {
        let times = strings(&["2018-05-05", "2019-05-05", "2020-05-05"]);
        let values = vec![Some(60.0), Some(61.0), Some(61.0)];

        let normals = aggregate_by_month_day(&times, &values);

        assert_eq!(normals.get(&MonthDay::new(5, 5).unwrap()), Some(60.7));
    }

    #[test]
    fn unparseable_dates_are_skipped() {
        let times = strings(&["garbage", "2020-06-01"]);
        let values = vec![Some(99.0), Some(70.0)];

        let StationNormals::Available(map) = aggregate_by_month_day(&times, &values) else {
            panic!("expected normals");
        };

        assert_eq!(map.len(), 1);
        assert_eq!(map[&MonthDay::new(6, 1).unwrap()], 70.0);
    }

    #[test]
    fn mismatched_or_empty_arrays_are_unavailable() {
        let times = strings(&["2020-06-01", "2020-06-02"]);
        assert_eq!(
            aggregate_by_month_day(&times, &[Some(70.0)]),
            StationNormals::Unavailable
        );
        assert_eq!(aggregate_by_month_day(&[], &[]), StationNormals::Unavailable);
    }
}
