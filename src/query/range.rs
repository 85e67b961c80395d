//! Date-range queries: per-point time series with summary statistics, and
//! region-level means for choropleth consumption.

use crate::dataset::record::Record;
use crate::query::error::QueryError;
use crate::query::point::{select, Observation};
use crate::query::resolver::ResolvedCoordinate;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Summary statistics over a series, computed only over defined values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesSummary {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub count: usize,
}

/// An ordered time series at one grid point.
///
/// `summary` is `None` when the series is empty; an empty range result is not
/// an error, so callers can tell "no data" apart from a failed query.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub observations: Vec<Observation>,
    pub summary: Option<SeriesSummary>,
}

/// Administrative grouping level for [`aggregate_by_region`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionLevel {
    State,
    District,
    Tehsil,
}

impl RegionLevel {
    fn label<'a>(&self, record: &'a Record) -> Option<&'a str> {
        match self {
            RegionLevel::State => record.state.as_deref(),
            RegionLevel::District => record.district.as_deref(),
            RegionLevel::Tehsil => record.tehsil.as_deref(),
        }
    }
}

/// Builds the time series at the resolved coordinate over `[start, end]`
/// (inclusive), ascending by date.
///
/// Each date in range is answered with the same exact-or-nearest selection as
/// a point lookup, so a one-day range agrees with [`crate::lookup`]. Fails
/// with [`QueryError::InvalidRange`] when `start > end`; an in-range span with
/// no records yields an empty series.
pub fn series(
    records: &[Record],
    coord: &ResolvedCoordinate,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Series, QueryError> {
    check_range(start, end)?;

    // BTreeMap keys give the ascending date order; per-date Vecs preserve
    // input order so the nearest-neighbor tie-break stays stable.
    let mut by_date: BTreeMap<NaiveDate, Vec<&Record>> = BTreeMap::new();
    for record in records {
        if record.date >= start && record.date <= end {
            by_date.entry(record.date).or_default().push(record);
        }
    }

    let observations: Vec<Observation> = by_date
        .into_values()
        .filter_map(|candidates| select(candidates, coord))
        .collect();

    let summary = summarize(&observations);
    Ok(Series {
        observations,
        summary,
    })
}

fn summarize(observations: &[Observation]) -> Option<SeriesSummary> {
    if observations.is_empty() {
        return None;
    }
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut sum = 0.0;
    for obs in observations {
        min = min.min(obs.value);
        max = max.max(obs.value);
        sum += obs.value;
    }
    Some(SeriesSummary {
        mean: sum / observations.len() as f64,
        min,
        max,
        count: observations.len(),
    })
}

/// Mean value per region over `[start, end]` (inclusive), grouped by the
/// normalized label at `level`.
///
/// Only in-range records with a defined value and a label at the requested
/// level contribute; regions with zero such records are omitted rather than
/// reported as zero.
pub fn aggregate_by_region(
    records: &[Record],
    start: NaiveDate,
    end: NaiveDate,
    level: RegionLevel,
) -> Result<BTreeMap<String, f64>, QueryError> {
    check_range(start, end)?;

    let mut sums: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    for record in records {
        if record.date < start || record.date > end {
            continue;
        }
        let Some(value) = record.value else { continue };
        let Some(label) = level.label(record) else {
            continue;
        };
        let entry = sums.entry(label.to_string()).or_insert((0.0, 0));
        entry.0 += value;
        entry.1 += 1;
    }

    Ok(sums
        .into_iter()
        .map(|(label, (sum, count))| (label, sum / count as f64))
        .collect())
}

fn check_range(start: NaiveDate, end: NaiveDate) -> Result<(), QueryError> {
    if start > end {
        return Err(QueryError::InvalidRange { start, end });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::point::lookup;

    fn record(date: &str, lat: f64, lon: f64, value: Option<f64>, state: &str) -> Record {
        Record {
            date: date.parse().unwrap(),
            lat: Some(lat),
            lon: Some(lon),
            value,
            state: (!state.is_empty()).then(|| state.to_string()),
            district: None,
            tehsil: None,
        }
    }

    fn coord(snapped_lat: f64, snapped_lon: f64) -> ResolvedCoordinate {
        ResolvedCoordinate {
            requested_lat: snapped_lat,
            requested_lon: snapped_lon,
            snapped_lat,
            snapped_lon,
            within_bounds: true,
            on_lattice: true,
        }
    }

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn january_records() -> Vec<Record> {
        vec![
            record("2020-01-03", 19.5, 80.25, Some(4.0), "maharashtra"),
            record("2020-01-01", 19.5, 80.25, Some(12.4), "maharashtra"),
            record("2020-01-02", 19.5, 80.25, Some(0.0), "maharashtra"),
            record("2020-01-02", 19.75, 80.25, Some(99.0), "chhattisgarh"),
        ]
    }

    #[test]
    fn series_is_ordered_ascending_by_date() {
        let records = january_records();
        let result = series(&records, &coord(19.5, 80.25), d("2020-01-01"), d("2020-01-31")).unwrap();
        let dates: Vec<NaiveDate> = result.observations.iter().map(|o| o.date).collect();
        assert_eq!(
            dates,
            vec![d("2020-01-01"), d("2020-01-02"), d("2020-01-03")]
        );
        let values: Vec<f64> = result.observations.iter().map(|o| o.value).collect();
        assert_eq!(values, vec![12.4, 0.0, 4.0]);
    }

    #[test]
    fn series_summary_over_defined_values() {
        let records = january_records();
        let result = series(&records, &coord(19.5, 80.25), d("2020-01-01"), d("2020-01-03")).unwrap();
        let summary = result.summary.unwrap();
        assert_eq!(summary.count, 3);
        assert_eq!(summary.min, 0.0);
        assert_eq!(summary.max, 12.4);
        assert!((summary.mean - (12.4 + 0.0 + 4.0) / 3.0).abs() < 1e-12);
    }

    #[test]
    fn empty_range_result_is_a_series_not_an_error() {
        let records = january_records();
        let result = series(&records, &coord(19.5, 80.25), d("2021-06-01"), d("2021-06-30")).unwrap();
        assert!(result.observations.is_empty());
        assert!(result.summary.is_none());
    }

    #[test]
    fn reversed_range_is_invalid() {
        let records = january_records();
        let err = series(&records, &coord(19.5, 80.25), d("2020-01-10"), d("2020-01-01")).unwrap_err();
        assert!(matches!(err, QueryError::InvalidRange { .. }));

        let err =
            aggregate_by_region(&records, d("2020-01-10"), d("2020-01-01"), RegionLevel::State)
                .unwrap_err();
        assert!(matches!(err, QueryError::InvalidRange { .. }));
    }

    #[test]
    fn one_day_series_agrees_with_lookup() {
        let records = january_records();
        let c = coord(19.5, 80.25);
        let day = d("2020-01-02");
        let from_series = series(&records, &c, day, day).unwrap();
        let from_lookup = lookup(&records, &c, day).unwrap();
        assert_eq!(from_series.observations, vec![from_lookup]);
    }

    #[test]
    fn undefined_values_do_not_reach_the_series() {
        let records = vec![
            record("2020-01-01", 19.5, 80.25, None, "maharashtra"),
            record("2020-01-02", 19.5, 80.25, Some(3.0), "maharashtra"),
        ];
        let result = series(&records, &coord(19.5, 80.25), d("2020-01-01"), d("2020-01-02")).unwrap();
        assert_eq!(result.observations.len(), 1);
        assert_eq!(result.summary.unwrap().count, 1);
    }

    #[test]
    fn region_means_group_by_normalized_label() {
        let records = january_records();
        let means =
            aggregate_by_region(&records, d("2020-01-01"), d("2020-01-31"), RegionLevel::State)
                .unwrap();
        assert_eq!(means.len(), 2);
        let maha = means["maharashtra"];
        assert!((maha - (12.4 + 0.0 + 4.0) / 3.0).abs() < 1e-12);
        assert_eq!(means["chhattisgarh"], 99.0);
    }

    #[test]
    fn regions_without_in_range_records_are_omitted() {
        let records = january_records();
        let means =
            aggregate_by_region(&records, d("2020-01-01"), d("2020-01-01"), RegionLevel::State)
                .unwrap();
        assert_eq!(means.len(), 1);
        assert!(means.contains_key("maharashtra"));
        assert!(!means.contains_key("chhattisgarh"));
    }

    #[test]
    fn records_without_labels_are_skipped() {
        let records = vec![
            record("2020-01-01", 19.5, 80.25, Some(2.0), ""),
            record("2020-01-01", 19.5, 80.25, Some(4.0), "maharashtra"),
        ];
        let means =
            aggregate_by_region(&records, d("2020-01-01"), d("2020-01-31"), RegionLevel::State)
                .unwrap();
        assert_eq!(means.len(), 1);
        assert_eq!(means["maharashtra"], 4.0);

        // No district labels at all: empty mapping, not an error.
        let means = aggregate_by_region(
            &records,
            d("2020-01-01"),
            d("2020-01-31"),
            RegionLevel::District,
        )
        .unwrap();
        assert!(means.is_empty());
    }
}
