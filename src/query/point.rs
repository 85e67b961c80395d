//! Single-day lookup at a resolved grid coordinate: tolerant exact match
//! first, nearest-neighbor fallback otherwise.

use crate::dataset::record::Record;
use crate::query::error::QueryError;
use crate::query::resolver::{ResolvedCoordinate, COORD_EPSILON};
use chrono::NaiveDate;
use ordered_float::OrderedFloat;

/// One answered observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub date: NaiveDate,
    /// Coordinates of the record that answered the query, which differ from
    /// the snapped coordinate when the nearest-neighbor fallback fired.
    pub lat: f64,
    pub lon: f64,
    pub value: f64,
    /// True when the record matched the snapped coordinate within tolerance.
    pub exact: bool,
    /// Euclidean distance in degrees between the matched record and the
    /// snapped coordinate.
    pub distance: f64,
}

/// Returns the observation for `date` at the resolved coordinate.
///
/// Records for other dates, and records with undefined coordinates or value,
/// are not candidates; if none remain the call fails with
/// [`QueryError::NoDataForDate`]. Given any candidate at all the lookup
/// always answers: an exact (tolerant) match wins, otherwise the candidate at
/// minimum squared distance, ties broken by first occurrence in input order.
pub fn lookup(
    records: &[Record],
    coord: &ResolvedCoordinate,
    date: NaiveDate,
) -> Result<Observation, QueryError> {
    let candidates = records.iter().filter(|r| r.date == date);
    select(candidates, coord).ok_or(QueryError::NoDataForDate { date })
}

/// Picks the best candidate for one date. Shared by point lookup and the
/// range aggregator so both agree on match semantics.
pub(crate) fn select<'a, I>(candidates: I, coord: &ResolvedCoordinate) -> Option<Observation>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut best: Option<(&Record, f64)> = None;

    for record in candidates {
        let (Some(lat), Some(lon), Some(_)) = (record.lat, record.lon, record.value) else {
            continue;
        };
        let d_lat = lat - coord.snapped_lat;
        let d_lon = lon - coord.snapped_lon;

        if d_lat.abs() < COORD_EPSILON && d_lon.abs() < COORD_EPSILON {
            // Tolerant exact match: preferred, returned immediately.
            return Some(to_observation(record, lat, lon, true, d_lat, d_lon));
        }

        let dist2 = d_lat * d_lat + d_lon * d_lon;
        // Strict less-than keeps the first occurrence on ties.
        let better = match &best {
            Some((_, best_dist2)) => OrderedFloat(dist2) < OrderedFloat(*best_dist2),
            None => true,
        };
        if better {
            best = Some((record, dist2));
        }
    }

    best.map(|(record, _)| {
        // Candidates always have defined coordinates at this point.
        let lat = record.lat.unwrap_or_default();
        let lon = record.lon.unwrap_or_default();
        let d_lat = lat - coord.snapped_lat;
        let d_lon = lon - coord.snapped_lon;
        to_observation(record, lat, lon, false, d_lat, d_lon)
    })
}

fn to_observation(
    record: &Record,
    lat: f64,
    lon: f64,
    exact: bool,
    d_lat: f64,
    d_lon: f64,
) -> Observation {
    Observation {
        date: record.date,
        lat,
        lon,
        value: record.value.unwrap_or_default(),
        exact,
        distance: (d_lat * d_lat + d_lon * d_lon).sqrt(),
    }
}
