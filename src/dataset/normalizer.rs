//! Turns a raw loaded table into a canonical [`Dataset`]: lower-cased column
//! names, parsed calendar dates, numeric coordinates and values, swapped-axis
//! correction, and normalized administrative labels.

use crate::dataset::error::DatasetError;
use crate::dataset::record::{Dataset, QualityReport, Record};
use crate::schema::Parameter;
use chrono::{DateTime, NaiveDate, Utc};
use log::{debug, warn};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Days between 0001-01-01 (chrono's epoch for `from_num_days_from_ce`) and
/// 1970-01-01 (polars' Date epoch).
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Date layouts accepted when the date column arrives as strings.
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%d-%m-%Y"];

/// Tuning knobs for normalization.
///
/// `lon_plausible_min` drives the axis-swap heuristic: if the largest observed
/// longitude in a dataset is at or below this value, the lat/lon columns are
/// assumed swapped and are corrected. The default of 40.0 suits the Indian
/// subcontinent grids (every real longitude there is well above 40°E); other
/// domains should set their own threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizerOptions {
    pub lon_plausible_min: f64,
}

impl Default for NormalizerOptions {
    fn default() -> Self {
        NormalizerOptions {
            lon_plausible_min: 40.0,
        }
    }
}

/// Normalizes a raw table for `parameter` into an immutable [`Dataset`].
///
/// Rows whose date fails to parse are dropped and counted in the returned
/// [`QualityReport`]; coordinate or value coercion failures mark the field
/// `None` instead of dropping the row. The whole input is rejected only when
/// nothing usable remains, never for individual bad rows.
pub fn normalize(
    df: DataFrame,
    parameter: Parameter,
    options: &NormalizerOptions,
) -> Result<Dataset, DatasetError> {
    let rows_in = df.height();
    if rows_in == 0 {
        return Err(DatasetError::EmptyInput { parameter });
    }

    let mut df = df;
    let lowered: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.to_lowercase())
        .collect();
    df.set_column_names(lowered)?;

    let value_column = parameter.value_column();
    if df.column(value_column).is_err() {
        return Err(DatasetError::MissingValueColumn {
            parameter,
            column: value_column.to_string(),
        });
    }

    let dates = parse_date_column(&df)?;
    let lats = numeric_column(&df, "lat")?;
    let lons = numeric_column(&df, "lon")?;
    let values = numeric_column(&df, value_column)?;
    let states = label_column(&df, "state");
    let districts = label_column(&df, "district");
    let tehsils = label_column(&df, "tehsil");

    let (lats, lons, axis_swapped) = correct_axis_swap(lats, lons, options);
    if axis_swapped {
        warn!(
            "lat/lon columns for parameter '{}' look swapped (max lon <= {}); corrected",
            parameter, options.lon_plausible_min
        );
    }

    let mut records = Vec::with_capacity(rows_in);
    let mut rows_dropped_bad_date = 0usize;
    for i in 0..rows_in {
        let Some(date) = dates[i] else {
            rows_dropped_bad_date += 1;
            continue;
        };
        records.push(Record {
            date,
            lat: lats[i],
            lon: lons[i],
            value: values[i],
            state: states.as_ref().and_then(|c| c[i].clone()),
            district: districts.as_ref().and_then(|c| c[i].clone()),
            tehsil: tehsils.as_ref().and_then(|c| c[i].clone()),
        });
    }

    if records.is_empty() {
        return Err(DatasetError::NoValidRows {
            parameter,
            dropped: rows_dropped_bad_date,
        });
    }
    if rows_dropped_bad_date > 0 {
        warn!(
            "dropped {} of {} rows with unparseable dates for parameter '{}'",
            rows_dropped_bad_date, rows_in, parameter
        );
    }
    debug!(
        "normalized {} records for parameter '{}' (axis_swapped={})",
        records.len(),
        parameter,
        axis_swapped
    );

    Ok(Dataset {
        parameter,
        records,
        quality: QualityReport {
            rows_in,
            rows_dropped_bad_date,
            axis_swapped,
        },
    })
}

/// Parses the `date` column to calendar dates, yielding `None` per row on
/// failure. Accepts native Date/Datetime columns or strings in the layouts
/// listed in [`DATE_FORMATS`].
fn parse_date_column(df: &DataFrame) -> Result<Vec<Option<NaiveDate>>, DatasetError> {
    let column = df
        .column("date")
        .map_err(|_| DatasetError::MissingColumn("date".to_string()))?;

    let parsed = match column.dtype() {
        DataType::Date => column
            .date()?
            .into_iter()
            .map(|days| {
                days.and_then(|d| NaiveDate::from_num_days_from_ce_opt(d + UNIX_EPOCH_DAYS_FROM_CE))
            })
            .collect(),
        DataType::Datetime(time_unit, _) => {
            let time_unit = *time_unit;
            column
                .datetime()?
                .into_iter()
                .map(|ts| ts.and_then(|t| timestamp_to_date(t, time_unit)))
                .collect()
        }
        DataType::String => column
            .str()?
            .into_iter()
            .map(|s| s.and_then(parse_date_str))
            .collect(),
        _ => {
            // Last resort: render to strings and parse those.
            column
                .cast(&DataType::String)?
                .str()?
                .into_iter()
                .map(|s| s.and_then(parse_date_str))
                .collect()
        }
    };
    Ok(parsed)
}

fn timestamp_to_date(timestamp: i64, time_unit: TimeUnit) -> Option<NaiveDate> {
    let datetime: Option<DateTime<Utc>> = match time_unit {
        TimeUnit::Milliseconds => DateTime::from_timestamp_millis(timestamp),
        TimeUnit::Microseconds => DateTime::from_timestamp_micros(timestamp),
        TimeUnit::Nanoseconds => Some(DateTime::from_timestamp_nanos(timestamp)),
    };
    datetime.map(|dt| dt.date_naive())
}

fn parse_date_str(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(s, format).ok())
}

/// Coerces a column to f64, one `Option` per row. A non-strict cast turns
/// unparseable cells into `None` rather than failing the call.
fn numeric_column(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>, DatasetError> {
    let column = df
        .column(name)
        .map_err(|_| DatasetError::MissingColumn(name.to_string()))?;
    let casted = column.cast(&DataType::Float64)?;
    let values = casted
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| x.is_finite()))
        .collect();
    Ok(values)
}

/// Reads an optional administrative label column, trimmed and lower-cased for
/// stable grouping. Blank cells become `None`.
fn label_column(df: &DataFrame, name: &str) -> Option<Vec<Option<String>>> {
    let column = df.column(name).ok()?;
    let casted = column.cast(&DataType::String).ok()?;
    let labels = casted
        .str()
        .ok()?
        .into_iter()
        .map(|s| {
            s.map(|raw| raw.trim().to_lowercase())
                .filter(|cleaned| !cleaned.is_empty())
        })
        .collect();
    Some(labels)
}

/// Applies the axis-swap heuristic once, across the whole dataset and before
/// any filtering: if no observed longitude is plausible as a longitude for
/// the domain, the columns are swapped.
fn correct_axis_swap(
    lats: Vec<Option<f64>>,
    lons: Vec<Option<f64>>,
    options: &NormalizerOptions,
) -> (Vec<Option<f64>>, Vec<Option<f64>>, bool) {
    let max_lon = lons
        .iter()
        .filter_map(|v| *v)
        .fold(f64::NEG_INFINITY, f64::max);
    if max_lon.is_finite() && max_lon <= options.lon_plausible_min {
        (lons, lats, true)
    } else {
        (lats, lons, false)
    }
}
