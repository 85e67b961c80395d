use crate::schema::{Axis, SchemaError};
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("{axis} {value} is outside the grid's valid range [{min}, {max}]")]
    OutOfBounds {
        axis: Axis,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("no usable data recorded for {date}")]
    NoDataForDate { date: NaiveDate },

    #[error("invalid date range: start {start} is after end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error(transparent)]
    Schema(#[from] SchemaError),
}
