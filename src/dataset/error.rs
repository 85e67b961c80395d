use crate::schema::Parameter;
use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("no rows in input for parameter '{parameter}'")]
    EmptyInput { parameter: Parameter },

    #[error("no rows remain for parameter '{parameter}' after date parsing ({dropped} dropped)")]
    NoValidRows { parameter: Parameter, dropped: usize },

    #[error("required value column '{column}' not found for parameter '{parameter}'")]
    MissingValueColumn {
        parameter: Parameter,
        column: String,
    },

    #[error("required column '{0}' not found")]
    MissingColumn(String),

    #[error(transparent)]
    Polars(#[from] PolarsError),
}
