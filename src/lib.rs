//! Point and range queries against regular lat/lon gridded climate data.
//!
//! The engine takes a user-supplied (possibly off-grid) coordinate, a
//! parameter, and a date or date range, resolves the coordinate to the
//! correct grid cell, and answers with a single observation or an aggregated
//! time series. It never interpolates: every answer is an existing grid
//! cell's value.

mod client;
mod dataset;
mod error;
mod query;
mod schema;
mod store;

pub use client::GridClim;
pub use error::GridClimError;

pub use schema::{Axis, GridConfig, GridSchemaRegistry, Parameter, SchemaError, LATTICE_EPSILON};

pub use dataset::error::DatasetError;
pub use dataset::normalizer::{normalize, NormalizerOptions};
pub use dataset::record::{Dataset, QualityReport, Record};

pub use query::error::QueryError;
pub use query::point::{lookup, Observation};
pub use query::range::{aggregate_by_region, series, RegionLevel, Series, SeriesSummary};
pub use query::resolver::{resolve, ResolvedCoordinate, COORD_EPSILON};

pub use store::{GridStore, StoreError};
