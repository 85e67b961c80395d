//! The main entry point for querying gridded climate data.
//!
//! [`GridClim`] wires the engine together: the schema registry supplies grid
//! geometry, the store loads per-year files, the normalizer produces
//! immutable datasets, and the query layer answers point and range requests.
//! The client keeps no per-query state, so one instance can serve concurrent
//! queries from multiple threads.

use crate::dataset::normalizer::{normalize, NormalizerOptions};
use crate::dataset::record::Dataset;
use crate::error::GridClimError;
use crate::query::point::{lookup, Observation};
use crate::query::range::{aggregate_by_region, series, RegionLevel, Series};
use crate::query::resolver::{resolve, ResolvedCoordinate};
use crate::schema::{GridSchemaRegistry, Parameter};
use crate::store::GridStore;
use bon::bon;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Client over a grid schema registry and an optional data directory.
///
/// Construct with [`GridClim::new`] for the default IMD grids without file
/// access, or [`GridClim::with_data_dir`] to also load per-year files through
/// the built-in store.
///
/// # Examples
///
/// ```
/// use gridclim::{GridClim, Parameter};
///
/// let client = GridClim::new();
/// let coord = client
///     .resolve()
///     .parameter(Parameter::Rainfall)
///     .lat(19.51)
///     .lon(80.26)
///     .call()
///     .unwrap();
/// assert_eq!(coord.snapped_lat, 19.5);
/// assert!(!coord.on_lattice);
/// ```
pub struct GridClim {
    registry: GridSchemaRegistry,
    normalizer_options: NormalizerOptions,
    store: Option<GridStore>,
}

impl GridClim {
    /// Client with the default registry and no data directory.
    pub fn new() -> Self {
        GridClim {
            registry: GridSchemaRegistry::default(),
            normalizer_options: NormalizerOptions::default(),
            store: None,
        }
    }

    /// Client with the default registry, loading files from `data_dir`.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        GridClim {
            store: Some(GridStore::new(data_dir)),
            ..Self::new()
        }
    }

    /// Replaces the schema registry, e.g. for non-IMD grid geometry.
    pub fn with_registry(mut self, registry: GridSchemaRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Replaces the normalizer options, e.g. the axis-swap threshold for a
    /// different geographic domain.
    pub fn with_normalizer_options(mut self, options: NormalizerOptions) -> Self {
        self.normalizer_options = options;
        self
    }
}

impl Default for GridClim {
    fn default() -> Self {
        Self::new()
    }
}

#[bon]
impl GridClim {
    /// Loads and normalizes one parameter's data.
    ///
    /// # Arguments
    ///
    /// * `.parameter(Parameter)`: **Required.** Which parameter to load.
    /// * `.year(i32)`: Optional. One year's file; when omitted, every
    ///   available year is loaded and concatenated.
    ///
    /// # Errors
    ///
    /// [`GridClimError::NoDataDir`] if the client was built without a data
    /// directory; [`GridClimError::Store`] for discovery/read failures;
    /// [`GridClimError::Dataset`] for the `EmptyDataset` family (no rows, no
    /// parseable dates, missing value column).
    #[builder]
    pub fn dataset(
        &self,
        parameter: Parameter,
        year: Option<i32>,
    ) -> Result<Dataset, GridClimError> {
        let store = self.store.as_ref().ok_or(GridClimError::NoDataDir)?;
        let df = match year {
            Some(year) => store.load_year(parameter, year)?,
            None => store.load_all(parameter)?,
        };
        Ok(normalize(df, parameter, &self.normalizer_options)?)
    }

    /// Years with data available for a parameter, sorted ascending.
    pub fn available_years(&self, parameter: Parameter) -> Result<Vec<i32>, GridClimError> {
        let store = self.store.as_ref().ok_or(GridClimError::NoDataDir)?;
        Ok(store.available_years(parameter)?)
    }

    /// Validates a user coordinate against a parameter's grid and snaps it to
    /// the nearest lattice point.
    ///
    /// Out-of-bounds input fails with the violated axis and the valid range;
    /// in-bounds off-grid input succeeds with `on_lattice = false`.
    #[builder]
    pub fn resolve(
        &self,
        parameter: Parameter,
        lat: f64,
        lon: f64,
    ) -> Result<ResolvedCoordinate, GridClimError> {
        let config = self.registry.config_for(parameter)?;
        Ok(resolve(config, lat, lon)?)
    }

    /// Returns the observation at `(lat, lon)` for one date.
    ///
    /// Resolves the coordinate against the dataset's parameter, then matches
    /// exactly (within tolerance) or by nearest neighbor.
    ///
    /// # Arguments
    ///
    /// * `.dataset(&Dataset)`: **Required.** A normalized dataset.
    /// * `.lat(f64)` / `.lon(f64)`: **Required.** User coordinate, validated
    ///   here; off-grid points are snapped, out-of-bounds points fail.
    /// * `.date(NaiveDate)`: **Required.** The calendar day to answer for.
    #[builder]
    pub fn lookup(
        &self,
        dataset: &Dataset,
        lat: f64,
        lon: f64,
        date: NaiveDate,
    ) -> Result<Observation, GridClimError> {
        let config = self.registry.config_for(dataset.parameter)?;
        let coord = resolve(config, lat, lon)?;
        Ok(lookup(&dataset.records, &coord, date)?)
    }

    /// Returns the time series at `(lat, lon)` over `[start, end]`
    /// (inclusive), ascending by date, with summary statistics over the
    /// defined values.
    #[builder]
    pub fn series(
        &self,
        dataset: &Dataset,
        lat: f64,
        lon: f64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Series, GridClimError> {
        let config = self.registry.config_for(dataset.parameter)?;
        let coord = resolve(config, lat, lon)?;
        Ok(series(&dataset.records, &coord, start, end)?)
    }

    /// Mean value per administrative region over `[start, end]`, for
    /// choropleth consumption. Regions with no in-range, value-defined
    /// records are omitted.
    #[builder]
    pub fn region_means(
        &self,
        dataset: &Dataset,
        start: NaiveDate,
        end: NaiveDate,
        level: RegionLevel,
    ) -> Result<BTreeMap<String, f64>, GridClimError> {
        Ok(aggregate_by_region(&dataset.records, start, end, level)?)
    }
}
