//! File-system collaborator: discovers and loads the per-year tabular files
//! backing each parameter.
//!
//! Layout matches the source archive: `<data_dir>/<parameter>/<year>_<stem>.parquet`,
//! with a fallback to any `<year>*.parquet` when the preferred name is absent.
//! The store only materializes frames; normalization happens downstream.

use crate::schema::Parameter;
use log::{info, warn};
use polars::error::PolarsError;
use polars::prelude::{DataFrame, LazyFrame};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read data directory '{0}'")]
    DataDirRead(PathBuf, #[source] std::io::Error),

    #[error("no data files found for parameter '{parameter}' in '{dir}'")]
    NoFilesForParameter { parameter: Parameter, dir: PathBuf },

    #[error("no data file found for parameter '{parameter}' and year {year}")]
    NoFilesForYear { parameter: Parameter, year: i32 },

    #[error("failed to scan parquet file '{0}'")]
    ParquetScan(PathBuf, #[source] PolarsError),

    #[error(transparent)]
    Polars(#[from] PolarsError),
}

/// Read-only view over a data directory of per-year parquet files.
#[derive(Debug, Clone)]
pub struct GridStore {
    data_dir: PathBuf,
}

impl GridStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        GridStore {
            data_dir: data_dir.into(),
        }
    }

    fn parameter_dir(&self, parameter: Parameter) -> PathBuf {
        self.data_dir.join(parameter.dir_name())
    }

    /// Years with at least one file for `parameter`, sorted ascending.
    ///
    /// Years are read off the filename prefix (`1993_rain.parquet` -> 1993);
    /// files without a numeric prefix are ignored with a warning.
    pub fn available_years(&self, parameter: Parameter) -> Result<Vec<i32>, StoreError> {
        let mut years: Vec<i32> = self
            .parquet_files(parameter)?
            .iter()
            .filter_map(|path| match year_prefix(path) {
                Some(year) => Some(year),
                None => {
                    warn!("ignoring data file without a year prefix: {:?}", path);
                    None
                }
            })
            .collect();
        years.sort_unstable();
        years.dedup();
        Ok(years)
    }

    /// Loads the file for one `(parameter, year)`.
    ///
    /// Prefers the canonical `<year>_<stem>.parquet` name, then falls back to
    /// the first `<year>*.parquet` match, as the source archive is named
    /// inconsistently across years.
    pub fn load_year(&self, parameter: Parameter, year: i32) -> Result<DataFrame, StoreError> {
        let dir = self.parameter_dir(parameter);
        let preferred = dir.join(format!("{}_{}.parquet", year, parameter.file_stem()));
        let path = if preferred.is_file() {
            preferred
        } else {
            let prefix = year.to_string();
            self.parquet_files(parameter)?
                .into_iter()
                .find(|p| file_name_starts_with(p, &prefix))
                .ok_or(StoreError::NoFilesForYear { parameter, year })?
        };
        info!("loading {} data for {} from {:?}", parameter, year, path);
        scan(&path)?.collect().map_err(StoreError::Polars)
    }

    /// Loads and vertically concatenates every year for `parameter`.
    ///
    /// Column-name casing and column order are allowed to differ between
    /// years; frames after the first are realigned to the first frame's
    /// (lower-cased) schema.
    pub fn load_all(&self, parameter: Parameter) -> Result<DataFrame, StoreError> {
        let files = self.parquet_files(parameter)?;
        if files.is_empty() {
            return Err(StoreError::NoFilesForParameter {
                parameter,
                dir: self.parameter_dir(parameter),
            });
        }
        info!(
            "loading {} files for parameter '{}'",
            files.len(),
            parameter
        );

        let mut combined: Option<DataFrame> = None;
        for path in &files {
            let mut df = scan(path)?.collect()?;
            let lowered: Vec<String> = df
                .get_column_names()
                .iter()
                .map(|name| name.to_lowercase())
                .collect();
            df.set_column_names(lowered)?;

            combined = Some(match combined {
                None => df,
                Some(acc) => {
                    let names = acc.get_column_names_owned();
                    let aligned = df.select(names)?;
                    acc.vstack(&aligned)?
                }
            });
        }
        // Non-empty file list guarantees a frame here.
        Ok(combined.unwrap_or_default())
    }

    /// All parquet files for a parameter, sorted by file name for stable
    /// ordering across platforms.
    fn parquet_files(&self, parameter: Parameter) -> Result<Vec<PathBuf>, StoreError> {
        let dir = self.parameter_dir(parameter);
        let entries = std::fs::read_dir(&dir)
            .map_err(|e| StoreError::DataDirRead(dir.clone(), e))?;
        let mut files: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file()
                    && path
                        .extension()
                        .is_some_and(|ext| ext.eq_ignore_ascii_case("parquet"))
            })
            .collect();
        files.sort();
        Ok(files)
    }
}

fn scan(path: &Path) -> Result<LazyFrame, StoreError> {
    LazyFrame::scan_parquet(path, Default::default())
        .map_err(|e| StoreError::ParquetScan(path.to_path_buf(), e))
}

fn year_prefix(path: &Path) -> Option<i32> {
    let stem = path.file_stem()?.to_str()?;
    let prefix = stem.split('_').next()?;
    prefix.parse::<i32>().ok()
}

fn file_name_starts_with(path: &Path, prefix: &str) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with(prefix))
}
