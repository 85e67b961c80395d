//! Static per-parameter grid geometry: which parameters exist, which value
//! column and data directory each one maps to, and the lat/lon lattice the
//! source data is defined on.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Tolerance used for lattice-alignment checks, in degrees.
pub const LATTICE_EPSILON: f64 = 1e-6;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("unknown parameter '{0}' (expected one of: rainfall, tmax, tmin)")]
    UnknownParameter(String),

    #[error("grid resolution must be positive, got {0}")]
    InvalidResolution(f64),

    #[error("{axis} bounds [{min}, {max}] are not aligned to the {resolution}° lattice")]
    MisalignedBounds {
        axis: Axis,
        min: f64,
        max: f64,
        resolution: f64,
    },
}

/// Which coordinate axis a bounds violation refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Latitude,
    Longitude,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Latitude => write!(f, "latitude"),
            Axis::Longitude => write!(f, "longitude"),
        }
    }
}

/// A gridded climate parameter served by the engine.
///
/// Each parameter has its own source files, value column, and grid geometry.
///
/// # Examples
///
/// ```
/// use gridclim::Parameter;
///
/// let p: Parameter = "rainfall".parse().unwrap();
/// assert_eq!(p, Parameter::Rainfall);
/// assert_eq!(p.value_column(), "rain");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Parameter {
    /// Daily accumulated rainfall in mm, 0.25° grid.
    Rainfall,
    /// Daily maximum temperature in °C, 1.0° grid.
    TMax,
    /// Daily minimum temperature in °C, 1.0° grid.
    TMin,
}

impl Parameter {
    /// Name of the column holding this parameter's value in the source files.
    pub fn value_column(&self) -> &'static str {
        match self {
            Parameter::Rainfall => "rain",
            Parameter::TMax => "tmax",
            Parameter::TMin => "tmin",
        }
    }

    /// Subdirectory of the data root holding this parameter's per-year files.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Parameter::Rainfall => "rainfall",
            Parameter::TMax => "tmax",
            Parameter::TMin => "tmin",
        }
    }

    /// Short name used in per-year file names, e.g. `1993_rain.parquet`.
    pub fn file_stem(&self) -> &'static str {
        match self {
            Parameter::Rainfall => "rain",
            Parameter::TMax => "tmax",
            Parameter::TMin => "tmin",
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.dir_name())
    }
}

impl FromStr for Parameter {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rainfall" | "rain" => Ok(Parameter::Rainfall),
            "tmax" => Ok(Parameter::TMax),
            "tmin" => Ok(Parameter::TMin),
            other => Err(SchemaError::UnknownParameter(other.to_string())),
        }
    }
}

/// Geometry of one parameter's regular lat/lon grid.
///
/// Invariant: both bounds spans are whole multiples of `resolution`, so the
/// min and max of each axis are themselves lattice points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    pub resolution: f64,
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl GridConfig {
    /// Builds a config, rejecting geometry whose bounds do not sit on the
    /// lattice spanned by `resolution`.
    pub fn new(
        resolution: f64,
        lat_min: f64,
        lat_max: f64,
        lon_min: f64,
        lon_max: f64,
    ) -> Result<Self, SchemaError> {
        if resolution <= 0.0 {
            return Err(SchemaError::InvalidResolution(resolution));
        }
        if !span_is_aligned(lat_min, lat_max, resolution) {
            return Err(SchemaError::MisalignedBounds {
                axis: Axis::Latitude,
                min: lat_min,
                max: lat_max,
                resolution,
            });
        }
        if !span_is_aligned(lon_min, lon_max, resolution) {
            return Err(SchemaError::MisalignedBounds {
                axis: Axis::Longitude,
                min: lon_min,
                max: lon_max,
                resolution,
            });
        }
        Ok(GridConfig {
            resolution,
            lat_min,
            lat_max,
            lon_min,
            lon_max,
        })
    }
}

fn span_is_aligned(min: f64, max: f64, resolution: f64) -> bool {
    let span = max - min;
    if span < 0.0 {
        return false;
    }
    let steps = span / resolution;
    (steps - steps.round()).abs() <= LATTICE_EPSILON
}

/// Read-only map from parameter to grid geometry, fixed at construction.
///
/// `Default` carries the IMD grids: 0.25° rainfall over
/// [6.5, 38.5] × [66.5, 100.0] and 1.0° tmax/tmin over
/// [7.5, 37.5] × [67.5, 97.5].
#[derive(Debug, Clone)]
pub struct GridSchemaRegistry {
    configs: HashMap<Parameter, GridConfig>,
}

impl Default for GridSchemaRegistry {
    fn default() -> Self {
        let mut configs = HashMap::new();
        configs.insert(
            Parameter::Rainfall,
            GridConfig {
                resolution: 0.25,
                lat_min: 6.5,
                lat_max: 38.5,
                lon_min: 66.5,
                lon_max: 100.0,
            },
        );
        let temperature_grid = GridConfig {
            resolution: 1.0,
            lat_min: 7.5,
            lat_max: 37.5,
            lon_min: 67.5,
            lon_max: 97.5,
        };
        configs.insert(Parameter::TMax, temperature_grid);
        configs.insert(Parameter::TMin, temperature_grid);
        GridSchemaRegistry { configs }
    }
}

impl GridSchemaRegistry {
    /// Registry with no parameters; populate with [`GridSchemaRegistry::with_config`].
    pub fn empty() -> Self {
        GridSchemaRegistry {
            configs: HashMap::new(),
        }
    }

    /// Registers (or overrides) the geometry for one parameter.
    pub fn with_config(mut self, parameter: Parameter, config: GridConfig) -> Self {
        self.configs.insert(parameter, config);
        self
    }

    /// Looks up the grid geometry for a parameter.
    pub fn config_for(&self, parameter: Parameter) -> Result<&GridConfig, SchemaError> {
        self.configs
            .get(&parameter)
            .ok_or_else(|| SchemaError::UnknownParameter(parameter.to_string()))
    }

    /// String-keyed lookup for callers holding raw user input.
    pub fn config_for_key(&self, key: &str) -> Result<(Parameter, &GridConfig), SchemaError> {
        let parameter: Parameter = key.parse()?;
        let config = self.config_for(parameter)?;
        Ok((parameter, config))
    }
}
