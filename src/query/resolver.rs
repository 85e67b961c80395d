//! Validates a user-supplied coordinate against a parameter's lattice and
//! snaps it to the nearest legal grid point.
//!
//! Bounds are a hard contract checked against the original input; lattice
//! alignment is advisory. An in-bounds but off-grid coordinate is still
//! answerable via snapping, so it resolves with `on_lattice = false` instead
//! of failing.

use crate::query::error::QueryError;
use crate::schema::{Axis, GridConfig};

/// Tolerance for treating a coordinate as sitting on a lattice point, in
/// degrees.
pub const COORD_EPSILON: f64 = 1e-6;

/// The outcome of resolving a query coordinate against a grid.
///
/// Immutable once produced; carries both what the caller asked for and the
/// lattice point the engine will answer from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedCoordinate {
    pub requested_lat: f64,
    pub requested_lon: f64,
    pub snapped_lat: f64,
    pub snapped_lon: f64,
    /// Always true on the success path; kept so the classification survives
    /// being forwarded or stored by callers.
    pub within_bounds: bool,
    /// False when the requested point was off-grid and required snapping.
    pub on_lattice: bool,
}

/// Resolves `(lat, lon)` against `config`.
///
/// Fails with [`QueryError::OutOfBounds`] naming the violated axis and its
/// valid range when the original input lies outside the grid. Never clamps an
/// out-of-range input into bounds.
///
/// # Examples
///
/// ```
/// use gridclim::{resolve, GridConfig};
///
/// let rain = GridConfig::new(0.25, 6.5, 38.5, 66.5, 100.0).unwrap();
/// let coord = resolve(&rain, 19.51, 80.26).unwrap();
/// assert_eq!(coord.snapped_lat, 19.5);
/// assert_eq!(coord.snapped_lon, 80.25);
/// assert!(!coord.on_lattice);
/// ```
pub fn resolve(config: &GridConfig, lat: f64, lon: f64) -> Result<ResolvedCoordinate, QueryError> {
    check_bounds(Axis::Latitude, lat, config.lat_min, config.lat_max)?;
    check_bounds(Axis::Longitude, lon, config.lon_min, config.lon_max)?;

    let snapped_lat = snap(lat, config.lat_min, config.lat_max, config.resolution);
    let snapped_lon = snap(lon, config.lon_min, config.lon_max, config.resolution);
    let on_lattice = is_on_lattice(lat, config.lat_min, config.resolution)
        && is_on_lattice(lon, config.lon_min, config.resolution);

    Ok(ResolvedCoordinate {
        requested_lat: lat,
        requested_lon: lon,
        snapped_lat,
        snapped_lon,
        within_bounds: true,
        on_lattice,
    })
}

fn check_bounds(axis: Axis, value: f64, min: f64, max: f64) -> Result<(), QueryError> {
    if !value.is_finite() || value < min || value > max {
        return Err(QueryError::OutOfBounds {
            axis,
            value,
            min,
            max,
        });
    }
    Ok(())
}

/// Nearest lattice point, clamped into bounds to guard against rounding at
/// the boundary.
fn snap(value: f64, min: f64, max: f64, resolution: f64) -> f64 {
    let snapped = min + ((value - min) / resolution).round() * resolution;
    snapped.clamp(min, max)
}

fn is_on_lattice(value: f64, min: f64, resolution: f64) -> bool {
    let steps = (value - min) / resolution;
    let offset = (value - min) - steps.round() * resolution;
    offset.abs() <= COORD_EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rain_grid() -> GridConfig {
        GridConfig::new(0.25, 6.5, 38.5, 66.5, 100.0).unwrap()
    }

    #[test]
    fn snaps_off_grid_point_to_nearest_lattice_point() {
        let coord = resolve(&rain_grid(), 19.51, 80.26).unwrap();
        assert!((coord.snapped_lat - 19.5).abs() <= COORD_EPSILON);
        assert!((coord.snapped_lon - 80.25).abs() <= COORD_EPSILON);
        assert!(coord.within_bounds);
        assert!(!coord.on_lattice);
        assert_eq!(coord.requested_lat, 19.51);
        assert_eq!(coord.requested_lon, 80.26);
    }

    #[test]
    fn snapped_coordinates_lie_on_the_lattice() {
        let config = rain_grid();
        for &(lat, lon) in &[
            (6.5, 66.5),
            (38.5, 100.0),
            (12.34, 77.89),
            (19.626, 80.124),
            (38.49, 99.99),
        ] {
            let coord = resolve(&config, lat, lon).unwrap();
            assert!(
                is_on_lattice(coord.snapped_lat, config.lat_min, config.resolution),
                "snapped lat {} not on lattice for input {}",
                coord.snapped_lat,
                lat
            );
            assert!(
                is_on_lattice(coord.snapped_lon, config.lon_min, config.resolution),
                "snapped lon {} not on lattice for input {}",
                coord.snapped_lon,
                lon
            );
        }
    }

    #[test]
    fn exact_lattice_point_is_flagged_on_lattice() {
        let coord = resolve(&rain_grid(), 19.5, 80.25).unwrap();
        assert!(coord.on_lattice);
        assert_eq!(coord.snapped_lat, coord.requested_lat);
        assert_eq!(coord.snapped_lon, coord.requested_lon);
    }

    #[test]
    fn boundary_values_resolve() {
        let config = rain_grid();
        let low = resolve(&config, config.lat_min, config.lon_min).unwrap();
        assert!(low.on_lattice);
        let high = resolve(&config, config.lat_max, config.lon_max).unwrap();
        assert!(high.on_lattice);
        assert_eq!(high.snapped_lat, config.lat_max);
        assert_eq!(high.snapped_lon, config.lon_max);
    }

    #[test]
    fn out_of_bounds_reports_axis_and_range() {
        let config = rain_grid();
        let err = resolve(&config, 45.0, 80.25).unwrap_err();
        match err {
            QueryError::OutOfBounds {
                axis, value, min, max,
            } => {
                assert_eq!(axis, Axis::Latitude);
                assert_eq!(value, 45.0);
                assert_eq!(min, 6.5);
                assert_eq!(max, 38.5);
            }
            other => panic!("expected OutOfBounds, got {other:?}"),
        }

        let err = resolve(&config, 19.5, 120.0).unwrap_err();
        assert!(matches!(
            err,
            QueryError::OutOfBounds {
                axis: Axis::Longitude,
                ..
            }
        ));
    }

    #[test]
    fn non_finite_input_is_out_of_bounds() {
        let config = rain_grid();
        assert!(resolve(&config, f64::NAN, 80.25).is_err());
        assert!(resolve(&config, 19.5, f64::INFINITY).is_err());
    }

    #[test]
    fn resolution_is_idempotent() {
        let config = rain_grid();
        let first = resolve(&config, 19.51, 80.26).unwrap();
        let second = resolve(&config, 19.51, 80.26).unwrap();
        assert_eq!(first, second);
    }
}
