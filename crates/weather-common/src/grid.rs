//! Grid specifications and resolved grid points.

use serde::{Deserialize, Serialize};

/// Specification of a regular lat/lon grid.
///
/// Points are stored row by row, starting at the south-west corner
/// (`first_lat`, `first_lon`) and advancing east, then north.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    /// Number of points in longitude direction
    pub nx: usize,
    /// Number of points in latitude direction
    pub ny: usize,
    /// Longitude resolution in degrees
    pub dx: f32,
    /// Latitude resolution in degrees
    pub dy: f32,
    /// Longitude of the first grid point
    pub first_lon: f32,
    /// Latitude of the first grid point
    pub first_lat: f32,
}

impl GridSpec {
    /// Create a new grid specification.
    pub const fn new(nx: usize, ny: usize, dx: f32, dy: f32, first_lon: f32, first_lat: f32) -> Self {
        Self {
            nx,
            ny,
            dx,
            dy,
            first_lon,
            first_lat,
        }
    }

    /// Get the 1D index for a 2D grid position.
    pub fn flat_index(&self, i: usize, j: usize) -> usize {
        j * self.nx + i
    }

    /// Coordinates `(latitude, longitude)` of a flat grid index.
    pub fn coordinates(&self, index: usize) -> Option<(f32, f32)> {
        if index >= self.len() {
            return None;
        }
        let i = index % self.nx;
        let j = index / self.nx;
        let lat = self.first_lat + j as f32 * self.dy;
        let lon = self.first_lon + i as f32 * self.dx;
        Some((lat, lon))
    }

    /// Build a [`GridPoint`] for a flat index with the given cell elevation.
    pub fn point(&self, index: usize, elevation: f32) -> Option<GridPoint> {
        let (latitude, longitude) = self.coordinates(index)?;
        Some(GridPoint {
            index,
            latitude,
            longitude,
            elevation,
        })
    }

    /// Total number of grid points.
    pub fn len(&self) -> usize {
        self.nx * self.ny
    }

    /// Check if grid is empty.
    pub fn is_empty(&self) -> bool {
        self.nx == 0 || self.ny == 0
    }
}

/// A resolved grid cell with the constants needed by derived formulas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridPoint {
    /// Flat index into the domain grid
    pub index: usize,
    pub latitude: f32,
    pub longitude: f32,
    /// Model elevation of the cell in metres
    pub elevation: f32,
}

impl GridPoint {
    pub fn new(index: usize, latitude: f32, longitude: f32, elevation: f32) -> Self {
        Self {
            index,
            latitude,
            longitude,
            elevation,
        }
    }
}

/// Grid definitions for the supported reanalysis domains.
pub mod grids {
    use super::*;

    /// ERA5 0.25° global grid
    pub const fn era5_0p25() -> GridSpec {
        GridSpec::new(1440, 721, 0.25, 0.25, -180.0, -90.0)
    }

    /// ERA5-Land 0.1° global grid
    pub const fn era5_land_0p1() -> GridSpec {
        GridSpec::new(3600, 1801, 0.1, 0.1, -180.0, -90.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_era5_grid_corners() {
        let grid = grids::era5_0p25();
        assert_eq!(grid.len(), 1440 * 721);

        let (lat, lon) = grid.coordinates(0).unwrap();
        assert!((lat + 90.0).abs() < 0.001);
        assert!((lon + 180.0).abs() < 0.001);

        let (lat, lon) = grid.coordinates(grid.len() - 1).unwrap();
        assert!((lat - 90.0).abs() < 0.001);
        assert!((lon - 179.75).abs() < 0.001);
    }

    #[test]
    fn test_point_from_flat_index() {
        let grid = grids::era5_land_0p1();
        let index = grid.flat_index(1800, 900);
        let point = grid.point(index, 412.0).unwrap();

        assert_eq!(point.index, index);
        assert!(point.latitude.abs() < 0.01);
        assert!(point.longitude.abs() < 0.01);
        assert_eq!(point.elevation, 412.0);
    }

    #[test]
    fn test_out_of_grid_index() {
        let grid = grids::era5_0p25();
        assert!(grid.point(grid.len(), 0.0).is_none());
    }
}
