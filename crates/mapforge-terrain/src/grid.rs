//! Row-major scalar grids and packed cell coordinates.

use serde::Serialize;

/// A grid cell coordinate packed into a single `u64` for O(1) hashing.
///
/// The upper 32 bits hold `x`, the lower 32 bits hold `y`, both as the
/// two's-complement bit pattern of an `i32`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellKey(u64);

impl CellKey {
    /// Pack a cell coordinate.
    #[inline]
    pub fn new(x: i32, y: i32) -> Self {
        Self(((x as u32 as u64) << 32) | (y as u32 as u64))
    }

    /// X coordinate of the cell.
    #[inline]
    pub fn x(self) -> i32 {
        (self.0 >> 32) as u32 as i32
    }

    /// Y coordinate of the cell.
    #[inline]
    pub fn y(self) -> i32 {
        self.0 as u32 as i32
    }

    /// The `"x,y"` string form used by the host map format.
    pub fn to_host_key(self) -> String {
        format!("{},{}", self.x(), self.y())
    }
}

/// A 2D grid of values in `[0.0, 1.0]`, stored row-major.
///
/// Used for both heightmaps and moisture maps. Values are clamped on
/// construction and the grid is immutable afterwards.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScalarGrid {
    width: u32,
    height: u32,
    cells: Vec<f64>,
}

impl ScalarGrid {
    /// Build a grid by evaluating `f(x, y)` for every cell in raster order.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> f64) -> Self {
        let mut cells = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                cells.push(f(x, y).clamp(0.0, 1.0));
            }
        }
        Self {
            width,
            height,
            cells,
        }
    }

    /// Grid width in cells.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Grid height in cells.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Returns `true` if `(x, y)` lies inside the grid.
    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    /// Value at `(x, y)`, or `0.0` outside the grid.
    pub fn get(&self, x: i32, y: i32) -> f64 {
        if self.in_bounds(x, y) {
            self.cells[y as usize * self.width as usize + x as usize]
        } else {
            0.0
        }
    }

    /// All values in row-major order.
    pub fn values(&self) -> &[f64] {
        &self.cells
    }

    /// Rows of the grid, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        // `max(1)` keeps `chunks_exact` valid for zero-width grids, which have no cells.
        self.cells.chunks_exact(self.width.max(1) as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_key_roundtrip_negative() {
        for &(x, y) in &[(0, 0), (5, 7), (-3, 12), (i32::MAX, i32::MIN), (-1, -1)] {
            let key = CellKey::new(x, y);
            assert_eq!((key.x(), key.y()), (x, y), "CellKey lost ({x}, {y})");
        }
    }

    #[test]
    fn test_cell_key_distinct() {
        assert_ne!(CellKey::new(1, 2), CellKey::new(2, 1));
        assert_ne!(CellKey::new(0, -1), CellKey::new(-1, 0));
    }

    #[test]
    fn test_host_key_format() {
        assert_eq!(CellKey::new(12, 3).to_host_key(), "12,3");
    }

    #[test]
    fn test_from_fn_clamps_values() {
        let grid = ScalarGrid::from_fn(3, 2, |x, _| x as f64 - 1.0);
        assert_eq!(grid.values(), &[0.0, 0.0, 1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_out_of_bounds_returns_zero() {
        let grid = ScalarGrid::from_fn(4, 4, |_, _| 0.75);
        assert_eq!(grid.get(3, 3), 0.75);
        assert_eq!(grid.get(4, 0), 0.0);
        assert_eq!(grid.get(-1, 2), 0.0);
        assert_eq!(grid.get(0, 100), 0.0);
    }

    #[test]
    fn test_row_major_layout() {
        let grid = ScalarGrid::from_fn(3, 2, |x, y| (y * 3 + x) as f64 / 10.0);
        assert!((grid.get(2, 1) - 0.5).abs() < 1e-12);
        let rows: Vec<_> = grid.rows().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].len(), 3);
    }

    #[test]
    fn test_empty_grid() {
        let grid = ScalarGrid::from_fn(0, 5, |_, _| 1.0);
        assert_eq!(grid.dimensions(), (0, 5));
        assert!(grid.values().is_empty());
        assert_eq!(grid.rows().count(), 0);
    }
}
