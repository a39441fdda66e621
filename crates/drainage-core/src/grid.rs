//! Grid indexing: linear cell index ↔ (row, col) ↔ real-world (x, y).
//!
//! Cells are linearised row-major. Real-world coordinates go through an
//! affine transform in the GDAL convention:
//! ```text
//! x = origin_x + col * pixel_width + row * row_rotation
//! y = origin_y + col * col_rotation + row * pixel_height
//! ```
//! Coordinate math is f64 throughout.
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Below this the transform cannot be inverted.
const MIN_DETERMINANT: f64 = 1e-12;

/// Affine georeferencing transform of a raster.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoTransform {
    /// X of the upper-left corner of cell (0, 0).
    pub origin_x: f64,
    /// Y of the upper-left corner of cell (0, 0).
    pub origin_y: f64,
    /// Cell size along a row (x step per column).
    pub pixel_width: f64,
    /// Cell size along a column (y step per row, negative for north-up).
    pub pixel_height: f64,
    /// X step per row.
    pub row_rotation: f64,
    /// Y step per column.
    pub col_rotation: f64,
}

impl GeoTransform {
    /// North-up transform without rotation terms.
    pub fn new(origin_x: f64, origin_y: f64, pixel_width: f64, pixel_height: f64) -> Self {
        Self {
            origin_x,
            origin_y,
            pixel_width,
            pixel_height,
            row_rotation: 0.0,
            col_rotation: 0.0,
        }
    }

    /// Build from the GDAL coefficient order
    /// `[origin_x, pixel_width, row_rotation, origin_y, col_rotation, pixel_height]`.
    pub fn from_gdal(c: [f64; 6]) -> Self {
        Self {
            origin_x: c[0],
            pixel_width: c[1],
            row_rotation: c[2],
            origin_y: c[3],
            col_rotation: c[4],
            pixel_height: c[5],
        }
    }

    pub fn to_gdal(&self) -> [f64; 6] {
        [
            self.origin_x,
            self.pixel_width,
            self.row_rotation,
            self.origin_y,
            self.col_rotation,
            self.pixel_height,
        ]
    }

    /// Signed area of one cell.
    pub fn determinant(&self) -> f64 {
        self.pixel_width * self.pixel_height - self.row_rotation * self.col_rotation
    }

    pub fn is_north_up(&self) -> bool {
        self.row_rotation == 0.0 && self.col_rotation == 0.0 && self.pixel_height < 0.0
    }

    /// Reject transforms that are non-finite or cannot be inverted.
    pub fn validate(&self) -> Result<()> {
        if !self.to_gdal().iter().all(|v| v.is_finite()) {
            return Err(Error::InvalidTransform(format!(
                "non-finite coefficient in {:?}",
                self.to_gdal()
            )));
        }
        if self.determinant().abs() < MIN_DETERMINANT {
            return Err(Error::InvalidTransform(format!(
                "degenerate transform (determinant {:e})",
                self.determinant()
            )));
        }
        Ok(())
    }

    /// Real-world position of fractional pixel coordinates.
    #[inline]
    pub fn apply(&self, col: f64, row: f64) -> (f64, f64) {
        (
            self.origin_x + col * self.pixel_width + row * self.row_rotation,
            self.origin_y + col * self.col_rotation + row * self.pixel_height,
        )
    }

    /// Centre of cell (row, col).
    #[inline]
    pub fn pixel_to_geo(&self, col: usize, row: usize) -> (f64, f64) {
        self.apply(col as f64 + 0.5, row as f64 + 0.5)
    }

    /// Fractional (col, row) of a real-world position. NaN for a degenerate
    /// transform.
    pub fn geo_to_pixel(&self, x: f64, y: f64) -> (f64, f64) {
        let det = self.determinant();
        if det.abs() < MIN_DETERMINANT {
            return (f64::NAN, f64::NAN);
        }
        let dx = x - self.origin_x;
        let dy = y - self.origin_y;
        let col = (self.pixel_height * dx - self.row_rotation * dy) / det;
        let row = (-self.col_rotation * dx + self.pixel_width * dy) / det;
        (col, row)
    }

    /// Axis-aligned bounds of a `cols × rows` raster.
    pub fn extent(&self, cols: usize, rows: usize) -> Extent {
        let corners = [
            self.apply(0.0, 0.0),
            self.apply(cols as f64, 0.0),
            self.apply(0.0, rows as f64),
            self.apply(cols as f64, rows as f64),
        ];
        let mut e = Extent {
            min_x: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            min_y: f64::INFINITY,
            max_y: f64::NEG_INFINITY,
        };
        for (x, y) in corners {
            e.min_x = e.min_x.min(x);
            e.max_x = e.max_x.max(x);
            e.min_y = e.min_y.min(y);
            e.max_y = e.max_y.max(y);
        }
        e
    }
}

/// Real-world bounding box, in the `(left, right, bottom, top)` order plotting
/// libraries expect from [`Extent::as_array`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Extent {
    pub fn as_array(&self) -> [f64; 4] {
        [self.min_x, self.max_x, self.min_y, self.max_y]
    }
}

/// Dimensions of a row-major grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridShape {
    pub rows: usize,
    pub cols: usize,
}

impl GridShape {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// Number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    #[inline]
    pub fn row_col(&self, index: usize) -> (usize, usize) {
        (index / self.cols, index % self.cols)
    }

    #[inline]
    pub fn contains(&self, index: usize) -> bool {
        index < self.len()
    }

    pub fn check(&self, index: usize) -> Result<()> {
        if self.contains(index) {
            Ok(())
        } else {
            Err(Error::IndexOutOfRange { index, len: self.len() })
        }
    }

    /// Index of the cell offset by (drow, dcol), or `None` off-grid.
    #[inline]
    pub fn neighbour(&self, index: usize, drow: isize, dcol: isize) -> Option<usize> {
        let (row, col) = self.row_col(index);
        let r = row as isize + drow;
        let c = col as isize + dcol;
        if r < 0 || c < 0 || r >= self.rows as isize || c >= self.cols as isize {
            return None;
        }
        Some(self.index(r as usize, c as usize))
    }
}

/// Shape plus transform: everything needed to move between the three
/// addressing systems.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridIndexer {
    pub shape: GridShape,
    pub transform: GeoTransform,
}

impl GridIndexer {
    pub fn new(shape: GridShape, transform: GeoTransform) -> Self {
        Self { shape, transform }
    }

    /// Centre of the cell. Caller guarantees `index` is in range.
    #[inline]
    pub(crate) fn coord_unchecked(&self, index: usize) -> (f64, f64) {
        let (row, col) = self.shape.row_col(index);
        self.transform.pixel_to_geo(col, row)
    }

    pub fn index_to_coord(&self, index: usize) -> Result<(f64, f64)> {
        self.shape.check(index)?;
        Ok(self.coord_unchecked(index))
    }

    /// Index of the cell enclosing (x, y).
    pub fn coord_to_index(&self, x: f64, y: f64) -> Result<usize> {
        let (col, row) = self.transform.geo_to_pixel(x, y);
        let inside = col.is_finite()
            && row.is_finite()
            && col >= 0.0
            && row >= 0.0
            && col < self.shape.cols as f64
            && row < self.shape.rows as f64;
        if !inside {
            return Err(Error::OutOfBounds { x, y });
        }
        Ok(self.shape.index(row.floor() as usize, col.floor() as usize))
    }

    pub fn extent(&self) -> Extent {
        self.transform.extent(self.shape.cols, self.shape.rows)
    }

    /// Euclidean distance between two cell centres.
    #[inline]
    pub(crate) fn distance(&self, a: usize, b: usize) -> f64 {
        let (ax, ay) = self.coord_unchecked(a);
        let (bx, by) = self.coord_unchecked(b);
        (bx - ax).hypot(by - ay)
    }
}
