use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::grid::{GeoTransform, GridShape};

/// A decoded D8 direction raster: raw codes, row-major, plus georeferencing.
/// Produced by whatever file adapter sits in front of the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectionRaster {
    /// Row-major direction codes.
    pub codes: Vec<i32>,
    pub shape: GridShape,
    pub transform: GeoTransform,
}

impl DirectionRaster {
    /// Wrap `codes`; its length must be `rows * cols`.
    pub fn new(codes: Vec<i32>, rows: usize, cols: usize, transform: GeoTransform) -> Result<Self> {
        let shape = GridShape::new(rows, cols);
        if codes.len() != shape.len() {
            return Err(Error::DimensionMismatch {
                expected: shape.len(),
                actual: codes.len(),
            });
        }
        Ok(Self { codes, shape, transform })
    }

    /// A raster where every cell carries `code`.
    pub fn filled(rows: usize, cols: usize, transform: GeoTransform, code: i32) -> Self {
        Self {
            codes: vec![code; rows * cols],
            shape: GridShape::new(rows, cols),
            transform,
        }
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> i32 {
        self.codes[self.shape.index(row, col)]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, code: i32) {
        let i = self.shape.index(row, col);
        self.codes[i] = code;
    }

    pub fn rows(&self) -> usize {
        self.shape.rows
    }

    pub fn cols(&self) -> usize {
        self.shape.cols
    }
}
