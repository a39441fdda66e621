//! Error types for the drainage engine.

use thiserror::Error;

/// Every failure the engine can report. All are raised at the point of
/// detection; nothing is recovered silently.
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid D8 direction code {code} at cell {index}")]
    InvalidDirectionCode { index: usize, code: i32 },

    #[error("malformed flow graph: cell {index} does not reach an outlet within {steps} steps")]
    MalformedFlowGraph { index: usize, steps: usize },

    #[error("coordinate ({x}, {y}) lies outside the raster extent")]
    OutOfBounds { x: f64, y: f64 },

    #[error("cell index {index} out of range for grid of {len} cells")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("dimension mismatch: expected {expected} cells, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("invalid geotransform: {0}")]
    InvalidTransform(String),

    #[error("invalid engine parameters: {0}")]
    InvalidParams(#[from] serde_json::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
