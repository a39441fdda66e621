//! Small hand-built direction rasters shared by the unit tests.
//! All use ESRI codes and 10 m north-up cells with origin (0, 0).
use crate::grid::GeoTransform;
use crate::raster::DirectionRaster;

pub(crate) const CELL: f64 = 10.0;

pub(crate) fn transform() -> GeoTransform {
    GeoTransform::new(0.0, 0.0, CELL, -CELL)
}

/// 3×3, every cell drains to the centre, centre is a sink.
pub(crate) fn converging_3x3() -> DirectionRaster {
    #[rustfmt::skip]
    let codes = vec![
        2,   4,  8,
        1,   0, 16,
        128, 64, 32,
    ];
    DirectionRaster::new(codes, 3, 3, transform()).unwrap()
}

/// 1×4 line: 0 → 1 → 2 → 3, cell 3 is a sink.
pub(crate) fn line_4() -> DirectionRaster {
    DirectionRaster::new(vec![1, 1, 1, 0], 1, 4, transform()).unwrap()
}

/// 4×3 Y-shaped network.
///
/// Left branch 0,1 → 3 → 6 → 10, right branch 2 → 5 → 7 → 10; cell 10
/// drains south off the grid. Cells 4, 8, 9, 11 are isolated sinks.
/// Unit accumulation:
/// ```text
/// 1 1 1
/// 3 1 2
/// 4 3 1
/// 1 8 1
/// ```
pub(crate) fn confluence_4x3() -> DirectionRaster {
    #[rustfmt::skip]
    let codes = vec![
        4, 8, 4,
        4, 0, 8,
        2, 4, 0,
        0, 4, 0,
    ];
    DirectionRaster::new(codes, 4, 3, transform()).unwrap()
}
