//! Engine context: owns the flow graph and its cached processing order, and
//! exposes every drainage operation on top of them.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::direction::DirectionScheme;
use crate::error::{Error, Result};
use crate::grid::{Extent, GeoTransform, GridIndexer, GridShape};
use crate::hydraulic::{self, ChannelNetwork, FlowGraph, Profile, TopologicalOrder};
use crate::raster::DirectionRaster;

// ── Parameters ────────────────────────────────────────────────────────────────

/// How direction rasters are interpreted.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineParams {
    /// Code vocabulary, default ESRI powers of two.
    pub scheme: DirectionScheme,
    /// Fill value treated as "no outflow".
    pub nodata: Option<i32>,
}

impl EngineParams {
    /// Parse from JSON; absent fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

// ── Engine ────────────────────────────────────────────────────────────────────

/// Built once per direction raster. Read-only afterwards, so it can be shared
/// across threads and every accumulation call is independent.
#[derive(Debug, Clone)]
pub struct Engine {
    grid: GridIndexer,
    graph: FlowGraph,
    order: TopologicalOrder,
}

impl Engine {
    /// Decode the raster, validate the flow graph and cache the processing
    /// order.
    pub fn build(raster: &DirectionRaster, params: &EngineParams) -> Result<Self> {
        raster.transform.validate()?;
        let graph = FlowGraph::from_raster(raster, params.scheme, params.nodata)?;
        let order = TopologicalOrder::build(&graph)?;
        let grid = GridIndexer::new(raster.shape, raster.transform);

        info!(
            rows = raster.shape.rows,
            cols = raster.shape.cols,
            outlets = graph.terminals().count(),
            "drainage engine ready"
        );
        Ok(Self { grid, graph, order })
    }

    /// Build with default parameters.
    pub fn from_raster(raster: &DirectionRaster) -> Result<Self> {
        Self::build(raster, &EngineParams::default())
    }

    // ── Accumulation ──────────────────────────────────────────────────────────

    /// Accumulate `weights` downstream; `None` counts cells.
    pub fn accumulate(&self, weights: Option<&[f64]>) -> Result<Vec<f64>> {
        match weights {
            Some(w) => hydraulic::accumulate(&self.graph, &self.order, w),
            None => Ok(hydraulic::accumulate_cells(&self.graph, &self.order)),
        }
    }

    /// Accumulate a weight field of any additive numeric type.
    pub fn accumulate_with<T>(&self, weights: &[T]) -> Result<Vec<T>>
    where
        T: Copy + std::ops::AddAssign,
    {
        hydraulic::accumulate(&self.graph, &self.order, weights)
    }

    /// Accumulate several weight fields; parallel with the `threading` feature.
    pub fn accumulate_many(&self, weights: &[&[f64]]) -> Result<Vec<Vec<f64>>> {
        hydraulic::accumulate_many(&self.graph, &self.order, weights)
    }

    /// Upstream area in squared map units (cell area is the transform's
    /// absolute determinant).
    pub fn drainage_area(&self) -> Vec<f64> {
        let area = self.grid.transform.determinant().abs();
        let mut field = hydraulic::accumulate_cells(&self.graph, &self.order);
        for v in &mut field {
            *v *= area;
        }
        debug!(cell_area = area, "computed drainage area");
        field
    }

    /// Mean concentration of material carried downstream: the accumulated
    /// `source` divided by drainage area at every cell.
    pub fn downstream_concentration(&self, source: &[f64]) -> Result<Vec<f64>> {
        let mut concs = hydraulic::accumulate(&self.graph, &self.order, source)?;
        for (c, a) in concs.iter_mut().zip(self.drainage_area()) {
            *c /= a;
        }
        Ok(concs)
    }

    // ── Network queries ───────────────────────────────────────────────────────

    pub fn extract_channels(&self, field: &[f64], threshold: f64) -> Result<ChannelNetwork> {
        hydraulic::extract_channels(&self.graph, &self.grid, field, threshold)
    }

    pub fn profile(&self, start: usize) -> Result<Profile> {
        hydraulic::trace_profile(&self.graph, &self.grid, start)
    }

    /// Profile starting from the cell enclosing (x, y).
    pub fn profile_from_coord(&self, x: f64, y: f64) -> Result<Profile> {
        let start = self.coord_to_index(x, y)?;
        self.profile(start)
    }

    pub fn catchment(&self, cell: usize) -> Result<Vec<usize>> {
        hydraulic::catchment(&self.graph, cell)
    }

    pub fn outlet_of(&self, cell: usize) -> Result<usize> {
        hydraulic::outlet_of(&self.graph, cell)
    }

    /// Outlet and sink cells, ascending.
    pub fn outlets(&self) -> Vec<usize> {
        self.graph.terminals().collect()
    }

    // ── Grid indexing ─────────────────────────────────────────────────────────

    pub fn index_to_coord(&self, index: usize) -> Result<(f64, f64)> {
        self.grid.index_to_coord(index)
    }

    pub fn coord_to_index(&self, x: f64, y: f64) -> Result<usize> {
        self.grid.coord_to_index(x, y)
    }

    pub fn extent(&self) -> Extent {
        self.grid.extent()
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    pub fn shape(&self) -> GridShape {
        self.grid.shape
    }

    pub fn transform(&self) -> &GeoTransform {
        &self.grid.transform
    }

    pub fn receivers(&self) -> &[usize] {
        self.graph.receivers()
    }

    pub fn donors(&self, cell: usize) -> Result<&[usize]> {
        self.grid.shape.check(cell)?;
        Ok(self.graph.donors(cell))
    }

    /// Cached upstream-first processing order.
    pub fn order(&self) -> &[usize] {
        self.order.as_slice()
    }

    pub fn len(&self) -> usize {
        self.graph.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }
}

impl TryFrom<&DirectionRaster> for Engine {
    type Error = Error;

    fn try_from(raster: &DirectionRaster) -> Result<Self> {
        Self::from_raster(raster)
    }
}

// ── Unit tests ────────────────────────────────────────────────────────────────
