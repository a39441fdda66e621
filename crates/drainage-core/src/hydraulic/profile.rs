//! Downstream flow path from a start cell to its outlet.
use serde::{Deserialize, Serialize};

use super::flow_graph::FlowGraph;
use crate::error::{Error, Result};
use crate::grid::GridIndexer;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Visited cells, start first, outlet last.
    pub cells: Vec<usize>,
    /// Cumulative along-flow distance from the start cell, in map units.
    pub distances: Vec<f64>,
    /// Cell count of the grid the profile was traced on.
    pub grid_len: usize,
}

impl Profile {
    /// Last cell of the path; `None` only for a hand-built empty profile.
    pub fn outlet(&self) -> Option<usize> {
        self.cells.last().copied()
    }

    pub fn total_length(&self) -> f64 {
        self.distances.last().copied().unwrap_or(0.0)
    }

    /// Values of a per-cell `field` along the profile. The field must cover
    /// the whole grid the profile came from.
    pub fn sample<T: Copy>(&self, field: &[T]) -> Result<Vec<T>> {
        if field.len() != self.grid_len {
            return Err(Error::DimensionMismatch {
                expected: self.grid_len,
                actual: field.len(),
            });
        }
        self.cells
            .iter()
            .map(|&c| {
                field.get(c).copied().ok_or(Error::IndexOutOfRange {
                    index: c,
                    len: field.len(),
                })
            })
            .collect()
    }
}

pub fn trace_profile(graph: &FlowGraph, grid: &GridIndexer, start: usize) -> Result<Profile> {
    let n = graph.len();
    if start >= n {
        return Err(Error::IndexOutOfRange { index: start, len: n });
    }

    let mut cells = vec![start];
    let mut distances = vec![0.0];
    let mut cell = start;
    while !graph.is_terminal(cell) {
        // A path longer than the grid revisits a cell.
        if cells.len() > n {
            return Err(Error::MalformedFlowGraph { index: start, steps: n });
        }
        let next = graph.receiver(cell);
        let step = grid.distance(cell, next);
        distances.push(distances[distances.len() - 1] + step);
        cells.push(next);
        cell = next;
    }

    Ok(Profile {
        cells,
        distances,
        grid_len: n,
    })
}
