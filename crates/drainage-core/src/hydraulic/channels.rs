//! Channel network extraction from an accumulated field.
//!
//! Cells with `field >= threshold` are channel cells. They are split into
//! segments that run upstream → downstream. At a confluence the donor with
//! the largest field value (lowest index on ties) carries on through the
//! junction; every other tributary stops at the cell just above it, so each
//! channel cell belongs to exactly one segment.
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::flow_graph::FlowGraph;
use crate::error::{Error, Result};
use crate::grid::GridIndexer;

const NONE: usize = usize::MAX;

/// One contiguous reach.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelSegment {
    /// Cell indices, upstream first.
    pub cells: Vec<usize>,
    /// Cell-centre coordinates matching `cells`.
    pub coords: Vec<(f64, f64)>,
}

impl ChannelSegment {
    pub fn head(&self) -> Option<usize> {
        self.cells.first().copied()
    }

    pub fn mouth(&self) -> Option<usize> {
        self.cells.last().copied()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// All segments above a threshold, ordered by head cell index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelNetwork {
    pub threshold: f64,
    pub segments: Vec<ChannelSegment>,
}

impl ChannelNetwork {
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Total number of channel cells.
    pub fn cell_count(&self) -> usize {
        self.segments.iter().map(|s| s.cells.len()).sum()
    }

    /// Position of the segment owning `cell`, if any.
    pub fn segment_of(&self, cell: usize) -> Option<usize> {
        self.segments.iter().position(|s| s.cells.contains(&cell))
    }

    /// Polylines only, one per segment.
    pub fn coordinates(&self) -> impl Iterator<Item = &[(f64, f64)]> + '_ {
        self.segments.iter().map(|s| s.coords.as_slice())
    }
}

pub fn extract_channels(
    graph: &FlowGraph,
    grid: &GridIndexer,
    field: &[f64],
    threshold: f64,
) -> Result<ChannelNetwork> {
    let n = graph.len();
    if field.len() != n {
        return Err(Error::DimensionMismatch {
            expected: n,
            actual: field.len(),
        });
    }

    // NaN never passes the comparison.
    let selected: Vec<bool> = field.iter().map(|&v| v >= threshold).collect();

    // The donor that continues through each channel cell.
    let mut main_donor = vec![NONE; n];
    for c in (0..n).filter(|&c| selected[c]) {
        let r = graph.receiver(c);
        if r == c || !selected[r] {
            continue;
        }
        let current = main_donor[r];
        if current == NONE || field[c] > field[current] {
            main_donor[r] = c;
        }
    }

    let mut segments = Vec::new();
    for head in (0..n).filter(|&c| selected[c] && main_donor[c] == NONE) {
        let mut cells = vec![head];
        let mut cell = head;
        loop {
            let r = graph.receiver(cell);
            if r == cell || !selected[r] || main_donor[r] != cell {
                break;
            }
            cells.push(r);
            cell = r;
        }
        let coords = cells.iter().map(|&c| grid.coord_unchecked(c)).collect();
        segments.push(ChannelSegment { cells, coords });
    }

    let network = ChannelNetwork { threshold, segments };
    if network.is_empty() {
        warn!(threshold, "no cells reach the channel threshold");
    } else {
        debug!(
            threshold,
            segments = network.len(),
            cells = network.cell_count(),
            "extracted channel network"
        );
    }
    Ok(network)
}
