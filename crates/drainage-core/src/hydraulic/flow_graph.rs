//! D8 flow graph: one receiver per cell, donor lists derived from it.
//!
//! Stored as parallel index arrays. Donors use a compressed layout:
//! the donors of cell `c` are `donors[offsets[c]..offsets[c + 1]]`.
use tracing::debug;

use crate::direction::{DirectionScheme, Outflow};
use crate::error::{Error, Result};
use crate::grid::GridShape;
use crate::raster::DirectionRaster;

const UNVISITED: u8 = 0;
const ON_PATH: u8 = 1;
const RESOLVED: u8 = 2;

#[derive(Debug, Clone)]
pub struct FlowGraph {
    shape: GridShape,
    /// `receivers[c] == c` marks an outlet/sink.
    receivers: Vec<usize>,
    offsets: Vec<usize>,
    donors: Vec<usize>,
}

impl FlowGraph {
    /// Decode every code of `raster` with `scheme`. Cells equal to `nodata`
    /// and cells pointing off-grid become outlets.
    pub fn from_raster(
        raster: &DirectionRaster,
        scheme: DirectionScheme,
        nodata: Option<i32>,
    ) -> Result<Self> {
        let shape = raster.shape;
        if raster.codes.len() != shape.len() {
            return Err(Error::DimensionMismatch {
                expected: shape.len(),
                actual: raster.codes.len(),
            });
        }

        let mut receivers = Vec::with_capacity(shape.len());
        for (i, &code) in raster.codes.iter().enumerate() {
            if nodata == Some(code) {
                receivers.push(i);
                continue;
            }
            let receiver = match scheme.decode(code) {
                Some(Outflow::None) => i,
                Some(Outflow::To(dir)) => {
                    let (dr, dc) = dir.offset();
                    shape.neighbour(i, dr, dc).unwrap_or(i)
                }
                None => return Err(Error::InvalidDirectionCode { index: i, code }),
            };
            receivers.push(receiver);
        }
        debug!(rows = shape.rows, cols = shape.cols, ?scheme, "decoded direction raster");

        Self::from_receivers(shape, receivers)
    }

    /// Build from an explicit receiver array, validating range and acyclicity.
    pub fn from_receivers(shape: GridShape, receivers: Vec<usize>) -> Result<Self> {
        let n = shape.len();
        if receivers.len() != n {
            return Err(Error::DimensionMismatch {
                expected: n,
                actual: receivers.len(),
            });
        }
        if let Some(&bad) = receivers.iter().find(|&&r| r >= n) {
            return Err(Error::IndexOutOfRange { index: bad, len: n });
        }

        check_acyclic(&receivers)?;
        let (offsets, donors) = build_donors(&receivers);

        Ok(Self {
            shape,
            receivers,
            offsets,
            donors,
        })
    }

    #[inline]
    pub fn shape(&self) -> GridShape {
        self.shape
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.receivers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.receivers.is_empty()
    }

    #[inline]
    pub fn receiver(&self, cell: usize) -> usize {
        self.receivers[cell]
    }

    pub fn receivers(&self) -> &[usize] {
        &self.receivers
    }

    #[inline]
    pub fn donors(&self, cell: usize) -> &[usize] {
        &self.donors[self.offsets[cell]..self.offsets[cell + 1]]
    }

    #[inline]
    pub fn is_terminal(&self, cell: usize) -> bool {
        self.receivers[cell] == cell
    }

    /// Outlet and sink cells, ascending.
    pub fn terminals(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len()).filter(move |&c| self.is_terminal(c))
    }
}

/// Walk every receiver chain once. A chain that re-enters a cell still on
/// the current path is a cycle.
fn check_acyclic(receivers: &[usize]) -> Result<()> {
    let n = receivers.len();
    let mut state = vec![UNVISITED; n];
    let mut path = Vec::new();

    for start in 0..n {
        if state[start] != UNVISITED {
            continue;
        }
        let mut cell = start;
        loop {
            state[cell] = ON_PATH;
            path.push(cell);
            let next = receivers[cell];
            if next == cell || state[next] == RESOLVED {
                break;
            }
            if state[next] == ON_PATH {
                return Err(Error::MalformedFlowGraph { index: start, steps: n });
            }
            cell = next;
        }
        for c in path.drain(..) {
            state[c] = RESOLVED;
        }
    }
    Ok(())
}

/// Counting sort of cells by receiver.
fn build_donors(receivers: &[usize]) -> (Vec<usize>, Vec<usize>) {
    let n = receivers.len();
    let mut offsets = vec![0usize; n + 1];
    for (c, &r) in receivers.iter().enumerate() {
        if r != c {
            offsets[r + 1] += 1;
        }
    }
    for i in 0..n {
        offsets[i + 1] += offsets[i];
    }

    let mut cursor = offsets.clone();
    let mut donors = vec![0usize; offsets[n]];
    for (c, &r) in receivers.iter().enumerate() {
        if r != c {
            donors[cursor[r]] = c;
            cursor[r] += 1;
        }
    }
    (offsets, donors)
}
