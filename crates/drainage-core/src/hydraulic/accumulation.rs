//! Flow accumulation: `field[c] = weight[c] + Σ field[d]` over donors `d`.
//!
//! The cached topological order guarantees every donor is final before it
//! is pushed into its receiver, so a single forward pass suffices.
use std::ops::AddAssign;

use tracing::debug;

use super::flow_graph::FlowGraph;
use super::topology::TopologicalOrder;
use crate::error::{Error, Result};

/// Accumulate `weights` downstream. Works in the weight's own numeric type;
/// no clipping or normalisation is applied.
pub fn accumulate<T>(graph: &FlowGraph, order: &TopologicalOrder, weights: &[T]) -> Result<Vec<T>>
where
    T: Copy + AddAssign,
{
    check_len(graph.len(), weights.len())?;
    let mut field = weights.to_vec();
    propagate(graph, order, &mut field);
    Ok(field)
}

/// Accumulate a uniform weight of 1 per cell: the catchment size in cells.
pub fn accumulate_cells(graph: &FlowGraph, order: &TopologicalOrder) -> Vec<f64> {
    let mut field = vec![1.0; graph.len()];
    propagate(graph, order, &mut field);
    field
}

/// Accumulate several weight fields against the same order. Every length is
/// checked before any output is allocated.
pub fn accumulate_many<T>(
    graph: &FlowGraph,
    order: &TopologicalOrder,
    weights: &[&[T]],
) -> Result<Vec<Vec<T>>>
where
    T: Copy + AddAssign + Send + Sync,
{
    for w in weights {
        check_len(graph.len(), w.len())?;
    }
    debug!(fields = weights.len(), cells = graph.len(), "accumulating weight fields");

    #[cfg(feature = "threading")]
    let fields = {
        use rayon::prelude::*;
        weights
            .par_iter()
            .map(|w| {
                let mut field = w.to_vec();
                propagate(graph, order, &mut field);
                field
            })
            .collect()
    };

    #[cfg(not(feature = "threading"))]
    let fields = weights
        .iter()
        .map(|w| {
            let mut field = w.to_vec();
            propagate(graph, order, &mut field);
            field
        })
        .collect();

    Ok(fields)
}

fn propagate<T: Copy + AddAssign>(graph: &FlowGraph, order: &TopologicalOrder, field: &mut [T]) {
    for &c in order.iter() {
        let r = graph.receiver(c);
        if r != c {
            let v = field[c];
            field[r] += v;
        }
    }
}

fn check_len(expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(Error::DimensionMismatch { expected, actual });
    }
    Ok(())
}
