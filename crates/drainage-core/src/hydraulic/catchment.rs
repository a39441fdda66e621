//! Catchment membership and outlet lookup.
use super::flow_graph::FlowGraph;
use crate::error::{Error, Result};

/// Every cell draining to `cell`, itself included, in traversal order
/// (`cell` first).
pub fn catchment(graph: &FlowGraph, cell: usize) -> Result<Vec<usize>> {
    check(graph, cell)?;
    let mut cells = Vec::new();
    let mut stack = vec![cell];
    while let Some(c) = stack.pop() {
        cells.push(c);
        stack.extend_from_slice(graph.donors(c));
    }
    Ok(cells)
}

/// Terminal cell reached by following receivers from `cell`.
pub fn outlet_of(graph: &FlowGraph, cell: usize) -> Result<usize> {
    check(graph, cell)?;
    let mut c = cell;
    for _ in 0..graph.len() {
        let r = graph.receiver(c);
        if r == c {
            return Ok(c);
        }
        c = r;
    }
    Err(Error::MalformedFlowGraph {
        index: cell,
        steps: graph.len(),
    })
}

fn check(graph: &FlowGraph, cell: usize) -> Result<()> {
    if cell >= graph.len() {
        return Err(Error::IndexOutOfRange {
            index: cell,
            len: graph.len(),
        });
    }
    Ok(())
}
