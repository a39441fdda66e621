//! Donor-before-receiver processing order over all cells.
//!
//! Built by an explicit-stack traversal from every outlet up through donor
//! edges (Braun & Willett style stack order), then reversed. Each cell is
//! pushed exactly once because it has exactly one receiver, so the cost is
//! linear in cells + edges and independent of the longest flow path.
use tracing::debug;

use super::flow_graph::FlowGraph;
use crate::error::{Error, Result};

#[derive(Debug, Clone)]
pub struct TopologicalOrder {
    /// Upstream-first: every donor appears before its receiver.
    order: Vec<usize>,
}

impl TopologicalOrder {
    pub fn build(graph: &FlowGraph) -> Result<Self> {
        let n = graph.len();
        let mut order = Vec::with_capacity(n);
        let mut stack: Vec<usize> = graph.terminals().collect();
        let outlets = stack.len();

        while let Some(cell) = stack.pop() {
            order.push(cell);
            stack.extend_from_slice(graph.donors(cell));
        }

        // Cells unreachable from any outlet can only sit on a cycle.
        if order.len() != n {
            let mut seen = vec![false; n];
            for &c in &order {
                seen[c] = true;
            }
            let index = seen.iter().position(|&s| !s).unwrap_or(0);
            return Err(Error::MalformedFlowGraph { index, steps: n });
        }

        order.reverse();
        debug!(cells = n, outlets, "built topological order");
        Ok(Self { order })
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.order
    }

    pub fn iter(&self) -> std::slice::Iter<'_, usize> {
        self.order.iter()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
