//! Drainage network pipeline: flow graph → topological order → accumulation
//! → channel extraction / profile tracing.
pub mod accumulation;
pub mod catchment;
pub mod channels;
pub mod flow_graph;
pub mod profile;
pub mod topology;

#[cfg(test)]
pub(crate) mod fixtures;

pub use accumulation::{accumulate, accumulate_cells, accumulate_many};
pub use catchment::{catchment, outlet_of};
pub use channels::{extract_channels, ChannelNetwork, ChannelSegment};
pub use flow_graph::FlowGraph;
pub use profile::{trace_profile, Profile};
pub use topology::TopologicalOrder;
