//! D8 drainage-network engine.
//!
//! Given a D8 flow-direction raster, build the flow graph once and then
//! accumulate any additive weight field downstream, extract channel
//! networks above a threshold, and trace downstream profiles.
//!
//! ```
//! use drainage_core::{DirectionRaster, Engine, GeoTransform};
//!
//! // 0 → 1 → 2 → 3 (ESRI codes: 1 = east, 0 = outlet).
//! let raster = DirectionRaster::new(vec![1, 1, 1, 0], 1, 4, GeoTransform::new(0.0, 0.0, 10.0, -10.0))?;
//! let engine = Engine::from_raster(&raster)?;
//! let area = engine.accumulate(None)?;
//! assert_eq!(area, vec![1.0, 2.0, 3.0, 4.0]);
//! assert_eq!(engine.extract_channels(&area, 3.0)?.segments[0].cells, vec![2, 3]);
//! assert_eq!(engine.profile(0)?.distances, vec![0.0, 10.0, 20.0, 30.0]);
//! # Ok::<(), drainage_core::Error>(())
//! ```
pub mod direction;
pub mod engine;
pub mod error;
pub mod grid;
pub mod hydraulic;
pub mod raster;

pub use direction::{D8Direction, DirectionScheme, Outflow};
pub use engine::{Engine, EngineParams};
pub use error::{Error, Result};
pub use grid::{Extent, GeoTransform, GridIndexer, GridShape};
pub use hydraulic::{ChannelNetwork, ChannelSegment, FlowGraph, Profile, TopologicalOrder};
pub use raster::DirectionRaster;
