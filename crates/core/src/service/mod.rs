//! Orchestration of line, station, and topology operations over a [`Store`].
//!
//! [`Store`]: crate::repository::Store

pub mod line;
pub mod line_topology;
pub mod station;

pub use line::{InitialSegment, LineService, NewLine};
pub use line_topology::{LineTopologyService, LineView};
pub use station::StationService;
