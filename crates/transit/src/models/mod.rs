//! Line topology models, types, and errors.

pub mod line;
pub mod segment;
pub mod topology;
pub mod types;

// Re-exports for convenience
pub use line::Line;
pub use segment::Segment;
pub use topology::{Topology, TopologyState};
pub use types::{Direction, Distance, Result, Station, TopologyError};
