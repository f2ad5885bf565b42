//! # subway-transit
//!
//! Topology engine for subway lines.
//!
//! A line is an ordered chain of stations joined by directed,
//! distance-weighted segments. This crate owns the segment model, derives
//! the station order from it, and inserts or removes stations while keeping
//! the chain a single acyclic path with consistent distances.
//!
//! No I/O happens here; persistence and transport live in other crates.
//!
//! ## Example
//!
//! ```
//! use subway_transit::prelude::*;
//!
//! let (a, b, c, d) = (
//!     StationIdentifier::new(1),
//!     StationIdentifier::new(2),
//!     StationIdentifier::new(3),
//!     StationIdentifier::new(4),
//! );
//!
//! let mut topology = Topology::from_parts(
//!     vec![
//!         Segment::new(a, b, Distance::new(5).unwrap()).unwrap(),
//!         Segment::new(b, c, Distance::new(3).unwrap()).unwrap(),
//!     ],
//!     None,
//! );
//!
//! topology
//!     .add_station(b, d, Distance::new(2).unwrap(), Direction::Down)
//!     .unwrap();
//! assert_eq!(topology.sort_stations().unwrap(), vec![a, b, d, c]);
//!
//! topology.remove_station(b).unwrap();
//! assert_eq!(topology.sort_stations().unwrap(), vec![a, d, c]);
//! ```

pub mod identifiers;
pub mod models;

// Re-exports for convenience
pub mod prelude {
    pub use crate::identifiers::*;
    pub use crate::models::*;
}

pub use prelude::*;
