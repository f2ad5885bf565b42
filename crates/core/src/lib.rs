//! # subway-core
//!
//! Services and persistence around the line topology engine.
//!
//! Each request loads a line's segments from a [`repository::Store`],
//! runs one topology operation in memory, and writes the result back in the
//! same unit of work. Nothing is cached between requests.

pub mod error;
pub mod repository;
pub mod service;

pub use error::{Result, ServiceError};

// Re-export the topology engine
pub use subway_transit as transit;
