use subway_transit::{LineIdentifier, StationIdentifier, TopologyError};
use thiserror::Error;

use crate::repository::StorageError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Line not found: {0}")]
    LineNotFound(LineIdentifier),

    #[error("Station not found: {0}")]
    StationNotFound(StationIdentifier),

    #[error("Line name already in use: {0}")]
    DuplicateLineName(String),

    #[error("Station name already in use: {0}")]
    DuplicateStationName(String),

    #[error("Station {0} is still part of a line")]
    StationInUse(StationIdentifier),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl ServiceError {
    /// Failures that point at broken stored state or infrastructure rather
    /// than at the caller's request.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::Storage(_) | Self::Topology(TopologyError::DisconnectedTopology { .. })
        )
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_internal_errors() {
        let disconnected = ServiceError::from(TopologyError::DisconnectedTopology {
            visited: 1,
            expected: 3,
        });
        assert!(disconnected.is_internal());

        let caller = ServiceError::from(TopologyError::InvalidDistance(0));
        assert!(!caller.is_internal());
        assert!(!ServiceError::LineNotFound(LineIdentifier::new(1)).is_internal());
    }

    #[test]
    fn test_topology_message_is_transparent() {
        let err = ServiceError::from(TopologyError::StationNotFound(StationIdentifier::new(9)));
        assert_eq!(err.to_string(), "Station not found on line: 9");
    }
}
