//! Core data types and enums for line topology.

use std::fmt;

use crate::identifiers::*;

// ============================================================================
// Enums
// ============================================================================

/// Which side of a target station a new station is inserted on.
///
/// `Up` makes the new station the target's upstream neighbour, `Down` its
/// downstream neighbour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum Direction {
    Up,
    Down,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Up => f.write_str("UP"),
            Self::Down => f.write_str("DOWN"),
        }
    }
}

// ============================================================================
// Data Structures
// ============================================================================

/// Strictly positive distance between two adjacent stations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Distance(u32);

impl Distance {
    /// Fails with [`TopologyError::InvalidDistance`] for zero, negative, or
    /// out-of-range values.
    pub fn new(value: i64) -> Result<Self> {
        match u32::try_from(value) {
            Ok(v) if v > 0 => Ok(Self(v)),
            _ => Err(TopologyError::InvalidDistance(value)),
        }
    }

    pub fn value(&self) -> u32 {
        self.0
    }

    /// Remaining distance after carving `inserted` off the front of `self`.
    ///
    /// `self` must strictly exceed `inserted`.
    pub fn checked_sub(self, inserted: Distance) -> Result<Self> {
        match self.0.checked_sub(inserted.0) {
            Some(rest) if rest > 0 => Ok(Self(rest)),
            _ => Err(TopologyError::InvalidDistance(i64::from(inserted.0))),
        }
    }

    pub fn checked_add(self, other: Distance) -> Result<Self> {
        self.0
            .checked_add(other.0)
            .map(Self)
            .ok_or(TopologyError::InvalidDistance(
                i64::from(self.0) + i64::from(other.0),
            ))
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for Distance {
    type Error = TopologyError;

    fn try_from(value: i64) -> Result<Self> {
        Self::new(value)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Distance {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = i64::deserialize(deserializer)?;
        Distance::new(raw).map_err(serde::de::Error::custom)
    }
}

/// A station as known to the station registry.
///
/// Lines never own stations; they reference them by id.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Station {
    pub id: StationIdentifier,
    pub name: String,
}

impl Station {
    pub fn new(id: StationIdentifier, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TopologyError {
    #[error("Invalid distance: {0}")]
    InvalidDistance(i64),

    #[error("Segment cannot start and end at station {0}")]
    SelfLoop(StationIdentifier),

    #[error("Station not found on line: {0}")]
    StationNotFound(StationIdentifier),

    #[error("Station already registered on line: {0}")]
    StationAlreadyRegistered(StationIdentifier),

    #[error("Disconnected topology: visited {visited} of {expected} stations")]
    DisconnectedTopology { visited: usize, expected: usize },

    #[error("Line must keep at least one segment, cannot remove station {0}")]
    LastStationRemovalForbidden(StationIdentifier),

    #[error("Line already has stations, cannot register {0} as its first station")]
    TopologyAlreadyStarted(StationIdentifier),
}

pub type Result<T> = std::result::Result<T, TopologyError>;
