//! Directed, distance-weighted hop between two stations of one line.

use std::hash::{Hash, Hasher};

use crate::identifiers::StationIdentifier;
use crate::models::types::*;

/// One hop of a line, traversed from `up` to `down`.
///
/// Equality and hashing only consider the `(up, down)` pair, so two
/// segments between the same stations are duplicates whatever their
/// distance.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Segment {
    up: StationIdentifier,
    down: StationIdentifier,
    distance: Distance,
}

impl Segment {
    pub fn new(up: StationIdentifier, down: StationIdentifier, distance: Distance) -> Result<Self> {
        if up == down {
            return Err(TopologyError::SelfLoop(up));
        }
        Ok(Self { up, down, distance })
    }

    /// Build a segment from raw values, validating the distance as well.
    pub fn try_from_raw(
        up: impl Into<StationIdentifier>,
        down: impl Into<StationIdentifier>,
        distance: i64,
    ) -> Result<Self> {
        Self::new(up.into(), down.into(), Distance::new(distance)?)
    }

    pub fn up(&self) -> StationIdentifier {
        self.up
    }

    pub fn down(&self) -> StationIdentifier {
        self.down
    }

    pub fn distance(&self) -> Distance {
        self.distance
    }

    pub fn touches(&self, station: StationIdentifier) -> bool {
        self.up == station || self.down == station
    }

    /// `(up, down, distance)` as plain values, handy for comparing whole
    /// segment sets including distances.
    pub fn as_tuple(&self) -> (i64, i64, u32) {
        (self.up.value(), self.down.value(), self.distance.value())
    }
}

impl PartialEq for Segment {
    fn eq(&self, other: &Self) -> bool {
        self.up == other.up && self.down == other.down
    }
}

impl Eq for Segment {}

impl Hash for Segment {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.up.hash(state);
        self.down.hash(state);
    }
}
