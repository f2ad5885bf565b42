//! The segment set of one line and the operations that keep it a single
//! chain.
//!
//! The chain is never stored as linked stations. It is derived on demand
//! from the segment set by [`Topology::sort_stations`], which makes the
//! structure trivially serializable and comparable as a plain set.
//!
//! Every mutation builds the replacement segment list first and only swaps
//! it in once all checks passed, so a failed operation leaves the topology
//! exactly as it was.

use std::collections::{HashMap, HashSet};

use crate::identifiers::StationIdentifier;
use crate::models::segment::Segment;
use crate::models::types::*;

/// Coarse lifecycle state of a topology.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TopologyState {
    Empty,
    SingleStation,
    ConnectedChain,
}

#[derive(Clone, Debug, Default)]
pub struct Topology {
    segments: Vec<Segment>,
    // Only meaningful while `segments` is empty
    anchor: Option<StationIdentifier>,
}

impl Topology {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_station(station: StationIdentifier) -> Self {
        Self {
            segments: Vec::new(),
            anchor: Some(station),
        }
    }

    pub fn with_segment(segment: Segment) -> Self {
        Self {
            segments: vec![segment],
            anchor: None,
        }
    }

    /// Rebuild a topology from persisted state.
    ///
    /// No invariant checking happens here; a corrupted set surfaces as
    /// [`TopologyError::DisconnectedTopology`] from [`Self::sort_stations`].
    pub fn from_parts(segments: Vec<Segment>, anchor: Option<StationIdentifier>) -> Self {
        let anchor = if segments.is_empty() { anchor } else { None };
        Self { segments, anchor }
    }

    /// EMPTY -> SINGLE_STATION.
    pub fn register_first_station(&mut self, station: StationIdentifier) -> Result<()> {
        if self.state() != TopologyState::Empty {
            return Err(TopologyError::TopologyAlreadyStarted(station));
        }
        self.anchor = Some(station);
        Ok(())
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// The lone station of a single-station topology.
    pub fn anchor(&self) -> Option<StationIdentifier> {
        if self.segments.is_empty() {
            self.anchor
        } else {
            None
        }
    }

    pub fn state(&self) -> TopologyState {
        match (self.segments.is_empty(), self.anchor) {
            (false, _) => TopologyState::ConnectedChain,
            (true, Some(_)) => TopologyState::SingleStation,
            (true, None) => TopologyState::Empty,
        }
    }

    pub fn contains_station(&self, station: StationIdentifier) -> bool {
        self.anchor() == Some(station) || self.segments.iter().any(|s| s.touches(station))
    }

    /// Every distinct station referenced, in no particular order.
    pub fn stations(&self) -> HashSet<StationIdentifier> {
        let mut stations: HashSet<_> = self
            .segments
            .iter()
            .flat_map(|s| [s.up(), s.down()])
            .collect();
        stations.extend(self.anchor());
        stations
    }

    pub fn station_count(&self) -> usize {
        self.stations().len()
    }

    /// The station with no incoming segment.
    pub fn head(&self) -> Option<StationIdentifier> {
        if self.segments.is_empty() {
            return self.anchor;
        }
        let downs: HashSet<_> = self.segments.iter().map(Segment::down).collect();
        self.segments.iter().map(Segment::up).find(|up| !downs.contains(up))
    }

    /// The station with no outgoing segment.
    pub fn tail(&self) -> Option<StationIdentifier> {
        if self.segments.is_empty() {
            return self.anchor;
        }
        let ups: HashSet<_> = self.segments.iter().map(Segment::up).collect();
        self.segments.iter().map(Segment::down).find(|down| !ups.contains(down))
    }

    pub fn total_distance(&self) -> u64 {
        self.segments
            .iter()
            .map(|s| u64::from(s.distance().value()))
            .sum()
    }

    /// Stations from head to tail.
    ///
    /// Fails with [`TopologyError::DisconnectedTopology`] when the segment
    /// set is not a single simple path. `visited` is reported as 0 when the
    /// set is rejected before traversal starts (a branch or no unique head).
    pub fn sort_stations(&self) -> Result<Vec<StationIdentifier>> {
        if self.segments.is_empty() {
            return Ok(self.anchor.into_iter().collect());
        }

        let expected = self.station_count();
        let disconnected = |visited| TopologyError::DisconnectedTopology { visited, expected };

        let mut next_by_up = HashMap::with_capacity(self.segments.len());
        let mut downs = HashSet::with_capacity(self.segments.len());
        for segment in &self.segments {
            if next_by_up.insert(segment.up(), segment.down()).is_some() {
                return Err(disconnected(0));
            }
            downs.insert(segment.down());
        }

        let mut heads = self
            .segments
            .iter()
            .map(Segment::up)
            .filter(|up| !downs.contains(up));
        let head = match (heads.next(), heads.next()) {
            (Some(head), None) => head,
            _ => return Err(disconnected(0)),
        };

        let mut order = vec![head];
        let mut visited = HashSet::from([head]);
        let mut current = head;
        while let Some(&next) = next_by_up.get(&current) {
            if !visited.insert(next) {
                break;
            }
            order.push(next);
            current = next;
        }

        if order.len() < expected {
            return Err(disconnected(order.len()));
        }
        Ok(order)
    }

    /// Insert `new` next to `target`, on the side given by `direction`.
    ///
    /// When `target` already has a neighbour on that side the connecting
    /// segment is split, and `distance` must be strictly shorter than it.
    /// Otherwise the line is simply extended at its head or tail.
    pub fn add_station(
        &mut self,
        target: StationIdentifier,
        new: StationIdentifier,
        distance: Distance,
        direction: Direction,
    ) -> Result<()> {
        if !self.contains_station(target) {
            return Err(TopologyError::StationNotFound(target));
        }
        if self.contains_station(new) {
            return Err(TopologyError::StationAlreadyRegistered(new));
        }

        let mut next = self.segments.clone();
        match direction {
            Direction::Down => match next.iter().position(|s| s.up() == target) {
                None => next.push(Segment::new(target, new, distance)?),
                Some(i) => {
                    let old = next[i];
                    let rest = old.distance().checked_sub(distance)?;
                    next[i] = Segment::new(target, new, distance)?;
                    next.insert(i + 1, Segment::new(new, old.down(), rest)?);
                }
            },
            Direction::Up => match next.iter().position(|s| s.down() == target) {
                None => next.insert(0, Segment::new(new, target, distance)?),
                Some(i) => {
                    let old = next[i];
                    let rest = old.distance().checked_sub(distance)?;
                    next[i] = Segment::new(old.up(), new, rest)?;
                    next.insert(i + 1, Segment::new(new, target, distance)?);
                }
            },
        }

        self.segments = next;
        self.anchor = None;
        Ok(())
    }

    /// Remove `station` and re-link its neighbours.
    ///
    /// An interior station's two segments collapse into one whose distance
    /// is their sum. The topology must keep at least one segment, so
    /// removing from a one-segment or single-station topology is refused.
    pub fn remove_station(&mut self, station: StationIdentifier) -> Result<()> {
        if !self.contains_station(station) {
            return Err(TopologyError::StationNotFound(station));
        }
        if self.segments.len() <= 1 {
            return Err(TopologyError::LastStationRemovalForbidden(station));
        }

        let incoming = self.segments.iter().position(|s| s.down() == station);
        let outgoing = self.segments.iter().position(|s| s.up() == station);

        let merged = match (incoming, outgoing) {
            (Some(i), Some(o)) => {
                let (inbound, outbound) = (self.segments[i], self.segments[o]);
                let distance = inbound.distance().checked_add(outbound.distance())?;
                Some((i.min(o), Segment::new(inbound.up(), outbound.down(), distance)?))
            }
            _ => None,
        };

        let mut next: Vec<_> = self
            .segments
            .iter()
            .filter(|s| !s.touches(station))
            .copied()
            .collect();
        if let Some((at, segment)) = merged {
            next.insert(at.min(next.len()), segment);
        }

        self.segments = next;
        Ok(())
    }
}
