//! A subway line: identity plus the topology it owns.

use crate::identifiers::*;
use crate::models::topology::Topology;
use crate::models::types::*;

#[derive(Clone, Debug)]
pub struct Line {
    pub id: LineIdentifier,
    pub name: String,
    pub color: String,
    topology: Topology,
}

impl Line {
    pub fn new(
        id: LineIdentifier,
        name: impl Into<String>,
        color: impl Into<String>,
        topology: Topology,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            color: color.into(),
            topology,
        }
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn sort_stations(&self) -> Result<Vec<StationIdentifier>> {
        self.topology.sort_stations()
    }

    pub fn register_first_station(&mut self, station: StationIdentifier) -> Result<()> {
        self.topology.register_first_station(station)
    }

    pub fn add_station(
        &mut self,
        target: StationIdentifier,
        new: StationIdentifier,
        distance: Distance,
        direction: Direction,
    ) -> Result<()> {
        self.topology.add_station(target, new, distance, direction)
    }

    pub fn remove_station(&mut self, station: StationIdentifier) -> Result<()> {
        self.topology.remove_station(station)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::segment::Segment;

    #[test]
    fn test_line_delegates_to_topology() {
        let first = Segment::try_from_raw(1, 2, 10).unwrap();
        let mut line = Line::new(
            LineIdentifier::new(1),
            "Line 2",
            "bg-green-600",
            Topology::with_segment(first),
        );

        line.add_station(
            StationIdentifier::new(2),
            StationIdentifier::new(3),
            Distance::new(4).unwrap(),
            Direction::Down,
        )
        .unwrap();

        let order: Vec<i64> = line.sort_stations().unwrap().iter().map(|s| s.value()).collect();
        assert_eq!(order, vec![1, 2, 3]);

        line.remove_station(StationIdentifier::new(2)).unwrap();
        assert_eq!(line.topology().segments().len(), 1);
        assert_eq!(line.topology().segments()[0].as_tuple(), (1, 3, 14));
    }
}
