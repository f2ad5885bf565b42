//! In-memory store.
//!
//! Each unit of work runs against a private copy of the state, which only
//! replaces the shared state when the work succeeds.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use subway_transit::{LineIdentifier, Segment, Station, StationIdentifier};

use super::{LineRecord, LineRepository, Result, StationRepository, StorageError, Store};

#[derive(Clone, Debug)]
struct LineRow {
    record: LineRecord,
    segments: Vec<Segment>,
    anchor: Option<StationIdentifier>,
}

#[derive(Clone, Debug, Default)]
struct MemoryState {
    last_line_id: i64,
    last_station_id: i64,
    lines: BTreeMap<LineIdentifier, LineRow>,
    stations: BTreeMap<StationIdentifier, Station>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    type Transaction<'a> = MemoryTransaction;

    fn unit_of_work<T, E, F>(&self, work: F) -> std::result::Result<T, E>
    where
        F: FnOnce(&Self::Transaction<'_>) -> std::result::Result<T, E>,
        E: From<StorageError>,
    {
        // State is only written after successful work, so a poisoned lock
        // still guards a consistent snapshot.
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let transaction = MemoryTransaction {
            state: RefCell::new(state.clone()),
        };
        let output = work(&transaction)?;
        *state = transaction.state.into_inner();
        Ok(output)
    }
}

pub struct MemoryTransaction {
    state: RefCell<MemoryState>,
}

impl LineRepository for MemoryTransaction {
    fn insert_line(&self, name: &str, color: &str) -> Result<LineRecord> {
        let mut state = self.state.borrow_mut();
        state.last_line_id += 1;
        let record = LineRecord {
            id: LineIdentifier::new(state.last_line_id),
            name: name.to_owned(),
            color: color.to_owned(),
        };
        state.lines.insert(
            record.id,
            LineRow {
                record: record.clone(),
                segments: Vec::new(),
                anchor: None,
            },
        );
        Ok(record)
    }

    fn find_line(&self, id: LineIdentifier) -> Result<Option<LineRecord>> {
        Ok(self.state.borrow().lines.get(&id).map(|row| row.record.clone()))
    }

    fn find_line_by_name(&self, name: &str) -> Result<Option<LineRecord>> {
        Ok(self
            .state
            .borrow()
            .lines
            .values()
            .find(|row| row.record.name == name)
            .map(|row| row.record.clone()))
    }

    fn find_lines(&self) -> Result<Vec<LineRecord>> {
        Ok(self
            .state
            .borrow()
            .lines
            .values()
            .map(|row| row.record.clone())
            .collect())
    }

    fn update_line(&self, line: &LineRecord) -> Result<bool> {
        match self.state.borrow_mut().lines.get_mut(&line.id) {
            Some(row) => {
                row.record = line.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete_line(&self, id: LineIdentifier) -> Result<bool> {
        Ok(self.state.borrow_mut().lines.remove(&id).is_some())
    }

    fn load_segments(&self, id: LineIdentifier) -> Result<Vec<Segment>> {
        Ok(self
            .state
            .borrow()
            .lines
            .get(&id)
            .map(|row| row.segments.clone())
            .unwrap_or_default())
    }

    fn save_segments(&self, id: LineIdentifier, segments: &[Segment]) -> Result<()> {
        if let Some(row) = self.state.borrow_mut().lines.get_mut(&id) {
            row.segments = segments.to_vec();
        }
        Ok(())
    }

    fn load_anchor(&self, id: LineIdentifier) -> Result<Option<StationIdentifier>> {
        Ok(self.state.borrow().lines.get(&id).and_then(|row| row.anchor))
    }

    fn save_anchor(&self, id: LineIdentifier, anchor: Option<StationIdentifier>) -> Result<()> {
        if let Some(row) = self.state.borrow_mut().lines.get_mut(&id) {
            row.anchor = anchor;
        }
        Ok(())
    }
}

impl StationRepository for MemoryTransaction {
    fn insert_station(&self, name: &str) -> Result<Station> {
        let mut state = self.state.borrow_mut();
        state.last_station_id += 1;
        let station = Station::new(StationIdentifier::new(state.last_station_id), name);
        state.stations.insert(station.id, station.clone());
        Ok(station)
    }

    fn find_station(&self, id: StationIdentifier) -> Result<Option<Station>> {
        Ok(self.state.borrow().stations.get(&id).cloned())
    }

    fn find_station_by_name(&self, name: &str) -> Result<Option<Station>> {
        Ok(self
            .state
            .borrow()
            .stations
            .values()
            .find(|station| station.name == name)
            .cloned())
    }

    fn find_stations(&self) -> Result<Vec<Station>> {
        Ok(self.state.borrow().stations.values().cloned().collect())
    }

    fn update_station(&self, station: &Station) -> Result<bool> {
        match self.state.borrow_mut().stations.get_mut(&station.id) {
            Some(row) => {
                row.clone_from(station);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete_station(&self, id: StationIdentifier) -> Result<bool> {
        Ok(self.state.borrow_mut().stations.remove(&id).is_some())
    }

    fn is_station_in_use(&self, id: StationIdentifier) -> Result<bool> {
        Ok(self.state.borrow().lines.values().any(|row| {
            row.anchor == Some(id) || row.segments.iter().any(|s| s.touches(id))
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use subway_transit::Topology;

    #[test]
    fn test_unit_of_work_commits() {
        let store = MemoryStore::new();
        let line = store
            .unit_of_work(|tx| tx.insert_line("Line 2", "green"))
            .unwrap();

        let found = store
            .unit_of_work(|tx| tx.find_line(line.id))
            .unwrap();
        assert_eq!(found, Some(line));
    }

    #[test]
    fn test_unit_of_work_rolls_back_on_error() {
        let store = MemoryStore::new();
        let result: std::result::Result<(), StorageError> = store.unit_of_work(|tx| {
            tx.insert_station("Gangnam")?;
            Err(StorageError::Corrupted {
                table: "station",
                source: subway_transit::TopologyError::InvalidDistance(0),
            })
        });
        assert!(result.is_err());

        let stations = store.unit_of_work(|tx| tx.find_stations()).unwrap();
        assert!(stations.is_empty());
    }

    #[test]
    fn test_topology_round_trip() {
        let store = MemoryStore::new();
        let topology = Topology::from_parts(
            vec![
                Segment::try_from_raw(1, 2, 5).unwrap(),
                Segment::try_from_raw(2, 3, 3).unwrap(),
            ],
            None,
        );

        let loaded = store
            .unit_of_work(|tx| {
                let line = tx.insert_line("Line 2", "green")?;
                tx.save_topology(line.id, &topology)?;
                tx.load_topology(line.id)
            })
            .unwrap();

        let tuples: Vec<_> = loaded.segments().iter().map(Segment::as_tuple).collect();
        assert_eq!(tuples, vec![(1, 2, 5), (2, 3, 3)]);
    }

    #[test]
    fn test_station_in_use() {
        let store = MemoryStore::new();
        store
            .unit_of_work(|tx| {
                let a = tx.insert_station("A")?;
                let b = tx.insert_station("B")?;
                let c = tx.insert_station("C")?;
                let line = tx.insert_line("Line 1", "blue")?;
                tx.save_anchor(line.id, Some(a.id))?;

                assert!(tx.is_station_in_use(a.id)?);
                assert!(!tx.is_station_in_use(b.id)?);

                tx.save_segments(line.id, &[Segment::try_from_raw(b.id, c.id, 2).unwrap()])?;
                assert!(tx.is_station_in_use(c.id)?);
                Ok::<_, StorageError>(())
            })
            .unwrap();
    }

    #[test]
    fn test_update_station() {
        let store = MemoryStore::new();
        let station = store.unit_of_work(|tx| tx.insert_station("Seoul")).unwrap();

        let renamed = Station::new(station.id, "Seoul Station");
        assert!(store.unit_of_work(|tx| tx.update_station(&renamed)).unwrap());
        assert_eq!(
            store.unit_of_work(|tx| tx.find_station(station.id)).unwrap(),
            Some(renamed)
        );

        let missing = Station::new(StationIdentifier::new(42), "Nowhere");
        assert!(!store.unit_of_work(|tx| tx.update_station(&missing)).unwrap());
    }
}
