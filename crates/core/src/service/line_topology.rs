//! Load -> mutate -> persist around [`Topology`] operations.
//!
//! Every operation rebuilds the line's topology from the store inside one
//! unit of work. Mutations are only written back when the topology accepted
//! them; a rejected mutation leaves stored state untouched.
//!
//! [`Topology`]: subway_transit::Topology

use std::sync::Arc;

use subway_transit::{
    Direction, Distance, Line, LineIdentifier, Station, StationIdentifier, TopologyError,
};
use tracing::{debug, error};

use crate::error::{Result, ServiceError};
use crate::repository::{LineRecord, LineRepository, StationRepository, Store};

/// A line together with its stations in travel order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineView {
    pub line: LineRecord,
    pub stations: Vec<Station>,
    pub total_distance: u64,
}

pub struct LineTopologyService<S> {
    store: Arc<S>,
}

impl<S> Clone for LineTopologyService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

pub(crate) fn load_line<R: LineRepository>(repo: &R, id: LineIdentifier) -> Result<Line> {
    let record = repo.find_line(id)?.ok_or(ServiceError::LineNotFound(id))?;
    let topology = repo.load_topology(id)?;
    Ok(Line::new(record.id, record.name, record.color, topology))
}

/// Surfaces a topology failure, raising an alert for broken stored state.
fn reject(line: LineIdentifier, err: TopologyError) -> ServiceError {
    if let TopologyError::DisconnectedTopology { visited, expected } = err {
        error!(%line, visited, expected, "stored segments do not form a single chain");
    } else {
        debug!(%line, error = %err, "topology rejected mutation");
    }
    ServiceError::Topology(err)
}

fn view_line<R>(repo: &R, line: Line) -> Result<LineView>
where
    R: StationRepository,
{
    let order = line.sort_stations().map_err(|e| reject(line.id, e))?;
    let stations = order
        .into_iter()
        .map(|id| repo.find_station(id)?.ok_or(ServiceError::StationNotFound(id)))
        .collect::<Result<Vec<_>>>()?;
    let total_distance = line.topology().total_distance();

    Ok(LineView {
        line: LineRecord {
            id: line.id,
            name: line.name,
            color: line.color,
        },
        stations,
        total_distance,
    })
}

impl<S: Store> LineTopologyService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Stations of a line from head to tail.
    pub fn sort_stations(&self, line_id: LineIdentifier) -> Result<Vec<Station>> {
        Ok(self.find_line(line_id)?.stations)
    }

    pub fn find_line(&self, line_id: LineIdentifier) -> Result<LineView> {
        self.store.unit_of_work(|tx| {
            let line = load_line(tx, line_id)?;
            view_line(tx, line)
        })
    }

    pub fn find_lines(&self) -> Result<Vec<LineView>> {
        self.store.unit_of_work(|tx| {
            tx.find_lines()?
                .into_iter()
                .map(|record| view_line(tx, load_line(tx, record.id)?))
                .collect()
        })
    }

    /// Inserts `new` next to `target` on the given side.
    pub fn add_station(
        &self,
        line_id: LineIdentifier,
        target: StationIdentifier,
        new: StationIdentifier,
        distance: Distance,
        direction: Direction,
    ) -> Result<()> {
        self.store.unit_of_work(|tx| {
            let mut line = load_line(tx, line_id)?;
            tx.find_station(new)?
                .ok_or(ServiceError::StationNotFound(new))?;

            line.add_station(target, new, distance, direction)
                .map_err(|e| reject(line_id, e))?;

            tx.save_topology(line_id, line.topology())?;
            debug!(
                line = %line_id,
                station = %new,
                next_to = %target,
                %direction,
                %distance,
                "added station"
            );
            Ok(())
        })
    }

    /// Makes `station` the first station of an empty line.
    pub fn register_first_station(
        &self,
        line_id: LineIdentifier,
        station: StationIdentifier,
    ) -> Result<()> {
        self.store.unit_of_work(|tx| {
            let mut line = load_line(tx, line_id)?;
            tx.find_station(station)?
                .ok_or(ServiceError::StationNotFound(station))?;

            line.register_first_station(station)
                .map_err(|e| reject(line_id, e))?;

            tx.save_topology(line_id, line.topology())?;
            debug!(line = %line_id, %station, "registered first station");
            Ok(())
        })
    }

    pub fn remove_station(&self, line_id: LineIdentifier, station: StationIdentifier) -> Result<()> {
        self.store.unit_of_work(|tx| {
            let mut line = load_line(tx, line_id)?;
            line.remove_station(station)
                .map_err(|e| reject(line_id, e))?;

            tx.save_topology(line_id, line.topology())?;
            debug!(line = %line_id, %station, "removed station");
            Ok(())
        })
    }
}
