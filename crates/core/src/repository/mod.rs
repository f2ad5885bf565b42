//! Persistence boundary.
//!
//! Services only talk to storage through these traits. A [`Store`] hands
//! out a transactional view implementing both repositories; everything done
//! through one view commits or rolls back together.

pub mod error;
pub mod memory;
pub mod sqlite;

pub use error::{Result, StorageError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use subway_transit::{LineIdentifier, Segment, Station, StationIdentifier, Topology};

/// Identity columns of a line, without its topology.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineRecord {
    pub id: LineIdentifier,
    pub name: String,
    pub color: String,
}

pub trait LineRepository {
    fn insert_line(&self, name: &str, color: &str) -> Result<LineRecord>;

    fn find_line(&self, id: LineIdentifier) -> Result<Option<LineRecord>>;

    fn find_line_by_name(&self, name: &str) -> Result<Option<LineRecord>>;

    /// All lines ordered by id.
    fn find_lines(&self) -> Result<Vec<LineRecord>>;

    /// Returns `false` when no line has `line.id`.
    fn update_line(&self, line: &LineRecord) -> Result<bool>;

    /// Deletes the line together with its segments. Returns `false` when no
    /// such line exists.
    fn delete_line(&self, id: LineIdentifier) -> Result<bool>;

    fn load_segments(&self, id: LineIdentifier) -> Result<Vec<Segment>>;

    /// Replaces the whole segment set of a line.
    fn save_segments(&self, id: LineIdentifier, segments: &[Segment]) -> Result<()>;

    fn load_anchor(&self, id: LineIdentifier) -> Result<Option<StationIdentifier>>;

    fn save_anchor(&self, id: LineIdentifier, anchor: Option<StationIdentifier>) -> Result<()>;

    fn load_topology(&self, id: LineIdentifier) -> Result<Topology> {
        Ok(Topology::from_parts(
            self.load_segments(id)?,
            self.load_anchor(id)?,
        ))
    }

    fn save_topology(&self, id: LineIdentifier, topology: &Topology) -> Result<()> {
        self.save_segments(id, topology.segments())?;
        self.save_anchor(id, topology.anchor())
    }
}

pub trait StationRepository {
    fn insert_station(&self, name: &str) -> Result<Station>;

    fn find_station(&self, id: StationIdentifier) -> Result<Option<Station>>;

    fn find_station_by_name(&self, name: &str) -> Result<Option<Station>>;

    /// All stations ordered by id.
    fn find_stations(&self) -> Result<Vec<Station>>;

    /// Returns `false` when no station has `station.id`.
    fn update_station(&self, station: &Station) -> Result<bool>;

    fn delete_station(&self, id: StationIdentifier) -> Result<bool>;

    /// Whether any line references the station.
    fn is_station_in_use(&self, id: StationIdentifier) -> Result<bool>;
}

/// Source of transactional repository views.
pub trait Store: Send + Sync {
    type Transaction<'a>: LineRepository + StationRepository;

    /// Runs `work` inside one atomic unit of work.
    ///
    /// `Ok` commits every write made through the view; `Err` discards them.
    /// Units of work against one store are serialized.
    fn unit_of_work<T, E, F>(&self, work: F) -> std::result::Result<T, E>
    where
        F: FnOnce(&Self::Transaction<'_>) -> std::result::Result<T, E>,
        E: From<StorageError>;
}
