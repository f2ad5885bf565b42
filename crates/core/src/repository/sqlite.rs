//! SQLite store backed by `rusqlite`.
//!
//! One connection sits behind a mutex. Every unit of work opens an
//! IMMEDIATE transaction on it, which serializes concurrent mutations of
//! the same line.

use std::path::Path;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use rusqlite::{Connection, OptionalExtension, TransactionBehavior, params};
use subway_transit::{LineIdentifier, Segment, Station, StationIdentifier};
use tracing::{debug, info};

use super::{LineRecord, LineRepository, Result, StationRepository, StorageError, Store};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS station (
    id   INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS line (
    id                INTEGER PRIMARY KEY AUTOINCREMENT,
    name              TEXT NOT NULL UNIQUE,
    color             TEXT NOT NULL,
    anchor_station_id INTEGER REFERENCES station (id)
);

CREATE TABLE IF NOT EXISTS segment (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    line_id         INTEGER NOT NULL REFERENCES line (id) ON DELETE CASCADE,
    up_station_id   INTEGER NOT NULL REFERENCES station (id),
    down_station_id INTEGER NOT NULL REFERENCES station (id),
    distance        INTEGER NOT NULL CHECK (distance > 0),
    UNIQUE (line_id, up_station_id, down_station_id)
);

CREATE INDEX IF NOT EXISTS idx_segment_line ON segment (line_id);
";

/// Default time to wait on a locked database before failing.
const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens (creating if missing) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        let mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        debug!(journal_mode = %mode, "configured journal");
        info!("opened sqlite store at {}", path.display());
        Self::initialize(conn)
    }

    pub fn in_memory() -> Result<Self> {
        Self::initialize(Connection::open_in_memory()?)
    }

    fn initialize(conn: Connection) -> Result<Self> {
        conn.busy_timeout(DEFAULT_BUSY_TIMEOUT)?;
        conn.pragma_update(None, "foreign_keys", true)?;
        conn.execute_batch(SCHEMA)?;
        debug!("sqlite schema ready");

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl Store for SqliteStore {
    type Transaction<'a> = SqliteTransaction<'a>;

    fn unit_of_work<T, E, F>(&self, work: F) -> std::result::Result<T, E>
    where
        F: FnOnce(&Self::Transaction<'_>) -> std::result::Result<T, E>,
        E: From<StorageError>,
    {
        // An unfinished transaction from a panicking holder is rolled back
        // when it drops, so the connection is still usable.
        let mut conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(StorageError::from)?;
        let view = SqliteTransaction { tx };
        let output = work(&view)?;
        view.tx.commit().map_err(StorageError::from)?;
        Ok(output)
    }
}

pub struct SqliteTransaction<'conn> {
    tx: rusqlite::Transaction<'conn>,
}

fn line_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<LineRecord> {
    Ok(LineRecord {
        id: LineIdentifier::new(row.get(0)?),
        name: row.get(1)?,
        color: row.get(2)?,
    })
}

fn station_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Station> {
    Ok(Station::new(StationIdentifier::new(row.get(0)?), row.get::<_, String>(1)?))
}

impl LineRepository for SqliteTransaction<'_> {
    fn insert_line(&self, name: &str, color: &str) -> Result<LineRecord> {
        self.tx.execute(
            "INSERT INTO line (name, color) VALUES (?1, ?2)",
            params![name, color],
        )?;
        Ok(LineRecord {
            id: LineIdentifier::new(self.tx.last_insert_rowid()),
            name: name.to_owned(),
            color: color.to_owned(),
        })
    }

    fn find_line(&self, id: LineIdentifier) -> Result<Option<LineRecord>> {
        Ok(self
            .tx
            .query_row(
                "SELECT id, name, color FROM line WHERE id = ?1",
                params![id.value()],
                line_from_row,
            )
            .optional()?)
    }

    fn find_line_by_name(&self, name: &str) -> Result<Option<LineRecord>> {
        Ok(self
            .tx
            .query_row(
                "SELECT id, name, color FROM line WHERE name = ?1",
                params![name],
                line_from_row,
            )
            .optional()?)
    }

    fn find_lines(&self) -> Result<Vec<LineRecord>> {
        let mut stmt = self.tx.prepare("SELECT id, name, color FROM line ORDER BY id")?;
        let lines = stmt
            .query_map([], line_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(lines)
    }

    fn update_line(&self, line: &LineRecord) -> Result<bool> {
        let changed = self.tx.execute(
            "UPDATE line SET name = ?1, color = ?2 WHERE id = ?3",
            params![line.name, line.color, line.id.value()],
        )?;
        Ok(changed > 0)
    }

    fn delete_line(&self, id: LineIdentifier) -> Result<bool> {
        let changed = self
            .tx
            .execute("DELETE FROM line WHERE id = ?1", params![id.value()])?;
        Ok(changed > 0)
    }

    fn load_segments(&self, id: LineIdentifier) -> Result<Vec<Segment>> {
        let mut stmt = self.tx.prepare(
            "SELECT up_station_id, down_station_id, distance FROM segment
             WHERE line_id = ?1 ORDER BY id",
        )?;
        let rows = stmt
            .query_map(params![id.value()], |row| {
                Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?, row.get::<_, i64>(2)?))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter()
            .map(|(up, down, distance)| {
                Segment::try_from_raw(up, down, distance).map_err(|source| {
                    StorageError::Corrupted {
                        table: "segment",
                        source,
                    }
                })
            })
            .collect()
    }

    fn save_segments(&self, id: LineIdentifier, segments: &[Segment]) -> Result<()> {
        self.tx
            .execute("DELETE FROM segment WHERE line_id = ?1", params![id.value()])?;

        let mut stmt = self.tx.prepare(
            "INSERT INTO segment (line_id, up_station_id, down_station_id, distance)
             VALUES (?1, ?2, ?3, ?4)",
        )?;
        for segment in segments {
            stmt.execute(params![
                id.value(),
                segment.up().value(),
                segment.down().value(),
                segment.distance().value(),
            ])?;
        }
        debug!(line = %id, segments = segments.len(), "saved segments");
        Ok(())
    }

    fn load_anchor(&self, id: LineIdentifier) -> Result<Option<StationIdentifier>> {
        let anchor: Option<Option<i64>> = self
            .tx
            .query_row(
                "SELECT anchor_station_id FROM line WHERE id = ?1",
                params![id.value()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(anchor.flatten().map(StationIdentifier::new))
    }

    fn save_anchor(&self, id: LineIdentifier, anchor: Option<StationIdentifier>) -> Result<()> {
        self.tx.execute(
            "UPDATE line SET anchor_station_id = ?1 WHERE id = ?2",
            params![anchor.map(|a| a.value()), id.value()],
        )?;
        Ok(())
    }
}

impl StationRepository for SqliteTransaction<'_> {
    fn insert_station(&self, name: &str) -> Result<Station> {
        self.tx
            .execute("INSERT INTO station (name) VALUES (?1)", params![name])?;
        Ok(Station::new(
            StationIdentifier::new(self.tx.last_insert_rowid()),
            name,
        ))
    }

    fn find_station(&self, id: StationIdentifier) -> Result<Option<Station>> {
        Ok(self
            .tx
            .query_row(
                "SELECT id, name FROM station WHERE id = ?1",
                params![id.value()],
                station_from_row,
            )
            .optional()?)
    }

    fn find_station_by_name(&self, name: &str) -> Result<Option<Station>> {
        Ok(self
            .tx
            .query_row(
                "SELECT id, name FROM station WHERE name = ?1",
                params![name],
                station_from_row,
            )
            .optional()?)
    }

    fn find_stations(&self) -> Result<Vec<Station>> {
        let mut stmt = self.tx.prepare("SELECT id, name FROM station ORDER BY id")?;
        let stations = stmt
            .query_map([], station_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(stations)
    }

    fn update_station(&self, station: &Station) -> Result<bool> {
        let changed = self.tx.execute(
            "UPDATE station SET name = ?1 WHERE id = ?2",
            params![station.name, station.id.value()],
        )?;
        Ok(changed > 0)
    }

    fn delete_station(&self, id: StationIdentifier) -> Result<bool> {
        let changed = self
            .tx
            .execute("DELETE FROM station WHERE id = ?1", params![id.value()])?;
        Ok(changed > 0)
    }

    fn is_station_in_use(&self, id: StationIdentifier) -> Result<bool> {
        Ok(self.tx.query_row(
            "SELECT EXISTS (
                 SELECT 1 FROM segment WHERE up_station_id = ?1 OR down_station_id = ?1
             ) OR EXISTS (
                 SELECT 1 FROM line WHERE anchor_station_id = ?1
             )",
            params![id.value()],
            |row| row.get(0),
        )?)
    }
}
