use std::sync::Arc;

use subway_transit::{Distance, LineIdentifier, Segment, StationIdentifier, Topology};
use tracing::info;

use crate::error::{Result, ServiceError};
use crate::repository::{LineRecord, LineRepository, StationRepository, Store};

/// First segment of a line created already connected.
#[derive(Clone, Copy, Debug)]
pub struct InitialSegment {
    pub up: StationIdentifier,
    pub down: StationIdentifier,
    pub distance: Distance,
}

#[derive(Clone, Debug)]
pub struct NewLine {
    pub name: String,
    pub color: String,
    pub initial: Option<InitialSegment>,
}

/// Line lifecycle: create, rename, recolor, delete.
pub struct LineService<S> {
    store: Arc<S>,
}

impl<S> Clone for LineService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ServiceError::InvalidInput(format!("{field} must not be blank")));
    }
    Ok(())
}

impl<S: Store> LineService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn save_line(&self, request: NewLine) -> Result<LineRecord> {
        require_text("name", &request.name)?;
        require_text("color", &request.color)?;

        self.store.unit_of_work(|tx| {
            if tx.find_line_by_name(&request.name)?.is_some() {
                return Err(ServiceError::DuplicateLineName(request.name.clone()));
            }

            let topology = match request.initial {
                Some(initial) => {
                    for station in [initial.up, initial.down] {
                        tx.find_station(station)?
                            .ok_or(ServiceError::StationNotFound(station))?;
                    }
                    Topology::with_segment(Segment::new(initial.up, initial.down, initial.distance)?)
                }
                None => Topology::empty(),
            };

            let line = tx.insert_line(&request.name, &request.color)?;
            tx.save_topology(line.id, &topology)?;
            info!(line = %line.id, name = %line.name, "created line");
            Ok(line)
        })
    }

    pub fn find_line(&self, id: LineIdentifier) -> Result<LineRecord> {
        self.store
            .unit_of_work(|tx| tx.find_line(id)?.ok_or(ServiceError::LineNotFound(id)))
    }

    pub fn find_lines(&self) -> Result<Vec<LineRecord>> {
        Ok(self.store.unit_of_work(|tx| tx.find_lines())?)
    }

    pub fn update_line(&self, id: LineIdentifier, name: &str, color: &str) -> Result<LineRecord> {
        require_text("name", name)?;
        require_text("color", color)?;

        self.store.unit_of_work(|tx| {
            tx.find_line(id)?.ok_or(ServiceError::LineNotFound(id))?;
            if let Some(other) = tx.find_line_by_name(name)? {
                if other.id != id {
                    return Err(ServiceError::DuplicateLineName(name.to_owned()));
                }
            }

            let line = LineRecord {
                id,
                name: name.to_owned(),
                color: color.to_owned(),
            };
            tx.update_line(&line)?;
            info!(line = %id, name, "updated line");
            Ok(line)
        })
    }

    /// Deletes the line and its whole topology.
    pub fn delete_line(&self, id: LineIdentifier) -> Result<()> {
        self.store.unit_of_work(|tx| {
            if !tx.delete_line(id)? {
                return Err(ServiceError::LineNotFound(id));
            }
            info!(line = %id, "deleted line");
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{MemoryStore, SqliteStore, StorageError};
    use crate::service::LineTopologyService;
    use subway_transit::TopologyError;

    fn stations<S: Store>(store: &S) -> (StationIdentifier, StationIdentifier) {
        store
            .unit_of_work(|tx| {
                Ok::<_, StorageError>((tx.insert_station("Suwon")?.id, tx.insert_station("Seoul")?.id))
            })
            .unwrap()
    }

    fn new_line(name: &str, initial: Option<InitialSegment>) -> NewLine {
        NewLine {
            name: name.to_owned(),
            color: "bg-red-600".to_owned(),
            initial,
        }
    }

    #[test]
    fn test_save_line_with_initial_segment() {
        let store = Arc::new(SqliteStore::in_memory().unwrap());
        let (up, down) = stations(store.as_ref());
        let service = LineService::new(Arc::clone(&store));

        let line = service
            .save_line(new_line(
                "Line 1",
                Some(InitialSegment {
                    up,
                    down,
                    distance: Distance::new(10).unwrap(),
                }),
            ))
            .unwrap();

        let view = LineTopologyService::new(store).find_line(line.id).unwrap();
        let names: Vec<_> = view.stations.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Suwon", "Seoul"]);
        assert_eq!(view.total_distance, 10);
    }

    #[test]
    fn test_save_line_rejects_duplicates_and_bad_input() {
        let store = Arc::new(MemoryStore::new());
        let (up, _) = stations(store.as_ref());
        let service = LineService::new(Arc::clone(&store));

        service.save_line(new_line("Line 1", None)).unwrap();
        assert!(matches!(
            service.save_line(new_line("Line 1", None)),
            Err(ServiceError::DuplicateLineName(_))
        ));
        assert!(matches!(
            service.save_line(new_line("  ", None)),
            Err(ServiceError::InvalidInput(_))
        ));

        let self_loop = InitialSegment {
            up,
            down: up,
            distance: Distance::new(3).unwrap(),
        };
        assert!(matches!(
            service.save_line(new_line("Line 2", Some(self_loop))),
            Err(ServiceError::Topology(TopologyError::SelfLoop(_)))
        ));

        let unknown = InitialSegment {
            up,
            down: StationIdentifier::new(404),
            distance: Distance::new(3).unwrap(),
        };
        assert!(matches!(
            service.save_line(new_line("Line 2", Some(unknown))),
            Err(ServiceError::StationNotFound(_))
        ));

        // Only the first line made it
        assert_eq!(service.find_lines().unwrap().len(), 1);
    }

    #[test]
    fn test_update_line() {
        let service = LineService::new(Arc::new(MemoryStore::new()));
        let first = service.save_line(new_line("Line 1", None)).unwrap();
        service.save_line(new_line("Line 2", None)).unwrap();

        let renamed = service.update_line(first.id, "Line 1A", "bg-blue-600").unwrap();
        assert_eq!(service.find_line(first.id).unwrap(), renamed);

        // Keeping its own name is fine, taking another line's is not
        assert!(service.update_line(first.id, "Line 1A", "bg-blue-700").is_ok());
        assert!(matches!(
            service.update_line(first.id, "Line 2", "bg-blue-600"),
            Err(ServiceError::DuplicateLineName(_))
        ));
        assert!(matches!(
            service.update_line(LineIdentifier::new(99), "Line 9", "x"),
            Err(ServiceError::LineNotFound(_))
        ));
    }

    #[test]
    fn test_delete_line() {
        let service = LineService::new(Arc::new(SqliteStore::in_memory().unwrap()));
        let line = service.save_line(new_line("Line 1", None)).unwrap();

        service.delete_line(line.id).unwrap();
        assert!(matches!(
            service.find_line(line.id),
            Err(ServiceError::LineNotFound(_))
        ));
        assert!(matches!(
            service.delete_line(line.id),
            Err(ServiceError::LineNotFound(_))
        ));
    }
}
