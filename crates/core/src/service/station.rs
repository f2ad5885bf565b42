use std::sync::Arc;

use subway_transit::{Station, StationIdentifier};
use tracing::info;

use crate::error::{Result, ServiceError};
use crate::repository::{StationRepository, Store};

/// The station registry lines refer to by id.
pub struct StationService<S> {
    store: Arc<S>,
}

impl<S> Clone for StationService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: Store> StationService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn save_station(&self, name: &str) -> Result<Station> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ServiceError::InvalidInput("name must not be blank".to_owned()));
        }

        self.store.unit_of_work(|tx| {
            if tx.find_station_by_name(name)?.is_some() {
                return Err(ServiceError::DuplicateStationName(name.to_owned()));
            }
            let station = tx.insert_station(name)?;
            info!(station = %station.id, name, "registered station");
            Ok(station)
        })
    }

    pub fn find_station(&self, id: StationIdentifier) -> Result<Station> {
        self.store
            .unit_of_work(|tx| tx.find_station(id)?.ok_or(ServiceError::StationNotFound(id)))
    }

    pub fn find_stations(&self) -> Result<Vec<Station>> {
        Ok(self.store.unit_of_work(|tx| tx.find_stations())?)
    }

    /// Renames a station. Lines keep referring to it by id.
    pub fn update_station(&self, id: StationIdentifier, name: &str) -> Result<Station> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ServiceError::InvalidInput("name must not be blank".to_owned()));
        }

        self.store.unit_of_work(|tx| {
            if let Some(other) = tx.find_station_by_name(name)? {
                if other.id != id {
                    return Err(ServiceError::DuplicateStationName(name.to_owned()));
                }
            }

            let station = Station::new(id, name);
            if !tx.update_station(&station)? {
                return Err(ServiceError::StationNotFound(id));
            }
            info!(station = %id, name, "renamed station");
            Ok(station)
        })
    }

    /// Stations still referenced by a line cannot be deleted.
    pub fn delete_station(&self, id: StationIdentifier) -> Result<()> {
        self.store.unit_of_work(|tx| {
            if tx.is_station_in_use(id)? {
                return Err(ServiceError::StationInUse(id));
            }
            if !tx.delete_station(id)? {
                return Err(ServiceError::StationNotFound(id));
            }
            info!(station = %id, "deleted station");
            Ok(())
        })
    }
}
