use std::sync::Arc;

use subway_core::repository::Store;
use subway_core::service::{LineService, LineTopologyService, StationService};

use crate::error::ApiError;

/// Services shared by every handler.
pub struct AppState<S> {
    pub lines: LineService<S>,
    pub stations: StationService<S>,
    pub topology: LineTopologyService<S>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            lines: self.lines.clone(),
            stations: self.stations.clone(),
            topology: self.topology.clone(),
        }
    }
}

impl<S: Store> AppState<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            lines: LineService::new(Arc::clone(&store)),
            stations: StationService::new(Arc::clone(&store)),
            topology: LineTopologyService::new(store),
        }
    }
}

/// Runs store work off the async runtime.
pub async fn blocking<T, F>(work: F) -> Result<T, ApiError>
where
    F: FnOnce() -> subway_core::Result<T> + Send + 'static,
    T: Send + 'static,
{
    Ok(tokio::task::spawn_blocking(work).await??)
}
