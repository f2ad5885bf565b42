use axum::Router;
use axum::routing::get;
use subway_core::repository::Store;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub mod lines;
pub mod stations;

pub fn create_router<S: Store + 'static>(state: AppState<S>) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(stations::router::<S>())
        .merge(lines::router::<S>())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}
