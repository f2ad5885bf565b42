use axum::{
    Json, Router,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::get,
};
use subway_api_types::{StationRequest, StationResponse};
use subway_core::repository::Store;
use subway_transit::StationIdentifier;

use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::state::{AppState, blocking};

pub fn router<S: Store + 'static>() -> Router<AppState<S>> {
    Router::new()
        .route("/stations", get(list_stations::<S>).post(create_station::<S>))
        .route(
            "/stations/{id}",
            get(get_station::<S>)
                .put(update_station::<S>)
                .delete(delete_station::<S>),
        )
}

async fn create_station<S: Store + 'static>(
    State(state): State<AppState<S>>,
    ApiJson(request): ApiJson<StationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let stations = state.stations;
    let station = blocking(move || stations.save_station(&request.name)).await?;

    let location = format!("/stations/{}", station.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(StationResponse::from(station)),
    ))
}

async fn list_stations<S: Store + 'static>(
    State(state): State<AppState<S>>,
) -> Result<Json<Vec<StationResponse>>, ApiError> {
    let stations = state.stations;
    let all = blocking(move || stations.find_stations()).await?;
    Ok(Json(all.into_iter().map(StationResponse::from).collect()))
}

async fn get_station<S: Store + 'static>(
    State(state): State<AppState<S>>,
    Path(id): Path<i64>,
) -> Result<Json<StationResponse>, ApiError> {
    let stations = state.stations;
    let station = blocking(move || stations.find_station(StationIdentifier::new(id))).await?;
    Ok(Json(station.into()))
}

async fn update_station<S: Store + 'static>(
    State(state): State<AppState<S>>,
    Path(id): Path<i64>,
    ApiJson(request): ApiJson<StationRequest>,
) -> Result<Json<StationResponse>, ApiError> {
    let stations = state.stations;
    let station = blocking(move || {
        stations.update_station(StationIdentifier::new(id), &request.name)
    })
    .await?;
    Ok(Json(station.into()))
}

async fn delete_station<S: Store + 'static>(
    State(state): State<AppState<S>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let stations = state.stations;
    blocking(move || stations.delete_station(StationIdentifier::new(id))).await?;
    Ok(StatusCode::NO_CONTENT)
}
