use axum::{
    Json, Router,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{delete, get, post},
};
use subway_api_types::{
    AddStationRequest, LineRequest, LineResponse, LineWithStationsResponse, StationResponse,
};
use subway_core::repository::{LineRecord, Store};
use subway_core::service::{InitialSegment, LineView, NewLine};
use subway_transit::{Distance, LineIdentifier, StationIdentifier};

use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::state::{AppState, blocking};

pub fn router<S: Store + 'static>() -> Router<AppState<S>> {
    Router::new()
        .route("/lines", get(list_lines::<S>).post(create_line::<S>))
        .route(
            "/lines/{id}",
            get(get_line::<S>)
                .put(update_line::<S>)
                .delete(delete_line::<S>),
        )
        .route("/lines/{id}/stations", post(add_station::<S>))
        .route(
            "/lines/{id}/stations/{station_id}",
            delete(remove_station::<S>),
        )
}

fn line_response(line: LineRecord) -> LineResponse {
    LineResponse {
        id: line.id.value(),
        name: line.name,
        color: line.color,
    }
}

fn line_with_stations(view: LineView) -> LineWithStationsResponse {
    LineWithStationsResponse {
        id: view.line.id.value(),
        name: view.line.name,
        color: view.line.color,
        stations: view.stations.into_iter().map(StationResponse::from).collect(),
        total_distance: view.total_distance,
    }
}

fn initial_segment(request: &LineRequest) -> Result<Option<InitialSegment>, ApiError> {
    match (request.up_station_id, request.down_station_id, request.distance) {
        (None, None, None) => Ok(None),
        (Some(up), Some(down), Some(distance)) => Ok(Some(InitialSegment {
            up: StationIdentifier::new(up),
            down: StationIdentifier::new(down),
            distance: Distance::new(distance)?,
        })),
        _ => Err(ApiError::BadRequest(
            "upStationId, downStationId and distance must be given together".to_owned(),
        )),
    }
}

async fn create_line<S: Store + 'static>(
    State(state): State<AppState<S>>,
    ApiJson(request): ApiJson<LineRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let new_line = NewLine {
        initial: initial_segment(&request)?,
        name: request.name,
        color: request.color,
    };
    let lines = state.lines;
    let line = blocking(move || lines.save_line(new_line)).await?;

    let location = format!("/lines/{}", line.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(line_response(line)),
    ))
}

async fn list_lines<S: Store + 'static>(
    State(state): State<AppState<S>>,
) -> Result<Json<Vec<LineWithStationsResponse>>, ApiError> {
    let topology = state.topology;
    let views = blocking(move || topology.find_lines()).await?;
    Ok(Json(views.into_iter().map(line_with_stations).collect()))
}

async fn get_line<S: Store + 'static>(
    State(state): State<AppState<S>>,
    Path(id): Path<i64>,
) -> Result<Json<LineWithStationsResponse>, ApiError> {
    let topology = state.topology;
    let view = blocking(move || topology.find_line(LineIdentifier::new(id))).await?;
    Ok(Json(line_with_stations(view)))
}

async fn update_line<S: Store + 'static>(
    State(state): State<AppState<S>>,
    Path(id): Path<i64>,
    ApiJson(request): ApiJson<LineRequest>,
) -> Result<Json<LineResponse>, ApiError> {
    let lines = state.lines;
    let line = blocking(move || {
        lines.update_line(LineIdentifier::new(id), &request.name, &request.color)
    })
    .await?;
    Ok(Json(line_response(line)))
}

async fn delete_line<S: Store + 'static>(
    State(state): State<AppState<S>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let lines = state.lines;
    blocking(move || lines.delete_line(LineIdentifier::new(id))).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn add_station<S: Store + 'static>(
    State(state): State<AppState<S>>,
    Path(id): Path<i64>,
    ApiJson(request): ApiJson<AddStationRequest>,
) -> Result<StatusCode, ApiError> {
    let line = LineIdentifier::new(id);
    let new = StationIdentifier::new(request.add_station_id);
    let topology = state.topology;

    match request.target_station_id {
        None => {
            blocking(move || topology.register_first_station(line, new)).await?;
        }
        Some(target) => {
            let (Some(distance), Some(direction)) = (request.distance, request.direction) else {
                return Err(ApiError::BadRequest(
                    "distance and direction are required with targetStationId".to_owned(),
                ));
            };
            let distance = Distance::new(distance)?;
            let target = StationIdentifier::new(target);
            blocking(move || topology.add_station(line, target, new, distance, direction)).await?;
        }
    }
    Ok(StatusCode::OK)
}

async fn remove_station<S: Store + 'static>(
    State(state): State<AppState<S>>,
    Path((id, station_id)): Path<(i64, i64)>,
) -> Result<StatusCode, ApiError> {
    let topology = state.topology;
    blocking(move || {
        topology.remove_station(LineIdentifier::new(id), StationIdentifier::new(station_id))
    })
    .await?;
    Ok(StatusCode::NO_CONTENT)
}
