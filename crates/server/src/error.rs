use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use subway_api_types::ErrorResponse;
use subway_core::ServiceError;
use subway_transit::TopologyError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error("Bad Request: {0}")]
    BadRequest(String),
    #[error("background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<TopologyError> for ApiError {
    fn from(err: TopologyError) -> Self {
        ApiError::Service(ServiceError::Topology(err))
    }
}

impl ApiError {
    fn status_and_kind(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Service(err) => match err {
                ServiceError::Topology(topology) => match topology {
                    TopologyError::InvalidDistance(_) => (StatusCode::BAD_REQUEST, "InvalidDistance"),
                    TopologyError::SelfLoop(_) => (StatusCode::BAD_REQUEST, "SelfLoop"),
                    TopologyError::StationNotFound(_) => (StatusCode::NOT_FOUND, "StationNotFound"),
                    TopologyError::StationAlreadyRegistered(_) => {
                        (StatusCode::BAD_REQUEST, "StationAlreadyRegistered")
                    }
                    TopologyError::DisconnectedTopology { .. } => {
                        (StatusCode::INTERNAL_SERVER_ERROR, "DisconnectedTopology")
                    }
                    TopologyError::LastStationRemovalForbidden(_) => {
                        (StatusCode::BAD_REQUEST, "LastStationRemovalForbidden")
                    }
                    TopologyError::TopologyAlreadyStarted(_) => {
                        (StatusCode::BAD_REQUEST, "TopologyAlreadyStarted")
                    }
                },
                ServiceError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "StorageError"),
                ServiceError::LineNotFound(_) => (StatusCode::NOT_FOUND, "LineNotFound"),
                ServiceError::StationNotFound(_) => (StatusCode::NOT_FOUND, "StationNotFound"),
                ServiceError::DuplicateLineName(_) => (StatusCode::BAD_REQUEST, "DuplicateLineName"),
                ServiceError::DuplicateStationName(_) => {
                    (StatusCode::BAD_REQUEST, "DuplicateStationName")
                }
                ServiceError::StationInUse(_) => (StatusCode::CONFLICT, "StationInUse"),
                ServiceError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "InvalidInput"),
            },
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BadRequest"),
            ApiError::Join(_) => (StatusCode::INTERNAL_SERVER_ERROR, "InternalError"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status_code, error_type) = self.status_and_kind();

        // Internal details stay in the logs
        let message = if status_code.is_server_error() {
            tracing::error!(error = ?self, kind = error_type, "request failed");
            "An internal error occurred".to_owned()
        } else {
            self.to_string()
        };

        let body = ErrorResponse {
            error: error_type.to_owned(),
            message,
        };
        (status_code, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use subway_core::transit::StationIdentifier;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                ApiError::from(TopologyError::InvalidDistance(3)),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::from(TopologyError::StationNotFound(StationIdentifier::new(1))),
                StatusCode::NOT_FOUND,
            ),
            (
                ApiError::from(TopologyError::DisconnectedTopology { visited: 1, expected: 2 }),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ApiError::from(ServiceError::StationInUse(StationIdentifier::new(1))),
                StatusCode::CONFLICT,
            ),
            (
                ApiError::BadRequest("missing distance".into()),
                StatusCode::BAD_REQUEST,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
