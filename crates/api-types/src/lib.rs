//! Request and response payloads of the subway HTTP API.
//!
//! All payloads are camelCase JSON.

use serde::{Deserialize, Serialize};
use subway_transit::{Direction, Station};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationRequest {
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationResponse {
    pub id: i64,
    pub name: String,
}

impl From<Station> for StationResponse {
    fn from(station: Station) -> Self {
        Self {
            id: station.id.value(),
            name: station.name,
        }
    }
}

/// Creates a line, or renames/recolors one on update.
///
/// The station fields only matter on creation: when all three are present
/// the line starts out with that segment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineRequest {
    pub name: String,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub up_station_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub down_station_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<i64>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineResponse {
    pub id: i64,
    pub name: String,
    pub color: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineWithStationsResponse {
    pub id: i64,
    pub name: String,
    pub color: String,
    /// Head to tail
    pub stations: Vec<StationResponse>,
    pub total_distance: u64,
}

/// Inserts `addStationId` next to `targetStationId`.
///
/// Without a target the station becomes the first one of an empty line and
/// `distance`/`direction` may be omitted; otherwise both are required.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddStationRequest {
    #[serde(default)]
    pub target_station_id: Option<i64>,
    pub add_station_id: i64,
    #[serde(default)]
    pub distance: Option<i64>,
    #[serde(default)]
    pub direction: Option<Direction>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use subway_transit::StationIdentifier;

    #[test]
    fn test_add_station_request_shape() {
        let request: AddStationRequest = serde_json::from_str(
            r#"{"targetStationId": 2, "addStationId": 4, "distance": 2, "direction": "DOWN"}"#,
        )
        .unwrap();

        assert_eq!(request.target_station_id, Some(2));
        assert_eq!(request.add_station_id, 4);
        assert_eq!(request.distance, Some(2));
        assert_eq!(request.direction, Some(Direction::Down));
    }

    #[test]
    fn test_first_station_request_defaults() {
        let request: AddStationRequest =
            serde_json::from_str(r#"{"addStationId": 1}"#).unwrap();

        assert_eq!(request.target_station_id, None);
        assert_eq!(request.distance, None);
        assert_eq!(request.direction, None);
    }

    #[test]
    fn test_line_request_optional_segment() {
        let request: LineRequest =
            serde_json::from_str(r#"{"name": "Line 2", "color": "bg-green-600"}"#).unwrap();
        assert_eq!(request.up_station_id, None);

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json, serde_json::json!({"name": "Line 2", "color": "bg-green-600"}));
    }

    #[test]
    fn test_line_with_stations_response_json() {
        let response = LineWithStationsResponse {
            id: 1,
            name: "Line 2".into(),
            color: "bg-green-600".into(),
            stations: vec![Station::new(StationIdentifier::new(3), "Gangnam").into()],
            total_distance: 10,
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["totalDistance"], 10);
        assert_eq!(json["stations"][0]["name"], "Gangnam");
    }
}
