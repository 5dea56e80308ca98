use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::DashboardError;

// ===== IDENTIFIERS =====

/// Id shared by a table row, its map marker and its shuffleable fields' owner.
/// Ex: `"Loco 1001"`, `"Base1"`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for EntityId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for EntityId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// What a marker stands for. Only locomotive info-windows are gated by selection.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EntityKind {
    Locomotive,
    Base,
    #[default]
    #[serde(other)]
    Other,
}

impl EntityKind {
    pub fn is_locomotive(self) -> bool {
        self == Self::Locomotive
    }
}

// ===== SNAPSHOT =====

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MarkerDescriptor {
    pub id: EntityId,
    #[serde(flatten)]
    pub position: LatLng,
    pub icon_ref: String,
    #[serde(default)]
    pub info_content: String,
    #[serde(default)]
    pub kind: EntityKind,
    /// Degrees clockwise from north.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<f64>,
}

/// One fetched payload: the full current state, never a delta.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub table_fragment: String,
    #[serde(default)]
    pub field_values: BTreeMap<String, String>,
    #[serde(default)]
    pub markers: Vec<MarkerDescriptor>,
    #[serde(default)]
    pub connection_lines: Vec<Vec<LatLng>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ContentResponse {
    Content(Snapshot),
    Status(String),
}

impl Snapshot {
    /// Decode the content endpoint's response body.
    ///
    /// The endpoint answers the bare JSON string `"error"` when it is up but
    /// could not build content.
    pub fn from_response_text(text: &str) -> Result<Self, DashboardError> {
        match serde_json::from_str::<ContentResponse>(text) {
            Ok(ContentResponse::Content(snapshot)) => Ok(snapshot),
            Ok(ContentResponse::Status(status)) if status == "error" => {
                Err(DashboardError::ServerReportedError)
            }
            Ok(ContentResponse::Status(status)) => Err(DashboardError::MalformedSnapshot(
                format!("unexpected status payload '{}'", status),
            )),
            Err(error) => Err(DashboardError::MalformedSnapshot(error.to_string())),
        }
    }

    pub fn marker(&self, id: &str) -> Option<&MarkerDescriptor> {
        self.markers.iter().find(|marker| marker.id.as_str() == id)
    }
}

// ===== REQUEST BODIES =====

/// Body of the content endpoint request.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContentRequest {
    pub selected_entity_id: Option<EntityId>,
}

/// Body of the fire-and-forget session variable push.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SessionVar {
    pub key: String,
    pub value: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNAPSHOT_JSON: &str = r#"{
        "tableFragment": "<table><tr id=\"Loco 1001\"><td id=\"Loco 1001_speed\" class=\"shuffleable\">40</td></tr></table>",
        "fieldValues": {"Loco 1001_speed": "40"},
        "markers": [
            {"id": "Loco 1001", "lat": 61.2, "lng": -149.9, "iconRef": "/static/img/loco.png",
             "infoContent": "<b>Loco 1001</b>", "kind": "Locomotive", "heading": 90.0},
            {"id": "Base1", "lat": 61.3, "lng": -149.8, "iconRef": "/static/img/base.png",
             "infoContent": "<b>Base1</b>", "kind": "Base"}
        ],
        "connectionLines": [[{"lat": 61.2, "lng": -149.9}, {"lat": 61.3, "lng": -149.8}]]
    }"#;

    #[test]
    fn decodes_full_snapshot() {
        let snapshot = Snapshot::from_response_text(SNAPSHOT_JSON).unwrap();

        assert_eq!(snapshot.markers.len(), 2);
        assert_eq!(snapshot.markers[0].kind, EntityKind::Locomotive);
        assert_eq!(snapshot.markers[0].heading, Some(90.0));
        assert_eq!(snapshot.markers[1].heading, None);
        assert_eq!(snapshot.markers[1].position, LatLng::new(61.3, -149.8));
        assert_eq!(snapshot.field_values["Loco 1001_speed"], "40");
        assert_eq!(snapshot.connection_lines[0].len(), 2);
        assert!(snapshot.marker("Base1").is_some());
    }

    #[test]
    fn error_literal_is_server_reported() {
        assert_eq!(
            Snapshot::from_response_text(r#""error""#),
            Err(DashboardError::ServerReportedError)
        );
    }

    #[test]
    fn garbage_is_malformed() {
        assert!(matches!(
            Snapshot::from_response_text("<html>502</html>"),
            Err(DashboardError::MalformedSnapshot(_))
        ));
        assert!(matches!(
            Snapshot::from_response_text(r#""maintenance""#),
            Err(DashboardError::MalformedSnapshot(_))
        ));
    }

    #[test]
    fn unknown_kind_falls_back_to_other() {
        let json = r#"{"id": "Wayside7", "lat": 1.0, "lng": 2.0, "iconRef": "w.png", "kind": "Wayside"}"#;
        let marker: MarkerDescriptor = serde_json::from_str(json).unwrap();

        assert_eq!(marker.kind, EntityKind::Other);
        assert_eq!(marker.info_content, "");
    }

    #[test]
    fn content_request_sends_null_without_selection() {
        let body = serde_json::to_string(&ContentRequest::default()).unwrap();
        assert_eq!(body, r#"{"selectedEntityId":null}"#);

        let body = serde_json::to_string(&ContentRequest {
            selected_entity_id: Some("Loco 1001".into()),
        })
        .unwrap();
        assert_eq!(body, r#"{"selectedEntityId":"Loco 1001"}"#);
    }
}
