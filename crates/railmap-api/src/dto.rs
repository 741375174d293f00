use railmap_core::{LineId, NetworkError, StationId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One station record as delivered by `GET /network`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawStation {
    pub id: StationId,
    /// Aggregate traffic, e.g. trains per day.
    pub value: f64,
    pub lines: Vec<LineId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawLink {
    pub source: StationId,
    pub target: StationId,
    pub line: LineId,
}

/// Records dropped during validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadReport {
    pub rejected_nodes: usize,
    pub rejected_links: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawNetwork {
    pub nodes: Vec<RawStation>,
    pub links: Vec<RawLink>,
    #[serde(skip)]
    pub report: PayloadReport,
}

impl RawNetwork {
    pub fn from_json_str(text: &str) -> Result<Self, NetworkError> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| NetworkError::Decode(e.to_string()))?;
        Self::from_value(&value)
    }

    /// Validate a decoded payload.
    ///
    /// A missing `nodes` or `links` collection rejects the whole payload. Individual
    /// records that do not match the schema (e.g. a station without `lines`) are
    /// skipped and counted in [`PayloadReport`].
    pub fn from_value(value: &Value) -> Result<Self, NetworkError> {
        let nodes = value
            .get("nodes")
            .and_then(Value::as_array)
            .ok_or(NetworkError::MissingCollection("nodes"))?;
        let links = value
            .get("links")
            .and_then(Value::as_array)
            .ok_or(NetworkError::MissingCollection("links"))?;

        let mut report = PayloadReport::default();

        let nodes: Vec<RawStation> = nodes
            .iter()
            .filter_map(|record| match serde_json::from_value::<RawStation>(record.clone()) {
                Ok(station) if station.value.is_finite() && station.value >= 0.0 => Some(station),
                Ok(station) => {
                    tracing::warn!(
                        "Rejecting station {} with invalid traffic value {}",
                        station.id,
                        station.value
                    );
                    report.rejected_nodes += 1;
                    None
                }
                Err(e) => {
                    tracing::warn!("Rejecting malformed station record: {}", e);
                    report.rejected_nodes += 1;
                    None
                }
            })
            .collect();

        let links: Vec<RawLink> = links
            .iter()
            .filter_map(|record| match serde_json::from_value::<RawLink>(record.clone()) {
                Ok(link) => Some(link),
                Err(e) => {
                    tracing::warn!("Rejecting malformed link record: {}", e);
                    report.rejected_links += 1;
                    None
                }
            })
            .collect();

        Ok(Self {
            nodes,
            links,
            report,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parses_well_formed_payload() {
        let payload = json!({
            "nodes": [
                { "id": "A", "value": 100, "lines": ["S1"] },
                { "id": "B", "value": 2000.0, "lines": ["S1", "S2", "S3"] }
            ],
            "links": [ { "source": "A", "target": "B", "line": "S1" } ]
        });

        let network = RawNetwork::from_value(&payload).unwrap();
        assert_eq!(network.nodes.len(), 2);
        assert_eq!(network.links.len(), 1);
        assert_eq!(network.nodes[1].lines.len(), 3);
        assert_eq!(network.report, PayloadReport::default());
    }

    #[test]
    fn test_missing_collections_are_rejected() {
        let no_nodes = json!({ "links": [] });
        assert_eq!(
            RawNetwork::from_value(&no_nodes),
            Err(NetworkError::MissingCollection("nodes"))
        );

        let no_links = json!({ "nodes": [] });
        assert_eq!(
            RawNetwork::from_value(&no_links),
            Err(NetworkError::MissingCollection("links"))
        );

        let wrong_type = json!({ "nodes": {}, "links": [] });
        assert!(RawNetwork::from_value(&wrong_type).is_err());
    }

    #[test]
    fn test_station_without_lines_is_skipped_and_counted() {
        let payload = json!({
            "nodes": [
                { "id": "A", "value": 100 },
                { "id": "B", "value": -5, "lines": ["S1"] },
                { "id": "C", "value": 300, "lines": [] }
            ],
            "links": [ { "source": "A", "target": "C" } ]
        });

        let network = RawNetwork::from_value(&payload).unwrap();
        assert_eq!(network.nodes.len(), 1);
        assert_eq!(network.nodes[0].id.as_str(), "C");
        assert_eq!(network.report.rejected_nodes, 2);
        assert_eq!(network.report.rejected_links, 1);
    }

    #[test]
    fn test_invalid_json_is_a_decode_error() {
        let err = RawNetwork::from_json_str("{ nodes: ").unwrap_err();
        assert!(err.is_malformed());
    }
}
