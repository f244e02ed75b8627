//! Overpass API backend (OpenStreetMap)
//!
//! Sends Overpass QL queries and parses the JSON element list.

use crate::config::UpstreamConfig;
use crate::error::{snippet, Error, Result};
use crate::geo::Coordinates;
use crate::poi::Tags;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

/// OSM element kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Node,
    Way,
    Relation,
    #[serde(other)]
    Other,
}

/// Centroid attached to ways and relations by `out center`
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Center {
    pub lat: f64,
    pub lon: f64,
}

/// One element of an Overpass response
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OverpassElement {
    #[serde(rename = "type")]
    pub kind: ElementKind,
    pub id: i64,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(default)]
    pub center: Option<Center>,
    #[serde(default)]
    pub tags: Tags,
}

impl OverpassElement {
    /// Node coordinates, or the centroid for ways and relations
    pub fn position(&self) -> Option<Coordinates> {
        match self.kind {
            ElementKind::Node => match (self.lat, self.lon) {
                (Some(lat), Some(lon)) => Some(Coordinates::new(lat, lon)),
                _ => None,
            },
            ElementKind::Way | ElementKind::Relation => {
                self.center.map(|c| Coordinates::new(c.lat, c.lon))
            }
            ElementKind::Other => None,
        }
    }
}

/// Overpass response envelope
#[derive(Debug, Deserialize)]
struct OverpassResponse {
    elements: Vec<OverpassElement>,
}

/// Parse an Overpass JSON body
pub fn parse_elements(body: &str) -> Result<Vec<OverpassElement>> {
    serde_json::from_str::<OverpassResponse>(body)
        .map(|r| r.elements)
        .map_err(|e| Error::malformed("Overpass", e, body))
}

/// Trait for POI data sources that answer Overpass QL
///
/// Implementations must be thread-safe (Send + Sync) to work with async server.
pub trait PoiSource: Send + Sync {
    /// Run a query and return the raw elements
    fn fetch(&self, query: &str) -> impl std::future::Future<Output = Result<Vec<OverpassElement>>> + Send;
}

/// Overpass API client
#[derive(Debug, Clone)]
pub struct OverpassClient {
    client: reqwest::Client,
    url: String,
}

impl OverpassClient {
    /// Create a client from upstream settings
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.overpass_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            url: config.overpass_url.clone(),
        })
    }

    /// Interpreter URL this client posts to
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl PoiSource for OverpassClient {
    async fn fetch(&self, query: &str) -> Result<Vec<OverpassElement>> {
        debug!(query = %query, "Sending Overpass query");

        let response = self
            .client
            .post(&self.url)
            .form(&[("data", query)])
            .send()
            .await
            .map_err(|e| Error::Upstream(format!("Overpass request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Upstream(format!("Failed to read Overpass response: {}", e)))?;

        if !status.is_success() {
            warn!(%status, body = snippet(&body), "Overpass returned an error status");
            return Err(Error::Upstream(format!("Overpass returned status: {}", status)));
        }

        let elements = parse_elements(&body)?;
        debug!(count = elements.len(), "Overpass returned elements");
        Ok(elements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nodes_and_ways() {
        let body = r#"{
            "version": 0.6,
            "elements": [
                {"type": "node", "id": 1, "lat": 34.1, "lon": -118.3, "tags": {"amenity": "restaurant"}},
                {"type": "way", "id": 2, "center": {"lat": 34.09, "lon": -118.33}, "tags": {"amenity": "pub"}},
                {"type": "relation", "id": 3, "tags": {"tourism": "museum"}},
                {"type": "area", "id": 4}
            ]
        }"#;

        let elements = parse_elements(body).unwrap();
        assert_eq!(elements.len(), 4);
        assert_eq!(elements[0].position(), Some(Coordinates::new(34.1, -118.3)));
        assert_eq!(elements[1].position(), Some(Coordinates::new(34.09, -118.33)));
        assert_eq!(elements[2].position(), None);
        assert_eq!(elements[3].kind, ElementKind::Other);
        assert!(elements[3].tags.is_empty());
    }

    #[test]
    fn test_parse_malformed() {
        let err = parse_elements("<html>rate limited</html>").unwrap_err();
        assert!(matches!(err, Error::UpstreamMalformed(_)));
        assert!(err.to_string().contains("rate limited"));

        let err = parse_elements(r#"{"remark": "runtime error"}"#).unwrap_err();
        assert!(matches!(err, Error::UpstreamMalformed(_)));
    }

    #[test]
    fn test_client_uses_configured_url() {
        let mut config = UpstreamConfig::default();
        config.overpass_url = "http://localhost:9999/api/interpreter".to_string();
        let client = OverpassClient::new(&config).unwrap();
        assert_eq!(client.url(), "http://localhost:9999/api/interpreter");
    }
}
