//! Nominatim backend (OpenStreetMap)
//!
//! Serves two roles: free-text geocoding for search, and polygon outlines for
//! building the zone registry.
//! Rate limit: 1 request per second (enforced by User-Agent requirement)

use crate::config::UpstreamConfig;
use crate::error::{Error, Result};
use crate::geo::polygon::Ring;
use crate::geo::{BoundingBox, Coordinates};
use crate::search::{GeocodedPlace, Geocoder};
use crate::zone::boundary::{BoundarySource, Geometry};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Nominatim geocoding backend
#[derive(Debug, Clone)]
pub struct NominatimClient {
    client: reqwest::Client,
    base_url: String,
}

/// Address breakdown (`addressdetails=1`)
#[derive(Debug, Default, Deserialize)]
struct NominatimAddress {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    state: Option<String>,
}

/// Nominatim search response item (`format=jsonv2`)
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    display_name: String,
    #[serde(default)]
    category: Option<String>,
    #[serde(rename = "type", default)]
    place_type: Option<String>,
    #[serde(default)]
    address: Option<NominatimAddress>,
    #[serde(default)]
    geojson: Option<Geometry>,
}

impl NominatimClient {
    /// Create a client from upstream settings
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.nominatim_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.nominatim_url.trim_end_matches('/').to_string(),
        })
    }

    /// Parse lat/lon strings to f64
    fn parse_coords(lat: &str, lon: &str) -> Result<Coordinates> {
        let lat: f64 = lat
            .parse()
            .map_err(|_| Error::UpstreamMalformed(format!("Invalid latitude from Nominatim: {}", lat)))?;
        let lon: f64 = lon
            .parse()
            .map_err(|_| Error::UpstreamMalformed(format!("Invalid longitude from Nominatim: {}", lon)))?;
        Ok(Coordinates::new(lat, lon))
    }

    /// Short description from category, type and address
    fn format_description(place: &NominatimPlace) -> String {
        let mut parts = Vec::new();

        if let Some(category) = place.category.as_deref().filter(|c| !c.is_empty()) {
            parts.push(format!("Category: {}", category));
        }
        if let Some(place_type) = place.place_type.as_deref().filter(|t| !t.is_empty()) {
            parts.push(format!("Type: {}", place_type));
        }
        if let Some(address) = &place.address {
            let city = address
                .city
                .as_ref()
                .or(address.town.as_ref())
                .or(address.village.as_ref());
            if let Some(city) = city {
                parts.push(format!("City: {}", city));
            }
            if let Some(state) = &address.state {
                parts.push(format!("State: {}", state));
            }
        }

        if parts.is_empty() {
            "Location found".to_string()
        } else {
            parts.join(" | ")
        }
    }

    /// Run a `/search` request with extra query parameters
    async fn search(&self, params: &[(&str, String)]) -> Result<Vec<NominatimPlace>> {
        let url = format!("{}/search", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("format", "jsonv2")])
            .query(params)
            .send()
            .await
            .map_err(|e| Error::Upstream(format!("Nominatim request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Upstream(format!(
                "Nominatim returned status: {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::Upstream(format!("Failed to read Nominatim response: {}", e)))?;

        serde_json::from_str(&body).map_err(|e| Error::malformed("Nominatim", e, &body))
    }
}

impl Geocoder for NominatimClient {
    async fn geocode(
        &self,
        query: &str,
        origin: Coordinates,
        radius_km: f64,
        limit: usize,
    ) -> Result<Vec<GeocodedPlace>> {
        let viewbox = BoundingBox::around(origin, radius_km).to_viewbox();
        let params = [
            ("q", query.to_string()),
            ("limit", limit.to_string()),
            ("addressdetails", "1".to_string()),
            ("viewbox", viewbox),
            ("bounded", "1".to_string()),
        ];

        let places = self.search(&params).await?;
        debug!(query = %query, count = places.len(), "Nominatim returned places");

        places
            .iter()
            .map(|place| {
                Ok(GeocodedPlace {
                    name: place.display_name.clone(),
                    coordinates: Self::parse_coords(&place.lat, &place.lon)?,
                    description: Self::format_description(place),
                })
            })
            .collect()
    }
}

impl BoundarySource for NominatimClient {
    async fn boundary(&self, place: &str) -> Result<Option<Vec<Ring>>> {
        let params = [
            ("q", place.to_string()),
            ("limit", "1".to_string()),
            ("polygon_geojson", "1".to_string()),
        ];

        let places = self.search(&params).await?;

        Ok(places
            .into_iter()
            .next()
            .and_then(|p| p.geojson)
            .and_then(Geometry::into_rings))
    }
}
