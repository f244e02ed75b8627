//! Free-text place search
//!
//! Queries two independent backends concurrently (a tag search against
//! Overpass, used only when the text names a known kind of place, and a
//! general geocoder), normalizes both into `SearchResult`, drops near
//! duplicates, and returns the nearest results first.

pub mod keywords;

use crate::constants::search::DEDUP_THRESHOLD_KM;
use crate::error::{Error, Result};
use crate::geo::{distance_km, km_to_miles, nearest, round2, Coordinates, Located};
use crate::poi::overpass::PoiSource;
use crate::poi::query::around_query;
use crate::poi::{PlaceDetails, TagMatcher};
use keywords::keyword_matcher;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Backend that produced a search result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultSource {
    Overpass,
    Nominatim,
}

impl std::fmt::Display for ResultSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Overpass => write!(f, "overpass"),
            Self::Nominatim => write!(f, "nominatim"),
        }
    }
}

/// A ranked search hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub description: String,
    pub distance_km: f64,
    pub distance_miles: f64,
    pub source: ResultSource,
}

impl SearchResult {
    /// Normalize a hit, measuring its distance from `origin`
    pub fn new(
        name: impl Into<String>,
        position: Coordinates,
        description: impl Into<String>,
        origin: Coordinates,
        source: ResultSource,
    ) -> Self {
        let km = distance_km(origin, position);
        Self {
            name: name.into(),
            lat: position.lat,
            lon: position.lon,
            description: description.into(),
            distance_km: round2(km),
            distance_miles: round2(km_to_miles(km)),
            source,
        }
    }
}

impl Located for SearchResult {
    fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lon)
    }
}

/// A geocoder candidate before normalization
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodedPlace {
    pub name: String,
    pub coordinates: Coordinates,
    pub description: String,
}

/// Trait for free-text geocoding backends
pub trait Geocoder: Send + Sync {
    /// Find places matching `query` within roughly `radius_km` of `origin`
    fn geocode(
        &self,
        query: &str,
        origin: Coordinates,
        radius_km: f64,
        limit: usize,
    ) -> impl std::future::Future<Output = Result<Vec<GeocodedPlace>>> + Send;
}

/// Search parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchParams {
    pub origin: Coordinates,
    pub limit: usize,
    pub radius_km: f64,
}

impl SearchParams {
    fn validate(&self) -> Result<()> {
        self.origin.validate()?;
        if !self.radius_km.is_finite() || self.radius_km <= 0.0 {
            return Err(Error::InvalidQuery(format!(
                "Radius must be positive, got {} km",
                self.radius_km
            )));
        }
        Ok(())
    }
}

/// Drop near duplicates, sort by distance, and truncate
///
/// Two results closer than 100 m to each other are duplicates; the one seen
/// first is kept. Sorting is stable, and truncation happens after sorting.
pub fn merge_results(results: Vec<SearchResult>, limit: usize) -> Vec<SearchResult> {
    let mut unique: Vec<SearchResult> = Vec::with_capacity(results.len());

    for result in results {
        let position = result.coordinates();
        let duplicate = unique
            .iter()
            .any(|kept| distance_km(kept.coordinates(), position) < DEDUP_THRESHOLD_KM);
        if !duplicate {
            unique.push(result);
        }
    }

    unique.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    unique.truncate(limit);
    unique
}

/// Multi-source search aggregator
pub struct Aggregator<P: PoiSource, G: Geocoder> {
    pois: P,
    geocoder: G,
    query_timeout_secs: u64,
}

impl<P: PoiSource, G: Geocoder> Aggregator<P, G> {
    pub fn new(pois: P, geocoder: G, query_timeout_secs: u64) -> Self {
        Self {
            pois,
            geocoder,
            query_timeout_secs,
        }
    }

    /// Search both backends and return up to `limit` results, nearest first
    ///
    /// Backend failures are logged and contribute nothing. An empty vector
    /// means nothing was found; errors are reserved for bad input.
    pub async fn search(&self, query: &str, params: SearchParams) -> Result<Vec<SearchResult>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(Error::InvalidQuery("Search query is empty".to_string()));
        }
        params.validate()?;

        let matcher = keyword_matcher(query);
        debug!(query = %query, matcher = ?matcher.map(|m| m.to_string()), "Searching");

        let (tagged, geocoded) = tokio::join!(
            self.search_tagged(matcher, params),
            self.search_geocoder(query, params),
        );

        info!(
            query = %query,
            overpass = tagged.len(),
            nominatim = geocoded.len(),
            "Search backends returned"
        );

        let mut merged = tagged;
        merged.extend(geocoded);
        Ok(merge_results(merged, params.limit))
    }

    /// The single nearest result, if any
    pub async fn search_closest(&self, query: &str, params: SearchParams) -> Result<Option<SearchResult>> {
        let results = self.search(query, params).await?;
        Ok(nearest(params.origin, &results).cloned())
    }

    async fn search_tagged(&self, matcher: Option<TagMatcher>, params: SearchParams) -> Vec<SearchResult> {
        let Some(matcher) = matcher else {
            return Vec::new();
        };

        let query = around_query(
            &matcher,
            params.origin,
            params.radius_km * 1000.0,
            self.query_timeout_secs,
        );

        match self.pois.fetch(&query).await {
            Ok(elements) => elements
                .iter()
                .filter_map(|element| {
                    let position = element.position()?;
                    let details = PlaceDetails::from_tags(&element.tags);
                    Some(SearchResult::new(
                        details.name,
                        position,
                        details.description,
                        params.origin,
                        ResultSource::Overpass,
                    ))
                })
                .collect(),
            Err(e) => {
                warn!(matcher = %matcher, error = %e, "Overpass search failed");
                Vec::new()
            }
        }
    }

    async fn search_geocoder(&self, query: &str, params: SearchParams) -> Vec<SearchResult> {
        match self
            .geocoder
            .geocode(query, params.origin, params.radius_km, params.limit)
            .await
        {
            Ok(places) => places
                .into_iter()
                .map(|place| {
                    SearchResult::new(
                        place.name,
                        place.coordinates,
                        place.description,
                        params.origin,
                        ResultSource::Nominatim,
                    )
                })
                .collect(),
            Err(e) => {
                warn!(query = %query, error = %e, "Geocoder search failed");
                Vec::new()
            }
        }
    }
}
