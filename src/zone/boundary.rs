//! Zone boundary resolution
//!
//! Builds a registry by asking a geocoding source for each zone's outline.
//! Zones whose outline cannot be resolved are dropped and reported rather than
//! failing the whole build.

use crate::config::ZoneSpec;
use crate::error::Result;
use crate::geo::polygon::{ring_area, Ring};
use crate::zone::{ZonePolygon, ZoneRegistry};
use serde::Deserialize;
use tracing::{info, warn};

/// GeoJSON geometry as returned by `polygon_geojson=1`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Polygon { coordinates: Vec<Ring> },
    MultiPolygon { coordinates: Vec<Vec<Ring>> },
    #[serde(other)]
    Other,
}

impl Geometry {
    /// Rings of the polygon to use as a zone outline
    ///
    /// For a multi-polygon the member with the largest outer ring is chosen.
    /// Points, lines and empty polygons yield `None`.
    pub fn into_rings(self) -> Option<Vec<Ring>> {
        let rings = match self {
            Geometry::Polygon { coordinates } => coordinates,
            Geometry::MultiPolygon { coordinates } => coordinates
                .into_iter()
                .filter(|polygon| !polygon.is_empty())
                .max_by(|a, b| ring_area(&a[0]).total_cmp(&ring_area(&b[0])))?,
            Geometry::Other => return None,
        };

        match rings.first() {
            Some(outer) if outer.len() >= 3 => Some(rings),
            _ => None,
        }
    }
}

/// Trait for sources that can outline a place by name
pub trait BoundarySource: Send + Sync {
    /// Look up the outline of a named place
    ///
    /// Returns `None` when the place is unknown or has no polygon geometry.
    fn boundary(&self, place: &str) -> impl std::future::Future<Output = Result<Option<Vec<Ring>>>> + Send;
}

/// Outcome of a registry build
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub registry: ZoneRegistry,
    /// Names of zones left out because no geometry was found
    pub dropped: Vec<String>,
}

/// Resolve every zone spec against `source`, in order
///
/// Lookup failures and missing geometry both drop the zone; the dropped names
/// are logged and returned so a partial load is visible.
pub async fn build_registry<B: BoundarySource>(specs: &[ZoneSpec], source: &B) -> BuildReport {
    let mut zones = Vec::with_capacity(specs.len());
    let mut dropped = Vec::new();

    for spec in specs {
        let place = spec.place.as_deref().unwrap_or(&spec.name);

        match source.boundary(place).await {
            Ok(Some(rings)) => {
                zones.push(ZonePolygon::new(spec.name.clone(), spec.color.clone(), rings));
            }
            Ok(None) => {
                warn!(zone = %spec.name, place = %place, "No boundary geometry found, dropping zone");
                dropped.push(spec.name.clone());
            }
            Err(e) => {
                warn!(zone = %spec.name, place = %place, error = %e, "Boundary lookup failed, dropping zone");
                dropped.push(spec.name.clone());
            }
        }
    }

    if dropped.is_empty() {
        info!(loaded = zones.len(), "Zone registry built");
    } else {
        warn!(
            loaded = zones.len(),
            dropped = ?dropped,
            "Zone registry built with missing zones"
        );
    }

    BuildReport {
        registry: ZoneRegistry::new(zones),
        dropped,
    }
}
