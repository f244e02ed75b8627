//! Named zones
//!
//! A zone is a polygon with a display color. The registry keeps zones in load
//! order; lookups by containment return the first zone that matches, so when
//! zones overlap the earlier one wins.

pub mod boundary;

use crate::error::{Error, Result};
use crate::geo::polygon::{point_in_polygon, Ring};
use crate::geo::Coordinates;
use serde::{Deserialize, Serialize};

/// A named polygonal area
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZonePolygon {
    pub name: String,

    /// Display hint only
    pub color: String,

    /// GeoJSON-style rings of `[lon, lat]`; ring 0 is the outer boundary
    #[serde(rename = "coordinates")]
    pub rings: Vec<Ring>,
}

impl ZonePolygon {
    pub fn new(name: impl Into<String>, color: impl Into<String>, rings: Vec<Ring>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
            rings,
        }
    }

    /// Whether the point lies inside the outer ring
    pub fn contains(&self, point: Coordinates) -> bool {
        point_in_polygon(point, &self.rings)
    }
}

/// Closed rectangle from south-west and north-east corners
fn rectangle(south: f64, west: f64, north: f64, east: f64) -> Vec<Ring> {
    vec![vec![
        [west, south],
        [east, south],
        [east, north],
        [west, north],
        [west, south],
    ]]
}

/// Ordered, immutable collection of zones
#[derive(Debug, Clone, Default)]
pub struct ZoneRegistry {
    zones: Vec<ZonePolygon>,
}

impl ZoneRegistry {
    /// Create a registry; order is preserved for containment lookups
    pub fn new(zones: Vec<ZonePolygon>) -> Self {
        Self { zones }
    }

    /// Built-in Los Angeles zones (simplified rectangles)
    pub fn los_angeles() -> Self {
        Self::new(vec![
            ZonePolygon::new(
                "Downtown LA",
                "#FF6B6B",
                rectangle(34.0400, -118.2600, 34.0600, -118.2400),
            ),
            ZonePolygon::new(
                "Hollywood",
                "#4ECDC4",
                rectangle(34.0800, -118.3600, 34.1100, -118.3200),
            ),
            ZonePolygon::new(
                "Santa Monica",
                "#45B7D1",
                rectangle(34.0100, -118.5000, 34.0300, -118.4800),
            ),
            ZonePolygon::new(
                "Pasadena",
                "#96CEB4",
                rectangle(34.1300, -118.1600, 34.1600, -118.1200),
            ),
        ])
    }

    /// All zones in load order
    pub fn all(&self) -> &[ZonePolygon] {
        &self.zones
    }

    /// Zone names in load order
    pub fn names(&self) -> Vec<&str> {
        self.zones.iter().map(|z| z.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Case-insensitive exact name lookup
    pub fn by_name(&self, name: &str) -> Option<&ZonePolygon> {
        let wanted = name.trim().to_lowercase();
        self.zones.iter().find(|z| z.name.to_lowercase() == wanted)
    }

    /// Name lookup that reports unknown names as an error
    pub fn require(&self, name: &str) -> Result<&ZonePolygon> {
        self.by_name(name)
            .ok_or_else(|| Error::UnknownZone(name.to_string()))
    }

    /// First zone (in load order) whose outer ring contains the point
    pub fn containing(&self, point: Coordinates) -> Option<&ZonePolygon> {
        self.zones.iter().find(|z| z.contains(point))
    }
}
