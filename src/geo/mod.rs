//! Geographic primitives
//!
//! Coordinates, great-circle distance, nearest-point selection and
//! polygon membership.

pub mod nominatim;
pub mod polygon;

use crate::constants::geo::{EARTH_RADIUS_KM, KM_PER_DEGREE_LAT, MILES_PER_KM};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// A geographic coordinate (latitude, longitude)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    /// Create new coordinates
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Create coordinates and validate them in one step
    pub fn checked(lat: f64, lon: f64) -> Result<Self> {
        let coords = Self::new(lat, lon);
        coords.validate()?;
        Ok(coords)
    }

    /// Validate that coordinates are within valid ranges
    ///
    /// Latitude: -90 to 90
    /// Longitude: -180 to 180
    pub fn validate(&self) -> Result<()> {
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(Error::InvalidCoordinates(format!(
                "Latitude {} is out of range [-90, 90]",
                self.lat
            )));
        }
        if !(-180.0..=180.0).contains(&self.lon) {
            return Err(Error::InvalidCoordinates(format!(
                "Longitude {} is out of range [-180, 180]",
                self.lon
            )));
        }
        Ok(())
    }
}

/// Anything with a position on the globe
pub trait Located {
    fn coordinates(&self) -> Coordinates;
}

impl Located for Coordinates {
    fn coordinates(&self) -> Coordinates {
        *self
    }
}

/// Calculate the great-circle distance between two points in kilometers
/// (Haversine formula)
pub fn distance_km(a: Coordinates, b: Coordinates) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let delta_lat = (b.lat - a.lat).to_radians();
    let delta_lon = (b.lon - a.lon).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    // Clamp guards against h drifting a hair above 1.0 for antipodal points
    let c = 2.0 * h.sqrt().min(1.0).asin();

    EARTH_RADIUS_KM * c
}

/// Pick the candidate closest to `origin`
///
/// Returns `None` for an empty slice. Ties keep the earliest candidate.
pub fn nearest<T: Located>(origin: Coordinates, candidates: &[T]) -> Option<&T> {
    let mut best: Option<(&T, f64)> = None;

    for candidate in candidates {
        let distance = distance_km(origin, candidate.coordinates());
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((candidate, distance)),
        }
    }

    best.map(|(candidate, _)| candidate)
}

/// Convert kilometers to statute miles
pub fn km_to_miles(km: f64) -> f64 {
    km * MILES_PER_KM
}

/// Round to two decimal places, as reported to callers
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// An axis-aligned lat/lon box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    /// Box enclosing a circle of `radius_km` around `center`
    ///
    /// Latitudes are clamped to the poles and longitudes to the antimeridian.
    pub fn around(center: Coordinates, radius_km: f64) -> Self {
        let delta_lat = radius_km / KM_PER_DEGREE_LAT;
        let cos_lat = center.lat.to_radians().cos().max(1e-6);
        let delta_lon = (radius_km / (KM_PER_DEGREE_LAT * cos_lat)).min(180.0);

        Self {
            min_lat: (center.lat - delta_lat).max(-90.0),
            min_lon: (center.lon - delta_lon).max(-180.0),
            max_lat: (center.lat + delta_lat).min(90.0),
            max_lon: (center.lon + delta_lon).min(180.0),
        }
    }

    /// Nominatim `viewbox` parameter: `left,top,right,bottom`
    pub fn to_viewbox(&self) -> String {
        format!(
            "{},{},{},{}",
            self.min_lon, self.max_lat, self.max_lon, self.min_lat
        )
    }
}
