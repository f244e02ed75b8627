//! Centralized constants for the zone-scout crate
//!
//! This module consolidates constants that are used across multiple modules
//! to avoid duplication and ensure consistency.

/// Geographic constants
pub mod geo {
    /// Mean Earth radius in kilometers
    pub const EARTH_RADIUS_KM: f64 = 6371.0;

    /// Kilometers per degree of latitude (approximate, varies slightly with latitude)
    pub const KM_PER_DEGREE_LAT: f64 = 111.32;

    /// Miles per kilometer
    pub const MILES_PER_KM: f64 = 0.621371;
}

/// External API endpoints
pub mod api {
    /// Overpass API interpreter endpoint
    pub const OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";

    /// OpenStreetMap Nominatim geocoding API
    pub const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

    /// User-Agent sent to OSM services (Nominatim rejects anonymous clients)
    pub const USER_AGENT: &str = concat!("zone-scout/", env!("CARGO_PKG_VERSION"));
}

/// Cache settings
pub mod cache {
    /// POI cache entry lifetime in seconds (1 hour)
    pub const POI_TTL_SECS: u64 = 3600;
}

/// Search settings
pub mod search {
    /// Two results closer than this are treated as the same place
    pub const DEDUP_THRESHOLD_KM: f64 = 0.1;
}
