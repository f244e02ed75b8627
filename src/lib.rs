//! zone-scout: zone-scoped points of interest and place search
//!
//! A library and CLI/HTTP service that finds points of interest inside named
//! geographic zones and resolves free-text place queries, merging results from
//! OpenStreetMap's Overpass and Nominatim services.
//!
//! ## Features
//!
//! - Ray-casting zone membership over an ordered zone registry
//! - Overpass queries scoped to a zone polygon, with a TTL cache
//! - Concurrent two-backend search with proximity dedup and distance ranking
//! - HTTP API + CLI interface
//!
//! ## Quick Start
//!
//! ```rust
//! use zone_scout::geo::{distance_km, Coordinates};
//! use zone_scout::zone::ZoneRegistry;
//!
//! let zones = ZoneRegistry::los_angeles();
//! let here = Coordinates::new(34.095, -118.34);
//!
//! let zone = zones.containing(here).unwrap();
//! assert_eq!(zone.name, "Hollywood");
//!
//! let downtown = Coordinates::new(34.05, -118.25);
//! println!("{:.1} km to downtown", distance_km(here, downtown));
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod geo;
pub mod poi;
pub mod search;
pub mod server;
pub mod zone;

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, Result};
pub use geo::Coordinates;
pub use poi::{Poi, PoiCategory};
pub use search::SearchResult;
pub use zone::{ZonePolygon, ZoneRegistry};
