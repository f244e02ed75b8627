//! Default configuration values
//!
//! Named constants for all tunable parameters

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 8000;

/// Frontend origins allowed by CORS
pub const DEFAULT_CORS_ORIGINS: &[&str] = &["http://localhost:5173", "http://localhost:3000"];

/// HTTP timeout for Overpass requests in seconds
pub const DEFAULT_OVERPASS_TIMEOUT_SECS: u64 = 45;

/// HTTP timeout for Nominatim requests in seconds
pub const DEFAULT_NOMINATIM_TIMEOUT_SECS: u64 = 10;

/// Server-side timeout written into Overpass queries
pub const DEFAULT_OVERPASS_QUERY_TIMEOUT_SECS: u64 = 25;

/// Default number of search results
pub const DEFAULT_SEARCH_LIMIT: usize = 5;

/// Upper bound on requested search results
pub const DEFAULT_MAX_SEARCH_LIMIT: usize = 50;

/// Default search radius in kilometers
pub const DEFAULT_SEARCH_RADIUS_KM: f64 = 32.0;

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name (for XDG paths)
pub const APP_DIR_NAME: &str = "zone-scout";
