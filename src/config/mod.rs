//! Configuration management
//!
//! Loads and saves configuration from XDG-compliant paths.
//! Config location: ~/.config/zone-scout/config.toml

pub mod defaults;

use crate::constants::api::{NOMINATIM_URL, OVERPASS_URL, USER_AGENT};
use crate::constants::cache::POI_TTL_SECS;
use crate::error::{Error, Result};
use defaults::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// External service endpoints and timeouts
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// POI cache settings
    #[serde(default)]
    pub cache: CacheConfig,

    /// Search defaults
    #[serde(default)]
    pub search: SearchConfig,

    /// Zone registry settings
    #[serde(default)]
    pub zones: ZonesConfig,
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Origins allowed to call the API from a browser
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

/// External service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Overpass interpreter endpoint
    #[serde(default = "default_overpass_url")]
    pub overpass_url: String,

    /// Nominatim base URL
    #[serde(default = "default_nominatim_url")]
    pub nominatim_url: String,

    /// User-Agent sent to both services
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// HTTP timeout for Overpass requests
    #[serde(default = "default_overpass_timeout")]
    pub overpass_timeout_secs: u64,

    /// HTTP timeout for Nominatim requests
    #[serde(default = "default_nominatim_timeout")]
    pub nominatim_timeout_secs: u64,

    /// `[timeout:N]` value embedded in Overpass queries
    #[serde(default = "default_overpass_query_timeout")]
    pub overpass_query_timeout_secs: u64,
}

/// POI cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Entry lifetime in seconds
    #[serde(default = "default_ttl")]
    pub ttl_secs: u64,
}

/// Search defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_limit")]
    pub default_limit: usize,

    #[serde(default = "default_max_limit")]
    pub max_limit: usize,

    #[serde(default = "default_radius_km")]
    pub default_radius_km: f64,
}

/// Zone registry settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZonesConfig {
    /// Fetch zone outlines from Nominatim instead of using the built-in set
    #[serde(default)]
    pub resolve_boundaries: bool,

    /// Zones to resolve, in registry order
    #[serde(rename = "zone", default = "default_zone_specs")]
    pub specs: Vec<ZoneSpec>,
}

/// A zone to resolve by place name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneSpec {
    pub name: String,
    pub color: String,

    /// Geocoder query; the zone name is used when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place: Option<String>,
}

// Default value functions for serde
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_cors_origins() -> Vec<String> {
    DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect()
}
fn default_overpass_url() -> String {
    OVERPASS_URL.to_string()
}
fn default_nominatim_url() -> String {
    NOMINATIM_URL.to_string()
}
fn default_user_agent() -> String {
    USER_AGENT.to_string()
}
fn default_overpass_timeout() -> u64 {
    DEFAULT_OVERPASS_TIMEOUT_SECS
}
fn default_nominatim_timeout() -> u64 {
    DEFAULT_NOMINATIM_TIMEOUT_SECS
}
fn default_overpass_query_timeout() -> u64 {
    DEFAULT_OVERPASS_QUERY_TIMEOUT_SECS
}
fn default_ttl() -> u64 {
    POI_TTL_SECS
}
fn default_limit() -> usize {
    DEFAULT_SEARCH_LIMIT
}
fn default_max_limit() -> usize {
    DEFAULT_MAX_SEARCH_LIMIT
}
fn default_radius_km() -> f64 {
    DEFAULT_SEARCH_RADIUS_KM
}
fn default_zone_specs() -> Vec<ZoneSpec> {
    [
        ("Downtown LA", "#FF6B6B", "Downtown, Los Angeles, California"),
        ("Hollywood", "#4ECDC4", "Hollywood, Los Angeles, California"),
        ("Santa Monica", "#45B7D1", "Santa Monica, California"),
        ("Pasadena", "#96CEB4", "Pasadena, California"),
    ]
    .into_iter()
    .map(|(name, color, place)| ZoneSpec {
        name: name.to_string(),
        color: color.to_string(),
        place: Some(place.to_string()),
    })
    .collect()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: default_cors_origins(),
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            overpass_url: default_overpass_url(),
            nominatim_url: default_nominatim_url(),
            user_agent: default_user_agent(),
            overpass_timeout_secs: default_overpass_timeout(),
            nominatim_timeout_secs: default_nominatim_timeout(),
            overpass_query_timeout_secs: default_overpass_query_timeout(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            max_limit: default_max_limit(),
            default_radius_km: default_radius_km(),
        }
    }
}

impl Default for ZonesConfig {
    fn default() -> Self {
        Self {
            resolve_boundaries: false,
            specs: default_zone_specs(),
        }
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| Error::Config(format!("Invalid value for {}: {}", key, value)))
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default path
    ///
    /// Creates default config if file doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from a specific file, creating it if missing
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| {
                Error::Config(format!("Failed to read config file: {}", e))
            })?;

            toml::from_str(&content).map_err(|e| {
                Error::Config(format!("Failed to parse config file: {}", e))
            })
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            Error::Config(format!("Failed to serialize config: {}", e))
        })?;

        fs::write(path, content).map_err(|e| {
            Error::Config(format!("Failed to write config file: {}", e))
        })?;

        Ok(())
    }

    /// Get a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns the value as a string, or None if not found
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["server", "host"] => Some(self.server.host.clone()),
            ["server", "port"] => Some(self.server.port.to_string()),
            ["server", "cors_origins"] => Some(self.server.cors_origins.join(",")),

            ["upstream", "overpass_url"] => Some(self.upstream.overpass_url.clone()),
            ["upstream", "nominatim_url"] => Some(self.upstream.nominatim_url.clone()),
            ["upstream", "user_agent"] => Some(self.upstream.user_agent.clone()),
            ["upstream", "overpass_timeout_secs"] => {
                Some(self.upstream.overpass_timeout_secs.to_string())
            }
            ["upstream", "nominatim_timeout_secs"] => {
                Some(self.upstream.nominatim_timeout_secs.to_string())
            }
            ["upstream", "overpass_query_timeout_secs"] => {
                Some(self.upstream.overpass_query_timeout_secs.to_string())
            }

            ["cache", "ttl_secs"] => Some(self.cache.ttl_secs.to_string()),

            ["search", "default_limit"] => Some(self.search.default_limit.to_string()),
            ["search", "max_limit"] => Some(self.search.max_limit.to_string()),
            ["search", "default_radius_km"] => Some(self.search.default_radius_km.to_string()),

            ["zones", "resolve_boundaries"] => Some(self.zones.resolve_boundaries.to_string()),

            _ => None,
        }
    }

    /// Set a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns error if key is invalid or value type is wrong
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["server", "host"] => self.server.host = value.to_string(),
            ["server", "port"] => self.server.port = parse_value(key, value)?,
            ["server", "cors_origins"] => {
                self.server.cors_origins = value
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect();
            }

            ["upstream", "overpass_url"] => self.upstream.overpass_url = value.to_string(),
            ["upstream", "nominatim_url"] => self.upstream.nominatim_url = value.to_string(),
            ["upstream", "user_agent"] => self.upstream.user_agent = value.to_string(),
            ["upstream", "overpass_timeout_secs"] => {
                self.upstream.overpass_timeout_secs = parse_value(key, value)?;
            }
            ["upstream", "nominatim_timeout_secs"] => {
                self.upstream.nominatim_timeout_secs = parse_value(key, value)?;
            }
            ["upstream", "overpass_query_timeout_secs"] => {
                self.upstream.overpass_query_timeout_secs = parse_value(key, value)?;
            }

            ["cache", "ttl_secs"] => self.cache.ttl_secs = parse_value(key, value)?,

            ["search", "default_limit"] => self.search.default_limit = parse_value(key, value)?,
            ["search", "max_limit"] => self.search.max_limit = parse_value(key, value)?,
            ["search", "default_radius_km"] => {
                self.search.default_radius_km = parse_value(key, value)?;
            }

            ["zones", "resolve_boundaries"] => {
                self.zones.resolve_boundaries = parse_value(key, value)?;
            }

            _ => {
                return Err(Error::Config(format!("Unknown config key: {}", key)));
            }
        }

        Ok(())
    }

    /// List all available config keys
    pub fn available_keys() -> Vec<&'static str> {
        vec![
            "server.host",
            "server.port",
            "server.cors_origins",
            "upstream.overpass_url",
            "upstream.nominatim_url",
            "upstream.user_agent",
            "upstream.overpass_timeout_secs",
            "upstream.nominatim_timeout_secs",
            "upstream.overpass_query_timeout_secs",
            "cache.ttl_secs",
            "search.default_limit",
            "search.max_limit",
            "search.default_radius_km",
            "zones.resolve_boundaries",
        ]
    }

    /// Get server address as "host:port"
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.server.port, 8000);
        assert_eq!(config.upstream.overpass_timeout_secs, 45);
        assert_eq!(config.upstream.nominatim_timeout_secs, 10);
        assert_eq!(config.cache.ttl_secs, 3600);
        assert_eq!(config.search.default_limit, 5);
        assert!(!config.zones.resolve_boundaries);
        assert_eq!(config.zones.specs.len(), 4);
        assert_eq!(config.zones.specs[1].name, "Hollywood");
    }

    #[test]
    fn test_get_set() {
        let mut config = Config::default();

        assert_eq!(config.get("server.port"), Some("8000".to_string()));

        config.set("server.port", "9090").unwrap();
        assert_eq!(config.get("server.port"), Some("9090".to_string()));

        config.set("search.default_radius_km", "12.5").unwrap();
        assert_eq!(config.search.default_radius_km, 12.5);

        config.set("zones.resolve_boundaries", "true").unwrap();
        assert!(config.zones.resolve_boundaries);

        config.set("server.cors_origins", "http://a.test, http://b.test").unwrap();
        assert_eq!(config.server.cors_origins, vec!["http://a.test", "http://b.test"]);
    }

    #[test]
    fn test_get_invalid_key() {
        let config = Config::default();
        assert_eq!(config.get("invalid.key"), None);
    }

    #[test]
    fn test_set_invalid_key() {
        let mut config = Config::default();
        assert!(config.set("invalid.key", "value").is_err());
    }

    #[test]
    fn test_set_invalid_value() {
        let mut config = Config::default();
        let err = config.set("cache.ttl_secs", "forever").unwrap_err();
        assert!(err.to_string().contains("cache.ttl_secs"));
    }

    #[test]
    fn test_every_key_is_readable() {
        let config = Config::default();
        for key in Config::available_keys() {
            assert!(config.get(key).is_some(), "missing getter for {}", key);
        }
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.server.port = 9999;
        config.zones.resolve_boundaries = true;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.server.port, 9999);
        assert!(loaded.zones.resolve_boundaries);
        assert_eq!(loaded.zones.specs, config.zones.specs);
    }

    #[test]
    fn test_load_creates_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(
            &path,
            r##"
[server]
port = 8123

[[zones.zone]]
name = "Venice"
color = "#FFAA00"
"##,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.server.port, 8123);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.zones.specs.len(), 1);
        assert_eq!(config.zones.specs[0].place, None);
        assert_eq!(config.upstream.overpass_query_timeout_secs, 25);
    }

    #[test]
    fn test_serialization_format() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).unwrap();

        assert!(toml.contains("[server]"));
        assert!(toml.contains("[upstream]"));
        assert!(toml.contains("[cache]"));
        assert!(toml.contains("[[zones.zone]]"));
    }

    #[test]
    fn test_server_addr() {
        let config = Config::default();
        assert_eq!(config.server_addr(), "127.0.0.1:8000");
    }
}
