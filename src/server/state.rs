//! Server shared state
//!
//! Holds configuration, the zone registry and the lookup services.

use crate::config::Config;
use crate::error::Result;
use crate::geo::nominatim::NominatimClient;
use crate::poi::cache::PoiCache;
use crate::poi::overpass::OverpassClient;
use crate::poi::service::PoiService;
use crate::search::Aggregator;
use crate::zone::boundary::build_registry;
use crate::zone::ZoneRegistry;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

/// Shared state for the HTTP server
pub struct AppState {
    /// Configuration
    pub config: Config,

    /// Zones loaded at startup
    pub zones: ZoneRegistry,

    /// Zone POI lookup
    pub pois: PoiService<OverpassClient>,

    /// Free-text search
    pub search: Aggregator<OverpassClient, NominatimClient>,

    started: Instant,
}

impl AppState {
    /// Create application state around an already-built registry
    pub fn new(config: Config, zones: ZoneRegistry) -> Result<Self> {
        let overpass = OverpassClient::new(&config.upstream)?;
        let nominatim = NominatimClient::new(&config.upstream)?;
        let cache = Arc::new(PoiCache::with_ttl(Duration::from_secs(config.cache.ttl_secs)));
        let query_timeout = config.upstream.overpass_query_timeout_secs;
        info!(overpass = %overpass.url(), cache_ttl_secs = cache.ttl().as_secs(), "Upstream clients ready");

        Ok(Self {
            pois: PoiService::new(overpass.clone(), cache, query_timeout),
            search: Aggregator::new(overpass, nominatim, query_timeout),
            zones,
            config,
            started: Instant::now(),
        })
    }

    /// Create application state, resolving zone outlines if configured to
    pub async fn from_config(config: Config) -> Result<Self> {
        let zones = if config.zones.resolve_boundaries {
            let nominatim = NominatimClient::new(&config.upstream)?;
            build_registry(&config.zones.specs, &nominatim).await.registry
        } else {
            ZoneRegistry::los_angeles()
        };

        info!(zones = ?zones.names(), "Zones loaded");
        Self::new(config, zones)
    }

    /// Seconds since the state was created
    pub fn uptime_secs(&self) -> u64 {
        self.started.elapsed().as_secs()
    }
}
