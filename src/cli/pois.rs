//! Pois command handler
//!
//! Prints the POIs of one zone as JSON.

use crate::cli::zones::load_registry;
use crate::config::Config;
use crate::error::Result;
use crate::geo::Coordinates;
use crate::poi::cache::PoiCache;
use crate::poi::overpass::OverpassClient;
use crate::poi::service::PoiService;
use crate::poi::PoiCategory;
use clap::Args;
use std::sync::Arc;
use std::time::Duration;

/// Pois command arguments
#[derive(Args)]
pub struct PoisArgs {
    /// Zone name (case-insensitive)
    pub zone: String,

    /// Comma-separated categories (default: all)
    #[arg(long, short = 'c')]
    pub categories: Option<String>,

    /// Your latitude, for distances
    #[arg(long, requires = "user_lon", allow_hyphen_values = true)]
    pub user_lat: Option<f64>,

    /// Your longitude, for distances
    #[arg(long, requires = "user_lat", allow_hyphen_values = true)]
    pub user_lon: Option<f64>,

    /// Resolve zone outlines from Nominatim instead of the built-in set
    #[arg(long)]
    pub resolve: bool,
}

/// POI service configured like the server's
fn poi_service(config: &Config) -> Result<PoiService<OverpassClient>> {
    Ok(PoiService::new(
        OverpassClient::new(&config.upstream)?,
        Arc::new(PoiCache::with_ttl(Duration::from_secs(config.cache.ttl_secs))),
        config.upstream.overpass_query_timeout_secs,
    ))
}

/// Run the pois command
pub async fn run(args: PoisArgs) -> Result<()> {
    let config = Config::load()?;
    let registry = load_registry(&config, args.resolve).await?;
    let zone = registry.require(&args.zone)?;

    let categories = args
        .categories
        .as_deref()
        .map(PoiCategory::parse_list)
        .transpose()?;

    let user = match (args.user_lat, args.user_lon) {
        (Some(lat), Some(lon)) => Some(Coordinates::new(lat, lon)),
        _ => None,
    };

    let service = poi_service(&config)?;
    let pois = service.get_pois(zone, categories.as_deref(), user).await?;
    println!("{}", serde_json::to_string_pretty(&pois)?);

    Ok(())
}
