//! Search command handler

use crate::config::Config;
use crate::error::Result;
use crate::geo::nominatim::NominatimClient;
use crate::geo::Coordinates;
use crate::poi::overpass::OverpassClient;
use crate::search::{Aggregator, SearchParams};
use clap::Args;

/// Search command arguments
#[derive(Args)]
pub struct SearchArgs {
    /// What to look for (e.g. "coffee", "Griffith Observatory")
    pub query: String,

    /// Latitude to search around
    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,

    /// Longitude to search around
    #[arg(long, allow_hyphen_values = true)]
    pub lon: f64,

    /// Maximum number of results
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Search radius in kilometers
    #[arg(long, short = 'r')]
    pub radius_km: Option<f64>,

    /// Print only the closest result
    #[arg(long)]
    pub closest: bool,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

/// Run the search command
pub async fn run(args: SearchArgs) -> Result<()> {
    let config = Config::load()?;

    let aggregator = Aggregator::new(
        OverpassClient::new(&config.upstream)?,
        NominatimClient::new(&config.upstream)?,
        config.upstream.overpass_query_timeout_secs,
    );

    let params = SearchParams {
        origin: Coordinates::new(args.lat, args.lon),
        limit: args.limit.unwrap_or(config.search.default_limit).max(1),
        radius_km: args.radius_km.unwrap_or(config.search.default_radius_km),
    };

    let results: Vec<_> = if args.closest {
        aggregator
            .search_closest(&args.query, params)
            .await?
            .into_iter()
            .collect()
    } else {
        aggregator.search(&args.query, params).await?
    };

    if results.is_empty() {
        eprintln!("No places found for query: {}", args.query);
        std::process::exit(1);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    for result in &results {
        println!(
            "{:>7.2} km  {:>7.2} mi  [{}] {}",
            result.distance_km, result.distance_miles, result.source, result.name
        );
        println!("             {}", result.description);
    }

    Ok(())
}
