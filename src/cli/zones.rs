//! Zones command handler

use crate::config::Config;
use crate::error::Result;
use crate::geo::nominatim::NominatimClient;
use crate::geo::Coordinates;
use crate::zone::boundary::build_registry;
use crate::zone::ZoneRegistry;
use clap::Args;

/// Zones command arguments
#[derive(Args)]
pub struct ZonesArgs {
    /// Latitude of a point to locate
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Longitude of a point to locate
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lon: Option<f64>,

    /// Resolve zone outlines from Nominatim instead of the built-in set
    #[arg(long)]
    pub resolve: bool,
}

/// Load the registry the same way the server does
pub(crate) async fn load_registry(config: &Config, resolve: bool) -> Result<ZoneRegistry> {
    if resolve || config.zones.resolve_boundaries {
        let nominatim = NominatimClient::new(&config.upstream)?;
        let report = build_registry(&config.zones.specs, &nominatim).await;
        for name in &report.dropped {
            eprintln!("Warning: no boundary found for zone '{}'", name);
        }
        Ok(report.registry)
    } else {
        Ok(ZoneRegistry::los_angeles())
    }
}

/// Run the zones command
pub async fn run(args: ZonesArgs) -> Result<()> {
    let config = Config::load()?;
    let registry = load_registry(&config, args.resolve).await?;

    if let (Some(lat), Some(lon)) = (args.lat, args.lon) {
        let point = Coordinates::checked(lat, lon)?;
        match registry.containing(point) {
            Some(zone) => println!("{}", zone.name),
            None => {
                eprintln!("No zone contains ({}, {})", lat, lon);
                std::process::exit(1);
            }
        }
        return Ok(());
    }

    for zone in registry.all() {
        let vertices = zone.rings.first().map(Vec::len).unwrap_or(0);
        println!("{:<16} {}  ({} vertices)", zone.name, zone.color, vertices);
    }

    Ok(())
}
