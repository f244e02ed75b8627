//! CLI command handlers
//!
//! Each subcommand has its own module with handler functions.

pub mod config;
pub mod pois;
pub mod search;
pub mod serve;
pub mod zones;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Zone-scoped POI lookup and place search
#[derive(Parser)]
#[command(name = "zone-scout")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start web server (foreground)
    Serve(serve::ServeArgs),

    /// List zones, or find the zone containing a point
    Zones(zones::ZonesArgs),

    /// List points of interest inside a zone
    Pois(pois::PoisArgs),

    /// Search for places near a location
    Search(search::SearchArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

/// Install the tracing subscriber (stderr, `RUST_LOG` aware)
fn init_logging(default_level: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

/// Run the CLI
pub async fn run() -> crate::error::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => {
            init_logging("info");
            serve::run(args).await
        }
        Commands::Zones(args) => {
            init_logging("warn");
            zones::run(args).await
        }
        Commands::Pois(args) => {
            init_logging("warn");
            pois::run(args).await
        }
        Commands::Search(args) => {
            init_logging("warn");
            search::run(args).await
        }
        Commands::Config(args) => config::run(args),
    }
}
