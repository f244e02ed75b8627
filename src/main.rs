//! zone-scout CLI entry point
//!
//! Zone-scoped POI lookup and place search - CLI + web API

use zone_scout::cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
