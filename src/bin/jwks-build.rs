//! Build the published JWK sets for both environments.
//!
//! Reads individual JWK files from the `production/` and `staging/`
//! directories and compiles the currently valid ones into a single JSON
//! document per environment under `dist/`.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use jwks_tools::keyset::BuildService;
use jwks_tools::ui::UI;
use jwks_tools::version::CURRENT_VERSION;

#[derive(Parser)]
#[command(
    name = "jwks-build",
    about = "Compile the production and staging JWK sets into dist/",
    version = CURRENT_VERSION,
)]
struct Cli {}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let _cli = Cli::parse();
    let ui = UI::new();

    let base_dir = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            ui.error(&format!("Error: {}", e));
            std::process::exit(1);
        }
    };

    let service = BuildService::new(base_dir);
    if let Err(e) = service.build_all().await {
        ui.error(&format!("Error: {}", e));
        std::process::exit(1);
    }
}
