//! Generate a new EC P-384 signing key pair.
//!
//! The public JWK is written to `<production|staging>/<name>.jwk.jsonc`; the
//! private key is printed to the console and must be stored securely by the
//! caller.

use clap::{ArgAction, CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use jwks_tools::keygen::KeygenService;
use jwks_tools::ui::UI;
use jwks_tools::version::CURRENT_VERSION;
use jwks_tools::Environment;

#[derive(Parser)]
#[command(
    name = "jwks-gen",
    about = "Generate an EC P-384 signing key pair and store the public JWK",
    long_about = "Generates a new EC P-384 signing key pair. The public JWK is written to \
<production|staging>/<name>.jwk.jsonc under the current directory; the private key is \
printed to the console and must be stored securely by the caller.\n\n\
--production takes precedence over --staging whenever it is set; staging is the \
default target. Pass --staging=false without --production to get an explicit \
\"no environment\" error.",
    version = CURRENT_VERSION,
)]
struct Cli {
    /// Filename stem and key-identifier component for the new key
    name: Option<String>,

    /// Free-text comment stored as a `//` line at the top of the key file
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    comment: Vec<String>,

    /// Save key for production environment (Default: false)
    #[arg(short, long)]
    production: bool,

    /// Save key for staging environment (Default: true, if --production is not set)
    #[arg(
        short,
        long,
        default_value_t = true,
        action = ArgAction::Set,
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    staging: bool,

    /// Force overwrite existing key
    #[arg(short, long)]
    force: bool,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let ui = UI::new();

    let Some(name) = cli.name else {
        let _ = Cli::command().print_help();
        std::process::exit(1);
    };

    let environment = if cli.production {
        Environment::Production
    } else if cli.staging {
        Environment::Staging
    } else {
        ui.error("Please specify either --production or --staging");
        std::process::exit(1);
    };

    let base_dir = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            ui.error(&format!("Error: {}", e));
            std::process::exit(1);
        }
    };

    let comment = cli.comment.join(" ");
    let comment = (!comment.is_empty()).then_some(comment);

    let service = KeygenService::new(base_dir);
    let stored = match service
        .generate(environment, &name, comment.as_deref(), cli.force)
        .await
    {
        Ok(stored) => stored,
        Err(e) => {
            ui.error(&format!("Error: {}", e));
            std::process::exit(1);
        }
    };

    if stored.overwrote {
        ui.warning(&format!(
            "Warning: Overwriting existing JWK with name {} (--force is set)",
            name
        ));
    }

    let private = match serde_json::to_string(&stored.key.private) {
        Ok(json) => json,
        Err(e) => {
            ui.error(&format!("Error: {}", e));
            std::process::exit(1);
        }
    };

    ui.label("Private Key:");
    ui.plain(&private);
    ui.danger("DO NOT SHARE WITH ANYONE!!");
}
