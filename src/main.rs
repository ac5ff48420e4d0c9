use std::path::PathBuf;

use clap::Parser;
use tokio::signal;
use tracing::{error, info};

use assetsrates::app::App;
use assetsrates::config::Config;

/// Real-time asset rates streaming service.
#[derive(Debug, Parser)]
#[command(name = "assetsrates", version, about)]
struct Cli {
    /// Host interface to bind.
    #[arg(short = 'H', long)]
    host: Option<String>,

    /// Port to listen on.
    #[arg(short = 'P', long)]
    port: Option<u16>,

    /// Path to the TOML config file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {e}");
            std::process::exit(1);
        }
    };
    let config = config.with_cli_overrides(cli.host, cli.port);

    config.init_logging();
    info!("assetsrates starting");

    tokio::select! {
        result = App::run(config) => {
            if let Err(e) = result {
                error!(error = %e, "Fatal error");
                std::process::exit(1);
            }
        }
        _ = signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
    }

    info!("assetsrates stopped");
}
