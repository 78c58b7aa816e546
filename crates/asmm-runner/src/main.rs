//! ASMM backtest - entry point.

use anyhow::Result;
use asmm_runner::{app::write_result, AppConfig, Application};
use clap::Parser;
use tracing::info;

/// Avellaneda-Stoikov market-making backtest over a synthetic feed
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via ASMM_CONFIG env var)
    #[arg(short, long)]
    config: Option<String>,

    /// Override the configured seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// Write the full result as JSON to this path
    #[arg(short, long)]
    output: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    asmm_telemetry::init_logging()?;

    info!("Starting ASMM backtest v{}", env!("CARGO_PKG_VERSION"));

    // CLI arg > ASMM_CONFIG > config/default.toml > built-in defaults
    let mut config = match args.config {
        Some(path) => {
            info!(config_path = %path, "Loading configuration");
            AppConfig::from_file(&path)?
        }
        None => AppConfig::load()?,
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    info!(seed = config.seed, steps = config.feed.steps, "Configuration loaded");

    let app = Application::new(config)?;
    let result = app.run()?;

    if let Some(path) = args.output {
        write_result(&result, &path)?;
    }

    Ok(())
}
