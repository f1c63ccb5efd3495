//! tracklead agent entry point.
//!
//! ```text
//! tracklead-agent                  Run in the foreground
//! tracklead-agent --config <path>  Load a custom config TOML
//! tracklead-agent --gen-config     Write default config to stdout
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use tracklead_agent::config::AgentConfig;
use tracklead_agent::service::AgentService;
use tracklead_core::TrackError;

// ── CLI ──────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "tracklead-agent", about = "Target tracking and mouse actuation agent")]
struct Cli {
    /// Path to configuration TOML file.
    #[arg(short, long, default_value = "tracklead.toml")]
    config: PathBuf,

    /// Print the default configuration to stdout and exit.
    #[arg(long)]
    gen_config: bool,
}

// ── Main ─────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.gen_config {
        let text = toml::to_string_pretty(&AgentConfig::default())?;
        println!("{text}");
        return Ok(());
    }

    let config = AgentConfig::load(&cli.config);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("tracklead-agent v{}", env!("CARGO_PKG_VERSION"));
    info!("detection ingest: {}", config.network.listen);
    info!(
        "window: {}x{}",
        config.detection.window_width, config.detection.window_height
    );
    info!("backend: {:?}", config.backend.kind);
    info!("movement model: {:?}", config.movement.model);

    let service = AgentService::new(config, cli.config.clone());
    let stop = service.stop_handle();

    let stop_clone = stop.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Ctrl-C received, shutting down");
        stop_clone.store(false, std::sync::atomic::Ordering::SeqCst);
    });

    match service.run().await {
        Ok(()) => Ok(()),
        Err(e @ TrackError::ModelArtifact { .. }) => {
            error!("{e}");
            eprintln!("The learned movement model needs a valid weights artifact.");
            eprintln!("Set [movement] artifact to an existing file or use model = \"analytic\".");
            std::process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}
