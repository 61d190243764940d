//! autopub - publish Android APKs and app bundles to Google Play.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use autopub_cli::config::PublisherConfig;

#[derive(Parser, Debug)]
#[command(name = "autopub", version, about = "Publish Android release artifacts")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Publish the artifacts described by a config file
    Publish {
        /// Path to the publisher config
        #[arg(short, long, default_value = "autopub.toml")]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Publish { config } => publish(&config).await,
    }
}

async fn publish(config_path: &Path) -> Result<()> {
    let config = PublisherConfig::load(config_path)?;

    // Relative paths in the config resolve against its directory
    let root = config_path.parent().unwrap_or(Path::new("."));
    let request = config.into_request(root)?;

    let publisher = autopub_core::publisher::get_publisher(&request.credentials, request.timeout)?;
    publisher.publish(&request).await?;

    println!(
        "Published {} artifact(s) of {} to the '{}' track.",
        request.artifacts.len(),
        request.application_id,
        request.release_track.name()
    );
    Ok(())
}
