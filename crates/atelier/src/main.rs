//! Atelier CLI binary.
//!
//! This binary provides command-line access to the asset store:
//! - Ingest local files or remote URLs, optionally as images
//! - Generate named image variants
//! - Resolve URLs, show sanitised records and remove assets

use atelier::{Atelier, AtelierConfig, JsonFileRepository, ObservabilityConfig, init_observability};
use clap::Parser;
use std::sync::Arc;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, run_command};

    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AtelierConfig::from_file(path)?,
        None => AtelierConfig::load()?,
    };

    // Initialize tracing
    let log_level = if cli.verbose {
        "debug".to_string()
    } else {
        config.log_level.clone()
    };
    init_observability(&ObservabilityConfig::new(log_level).with_json_logs(config.json_logs))?;

    let repository = Arc::new(JsonFileRepository::new(&config.records_dir)?);
    let atelier = Atelier::new(&config, repository)?;

    // Execute the requested command
    run_command(&atelier, cli.command).await?;

    Ok(())
}
