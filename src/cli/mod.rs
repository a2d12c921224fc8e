//! CLI module for the Flower Data Science service
//!
//! - `serve`: HTTP API server
//! - `train`: fit the Iris model once and print the artifact path
//! - `evaluate`: score the persisted model on the test partition

pub mod pipeline;
pub mod serve;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// Flower Data Science - dataset catalog, Iris classifier and auth API
#[derive(Parser)]
#[command(name = "flower-data-science")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server (default)
    Serve,

    /// Train the model and write the artifact
    Train,

    /// Print the accuracy of the persisted model
    Evaluate,
}

/// Load `.env`, configuration and logging shared by every command
pub(crate) fn bootstrap() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    logging::init_logging(&config.logging);

    Ok(config)
}
