//! rijks-upload - Rijksmuseum → Wikimedia Commons batch uploader
//!
//! Reads `collectionID,source` lines, fetches each object from the
//! Rijksmuseum collection API and uploads eligible public-domain images with
//! description, date, license and categories. Completed records go to the
//! status log, failed ones to the error log.

use anyhow::{Context, Result};
use clap::Parser;
use rijks_common::config::{load_or_default, resolve_config_path, write_toml_config};
use rijks_common::{AppendLog, LogEntry};
use rijks_upload::config::{starter_toml, ConfigOverrides};
use rijks_upload::{build_pipeline, BatchError, BatchRunner, UploaderConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

const APP_NAME: &str = "rijks-upload";

/// Command-line arguments for rijks-upload
#[derive(Parser, Debug)]
#[command(name = "rijks-upload")]
#[command(about = "Upload public-domain Rijksmuseum images to Wikimedia Commons")]
#[command(version)]
struct Args {
    /// TOML config file
    #[arg(short, long, env = "RIJKS_CONFIG")]
    config: Option<PathBuf>,

    /// Input list of `collectionID,source` lines
    #[arg(short, long, env = "RIJKS_INPUT_FILE")]
    input: Option<PathBuf>,

    /// Status log (completed records)
    #[arg(long, env = "RIJKS_STATUS_LOG")]
    status_log: Option<PathBuf>,

    /// Error log (failed records)
    #[arg(long, env = "RIJKS_ERROR_LOG")]
    error_log: Option<PathBuf>,

    /// Rijksmuseum API key
    #[arg(long, env = "RIJKS_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Wiki user name (bot password user)
    #[arg(long, env = "WIKI_USERNAME")]
    wiki_username: Option<String>,

    /// Wiki password
    #[arg(long, env = "WIKI_PASSWORD", hide_env_values = true)]
    wiki_password: Option<String>,

    /// MediaWiki Action API URL
    #[arg(long, env = "WIKI_API_URL")]
    wiki_api: Option<String>,

    /// Maximum number of records processed at the same time
    #[arg(long, env = "RIJKS_CONCURRENCY")]
    concurrency: Option<usize>,

    /// Append `ALL,DONE` to the status log when the batch finishes
    #[arg(long)]
    batch_marker: bool,

    /// Write a starter config file to this path and exit
    #[arg(long, value_name = "PATH")]
    write_config: Option<PathBuf>,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            input_file: self.input.clone(),
            status_log: self.status_log.clone(),
            error_log: self.error_log.clone(),
            api_key: self.api_key.clone(),
            wiki_username: self.wiki_username.clone(),
            wiki_password: self.wiki_password.clone(),
            wiki_api_url: self.wiki_api.clone(),
            concurrency: self.concurrency,
            batch_marker: self.batch_marker,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Credentials may live in a .env file next to the input list
    let dotenv_path = dotenvy::dotenv().ok();

    let args = Args::parse();

    if let Some(path) = &args.write_config {
        write_toml_config(&starter_toml(), path)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        println!("Wrote starter config to {}", path.display());
        return Ok(());
    }

    let config_path = resolve_config_path(args.config.as_deref(), APP_NAME)?;
    let toml_config = load_or_default(config_path.as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&toml_config.logging.level)),
        )
        .init();

    info!(
        "Starting rijks-upload v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    if let Some(path) = &dotenv_path {
        info!("Environment file: {}", path.display());
    }
    match &config_path {
        Some(path) => info!("Config file: {}", path.display()),
        None => info!("No config file, using command line/environment and defaults"),
    }

    let config = UploaderConfig::resolve(args.overrides(), &toml_config)
        .context("Invalid configuration")?;

    info!("Input list: {}", config.input_file.display());
    info!("Status log: {}", config.status_log.display());
    info!("Error log: {}", config.error_log.display());
    info!("Wiki API: {}", config.wiki_api_url);

    let input_file = config.input_file.clone();
    let error_log_path = config.error_log.clone();

    let pipeline = Arc::new(build_pipeline(config).context("Failed to initialize clients")?);
    let runner = BatchRunner::new(pipeline);

    match runner.run_file(&input_file).await {
        Ok(summary) => {
            info!(
                "Finished: {} records, {} done, {} failed",
                summary.total, summary.done, summary.failed
            );
        }
        Err(BatchError::BadInput(msg)) => {
            error!("Input list unreadable: {}", msg);
            let entry = LogEntry::error("", &BatchError::BadInput(msg).to_string());
            if let Err(e) = AppendLog::new(error_log_path).append(&entry).await {
                warn!("Error log write failed: {}", e);
            }
        }
    }

    Ok(())
}
