//! Runtime configuration for rijks-upload
//!
//! Every value resolves with the priority:
//! 1. Command-line argument or environment variable (clap handles both)
//! 2. TOML config file
//! 3. Built-in default
//!
//! Secrets (API key, wiki credentials) have no default and must resolve to a
//! non-empty value.

use crate::categories::{LicenseSection, DEFAULT_ATTRIBUTION_CATEGORY, DEFAULT_LICENSE_TEMPLATE};
use crate::services::commons_client::DEFAULT_WIKI_API_URL;
use crate::services::rijksmuseum_client::DEFAULT_METADATA_ENDPOINT;
use rijks_common::config::TomlConfig;
use rijks_common::{Error, Result};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

pub const DEFAULT_INPUT_FILE: &str = "data.csv";
pub const DEFAULT_STATUS_LOG: &str = "status.txt";
pub const DEFAULT_ERROR_LOG: &str = "err.txt";
pub const DEFAULT_AUTHOR: &str = "[[w:Rijksmuseum|Rijksmuseum]]";
pub const DEFAULT_UPLOAD_COMMENT: &str = "bot upload using API";
pub const DEFAULT_CONCURRENCY: usize = 8;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Edit summary of the license/category annotation
pub const ANNOTATION_SUMMARY: &str = "Adding license and categories";

/// Values given on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub input_file: Option<PathBuf>,
    pub status_log: Option<PathBuf>,
    pub error_log: Option<PathBuf>,
    pub api_key: Option<String>,
    pub wiki_username: Option<String>,
    pub wiki_password: Option<String>,
    pub wiki_api_url: Option<String>,
    pub concurrency: Option<usize>,
    pub batch_marker: bool,
}

/// Wiki account used for uploads
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Fully resolved uploader configuration
#[derive(Debug, Clone)]
pub struct UploaderConfig {
    pub input_file: PathBuf,
    pub status_log: PathBuf,
    pub error_log: PathBuf,
    pub metadata_endpoint: String,
    pub wiki_api_url: String,
    pub api_key: String,
    pub credentials: Credentials,
    pub concurrency: usize,
    pub request_timeout: Duration,
    pub author: String,
    pub upload_comment: String,
    pub license: LicenseSection,
    pub attribution_category: String,
    pub batch_marker: bool,
}

impl UploaderConfig {
    /// Merge overrides, TOML values and defaults
    pub fn resolve(overrides: ConfigOverrides, toml: &TomlConfig) -> Result<Self> {
        let api_key = resolve_secret("API key", overrides.api_key, toml.api_key.clone())?;
        let username = resolve_secret("wiki username", overrides.wiki_username, toml.wiki_username.clone())?;
        let password = resolve_secret("wiki password", overrides.wiki_password, toml.wiki_password.clone())?;

        let concurrency = overrides
            .concurrency
            .or(toml.concurrency)
            .unwrap_or(DEFAULT_CONCURRENCY);
        if concurrency == 0 {
            return Err(Error::Config("concurrency must be at least 1".to_string()));
        }

        Ok(Self {
            input_file: overrides
                .input_file
                .or_else(|| toml.input_file.clone())
                .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT_FILE)),
            status_log: overrides
                .status_log
                .or_else(|| toml.status_log.clone())
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STATUS_LOG)),
            error_log: overrides
                .error_log
                .or_else(|| toml.error_log.clone())
                .unwrap_or_else(|| PathBuf::from(DEFAULT_ERROR_LOG)),
            metadata_endpoint: toml
                .metadata_endpoint
                .clone()
                .unwrap_or_else(|| DEFAULT_METADATA_ENDPOINT.to_string()),
            wiki_api_url: overrides
                .wiki_api_url
                .or_else(|| toml.wiki_api_url.clone())
                .unwrap_or_else(|| DEFAULT_WIKI_API_URL.to_string()),
            api_key,
            credentials: Credentials { username, password },
            concurrency,
            request_timeout: Duration::from_secs(
                toml.request_timeout_secs.unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
            ),
            author: toml.author.clone().unwrap_or_else(|| DEFAULT_AUTHOR.to_string()),
            upload_comment: toml
                .upload_comment
                .clone()
                .unwrap_or_else(|| DEFAULT_UPLOAD_COMMENT.to_string()),
            license: LicenseSection {
                template: toml
                    .license_template
                    .clone()
                    .unwrap_or_else(|| DEFAULT_LICENSE_TEMPLATE.to_string()),
                review: toml.license_review.unwrap_or(false),
            },
            attribution_category: toml
                .attribution_category
                .clone()
                .unwrap_or_else(|| DEFAULT_ATTRIBUTION_CATEGORY.to_string()),
            batch_marker: overrides.batch_marker || toml.batch_marker.unwrap_or(false),
        })
    }
}

/// Config file with every non-secret value set to its default
pub fn starter_toml() -> TomlConfig {
    TomlConfig {
        input_file: Some(PathBuf::from(DEFAULT_INPUT_FILE)),
        status_log: Some(PathBuf::from(DEFAULT_STATUS_LOG)),
        error_log: Some(PathBuf::from(DEFAULT_ERROR_LOG)),
        metadata_endpoint: Some(DEFAULT_METADATA_ENDPOINT.to_string()),
        wiki_api_url: Some(DEFAULT_WIKI_API_URL.to_string()),
        concurrency: Some(DEFAULT_CONCURRENCY),
        request_timeout_secs: Some(DEFAULT_REQUEST_TIMEOUT_SECS),
        author: Some(DEFAULT_AUTHOR.to_string()),
        upload_comment: Some(DEFAULT_UPLOAD_COMMENT.to_string()),
        license_template: Some(DEFAULT_LICENSE_TEMPLATE.to_string()),
        license_review: Some(false),
        attribution_category: Some(DEFAULT_ATTRIBUTION_CATEGORY.to_string()),
        batch_marker: Some(false),
        ..Default::default()
    }
}

/// Validate secret (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

fn resolve_secret(name: &str, cli_or_env: Option<String>, toml: Option<String>) -> Result<String> {
    let cli_or_env = cli_or_env.filter(|v| is_valid_key(v));
    let toml = toml.filter(|v| is_valid_key(v));

    if cli_or_env.is_some() && toml.is_some() {
        warn!(
            "{} found in both command line/environment and TOML config. Using command line/environment.",
            name
        );
    }

    if let Some(value) = cli_or_env {
        info!("{} loaded from command line/environment", name);
        return Ok(value);
    }
    if let Some(value) = toml {
        info!("{} loaded from TOML config", name);
        return Ok(value);
    }

    Err(Error::Config(format!(
        "{} not configured. Please configure using one of:\n\
         1. Command line: rijks-upload --help\n\
         2. Environment: RIJKS_API_KEY, WIKI_USERNAME, WIKI_PASSWORD (a .env file is read)\n\
         3. TOML config: ~/.config/rijks-upload/config.toml",
        name
    )))
}
