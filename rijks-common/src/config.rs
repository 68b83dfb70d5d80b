//! Bootstrap configuration file loading and writing
//!
//! The TOML file is optional. Every field is optional as well; values missing
//! from the file fall back to command-line/environment values or built-in
//! defaults in the consuming binary.
//!
//! Config file discovery order:
//! 1. Explicit path (command-line argument)
//! 2. `<platform config dir>/<app>/config.toml`
//! 3. `./<app>.toml` in the working directory

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Bootstrap configuration loaded from TOML file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Input list of `collectionID,source` lines
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_file: Option<PathBuf>,

    /// Append-only log of completed records
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_log: Option<PathBuf>,

    /// Append-only log of failed records
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_log: Option<PathBuf>,

    /// Collection API base URL (object number is appended)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata_endpoint: Option<String>,

    /// MediaWiki Action API URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wiki_api_url: Option<String>,

    /// Collection API key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Wiki account (bot password user name)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wiki_username: Option<String>,

    /// Wiki account password
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wiki_password: Option<String>,

    /// Maximum number of records processed at the same time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concurrency: Option<usize>,

    /// HTTP request timeout in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,

    /// Author field of uploaded files
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    /// Edit summary used for uploads
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_comment: Option<String>,

    /// License template placed under the license header
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_template: Option<String>,

    /// Add `{{LicenseReview}}` below the license template
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_review: Option<bool>,

    /// Category added to every uploaded file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribution_category: Option<String>,

    /// Append `ALL,DONE` to the status log when a batch finishes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_marker: Option<bool>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Resolve which config file to read, if any
///
/// An explicit path must exist. Discovered paths are only returned when present.
pub fn resolve_config_path(cli_arg: Option<&Path>, app_name: &str) -> Result<Option<PathBuf>> {
    if let Some(path) = cli_arg {
        if path.exists() {
            return Ok(Some(path.to_path_buf()));
        }
        return Err(Error::Config(format!(
            "Config file not found: {}",
            path.display()
        )));
    }

    if let Some(user_config) = user_config_path(app_name) {
        if user_config.exists() {
            return Ok(Some(user_config));
        }
    }

    let local_config = PathBuf::from(format!("{}.toml", app_name));
    if local_config.exists() {
        return Ok(Some(local_config));
    }

    debug!("No config file found for {}", app_name);
    Ok(None)
}

/// Platform config file location (`~/.config/<app>/config.toml` on Linux)
pub fn user_config_path(app_name: &str) -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(app_name).join("config.toml"))
}

/// Load and parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read TOML failed ({}): {}", path.display(), e)))?;
    let config = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse TOML failed ({}): {}", path.display(), e)))?;
    info!("Loaded config file: {}", path.display());
    Ok(config)
}

/// Load the config file at `path`, or built-in defaults when there is none
pub fn load_or_default(path: Option<&Path>) -> Result<TomlConfig> {
    match path {
        Some(path) => load_toml_config(path),
        None => Ok(TomlConfig::default()),
    }
}

/// Write config atomically (temp file + rename)
///
/// The file may hold credentials, so on Unix it is created with mode 0600.
pub fn write_toml_config(config: &TomlConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Serialize TOML failed: {}", e)))?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut temp_name = path.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = PathBuf::from(temp_name);

    std::fs::write(&temp_path, content)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&temp_path, std::fs::Permissions::from_mode(0o600))?;
    }

    if let Err(e) = std::fs::rename(&temp_path, path) {
        let _ = std::fs::remove_file(&temp_path);
        return Err(e.into());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_defaults_to_info() {
        let config: TomlConfig = toml::from_str("").unwrap();
        assert_eq!(config.logging.level, "info");
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_parse_partial_config() {
        let config: TomlConfig = toml::from_str(
            r#"
            input_file = "data.csv"
            concurrency = 4
            license_review = true

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.input_file, Some(PathBuf::from("data.csv")));
        assert_eq!(config.concurrency, Some(4));
        assert_eq!(config.license_review, Some(true));
        assert_eq!(config.logging.level, "debug");
        assert!(config.wiki_api_url.is_none());
    }

    #[test]
    fn test_unknown_level_kept_verbatim() {
        let config: TomlConfig = toml::from_str("[logging]\nlevel = \"rijks_upload=trace\"").unwrap();
        assert_eq!(config.logging.level, "rijks_upload=trace");
    }
}
