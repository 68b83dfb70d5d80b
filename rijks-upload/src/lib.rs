//! rijks-upload library interface
//!
//! Batch uploader from the Rijksmuseum collection API to a MediaWiki media
//! repository (Wikimedia Commons). Exposes the per-record pipeline and its
//! building blocks for the binary and for integration testing.

pub mod categories;
pub mod config;
pub mod eligibility;
pub mod error;
pub mod metadata;
pub mod models;
pub mod record;
pub mod services;
pub mod workflow;

pub use crate::config::UploaderConfig;
pub use crate::error::{BatchError, PipelineError};
pub use crate::workflow::{BatchRunner, BatchSummary, Pipeline, RecordOutcome, RecordState};

use crate::services::{CommonsClient, RijksmuseumClient};
use rijks_common::AppendLog;
use std::sync::Arc;

/// Wire the production clients and logs into a pipeline
pub fn build_pipeline(config: UploaderConfig) -> anyhow::Result<Pipeline> {
    let rijksmuseum = Arc::new(RijksmuseumClient::new(
        &config.metadata_endpoint,
        config.api_key.clone(),
        config.request_timeout,
    )?);
    let commons = Arc::new(CommonsClient::new(&config.wiki_api_url, config.request_timeout)?);
    let status_log = Arc::new(AppendLog::new(&config.status_log));
    let error_log = Arc::new(AppendLog::new(&config.error_log));

    Ok(Pipeline::new(
        Arc::new(config),
        rijksmuseum.clone(),
        rijksmuseum,
        commons,
        status_log,
        error_log,
    ))
}
