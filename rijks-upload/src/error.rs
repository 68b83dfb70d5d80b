//! Error types for rijks-upload
//!
//! Per-record failures are [`PipelineError`]s. They are caught at the pipeline
//! boundary and become one error-log line each; they never reach the batch
//! runner. [`BatchError`] is the only failure that aborts a whole run.

use thiserror::Error;

/// Failure of one record's pipeline
///
/// The `Display` text is the reason written to the error log.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PipelineError {
    /// Metadata request failed or returned an unusable body
    #[error("bad API response")]
    BadApiResponse,

    /// Response envelope without an object
    #[error("art object missing")]
    ArtObjectMissing,

    /// Copyrighted, or no image to upload
    #[error("copyrighted or missing image")]
    Ineligible,

    /// Media content type missing or unusable
    #[error("extension error")]
    Extension,

    #[error("login failed: {0}")]
    Login(String),

    #[error("upload failed: {0}")]
    Upload(String),

    #[error("page fetch failed: {0}")]
    PageFetch(String),

    #[error("edit failed: {0}")]
    Edit(String),

    /// The record's task panicked
    #[error("internal error: {0}")]
    TaskPanicked(String),
}

/// Failure of a whole batch
#[derive(Debug, Error)]
pub enum BatchError {
    /// Input list could not be read
    #[error("CSV read error: {0}")]
    BadInput(String),
}
