//! Per-record extraction-and-upload pipeline
//!
//! # States
//! `Parsed → Fetched → Eligible → Derived → Uploaded → Annotated → Logged`
//!
//! The first failing step ends the record with a [`PipelineError`], which is
//! written to the error log as `<id>,<reason>`. A failure never leaves this
//! module: [`Pipeline::process_line`] always returns a [`RecordOutcome`].
//!
//! # Error Handling
//! - Client errors are traced with their detail and reduced to the record's
//!   reason (`bad API response`, `extension error`, ...)
//! - Log write failures are traced and swallowed

use super::{RecordOutcome, RecordState};
use crate::categories::{annotate_page, compose_categories};
use crate::config::{UploaderConfig, ANNOTATION_SUMMARY};
use crate::eligibility::check_eligibility;
use crate::error::PipelineError;
use crate::metadata::{
    build_upload_descriptor, derive_fields, derive_filename, extension_from_content_type,
    file_page_title,
};
use crate::models::CollectionMetadata;
use crate::record::{parse_line, InputRecord};
use crate::services::{CollectionSource, MediaProbe, MediaRepository};
use rijks_common::{AppendLog, LogEntry};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Pipeline orchestrator for one record at a time
///
/// Cheap to share: every collaborator sits behind an `Arc`, so one pipeline
/// serves all concurrent records of a batch.
pub struct Pipeline {
    config: Arc<UploaderConfig>,
    collection: Arc<dyn CollectionSource>,
    media: Arc<dyn MediaProbe>,
    repository: Arc<dyn MediaRepository>,
    status_log: Arc<AppendLog>,
    error_log: Arc<AppendLog>,
}

impl Pipeline {
    pub fn new(
        config: Arc<UploaderConfig>,
        collection: Arc<dyn CollectionSource>,
        media: Arc<dyn MediaProbe>,
        repository: Arc<dyn MediaRepository>,
        status_log: Arc<AppendLog>,
        error_log: Arc<AppendLog>,
    ) -> Self {
        Self {
            config,
            collection,
            media,
            repository,
            status_log,
            error_log,
        }
    }

    pub fn config(&self) -> &UploaderConfig {
        &self.config
    }

    pub fn status_log(&self) -> &AppendLog {
        &self.status_log
    }

    /// Run one raw input line through the whole pipeline
    pub async fn process_line(&self, line: &str) -> RecordOutcome {
        let record = parse_line(line);
        trace_state(&record.collection_id, RecordState::Parsed);
        self.process_record(record).await
    }

    pub async fn process_record(&self, record: InputRecord) -> RecordOutcome {
        match self.run(&record).await {
            Ok(()) => {
                self.append_or_warn(&self.status_log, &LogEntry::done(&record.collection_id))
                    .await;
                trace_state(&record.collection_id, RecordState::Logged);
                info!(collection_id = %record.collection_id, "Record uploaded");
                RecordOutcome::Done {
                    collection_id: record.collection_id,
                }
            }
            Err(reason) => {
                self.record_failure(&record.collection_id, &reason).await;
                RecordOutcome::Failed {
                    collection_id: record.collection_id,
                    reason,
                }
            }
        }
    }

    /// Write `<id>,<reason>` (or `<reason>`) to the error log
    pub async fn record_failure(&self, collection_id: &str, reason: &PipelineError) {
        warn!(collection_id = %collection_id, reason = %reason, "Record failed");
        let entry = LogEntry::error(collection_id, &reason.to_string());
        self.append_or_warn(&self.error_log, &entry).await;
    }

    async fn run(&self, record: &InputRecord) -> Result<(), PipelineError> {
        let id = record.collection_id.as_str();

        let metadata = self.fetch_metadata(id).await?;
        trace_state(id, RecordState::Fetched);

        if let Err(ineligibility) = check_eligibility(&metadata) {
            debug!(collection_id = %id, reason = %ineligibility, "Object not eligible");
            return Err(PipelineError::Ineligible);
        }
        trace_state(id, RecordState::Eligible);

        // Eligibility guarantees a non-empty URL
        let media_url = metadata.media_url().ok_or(PipelineError::Ineligible)?;

        let fields = derive_fields(&metadata, id);
        let extension = self.media_extension(id, media_url).await?;
        let filename = derive_filename(&fields.title, &extension);
        let descriptor = build_upload_descriptor(
            &fields,
            filename,
            media_url,
            &record.source,
            &self.config.author,
            &self.config.upload_comment,
        );
        trace_state(id, RecordState::Derived);

        let credentials = &self.config.credentials;
        self.repository
            .login(&credentials.username, &credentials.password)
            .await
            .map_err(|e| PipelineError::Login(e.to_string()))?;
        self.repository
            .upload(&descriptor)
            .await
            .map_err(|e| PipelineError::Upload(e.to_string()))?;
        trace_state(id, RecordState::Uploaded);

        self.annotate(&file_page_title(&descriptor.filename), &metadata)
            .await?;
        trace_state(id, RecordState::Annotated);

        Ok(())
    }

    async fn fetch_metadata(&self, id: &str) -> Result<CollectionMetadata, PipelineError> {
        let response = self.collection.fetch_object(id).await.map_err(|e| {
            debug!(collection_id = %id, error = %e, "Collection API request failed");
            PipelineError::BadApiResponse
        })?;

        response.art_object.ok_or(PipelineError::ArtObjectMissing)
    }

    async fn media_extension(&self, id: &str, media_url: &str) -> Result<String, PipelineError> {
        let content_type = self.media.content_type(media_url).await.map_err(|e| {
            debug!(collection_id = %id, error = %e, "Media probe failed");
            PipelineError::Extension
        })?;

        content_type
            .as_deref()
            .and_then(extension_from_content_type)
            .ok_or_else(|| {
                debug!(collection_id = %id, content_type = ?content_type, "No usable content type");
                PipelineError::Extension
            })
    }

    /// Append license section and categories to the uploaded file's page
    async fn annotate(&self, page_title: &str, metadata: &CollectionMetadata) -> Result<(), PipelineError> {
        let existing = self
            .repository
            .page(page_title)
            .await
            .map_err(|e| PipelineError::PageFetch(e.to_string()))?;

        let categories = compose_categories(metadata, &self.config.attribution_category);
        let content = annotate_page(&existing, &categories, &self.config.license);

        self.repository
            .edit_page(page_title, &content, ANNOTATION_SUMMARY)
            .await
            .map_err(|e| PipelineError::Edit(e.to_string()))
    }

    async fn append_or_warn(&self, log: &AppendLog, entry: &LogEntry) {
        if let Err(e) = log.append(entry).await {
            warn!(path = %log.path().display(), error = %e, "Log write failed");
        }
    }
}

fn trace_state(collection_id: &str, state: RecordState) {
    debug!(collection_id = %collection_id, state = ?state, "Record state");
}
