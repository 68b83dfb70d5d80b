//! Batch runner
//!
//! Reads the input list and runs every record through the [`Pipeline`] as a
//! concurrent fan-out, awaiting all of them before returning.
//!
//! # Architecture
//! - Up to `concurrency` records in flight via `futures::stream::buffer_unordered`
//! - Each record runs on its own spawned task; a panic becomes a failed
//!   record with an error-log line, siblings keep running
//! - No ordering between records
//! - Only an unreadable input list fails the batch, before any dispatch

use super::{BatchSummary, Pipeline, RecordOutcome};
use crate::error::{BatchError, PipelineError};
use crate::record::{parse_line, read_input_lines};
use futures::stream::{self, StreamExt};
use rijks_common::LogEntry;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn, Instrument};
use uuid::Uuid;

/// Fans out input records over a shared pipeline
pub struct BatchRunner {
    pipeline: Arc<Pipeline>,
    concurrency: usize,
    batch_marker: bool,
}

impl BatchRunner {
    pub fn new(pipeline: Arc<Pipeline>) -> Self {
        let concurrency = pipeline.config().concurrency.max(1);
        let batch_marker = pipeline.config().batch_marker;
        Self {
            pipeline,
            concurrency,
            batch_marker,
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Read the input list at `path` and process every line
    pub async fn run_file(&self, path: &Path) -> Result<BatchSummary, BatchError> {
        let lines = read_input_lines(path).await?;
        info!(input = %path.display(), records = lines.len(), "Input list loaded");
        Ok(self.run_lines(lines).await)
    }

    /// Process already-read input lines
    pub async fn run_lines(&self, lines: Vec<String>) -> BatchSummary {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("batch", run_id = %run_id);
        self.dispatch(lines).instrument(span).await
    }

    async fn dispatch(&self, lines: Vec<String>) -> BatchSummary {
        let total = lines.len();
        info!(records = total, concurrency = self.concurrency, "Batch started");

        let outcomes: Vec<RecordOutcome> = stream::iter(lines)
            .map(|line| {
                let pipeline = Arc::clone(&self.pipeline);
                let span = tracing::Span::current();
                async move {
                    let collection_id = parse_line(&line).collection_id;
                    let task_pipeline = Arc::clone(&pipeline);
                    let handle = tokio::spawn(
                        async move { task_pipeline.process_line(&line).await }.instrument(span),
                    );

                    match handle.await {
                        Ok(outcome) => outcome,
                        Err(e) => {
                            let reason = PipelineError::TaskPanicked(e.to_string());
                            pipeline.record_failure(&collection_id, &reason).await;
                            RecordOutcome::Failed {
                                collection_id,
                                reason,
                            }
                        }
                    }
                }
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        let mut summary = BatchSummary::default();
        for outcome in &outcomes {
            summary.record(outcome);
        }

        if self.batch_marker {
            let marker = LogEntry::new(["ALL", "DONE"]);
            if let Err(e) = self.pipeline.status_log().append(&marker).await {
                warn!(error = %e, "Batch marker write failed");
            }
        }

        info!(
            total = summary.total,
            done = summary.done,
            failed = summary.failed,
            "Batch completed"
        );

        summary
    }
}
