//! Record workflow
//!
//! - [`pipeline`]: one record from input line to status/error log entry
//! - [`batch`]: concurrent fan-out of a whole input list

pub mod batch;
pub mod pipeline;

pub use batch::BatchRunner;
pub use pipeline::Pipeline;

use crate::error::PipelineError;

/// Progress of one record through the pipeline, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordState {
    Parsed,
    Fetched,
    Eligible,
    Derived,
    Uploaded,
    Annotated,
    Logged,
}

/// Final result of one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    Done {
        collection_id: String,
    },
    Failed {
        collection_id: String,
        reason: PipelineError,
    },
}

impl RecordOutcome {
    pub fn collection_id(&self) -> &str {
        match self {
            RecordOutcome::Done { collection_id } | RecordOutcome::Failed { collection_id, .. } => {
                collection_id
            }
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, RecordOutcome::Done { .. })
    }
}

/// Totals of one batch run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub done: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn record(&mut self, outcome: &RecordOutcome) {
        self.total += 1;
        if outcome.is_done() {
            self.done += 1;
        } else {
            self.failed += 1;
        }
    }
}
