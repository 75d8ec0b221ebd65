//! Fatal error taxonomy for a deliberation run
//!
//! Per-call failures never show up here; they are recorded inside the
//! stage results. These variants are the conditions that end a run.

use council_llm::LlmError;
use thiserror::Error;

use crate::observer::ObserverError;
use crate::types::{LabelAssignment, Stage, StageOneOutcome, StageTwoOutcome};

/// A run-ending condition.
///
/// `SynthesisFailed` carries everything the first two stages produced so
/// callers can still inspect and display it for diagnostics.
#[derive(Debug, Error)]
pub enum DeliberationError {
    /// Every stage-1 call failed; stages 2 and 3 were never dispatched.
    #[error("no council models responded in stage 1 (responses)")]
    NoResponses { stage1: Vec<StageOneOutcome> },

    /// The single chairman call failed after stages 1 and 2 completed.
    #[error("chairman synthesis failed in stage 3: {source}")]
    SynthesisFailed {
        stage1: Vec<StageOneOutcome>,
        labels: LabelAssignment,
        stage2: StageTwoOutcome,
        #[source]
        source: LlmError,
    },

    /// The run was cancelled at a suspension point; in-flight results
    /// were discarded and no partial bundle exists.
    #[error("deliberation cancelled")]
    Cancelled,

    /// A progress observer returned an error; observer failures are not
    /// suppressed or retried.
    #[error("progress observer failed after {stage}: {source}")]
    Observer {
        stage: Stage,
        #[source]
        source: ObserverError,
    },
}
