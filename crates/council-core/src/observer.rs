//! Progress observer seam
//!
//! One method per stage transition, invoked synchronously on the
//! orchestrator's task immediately after that stage's join barrier, with
//! an immutable snapshot of the stage's results. Implementations must not
//! assume they run on a separate thread or task.

use thiserror::Error;

use crate::types::{ChairmanOutcome, StageOneOutcome, StageTwoOutcome};

/// Failure reported by an observer hook. Propagates as a fatal
/// orchestration error; there is no suppression contract.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct ObserverError(pub String);

impl ObserverError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl From<std::io::Error> for ObserverError {
    fn from(e: std::io::Error) -> Self {
        Self(e.to_string())
    }
}

/// Live-progress hooks for a deliberation run.
///
/// All methods default to no-ops so implementations can pick the
/// transitions they care about.
pub trait DeliberationObserver: Send + Sync {
    /// Stage 1 settled: one outcome per requested model, council order.
    fn on_responses_settled(&self, outcomes: &[StageOneOutcome]) -> Result<(), ObserverError> {
        let _ = outcomes;
        Ok(())
    }

    /// Stage 2 settled: all submissions plus the aggregate ranking.
    fn on_review_settled(&self, review: &StageTwoOutcome) -> Result<(), ObserverError> {
        let _ = review;
        Ok(())
    }

    /// Stage 3 settled: the chairman's synthesis.
    fn on_synthesis_settled(&self, chairman: &ChairmanOutcome) -> Result<(), ObserverError> {
        let _ = chairman;
        Ok(())
    }
}
