//! Deliberation orchestrator for the council pipeline
//!
//! Three strictly sequential stages over one set of council models:
//!
//! 1. **Responses**: every council model answers the query concurrently.
//! 2. **Peer review**: the models that answered rank each other's
//!    anonymized responses; rankings are parsed and averaged.
//! 3. **Synthesis**: the chairman model writes the final answer from the
//!    de-anonymized responses and the aggregate ranking.
//!
//! Within a stage, calls run concurrently and individual failures are
//! tolerated; across stages the pipeline never advances before the
//! previous stage has fully settled.

mod anonymizer;
mod error;
mod observer;
mod orchestrator;
pub(crate) mod prompts;
mod ranking;
mod types;

pub use anonymizer::assign_labels;
pub use error::DeliberationError;
pub use observer::{DeliberationObserver, ObserverError};
pub use orchestrator::{DeliberationRequest, run_deliberation};
pub use ranking::{RankingParseError, aggregate_rankings, parse_ranking};
pub use types::{
    AggregateEntry, ChairmanOutcome, DeliberationResult, LabelAssignment, LabelEntry,
    RankingSubmission, Stage, StageOneOutcome, StageTwoOutcome,
};
