//! Three-stage deliberation run
//!
//! Stages are strictly sequential; each one dispatches only after its
//! predecessor has fully settled, because its prompt needs the complete
//! prior results. Within a stage every call is independent and a failure
//! only costs that model its seat.

use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use council_llm::{ModelClient, query_models_concurrently};

use crate::anonymizer;
use crate::error::DeliberationError;
use crate::observer::{DeliberationObserver, ObserverError};
use crate::prompts;
use crate::ranking;
use crate::types::{
    ChairmanOutcome, DeliberationResult, RankingSubmission, Stage, StageOneOutcome,
    StageTwoOutcome,
};

/// Input to one deliberation run: an already-built prompt and resolved
/// model choices. Configuration resolution happens upstream.
#[derive(Debug, Clone)]
pub struct DeliberationRequest {
    pub query: String,
    pub council_models: Vec<String>,
    pub chairman_model: String,
    /// Label-permutation seed. `None` draws a fresh seed for the run;
    /// tests pin it for deterministic assignments.
    pub label_seed: Option<u64>,
}

impl DeliberationRequest {
    #[must_use]
    pub fn new(
        query: impl Into<String>,
        council_models: Vec<String>,
        chairman_model: impl Into<String>,
    ) -> Self {
        Self {
            query: query.into(),
            council_models,
            chairman_model: chairman_model.into(),
            label_seed: None,
        }
    }
}

/// Run the full three-stage deliberation.
///
/// The observer, when present, is invoked synchronously after each
/// stage's join barrier. Cancelling `cancel` at any suspension point
/// discards in-flight work and returns `DeliberationError::Cancelled`;
/// no partial result is produced.
///
/// # Errors
///
/// - `NoResponses` if every stage-1 call fails (stages 2 and 3 are never
///   dispatched).
/// - `SynthesisFailed` if the single chairman call fails; the error
///   carries all stage-1/stage-2 data for diagnostics.
/// - `Cancelled` on cancellation.
/// - `Observer` if a progress hook returns an error.
pub async fn run_deliberation(
    client: Arc<dyn ModelClient>,
    request: &DeliberationRequest,
    observer: Option<&dyn DeliberationObserver>,
    cancel: &CancellationToken,
) -> Result<DeliberationResult, DeliberationError> {
    // Stage 1: every council model answers concurrently.
    info!(
        stage = %Stage::Responses,
        models = request.council_models.len(),
        "dispatching"
    );
    let stage1_messages = prompts::stage1_messages(&request.query);
    let results = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(DeliberationError::Cancelled),
        results = query_models_concurrently(
            Arc::clone(&client),
            &request.council_models,
            &stage1_messages,
        ) => results,
    };

    let stage1: Vec<StageOneOutcome> = request
        .council_models
        .iter()
        .zip(results)
        .map(|(model, result)| match result {
            Ok(response) => StageOneOutcome::success(model.clone(), response),
            Err(error) => {
                warn!(stage = %Stage::Responses, model = %model, %error, "model call failed");
                StageOneOutcome::failure(model.clone())
            }
        })
        .collect();

    notify(observer, Stage::Responses, |o| {
        o.on_responses_settled(&stage1)
    })?;

    let responded = stage1.iter().filter(|o| o.is_success()).count();
    info!(stage = %Stage::Responses, responded, total = stage1.len(), "settled");
    if responded == 0 {
        return Err(DeliberationError::NoResponses { stage1 });
    }

    // Anonymize the successful responders for unbiased review.
    let responders: Vec<String> = stage1
        .iter()
        .filter(|o| o.is_success())
        .map(|o| o.model.clone())
        .collect();
    let seed = request.label_seed.unwrap_or_else(rand::random);
    let labels = anonymizer::assign_labels(&responders, seed);

    // Stage 2: the responders review each other. Models that failed
    // stage 1 have nothing under review and are not asked.
    info!(stage = %Stage::Review, reviewers = responders.len(), "dispatching");
    let review_messages = prompts::review_messages(&request.query, &labels, &stage1);
    let results = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(DeliberationError::Cancelled),
        results = query_models_concurrently(
            Arc::clone(&client),
            &responders,
            &review_messages,
        ) => results,
    };

    let mut submissions = Vec::with_capacity(responders.len());
    for (reviewer, result) in responders.iter().zip(results) {
        match result {
            Ok(response) => match ranking::parse_ranking(&response.content, &labels) {
                Ok(order) => {
                    submissions.push(RankingSubmission::valid(reviewer, response.content, order));
                }
                Err(error) => {
                    debug!(stage = %Stage::Review, reviewer = %reviewer, %error, "submission invalid");
                    submissions.push(RankingSubmission::invalid(
                        reviewer,
                        response.content,
                        error,
                    ));
                }
            },
            Err(error) => {
                warn!(stage = %Stage::Review, reviewer = %reviewer, %error, "reviewer call failed");
            }
        }
    }

    let aggregate = ranking::aggregate_rankings(&submissions, &labels, &request.council_models);
    let stage2 = StageTwoOutcome {
        submissions,
        aggregate,
    };

    notify(observer, Stage::Review, |o| o.on_review_settled(&stage2))?;
    info!(
        stage = %Stage::Review,
        valid = stage2.valid_submission_count(),
        total = stage2.submissions.len(),
        "settled"
    );

    // Stage 3: exactly one chairman call, after everything else settled.
    info!(stage = %Stage::Synthesis, chairman = %request.chairman_model, "dispatching");
    let synthesis_messages =
        prompts::synthesis_messages(&request.query, &stage1, &stage2.aggregate);
    let chairman_result = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(DeliberationError::Cancelled),
        result = client.chat(&request.chairman_model, &synthesis_messages) => result,
    };

    let response = match chairman_result {
        Ok(response) => response,
        Err(source) => {
            return Err(DeliberationError::SynthesisFailed {
                stage1,
                labels,
                stage2,
                source,
            });
        }
    };

    let chairman = ChairmanOutcome {
        model: request.chairman_model.clone(),
        response: response.content,
        reasoning: response.reasoning,
    };

    notify(observer, Stage::Synthesis, |o| {
        o.on_synthesis_settled(&chairman)
    })?;
    info!(stage = %Stage::Synthesis, "settled");

    Ok(DeliberationResult {
        query: request.query.clone(),
        stage1,
        labels,
        stage2,
        chairman,
    })
}

fn notify<F>(
    observer: Option<&dyn DeliberationObserver>,
    stage: Stage,
    hook: F,
) -> Result<(), DeliberationError>
where
    F: FnOnce(&dyn DeliberationObserver) -> Result<(), ObserverError>,
{
    match observer {
        Some(observer) => {
            hook(observer).map_err(|source| DeliberationError::Observer { stage, source })
        }
        None => Ok(()),
    }
}
