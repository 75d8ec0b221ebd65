//! Result types for the deliberation pipeline
//!
//! Everything here is immutable once created and serializable, so the
//! output layer can consume a `DeliberationResult` verbatim.

use council_llm::ChatResponse;
use serde::{Deserialize, Serialize};

/// One of the three sequential pipeline stages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Responses,
    Review,
    Synthesis,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Responses => write!(f, "stage 1 (responses)"),
            Stage::Review => write!(f, "stage 2 (peer review)"),
            Stage::Synthesis => write!(f, "stage 3 (synthesis)"),
        }
    }
}

/// Outcome of one council model's stage-1 call.
///
/// Exactly one exists per requested model, in council-list order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageOneOutcome {
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<serde_json::Value>,
    pub failed: bool,
}

impl StageOneOutcome {
    #[must_use]
    pub fn success(model: impl Into<String>, response: ChatResponse) -> Self {
        Self {
            model: model.into(),
            response: Some(response.content),
            reasoning: response.reasoning,
            failed: false,
        }
    }

    #[must_use]
    pub fn failure(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            response: None,
            reasoning: None,
            failed: true,
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        !self.failed
    }
}

/// One label↔model pair of a `LabelAssignment`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEntry {
    pub label: String,
    pub model: String,
}

/// Bijection between anonymized labels and the models that produced a
/// successful stage-1 response. Created once per run, read-only after.
///
/// Entries are kept in label order ("Response 1".."Response N"), which is
/// the order responses appear in the review prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelAssignment {
    entries: Vec<LabelEntry>,
}

impl LabelAssignment {
    #[must_use]
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        Self {
            entries: pairs
                .into_iter()
                .map(|(label, model)| LabelEntry { label, model })
                .collect(),
        }
    }

    #[must_use]
    pub fn model_for(&self, label: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.label == label)
            .map(|e| e.model.as_str())
    }

    #[must_use]
    pub fn label_for(&self, model: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.model == model)
            .map(|e| e.label.as_str())
    }

    /// Labels in prompt order
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.label.as_str())
    }

    #[must_use]
    pub fn entries(&self) -> &[LabelEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One reviewer's stage-2 submission: the raw review text plus either the
/// parsed best-to-worst label ordering or the reason parsing rejected it.
/// Reviewer calls that returned no text produce no submission at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingSubmission {
    pub reviewer: String,
    pub raw: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ranking: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_error: Option<String>,
}

impl RankingSubmission {
    #[must_use]
    pub fn valid(
        reviewer: impl Into<String>,
        raw: impl Into<String>,
        ranking: Vec<String>,
    ) -> Self {
        Self {
            reviewer: reviewer.into(),
            raw: raw.into(),
            ranking: Some(ranking),
            parse_error: None,
        }
    }

    #[must_use]
    pub fn invalid(
        reviewer: impl Into<String>,
        raw: impl Into<String>,
        error: impl std::fmt::Display,
    ) -> Self {
        Self {
            reviewer: reviewer.into(),
            raw: raw.into(),
            ranking: None,
            parse_error: Some(error.to_string()),
        }
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.ranking.is_some()
    }
}

/// Average peer-assigned rank of one model (lower is better)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateEntry {
    pub model: String,
    pub average_rank: f64,
}

/// Everything stage 2 produced: per-reviewer submissions and the
/// aggregate ranking derived from the valid ones (possibly empty).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StageTwoOutcome {
    pub submissions: Vec<RankingSubmission>,
    pub aggregate: Vec<AggregateEntry>,
}

impl StageTwoOutcome {
    #[must_use]
    pub fn valid_submission_count(&self) -> usize {
        self.submissions.iter().filter(|s| s.is_valid()).count()
    }
}

/// The chairman's stage-3 synthesis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChairmanOutcome {
    pub model: String,
    pub response: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<serde_json::Value>,
}

/// Full output bundle of a successful run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliberationResult {
    pub query: String,
    pub stage1: Vec<StageOneOutcome>,
    pub labels: LabelAssignment,
    pub stage2: StageTwoOutcome,
    pub chairman: ChairmanOutcome,
}

impl DeliberationResult {
    /// Number of council models that produced a stage-1 response
    #[must_use]
    pub fn responded_count(&self) -> usize {
        self.stage1.iter().filter(|o| o.is_success()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assignment() -> LabelAssignment {
        LabelAssignment::from_pairs(vec![
            ("Response 1".into(), "b/model".into()),
            ("Response 2".into(), "a/model".into()),
        ])
    }

    #[test]
    fn label_assignment_lookups_are_inverse() {
        let labels = assignment();
        assert_eq!(labels.model_for("Response 1"), Some("b/model"));
        assert_eq!(labels.label_for("a/model"), Some("Response 2"));
        assert_eq!(labels.model_for("Response 9"), None);
        assert_eq!(labels.label_for("unknown/model"), None);
    }

    #[test]
    fn labels_iterate_in_prompt_order() {
        let labels = assignment();
        let order: Vec<&str> = labels.labels().collect();
        assert_eq!(order, vec!["Response 1", "Response 2"]);
    }

    #[test]
    fn failed_outcome_has_no_response() {
        let outcome = StageOneOutcome::failure("x/model");
        assert!(outcome.failed);
        assert!(!outcome.is_success());
        assert!(outcome.response.is_none());
        // failed outcomes serialize without a response key
        let json = serde_json::to_value(&outcome).unwrap();
        assert!(json.get("response").is_none());
    }

    #[test]
    fn stage_display_is_tagged() {
        assert_eq!(Stage::Responses.to_string(), "stage 1 (responses)");
        assert_eq!(Stage::Review.to_string(), "stage 2 (peer review)");
        assert_eq!(Stage::Synthesis.to_string(), "stage 3 (synthesis)");
    }
}
