//! Ranking parsing and aggregation
//!
//! Reviewers reply in free text; the parser scans it for the known labels
//! in order of appearance and accepts only a total order: every label
//! exactly once. Anything else invalidates the whole submission, which is
//! dropped from aggregation but kept in the result for audit.

use once_cell::sync::Lazy;
use regex::Regex;
use std::cmp::Ordering;
use std::collections::HashMap;
use thiserror::Error;

use crate::types::{AggregateEntry, LabelAssignment, RankingSubmission};

static LABEL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bresponse\s+(\d+)\b").expect("label pattern is valid"));

/// Why a reviewer's free-text ranking was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RankingParseError {
    #[error("ranking names unknown label {0:?}")]
    Unknown(String),

    #[error("ranking names {0:?} more than once")]
    Duplicate(String),

    #[error("ranking never names {0:?}")]
    Missing(String),
}

/// Extract a total order over `labels` from a reviewer's reply.
///
/// Labels are matched case-insensitively and with normalized numbering
/// ("response 02" counts as "Response 2"); their order of appearance in
/// the text is the ranking, best first.
///
/// # Errors
///
/// Returns `RankingParseError` when any known label is missing or
/// repeated, or an unknown label number appears.
pub fn parse_ranking(
    text: &str,
    labels: &LabelAssignment,
) -> Result<Vec<String>, RankingParseError> {
    let mut ordered: Vec<String> = Vec::with_capacity(labels.len());

    for capture in LABEL_PATTERN.captures_iter(text) {
        let raw = &capture[0];
        let canonical = match capture[1].parse::<usize>() {
            Ok(n) => format!("Response {n}"),
            Err(_) => return Err(RankingParseError::Unknown(raw.to_string())),
        };
        if labels.model_for(&canonical).is_none() {
            return Err(RankingParseError::Unknown(canonical));
        }
        if ordered.contains(&canonical) {
            return Err(RankingParseError::Duplicate(canonical));
        }
        ordered.push(canonical);
    }

    for label in labels.labels() {
        if !ordered.iter().any(|l| l == label) {
            return Err(RankingParseError::Missing(label.to_string()));
        }
    }

    Ok(ordered)
}

/// Average each model's 1-indexed rank position across all valid
/// submissions that name it.
///
/// Models named in zero valid submissions are omitted, never assigned a
/// worst-case rank. The result is sorted ascending by average rank with
/// ties broken by council-list order, so downstream consumers get a
/// deterministic table.
#[must_use]
pub fn aggregate_rankings(
    submissions: &[RankingSubmission],
    labels: &LabelAssignment,
    council: &[String],
) -> Vec<AggregateEntry> {
    let mut positions: HashMap<&str, Vec<usize>> = HashMap::new();

    for submission in submissions {
        let Some(ranking) = submission.ranking.as_ref() else {
            continue;
        };
        for (index, label) in ranking.iter().enumerate() {
            if let Some(model) = labels.model_for(label) {
                positions.entry(model).or_default().push(index + 1);
            }
        }
    }

    let council_position =
        |model: &str| council.iter().position(|m| m == model).unwrap_or(usize::MAX);

    let mut entries: Vec<AggregateEntry> = positions
        .into_iter()
        .map(|(model, ranks)| AggregateEntry {
            model: model.to_string(),
            average_rank: ranks.iter().sum::<usize>() as f64 / ranks.len() as f64,
        })
        .collect();

    entries.sort_by(|a, b| {
        a.average_rank
            .partial_cmp(&b.average_rank)
            .unwrap_or(Ordering::Equal)
            .then_with(|| council_position(&a.model).cmp(&council_position(&b.model)))
    });

    entries
}
