//! JSON output formatter
//!
//! Shape: `{query, stage1, stage2, stage3, metadata}` with the
//! label↔model mapping and aggregate rankings under `metadata`, so
//! downstream tooling can audit the anonymization.

use council_core::DeliberationResult;
use serde_json::json;

#[must_use]
pub fn format_json(result: &DeliberationResult) -> String {
    let label_to_model: serde_json::Map<String, serde_json::Value> = result
        .labels
        .entries()
        .iter()
        .map(|e| (e.label.clone(), json!(e.model)))
        .collect();

    let value = json!({
        "query": result.query,
        "stage1": result.stage1,
        "stage2": result.stage2.submissions,
        "stage3": result.chairman,
        "metadata": {
            "label_to_model": label_to_model,
            "aggregate_rankings": result.stage2.aggregate,
            "models_requested": result.stage1.len(),
            "models_responded": result.responded_count(),
        }
    });

    // json! output of serializable types cannot fail to re-serialize
    serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
}
