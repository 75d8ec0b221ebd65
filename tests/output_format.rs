//! Formatter output shapes for a hand-built deliberation result

use council::output::{format_json, format_markdown};
use council_core::{
    AggregateEntry, ChairmanOutcome, DeliberationResult, LabelAssignment, RankingSubmission,
    StageOneOutcome, StageTwoOutcome,
};
use council_llm::ChatResponse;

fn sample_result() -> DeliberationResult {
    let stage1 = vec![
        StageOneOutcome::success(
            "vendor/alpha",
            ChatResponse {
                content: "alpha's take".into(),
                reasoning: None,
            },
        ),
        StageOneOutcome::failure("vendor/beta"),
        StageOneOutcome::success(
            "vendor/gamma",
            ChatResponse {
                content: "gamma's take".into(),
                reasoning: None,
            },
        ),
    ];
    let labels = LabelAssignment::from_pairs(vec![
        ("Response 1".into(), "vendor/gamma".into()),
        ("Response 2".into(), "vendor/alpha".into()),
    ]);
    let stage2 = StageTwoOutcome {
        submissions: vec![
            RankingSubmission::valid(
                "vendor/alpha",
                "Response 1, Response 2",
                vec!["Response 1".into(), "Response 2".into()],
            ),
            RankingSubmission::invalid("vendor/gamma", "word salad", "ranking never names a label"),
        ],
        aggregate: vec![
            AggregateEntry {
                model: "vendor/gamma".into(),
                average_rank: 1.0,
            },
            AggregateEntry {
                model: "vendor/alpha".into(),
                average_rank: 2.0,
            },
        ],
    };
    DeliberationResult {
        query: "what now?".into(),
        stage1,
        labels,
        stage2,
        chairman: ChairmanOutcome {
            model: "vendor/chair".into(),
            response: "the synthesis".into(),
            reasoning: None,
        },
    }
}

#[test]
fn json_output_has_documented_shape() {
    let text = format_json(&sample_result());
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();

    assert_eq!(value["query"], "what now?");
    assert_eq!(value["stage1"].as_array().unwrap().len(), 3);
    assert_eq!(value["stage1"][1]["failed"], true);
    assert_eq!(value["stage2"].as_array().unwrap().len(), 2);
    assert_eq!(value["stage3"]["model"], "vendor/chair");
    assert_eq!(value["stage3"]["response"], "the synthesis");

    let metadata = &value["metadata"];
    assert_eq!(metadata["label_to_model"]["Response 1"], "vendor/gamma");
    assert_eq!(metadata["label_to_model"]["Response 2"], "vendor/alpha");
    assert_eq!(metadata["aggregate_rankings"][0]["model"], "vendor/gamma");
    assert_eq!(metadata["models_requested"], 3);
    assert_eq!(metadata["models_responded"], 2);
}

#[test]
fn json_failed_outcomes_have_no_response_key() {
    let text = format_json(&sample_result());
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert!(value["stage1"][1].get("response").is_none());
}

#[test]
fn markdown_output_contains_sections_and_table() {
    let text = format_markdown(&sample_result());

    assert!(text.contains("# Council Deliberation"));
    assert!(text.contains("**Query:** what now?"));
    assert!(text.contains("### vendor/alpha"));
    assert!(text.contains("_No response (call failed)._"));
    assert!(text.contains("| Rank | Model | Average Rank |"));
    assert!(text.contains("| 1 | vendor/gamma | 1.00 |"));
    assert!(text.contains("| 2 | vendor/alpha | 2.00 |"));
    assert!(text.contains("**Chairman:** vendor/chair"));
    assert!(text.contains("the synthesis"));
}

#[test]
fn markdown_notes_missing_rankings() {
    let mut result = sample_result();
    result.stage2.aggregate.clear();
    let text = format_markdown(&result);
    assert!(text.contains("_No valid rankings were submitted._"));
}
