//! Prompt construction for the three stages
//!
//! Stage 1 sends the query untouched. Stage 2 shows reviewers only the
//! anonymized labels. Stage 3 restores identities and includes the peer
//! ranking so the chairman can weigh the answers.

use council_llm::Message;
use std::fmt::Write as _;

use crate::types::{AggregateEntry, LabelAssignment, StageOneOutcome};

/// Stage-1 message set: the query as a single user message
pub(crate) fn stage1_messages(query: &str) -> Vec<Message> {
    vec![Message::user(query)]
}

/// Stage-2 review prompt: query plus every anonymized response, with an
/// instruction to reply with nothing but the full best-to-worst ordering.
pub(crate) fn review_messages(
    query: &str,
    labels: &LabelAssignment,
    stage1: &[StageOneOutcome],
) -> Vec<Message> {
    let mut prompt = String::new();
    let _ = write!(
        prompt,
        "Several assistants were asked the same question. Evaluate their \
         answers and rank them.\n\nQuestion:\n{query}\n"
    );

    for entry in labels.entries() {
        let response = stage1
            .iter()
            .find(|o| o.model == entry.model)
            .and_then(|o| o.response.as_deref())
            .unwrap_or_default();
        let _ = write!(prompt, "\n{}:\n{}\n", entry.label, response);
    }

    let _ = write!(
        prompt,
        "\nRank ALL {count} responses from best to worst, judging accuracy, \
         depth, and clarity. Reply with ONLY the ranking on a single line, \
         best first, in this exact format:\n\
         Response 2, Response 1, Response 3\n\
         Name every response exactly once. Do not add commentary.",
        count = labels.len()
    );

    vec![Message::user(prompt)]
}

/// Stage-3 synthesis prompt: de-anonymized responses plus the aggregate
/// ranking table (the table section degrades gracefully when empty).
pub(crate) fn synthesis_messages(
    query: &str,
    stage1: &[StageOneOutcome],
    aggregate: &[AggregateEntry],
) -> Vec<Message> {
    let mut prompt = String::new();
    let _ = write!(
        prompt,
        "You are the chairman of a council of AI models. Each member \
         answered the user's question independently, then the members \
         anonymously ranked each other's answers.\n\nQuestion:\n{query}\n"
    );

    for outcome in stage1.iter().filter(|o| o.is_success()) {
        let _ = write!(
            prompt,
            "\n## Answer from {}\n{}\n",
            outcome.model,
            outcome.response.as_deref().unwrap_or_default()
        );
    }

    if aggregate.is_empty() {
        let _ = write!(
            prompt,
            "\nThe peer-review round produced no usable ranking; weigh the \
             answers on their own merits.\n"
        );
    } else {
        let _ = write!(prompt, "\nPeer ranking (average rank, lower is better):\n");
        for (index, entry) in aggregate.iter().enumerate() {
            let _ = write!(
                prompt,
                "{}. {} (average rank {:.2})\n",
                index + 1,
                entry.model,
                entry.average_rank
            );
        }
    }

    let _ = write!(
        prompt,
        "\nWrite the definitive answer to the question. Combine the \
         strongest material, resolve contradictions, and favor answers the \
         peers ranked highly. Reply with the answer only; do not describe \
         the council process."
    );

    vec![Message::user(prompt)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_llm::ChatResponse;

    fn outcome(model: &str, text: &str) -> StageOneOutcome {
        StageOneOutcome::success(
            model,
            ChatResponse {
                content: text.into(),
                reasoning: None,
            },
        )
    }

    #[test]
    fn review_prompt_uses_labels_not_model_names() {
        let labels = LabelAssignment::from_pairs(vec![
            ("Response 1".into(), "secret/vendor-b".into()),
            ("Response 2".into(), "secret/vendor-a".into()),
        ]);
        let stage1 = vec![
            outcome("secret/vendor-a", "answer A"),
            outcome("secret/vendor-b", "answer B"),
        ];

        let messages = review_messages("the question", &labels, &stage1);
        let prompt = &messages[0].content;

        assert!(prompt.contains("Response 1:\nanswer B"));
        assert!(prompt.contains("Response 2:\nanswer A"));
        assert!(!prompt.contains("secret/vendor-a"));
        assert!(!prompt.contains("secret/vendor-b"));
        assert!(prompt.contains("the question"));
    }

    #[test]
    fn synthesis_prompt_restores_identities_and_ranking() {
        let stage1 = vec![
            outcome("vendor/alpha", "alpha says"),
            outcome("vendor/beta", "beta says"),
        ];
        let aggregate = vec![
            AggregateEntry {
                model: "vendor/beta".into(),
                average_rank: 1.0,
            },
            AggregateEntry {
                model: "vendor/alpha".into(),
                average_rank: 2.0,
            },
        ];

        let messages = synthesis_messages("the question", &stage1, &aggregate);
        let prompt = &messages[0].content;

        assert!(prompt.contains("## Answer from vendor/alpha"));
        assert!(prompt.contains("1. vendor/beta (average rank 1.00)"));
        assert!(prompt.contains("2. vendor/alpha (average rank 2.00)"));
    }

    #[test]
    fn synthesis_prompt_handles_empty_ranking() {
        let stage1 = vec![outcome("vendor/alpha", "alpha says")];
        let messages = synthesis_messages("q", &stage1, &[]);
        assert!(messages[0].content.contains("no usable ranking"));
    }

    #[test]
    fn failed_models_are_excluded_from_synthesis() {
        let stage1 = vec![
            outcome("vendor/alpha", "alpha says"),
            StageOneOutcome::failure("vendor/broken"),
        ];
        let messages = synthesis_messages("q", &stage1, &[]);
        assert!(!messages[0].content.contains("vendor/broken"));
    }
}
