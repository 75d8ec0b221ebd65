//! Markdown output formatter

use council_core::DeliberationResult;
use std::fmt::Write as _;

#[must_use]
pub fn format_markdown(result: &DeliberationResult) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "# Council Deliberation\n");
    let _ = writeln!(out, "**Query:** {}\n", result.query);

    let _ = writeln!(out, "## Stage 1: Individual Responses\n");
    for outcome in &result.stage1 {
        let _ = writeln!(out, "### {}\n", outcome.model);
        match outcome.response.as_deref() {
            Some(response) => {
                let _ = writeln!(out, "{response}\n");
            }
            None => {
                let _ = writeln!(out, "_No response (call failed)._\n");
            }
        }
    }

    let _ = writeln!(out, "## Stage 2: Peer Evaluation\n");
    let _ = writeln!(out, "### Aggregate Rankings\n");
    if result.stage2.aggregate.is_empty() {
        let _ = writeln!(out, "_No valid rankings were submitted._\n");
    } else {
        let _ = writeln!(out, "| Rank | Model | Average Rank |");
        let _ = writeln!(out, "|------|-------|--------------|");
        for (index, entry) in result.stage2.aggregate.iter().enumerate() {
            let _ = writeln!(
                out,
                "| {} | {} | {:.2} |",
                index + 1,
                entry.model,
                entry.average_rank
            );
        }
        let _ = writeln!(out);
    }

    let _ = writeln!(out, "## Stage 3: Final Synthesis\n");
    let _ = writeln!(out, "**Chairman:** {}\n", result.chairman.model);
    let _ = writeln!(out, "{}", result.chairman.response);

    out
}
