//! Interactive progress display
//!
//! Implements the deliberation observer for TTY sessions: stage banners
//! and results stream to stderr as each stage settles, so stdout stays
//! reserved for machine-readable output. Colors honor `NO_COLOR` and are
//! dropped when stderr is not a terminal.

use council_core::{
    ChairmanOutcome, DeliberationObserver, ObserverError, StageOneOutcome, StageTwoOutcome,
};
use std::io::{IsTerminal, Write};

const BOLD_BLUE: &str = "\x1b[1;34m";
const BOLD_GREEN: &str = "\x1b[1;32m";
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";

fn use_color() -> bool {
    std::io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none()
}

/// Stderr progress reporter for interactive runs.
///
/// With `quiet` set, stage progress is suppressed and only the final
/// answer is shown.
pub struct ConsoleReporter {
    chairman_model: String,
    total_models: usize,
    quiet: bool,
    color: bool,
}

impl ConsoleReporter {
    #[must_use]
    pub fn new(chairman_model: impl Into<String>, total_models: usize, quiet: bool) -> Self {
        Self {
            chairman_model: chairman_model.into(),
            total_models,
            quiet,
            color: use_color(),
        }
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.color {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    /// Announce stage 1 before the run starts. Not an observer hook: the
    /// orchestrator only reports settled stages, and the kickoff message
    /// belongs to whoever starts the run.
    pub fn show_start(&self) -> Result<(), ObserverError> {
        if self.quiet {
            return Ok(());
        }
        let mut err = std::io::stderr();
        writeln!(err)?;
        writeln!(
            err,
            "{} Collecting responses from {} models...",
            self.paint(BOLD_BLUE, "Stage 1:"),
            self.total_models
        )?;
        Ok(())
    }
}

impl DeliberationObserver for ConsoleReporter {
    fn on_responses_settled(&self, outcomes: &[StageOneOutcome]) -> Result<(), ObserverError> {
        if self.quiet {
            return Ok(());
        }
        let mut err = std::io::stderr();
        let responded = outcomes.iter().filter(|o| o.is_success()).count();
        writeln!(
            err,
            "{} [{}/{} responded]\n",
            self.paint(BOLD_GREEN, "Stage 1 complete"),
            responded,
            outcomes.len()
        )?;

        for outcome in outcomes.iter().filter(|o| o.is_success()) {
            writeln!(err, "{}", self.paint(BOLD_BLUE, &format!("── {} ──", outcome.model)))?;
            writeln!(err, "{}\n", outcome.response.as_deref().unwrap_or_default())?;
        }

        writeln!(
            err,
            "{} Peer evaluation in progress...",
            self.paint(BOLD_BLUE, "Stage 2:")
        )?;
        Ok(())
    }

    fn on_review_settled(&self, review: &StageTwoOutcome) -> Result<(), ObserverError> {
        if self.quiet {
            return Ok(());
        }
        let mut err = std::io::stderr();
        writeln!(
            err,
            "{} [{}/{} valid rankings]\n",
            self.paint(BOLD_GREEN, "Stage 2 complete"),
            review.valid_submission_count(),
            review.submissions.len()
        )?;

        if review.aggregate.is_empty() {
            writeln!(err, "No usable peer ranking; continuing without it.\n")?;
        } else {
            writeln!(err, "Aggregate Rankings")?;
            for (index, entry) in review.aggregate.iter().enumerate() {
                writeln!(
                    err,
                    "  {}. {} (avg rank {:.2})",
                    index + 1,
                    entry.model,
                    entry.average_rank
                )?;
            }
            writeln!(err)?;
        }

        writeln!(
            err,
            "{} Chairman ({}) synthesizing...",
            self.paint(BOLD_BLUE, "Stage 3:"),
            self.chairman_model
        )?;
        Ok(())
    }

    fn on_synthesis_settled(&self, chairman: &ChairmanOutcome) -> Result<(), ObserverError> {
        // The final answer is always shown, quiet or not.
        let mut err = std::io::stderr();
        writeln!(err)?;
        writeln!(err, "{}", self.paint(BOLD_GREEN, "── FINAL ANSWER ──"))?;
        writeln!(err, "{}\n", self.paint(DIM, &format!("Chairman: {}", chairman.model)))?;
        writeln!(err, "{}", chairman.response)?;
        Ok(())
    }
}
