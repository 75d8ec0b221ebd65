//! Command-line interface for council
//!
//! Argument parsing, output-mode selection, and the bridge from the
//! synchronous entrypoint into the async pipeline. Progress and errors go
//! to stderr; results go to stdout, so the tool is safe to pipe.

use clap::Parser;
use std::io::{IsTerminal, Read};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use council_config::{ConfigOverrides, load_config};
use council_core::{DeliberationError, DeliberationRequest, run_deliberation};
use council_llm::{ModelClient, OpenRouterClient};

use crate::exit_codes::ExitCode;
use crate::files::build_prompt_with_files;
use crate::logging;
use crate::output::{ConsoleReporter, format_json, format_markdown};

/// council - multi-LLM deliberation via OpenRouter
#[derive(Parser)]
#[command(name = "council")]
#[command(about = "Ask a question to a council of LLMs and get a synthesized answer")]
#[command(long_about = r#"
The council consists of multiple LLMs that:
  1. Each provide an individual response
  2. Anonymously rank each other's responses
  3. Have a chairman synthesize a final answer

Agent-friendly: when stdout is piped, output defaults to JSON. Progress
and errors go to stderr, keeping stdout clean for parsing.

EXAMPLES:
  # Ask a question interactively
  council "What is the meaning of life?"

  # Pipe a question in
  echo "Explain quantum computing" | council

  # Machine-readable output
  council --json "Compare Python and Rust" > result.json

  # Just the final answer
  council -a "Quick question"

  # Include files in the prompt
  council -f code.rs -f README.md "Review this code"
  council -i "src/**/*.rs" "Analyze this codebase"

CONFIGURATION:
  Precedence: CLI flags > OPENROUTER_API_KEY env > ~/.council.yaml > defaults
  Use --config to point at an explicit config file.
"#)]
#[command(version)]
pub struct Cli {
    /// The question to ask the council. Can also be piped via stdin.
    pub query: Option<String>,

    /// Output results as JSON
    #[arg(long, short = 'j')]
    pub json: bool,

    /// Output results as Markdown
    #[arg(long, short = 'm')]
    pub markdown: bool,

    /// Output only the final synthesized answer (agent-friendly)
    #[arg(long, short = 'a')]
    pub answer_only: bool,

    /// Suppress progress output, show only the final result
    #[arg(long, short = 'q')]
    pub quiet: bool,

    /// Path to config file (default: ~/.council.yaml)
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Comma-separated list of council models (overrides config)
    #[arg(long)]
    pub models: Option<String>,

    /// Chairman model (overrides config)
    #[arg(long)]
    pub chairman: Option<String>,

    /// Include file contents in the prompt (can be repeated)
    #[arg(long = "file", short = 'f')]
    pub files: Vec<PathBuf>,

    /// Include files matching a glob pattern (can be repeated)
    #[arg(long = "include", short = 'i')]
    pub include: Vec<String>,

    /// Enable verbose logging
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

/// Parse a `--models` value into a model list
pub(crate) fn split_models(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Read the query from the argument or, when piped, from stdin.
fn get_query(arg: Option<String>) -> Option<String> {
    if let Some(query) = arg {
        return Some(query);
    }
    if std::io::stdin().is_terminal() {
        return None;
    }
    let mut buffer = String::new();
    if std::io::stdin().read_to_string(&mut buffer).is_err() {
        return None;
    }
    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Run the CLI. Handles all output including errors; the caller only maps
/// the returned code to a process exit.
///
/// # Errors
///
/// Returns the exit code to terminate with for any failure.
pub fn run() -> Result<(), ExitCode> {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    let Some(raw_query) = get_query(cli.query) else {
        eprintln!("Error: no query provided. Pass as argument or pipe via stdin.");
        return Err(ExitCode::CONFIG);
    };

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let user_query = match build_prompt_with_files(&raw_query, &cli.files, &cli.include, &cwd) {
        Ok(query) => query,
        Err(e) => {
            eprintln!("Error: {e:#}");
            return Err(ExitCode::CONFIG);
        }
    };

    let overrides = ConfigOverrides {
        config_path: cli.config.clone(),
        council_models: cli.models.as_deref().map(split_models),
        chairman_model: cli.chairman.clone(),
    };
    let config = match load_config(&overrides) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return Err(ExitCode::CONFIG);
        }
    };

    let client: Arc<dyn ModelClient> = match OpenRouterClient::from_config(&config) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return Err(ExitCode::CONFIG);
        }
    };

    // Output mode: explicit flags win; a piped stdout defaults to JSON.
    let stdout_is_tty = std::io::stdout().is_terminal();
    let use_json = cli.json || (!stdout_is_tty && !cli.markdown && !cli.answer_only);
    let use_rich = !(use_json || cli.markdown || cli.answer_only) && stdout_is_tty;

    let reporter = use_rich.then(|| {
        ConsoleReporter::new(
            config.chairman_model.clone(),
            config.council_models.len(),
            cli.quiet,
        )
    });

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: failed to create async runtime: {e}");
            return Err(ExitCode::INTERNAL);
        }
    };

    let request = DeliberationRequest::new(
        user_query,
        config.council_models.clone(),
        config.chairman_model.clone(),
    );

    let result = rt.block_on(async {
        let cancel = CancellationToken::new();
        let signal_cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                signal_cancel.cancel();
            }
        });

        if let Some(reporter) = reporter.as_ref()
            && let Err(e) = reporter.show_start()
        {
            return Err(DeliberationError::Observer {
                stage: council_core::Stage::Responses,
                source: e,
            });
        }

        run_deliberation(
            client,
            &request,
            reporter
                .as_ref()
                .map(|r| r as &dyn council_core::DeliberationObserver),
            &cancel,
        )
        .await
    });

    match result {
        Ok(result) => {
            if cli.answer_only {
                println!("{}", result.chairman.response);
            } else if use_json {
                println!("{}", format_json(&result));
            } else if cli.markdown {
                println!("{}", format_markdown(&result));
            }
            // Rich mode already rendered everything via the reporter.
            Ok(())
        }
        Err(error) => {
            match &error {
                DeliberationError::Cancelled => eprintln!("\nInterrupted"),
                DeliberationError::SynthesisFailed { stage1, .. } => {
                    let responded = stage1.iter().filter(|o| o.is_success()).count();
                    eprintln!(
                        "Error: {error} ({responded}/{} council responses were collected)",
                        stage1.len()
                    );
                }
                other => eprintln!("Error: {other}"),
            }
            Err(ExitCode::from_deliberation_error(&error))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_models_trims_and_drops_empties() {
        assert_eq!(
            split_models(" a/one , b/two ,,c/three"),
            vec!["a/one", "b/two", "c/three"]
        );
    }

    #[test]
    fn cli_parses_output_flags() {
        let cli = Cli::try_parse_from(["council", "-j", "-q", "ask me"]).unwrap();
        assert!(cli.json);
        assert!(cli.quiet);
        assert!(!cli.markdown);
        assert_eq!(cli.query.as_deref(), Some("ask me"));
    }

    #[test]
    fn cli_parses_repeated_file_and_include_flags() {
        let cli = Cli::try_parse_from([
            "council", "-f", "a.rs", "-f", "b.rs", "-i", "src/**/*.rs", "question",
        ])
        .unwrap();
        assert_eq!(cli.files.len(), 2);
        assert_eq!(cli.include, vec!["src/**/*.rs"]);
    }

    #[test]
    fn cli_parses_model_overrides() {
        let cli = Cli::try_parse_from([
            "council",
            "--models",
            "x/a,x/b",
            "--chairman",
            "x/chair",
            "q",
        ])
        .unwrap();
        assert_eq!(cli.models.as_deref(), Some("x/a,x/b"));
        assert_eq!(cli.chairman.as_deref(), Some("x/chair"));
    }
}
