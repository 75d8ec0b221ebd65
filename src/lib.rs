//! council: multi-LLM deliberation over OpenRouter
//!
//! A council of models answers the same question concurrently, anonymously
//! ranks each other's answers, and a chairman model synthesizes the final
//! answer from the de-anonymized responses and the aggregate ranking.
//!
//! The pipeline lives in `council-core`, the OpenRouter gateway in
//! `council-llm`, configuration in `council-config`. This crate is the CLI
//! shell: argument parsing, file inclusion, output formatting, logging.

pub mod cli;
pub mod exit_codes;
pub mod files;
pub mod logging;
pub mod output;

pub use council_config::{ConfigOverrides, CouncilConfig, load_config};
pub use council_core::{
    DeliberationError, DeliberationObserver, DeliberationRequest, DeliberationResult,
    run_deliberation,
};
pub use council_llm::{ModelClient, OpenRouterClient};
pub use exit_codes::ExitCode;
