//! Model gateway for the council deliberation pipeline
//!
//! This crate owns the network boundary: a trait-based client abstraction
//! (`ModelClient`), the OpenRouter HTTP implementation, and an
//! order-preserving concurrent fan-out helper. The orchestrator works
//! against the trait and never touches HTTP details.

mod error;
mod fanout;
mod openrouter;
mod types;

pub use error::LlmError;
pub use fanout::query_models_concurrently;
pub use openrouter::{OpenRouterClient, ReasoningEffort, reasoning_effort_for};
pub use types::{ChatResponse, Message, ModelClient, Role};
