//! Core types for the model client abstraction

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::LlmError;

/// Role of a message in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System-level instructions
    System,
    /// User input
    User,
    /// Assistant response
    Assistant,
}

/// A single message in a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    #[must_use]
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a system message
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// Create a user message
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }
}

/// Successful payload of a single model call.
///
/// `reasoning` carries the provider's `reasoning_details` value verbatim
/// when present; the pipeline never interprets it, only surfaces it in the
/// result bundle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<serde_json::Value>,
}

/// Trait for model client implementations.
///
/// The orchestrator and its tests depend only on this seam; the HTTP
/// implementation lives behind it. One call here is one network request;
/// there is no retry layer.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Issue a single chat request to `model`.
    ///
    /// # Errors
    ///
    /// Returns `LlmError` for any failure: transport, provider errors
    /// (auth, quota, outage), or timeout.
    async fn chat(&self, model: &str, messages: &[Message]) -> Result<ChatResponse, LlmError>;
}
