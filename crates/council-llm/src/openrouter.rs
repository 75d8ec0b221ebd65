//! OpenRouter HTTP client
//!
//! OpenRouter exposes many models behind one OpenAI-compatible
//! chat-completions endpoint, which is what makes a mixed-vendor council
//! practical: one credential, one wire format, any model identifier.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::error::LlmError;
use crate::types::{ChatResponse, Message, ModelClient, Role};
use council_config::CouncilConfig;

/// Default OpenRouter API endpoint
const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// HTTP-Referer header value sent with every request
const DEFAULT_REFERER: &str = "https://github.com/council-dev/council";

/// X-Title header value sent with every request
const DEFAULT_TITLE: &str = "council";

/// Reasoning intensity requested from a model via the `reasoning` payload
/// field. Only the highest tier is ever requested; models that do not need
/// it get no `reasoning` field at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReasoningEffort {
    XHigh,
}

impl ReasoningEffort {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ReasoningEffort::XHigh => "xhigh",
        }
    }
}

/// Map a model identifier to the reasoning effort it must be invoked with.
///
/// Pure and deterministic: the codex and Claude Opus families degrade
/// noticeably on deliberation prompts without maximum reasoning, so they
/// are always pinned to `xhigh`. Everything else runs with provider
/// defaults.
#[must_use]
pub fn reasoning_effort_for(model: &str) -> Option<ReasoningEffort> {
    if model.contains("codex") || model.contains("claude-opus") {
        Some(ReasoningEffort::XHigh)
    } else {
        None
    }
}

/// OpenRouter client sharing one connection pool across all calls in a run
#[derive(Clone)]
pub struct OpenRouterClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    timeout: Duration,
}

impl OpenRouterClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Misconfiguration` if the underlying HTTP client
    /// cannot be constructed.
    pub fn new(
        api_key: String,
        base_url: Option<String>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| LlmError::Misconfiguration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            api_key,
            timeout,
        })
    }

    /// Create a client from resolved configuration.
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Misconfiguration` if the HTTP client cannot be
    /// constructed.
    pub fn from_config(config: &CouncilConfig) -> Result<Self, LlmError> {
        Self::new(
            config.api_key.clone(),
            Some(config.api_url.clone()),
            config.timeout,
        )
    }
}

#[async_trait]
impl ModelClient for OpenRouterClient {
    async fn chat(&self, model: &str, messages: &[Message]) -> Result<ChatResponse, LlmError> {
        let request_body = build_request_payload(model, messages);

        debug!(
            provider = "openrouter",
            model = %model,
            reasoning = ?request_body.reasoning.as_ref().map(|r| r.effort),
            timeout_secs = self.timeout.as_secs(),
            "dispatching chat request"
        );

        let response = self
            .http
            .post(&self.base_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("HTTP-Referer", DEFAULT_REFERER)
            .header("X-Title", DEFAULT_TITLE)
            .json(&request_body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout {
                        duration: self.timeout,
                    }
                } else {
                    LlmError::Transport(format!("request to OpenRouter failed: {e}"))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status.as_u16(), &body));
        }

        let body: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Transport(format!("failed to parse OpenRouter response: {e}")))?;

        let choice = body
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::Transport("OpenRouter response missing choices[0]".to_string()))?;

        let content = choice.message.content.ok_or_else(|| {
            LlmError::Transport("OpenRouter response missing content in choices[0]".to_string())
        })?;

        debug!(provider = "openrouter", model = %model, "chat request completed");

        Ok(ChatResponse {
            content,
            reasoning: choice.message.reasoning_details,
        })
    }
}

/// Build the OpenAI-compatible request body for one invocation.
///
/// The payload is deliberately minimal: `model`, `messages`, and a
/// `reasoning` block only for models `reasoning_effort_for` pins.
pub(crate) fn build_request_payload(model: &str, messages: &[Message]) -> ChatRequest {
    ChatRequest {
        model: model.to_string(),
        messages: messages.iter().map(WireMessage::from).collect(),
        reasoning: reasoning_effort_for(model).map(|effort| ReasoningParam {
            effort: effort.as_str(),
        }),
    }
}

/// Classify a non-success HTTP status into the error taxonomy.
fn classify_status(status: u16, body: &str) -> LlmError {
    let excerpt = excerpt(body);
    match status {
        401 | 403 => LlmError::ProviderAuth(format!("HTTP {status}: {excerpt}")),
        429 => LlmError::ProviderQuota(format!("HTTP {status}: {excerpt}")),
        500..=599 => LlmError::ProviderOutage(format!("HTTP {status}: {excerpt}")),
        _ => LlmError::Transport(format!("unexpected HTTP {status}: {excerpt}")),
    }
}

/// First 200 chars of a response body, for error messages
fn excerpt(body: &str) -> &str {
    let end = body
        .char_indices()
        .nth(200)
        .map_or(body.len(), |(idx, _)| idx);
    &body[..end]
}

/// OpenAI-compatible request body
#[derive(Debug, Clone, Serialize)]
pub(crate) struct ChatRequest {
    model: String,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) reasoning: Option<ReasoningParam>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ReasoningParam {
    pub(crate) effort: &'static str,
}

#[derive(Debug, Clone, Serialize)]
struct WireMessage {
    role: &'static str,
    content: String,
}

impl From<&Message> for WireMessage {
    fn from(msg: &Message) -> Self {
        Self {
            role: match msg.role {
                Role::System => "system",
                Role::User => "user",
                Role::Assistant => "assistant",
            },
            content: msg.content.clone(),
        }
    }
}

/// OpenAI-compatible response body
#[derive(Debug, Clone, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Clone, Deserialize)]
struct Choice {
    message: WireResponseMessage,
}

#[derive(Debug, Clone, Deserialize)]
struct WireResponseMessage {
    content: Option<String>,
    reasoning_details: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codex_models_require_xhigh_reasoning() {
        assert_eq!(
            reasoning_effort_for("openai/gpt-5.3-codex"),
            Some(ReasoningEffort::XHigh)
        );
        assert_eq!(
            reasoning_effort_for("openai/gpt-5-codex"),
            Some(ReasoningEffort::XHigh)
        );
    }

    #[test]
    fn opus_models_require_xhigh_reasoning() {
        assert_eq!(
            reasoning_effort_for("anthropic/claude-opus-4.6"),
            Some(ReasoningEffort::XHigh)
        );
        assert_eq!(
            reasoning_effort_for("anthropic/claude-opus-4.5"),
            Some(ReasoningEffort::XHigh)
        );
    }

    #[test]
    fn other_models_do_not_require_xhigh_reasoning() {
        assert_eq!(reasoning_effort_for("openai/gpt-5.2-pro"), None);
        assert_eq!(reasoning_effort_for("google/gemini-3.1-pro-preview"), None);
        assert_eq!(reasoning_effort_for("anthropic/claude-sonnet-4"), None);
    }

    #[test]
    fn payload_includes_reasoning_for_codex() {
        let messages = vec![Message::user("test")];
        let payload = build_request_payload("openai/gpt-5.3-codex", &messages);
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["reasoning"]["effort"], "xhigh");
    }

    #[test]
    fn payload_includes_reasoning_for_opus() {
        let messages = vec![Message::user("test")];
        let payload = build_request_payload("anthropic/claude-opus-4.6", &messages);
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["reasoning"]["effort"], "xhigh");
    }

    #[test]
    fn payload_omits_reasoning_for_other_models() {
        let messages = vec![Message::user("test")];
        let payload = build_request_payload("google/gemini-3.1-pro-preview", &messages);
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("reasoning").is_none());
    }

    #[test]
    fn payload_converts_roles_to_wire_names() {
        let messages = vec![
            Message::system("be brief"),
            Message::user("hello"),
            Message::new(Role::Assistant, "hi"),
        ];
        let payload = build_request_payload("some/model", &messages);
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["messages"][2]["role"], "assistant");
        assert_eq!(json["model"], "some/model");
    }

    #[test]
    fn status_classification_maps_taxonomy() {
        assert!(matches!(
            classify_status(401, "no key"),
            LlmError::ProviderAuth(_)
        ));
        assert!(matches!(
            classify_status(403, "forbidden"),
            LlmError::ProviderAuth(_)
        ));
        assert!(matches!(
            classify_status(429, "slow down"),
            LlmError::ProviderQuota(_)
        ));
        assert!(matches!(
            classify_status(502, "bad gateway"),
            LlmError::ProviderOutage(_)
        ));
        assert!(matches!(
            classify_status(418, "teapot"),
            LlmError::Transport(_)
        ));
    }

    #[test]
    fn error_excerpt_is_bounded() {
        let long_body = "x".repeat(10_000);
        let err = classify_status(429, &long_body);
        assert!(err.to_string().len() < 300);
    }

    #[test]
    fn new_uses_default_base_url() {
        let client =
            OpenRouterClient::new("k".into(), None, Duration::from_secs(5)).unwrap();
        assert_eq!(client.base_url, DEFAULT_BASE_URL);
    }
}
