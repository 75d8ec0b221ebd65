//! Error taxonomy for model gateway calls

use std::time::Duration;
use thiserror::Error;

/// Failure of a single model invocation.
///
/// Every variant is a per-call condition: callers that fan out over many
/// models record these per slot and decide themselves whether the run as a
/// whole can continue.
#[derive(Debug, Clone, Error)]
pub enum LlmError {
    /// Transport-level failure (connectivity, malformed payload)
    #[error("transport error: {0}")]
    Transport(String),

    /// Provider authentication failure (401, 403, missing API key)
    #[error("provider authentication error: {0}")]
    ProviderAuth(String),

    /// Provider quota/rate limit exceeded (429)
    #[error("provider quota exceeded: {0}")]
    ProviderQuota(String),

    /// Provider service outage (5xx errors)
    #[error("provider outage: {0}")]
    ProviderOutage(String),

    /// Invocation timed out
    #[error("timeout after {duration:?}")]
    Timeout { duration: Duration },

    /// Client-side configuration error
    #[error("misconfiguration: {0}")]
    Misconfiguration(String),
}
