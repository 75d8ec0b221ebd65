//! Concurrent fan-out over a set of models
//!
//! One request per model, all in flight at once, joined only when every
//! call has settled. Results land in a pre-sized slot indexed by the
//! model's position in the input list, so output order is deterministic
//! no matter which call finishes first.

use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::debug;

use crate::error::LlmError;
use crate::types::{ChatResponse, Message, ModelClient};

/// Send the same message set to every model concurrently.
///
/// Returns one `Result` per input model, in input order. A per-call
/// failure occupies its slot; it never aborts sibling calls. The future
/// resolves only after every dispatched call has settled. Dropping the
/// future aborts all in-flight requests, which is how cancellation
/// reaches this layer.
pub async fn query_models_concurrently(
    client: Arc<dyn ModelClient>,
    models: &[String],
    messages: &[Message],
) -> Vec<Result<ChatResponse, LlmError>> {
    let mut tasks = JoinSet::new();

    for (index, model) in models.iter().enumerate() {
        let client = Arc::clone(&client);
        let model = model.clone();
        let messages = messages.to_vec();
        tasks.spawn(async move { (index, client.chat(&model, &messages).await) });
    }

    let mut slots: Vec<Option<Result<ChatResponse, LlmError>>> =
        (0..models.len()).map(|_| None).collect();

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, result)) => slots[index] = Some(result),
            Err(e) => {
                // A panicked task loses its index; the slot stays None and
                // is backfilled below.
                debug!(error = %e, "model task did not complete");
            }
        }
    }

    slots
        .into_iter()
        .map(|slot| {
            slot.unwrap_or_else(|| {
                Err(LlmError::Transport(
                    "model task terminated before settling".to_string(),
                ))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::time::Duration;

    /// Client whose latency and outcome depend on the model name.
    struct ScriptedClient;

    #[async_trait]
    impl ModelClient for ScriptedClient {
        async fn chat(
            &self,
            model: &str,
            _messages: &[Message],
        ) -> Result<ChatResponse, LlmError> {
            match model {
                "slow/ok" => {
                    tokio::time::sleep(Duration::from_millis(50)).await;
                    Ok(ChatResponse {
                        content: "slow answer".into(),
                        reasoning: None,
                    })
                }
                "fast/ok" => Ok(ChatResponse {
                    content: "fast answer".into(),
                    reasoning: None,
                }),
                _ => Err(LlmError::Transport("scripted failure".into())),
            }
        }
    }

    #[tokio::test]
    async fn output_order_matches_input_order() {
        let client: Arc<dyn ModelClient> = Arc::new(ScriptedClient);
        let models = vec!["slow/ok".to_string(), "fast/ok".to_string()];
        let messages = vec![Message::user("q")];

        let results = query_models_concurrently(client, &models, &messages).await;

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].as_ref().unwrap().content, "slow answer");
        assert_eq!(results[1].as_ref().unwrap().content, "fast answer");
    }

    #[tokio::test]
    async fn one_failure_does_not_abort_siblings() {
        let client: Arc<dyn ModelClient> = Arc::new(ScriptedClient);
        let models = vec![
            "fast/ok".to_string(),
            "broken/model".to_string(),
            "slow/ok".to_string(),
        ];
        let messages = vec![Message::user("q")];

        let results = query_models_concurrently(client, &models, &messages).await;

        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(LlmError::Transport(_))));
        assert!(results[2].is_ok());
    }

    #[tokio::test]
    async fn empty_model_list_yields_empty_results() {
        let client: Arc<dyn ModelClient> = Arc::new(ScriptedClient);
        let results =
            query_models_concurrently(client, &[], &[Message::user("q")]).await;
        assert!(results.is_empty());
    }
}
