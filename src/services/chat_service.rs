//! Chat service - proxy to an OpenAI-compatible chat completion API.
//!
//! The upstream key never reaches the client; requests are forwarded
//! with a dental-assistant system prompt prepended. Without a key the
//! service answers with a canned reply outside production so the rest
//! of the app can be exercised offline.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use utoipa::ToSchema;

use crate::config::{Config, CHAT_MODEL, CHAT_STUB_REPLY, CHAT_SYSTEM_PROMPT};
use crate::errors::{AppError, AppResult};

/// One turn of a chat conversation.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChatMessage {
    /// "user" or "assistant"
    #[schema(example = "user")]
    pub role: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
struct UpstreamRequest {
    model: &'static str,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct UpstreamResponse {
    choices: Vec<UpstreamChoice>,
}

#[derive(Debug, Deserialize)]
struct UpstreamChoice {
    message: UpstreamMessage,
}

#[derive(Debug, Deserialize)]
struct UpstreamMessage {
    content: String,
}

/// Chat service trait for dependency injection.
#[async_trait]
pub trait ChatService: Send + Sync {
    /// Forward a conversation and return the assistant's reply.
    async fn chat(&self, messages: Vec<ChatMessage>) -> AppResult<String>;
}

/// Concrete chat proxy backed by reqwest.
pub struct ChatProxy {
    client: reqwest::Client,
    api_key: Option<String>,
    api_base: String,
    timeout: Duration,
    production: bool,
}

impl ChatProxy {
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: config.chat_api_key.clone(),
            api_base: config.chat_api_base.clone(),
            timeout: Duration::from_secs(config.chat_timeout_secs),
            production: config.production,
        }
    }
}

#[async_trait]
impl ChatService for ChatProxy {
    async fn chat(&self, messages: Vec<ChatMessage>) -> AppResult<String> {
        if messages.is_empty() {
            return Err(AppError::validation("messages must not be empty"));
        }

        let api_key = match &self.api_key {
            Some(key) => key,
            None if !self.production => return Ok(CHAT_STUB_REPLY.to_string()),
            None => {
                return Err(AppError::ChatUpstream(
                    "Chat upstream is not configured".to_string(),
                ))
            }
        };

        let mut full_messages = Vec::with_capacity(messages.len() + 1);
        full_messages.push(ChatMessage {
            role: "system".to_string(),
            content: CHAT_SYSTEM_PROMPT.to_string(),
        });
        full_messages.extend(messages);

        let body = UpstreamRequest {
            model: CHAT_MODEL,
            messages: full_messages,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.api_base))
            .bearer_auth(api_key)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::ChatUpstream(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::warn!(%status, "chat upstream returned an error status");
            return Err(AppError::ChatUpstream(format!(
                "upstream returned {status}"
            )));
        }

        let parsed: UpstreamResponse = response
            .json()
            .await
            .map_err(|e| AppError::ChatUpstream(format!("invalid upstream payload: {e}")))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| AppError::ChatUpstream("upstream returned no choices".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn offline_config() -> Config {
        Config::for_tests()
    }

    #[tokio::test]
    async fn stub_reply_without_key_outside_production() {
        let proxy = ChatProxy::new(&offline_config());
        let reply = proxy
            .chat(vec![ChatMessage {
                role: "user".to_string(),
                content: "Does flossing matter?".to_string(),
            }])
            .await
            .unwrap();
        assert_eq!(reply, CHAT_STUB_REPLY);
    }

    #[tokio::test]
    async fn empty_conversation_is_rejected() {
        let proxy = ChatProxy::new(&offline_config());
        let err = proxy.chat(Vec::new()).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
