use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{
    conf::settings,
    prelude::{Error, Result},
};

const MAX_TOKENS: u32 = 1500;
const TEMPERATURE: f32 = 0.7;
const MAX_ATTEMPTS: u32 = 2;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        ChatMessage {
            role: "system".into(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        ChatMessage {
            role: "user".into(),
            content: content.into(),
        }
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct UpstreamErrorBody {
    error: UpstreamErrorDetail,
}

#[derive(Deserialize)]
struct UpstreamErrorDetail {
    message: String,
}

/// Client for an OpenAI-compatible chat-completions endpoint. The token
/// budget and sampling temperature are fixed so persisted scores stay
/// comparable across calls.
#[derive(Debug, Clone)]
pub struct LlmClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl LlmClient {
    pub fn from_settings() -> Result<Self> {
        Self::new(&settings.ai_endpoint, &settings.ai_key, &settings.ai_model)
    }

    pub fn new(endpoint: &str, api_key: &str, model: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::Upstream {
                status: None,
                message: e.to_string(),
            })?;
        Ok(LlmClient {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        })
    }

    /// Single chat completion, no streaming. Retries once on network
    /// failures, 429 and 5xx; other statuses surface immediately.
    pub async fn chat(&self, messages: &[ChatMessage]) -> Result<String> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages,
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };
        let url = format!("{}/chat/completions", self.endpoint);
        let mut last_error = None;

        for attempt in 0..MAX_ATTEMPTS {
            if attempt > 0 {
                let delay = Duration::from_millis(1000 * (1 << (attempt - 1)));
                tracing::warn!(
                    "model call attempt {} failed, retrying after {}ms",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = match self
                .client
                .post(&url)
                .bearer_auth(&self.api_key)
                .json(&request)
                .send()
                .await
            {
                Ok(response) => response,
                Err(e) => {
                    last_error = Some(Error::Upstream {
                        status: None,
                        message: e.to_string(),
                    });
                    continue;
                }
            };

            let status = response.status();
            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                last_error = Some(Error::Upstream {
                    status: Some(status.as_u16()),
                    message: upstream_message(body),
                });
                continue;
            }
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(Error::Upstream {
                    status: Some(status.as_u16()),
                    message: upstream_message(body),
                });
            }

            let completion: ChatCompletionResponse = match response.json().await {
                Ok(completion) => completion,
                Err(e) => {
                    return Err(Error::Upstream {
                        status: Some(status.as_u16()),
                        message: format!("malformed completion response: {e}"),
                    })
                }
            };
            let content = completion
                .choices
                .into_iter()
                .next()
                .and_then(|choice| choice.message.content)
                .ok_or_else(|| Error::Upstream {
                    status: Some(status.as_u16()),
                    message: "completion contained no choices".into(),
                })?;
            return Ok(content.trim().to_string());
        }

        Err(last_error.unwrap_or(Error::Upstream {
            status: None,
            message: "model call failed".into(),
        }))
    }
}

/// Pulls the human-readable message out of an OpenAI-style error body,
/// falling back to the raw body.
fn upstream_message(body: String) -> String {
    serde_json::from_str::<UpstreamErrorBody>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_message_prefers_the_nested_error() {
        let body = r#"{"error": {"message": "Rate limit reached", "type": "requests"}}"#;
        assert_eq!(upstream_message(body.to_string()), "Rate limit reached");
    }

    #[test]
    fn upstream_message_falls_back_to_the_raw_body() {
        assert_eq!(
            upstream_message("<html>bad gateway</html>".to_string()),
            "<html>bad gateway</html>"
        );
    }

    #[test]
    fn message_constructors_set_roles() {
        assert_eq!(ChatMessage::system("a").role, "system");
        assert_eq!(ChatMessage::user("b").role, "user");
    }
}
