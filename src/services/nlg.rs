//! Natural-language generation through an OpenAI-compatible chat completions API.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Sampling temperature used for every completion
const TEMPERATURE: f32 = 0.7;

#[derive(Debug, Error)]
pub enum NlgError {
    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Rate limited by NLG service")]
    RateLimited,

    #[error("NLG service returned {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Failed to parse NLG response: {0}")]
    ParseError(String),

    #[error("NLG service returned an empty response")]
    EmptyResponse,
}

/// Something that can turn a prompt into prose
#[async_trait]
pub trait NlgClient: Send + Sync {
    /// Complete `user_prompt` under `system_prompt`, returning trimmed text
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        max_tokens: u32,
    ) -> Result<String, NlgError>;

    fn model_name(&self) -> &str;
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// HTTP client for `{base_url}/chat/completions`
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiClient {
    pub fn new(
        api_key: &str,
        model: &str,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, NlgError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NlgError::RequestFailed(e.to_string()))?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            model: model.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl NlgClient for OpenAiClient {
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        max_tokens: u32,
    ) -> Result<String, NlgError> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
            max_tokens,
            temperature: TEMPERATURE,
        };

        debug!("Requesting completion from {} ({} max tokens)", self.model, max_tokens);

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    NlgError::Timeout
                } else {
                    NlgError::RequestFailed(e.to_string())
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| NlgError::RequestFailed(e.to_string()))?;

        if status == StatusCode::TOO_MANY_REQUESTS {
            warn!("NLG service rate limited the request");
            return Err(NlgError::RateLimited);
        }

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(NlgError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        parse_completion(&body)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Pull the first choice's text out of a chat completions body
fn parse_completion(body: &str) -> Result<String, NlgError> {
    let response: ChatCompletionResponse =
        serde_json::from_str(body).map_err(|e| NlgError::ParseError(e.to_string()))?;

    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty())
        .ok_or(NlgError::EmptyResponse)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_completion() {
        let body = r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"  Yes, Chef!  "}}]}"#;
        assert_eq!(parse_completion(body).unwrap(), "Yes, Chef!");
    }

    #[test]
    fn test_parse_completion_empty() {
        assert!(matches!(
            parse_completion(r#"{"choices":[]}"#),
            Err(NlgError::EmptyResponse)
        ));
        assert!(matches!(
            parse_completion(r#"{"choices":[{"message":{"content":"   "}}]}"#),
            Err(NlgError::EmptyResponse)
        ));
    }

    #[test]
    fn test_parse_completion_garbage() {
        assert!(matches!(
            parse_completion("not json"),
            Err(NlgError::ParseError(_))
        ));
    }

    #[test]
    fn test_request_shape() {
        let request = ChatCompletionRequest {
            model: "gpt-3.5-turbo",
            messages: vec![ChatMessage {
                role: "user",
                content: "hi",
            }],
            max_tokens: 300,
            temperature: TEMPERATURE,
        };
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["model"], "gpt-3.5-turbo");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["max_tokens"], 300);
    }

    #[test]
    fn test_client_trims_base_url() {
        let client = OpenAiClient::new(
            "key",
            "gpt-3.5-turbo",
            "https://api.example.com/v1/",
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(client.base_url, "https://api.example.com/v1");
        assert_eq!(client.model_name(), "gpt-3.5-turbo");
    }
}
