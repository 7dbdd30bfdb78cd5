use crate::domain::model::ChatMessage;
use crate::domain::ports::{ChatBackend, ConfigProvider};
use crate::config::API_KEY_ENV;
use crate::utils::error::{MaestroError, Result};
use crate::utils::validation::validate_api_key;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://api.openai.com";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_MAX_RETRIES: u32 = 3;
/// Upper bound on attempts per request, whatever the configuration says.
pub const MAX_RETRIES: u32 = 10;

const BASE_DELAY_MS: u64 = 500;
const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

/// Client for OpenAI-compatible `/v1/chat/completions` endpoints.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    api_base: String,
    model: String,
    max_retries: u32,
    base_delay: Duration,
}

impl OpenAiClient {
    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let api_key = validate_api_key(API_KEY_ENV, config.api_key())?;

        Self::with_settings(
            api_key,
            config.api_base(),
            config.model(),
            config.request_timeout_secs(),
            config.max_retries(),
        )
    }

    pub fn with_settings(
        api_key: impl Into<String>,
        api_base: &str,
        model: &str,
        timeout_secs: u64,
        max_retries: u32,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            api_base: api_base.trim_end_matches('/').to_string(),
            model: model.to_string(),
            max_retries: max_retries.clamp(1, MAX_RETRIES),
            base_delay: Duration::from_millis(BASE_DELAY_MS),
        })
    }

    /// Overrides the first backoff delay; later attempts double it.
    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    /// Delay before the retry that follows `attempt` (0-based): the base
    /// delay doubled per attempt, never more than `MAX_RETRY_DELAY`.
    fn backoff_delay(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.base_delay.saturating_mul(factor).min(MAX_RETRY_DELAY)
    }

    pub fn endpoint(&self) -> String {
        format!("{}/v1/chat/completions", self.api_base)
    }

    async fn complete_once(&self, messages: &[ChatMessage]) -> Result<String> {
        let request = CompletionRequest {
            model: &self.model,
            messages,
        };

        tracing::debug!(
            "Sending {} messages to {} (model {})",
            messages.len(),
            self.endpoint(),
            self.model
        );

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Chat completion response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MaestroError::ApiResponseError {
                status: status.as_u16(),
                body,
            });
        }

        let completion: CompletionResponse = response.json().await?;
        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(MaestroError::EmptyResponse)
    }
}

#[async_trait]
impl ChatBackend for OpenAiClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        let mut attempt = 0;
        loop {
            match self.complete_once(messages).await {
                Ok(reply) => return Ok(reply),
                Err(e) if e.is_retryable() && attempt + 1 < self.max_retries => {
                    let delay = self.backoff_delay(attempt);
                    tracing::warn!(
                        "Chat request failed (attempt {}/{}): {}; retrying in {:?}",
                        attempt + 1,
                        self.max_retries,
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn client_for(server: &MockServer, retries: u32) -> OpenAiClient {
        OpenAiClient::with_settings("test-key", &server.base_url(), "gpt-4o-mini", 5, retries)
            .unwrap()
            .with_base_delay(Duration::from_millis(1))
    }

    fn reply_body(content: &str) -> serde_json::Value {
        serde_json::json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "model": "gpt-4o-mini",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }]
        })
    }

    #[tokio::test]
    async fn test_complete_sends_model_messages_and_key() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/v1/chat/completions")
                .header("Authorization", "Bearer test-key")
                .json_body(serde_json::json!({
                    "model": "gpt-4o-mini",
                    "messages": [
                        {"role": "system", "content": "be brief"},
                        {"role": "user", "content": "hi"}
                    ]
                }));
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(reply_body("Hello! Looking for a car?"));
        });

        let client = client_for(&server, 1);
        let reply = client
            .complete(&[ChatMessage::system("be brief"), ChatMessage::user("hi")])
            .await
            .unwrap();

        api_mock.assert();
        assert_eq!(reply, "Hello! Looking for a car?");
    }

    #[tokio::test]
    async fn test_client_error_is_not_retried() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(401).body("invalid api key");
        });

        let client = client_for(&server, 3);
        let err = client.complete(&[ChatMessage::user("hi")]).await.unwrap_err();

        api_mock.assert_hits(1);
        match err {
            MaestroError::ApiResponseError { status, body } => {
                assert_eq!(status, 401);
                assert_eq!(body, "invalid api key");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_server_error_is_retried_up_to_limit() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(503);
        });

        let client = client_for(&server, 3);
        let result = client.complete(&[ChatMessage::user("hi")]).await;

        api_mock.assert_hits(3);
        assert!(matches!(
            result,
            Err(MaestroError::ApiResponseError { status: 503, .. })
        ));
    }

    #[tokio::test]
    async fn test_rate_limit_is_retried_up_to_limit() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(429).body("slow down");
        });

        let client = client_for(&server, 4);
        let result = client.complete(&[ChatMessage::user("hi")]).await;

        api_mock.assert_hits(4);
        assert!(matches!(
            result,
            Err(MaestroError::ApiResponseError { status: 429, .. })
        ));
    }

    #[tokio::test]
    async fn test_configured_retries_are_capped() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(503);
        });

        let client =
            OpenAiClient::with_settings("test-key", &server.base_url(), "gpt-4o-mini", 5, 40)
                .unwrap()
                .with_base_delay(Duration::ZERO);
        let result = client.complete(&[ChatMessage::user("hi")]).await;

        api_mock.assert_hits(MAX_RETRIES as usize);
        assert!(matches!(
            result,
            Err(MaestroError::ApiResponseError { status: 503, .. })
        ));
    }

    #[test]
    fn test_backoff_doubles_and_saturates() {
        let client = OpenAiClient::with_settings("k", "http://localhost:9000", "m", 5, 3)
            .unwrap()
            .with_base_delay(Duration::from_millis(500));

        assert_eq!(client.backoff_delay(0), Duration::from_millis(500));
        assert_eq!(client.backoff_delay(2), Duration::from_secs(2));
        assert_eq!(client.backoff_delay(6), MAX_RETRY_DELAY);
        assert_eq!(client.backoff_delay(40), MAX_RETRY_DELAY);
        assert_eq!(client.backoff_delay(u32::MAX), MAX_RETRY_DELAY);
    }

    #[tokio::test]
    async fn test_dropped_connections_are_retried() {
        use std::net::TcpListener;
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let api_base = format!("http://{}", listener.local_addr().unwrap());
        let accepted = Arc::new(AtomicUsize::new(0));
        let counter = accepted.clone();
        std::thread::spawn(move || {
            for stream in listener.incoming() {
                counter.fetch_add(1, Ordering::SeqCst);
                drop(stream);
            }
        });

        let client = OpenAiClient::with_settings("test-key", &api_base, "gpt-4o-mini", 5, 3)
            .unwrap()
            .with_base_delay(Duration::from_millis(1));
        let err = client.complete(&[ChatMessage::user("hi")]).await.unwrap_err();

        assert!(matches!(err, MaestroError::ApiError(_)));
        assert!(err.is_retryable());
        assert_eq!(accepted.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_connection_refused_is_retryable_network_error() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let client = OpenAiClient::with_settings(
            "test-key",
            &format!("http://127.0.0.1:{}", port),
            "gpt-4o-mini",
            5,
            2,
        )
        .unwrap()
        .with_base_delay(Duration::from_millis(1));
        let err = client.complete(&[ChatMessage::user("hi")]).await.unwrap_err();

        match &err {
            MaestroError::ApiError(e) => assert!(e.is_connect()),
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(err.is_retryable());
        assert_eq!(err.category(), crate::utils::error::ErrorCategory::Network);
    }

    #[tokio::test]
    async fn test_request_timeout_fires() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(reply_body("too late"))
                .delay(Duration::from_secs(3));
        });

        let client =
            OpenAiClient::with_settings("test-key", &server.base_url(), "gpt-4o-mini", 1, 1)
                .unwrap();
        let err = client.complete(&[ChatMessage::user("hi")]).await.unwrap_err();

        match &err {
            MaestroError::ApiError(e) => assert!(e.is_timeout()),
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_missing_choices_is_empty_response() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({"choices": []}));
        });

        let client = client_for(&server, 1);
        let result = client.complete(&[ChatMessage::user("hi")]).await;
        assert!(matches!(result, Err(MaestroError::EmptyResponse)));
    }

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        let client =
            OpenAiClient::with_settings("k", "http://localhost:9000/", "m", 5, 1).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:9000/v1/chat/completions");
    }
}
