//! HTTP client for the Ollama generate endpoint.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::OllamaError;

use super::retry::{RetryPolicy, retry_with_backoff};

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Non-streaming client for `POST <url>` with `{model, prompt, stream: false}`.
pub struct OllamaClient {
    http: reqwest::Client,
    url: String,
    policy: RetryPolicy,
}

impl OllamaClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_policy(url, RetryPolicy::default())
    }

    pub fn with_policy(url: impl Into<String>, policy: RetryPolicy) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
            policy,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Generate a completion for `prompt`, retrying transient failures.
    ///
    /// Client errors (4xx) are returned without retrying.
    pub async fn generate(&self, model: &str, prompt: &str) -> Result<String, OllamaError> {
        let request = GenerateRequest {
            model,
            prompt,
            stream: false,
        };

        let response = retry_with_backoff(
            self.policy,
            |attempt| self.send(&request, attempt),
            OllamaError::is_retryable,
        )
        .await?;

        info!("Successful response from Ollama");
        Ok(response)
    }

    async fn send(&self, request: &GenerateRequest<'_>, attempt: u32) -> Result<String, OllamaError> {
        info!(
            "Making HTTP request to Ollama at: {} (attempt {}/{})",
            self.url, attempt, self.policy.max_attempts
        );

        let response = self
            .http
            .post(&self.url)
            .json(request)
            .send()
            .await
            .map_err(|source| OllamaError::Transport {
                attempts: attempt,
                source,
            })?;

        let status = response.status();
        debug!("HTTP request completed with status: {}", status.as_u16());

        if status != reqwest::StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(OllamaError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| OllamaError::InvalidResponse(e.to_string()))?;

        Ok(parsed.response)
    }
}
