//! Client for an OpenAI-compatible embeddings endpoint.
//!
//! Sends `POST {base_url}/v1/embeddings` with `{"model", "input"}` and reads
//! `data[0].embedding`. Rate limits (429) and server errors are retried with
//! exponential backoff; other client errors fail immediately.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::error::EmbeddingError;
use super::provider::EmbeddingProvider;
use crate::constants::validate_embedding_dim;

/// Retries after the first attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

const EMBEDDINGS_PATH: &str = "/v1/embeddings";
const API_KEY_ENV: &str = "COFOUND_EMBEDDING_API_KEY";

#[derive(Debug, Clone)]
pub struct HttpEmbedderConfig {
    pub base_url: String,
    pub model: String,
    pub dimension: usize,
    pub timeout: Duration,
    pub max_retries: u32,
    /// Optional bearer token. Read from `COFOUND_EMBEDDING_API_KEY` by [`HttpEmbedderConfig::new`].
    pub api_key: Option<String>,
}

impl HttpEmbedderConfig {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>, dimension: usize) -> Self {
        Self {
            base_url: base_url.into(),
            model: model.into(),
            dimension,
            timeout: Duration::from_secs(30),
            max_retries: DEFAULT_MAX_RETRIES,
            api_key: std::env::var(API_KEY_ENV).ok().filter(|k| !k.trim().is_empty()),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Full endpoint URL.
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), EMBEDDINGS_PATH)
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

/// Remote embedding provider.
pub struct HttpEmbedder {
    client: reqwest::Client,
    config: HttpEmbedderConfig,
    endpoint: String,
}

impl std::fmt::Debug for HttpEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpEmbedder")
            .field("endpoint", &self.endpoint)
            .field("model", &self.config.model)
            .field("dimension", &self.config.dimension)
            .finish()
    }
}

impl HttpEmbedder {
    pub fn new(config: HttpEmbedderConfig) -> Result<Self, EmbeddingError> {
        if config.dimension == 0 {
            return Err(EmbeddingError::InvalidConfig {
                reason: "embedding dimension must be greater than zero".to_string(),
            });
        }
        if config.model.trim().is_empty() {
            return Err(EmbeddingError::InvalidConfig {
                reason: "embedding model name is empty".to_string(),
            });
        }

        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        let endpoint = config.endpoint();

        Ok(Self {
            client,
            config,
            endpoint,
        })
    }

    async fn request_once(&self, text: &str) -> Result<Vec<f32>, AttemptError> {
        let mut request = self.client.post(&self.endpoint).json(&EmbeddingRequest {
            model: &self.config.model,
            input: text,
        });
        if let Some(ref key) = self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AttemptError::Retryable(e.into()))?;
        let status = response.status();

        if status.is_success() {
            let body: EmbeddingResponse = response.json().await.map_err(|e| {
                AttemptError::Fatal(EmbeddingError::InvalidResponse {
                    reason: e.to_string(),
                })
            })?;
            return parse_embedding(body, self.config.dimension).map_err(AttemptError::Fatal);
        }

        let body = response.text().await.unwrap_or_default();
        let err = EmbeddingError::ServiceError {
            status: status.as_u16(),
            body,
        };
        if status.as_u16() == 429 || status.is_server_error() {
            Err(AttemptError::Retryable(err))
        } else {
            Err(AttemptError::Fatal(err))
        }
    }
}

enum AttemptError {
    Retryable(EmbeddingError),
    Fatal(EmbeddingError),
}

fn parse_embedding(body: EmbeddingResponse, dimension: usize) -> Result<Vec<f32>, EmbeddingError> {
    let embedding = body
        .data
        .into_iter()
        .next()
        .map(|d| d.embedding)
        .ok_or_else(|| EmbeddingError::InvalidResponse {
            reason: "missing data[0].embedding".to_string(),
        })?;

    validate_embedding_dim(embedding.len(), dimension)?;
    Ok(embedding)
}

impl EmbeddingProvider for HttpEmbedder {
    fn dimension(&self) -> usize {
        self.config.dimension
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut last_err = None;

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                let delay = Duration::from_millis(250 << (attempt - 1).min(5));
                tokio::time::sleep(delay).await;
            }

            match self.request_once(text).await {
                Ok(embedding) => {
                    debug!(attempt, dim = embedding.len(), "Embedding received");
                    return Ok(embedding);
                }
                Err(AttemptError::Fatal(err)) => return Err(err),
                Err(AttemptError::Retryable(err)) => {
                    warn!(attempt, error = %err, "Embedding request failed, retrying");
                    last_err = Some(err);
                }
            }
        }

        Err(last_err.unwrap_or_else(|| EmbeddingError::RequestFailed {
            reason: "embedding failed after retries".to_string(),
        }))
    }
}
