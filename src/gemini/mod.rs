//! Streaming transport to the hosted generation endpoint.

pub mod types;

use crate::config::Config;
use crate::event::AppEvent;
use crate::session::Turn;
use eventsource_stream::Eventsource;
use futures::StreamExt;
use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::time::timeout;
use types::{GenerateContentChunk, GenerateContentRequest, GenerationConfig};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("no API key configured (set GEMINI_API_KEY)")]
    MissingApiKey,

    #[error("tokio runtime unavailable: {0}")]
    Runtime(String),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("endpoint returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("stream error: {0}")]
    Stream(String),

    #[error("stream idle for {0}s")]
    Timeout(u64),

    #[error("malformed chunk: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("API error: {0}")]
    Api(String),
}

#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    config: Arc<Config>,
    tx: mpsc::Sender<AppEvent>,
    runtime_handle: Handle,
}

impl GeminiClient {
    pub fn new(config: Config, tx: mpsc::Sender<AppEvent>) -> Result<Self, TransportError> {
        let runtime_handle =
            Handle::try_current().map_err(|err| TransportError::Runtime(err.to_string()))?;
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            config: Arc::new(config),
            tx,
            runtime_handle,
        })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn stream_url(&self) -> String {
        stream_url(&self.config.api_base, &self.config.model)
    }

    /// Starts one turn on the runtime. Results arrive on the event channel.
    pub fn send(&self, history: Vec<Turn>, generation: GenerationConfig) {
        let client = self.clone();
        self.runtime_handle.spawn(async move {
            let tx = client.tx.clone();
            match client.stream_turn(&history, &generation).await {
                Ok(()) => {
                    let _ = tx.send(AppEvent::StreamEnd);
                }
                Err(err) => {
                    tracing::error!(error = %err, "generation stream failed");
                    let _ = tx.send(AppEvent::StreamFailed(err.to_string()));
                }
            }
        });
    }

    async fn stream_turn(
        &self,
        history: &[Turn],
        generation: &GenerationConfig,
    ) -> Result<(), TransportError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or(TransportError::MissingApiKey)?;

        let request = GenerateContentRequest::new(history, generation);
        tracing::info!(model = %self.config.model, turns = history.len(), "starting generation stream");
        let response = self
            .http
            .post(self.stream_url())
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Status { status, body });
        }
        let _ = self.tx.send(AppEvent::StreamStarted);

        let idle_timeout = Duration::from_secs(self.config.request_timeout_secs);
        let mut stream = response.bytes_stream().eventsource();
        loop {
            let event = match timeout(idle_timeout, stream.next()).await {
                Ok(Some(Ok(event))) => event,
                Ok(Some(Err(err))) => return Err(TransportError::Stream(err.to_string())),
                Ok(None) => return Ok(()),
                Err(_) => return Err(TransportError::Timeout(idle_timeout.as_secs())),
            };

            tracing::trace!(data = %event.data, "sse event");
            let Some(text) = chunk_text(&event.data)? else {
                continue;
            };
            if self.tx.send(AppEvent::StreamDelta(text)).is_err() {
                tracing::warn!("event receiver dropped, abandoning stream");
                return Ok(());
            }
        }
    }
}

pub fn stream_url(api_base: &str, model: &str) -> String {
    format!(
        "{}/v1beta/models/{model}:streamGenerateContent?alt=sse",
        api_base.trim_end_matches('/')
    )
}

/// Text carried by one SSE payload. `None` for keep-alives and chunks with
/// no text, which callers skip.
pub fn chunk_text(data: &str) -> Result<Option<String>, TransportError> {
    let data = data.trim();
    if data.is_empty() {
        return Ok(None);
    }
    let chunk: GenerateContentChunk = serde_json::from_str(data)?;
    if let Some(error) = chunk.error {
        let message = error
            .message
            .unwrap_or_else(|| "an error occurred during streaming".to_string());
        return Err(TransportError::Api(match error.code {
            Some(code) => format!("{code} {message}"),
            None => message,
        }));
    }
    let text = chunk.text();
    Ok((!text.is_empty()).then_some(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_url_targets_sse_endpoint() {
        assert_eq!(
            stream_url("https://example.test/", "gemini-2.5-flash"),
            "https://example.test/v1beta/models/gemini-2.5-flash:streamGenerateContent?alt=sse"
        );
    }

    #[test]
    fn chunk_text_skips_empty_payloads() {
        assert!(chunk_text("").expect("empty payload is fine").is_none());
        assert!(chunk_text(r#"{"candidates":[]}"#)
            .expect("metadata chunk is fine")
            .is_none());
    }

    #[test]
    fn chunk_text_returns_fragment() {
        let text = chunk_text(r#"{"candidates":[{"content":{"parts":[{"text":"* Planning"}]}}]}"#)
            .expect("chunk should decode");
        assert_eq!(text.as_deref(), Some("* Planning"));
    }

    #[test]
    fn chunk_text_surfaces_api_errors() {
        let err = chunk_text(r#"{"error":{"code":500,"message":"boom"}}"#)
            .expect_err("error payload should fail");
        assert_eq!(err.to_string(), "API error: 500 boom");
    }

    #[test]
    fn chunk_text_rejects_malformed_json() {
        assert!(matches!(
            chunk_text("{oops"),
            Err(TransportError::Decode(_))
        ));
    }
}
