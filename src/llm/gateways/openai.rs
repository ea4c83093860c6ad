//! OpenAI gateway for LLM interactions.
//!
//! Provides chat completions against the OpenAI API, whole-answer and
//! streamed. Streaming parses the SSE response body and yields the
//! `delta.content` fragments in arrival order.

use crate::error::{ConsultError, Result};
use crate::llm::gateway::{CompletionConfig, FragmentStream, LlmGateway};
use crate::llm::models::ChatMessage;
use async_trait::async_trait;
use futures::stream::StreamExt;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info, warn};

/// Configuration for connecting to the OpenAI API.
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Option<std::time::Duration>,
}

impl Default for OpenAIConfig {
    fn default() -> Self {
        Self {
            api_key: std::env::var("OPENAI_API_KEY").unwrap_or_default(),
            base_url: std::env::var("OPENAI_API_ENDPOINT")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            timeout: None,
        }
    }
}

/// Gateway for the OpenAI chat-completions service.
pub struct OpenAIGateway {
    client: Client,
    config: OpenAIConfig,
}

impl OpenAIGateway {
    /// Create a new gateway configured from the environment.
    pub fn new() -> Self {
        Self::with_config(OpenAIConfig::default())
    }

    /// Create a new gateway with custom configuration.
    pub fn with_config(config: OpenAIConfig) -> Self {
        let mut client_builder = Client::builder();

        if let Some(timeout) = config.timeout {
            client_builder = client_builder.timeout(timeout);
        }

        let client = client_builder.build().unwrap();

        Self { client, config }
    }

    /// Create gateway with custom API key and base URL.
    pub fn with_api_key_and_base_url(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self::with_config(OpenAIConfig {
            api_key: api_key.into(),
            base_url: base_url.into(),
            ..Default::default()
        })
    }

    /// An absent credential fails the model call, nothing else.
    fn ensure_api_key(&self) -> Result<()> {
        if self.config.api_key.is_empty() {
            return Err(ConsultError::Config("OPENAI_API_KEY is not set".to_string()));
        }
        Ok(())
    }

    fn request_body(
        &self,
        model: &str,
        messages: &[ChatMessage],
        config: &CompletionConfig,
        stream: bool,
    ) -> Value {
        serde_json::json!({
            "model": model,
            "messages": messages,
            "temperature": config.temperature,
            "max_tokens": config.max_tokens,
            "stream": stream,
        })
    }
}

impl Default for OpenAIGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LlmGateway for OpenAIGateway {
    async fn complete(
        &self,
        model: &str,
        messages: &[ChatMessage],
        config: &CompletionConfig,
    ) -> Result<String> {
        self.ensure_api_key()?;

        info!("Delegating to OpenAI for completion");
        debug!("Model: {}, Message count: {}", model, messages.len());

        let body = self.request_body(model, messages, config, false);

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(ConsultError::Gateway(format!(
                "OpenAI API error: {} - {}",
                status, error_text
            )));
        }

        let response_body: Value = response.json().await?;

        let content = response_body["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| ConsultError::Gateway("No content in response".to_string()))?;

        Ok(content.to_string())
    }

    fn complete_stream<'a>(
        &'a self,
        model: &'a str,
        messages: &'a [ChatMessage],
        config: &'a CompletionConfig,
    ) -> FragmentStream<'a> {
        Box::pin(async_stream::stream! {
            if let Err(e) = self.ensure_api_key() {
                yield Err(e);
                return;
            }

            info!("Starting OpenAI streaming completion");
            debug!("Model: {}, Message count: {}", model, messages.len());

            let body = self.request_body(model, messages, config, true);

            let response = match self
                .client
                .post(format!("{}/chat/completions", self.config.base_url))
                .header("Authorization", format!("Bearer {}", self.config.api_key))
                .header("Content-Type", "application/json")
                .json(&body)
                .send()
                .await
            {
                Ok(r) => r,
                Err(e) => {
                    yield Err(e.into());
                    return;
                }
            };

            if !response.status().is_success() {
                let status = response.status();
                let error_text = response.text().await.unwrap_or_default();
                yield Err(ConsultError::Gateway(format!(
                    "OpenAI API error: {} - {}",
                    status, error_text
                )));
                return;
            }

            // Process SSE lines as network chunks arrive. Chunk boundaries
            // can split a multibyte UTF-8 character, so buffer raw bytes and
            // only decode complete lines.
            let mut stream = response.bytes_stream();
            let mut buffer: Vec<u8> = Vec::new();

            while let Some(chunk_result) = stream.next().await {
                match chunk_result {
                    Ok(bytes) => {
                        buffer.extend_from_slice(&bytes);

                        while let Some(line_end) = buffer.iter().position(|&b| b == b'\n') {
                            let line_bytes: Vec<u8> = buffer.drain(..=line_end).collect();

                            let line = match std::str::from_utf8(&line_bytes) {
                                Ok(text) => text.trim(),
                                Err(e) => {
                                    warn!("Skipping non-UTF-8 SSE line: {}", e);
                                    continue;
                                }
                            };

                            if line.is_empty() || !line.starts_with("data: ") {
                                continue;
                            }

                            let data = line.strip_prefix("data: ").unwrap();

                            if data == "[DONE]" {
                                continue;
                            }

                            match serde_json::from_str::<Value>(data) {
                                Ok(json) => {
                                    if let Some(content) =
                                        json["choices"][0]["delta"]["content"].as_str()
                                    {
                                        if !content.is_empty() {
                                            yield Ok(content.to_string());
                                        }
                                    }
                                }
                                Err(e) => {
                                    warn!("Failed to parse streaming chunk: {}", e);
                                }
                            }
                        }
                    }
                    Err(e) => {
                        yield Err(e.into());
                        return;
                    }
                }
            }
        })
    }
}
