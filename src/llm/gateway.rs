use crate::error::Result;
use crate::llm::models::ChatMessage;
use async_trait::async_trait;
use futures::stream::Stream;
use std::pin::Pin;

/// A finite lazy sequence of answer fragments.
///
/// Concatenating every fragment in emission order yields the final answer
/// text. The stream terminates when the provider signals completion and is
/// not restartable.
pub type FragmentStream<'a> = Pin<Box<dyn Stream<Item = Result<String>> + Send + 'a>>;

/// Configuration for LLM completion
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    pub temperature: f32,
    pub max_tokens: usize,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            temperature: 1.0,
            max_tokens: 16384,
        }
    }
}

/// Abstract interface for hosted chat-completion providers
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Complete an LLM request, returning the whole answer at once.
    ///
    /// The non-streaming seam of the trait. The chat UI only streams, so
    /// nothing in the request path calls this; it exists for callers that
    /// want the answer without driving a fragment stream.
    async fn complete(
        &self,
        model: &str,
        messages: &[ChatMessage],
        config: &CompletionConfig,
    ) -> Result<String>;

    /// Complete an LLM request, yielding answer fragments as they arrive
    fn complete_stream<'a>(
        &'a self,
        model: &'a str,
        messages: &'a [ChatMessage],
        config: &'a CompletionConfig,
    ) -> FragmentStream<'a>;
}
