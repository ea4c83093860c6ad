pub mod gateway;
pub mod gateways;
pub mod models;
pub mod tokenizer;

pub use gateway::{CompletionConfig, FragmentStream, LlmGateway};
pub use models::{ChatMessage, MessageRole};
pub use tokenizer::Tokenizer;
