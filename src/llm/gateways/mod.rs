pub mod openai;

pub use openai::{OpenAIConfig, OpenAIGateway};
