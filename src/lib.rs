pub mod config;
pub mod controller;
pub mod error;
pub mod http;
pub mod llm;
pub mod persona;
pub mod prompt;
pub mod session;
pub mod sink;

pub use error::{ConsultError, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::controller::Controller;
    pub use crate::error::{ConsultError, Result};
    pub use crate::llm::gateways::OpenAIGateway;
    pub use crate::llm::{ChatMessage, CompletionConfig, LlmGateway, MessageRole};
    pub use crate::persona::Persona;
    pub use crate::session::SessionContext;
}
