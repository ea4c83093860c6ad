//! Error types and result alias used throughout the crate.
//!
//! Every fallible public API returns [`Result`]. Failures are scoped to the
//! exchange that produced them; nothing here is fatal to the process.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConsultError {
    #[error("LLM gateway error: {0}")]
    Gateway(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConsultError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_error_display() {
        let err = ConsultError::Gateway("connection refused".to_string());
        assert_eq!(err.to_string(), "LLM gateway error: connection refused");
    }

    #[test]
    fn test_config_error_display() {
        let err = ConsultError::Config("OPENAI_API_KEY is not set".to_string());
        assert_eq!(err.to_string(), "Invalid configuration: OPENAI_API_KEY is not set");
    }

    #[test]
    fn test_serialization_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: ConsultError = json_err.into();

        match err {
            ConsultError::Serialization(_) => {}
            _ => panic!("Expected Serialization"),
        }
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: ConsultError = io_err.into();

        match err {
            ConsultError::Io(_) => {}
            _ => panic!("Expected Io"),
        }
    }
}
