//! Process configuration, read from the environment at startup.
//!
//! `.env` files are honored by the binary before this runs. The model API
//! credential itself is read by the gateway (`OPENAI_API_KEY`); its absence
//! fails the model call, not startup.

use crate::error::{ConsultError, Result};
use crate::session::DEFAULT_MEMORY_BUDGET;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub model: String,
    pub temperature: f32,
    pub memory_budget: usize,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let bind_addr = env_or("CONSULT_ADDR", "127.0.0.1:3000");
        let model = env_or("CONSULT_MODEL", "gpt-4o-mini");

        let temperature = env_or("CONSULT_TEMPERATURE", "0.5")
            .parse::<f32>()
            .map_err(|e| ConsultError::Config(format!("CONSULT_TEMPERATURE: {}", e)))?;

        let memory_budget = env_or("CONSULT_MEMORY_BUDGET", &DEFAULT_MEMORY_BUDGET.to_string())
            .parse::<usize>()
            .map_err(|e| ConsultError::Config(format!("CONSULT_MEMORY_BUDGET: {}", e)))?;

        Ok(Self {
            bind_addr,
            model,
            temperature,
            memory_budget,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        // None of the CONSULT_* variables are set in the test environment
        let config = AppConfig::from_env().unwrap();

        assert_eq!(config.bind_addr, "127.0.0.1:3000");
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.temperature, 0.5);
        assert_eq!(config.memory_budget, DEFAULT_MEMORY_BUDGET);
    }

    #[test]
    fn test_env_or_prefers_default_when_unset() {
        assert_eq!(env_or("CONSULT_NO_SUCH_VAR", "fallback"), "fallback");
    }
}
