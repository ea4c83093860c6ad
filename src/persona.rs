//! The two expert personas offered by the UI.
//!
//! A persona is chosen once per question and parameterizes the system prompt.

use crate::error::ConsultError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Persona {
    Medical,
    Spiritual,
}

impl Persona {
    pub const ALL: [Persona; 2] = [Persona::Medical, Persona::Spiritual];

    /// Stable identifier used on the wire.
    pub fn id(&self) -> &'static str {
        match self {
            Persona::Medical => "medical",
            Persona::Spiritual => "spiritual",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Persona::Medical => "Medical expert",
            Persona::Spiritual => "Spiritual expert",
        }
    }

    /// One-line pitch shown on the landing page.
    pub fn tagline(&self) -> &'static str {
        match self {
            Persona::Medical => "Ask about advanced treatments and the latest in medicine.",
            Persona::Spiritual => "Ask about spirituality and how the universe works.",
        }
    }

    /// Placeholder for the question input.
    pub fn placeholder(&self) -> &'static str {
        match self {
            Persona::Medical => "Ask the medical expert a question.",
            Persona::Spiritual => "Ask the spiritual expert a question.",
        }
    }

    fn field(&self) -> &'static str {
        match self {
            Persona::Medical => "medicine and advanced treatments",
            Persona::Spiritual => "spirituality and how the universe works",
        }
    }

    /// System-prompt text injected for this persona.
    pub fn system_prompt(&self) -> String {
        format!(
            "You are an expert in {field}. Answer questions simply and concisely, \
             in a way a beginner can follow. Do not answer questions outside {field}.",
            field = self.field()
        )
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Persona {
    type Err = ConsultError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "medical" => Ok(Persona::Medical),
            "spiritual" => Ok(Persona::Spiritual),
            other => Err(ConsultError::Config(format!("Unknown persona: {}", other))),
        }
    }
}
