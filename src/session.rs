//! Per-session conversation state.
//!
//! A session owns two views of the same sequence of exchanges: the
//! token-bounded [`ConversationMemory`] fed back into future prompts, and the
//! flat display-only [`Transcript`]. [`SessionContext::record_exchange`]
//! updates both together; their divergence would be a correctness bug.

use crate::llm::models::ChatMessage;
use crate::llm::tokenizer::Tokenizer;
use serde::{Deserialize, Serialize};

/// Default approximate token budget for conversation memory.
pub const DEFAULT_MEMORY_BUDGET: usize = 1000;

/// One completed (question, answer) exchange. Never mutated once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub question: String,
    pub answer: String,
}

/// A turn with token count metadata for budget tracking.
#[derive(Debug, Clone)]
struct SizedTurn {
    turn: Turn,
    token_length: usize,
}

/// Ordered history of turns, bounded by an approximate token budget.
///
/// When recording a turn pushes the total over the budget, the oldest turns
/// are dropped first. The newest turn is always kept, even when it alone
/// exceeds the budget.
pub struct ConversationMemory {
    turns: Vec<SizedTurn>,
    max_tokens: usize,
    tokenizer: Tokenizer,
}

impl ConversationMemory {
    pub fn new(max_tokens: usize) -> Self {
        Self {
            turns: Vec::new(),
            max_tokens,
            tokenizer: Tokenizer::default(),
        }
    }

    /// Append a completed turn, trimming oldest-first over budget.
    pub fn record(&mut self, question: &str, answer: &str) {
        let token_length = self.tokenizer.count(question) + self.tokenizer.count(answer);
        self.turns.push(SizedTurn {
            turn: Turn {
                question: question.to_string(),
                answer: answer.to_string(),
            },
            token_length,
        });

        let mut total: usize = self.turns.iter().map(|t| t.token_length).sum();

        while total > self.max_tokens && self.turns.len() > 1 {
            let removed = self.turns.remove(0);
            total -= removed.token_length;
        }
    }

    /// Turns in chronological order.
    pub fn turns(&self) -> impl Iterator<Item = &Turn> {
        self.turns.iter().map(|t| &t.turn)
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Render the history as an alternating user/assistant message list.
    ///
    /// Read-only; prompt assembly must not mutate memory as a side effect.
    pub fn messages(&self) -> Vec<ChatMessage> {
        self.turns
            .iter()
            .flat_map(|t| {
                [
                    ChatMessage::user(t.turn.question.as_str()),
                    ChatMessage::assistant(t.turn.answer.as_str()),
                ]
            })
            .collect()
    }

    /// Approximate token total of the retained history.
    pub fn total_tokens(&self) -> usize {
        self.turns.iter().map(|t| t.token_length).sum()
    }
}

impl Default for ConversationMemory {
    fn default() -> Self {
        Self::new(DEFAULT_MEMORY_BUDGET)
    }
}

/// Flat display-only history. Even indices are the user, odd the assistant.
#[derive(Debug, Default, Clone, Serialize)]
pub struct Transcript {
    entries: Vec<String>,
}

impl Transcript {
    /// Append a completed exchange: the question, then the answer.
    pub fn push_exchange(&mut self, question: &str, answer: &str) {
        self.entries.push(question.to_string());
        self.entries.push(answer.to_string());
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// All conversation state owned by one session.
///
/// Constructed empty at session start; lost when the process ends.
pub struct SessionContext {
    pub memory: ConversationMemory,
    pub transcript: Transcript,
}

impl SessionContext {
    pub fn new(memory_budget: usize) -> Self {
        Self {
            memory: ConversationMemory::new(memory_budget),
            transcript: Transcript::default(),
        }
    }

    /// Persist a completed exchange to memory and transcript together.
    pub fn record_exchange(&mut self, question: &str, answer: &str) {
        self.memory.record(question, answer);
        self.transcript.push_exchange(question, answer);
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new(DEFAULT_MEMORY_BUDGET)
    }
}
