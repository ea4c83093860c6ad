//! Token counting with tiktoken, used for the conversation-memory budget.

use tiktoken_rs::CoreBPE;

/// Counts tokens using the cl100k_base BPE.
///
/// The counts are approximate relative to whatever model is actually serving
/// the chat, which is fine: the memory budget they feed is itself
/// approximate.
pub struct Tokenizer {
    bpe: CoreBPE,
}

impl Tokenizer {
    pub fn new() -> Self {
        Self {
            bpe: tiktoken_rs::cl100k_base().expect("cl100k_base should always be available"),
        }
    }

    /// Number of tokens in `text`.
    pub fn count(&self, text: &str) -> usize {
        self.bpe.encode_with_special_tokens(text).len()
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}
