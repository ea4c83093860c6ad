//! Prompt assembly.

use crate::llm::models::ChatMessage;
use crate::persona::Persona;
use crate::session::ConversationMemory;

/// Build the ordered message sequence for one model call: the persona's
/// system instruction, the full conversation memory, then the current
/// question.
pub fn assemble(persona: Persona, memory: &ConversationMemory, question: &str) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(memory.len() * 2 + 2);
    messages.push(ChatMessage::system(persona.system_prompt()));
    messages.extend(memory.messages());
    messages.push(ChatMessage::user(question));
    messages
}
