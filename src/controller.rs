//! Drives one exchange: prompt assembly, streaming, rendering, persistence.

use crate::error::Result;
use crate::llm::gateway::{CompletionConfig, LlmGateway};
use crate::persona::Persona;
use crate::prompt;
use crate::session::SessionContext;
use crate::sink::{FragmentSink, StreamingBuffer};
use futures::stream::StreamExt;
use std::sync::Arc;
use tracing::{debug, info};

pub struct Controller {
    gateway: Arc<dyn LlmGateway>,
    model: String,
    config: CompletionConfig,
}

impl Controller {
    pub fn new(gateway: Arc<dyn LlmGateway>, model: impl Into<String>, temperature: f32) -> Self {
        Self {
            gateway,
            model: model.into(),
            config: CompletionConfig {
                temperature,
                ..Default::default()
            },
        }
    }

    /// Run one exchange against the model.
    ///
    /// An empty or whitespace-only question is a no-op: no model call, no
    /// state change, `Ok(None)`. Otherwise the answer is streamed into the
    /// sink render by render, and only after the stream completes is the
    /// exchange persisted, exactly once, to both conversation memory and the
    /// transcript. On a stream error nothing is persisted and the error is
    /// returned.
    pub async fn ask<S: FragmentSink>(
        &self,
        session: &mut SessionContext,
        persona: Persona,
        question: &str,
        sink: &mut S,
    ) -> Result<Option<String>> {
        let question = question.trim();
        if question.is_empty() {
            debug!("Empty question, skipping model call");
            return Ok(None);
        }

        let messages = prompt::assemble(persona, &session.memory, question);
        info!(persona = persona.id(), message_count = messages.len(), "Starting exchange");

        let mut buffer = StreamingBuffer::default();
        {
            let mut stream = self.gateway.complete_stream(&self.model, &messages, &self.config);

            while let Some(result) = stream.next().await {
                let fragment = result?;
                buffer.push(&fragment);
                sink.render_partial(&buffer.rendered());
            }
        }

        let answer = buffer.into_text();
        sink.render_final(&answer);
        session.record_exchange(question, &answer);
        debug!(total_tokens = session.memory.total_tokens(), "Exchange recorded");

        Ok(Some(answer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConsultError;
    use crate::llm::gateway::FragmentStream;
    use crate::llm::models::ChatMessage;
    use async_trait::async_trait;
    use futures::stream;
    use std::sync::Mutex;

    /// Gateway that replays scripted fragments and records the prompts it saw.
    struct ScriptedGateway {
        fragments: Vec<String>,
        fail_after: Option<usize>,
        seen: Mutex<Vec<Vec<ChatMessage>>>,
    }

    impl ScriptedGateway {
        fn new(fragments: Vec<&str>) -> Self {
            Self {
                fragments: fragments.into_iter().map(String::from).collect(),
                fail_after: None,
                seen: Mutex::new(Vec::new()),
            }
        }

        fn failing_after(fragments: Vec<&str>, after: usize) -> Self {
            Self {
                fail_after: Some(after),
                ..Self::new(fragments)
            }
        }
    }

    #[async_trait]
    impl LlmGateway for ScriptedGateway {
        async fn complete(
            &self,
            _model: &str,
            messages: &[ChatMessage],
            _config: &CompletionConfig,
        ) -> crate::error::Result<String> {
            self.seen.lock().unwrap().push(messages.to_vec());
            Ok(self.fragments.concat())
        }

        fn complete_stream<'a>(
            &'a self,
            _model: &'a str,
            messages: &'a [ChatMessage],
            _config: &'a CompletionConfig,
        ) -> FragmentStream<'a> {
            self.seen.lock().unwrap().push(messages.to_vec());

            let mut items: Vec<crate::error::Result<String>> = Vec::new();
            for (i, fragment) in self.fragments.iter().enumerate() {
                if self.fail_after == Some(i) {
                    items.push(Err(ConsultError::Gateway("stream broke".to_string())));
                    break;
                }
                items.push(Ok(fragment.clone()));
            }
            if self.fail_after == Some(self.fragments.len()) {
                items.push(Err(ConsultError::Gateway("stream broke".to_string())));
            }

            Box::pin(stream::iter(items))
        }
    }

    fn controller(gateway: Arc<ScriptedGateway>) -> Controller {
        Controller::new(gateway, "test-model", 0.5)
    }

    #[tokio::test]
    async fn test_successful_exchange_renders_and_persists() {
        let gateway = Arc::new(ScriptedGateway::new(vec!["A ", "checkup ", "is..."]));
        let controller = controller(gateway);
        let mut session = SessionContext::default();

        let mut renders: Vec<(String, bool)> = Vec::new();
        let answer = {
            let mut sink = |text: &str, done: bool| renders.push((text.to_string(), done));
            controller
                .ask(&mut session, Persona::Medical, "What is a checkup?", &mut sink)
                .await
                .unwrap()
        };

        assert_eq!(answer.as_deref(), Some("A checkup is..."));
        assert_eq!(
            renders,
            vec![
                ("A ▌".to_string(), false),
                ("A checkup ▌".to_string(), false),
                ("A checkup is...▌".to_string(), false),
                ("A checkup is...".to_string(), true),
            ]
        );
        assert_eq!(session.transcript.entries(), &["What is a checkup?", "A checkup is..."]);
        let turn = session.memory.turns().last().unwrap();
        assert_eq!(turn.question, "What is a checkup?");
        assert_eq!(turn.answer, "A checkup is...");
    }

    #[tokio::test]
    async fn test_empty_question_is_a_no_op() {
        let gateway = Arc::new(ScriptedGateway::new(vec!["unused"]));
        let controller = controller(gateway.clone());
        let mut session = SessionContext::default();

        let mut renders: Vec<(String, bool)> = Vec::new();
        let answer = {
            let mut sink = |text: &str, done: bool| renders.push((text.to_string(), done));
            controller.ask(&mut session, Persona::Medical, "   ", &mut sink).await.unwrap()
        };

        assert_eq!(answer, None);
        assert!(renders.is_empty());
        assert!(session.transcript.is_empty());
        assert!(gateway.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_stream_error_persists_nothing() {
        let gateway = Arc::new(ScriptedGateway::failing_after(vec!["partial "], 1));
        let controller = controller(gateway);
        let mut session = SessionContext::default();

        let result = {
            let mut sink = |_: &str, _: bool| {};
            controller.ask(&mut session, Persona::Spiritual, "Why?", &mut sink).await
        };

        assert!(matches!(result, Err(ConsultError::Gateway(_))));
        assert!(session.transcript.is_empty());
        assert!(session.memory.is_empty());
    }

    #[tokio::test]
    async fn test_error_before_any_fragment() {
        let gateway = Arc::new(ScriptedGateway::failing_after(vec![], 0));
        let controller = controller(gateway);
        let mut session = SessionContext::default();

        let mut renders: Vec<(String, bool)> = Vec::new();
        let result = {
            let mut sink = |text: &str, done: bool| renders.push((text.to_string(), done));
            controller.ask(&mut session, Persona::Medical, "Q", &mut sink).await
        };

        assert!(result.is_err());
        assert!(renders.is_empty());
        assert!(session.transcript.is_empty());
    }

    #[tokio::test]
    async fn test_second_question_sees_first_turn() {
        let gateway = Arc::new(ScriptedGateway::new(vec!["answer"]));
        let controller = controller(gateway.clone());
        let mut session = SessionContext::default();

        let mut sink = |_: &str, _: bool| {};
        controller.ask(&mut session, Persona::Medical, "first", &mut sink).await.unwrap();
        controller.ask(&mut session, Persona::Medical, "second", &mut sink).await.unwrap();

        assert_eq!(session.transcript.len(), 4);

        let seen = gateway.seen.lock().unwrap();
        assert_eq!(seen.len(), 2);

        // Second prompt: system, first question, first answer, second question
        let second_prompt = &seen[1];
        assert_eq!(second_prompt.len(), 4);
        assert_eq!(second_prompt[1].content, "first");
        assert_eq!(second_prompt[2].content, "answer");
        assert_eq!(second_prompt[3].content, "second");
    }

    #[tokio::test]
    async fn test_question_is_trimmed_before_use() {
        let gateway = Arc::new(ScriptedGateway::new(vec!["answer"]));
        let controller = controller(gateway);
        let mut session = SessionContext::default();

        let mut sink = |_: &str, _: bool| {};
        controller.ask(&mut session, Persona::Medical, "  padded  ", &mut sink).await.unwrap();

        assert_eq!(session.transcript.entries()[0], "padded");
    }
}
