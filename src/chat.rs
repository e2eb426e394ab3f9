use anyhow::Result;
use log::{debug, warn};
use serde_json::json;
use std::collections::VecDeque;

use crate::providers::traits::{Completion, CompletionProvider};
use crate::retrieval::Retriever;
use crate::tools::{self, ToolOutput, ToolSpec};

/// Exchanges kept in the rolling history window.
const HISTORY_WINDOW: usize = 8;

struct Exchange {
    user: String,
    assistant: String,
}

/// One conversation: a provider, optionally a retriever for grounded
/// answers, the kitchen tools, and a bounded history folded into each
/// prompt.
pub struct ChatSession {
    provider: Box<dyn CompletionProvider + Send + Sync>,
    retriever: Option<Retriever>,
    tools: Vec<ToolSpec>,
    history: VecDeque<Exchange>,
}

impl ChatSession {
    pub fn new(
        provider: Box<dyn CompletionProvider + Send + Sync>,
        retriever: Option<Retriever>,
    ) -> Self {
        Self {
            provider,
            retriever,
            tools: tools::kitchen_tools(),
            history: VecDeque::new(),
        }
    }

    pub fn has_retriever(&self) -> bool {
        self.retriever.is_some()
    }

    pub fn knowledge_titles(&self) -> Option<Vec<&str>> {
        self.retriever.as_ref().map(|r| r.titles())
    }

    pub async fn model_info(&self) -> Result<String> {
        self.provider.get_model_info().await
    }

    /// Runs one user turn and returns the assistant's answer. Retrieval and
    /// the single tool round only happen when a retriever is attached.
    pub async fn turn(&mut self, user_message: &str) -> Result<String> {
        let response = match &self.retriever {
            Some(retriever) => self.grounded_turn(retriever, user_message).await?,
            None => self.plain_turn(user_message).await?,
        };

        self.history.push_back(Exchange {
            user: user_message.to_string(),
            assistant: response.clone(),
        });
        while self.history.len() > HISTORY_WINDOW {
            self.history.pop_front();
        }

        Ok(response)
    }

    async fn plain_turn(&self, user_message: &str) -> Result<String> {
        self.provider
            .complete(&self.with_history(&format!("User: {}\nAssistant:", user_message)))
            .await
    }

    async fn grounded_turn(&self, retriever: &Retriever, user_message: &str) -> Result<String> {
        let hits = retriever.retrieve(self.provider.as_ref(), user_message).await?;
        let prompt = self.with_history(&Retriever::build_grounded_prompt(&hits, user_message));

        match self.provider.complete_with_tools(&prompt, &self.tools).await? {
            Completion::Text(text) => Ok(text),
            Completion::ToolCalls(calls) => {
                debug!("executing {} tool call(s)", calls.len());
                let outputs: Vec<ToolOutput> = calls
                    .into_iter()
                    .map(|call| {
                        let result = match tools::dispatch(&call) {
                            Ok(value) => value,
                            Err(e) => {
                                // The model sees the failure and can recover
                                // in its answer; the turn itself goes on.
                                warn!("tool '{}' failed: {}", call.name, e);
                                json!({ "error": e.to_string() })
                            }
                        };
                        ToolOutput { call, result }
                    })
                    .collect();

                self.provider
                    .resolve_tool_calls(&prompt, &outputs, &self.tools)
                    .await
            }
        }
    }

    /// Prefixes the prompt with the recent exchanges so the model keeps
    /// conversational context across turns.
    fn with_history(&self, prompt: &str) -> String {
        if self.history.is_empty() {
            return prompt.to_string();
        }

        let mut block = String::from("Earlier in this conversation:\n");
        for exchange in &self.history {
            block.push_str(&format!(
                "User: {}\nAssistant: {}\n",
                exchange.user, exchange.assistant
            ));
        }
        format!("{}\n{}", block, prompt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    /// Scripted provider: returns canned completions and records every
    /// prompt it was given.
    #[derive(Clone)]
    struct ScriptedProvider {
        prompts: Arc<Mutex<Vec<String>>>,
        tool_call: Option<crate::tools::ToolCall>,
        reply: String,
    }

    impl ScriptedProvider {
        fn replying(reply: &str) -> Self {
            Self {
                prompts: Arc::new(Mutex::new(Vec::new())),
                tool_call: None,
                reply: reply.to_string(),
            }
        }

        fn calling(call: crate::tools::ToolCall, reply: &str) -> Self {
            Self {
                prompts: Arc::new(Mutex::new(Vec::new())),
                tool_call: Some(call),
                reply: reply.to_string(),
            }
        }

        fn seen_prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CompletionProvider for ScriptedProvider {
        async fn new(_api_key: String, _system_message: String) -> Result<Self> {
            Err(anyhow!("scripted providers are built directly"))
        }

        async fn complete(&self, prompt: &str) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok(self.reply.clone())
        }

        async fn complete_with_tools(
            &self,
            prompt: &str,
            _tools: &[ToolSpec],
        ) -> Result<Completion> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            match &self.tool_call {
                Some(call) => Ok(Completion::ToolCalls(vec![call.clone()])),
                None => Ok(Completion::Text(self.reply.clone())),
            }
        }

        async fn resolve_tool_calls(
            &self,
            _prompt: &str,
            outputs: &[ToolOutput],
            _tools: &[ToolSpec],
        ) -> Result<String> {
            Ok(format!("{} [{} tool results]", self.reply, outputs.len()))
        }

        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            Ok(crate::providers::utils::hashed_embedding(text, 768))
        }

        fn embedding_dimension(&self) -> usize {
            768
        }

        async fn update_persona(&self, _system_message: String) -> Result<()> {
            Ok(())
        }

        async fn get_model_info(&self) -> Result<String> {
            Ok("scripted".to_string())
        }

        fn get_system_message(&self) -> String {
            String::new()
        }

        fn clone_box(&self) -> Box<dyn CompletionProvider + Send + Sync> {
            Box::new(self.clone())
        }
    }

    #[tokio::test]
    async fn test_plain_turn_threads_history() {
        let provider = ScriptedProvider::replying("Wah! Try nasi goreng.");
        let probe = provider.clone();
        let mut session = ChatSession::new(Box::new(provider), None);

        session.turn("what should I cook?").await.unwrap();
        session.turn("anything spicier?").await.unwrap();

        let prompts = probe.seen_prompts();
        assert!(!prompts[0].contains("Earlier in this conversation"));
        assert!(prompts[1].contains("Earlier in this conversation"));
        assert!(prompts[1].contains("User: what should I cook?"));
        assert!(prompts[1].contains("Assistant: Wah! Try nasi goreng."));
    }

    #[tokio::test]
    async fn test_history_window_is_bounded() {
        let provider = ScriptedProvider::replying("ok");
        let probe = provider.clone();
        let mut session = ChatSession::new(Box::new(provider), None);

        for i in 0..HISTORY_WINDOW + 3 {
            session.turn(&format!("question {}", i)).await.unwrap();
        }

        let last = probe.seen_prompts().pop().unwrap();
        assert!(!last.contains("question 0"));
        assert!(last.contains(&format!("question {}", HISTORY_WINDOW + 1)));
    }

    #[tokio::test]
    async fn test_grounded_turn_runs_one_tool_round() {
        let call = crate::tools::ToolCall {
            id: "1".to_string(),
            name: "convert_units".to_string(),
            arguments: json!({ "value": 1.0, "from": "cup", "to": "ml" }),
        };
        let provider = ScriptedProvider::calling(call, "About 237 ml!");
        let retriever_provider = provider.clone();
        let retriever = Retriever::from_builtin(&retriever_provider, 3, 0.0)
            .await
            .unwrap();
        let mut session = ChatSession::new(Box::new(provider), Some(retriever));

        let answer = session.turn("how many ml in a cup?").await.unwrap();
        assert_eq!(answer, "About 237 ml! [1 tool results]");
    }

    #[tokio::test]
    async fn test_grounded_prompt_reaches_provider() {
        let provider = ScriptedProvider::replying("Rinse the rice first!");
        let probe = provider.clone();
        let retriever = Retriever::from_builtin(&probe, 3, -1.0).await.unwrap();
        let mut session = ChatSession::new(Box::new(provider), Some(retriever));

        session.turn("water ratio for jasmine rice?").await.unwrap();

        let prompts = probe.seen_prompts();
        let grounded = prompts.last().unwrap();
        assert!(grounded.contains("Relevant kitchen notes:"));
        assert!(grounded.contains("[Score:"));
    }
}
