use anyhow::Result;
use async_trait::async_trait;

use crate::tools::{ToolCall, ToolOutput, ToolSpec};

/// What a model returned for a tool-enabled turn: either a final answer or
/// a batch of function calls it wants executed first.
#[derive(Debug)]
pub enum Completion {
    Text(String),
    ToolCalls(Vec<ToolCall>),
}

#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn new(api_key: String, system_message: String) -> Result<Self>
    where
        Self: Sized;

    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Single turn with function declarations attached.
    async fn complete_with_tools(&self, prompt: &str, tools: &[ToolSpec]) -> Result<Completion>;

    /// Follow-up turn that hands executed tool results back to the model
    /// and returns its final text answer.
    async fn resolve_tool_calls(
        &self,
        prompt: &str,
        outputs: &[ToolOutput],
        tools: &[ToolSpec],
    ) -> Result<String>;

    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    fn embedding_dimension(&self) -> usize;

    async fn update_persona(&self, system_message: String) -> Result<()>;

    async fn get_model_info(&self) -> Result<String>;

    fn get_system_message(&self) -> String;

    fn clone_box(&self) -> Box<dyn CompletionProvider + Send + Sync>;
}

impl Clone for Box<dyn CompletionProvider + Send + Sync> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}
