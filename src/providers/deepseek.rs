use anyhow::{anyhow, Result};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::{json, Value};
use std::sync::{Arc, RwLock};

use crate::config::ProviderConfig;
use crate::providers::traits::{Completion, CompletionProvider};
use crate::providers::utils::{hashed_embedding, EMBEDDING_DIMENSION};
use crate::tools::{ToolCall, ToolOutput, ToolSpec};

/// OpenAI-compatible chat completions. DeepSeek has no embedding endpoint,
/// so `embed` falls back to the deterministic hashed vector.
#[derive(Clone)]
pub struct DeepSeekProvider {
    api_key: String,
    system_message: Arc<RwLock<String>>,
    client: Client,
    model: String,
    api_url: String,
    temperature: f32,
}

impl DeepSeekProvider {
    fn tool_definitions(tools: &[ToolSpec]) -> Vec<Value> {
        tools
            .iter()
            .map(|t| {
                json!({
                    "type": "function",
                    "function": {
                        "name": t.name,
                        "description": t.description,
                        "parameters": t.parameters,
                    }
                })
            })
            .collect()
    }

    async fn post_chat(&self, messages: Vec<Value>, tools: Option<&[ToolSpec]>) -> Result<Value> {
        let mut body = json!({
            "model": self.model,
            "messages": messages,
            "temperature": self.temperature
        });
        if let Some(tools) = tools {
            body["tools"] = Value::Array(Self::tool_definitions(tools));
        }

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            return Err(anyhow!(
                "API request failed: Status {}, Body: {}",
                status,
                error_text
            ));
        }

        let response_json: Value = response.json().await?;
        if let Some(error) = response_json.get("error") {
            return Err(anyhow!("API returned error: {}", error));
        }
        Ok(response_json)
    }

    fn message(&self, response_json: &Value) -> Result<Value> {
        response_json
            .get("choices")
            .and_then(|choices| choices.get(0))
            .and_then(|choice| choice.get("message"))
            .cloned()
            .ok_or_else(|| {
                let debug_json = serde_json::to_string_pretty(response_json).unwrap_or_default();
                anyhow!("Invalid response format. Response JSON: {}", debug_json)
            })
    }

    fn extract_content(message: &Value) -> Result<String> {
        message
            .get("content")
            .and_then(|content| content.as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| anyhow!("Response message carries no content"))
    }

    fn extract_tool_calls(message: &Value) -> Result<Vec<ToolCall>> {
        let raw_calls = match message.get("tool_calls").and_then(|v| v.as_array()) {
            Some(calls) if !calls.is_empty() => calls,
            _ => return Ok(Vec::new()),
        };

        raw_calls
            .iter()
            .map(|raw| {
                let id = raw
                    .get("id")
                    .and_then(|v| v.as_str())
                    .unwrap_or_default()
                    .to_string();
                let function = raw
                    .get("function")
                    .ok_or_else(|| anyhow!("tool_call without a function"))?;
                let name = function
                    .get("name")
                    .and_then(|v| v.as_str())
                    .ok_or_else(|| anyhow!("tool_call function without a name"))?
                    .to_string();
                // Arguments arrive as a JSON string, not an object.
                let arguments = function
                    .get("arguments")
                    .and_then(|v| v.as_str())
                    .map(serde_json::from_str)
                    .transpose()?
                    .unwrap_or_else(|| json!({}));
                Ok(ToolCall {
                    id,
                    name,
                    arguments,
                })
            })
            .collect()
    }

    fn system_and_user(&self, prompt: &str) -> Vec<Value> {
        vec![
            json!({ "role": "system", "content": self.get_system_message() }),
            json!({ "role": "user", "content": prompt }),
        ]
    }
}

#[async_trait]
impl CompletionProvider for DeepSeekProvider {
    async fn new(api_key: String, system_message: String) -> Result<Self> {
        let config = ProviderConfig::from_env("deepseek");

        Ok(Self {
            api_key,
            system_message: Arc::new(RwLock::new(system_message)),
            client: Client::new(),
            model: config.model,
            api_url: config.api_url,
            temperature: config.temperature,
        })
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        let response_json = self.post_chat(self.system_and_user(prompt), None).await?;
        let message = self.message(&response_json)?;
        Self::extract_content(&message)
    }

    async fn complete_with_tools(&self, prompt: &str, tools: &[ToolSpec]) -> Result<Completion> {
        let response_json = self
            .post_chat(self.system_and_user(prompt), Some(tools))
            .await?;
        let message = self.message(&response_json)?;

        let calls = Self::extract_tool_calls(&message)?;
        if calls.is_empty() {
            Ok(Completion::Text(Self::extract_content(&message)?))
        } else {
            debug!("deepseek requested {} tool call(s)", calls.len());
            Ok(Completion::ToolCalls(calls))
        }
    }

    async fn resolve_tool_calls(
        &self,
        prompt: &str,
        outputs: &[ToolOutput],
        tools: &[ToolSpec],
    ) -> Result<String> {
        let mut messages = self.system_and_user(prompt);

        let tool_calls: Vec<Value> = outputs
            .iter()
            .map(|o| {
                json!({
                    "id": o.call.id,
                    "type": "function",
                    "function": {
                        "name": o.call.name,
                        "arguments": o.call.arguments.to_string(),
                    }
                })
            })
            .collect();
        messages.push(json!({
            "role": "assistant",
            "content": null,
            "tool_calls": tool_calls
        }));

        for output in outputs {
            messages.push(json!({
                "role": "tool",
                "tool_call_id": output.call.id,
                "content": output.result.to_string()
            }));
        }

        let response_json = self.post_chat(messages, Some(tools)).await?;
        let message = self.message(&response_json)?;
        Self::extract_content(&message)
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(hashed_embedding(text, EMBEDDING_DIMENSION))
    }

    fn embedding_dimension(&self) -> usize {
        EMBEDDING_DIMENSION
    }

    async fn update_persona(&self, system_message: String) -> Result<()> {
        let mut guard = self
            .system_message
            .write()
            .map_err(|e| anyhow!("Lock error: {}", e))?;
        *guard = system_message;
        Ok(())
    }

    async fn get_model_info(&self) -> Result<String> {
        Ok(self.model.clone())
    }

    fn get_system_message(&self) -> String {
        self.system_message
            .read()
            .map(|g| g.clone())
            .unwrap_or_default()
    }

    fn clone_box(&self) -> Box<dyn CompletionProvider + Send + Sync> {
        Box::new(self.clone())
    }
}
