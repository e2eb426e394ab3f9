use anyhow::{anyhow, Result};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::{json, Value};
use std::sync::{Arc, RwLock};

use crate::config::ProviderConfig;
use crate::providers::traits::{Completion, CompletionProvider};
use crate::providers::utils::EMBEDDING_DIMENSION;
use crate::tools::{ToolCall, ToolOutput, ToolSpec};

#[derive(Clone)]
pub struct GeminiProvider {
    api_key: String,
    system_message: Arc<RwLock<String>>,
    client: Client,
    model: String,
    embed_model: String,
    api_url: String,
    temperature: f32,
}

impl GeminiProvider {
    fn generate_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_url, self.model)
    }

    fn embed_url(&self) -> String {
        format!("{}/models/{}:embedContent", self.api_url, self.embed_model)
    }

    fn tool_declarations(tools: &[ToolSpec]) -> Value {
        json!([{
            "functionDeclarations": tools.iter().map(|t| json!({
                "name": t.name,
                "description": t.description,
                "parameters": t.parameters,
            })).collect::<Vec<_>>()
        }])
    }

    async fn post_generate(&self, body: Value) -> Result<Value> {
        let response = self
            .client
            .post(self.generate_url())
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            return Err(anyhow!(
                "Gemini request failed: Status {}, Body: {}",
                status,
                error_text
            ));
        }

        Ok(response.json().await?)
    }

    /// Splits the first candidate into text parts and function calls.
    fn parse_candidate(response_json: &Value) -> Result<(String, Vec<ToolCall>)> {
        let parts = response_json["candidates"][0]["content"]["parts"]
            .as_array()
            .ok_or_else(|| anyhow!("Invalid response format: no candidate parts"))?;

        let mut text = String::new();
        let mut calls = Vec::new();

        for part in parts {
            if let Some(t) = part.get("text").and_then(|v| v.as_str()) {
                text.push_str(t);
            }
            if let Some(fc) = part.get("functionCall") {
                let name = fc
                    .get("name")
                    .and_then(|v| v.as_str())
                    .ok_or_else(|| anyhow!("functionCall without a name"))?;
                calls.push(ToolCall {
                    id: String::new(),
                    name: name.to_string(),
                    arguments: fc.get("args").cloned().unwrap_or_else(|| json!({})),
                });
            }
        }

        Ok((text, calls))
    }

    fn base_body(&self, prompt: &str) -> Value {
        let system_message = self.get_system_message();
        json!({
            "systemInstruction": {
                "parts": [{ "text": system_message }]
            },
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt }]
            }],
            "generationConfig": {
                "temperature": self.temperature
            }
        })
    }
}

#[async_trait]
impl CompletionProvider for GeminiProvider {
    async fn new(api_key: String, system_message: String) -> Result<Self> {
        let config = ProviderConfig::from_env("gemini");

        Ok(Self {
            api_key,
            system_message: Arc::new(RwLock::new(system_message)),
            client: Client::new(),
            model: config.model,
            embed_model: config
                .embed_model
                .unwrap_or_else(|| "text-embedding-004".to_string()),
            api_url: config.api_url,
            temperature: config.temperature,
        })
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        let response_json = self.post_generate(self.base_body(prompt)).await?;
        let (text, _) = Self::parse_candidate(&response_json)?;
        if text.is_empty() {
            return Err(anyhow!("Gemini returned an empty answer"));
        }
        Ok(text)
    }

    async fn complete_with_tools(&self, prompt: &str, tools: &[ToolSpec]) -> Result<Completion> {
        let mut body = self.base_body(prompt);
        body["tools"] = Self::tool_declarations(tools);

        let response_json = self.post_generate(body).await?;
        let (text, calls) = Self::parse_candidate(&response_json)?;

        if calls.is_empty() {
            Ok(Completion::Text(text))
        } else {
            debug!("gemini requested {} tool call(s)", calls.len());
            Ok(Completion::ToolCalls(calls))
        }
    }

    async fn resolve_tool_calls(
        &self,
        prompt: &str,
        outputs: &[ToolOutput],
        tools: &[ToolSpec],
    ) -> Result<String> {
        let call_parts: Vec<Value> = outputs
            .iter()
            .map(|o| {
                json!({
                    "functionCall": {
                        "name": o.call.name,
                        "args": o.call.arguments,
                    }
                })
            })
            .collect();

        let response_parts: Vec<Value> = outputs
            .iter()
            .map(|o| {
                json!({
                    "functionResponse": {
                        "name": o.call.name,
                        "response": { "content": o.result },
                    }
                })
            })
            .collect();

        let system_message = self.get_system_message();
        let body = json!({
            "systemInstruction": {
                "parts": [{ "text": system_message }]
            },
            "contents": [
                { "role": "user", "parts": [{ "text": prompt }] },
                { "role": "model", "parts": call_parts },
                { "role": "user", "parts": response_parts }
            ],
            "tools": Self::tool_declarations(tools),
            "generationConfig": {
                "temperature": self.temperature
            }
        });

        let response_json = self.post_generate(body).await?;
        let (text, _) = Self::parse_candidate(&response_json)?;
        if text.is_empty() {
            return Err(anyhow!("Gemini returned no text after tool results"));
        }
        Ok(text)
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let response = self
            .client
            .post(self.embed_url())
            .query(&[("key", self.api_key.as_str())])
            .json(&json!({
                "content": {
                    "parts": [{ "text": text }]
                }
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            return Err(anyhow!(
                "Gemini embedding request failed: Status {}, Body: {}",
                status,
                error_text
            ));
        }

        let response_json: Value = response.json().await?;
        let values = response_json["embedding"]["values"]
            .as_array()
            .ok_or_else(|| anyhow!("Invalid embedding response format"))?;

        let embedding: Vec<f32> = values
            .iter()
            .map(|v| v.as_f64().unwrap_or(0.0) as f32)
            .collect();

        if embedding.len() != EMBEDDING_DIMENSION {
            return Err(anyhow!(
                "Embedding has wrong size: {} (expected {})",
                embedding.len(),
                EMBEDDING_DIMENSION
            ));
        }

        Ok(embedding)
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_candidate_text() {
        let response = json!({
            "candidates": [{
                "content": { "parts": [{ "text": "Wah, great question!" }] }
            }]
        });
        let (text, calls) = GeminiProvider::parse_candidate(&response).unwrap();
        assert_eq!(text, "Wah, great question!");
        assert!(calls.is_empty());
    }

    #[test]
    fn test_parse_candidate_function_call() {
        let response = json!({
            "candidates": [{
                "content": { "parts": [{
                    "functionCall": {
                        "name": "convert_units",
                        "args": { "value": 2.0, "from": "cup", "to": "ml" }
                    }
                }] }
            }]
        });
        let (text, calls) = GeminiProvider::parse_candidate(&response).unwrap();
        assert!(text.is_empty());
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].name, "convert_units");
        assert_eq!(calls[0].arguments["from"], "cup");
    }

    #[test]
    fn test_parse_candidate_rejects_malformed() {
        let response = json!({ "candidates": [] });
        assert!(GeminiProvider::parse_candidate(&response).is_err());
    }

    #[test]
    fn test_tool_declarations_shape() {
        let tools = crate::tools::kitchen_tools();
        let decls = GeminiProvider::tool_declarations(&tools);
        assert_eq!(decls[0]["functionDeclarations"].as_array().unwrap().len(), 3);
        assert_eq!(decls[0]["functionDeclarations"][0]["name"], "convert_units");
    }
}
