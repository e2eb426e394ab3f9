use std::env;

/// Per-provider wire settings, overridable through the environment
/// (`GEMINI_MODEL`, `DEEPSEEK_API_URL`, `GEMINI_TEMPERATURE`, ...).
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub model: String,
    pub embed_model: Option<String>,
    pub api_url: String,
    pub temperature: f32,
}

impl ProviderConfig {
    pub fn from_env(provider: &str) -> Self {
        let prefix = provider.to_uppercase();

        let model = env::var(format!("{}_MODEL", prefix)).unwrap_or_else(|_| {
            match provider {
                "gemini" => "gemini-2.0-flash",
                "deepseek" => "deepseek-chat",
                _ => "",
            }
            .to_string()
        });

        let embed_model = match provider {
            "gemini" => Some(
                env::var("GEMINI_EMBED_MODEL")
                    .unwrap_or_else(|_| "text-embedding-004".to_string()),
            ),
            _ => None,
        };

        let api_url = env::var(format!("{}_API_URL", prefix)).unwrap_or_else(|_| {
            match provider {
                "gemini" => "https://generativelanguage.googleapis.com/v1beta",
                "deepseek" => "https://api.deepseek.com/v1/chat/completions",
                _ => "",
            }
            .to_string()
        });

        let temperature = env::var(format!("{}_TEMPERATURE", prefix))
            .ok()
            .and_then(|t| t.parse().ok())
            .unwrap_or(0.7);

        Self {
            model,
            embed_model,
            api_url,
            temperature,
        }
    }
}
