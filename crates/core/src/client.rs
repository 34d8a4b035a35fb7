use crate::{
    config::AppConfig,
    error::{ChemError, Result},
    provider::Provider,
};

/// Anything that can turn a prompt into completion text.
pub trait Completer {
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// OpenAI-compatible chat-completions client. One request per call, no retries.
pub struct ChatClient {
    http: reqwest::Client,
    api_url: String,
    model: String,
    api_key: String,
}

impl ChatClient {
    pub fn new(provider: Provider, config: &AppConfig, api_key: String) -> Result<Self> {
        let defaults = provider.config();
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            http,
            api_url: config
                .api_url
                .clone()
                .unwrap_or_else(|| defaults.api_url.to_string()),
            model: config
                .model
                .clone()
                .unwrap_or_else(|| defaults.model.to_string()),
            api_key,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl Completer for ChatClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        tracing::debug!(model = %self.model, prompt_chars = prompt.len(), "sending completion request");

        let response = self
            .http
            .post(&self.api_url)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&serde_json::json!({
                "model": self.model,
                "messages": [
                    {
                        "role": "user",
                        "content": prompt,
                    },
                ],
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "completion API returned an error");
            return Err(ChemError::ApiStatus {
                status: status.as_u16(),
                body,
            });
        }

        let response = response.json::<serde_json::Value>().await?;

        // Extract content from response
        response["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or(ChemError::EmptyResponse)
    }
}
