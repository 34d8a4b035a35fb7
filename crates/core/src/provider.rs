use serde::Deserialize;

use crate::{
    config::Secrets,
    error::{ChemError, Result},
};

/// Secrets-file key older deployments stored the completion key under.
pub const LEGACY_KEY_NAME: &str = "GEMINI_API_KEY";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    Together,
    Grok,
    Openai,
    Gemini,
}

pub struct ProviderConfig {
    pub api_url: &'static str,
    pub model: &'static str,
    pub env_var: &'static str,
}

impl Provider {
    pub fn config(&self) -> ProviderConfig {
        match self {
            Provider::Together => ProviderConfig {
                api_url: "https://api.together.xyz/v1/chat/completions",
                model: "kimi-k2-instruct",
                env_var: "TOGETHER_API_KEY",
            },
            Provider::Grok => ProviderConfig {
                api_url: "https://api.x.ai/v1/chat/completions",
                model: "grok-4-fast",
                env_var: "XAI_API_KEY",
            },
            Provider::Openai => ProviderConfig {
                api_url: "https://api.openai.com/v1/chat/completions",
                model: "gpt-5.1",
                env_var: "OPENAI_API_KEY",
            },
            Provider::Gemini => ProviderConfig {
                api_url: "https://generativelanguage.googleapis.com/v1beta/openai/chat/completions",
                model: "gemini-3-pro",
                env_var: "GEMINI_API_KEY",
            },
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Provider::Together => "Together",
            Provider::Grok => "Grok",
            Provider::Openai => "OpenAI",
            Provider::Gemini => "Gemini",
        }
    }

    /// Find the API key: environment first, then the secrets file.
    /// The legacy secrets entry only ever held a Together key.
    pub fn resolve_api_key(&self, secrets: &Secrets) -> Result<String> {
        let env_var = self.config().env_var;
        let from_env = std::env::var(env_var).ok().filter(|k| !k.trim().is_empty());
        let legacy = || match self {
            Provider::Together => secrets.get(LEGACY_KEY_NAME).map(str::to_string),
            _ => None,
        };

        from_env
            .or_else(|| secrets.get(env_var).map(str::to_string))
            .or_else(legacy)
            .ok_or_else(|| ChemError::MissingApiKey {
                provider_name: self.name().to_string(),
                env_var: env_var.to_string(),
            })
    }
}
