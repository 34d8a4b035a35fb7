//! `chemecare.toml` and the flat secrets file.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use tokio::fs;

use crate::{error::Result, facility::FacilityOverrides, provider::Provider};

pub const CONFIG_FILE: &str = "chemecare.toml";
pub const SECRETS_FILE: &str = "secrets.toml";
pub const DATA_DIR_ENV: &str = "CHEMECARE_DATA_DIR";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub provider: Provider,
    /// Overrides the provider's default model.
    pub model: Option<String>,
    /// Overrides the provider's endpoint, e.g. for a self-hosted gateway.
    pub api_url: Option<String>,
    pub timeout_secs: u64,
    pub secrets_file: Option<PathBuf>,
    pub facility: FacilityOverrides,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            provider: Provider::default(),
            model: None,
            api_url: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            secrets_file: None,
            facility: FacilityOverrides::default(),
        }
    }
}

impl AppConfig {
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load the config file; a missing file yields the defaults.
    pub async fn load(path: &Path) -> Result<Self> {
        match read_optional(path).await? {
            Some(content) => {
                tracing::debug!(path = %path.display(), "loaded config");
                Self::from_toml(&content)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Secrets file named in the config, else `secrets.toml` beside the config.
    pub fn secrets_path(&self, config_dir: &Path) -> PathBuf {
        match &self.secrets_file {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => config_dir.join(path),
            None => config_dir.join(SECRETS_FILE),
        }
    }
}

/// Flat `KEY = "value"` table. Non-string values are ignored.
#[derive(Debug, Clone, Default)]
pub struct Secrets {
    values: HashMap<String, String>,
}

impl Secrets {
    pub fn from_toml(content: &str) -> Result<Self> {
        let table: toml::Table = toml::from_str(content)?;
        let values = table
            .into_iter()
            .filter_map(|(k, v)| match v {
                toml::Value::String(s) => Some((k, s)),
                _ => None,
            })
            .collect();
        Ok(Self { values })
    }

    pub async fn load(path: &Path) -> Result<Self> {
        match read_optional(path).await? {
            Some(content) => Self::from_toml(&content),
            None => Ok(Self::default()),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }
}

async fn read_optional(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path).await {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config.provider, Provider::Together);
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(config.facility.compliance.is_none());
    }

    #[test]
    fn config_overrides_provider_and_facility() {
        let config = AppConfig::from_toml(
            r#"
provider = "openai"
model = "gpt-4o-mini"
timeout_secs = 5

[facility]
compliance = 88
cost = 1.7
"#,
        )
        .unwrap();
        assert_eq!(config.provider, Provider::Openai);
        assert_eq!(config.model.as_deref(), Some("gpt-4o-mini"));
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.facility.compliance, Some(88));
        assert_eq!(config.facility.cost, Some(1.7));
    }

    #[test]
    fn unknown_provider_is_a_config_error() {
        assert!(AppConfig::from_toml("provider = \"mystery\"").is_err());
    }

    #[test]
    fn relative_secrets_path_resolves_against_config_dir() {
        let config = AppConfig {
            secrets_file: Some(PathBuf::from("keys.toml")),
            ..AppConfig::default()
        };
        assert_eq!(
            config.secrets_path(Path::new("/etc/chemecare")),
            PathBuf::from("/etc/chemecare/keys.toml")
        );
    }

    #[test]
    fn secrets_skip_blank_and_non_string_values() {
        let secrets = Secrets::from_toml("A = \"x\"\nB = \"  \"\nC = 3").unwrap();
        assert_eq!(secrets.get("A"), Some("x"));
        assert_eq!(secrets.get("B"), None);
        assert_eq!(secrets.get("C"), None);
    }

    #[tokio::test]
    async fn missing_config_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(&dir.path().join(CONFIG_FILE)).await.unwrap();
        assert_eq!(config.timeout_secs, 30);
    }
}
