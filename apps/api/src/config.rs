use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_ML_SERVICE_URL: &str = "http://localhost:8000";
const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434";
const DEFAULT_AI_SETTINGS_PATH: &str = "ai_settings.json";

/// Application configuration loaded from environment variables.
/// Every variable has a default except the optional OpenAI key and ML timeout.
#[derive(Debug, Clone)]
pub struct Config {
    pub ml_service_url: String,
    /// `None` leaves the HTTP client's default (no custom timeout).
    pub ml_service_timeout: Option<Duration>,
    pub port: u16,
    pub rust_log: String,
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub ollama_base_url: String,
    pub ai_settings_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let ml_service_timeout = get("ML_SERVICE_TIMEOUT_SECS")
            .map(|v| {
                v.trim()
                    .parse::<u64>()
                    .context("ML_SERVICE_TIMEOUT_SECS must be a whole number of seconds")
            })
            .transpose()?
            .map(Duration::from_secs);

        Ok(Config {
            ml_service_url: get("ML_SERVICE_URL")
                .unwrap_or_else(|| DEFAULT_ML_SERVICE_URL.to_string()),
            ml_service_timeout,
            port: get("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .trim()
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            openai_api_key: get("OPENAI_API_KEY"),
            openai_base_url: get("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            ollama_base_url: get("OLLAMA_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OLLAMA_BASE_URL.to_string()),
            ai_settings_path: PathBuf::from(
                get("AI_SETTINGS_PATH").unwrap_or_else(|| DEFAULT_AI_SETTINGS_PATH.to_string()),
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.ml_service_url, "http://localhost:8000");
        assert_eq!(config.port, 8080);
        assert_eq!(config.ml_service_timeout, None);
        assert_eq!(config.openai_api_key, None);
        assert_eq!(config.ai_settings_path, PathBuf::from("ai_settings.json"));
    }

    #[test]
    fn test_overrides_are_read() {
        let config = config_from(&[
            ("ML_SERVICE_URL", "http://ml:9000"),
            ("PORT", "3000"),
            ("ML_SERVICE_TIMEOUT_SECS", "30"),
            ("OPENAI_API_KEY", "sk-test"),
        ])
        .unwrap();
        assert_eq!(config.ml_service_url, "http://ml:9000");
        assert_eq!(config.port, 3000);
        assert_eq!(config.ml_service_timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.openai_api_key.as_deref(), Some("sk-test"));
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let config = config_from(&[("OPENAI_API_KEY", "  "), ("ML_SERVICE_URL", "")]).unwrap();
        assert_eq!(config.openai_api_key, None);
        assert_eq!(config.ml_service_url, "http://localhost:8000");
    }

    #[test]
    fn test_invalid_numbers_are_errors() {
        assert!(config_from(&[("PORT", "eighty")]).is_err());
        assert!(config_from(&[("ML_SERVICE_TIMEOUT_SECS", "-5")]).is_err());
    }
}
