use std::fmt;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::Stream;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::ollama::OllamaReviewer;
use super::openai::OpenAiReviewer;
use super::ReviewError;
use crate::config::Config;
use crate::models::Resume;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Incremental review text. Ends after the first `Err`.
pub type TextStream = Pin<Box<dyn Stream<Item = Result<String, ReviewError>> + Send>>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    #[default]
    OpenAi,
    Ollama,
}

impl AiProvider {
    pub fn as_str(self) -> &'static str {
        match self {
            AiProvider::OpenAi => "openai",
            AiProvider::Ollama => "ollama",
        }
    }
}

impl fmt::Display for AiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A provider plus one of its model names, e.g. `openai` / `gpt-4o-mini`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiModel {
    pub provider: AiProvider,
    pub model: String,
}

/// Anything that can turn a resume into a stream of review text.
#[async_trait]
pub trait ReviewProvider: Send + Sync {
    /// Starts a review. Connection and status failures surface here;
    /// failures after the first byte arrive as an `Err` item on the stream.
    async fn generate_review(&self, resume: &Resume, model: &str)
        -> Result<TextStream, ReviewError>;
}

/// One backend per `AiProvider` variant.
#[derive(Clone)]
pub struct ReviewProviders {
    openai: Arc<dyn ReviewProvider>,
    ollama: Arc<dyn ReviewProvider>,
}

impl ReviewProviders {
    pub fn new(openai: Arc<dyn ReviewProvider>, ollama: Arc<dyn ReviewProvider>) -> Self {
        Self { openai, ollama }
    }

    /// Builds the HTTP-backed providers. Both share one connection pool.
    /// No overall request timeout is set since reviews stream for a while.
    pub fn from_config(config: &Config) -> Result<Self, ReviewError> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(ReviewError::ClientBuild)?;

        Ok(Self::new(
            Arc::new(OpenAiReviewer::new(
                client.clone(),
                &config.openai_base_url,
                config.openai_api_key.clone(),
            )),
            Arc::new(OllamaReviewer::new(client, &config.ollama_base_url)),
        ))
    }

    pub fn for_provider(&self, provider: AiProvider) -> &dyn ReviewProvider {
        match provider {
            AiProvider::OpenAi => self.openai.as_ref(),
            AiProvider::Ollama => self.ollama.as_ref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use serde_json::json;

    struct Canned(&'static str);

    #[async_trait]
    impl ReviewProvider for Canned {
        async fn generate_review(&self, _resume: &Resume, model: &str) -> Result<TextStream, ReviewError> {
            let text = format!("{}:{}", self.0, model);
            Ok(Box::pin(futures::stream::iter(vec![Ok::<_, ReviewError>(text)])))
        }
    }

    #[test]
    fn test_provider_tags_are_lowercase() {
        assert_eq!(serde_json::to_value(AiProvider::OpenAi).unwrap(), json!("openai"));
        let model: AiModel =
            serde_json::from_value(json!({ "provider": "ollama", "model": "llama3" })).unwrap();
        assert_eq!(model.provider, AiProvider::Ollama);
        assert_eq!(AiProvider::Ollama.to_string(), "ollama");
    }

    #[test]
    fn test_unknown_provider_is_rejected() {
        let parsed = serde_json::from_value::<AiModel>(json!({ "provider": "anthropic", "model": "x" }));
        assert!(parsed.is_err());
    }

    #[tokio::test]
    async fn test_for_provider_dispatches_by_variant() {
        let providers = ReviewProviders::new(Arc::new(Canned("openai")), Arc::new(Canned("ollama")));

        let mut stream = providers
            .for_provider(AiProvider::Ollama)
            .generate_review(&Resume::default(), "llama3")
            .await
            .unwrap();
        assert_eq!(stream.next().await.unwrap().unwrap(), "ollama:llama3");
    }
}
