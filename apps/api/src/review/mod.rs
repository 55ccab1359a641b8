//! Resume review: streams AI-written feedback on a resume from the selected
//! provider. Handlers pick a backend through `ReviewProviders` and never
//! touch provider wire formats.

use thiserror::Error;

pub mod handlers;
pub mod ollama;
pub mod openai;
pub mod prompts;
pub mod provider;
mod stream;

pub use provider::{AiModel, AiProvider, ReviewProvider, ReviewProviders, TextStream};

#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("Fetch failed, please make sure selected AI provider ({provider}) service is running.")]
    ProviderUnavailable {
        provider: AiProvider,
        #[source]
        source: reqwest::Error,
    },

    #[error("OpenAI API key is not configured. Set OPENAI_API_KEY to use the openai provider.")]
    MissingApiKey,

    #[error("{provider} error (status {status}): {message}")]
    Provider {
        provider: AiProvider,
        status: u16,
        message: String,
    },

    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Review stream failed: {0}")]
    Stream(String),
}
