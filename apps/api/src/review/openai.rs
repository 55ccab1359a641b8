use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::prompts::{review_prompt, REVIEW_SYSTEM};
use super::provider::{AiProvider, ReviewProvider, TextStream};
use super::stream::{ensure_success, text_stream, unavailable, Frame};
use super::ReviewError;
use crate::models::Resume;

const CHAT_COMPLETIONS_ENDPOINT: &str = "/chat/completions";
const REVIEW_TEMPERATURE: f32 = 0.3;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatChunk {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    error: Option<ChatError>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    delta: ChatDelta,
}

#[derive(Debug, Deserialize)]
struct ChatDelta {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatError {
    message: String,
}

/// Streams reviews from an OpenAI-compatible chat completions API.
pub struct OpenAiReviewer {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl OpenAiReviewer {
    pub fn new(client: Client, base_url: &str, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            api_key,
        }
    }
}

#[async_trait]
impl ReviewProvider for OpenAiReviewer {
    async fn generate_review(&self, resume: &Resume, model: &str) -> Result<TextStream, ReviewError> {
        let api_key = self.api_key.as_deref().ok_or(ReviewError::MissingApiKey)?;

        let prompt = review_prompt(resume);
        let request = ChatRequest {
            model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: REVIEW_SYSTEM,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
            temperature: REVIEW_TEMPERATURE,
            stream: true,
        };

        debug!("Requesting OpenAI review with model {}", model);

        let response = self
            .client
            .post(format!("{}{}", self.base_url, CHAT_COMPLETIONS_ENDPOINT))
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(unavailable(AiProvider::OpenAi))?;
        let response = ensure_success(AiProvider::OpenAi, response).await?;

        Ok(text_stream(response.bytes_stream(), parse_chat_line))
    }
}

/// One SSE line of a chat completions stream.
fn parse_chat_line(line: &str) -> Result<Frame, ReviewError> {
    let Some(data) = line.strip_prefix("data:") else {
        return Ok(Frame::Skip);
    };
    let data = data.trim();
    if data == "[DONE]" {
        return Ok(Frame::Done);
    }
    if data.is_empty() {
        return Ok(Frame::Skip);
    }

    let chunk: ChatChunk = serde_json::from_str(data)
        .map_err(|e| ReviewError::Stream(format!("invalid OpenAI chunk: {e}")))?;
    if let Some(error) = chunk.error {
        return Err(ReviewError::Stream(error.message));
    }

    Ok(chunk
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.delta.content)
        .filter(|text| !text.is_empty())
        .map_or(Frame::Skip, Frame::Text))
}
