use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::prompts::{review_prompt, REVIEW_SYSTEM};
use super::provider::{AiProvider, ReviewProvider, TextStream};
use super::stream::{ensure_success, text_stream, unavailable, Frame};
use super::ReviewError;
use crate::models::Resume;

const GENERATE_ENDPOINT: &str = "/api/generate";

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    system: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateChunk {
    #[serde(default)]
    response: String,
    #[serde(default)]
    done: bool,
    error: Option<String>,
}

/// Streams reviews from a local Ollama server.
pub struct OllamaReviewer {
    client: Client,
    base_url: String,
}

impl OllamaReviewer {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl ReviewProvider for OllamaReviewer {
    async fn generate_review(&self, resume: &Resume, model: &str) -> Result<TextStream, ReviewError> {
        let prompt = review_prompt(resume);
        let request = GenerateRequest {
            model,
            system: REVIEW_SYSTEM,
            prompt: &prompt,
            stream: true,
        };

        debug!("Requesting Ollama review with model {}", model);

        let response = self
            .client
            .post(format!("{}{}", self.base_url, GENERATE_ENDPOINT))
            .json(&request)
            .send()
            .await
            .map_err(unavailable(AiProvider::Ollama))?;
        let response = ensure_success(AiProvider::Ollama, response).await?;

        Ok(text_stream(response.bytes_stream(), parse_generate_line))
    }
}

/// One NDJSON line of an Ollama generate stream.
fn parse_generate_line(line: &str) -> Result<Frame, ReviewError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Frame::Skip);
    }

    let chunk: GenerateChunk = serde_json::from_str(line)
        .map_err(|e| ReviewError::Stream(format!("invalid Ollama chunk: {e}")))?;
    if let Some(error) = chunk.error {
        return Err(ReviewError::Stream(error));
    }

    Ok(match (chunk.done, chunk.response.is_empty()) {
        (true, true) => Frame::Done,
        (true, false) => Frame::Final(chunk.response),
        (false, true) => Frame::Skip,
        (false, false) => Frame::Text(chunk.response),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use httpmock::prelude::*;

    #[test]
    fn test_parse_generate_line() {
        assert_eq!(
            parse_generate_line(r#"{"response":"Good","done":false}"#).unwrap(),
            Frame::Text("Good".to_string())
        );
        assert_eq!(
            parse_generate_line(r#"{"response":"","done":true}"#).unwrap(),
            Frame::Done
        );
        assert_eq!(
            parse_generate_line(r#"{"response":"!","done":true}"#).unwrap(),
            Frame::Final("!".to_string())
        );
        assert!(parse_generate_line(r#"{"error":"model 'x' not found"}"#).is_err());
    }

    #[tokio::test]
    async fn test_streams_responses_until_done() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/generate")
                    .body_contains("\"model\":\"llama3\"")
                    .body_contains("\"stream\":true");
                then.status(200)
                    .header("content-type", "application/x-ndjson")
                    .body(
                        "{\"response\":\"Clear \",\"done\":false}\n\
                         {\"response\":\"layout.\",\"done\":false}\n\
                         {\"response\":\"\",\"done\":true}\n",
                    );
            })
            .await;

        let reviewer = OllamaReviewer::new(Client::new(), &server.base_url());
        let chunks: Vec<String> = reviewer
            .generate_review(&Resume::default(), "llama3")
            .await
            .unwrap()
            .map(|chunk| chunk.unwrap())
            .collect()
            .await;

        mock.assert_async().await;
        assert_eq!(chunks.concat(), "Clear layout.");
    }

    #[tokio::test]
    async fn test_mid_stream_error_ends_stream() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/generate");
                then.status(200).body(
                    "{\"response\":\"Partial\",\"done\":false}\n\
                     {\"error\":\"out of memory\"}\n\
                     {\"response\":\"never\",\"done\":false}\n",
                );
            })
            .await;

        let reviewer = OllamaReviewer::new(Client::new(), &server.base_url());
        let items: Vec<Result<String, ReviewError>> = reviewer
            .generate_review(&Resume::default(), "llama3")
            .await
            .unwrap()
            .collect()
            .await;

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].as_ref().unwrap(), "Partial");
        assert_eq!(
            items[1].as_ref().unwrap_err().to_string(),
            "Review stream failed: out of memory"
        );
    }

    #[tokio::test]
    async fn test_unreachable_service_names_provider() {
        let reviewer = OllamaReviewer::new(Client::new(), "http://127.0.0.1:1");
        let err = reviewer
            .generate_review(&Resume::default(), "llama3")
            .await
            .err()
            .unwrap();

        assert!(matches!(
            err,
            ReviewError::ProviderUnavailable {
                provider: AiProvider::Ollama,
                ..
            }
        ));
    }
}
