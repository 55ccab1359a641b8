// Line framing shared by the provider streams. OpenAI sends SSE `data:` lines,
// Ollama sends NDJSON; both are decoded line by line from the raw body.

use std::collections::VecDeque;
use std::fmt::Display;

use bytes::Bytes;
use futures::{Stream, StreamExt};
use reqwest::Response;
use serde_json::Value;

use super::provider::{AiProvider, TextStream};
use super::ReviewError;

/// What a single provider line means for the review stream.
#[derive(Debug, PartialEq)]
pub(super) enum Frame {
    Text(String),
    /// Last piece of text; the stream ends after it.
    Final(String),
    Done,
    Skip,
}

pub(super) type LineParser = fn(&str) -> Result<Frame, ReviewError>;

/// Splits a byte stream into lines. Partial lines are buffered across chunks
/// so multi-byte characters split by the transport decode intact.
#[derive(Debug, Default)]
pub(super) struct LineDecoder {
    buf: Vec<u8>,
}

impl LineDecoder {
    pub(super) fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buf.extend_from_slice(chunk);

        let mut lines = Vec::new();
        while let Some(pos) = self.buf.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buf.drain(..=pos).collect();
            lines.push(decode(&line[..pos]));
        }
        lines
    }

    /// Whatever is left after the body ends without a trailing newline.
    pub(super) fn finish(&mut self) -> Option<String> {
        if self.buf.is_empty() {
            return None;
        }
        let rest = std::mem::take(&mut self.buf);
        Some(decode(&rest))
    }
}

fn decode(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).trim_end_matches('\r').to_string()
}

struct LineState<S> {
    body: S,
    decoder: LineDecoder,
    pending: VecDeque<String>,
    eof: bool,
    done: bool,
}

/// Turns a raw body into review text using `parse` on every line.
pub(super) fn text_stream<S, E>(body: S, parse: LineParser) -> TextStream
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: Display + Send + 'static,
{
    let state = LineState {
        body: Box::pin(body),
        decoder: LineDecoder::default(),
        pending: VecDeque::new(),
        eof: false,
        done: false,
    };

    let stream = futures::stream::unfold(state, move |mut st| async move {
        loop {
            if st.done {
                return None;
            }

            if let Some(line) = st.pending.pop_front() {
                match parse(&line) {
                    Ok(Frame::Text(text)) => return Some((Ok(text), st)),
                    Ok(Frame::Final(text)) => {
                        st.done = true;
                        return Some((Ok(text), st));
                    }
                    Ok(Frame::Done) => return None,
                    Ok(Frame::Skip) => continue,
                    Err(e) => {
                        st.done = true;
                        return Some((Err(e), st));
                    }
                }
            }

            if st.eof {
                return None;
            }

            match st.body.next().await {
                Some(Ok(chunk)) => st.pending.extend(st.decoder.push(&chunk)),
                Some(Err(e)) => {
                    st.done = true;
                    return Some((Err(ReviewError::Stream(e.to_string())), st));
                }
                None => {
                    st.eof = true;
                    st.pending.extend(st.decoder.finish());
                }
            }
        }
    });

    Box::pin(stream)
}

/// Passes a 2xx response through; anything else becomes `ReviewError::Provider`
/// carrying the provider's own error message when it sent one.
pub(super) async fn ensure_success(
    provider: AiProvider,
    response: Response,
) -> Result<Response, ReviewError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|v| {
            v.pointer("/error/message")
                .or_else(|| v.get("error"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or(body);

    Err(ReviewError::Provider {
        provider,
        status: status.as_u16(),
        message,
    })
}

/// Connection failures are reported with the provider name so the user knows
/// which service to start.
pub(super) fn unavailable(provider: AiProvider) -> impl FnOnce(reqwest::Error) -> ReviewError {
    move |source| ReviewError::ProviderUnavailable { provider, source }
}
