use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What went wrong with one completion request. Every variant surfaces as
/// an assistant transcript entry; none of them are fatal.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("completion endpoint returned {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("malformed completion response: {0}")]
    Format(String),
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct WireRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    choices: Vec<WireChoice>,
}

#[derive(Debug, Deserialize)]
struct WireChoice {
    message: WireChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct WireChoiceMessage {
    content: String,
}

/// Blocking client for the completion endpoint. One POST per submission,
/// carrying only the latest message; the transcript is display state and
/// never leaves the process.
pub struct CompletionClient {
    http: Client,
    endpoint: String,
}

impl CompletionClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, CompletionError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send one prompt and return the reply text at
    /// `choices[0].message.content`. A non-success status or a body missing
    /// that path is an error, never an empty reply.
    pub fn complete(&self, model: &str, prompt: &str) -> Result<String, CompletionError> {
        let request = WireRequest {
            model,
            messages: vec![WireMessage {
                role: "user",
                content: prompt,
            }],
        };
        let response = self.http.post(&self.endpoint).json(&request).send()?;
        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            return Err(CompletionError::Status {
                status,
                body: excerpt(&body),
            });
        }
        decode_reply(&body)
    }
}

/// Decode a success body into the reply text at
/// `choices[0].message.content`.
pub fn decode_reply(body: &str) -> Result<String, CompletionError> {
    let decoded: WireResponse =
        serde_json::from_str(body).map_err(|err| CompletionError::Format(err.to_string()))?;
    decoded
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content)
        .ok_or_else(|| CompletionError::Format("response carried no choices".to_string()))
}

/// Error bodies can be arbitrarily large; keep what fits in a transcript
/// entry.
fn excerpt(body: &str) -> String {
    const MAX_CHARS: usize = 200;
    let trimmed = body.trim();
    if trimmed.chars().count() <= MAX_CHARS {
        return trimmed.to_string();
    }
    let mut out: String = trimmed.chars().take(MAX_CHARS).collect();
    out.push('…');
    out
}
