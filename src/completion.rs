use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::transcript::Role;

/// Shown when the endpoint fails without saying why.
pub const FALLBACK_ERROR: &str = "Something went wrong!";

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Part {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Content {
    pub role: Role,
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct GenerateRequest {
    pub contents: Vec<Content>,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorBody>,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Failures of one completion call. `Display` is the text shown in the chat.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("{message}")]
    Api { status: StatusCode, message: String },
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
    /// The endpoint answered 2xx but without a first candidate text part.
    #[error("{}", FALLBACK_ERROR)]
    EmptyReply,
}

#[derive(Clone)]
pub struct CompletionClient {
    client: Client,
    url: String,
}

impl CompletionClient {
    pub fn new(url: &str) -> Self {
        Self {
            client: Client::new(),
            url: url.to_string(),
        }
    }

    /// POST the conversation and return the first candidate's first text
    /// part, trimmed.
    pub async fn generate(&self, request: &GenerateRequest) -> Result<String, CompletionError> {
        let response = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = error_message(&body).unwrap_or_else(|| FALLBACK_ERROR.to_string());
            tracing::warn!(%status, "completion endpoint returned an error");
            return Err(CompletionError::Api { status, message });
        }

        let body = response.text().await?;
        let parsed: GenerateResponse = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!(error = %e, "completion response is not the expected JSON");
                return Err(CompletionError::EmptyReply);
            }
        };

        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.text)
            .map(|text| text.trim().to_string())
            .ok_or(CompletionError::EmptyReply)
    }
}

/// `error.message` from an error body, if the body carries one.
fn error_message(body: &str) -> Option<String> {
    let envelope: ErrorEnvelope = serde_json::from_str(body).ok()?;
    envelope
        .error?
        .message
        .filter(|m| !m.is_empty())
}
