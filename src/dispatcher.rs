//! One network call per user turn, and routing of its outcome.

use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, info, warn};

use crate::completion::{
    CompletionClient, CompletionError, Content, GenerateRequest, Part, FALLBACK_ERROR,
};
use crate::interpreter;
use crate::theme::ThemeState;
use crate::transcript::{Message, Transcript};

pub type TurnResult = Result<String, CompletionError>;

/// Build the outbound payload. Only role and text leave the process; the
/// hidden and error flags stay local.
pub fn build_request(transcript: &Transcript) -> GenerateRequest {
    GenerateRequest {
        contents: transcript
            .iter()
            .map(|m| Content {
                role: m.role,
                parts: vec![Part {
                    text: m.text.clone(),
                }],
            })
            .collect(),
    }
}

#[derive(Clone)]
pub struct Dispatcher {
    client: CompletionClient,
}

impl Dispatcher {
    pub fn new(client: CompletionClient) -> Self {
        Self { client }
    }

    /// Spawn the request for the current transcript. The handle is the only
    /// way to observe the turn; nothing else retries or cancels it.
    pub fn dispatch(&self, transcript: &Transcript) -> JoinHandle<TurnResult> {
        let request = build_request(transcript);
        let client = self.client.clone();
        info!(messages = request.contents.len(), "dispatching completion request");
        tokio::spawn(async move { client.generate(&request).await })
    }
}

/// Append the outcome of a finished turn, applying any theme command.
pub fn route(
    outcome: Result<TurnResult, JoinError>,
    transcript: &mut Transcript,
    theme: &mut ThemeState,
) {
    match outcome {
        Ok(Ok(reply)) => {
            debug!(reply = %reply, "model reply");
            let text = interpreter::interpret(&reply).apply(theme);
            transcript.append(Message::model(text));
        }
        Ok(Err(e)) => {
            warn!(error = ?e, "completion failed");
            transcript.append(Message::error(e.to_string()));
        }
        Err(e) => {
            warn!(error = %e, "completion task did not finish");
            transcript.append(Message::error(FALLBACK_ERROR));
        }
    }
}
