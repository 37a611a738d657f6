//! The chat session: sole owner of the transcript, theme and typing flag.

use tokio::task::JoinHandle;
use tracing::debug;

use crate::dispatcher::{self, Dispatcher, TurnResult};
use crate::theme::ThemeState;
use crate::transcript::{Message, Transcript};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Sent,
    /// Blank input, nothing appended.
    Empty,
    /// A turn is already in flight; the input was not taken.
    Busy,
}

/// Clears the typing flag when dropped, whichever way the turn ends.
struct TypingGuard<'a>(&'a mut bool);

impl Drop for TypingGuard<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}

pub struct ChatSession {
    transcript: Transcript,
    theme: ThemeState,
    typing: bool,
    dispatcher: Dispatcher,
    pending: Option<JoinHandle<TurnResult>>,
}

impl ChatSession {
    pub fn new(dispatcher: Dispatcher, seed_context: impl Into<String>) -> Self {
        Self {
            transcript: Transcript::seeded(seed_context),
            theme: ThemeState::baseline(),
            typing: false,
            dispatcher,
            pending: None,
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn theme(&self) -> &ThemeState {
        &self.theme
    }

    pub fn is_typing(&self) -> bool {
        self.typing
    }

    pub fn has_pending_turn(&self) -> bool {
        self.pending.is_some()
    }

    /// Append the user's message and start a turn. Only one turn may be in
    /// flight, so replies land in submission order.
    pub fn submit(&mut self, input: &str) -> SubmitOutcome {
        let text = input.trim();
        if text.is_empty() {
            return SubmitOutcome::Empty;
        }
        if self.pending.is_some() {
            debug!("turn in flight, submission rejected");
            return SubmitOutcome::Busy;
        }

        self.transcript.append(Message::user(text));
        self.typing = true;
        self.pending = Some(self.dispatcher.dispatch(&self.transcript));
        SubmitOutcome::Sent
    }

    /// Route the pending turn if it has finished. Returns true when the
    /// transcript changed.
    pub async fn poll(&mut self) -> bool {
        let finished = self.pending.as_ref().is_some_and(|h| h.is_finished());
        if finished {
            self.wait().await
        } else {
            false
        }
    }

    /// Wait for the pending turn, however long the endpoint takes.
    pub async fn wait(&mut self) -> bool {
        let Some(handle) = self.pending.take() else {
            return false;
        };
        let _typing = TypingGuard(&mut self.typing);
        let outcome = handle.await;
        dispatcher::route(outcome, &mut self.transcript, &mut self.theme);
        true
    }

    /// Submit and wait for the reply.
    pub async fn send(&mut self, input: &str) -> SubmitOutcome {
        let outcome = self.submit(input);
        if outcome == SubmitOutcome::Sent {
            self.wait().await;
        }
        outcome
    }
}
