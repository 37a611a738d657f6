//! Conversation history for a single session.

use serde::{Deserialize, Serialize};

/// Who authored a message, in the completion endpoint's vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub text: String,
    /// Sent to the model but never rendered (the seeded context entry).
    pub hidden_from_display: bool,
    pub is_error: bool,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            hidden_from_display: false,
            is_error: false,
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
            hidden_from_display: false,
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            is_error: true,
            ..Self::model(text)
        }
    }

    pub fn hidden_context(text: impl Into<String>) -> Self {
        Self {
            hidden_from_display: true,
            ..Self::model(text)
        }
    }
}

/// Append-only, insertion-ordered list of messages.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    /// Start a transcript with the hidden context message the model always sees.
    pub fn seeded(context: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::hidden_context(context)],
        }
    }

    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    /// Messages the user should see.
    pub fn visible(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter().filter(|m| !m.hidden_from_display)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_seed_is_kept_but_not_visible() {
        let mut transcript = Transcript::seeded("contexto da loja");
        transcript.append(Message::user("Oi"));
        transcript.append(Message::model("Olá!"));

        assert_eq!(transcript.len(), 3);
        assert!(transcript.iter().next().unwrap().hidden_from_display);

        let visible: Vec<&str> = transcript.visible().map(|m| m.text.as_str()).collect();
        assert_eq!(visible, vec!["Oi", "Olá!"]);
    }

    #[test]
    fn append_preserves_insertion_order() {
        let mut transcript = Transcript::default();
        for i in 0..5 {
            transcript.append(Message::user(format!("msg {}", i)));
        }
        let texts: Vec<String> = transcript.iter().map(|m| m.text.clone()).collect();
        assert_eq!(texts, vec!["msg 0", "msg 1", "msg 2", "msg 3", "msg 4"]);
    }

    #[test]
    fn error_messages_come_from_the_model() {
        let msg = Message::error("quota exceeded");
        assert_eq!(msg.role, Role::Model);
        assert!(msg.is_error);
        assert!(!msg.hidden_from_display);
    }
}
