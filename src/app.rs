use ratatui::layout::Rect;

use crate::ui;
use crate::session::{ChatSession, SubmitOutcome};

pub struct App {
    // Core state
    pub should_quit: bool,
    pub show_chat: bool,

    // Chat input
    pub input: String,
    pub input_cursor: usize, // cursor position in input, in chars

    // Chat scroll
    pub chat_scroll: u16,
    pub chat_height: u16, // inner height of the message area
    pub chat_width: u16,  // inner width, for wrapping

    // Animation state
    pub animation_frame: u8, // 0-2 for ellipsis animation

    // Areas for mouse hit-testing (updated during render)
    pub toggle_area: Option<Rect>,
    pub chat_area: Option<Rect>,

    pub session: ChatSession,

    // (transcript length, typing) at the last auto-scroll
    last_seen: (usize, bool),
}

impl App {
    pub fn new(session: ChatSession) -> Self {
        let last_seen = (session.transcript().len(), session.is_typing());
        Self {
            should_quit: false,
            show_chat: false,
            input: String::new(),
            input_cursor: 0,
            chat_scroll: 0,
            chat_height: 0,
            chat_width: 0,
            animation_frame: 0,
            toggle_area: None,
            chat_area: None,
            session,
            last_seen,
        }
    }

    pub fn toggle_chat(&mut self) {
        self.show_chat = !self.show_chat;
        if self.show_chat {
            self.scroll_chat_to_bottom();
        }
    }

    /// Send the input line. The line is kept when a turn is already running
    /// so nothing the user typed is lost.
    pub fn submit_input(&mut self) -> SubmitOutcome {
        let outcome = self.session.submit(&self.input);
        match outcome {
            SubmitOutcome::Sent | SubmitOutcome::Empty => {
                self.input.clear();
                self.input_cursor = 0;
            }
            SubmitOutcome::Busy => {}
        }
        self.follow_tail();
        outcome
    }

    /// Pick up a finished turn, if any.
    pub async fn poll_turn(&mut self) {
        if self.session.poll().await {
            self.follow_tail();
        }
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.session.is_typing() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    /// Jump to the newest message whenever the transcript or typing flag
    /// changed since the last call.
    pub fn follow_tail(&mut self) {
        let seen = (self.session.transcript().len(), self.session.is_typing());
        if seen != self.last_seen {
            self.last_seen = seen;
            self.scroll_chat_to_bottom();
        }
    }

    fn max_scroll(&self) -> u16 {
        let visible_height = if self.chat_height > 0 { self.chat_height } else { 20 };
        self.chat_line_count().saturating_sub(visible_height)
    }

    pub fn scroll_chat_to_bottom(&mut self) {
        self.chat_scroll = self.max_scroll();
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.chat_scroll = self.chat_scroll.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.chat_scroll = self.chat_scroll.saturating_add(lines).min(self.max_scroll());
    }

    pub fn page_size(&self) -> u16 {
        (self.chat_height / 2).max(1)
    }

    /// Rendered height of the message list at the current popup width.
    pub fn chat_line_count(&self) -> u16 {
        let wrap_width = if self.chat_width > 0 { self.chat_width } else { 40 };
        let count = ui::chat_paragraph(self).line_count(wrap_width);
        u16::try_from(count).unwrap_or(u16::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::CompletionClient;
    use crate::dispatcher::Dispatcher;

    fn test_app() -> App {
        // Nothing listens here; tests below never reach the network.
        let client = CompletionClient::new("http://127.0.0.1:9/unused");
        App::new(ChatSession::new(Dispatcher::new(client), "ctx"))
    }

    #[test]
    fn toggle_flips_visibility() {
        let mut app = test_app();
        assert!(!app.show_chat);
        app.toggle_chat();
        assert!(app.show_chat);
        app.toggle_chat();
        assert!(!app.show_chat);
    }

    #[test]
    fn blank_input_is_not_sent() {
        let mut app = test_app();
        app.input = "   ".to_string();
        app.input_cursor = 3;

        assert_eq!(app.submit_input(), SubmitOutcome::Empty);
        assert!(app.input.is_empty());
        assert_eq!(app.session.transcript().len(), 1);
        assert!(!app.session.is_typing());
    }

    #[test]
    fn line_count_ignores_hidden_seed() {
        let mut app = test_app();
        app.chat_width = 40;
        // label + two greeting lines + blank
        assert_eq!(app.chat_line_count(), 4);
    }

    #[test]
    fn scroll_stays_in_bounds() {
        let mut app = test_app();
        app.chat_width = 40;
        app.chat_height = 2;
        app.scroll_down(100);
        assert_eq!(app.chat_scroll, 2);
        app.scroll_up(100);
        assert_eq!(app.chat_scroll, 0);
    }

    #[test]
    fn line_count_wraps_at_word_boundaries() {
        let mut app = test_app();
        app.chat_width = 7;
        // Como / posso / te / ajudar / hoje? takes five rows, one more than
        // splitting mid-word would: label + "Olá! 👋" + 5 + blank
        assert_eq!(app.chat_line_count(), 8);
    }

    #[tokio::test]
    async fn submitting_follows_the_tail() {
        let mut app = test_app();
        app.show_chat = true;
        app.chat_width = 20;
        app.chat_height = 3;
        app.chat_scroll = 0;

        app.input = "Quero ver o cardápio completo, por favor".to_string();
        assert_eq!(app.submit_input(), SubmitOutcome::Sent);
        assert!(app.session.is_typing());
        assert_eq!(app.chat_scroll, app.max_scroll());
        assert!(app.chat_scroll > 0);

        // The reply (a connection error here) moves the tail again
        let before = app.chat_scroll;
        assert!(app.session.wait().await);
        app.follow_tail();
        assert!(!app.session.is_typing());
        assert_eq!(app.chat_scroll, app.max_scroll());
        assert_ne!(app.chat_scroll, before);
    }

    #[test]
    fn follow_tail_leaves_manual_scroll_alone_without_changes() {
        let mut app = test_app();
        app.chat_width = 40;
        app.chat_height = 2;
        app.scroll_down(100);
        app.scroll_up(1);
        app.follow_tail();
        assert_eq!(app.chat_scroll, 1);
    }
}
