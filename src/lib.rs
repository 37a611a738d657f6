pub mod app;
pub mod completion;
pub mod config;
pub mod content;
pub mod dispatcher;
pub mod handler;
pub mod interpreter;
pub mod logging;
pub mod session;
pub mod theme;
pub mod transcript;
pub mod tui;
pub mod ui;

// Re-export main types for convenience
pub use completion::{CompletionClient, CompletionError};
pub use config::Config;
pub use dispatcher::Dispatcher;
pub use interpreter::{interpret, Command, Interpretation};
pub use session::{ChatSession, SubmitOutcome};
pub use theme::{ThemeSlot, ThemeState};
pub use transcript::{Message, Role, Transcript};
