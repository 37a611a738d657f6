use anyhow::Result;
use tracing::info;

use aroma_chat::app::App;
use aroma_chat::tui::{self, EventHandler, Tui, TICK_RATE};
use aroma_chat::{handler, ui, ChatSession, CompletionClient, Config, Dispatcher};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;
    let _log_guard = aroma_chat::logging::init(&config)?;

    // Fail before touching the terminal so the message stays readable
    let api_url = config.api_url()?;
    let seed = config.seed_context()?;

    let client = CompletionClient::new(&api_url);
    let session = ChatSession::new(Dispatcher::new(client), seed);
    let mut app = App::new(session);

    info!("starting chat ui");
    tui::install_panic_hook();
    let mut terminal = tui::init()?;

    let result = run(&mut terminal, &mut app).await;

    tui::restore()?;
    info!("chat ui closed");
    result
}

async fn run(terminal: &mut Tui, app: &mut App) -> Result<()> {
    let mut events = EventHandler::new(TICK_RATE);

    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(app, event).await?,
            None => break,
        }
    }

    Ok(())
}
