use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use crate::app::App;
use crate::content;
use crate::theme::Palette;
use crate::transcript::{Message, Role};

const TOGGLE_WIDTH: u16 = 12;
const TOGGLE_HEIGHT: u16 = 3;
const POPUP_WIDTH: u16 = 52;
const POPUP_HEIGHT: u16 = 24;

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();
    let palette = app.session.theme().palette();

    // The page itself, painted with the theme's background and text slots
    frame.render_widget(
        Block::default().style(Style::default().bg(palette.background).fg(palette.text)),
        area,
    );

    let [top_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_top_bar(&palette, frame, top_area);
    render_about(&palette, frame, body_area);
    render_footer(app, &palette, frame, footer_area);

    let toggle_area = toggle_rect(body_area);
    render_toggle(app, frame, toggle_area);
    app.toggle_area = Some(toggle_area);

    if app.show_chat {
        render_chat_popup(app, frame, body_area, toggle_area);
    } else {
        app.chat_area = None;
    }
}

fn render_top_bar(palette: &Palette, frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::raw("☕ "),
        Span::styled(content::SHOP_NAME, Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(
            format!("  v{}", env!("CARGO_PKG_VERSION")),
            Style::default().add_modifier(Modifier::DIM),
        ),
    ]);

    let bar = Paragraph::new(title)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(palette.text)),
        )
        .style(Style::default().bg(palette.background).fg(palette.text));
    frame.render_widget(bar, area);
}

/// Render one about-panel line: `- ` list items, `_..._` italic spans.
fn about_line(text: &'static str) -> Line<'static> {
    let (prefix, body) = match text.strip_prefix("- ") {
        Some(rest) => ("  • ", rest),
        None => ("", text),
    };

    let mut spans = vec![Span::raw(prefix)];
    for (i, piece) in body.split('_').enumerate() {
        if piece.is_empty() {
            continue;
        }
        // Odd pieces sit between underscores
        if i % 2 == 1 {
            spans.push(Span::styled(piece, Style::default().add_modifier(Modifier::ITALIC)));
        } else {
            spans.push(Span::raw(piece));
        }
    }
    Line::from(spans)
}

fn render_about(palette: &Palette, frame: &mut Frame, body_area: Rect) {
    let width = body_area.width.saturating_sub(4).min(80);
    let height = body_area.height.saturating_sub(2).min(18);
    let area = Rect::new(
        body_area.x + (body_area.width.saturating_sub(width)) / 2,
        body_area.y + 1,
        width,
        height,
    );

    let mut lines: Vec<Line> = Vec::new();
    for (i, &text) in content::ABOUT.iter().enumerate() {
        let next_is_item = content::ABOUT
            .get(i + 1)
            .is_some_and(|n| n.starts_with("- ") || n.starts_with('_'));
        if text.ends_with(':') && next_is_item && !text.starts_with("- ") {
            lines.push(Line::from(Span::styled(text, Style::default().add_modifier(Modifier::BOLD))));
        } else {
            lines.push(about_line(text));
        }
        if !next_is_item && i + 1 < content::ABOUT.len() {
            lines.push(Line::default());
        }
    }

    let about = Paragraph::new(Text::from(lines))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Sobre ")
                .border_style(Style::default().fg(palette.about_text)),
        )
        .style(Style::default().bg(palette.about_background).fg(palette.about_text));

    frame.render_widget(about, area);
}

fn render_footer(app: &App, palette: &Palette, frame: &mut Frame, area: Rect) {
    let hints = if app.show_chat {
        " Enter enviar · ↑↓ rolar · Esc fechar chat · Ctrl+C sair "
    } else {
        " Enter abrir chat · q sair "
    };
    let footer = Paragraph::new(Line::from(hints).add_modifier(Modifier::DIM))
        .style(Style::default().bg(palette.background).fg(palette.text));
    frame.render_widget(footer, area);
}

fn toggle_rect(body_area: Rect) -> Rect {
    let width = TOGGLE_WIDTH.min(body_area.width);
    let height = TOGGLE_HEIGHT.min(body_area.height);
    Rect::new(
        body_area.x + body_area.width.saturating_sub(width + 1),
        body_area.y + body_area.height.saturating_sub(height),
        width,
        height,
    )
}

fn render_toggle(app: &App, frame: &mut Frame, area: Rect) {
    let label = if app.show_chat { "✕ Fechar" } else { "💬 Chat" };
    let button = Paragraph::new(label)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Rgb(111, 78, 55))),
        )
        .style(Style::default().bg(Color::Rgb(111, 78, 55)).fg(Color::White).bold());
    frame.render_widget(Clear, area);
    frame.render_widget(button, area);
}

fn role_label(role: Role) -> Line<'static> {
    match role {
        Role::User => Line::from(Span::styled(
            "Você:",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Right),
        Role::Model => Line::from(Span::styled(
            "🤖 Bot:",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
    }
}

fn push_message<'a>(lines: &mut Vec<Line<'a>>, msg: &'a Message) {
    lines.push(role_label(msg.role));
    let style = if msg.is_error {
        Style::default().fg(Color::Red)
    } else {
        Style::default()
    };
    for text in msg.text.lines() {
        let line = Line::from(Span::styled(text, style));
        lines.push(match msg.role {
            Role::User => line.alignment(Alignment::Right),
            Role::Model => line,
        });
    }
    if msg.text.is_empty() {
        lines.push(Line::default());
    }
    lines.push(Line::default());
}

/// The visible conversation: greeting, every non-hidden message, then the
/// typing indicator while a turn is in flight.
pub fn chat_lines(app: &App) -> Vec<Line<'_>> {
    let mut lines: Vec<Line> = Vec::new();

    lines.push(role_label(Role::Model));
    for text in content::GREETING.lines() {
        lines.push(Line::from(text));
    }
    lines.push(Line::default());

    for msg in app.session.transcript().visible() {
        push_message(&mut lines, msg);
    }

    if app.session.is_typing() {
        lines.push(role_label(Role::Model));
        // Animated ellipsis: cycles through ".", "..", "..."
        let dots = ".".repeat((app.animation_frame as usize) + 1);
        lines.push(Line::from(Span::styled(
            format!("{}{}", content::TYPING, dots),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )));
    }

    lines
}

/// The message list as drawn in the popup. Scroll limits are measured on
/// this same widget so wrapping always agrees with the screen.
pub fn chat_paragraph(app: &App) -> Paragraph<'_> {
    Paragraph::new(Text::from(chat_lines(app))).wrap(Wrap { trim: false })
}

fn render_chat_popup(app: &mut App, frame: &mut Frame, body_area: Rect, toggle_area: Rect) {
    let width = POPUP_WIDTH.min(body_area.width.saturating_sub(2));
    let height = POPUP_HEIGHT.min(toggle_area.y.saturating_sub(body_area.y));
    if width < 10 || height < 6 {
        app.chat_area = None;
        return;
    }
    let popup_area = Rect::new(
        body_area.x + body_area.width.saturating_sub(width + 1),
        toggle_area.y - height,
        width,
        height,
    );

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Rgb(111, 78, 55)))
        .title(Line::from(format!(" 🤖 {} ", content::CHAT_TITLE)).bold())
        .title_top(Line::from(" Esc ▾ ").right_aligned())
        .style(Style::default().bg(Color::Rgb(250, 247, 242)).fg(Color::Rgb(60, 48, 40)));
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let [messages_area, input_area] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(3),
    ])
    .areas(inner);

    app.chat_area = Some(messages_area);

    // Store chat area dimensions for scroll calculations
    let dims_changed = app.chat_height != messages_area.height || app.chat_width != messages_area.width;
    app.chat_height = messages_area.height;
    app.chat_width = messages_area.width;
    if dims_changed {
        app.scroll_chat_to_bottom();
    }

    let messages = chat_paragraph(app).scroll((app.chat_scroll, 0));
    frame.render_widget(messages, messages_area);

    render_input(app, frame, input_area);
}

fn render_input(app: &App, frame: &mut Frame, area: Rect) {
    let busy = app.session.is_typing();
    let border_color = if busy { Color::DarkGray } else { Color::Rgb(111, 78, 55) };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    // Horizontal scroll keeps the cursor in view
    let inner_width = area.width.saturating_sub(2) as usize;
    let cursor_pos = app.input_cursor;
    let scroll_offset = if inner_width == 0 {
        0
    } else if cursor_pos >= inner_width {
        cursor_pos - inner_width + 1
    } else {
        0
    };

    let text = if app.input.is_empty() {
        Line::from(Span::styled(
            content::INPUT_PLACEHOLDER,
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        let visible: String = app.input
            .chars()
            .skip(scroll_offset)
            .take(inner_width)
            .collect();
        Line::from(visible)
    };

    frame.render_widget(Paragraph::new(text).block(block), area);

    let cursor_x = (cursor_pos - scroll_offset) as u16;
    frame.set_cursor_position((area.x + cursor_x + 1, area.y + 1));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::CompletionClient;
    use crate::dispatcher::Dispatcher;
    use crate::session::ChatSession;
    use ratatui::{backend::TestBackend, Terminal};

    fn test_app() -> App {
        let client = CompletionClient::new("http://127.0.0.1:9/unused");
        App::new(ChatSession::new(Dispatcher::new(client), "SEGREDO DO CONTEXTO"))
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn hidden_seed_never_rendered() {
        let mut app = test_app();
        app.show_chat = true;
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal.draw(|f| render(&mut app, f)).unwrap();

        let text = screen_text(&terminal);
        assert!(!text.contains("SEGREDO"));
        assert!(text.contains("Chatbot"));
        assert!(app.chat_area.is_some());
    }

    #[test]
    fn chat_lines_skip_seed_and_start_with_greeting() {
        let app = test_app();
        let lines = chat_lines(&app);
        assert_eq!(lines.len(), 4);
        assert!(lines
            .iter()
            .flat_map(|l| l.spans.iter())
            .all(|s| !s.content.contains("SEGREDO")));
    }

    #[test]
    fn page_uses_theme_background() {
        let mut app = test_app();
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal.draw(|f| render(&mut app, f)).unwrap();

        let buffer = terminal.backend().buffer();
        let corner = &buffer.content()[buffer.index_of(0, 39)];
        assert_eq!(corner.bg, Color::Rgb(0xf4, 0xf1, 0xea));
        assert!(app.toggle_area.is_some());
        assert!(app.chat_area.is_none());
    }
}
