//! Turning raw model replies into display text and theme commands.
//!
//! The model is prompted to answer in prose but may embed a JSON directive
//! such as `{"action":"change_color","target":"background","color":"#111"}`
//! anywhere in its reply. Detection is a best-effort bracket scan: prose that
//! itself contains brackets can be mis-read as a directive, and every failure
//! degrades to showing text.

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::sync::OnceLock;
use tracing::debug;

use crate::theme::{ThemeSlot, ThemeState, ThemeUpdate};

pub const CHANGE_CONFIRMATION: &str = "Pronto! As cores foram alteradas.";
pub const RESET_CONFIRMATION: &str = "As cores voltaram ao original!";

/// A directive decoded from one JSON value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    ChangeColor { slot: ThemeSlot, color: String },
    Reset,
    Unrecognized,
}

#[derive(Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
enum WireCommand {
    ChangeColor { target: String, color: String },
    ResetColor,
}

impl Command {
    pub fn decode(value: &Value) -> Self {
        match WireCommand::deserialize(value) {
            Ok(WireCommand::ResetColor) => Command::Reset,
            Ok(WireCommand::ChangeColor { target, color }) => {
                if color.is_empty() {
                    return Command::Unrecognized;
                }
                match ThemeSlot::from_name(&target) {
                    Some(slot) => Command::ChangeColor { slot, color },
                    None => {
                        debug!(slot = %target, "ignoring change_color for unknown slot");
                        Command::Unrecognized
                    }
                }
            }
            Err(_) => Command::Unrecognized,
        }
    }
}

/// What a reply asks the UI to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interpretation {
    /// Show this text as the model's message.
    Display(String),
    /// Merge these slots into the theme.
    Recolor(ThemeUpdate),
    /// Restore the baseline theme.
    Reset,
}

impl Interpretation {
    /// Perform the theme side effect and return the text to append.
    pub fn apply(self, theme: &mut ThemeState) -> String {
        match self {
            Interpretation::Display(text) => text,
            Interpretation::Recolor(updates) => {
                theme.apply_partial(&updates);
                CHANGE_CONFIRMATION.to_string()
            }
            Interpretation::Reset => {
                theme.reset();
                RESET_CONFIRMATION.to_string()
            }
        }
    }
}

pub fn interpret(raw: &str) -> Interpretation {
    let Some(span) = find_json_span(raw) else {
        return Interpretation::Display(strip_bold(raw));
    };

    let parsed: Value = match serde_json::from_str(span) {
        Ok(value) => value,
        Err(e) => {
            debug!(error = %e, "bracketed span is not JSON, showing reply as-is");
            return Interpretation::Display(raw.to_string());
        }
    };

    let values = match &parsed {
        Value::Array(items) => items.iter().collect::<Vec<_>>(),
        other => vec![other],
    };

    let mut updates = ThemeUpdate::new();
    for value in values {
        match Command::decode(value) {
            // Reset wins over everything, including changes seen earlier.
            Command::Reset => return Interpretation::Reset,
            Command::ChangeColor { slot, color } => {
                updates.insert(slot, color);
            }
            Command::Unrecognized => {}
        }
    }

    if updates.is_empty() {
        // Only the matched JSON is shown, not the prose around it.
        Interpretation::Display(span.to_string())
    } else {
        Interpretation::Recolor(updates)
    }
}

/// Find the first balanced `[...]` or `{...}` span. Brackets inside JSON
/// string literals do not count. An opener that never balances is skipped
/// and the scan resumes at the next one, so a reply full of unmatched
/// openers costs quadratic time in its length. Model replies are short
/// enough for that to stay well under a frame.
pub fn find_json_span(text: &str) -> Option<&str> {
    text.char_indices()
        .filter(|(_, c)| *c == '[' || *c == '{')
        .find_map(|(start, _)| {
            balanced_len(&text[start..]).map(|len| &text[start..start + len])
        })
}

fn balanced_len(s: &str) -> Option<usize> {
    let mut closers: Vec<char> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in s.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '[' => closers.push(']'),
            '{' => closers.push('}'),
            ']' | '}' => {
                if closers.pop() != Some(c) {
                    return None;
                }
                if closers.is_empty() {
                    return Some(i + c.len_utf8());
                }
            }
            _ => {}
        }
    }
    None
}

/// `**text**` -> `text`, per line, shortest match.
pub fn strip_bold(text: &str) -> String {
    static BOLD: OnceLock<Regex> = OnceLock::new();
    let re = BOLD.get_or_init(|| Regex::new(r"\*\*(.*?)\*\*").expect("bold pattern compiles"));
    re.replace_all(text, "${1}").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(raw: &str) -> (ThemeState, String) {
        let mut theme = ThemeState::baseline();
        let text = interpret(raw).apply(&mut theme);
        (theme, text)
    }

    #[test]
    fn reset_short_circuits_later_changes() {
        let mut theme = ThemeState::baseline();
        let mut dark = ThemeUpdate::new();
        dark.insert(ThemeSlot::Background, "#000".to_string());
        theme.apply_partial(&dark);

        let reply = r##"[{"action":"reset_color"},{"action":"change_color","target":"text","color":"#000"}]"##;
        let text = interpret(reply).apply(&mut theme);

        assert!(theme.is_baseline());
        assert_eq!(text, RESET_CONFIRMATION);
    }

    #[test]
    fn reset_wins_even_after_changes() {
        let reply = r##"[{"action":"change_color","target":"text","color":"#000"},{"action":"reset_color"}]"##;
        assert_eq!(interpret(reply), Interpretation::Reset);
    }

    #[test]
    fn change_embedded_in_prose_updates_one_slot() {
        let reply = r##"Sure! {"action":"change_color","target":"background","color":"#111111"} done"##;
        let (theme, text) = run(reply);

        assert_eq!(theme.get(ThemeSlot::Background), "#111111");
        assert_eq!(theme.get(ThemeSlot::Text), ThemeSlot::Text.default_color());
        assert_eq!(theme.get(ThemeSlot::AboutBackground), ThemeSlot::AboutBackground.default_color());
        assert_eq!(theme.get(ThemeSlot::AboutText), ThemeSlot::AboutText.default_color());
        assert_eq!(text, CHANGE_CONFIRMATION);
    }

    #[test]
    fn unknown_slot_shows_matched_json() {
        let reply = r##"{"action":"change_color","target":"doesnotexist","color":"#fff"}"##;
        let (theme, text) = run(reply);
        assert!(theme.is_baseline());
        assert_eq!(text, reply);
    }

    #[test]
    fn unknown_slot_does_not_block_later_commands() {
        let reply = r##"[
            {"action":"change_color","target":"doesnotexist","color":"#fff"},
            {"action":"change_color","target":"aboutText","color":"blue"}
        ]"##;
        let (theme, text) = run(reply);
        assert_eq!(theme.get(ThemeSlot::AboutText), "blue");
        assert_eq!(text, CHANGE_CONFIRMATION);
    }

    #[test]
    fn later_change_for_same_slot_wins() {
        let reply = r##"[
            {"action":"change_color","target":"text","color":"red"},
            {"action":"change_color","target":"text","color":"white"},
            {"action":"change_color","target":"background","color":"black"}
        ]"##;
        let (theme, _) = run(reply);
        assert_eq!(theme.get(ThemeSlot::Text), "white");
        assert_eq!(theme.get(ThemeSlot::Background), "black");
    }

    #[test]
    fn plain_text_strips_bold_markers() {
        let (theme, text) = run("The **latte** is $4");
        assert!(theme.is_baseline());
        assert_eq!(text, "The latte is $4");
    }

    #[test]
    fn bold_stripping_handles_several_spans() {
        assert_eq!(strip_bold("**a** and **b**"), "a and b");
        assert_eq!(strip_bold("unclosed **bold"), "unclosed **bold");
    }

    #[test]
    fn malformed_json_falls_back_to_raw_text() {
        let reply = "Here you go **friend**: {action: change_color}";
        let (theme, text) = run(reply);
        assert!(theme.is_baseline());
        assert_eq!(text, reply);
    }

    #[test]
    fn incomplete_commands_are_ignored() {
        let reply = r##"[{"action":"change_color","target":"text"},{"action":"change_color","target":"text","color":""},{"action":"dance"},42]"##;
        let (theme, text) = run(reply);
        assert!(theme.is_baseline());
        assert_eq!(text, reply);
    }

    #[test]
    fn brackets_inside_strings_do_not_end_the_span() {
        let text = r#"ok {"action":"noop","note":"a } b"} tail"#;
        assert_eq!(find_json_span(text), Some(r#"{"action":"noop","note":"a } b"}"#));
    }

    #[test]
    fn unbalanced_opener_is_skipped() {
        let text = r#"{ oops [{"action":"reset_color"}]"#;
        assert_eq!(find_json_span(text), Some(r#"[{"action":"reset_color"}]"#));
        assert_eq!(interpret(text), Interpretation::Reset);
    }

    #[test]
    fn many_unmatched_openers_still_reach_the_command() {
        let command = r#"{"action":"reset_color"}"#;
        for prefix in ["{[", "{ ", "[ "] {
            let mut text = prefix.repeat(2_000);
            // A mismatched closer ends every scan started in the prefix
            text.push_str(if prefix == "{ " { "] " } else { "} " });
            text.push_str(command);

            assert_eq!(find_json_span(&text), Some(command));
            assert_eq!(interpret(&text), Interpretation::Reset);
        }
    }

    #[test]
    fn no_brackets_means_no_span() {
        assert_eq!(find_json_span("Abrimos às 7h."), None);
        assert_eq!(find_json_span("only closers ] }"), None);
    }

    #[test]
    fn decode_validates_shape() {
        let reset: Value = serde_json::json!({"action": "reset_color", "extra": true});
        assert_eq!(Command::decode(&reset), Command::Reset);

        let change: Value = serde_json::json!({"action": "change_color", "target": "text", "color": "#000"});
        assert_eq!(
            Command::decode(&change),
            Command::ChangeColor { slot: ThemeSlot::Text, color: "#000".to_string() }
        );

        let wrong_type: Value = serde_json::json!({"action": "change_color", "target": "text", "color": 5});
        assert_eq!(Command::decode(&wrong_type), Command::Unrecognized);
    }
}
