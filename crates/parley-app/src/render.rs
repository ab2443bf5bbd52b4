//! Plain-text rendering of conversation turns for the terminal.

use parley_core::{ConversationTurn, Sender};

/// Placeholder shown in the meta line when the reply carries no language.
const LANG_PLACEHOLDER: &str = "lang";

/// Render one turn as terminal lines.
///
/// Bot turns also show their link, an `intent • lang • confidence` line when
/// an intent was detected, and numbered suggestion chips.
pub fn render_turn(turn: &ConversationTurn) -> String {
    match turn.sender {
        Sender::User => format!("you> {}", turn.text),
        Sender::Bot => {
            let mut lines = vec![format!("bot> {}", turn.text)];

            if let Some(ref url) = turn.url {
                lines.push(format!("     Open link: {}", url));
            }

            if let Some(ref intent) = turn.intent {
                lines.push(format!(
                    "     {} • {} • {:.2}",
                    intent,
                    turn.lang.as_deref().unwrap_or(LANG_PLACEHOLDER),
                    turn.confidence.unwrap_or(0.0)
                ));
            }

            if !turn.suggestions.is_empty() {
                let chips: Vec<String> = turn
                    .suggestions
                    .iter()
                    .enumerate()
                    .map(|(i, s)| format!("[{}] {}", i + 1, s))
                    .collect();
                lines.push(format!("     {}", chips.join("  ")));
            }

            lines.join("\n")
        }
    }
}

/// Render a whole transcript, one turn after another.
pub fn render_history(turns: &[ConversationTurn]) -> String {
    turns
        .iter()
        .map(render_turn)
        .collect::<Vec<_>>()
        .join("\n")
}
