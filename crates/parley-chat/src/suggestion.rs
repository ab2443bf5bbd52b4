//! Suggestion-chip resolution.
//!
//! A chip click carries two hints: the platform named in its label, and the
//! query the bot quoted in the message that offered the chip
//! (e.g. `Searching Google for 'sach'…`).

use std::sync::LazyLock;

use parley_core::PlatformIntent;
use regex::Regex;

use crate::types::SendOptions;

static QUOTED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"'(.*?)'").expect("Invalid quoted query regex"));

/// Label keywords in match order. The first hit wins.
const LABEL_KEYWORDS: [(&str, PlatformIntent); 3] = [
    ("google", PlatformIntent::Google),
    ("wikipedia", PlatformIntent::Wikipedia),
    ("youtube", PlatformIntent::Youtube),
];

/// Contents of the first single-quoted span in `text`, if non-empty.
pub fn extract_quoted_query(text: &str) -> Option<String> {
    QUOTED_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|q| !q.is_empty())
        .map(str::to_string)
}

/// Platform named in a chip label (case-insensitive substring match).
pub fn classify_label(label: &str) -> Option<PlatformIntent> {
    let lower = label.to_lowercase();
    LABEL_KEYWORDS
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, intent)| *intent)
}

/// A resolved chip click, ready for [`ChatSession::send`](crate::ChatSession::send).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionClick {
    pub label: String,
    pub options: SendOptions,
}

/// Turns chip clicks into send requests. Never touches intent memory itself;
/// persistence goes through the composer.
#[derive(Debug, Clone, Copy, Default)]
pub struct SuggestionResolver;

impl SuggestionResolver {
    pub fn new() -> Self {
        Self
    }

    pub fn resolve(&self, label: &str, bot_text: &str) -> SuggestionClick {
        let intent = classify_label(label);
        SuggestionClick {
            label: label.to_string(),
            options: SendOptions {
                intent_override: intent,
                query_override: extract_quoted_query(bot_text),
                persist_intent: intent.is_some(),
            },
        }
    }
}
