//! Reply normalization.
//!
//! Maps whatever the chat service returned onto a display-safe reply.
//! Malformed bodies degrade to defaults; this never fails.

use parley_core::ConversationTurn;
use serde_json::Value;

/// Text shown when the body has no string `response` field.
pub const FALLBACK_REPLY_TEXT: &str = "I couldn't parse the server response.";

/// Display-ready fields extracted from a service response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BotReply {
    pub text: String,
    pub url: Option<String>,
    pub lang: Option<String>,
    pub intent: Option<String>,
    pub confidence: Option<f64>,
    pub suggestions: Vec<String>,
}

impl BotReply {
    /// Convert into a bot turn for the history.
    pub fn into_turn(self) -> ConversationTurn {
        let mut turn = ConversationTurn::bot(self.text);
        turn.url = self.url;
        turn.lang = self.lang;
        turn.intent = self.intent;
        turn.confidence = self.confidence;
        turn.suggestions = self.suggestions;
        turn
    }
}

/// Normalizes raw service bodies.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReplyNormalizer;

impl ReplyNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Never fails. `lang` and `intent` are passed through without checking
    /// their values, but only when they are JSON strings; other types are
    /// dropped, as is a non-numeric `confidence`.
    pub fn normalize(&self, body: &Value) -> BotReply {
        let text = match body.get("response").and_then(Value::as_str) {
            Some(text) => text.to_string(),
            None => {
                tracing::debug!("response field missing or not a string");
                FALLBACK_REPLY_TEXT.to_string()
            }
        };

        BotReply {
            text,
            url: string_field(body, "url"),
            lang: string_field(body, "lang"),
            intent: string_field(body, "intent"),
            confidence: body.get("confidence").and_then(Value::as_f64),
            suggestions: suggestions(body),
        }
    }
}

fn string_field(body: &Value, key: &str) -> Option<String> {
    body.get(key).and_then(Value::as_str).map(str::to_string)
}

/// The `suggestions` array, only if every element is a string.
fn suggestions(body: &Value) -> Vec<String> {
    let Some(items) = body.get("suggestions").and_then(Value::as_array) else {
        return Vec::new();
    };
    items
        .iter()
        .map(|item| item.as_str().map(str::to_string))
        .collect::<Option<Vec<_>>>()
        .unwrap_or_default()
}
