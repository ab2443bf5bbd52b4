//! Query composition.
//!
//! Turns raw text plus the remembered or overridden platform intent into
//! the single message string sent to the chat service.

use std::sync::LazyLock;

use regex::Regex;

use crate::memory::IntentMemory;
use crate::types::ComposeRequest;

/// Text that begins with the word "search" is a literal search command.
static SEARCH_COMMAND_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^search\b").expect("Invalid search command regex"));

/// Leading `search` or `search on <platform>` of a search command.
static SEARCH_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^search\b(?:\s+on\s+(?:google|youtube|wikipedia)\b)?")
        .expect("Invalid search prefix regex")
});

/// Whether `text` begins with the literal word `search` (any case).
pub fn is_search_command(text: &str) -> bool {
    SEARCH_COMMAND_RE.is_match(text)
}

// =============================================================================
// QueryComposer
// =============================================================================

/// Builds outgoing messages and maintains [`IntentMemory`].
///
/// Rules, applied to the trimmed input:
/// - Plain text with an effective platform (override, else memory) becomes
///   `search on <platform> <query>`, where the query is the override fragment
///   if given, else the text itself.
/// - A chip whose label is already a search command ("Search on Google") is a
///   platform command when it carries an intent override: it is rewritten the
///   same way, with the override fragment as the query, else whatever follows
///   the label's `search [on <platform>]` prefix.
/// - A rewrite stores the platform when `persist_intent` is set.
/// - Any search command that is sent as typed clears the memory.
///
/// The composer never reads or writes conversation history.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryComposer;

impl QueryComposer {
    pub fn new() -> Self {
        Self
    }

    /// Compose the outgoing message for `request`, updating `memory`.
    pub fn compose(&self, request: &ComposeRequest, memory: &mut IntentMemory) -> String {
        let content = request.raw_text.trim();
        let literal_search = is_search_command(content);

        let rewrite_intent = match request.intent_override.or(memory.get()) {
            Some(intent) if !literal_search || request.intent_override.is_some() => Some(intent),
            _ => None,
        };

        let Some(intent) = rewrite_intent else {
            if literal_search {
                tracing::debug!(content, "literal search command; clearing intent memory");
                memory.clear();
            }
            return content.to_string();
        };

        let query_part = match request.query_override.as_deref() {
            Some(fragment) if !fragment.is_empty() => fragment.trim(),
            _ if literal_search => strip_search_prefix(content),
            _ => content,
        };

        let composed = if query_part.is_empty() {
            format!("search on {}", intent)
        } else {
            format!("search on {} {}", intent, query_part)
        };

        if request.persist_intent {
            memory.set(intent);
        }

        tracing::debug!(
            intent = %intent,
            persisted = request.persist_intent,
            composed = %composed,
            "rewrote query for platform"
        );
        composed
    }
}

/// The query words after a search command's prefix, e.g. `cats` in
/// `Search on Google cats`. Empty for a bare `Search on YouTube`.
fn strip_search_prefix(content: &str) -> &str {
    match SEARCH_PREFIX_RE.find(content) {
        Some(prefix) => content[prefix.end()..].trim(),
        None => content,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_core::PlatformIntent;

    fn compose(request: ComposeRequest, memory: &mut IntentMemory) -> String {
        QueryComposer::new().compose(&request, memory)
    }

    fn plain(text: &str) -> ComposeRequest {
        ComposeRequest {
            raw_text: text.to_string(),
            ..ComposeRequest::default()
        }
    }

    fn memory_with(intent: PlatformIntent) -> IntentMemory {
        let mut memory = IntentMemory::new();
        memory.set(intent);
        memory
    }

    // ---- Search command detection ----

    #[test]
    fn test_is_search_command() {
        assert!(is_search_command("search cats"));
        assert!(is_search_command("Search on Google"));
        assert!(is_search_command("SEARCH"));
        assert!(is_search_command("search, please"));
        assert!(!is_search_command("searching for cats"));
        assert!(!is_search_command("research"));
        assert!(!is_search_command(" search cats"));
        assert!(!is_search_command(""));
    }

    // ---- No platform ----

    #[test]
    fn test_plain_text_without_intent_is_trimmed_only() {
        let mut memory = IntentMemory::new();
        assert_eq!(compose(plain("  hello there \n"), &mut memory), "hello there");
        assert_eq!(memory.get(), None);
    }

    #[test]
    fn test_whitespace_only_input_composes_empty() {
        let mut memory = IntentMemory::new();
        assert_eq!(compose(plain("   "), &mut memory), "");
    }

    // ---- Remembered platform ----

    #[test]
    fn test_remembered_intent_rewrites_plain_text() {
        let mut memory = memory_with(PlatformIntent::Google);
        assert_eq!(
            compose(plain("  rust lifetimes "), &mut memory),
            "search on google rust lifetimes"
        );
        // Memory survives an unqualified turn
        assert_eq!(memory.get(), Some(PlatformIntent::Google));
    }

    #[test]
    fn test_remembered_intent_with_empty_text() {
        let mut memory = memory_with(PlatformIntent::Google);
        assert_eq!(compose(plain(""), &mut memory), "search on google");
    }

    #[test]
    fn test_typed_search_command_clears_memory() {
        let mut memory = memory_with(PlatformIntent::Youtube);
        assert_eq!(compose(plain("search anything"), &mut memory), "search anything");
        assert_eq!(memory.get(), None);
    }

    #[test]
    fn test_typed_search_command_without_memory() {
        let mut memory = IntentMemory::new();
        assert_eq!(compose(plain("Search cats"), &mut memory), "Search cats");
        assert_eq!(memory.get(), None);
    }

    // ---- Overrides ----

    #[test]
    fn test_intent_override_beats_memory() {
        let mut memory = memory_with(PlatformIntent::Youtube);
        let request = ComposeRequest {
            raw_text: "sach".to_string(),
            intent_override: Some(PlatformIntent::Wikipedia),
            ..ComposeRequest::default()
        };
        assert_eq!(compose(request, &mut memory), "search on wikipedia sach");
        // Not persisted, memory unchanged
        assert_eq!(memory.get(), Some(PlatformIntent::Youtube));
    }

    #[test]
    fn test_query_override_replaces_text() {
        let mut memory = IntentMemory::new();
        let request = ComposeRequest {
            raw_text: "Wikipedia sach".to_string(),
            intent_override: Some(PlatformIntent::Wikipedia),
            query_override: Some("  sach  ".to_string()),
            persist_intent: true,
        };
        assert_eq!(compose(request, &mut memory), "search on wikipedia sach");
        assert_eq!(memory.get(), Some(PlatformIntent::Wikipedia));
    }

    #[test]
    fn test_blank_query_override_yields_bare_platform() {
        let mut memory = IntentMemory::new();
        let request = ComposeRequest {
            raw_text: "cats".to_string(),
            intent_override: Some(PlatformIntent::Google),
            query_override: Some("   ".to_string()),
            persist_intent: false,
        };
        assert_eq!(compose(request, &mut memory), "search on google");
    }

    #[test]
    fn test_empty_query_override_falls_back_to_text() {
        let mut memory = IntentMemory::new();
        let request = ComposeRequest {
            raw_text: "cats".to_string(),
            intent_override: Some(PlatformIntent::Google),
            query_override: Some(String::new()),
            persist_intent: false,
        };
        assert_eq!(compose(request, &mut memory), "search on google cats");
    }

    // ---- Chip labels that are search commands ----

    #[test]
    fn test_search_chip_with_quoted_query_persists_intent() {
        let mut memory = IntentMemory::new();
        let request = ComposeRequest {
            raw_text: "Search on Google".to_string(),
            intent_override: Some(PlatformIntent::Google),
            query_override: Some("sach".to_string()),
            persist_intent: true,
        };
        assert_eq!(compose(request, &mut memory), "search on google sach");
        assert_eq!(memory.get(), Some(PlatformIntent::Google));
    }

    #[test]
    fn test_search_chip_without_query_sends_bare_platform() {
        let mut memory = IntentMemory::new();
        let request = ComposeRequest {
            raw_text: "Search on YouTube".to_string(),
            intent_override: Some(PlatformIntent::Youtube),
            query_override: None,
            persist_intent: true,
        };
        assert_eq!(compose(request, &mut memory), "search on youtube");
        assert_eq!(memory.get(), Some(PlatformIntent::Youtube));
    }

    #[test]
    fn test_search_chip_keeps_trailing_query() {
        let mut memory = IntentMemory::new();
        let request = ComposeRequest {
            raw_text: "Search on Google cats".to_string(),
            intent_override: Some(PlatformIntent::Google),
            query_override: None,
            persist_intent: true,
        };
        assert_eq!(compose(request, &mut memory), "search on google cats");
        assert_eq!(memory.get(), Some(PlatformIntent::Google));
    }

    #[test]
    fn test_search_command_with_override_keeps_query() {
        let mut memory = IntentMemory::new();
        let request = ComposeRequest {
            raw_text: "search cats".to_string(),
            intent_override: Some(PlatformIntent::Youtube),
            ..ComposeRequest::default()
        };
        assert_eq!(compose(request, &mut memory), "search on youtube cats");
    }

    #[test]
    fn test_search_chip_naming_other_platform_keeps_rest() {
        let mut memory = IntentMemory::new();
        let request = ComposeRequest {
            raw_text: "Search on Wikipedia rust lang".to_string(),
            intent_override: Some(PlatformIntent::Wikipedia),
            ..ComposeRequest::default()
        };
        assert_eq!(compose(request, &mut memory), "search on wikipedia rust lang");
    }

    #[test]
    fn test_strip_search_prefix() {
        assert_eq!(strip_search_prefix("Search on YouTube"), "");
        assert_eq!(strip_search_prefix("search on google  cats "), "cats");
        assert_eq!(strip_search_prefix("SEARCH dogs"), "dogs");
        assert_eq!(strip_search_prefix("search on bing cats"), "on bing cats");
    }

    #[test]
    fn test_persisted_intent_applies_to_next_unqualified_turn() {
        let composer = QueryComposer::new();
        let mut memory = IntentMemory::new();

        let chip = ComposeRequest {
            raw_text: "Search on Google".to_string(),
            intent_override: Some(PlatformIntent::Google),
            query_override: Some("sach".to_string()),
            persist_intent: true,
        };
        composer.compose(&chip, &mut memory);

        assert_eq!(
            composer.compose(&plain("rust"), &mut memory),
            "search on google rust"
        );
    }
}
