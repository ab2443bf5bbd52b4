use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ParleyError;

// =============================================================================
// Enums
// =============================================================================

/// A target service that a search query can be directed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformIntent {
    Google,
    Youtube,
    Wikipedia,
}

impl PlatformIntent {
    pub const ALL: [PlatformIntent; 3] = [
        PlatformIntent::Google,
        PlatformIntent::Youtube,
        PlatformIntent::Wikipedia,
    ];

    /// Lowercase name used on the wire, e.g. in `"search on youtube"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            PlatformIntent::Google => "google",
            PlatformIntent::Youtube => "youtube",
            PlatformIntent::Wikipedia => "wikipedia",
        }
    }
}

impl fmt::Display for PlatformIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlatformIntent {
    type Err = ParleyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        PlatformIntent::ALL
            .into_iter()
            .find(|intent| intent.as_str() == lower)
            .ok_or_else(|| ParleyError::UnknownIntent(s.to_string()))
    }
}

/// Who authored a conversation turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    Bot,
}

// =============================================================================
// Conversation turns
// =============================================================================

/// One message in the conversation history.
///
/// Turns are never mutated after they are appended to a history.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub sender: Sender,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,
    /// Classifier confidence, nominally in `[0, 1]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

impl ConversationTurn {
    fn new(sender: Sender, text: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            sender,
            text,
            url: None,
            lang: None,
            intent: None,
            confidence: None,
            suggestions: Vec::new(),
        }
    }

    /// A turn authored by the user.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Sender::User, text.into())
    }

    /// A bot turn carrying only text (no link, metadata or chips).
    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(Sender::Bot, text.into())
    }

    pub fn is_bot(&self) -> bool {
        self.sender == Sender::Bot
    }
}
