//! Conversational core for Parley.
//!
//! Combines typed input, remembered platform intent and suggestion-chip
//! clicks into one outgoing query, dispatches it to the remote chat service,
//! and normalizes the reply for display.

pub mod composer;
pub mod error;
pub mod history;
pub mod memory;
pub mod normalizer;
pub mod service;
pub mod session;
pub mod suggestion;
pub mod types;

pub use composer::QueryComposer;
pub use error::ChatError;
pub use history::ConversationHistory;
pub use memory::IntentMemory;
pub use normalizer::{BotReply, ReplyNormalizer};
pub use service::{ChatService, HttpChatService};
pub use session::ChatSession;
pub use suggestion::{SuggestionClick, SuggestionResolver};
pub use types::{ComposeRequest, DispatchState, SendOptions, SendOutcome};
