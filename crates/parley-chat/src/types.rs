//! Request, option and state types shared by the chat modules.

use parley_core::PlatformIntent;

// =============================================================================
// Composition
// =============================================================================

/// Input to one [`QueryComposer::compose`](crate::QueryComposer::compose) call.
///
/// Built once per turn and consumed immediately.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComposeRequest {
    /// Text as typed or as shown on a suggestion chip.
    pub raw_text: String,
    /// Platform that takes precedence over the remembered one.
    pub intent_override: Option<PlatformIntent>,
    /// Query fragment used instead of `raw_text` when rewriting.
    pub query_override: Option<String>,
    /// Remember the effective platform for later unqualified turns.
    pub persist_intent: bool,
}

impl ComposeRequest {
    pub fn new(raw_text: impl Into<String>, options: &SendOptions) -> Self {
        Self {
            raw_text: raw_text.into(),
            intent_override: options.intent_override,
            query_override: options.query_override.clone(),
            persist_intent: options.persist_intent,
        }
    }
}

/// Overrides accepted by [`ChatSession::send`](crate::ChatSession::send).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SendOptions {
    pub intent_override: Option<PlatformIntent>,
    pub query_override: Option<String>,
    pub persist_intent: bool,
}

// =============================================================================
// Dispatch
// =============================================================================

/// What a call to `send` ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// The service answered and a normalized bot turn was appended.
    Replied,
    /// The service was unreachable or timed out; a failure turn was appended.
    Failed,
    /// Composed content was empty. Nothing happened.
    SkippedEmpty,
    /// Another turn was in flight. Nothing happened.
    SkippedBusy,
}

impl SendOutcome {
    /// Whether the turn reached the history.
    pub fn dispatched(&self) -> bool {
        matches!(self, SendOutcome::Replied | SendOutcome::Failed)
    }
}

/// Request lifecycle of a session.
///
/// `Idle -> AwaitingReply` when a request starts, `AwaitingReply -> Idle`
/// when it resolves, whatever the result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DispatchState {
    #[default]
    Idle,
    AwaitingReply,
}

impl DispatchState {
    /// Try to start a request. Returns `false` if one is already in flight.
    pub fn begin(&mut self) -> bool {
        match self {
            DispatchState::Idle => {
                *self = DispatchState::AwaitingReply;
                true
            }
            DispatchState::AwaitingReply => false,
        }
    }

    /// Release the in-flight slot.
    pub fn finish(&mut self) {
        *self = DispatchState::Idle;
    }

    pub fn is_awaiting(&self) -> bool {
        *self == DispatchState::AwaitingReply
    }
}
