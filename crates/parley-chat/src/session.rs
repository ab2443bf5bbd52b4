//! Conversation session: the dispatch controller.
//!
//! Owns intent memory, history, the pending-input buffer and the dispatch
//! state, and sequences one conversational turn per [`ChatSession::send`].

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use parley_core::{ConversationTurn, ParleyConfig, PlatformIntent};

use crate::composer::QueryComposer;
use crate::error::ChatError;
use crate::history::ConversationHistory;
use crate::memory::IntentMemory;
use crate::normalizer::ReplyNormalizer;
use crate::service::ChatService;
use crate::suggestion::SuggestionResolver;
use crate::types::{ComposeRequest, DispatchState, SendOptions, SendOutcome};

/// One conversation with the chat service.
///
/// `send` takes `&self` and may be invoked from several futures at once, but
/// at most one request is ever in flight: calls arriving while a reply is
/// awaited are dropped. Locks are never held across the network call.
pub struct ChatSession {
    service: Arc<dyn ChatService>,
    composer: QueryComposer,
    normalizer: ReplyNormalizer,
    resolver: SuggestionResolver,
    memory: Mutex<IntentMemory>,
    history: Mutex<ConversationHistory>,
    pending_input: Mutex<String>,
    state: Mutex<DispatchState>,
    timeout: Duration,
    failure_message: String,
}

impl ChatSession {
    /// Create a session talking to `service`, using the timeout and failure
    /// text from `config`.
    pub fn new(service: Arc<dyn ChatService>, config: &ParleyConfig) -> Self {
        Self {
            service,
            composer: QueryComposer::new(),
            normalizer: ReplyNormalizer::new(),
            resolver: SuggestionResolver::new(),
            memory: Mutex::new(IntentMemory::new()),
            history: Mutex::new(ConversationHistory::new()),
            pending_input: Mutex::new(String::new()),
            state: Mutex::new(DispatchState::Idle),
            timeout: config.service.timeout(),
            failure_message: config.chat.failure_message.clone(),
        }
    }

    /// Run one turn.
    ///
    /// Uses `text_override` if given, otherwise the pending input. The
    /// composed message is appended as a user turn, sent to the service, and
    /// answered by exactly one bot turn (the normalized reply, or the failure
    /// text on transport error or timeout). Empty messages and calls made
    /// while another turn is in flight are ignored.
    pub async fn send(&self, text_override: Option<&str>, options: SendOptions) -> SendOutcome {
        let raw_text = match text_override {
            Some(text) => text.to_string(),
            None => lock(&self.pending_input).clone(),
        };

        let content = {
            let mut memory = lock(&self.memory);
            self.composer
                .compose(&ComposeRequest::new(raw_text, &options), &mut memory)
        };

        if content.is_empty() {
            tracing::debug!("nothing to send");
            return SendOutcome::SkippedEmpty;
        }

        let Some(_in_flight) = InFlight::acquire(&self.state) else {
            tracing::debug!(content = %content, "turn already in flight; dropping send");
            return SendOutcome::SkippedBusy;
        };

        lock(&self.history).push(ConversationTurn::user(content.as_str()));
        lock(&self.pending_input).clear();

        tracing::info!(message = %content, "sending chat message");

        let result = match tokio::time::timeout(self.timeout, self.service.send_message(&content))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(ChatError::Timeout(self.timeout)),
        };

        let (turn, outcome) = match result {
            Ok(body) => {
                let reply = self.normalizer.normalize(&body);
                tracing::debug!(
                    intent = ?reply.intent,
                    suggestions = reply.suggestions.len(),
                    "reply received"
                );
                (reply.into_turn(), SendOutcome::Replied)
            }
            Err(e) => {
                tracing::warn!(error = %e, "chat service unavailable");
                (
                    ConversationTurn::bot(self.failure_message.as_str()),
                    SendOutcome::Failed,
                )
            }
        };

        lock(&self.history).push(turn);
        outcome
    }

    /// Handle a click on a suggestion chip offered by a bot turn with `bot_text`.
    pub async fn click_suggestion(&self, label: &str, bot_text: &str) -> SendOutcome {
        let click = self.resolver.resolve(label, bot_text);
        self.send(Some(&click.label), click.options).await
    }

    /// Click the `index`-th (zero-based) chip of the latest bot turn.
    ///
    /// Returns `None` if there is no such chip.
    pub async fn pick_suggestion(&self, index: usize) -> Option<SendOutcome> {
        let (label, bot_text) = {
            let history = lock(&self.history);
            let turn = history.last_bot_turn()?;
            (turn.suggestions.get(index)?.clone(), turn.text.clone())
        };
        Some(self.click_suggestion(&label, &bot_text).await)
    }

    /// Replace the pending-input buffer.
    pub fn set_input(&self, text: impl Into<String>) {
        *lock(&self.pending_input) = text.into();
    }

    pub fn pending_input(&self) -> String {
        lock(&self.pending_input).clone()
    }

    /// Snapshot of the history in display order.
    pub fn history(&self) -> Vec<ConversationTurn> {
        lock(&self.history).turns().to_vec()
    }

    /// Number of turns so far, without copying the history.
    pub fn turn_count(&self) -> usize {
        lock(&self.history).len()
    }

    pub fn last_bot_turn(&self) -> Option<ConversationTurn> {
        lock(&self.history).last_bot_turn().cloned()
    }

    /// Platform that applies to the next unqualified query.
    pub fn current_intent(&self) -> Option<PlatformIntent> {
        lock(&self.memory).get()
    }

    pub fn is_awaiting_reply(&self) -> bool {
        lock(&self.state).is_awaiting()
    }
}

/// Holds the in-flight slot; releases it on drop, including when the `send`
/// future is dropped mid-request.
struct InFlight<'a> {
    state: &'a Mutex<DispatchState>,
}

impl<'a> InFlight<'a> {
    fn acquire(state: &'a Mutex<DispatchState>) -> Option<Self> {
        if lock(state).begin() {
            Some(Self { state })
        } else {
            None
        }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        lock(self.state).finish();
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
