//! Append-only conversation history.

use parley_core::ConversationTurn;

/// Ordered turns of one session. Insertion order is display order.
#[derive(Debug, Clone, Default)]
pub struct ConversationHistory {
    turns: Vec<ConversationTurn>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, turn: ConversationTurn) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub(crate) fn len(&self) -> usize {
        self.turns.len()
    }

    /// Most recent turn authored by the bot.
    pub fn last_bot_turn(&self) -> Option<&ConversationTurn> {
        self.turns.iter().rev().find(|t| t.is_bot())
    }
}
