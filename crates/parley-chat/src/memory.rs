//! Single-slot memory of the last confirmed platform intent.

use parley_core::PlatformIntent;

/// Holds the platform that applies to the next unqualified query.
///
/// Exactly one value (or none) is live at a time. Only the
/// [`QueryComposer`](crate::QueryComposer) writes to it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntentMemory {
    current: Option<PlatformIntent>,
}

impl IntentMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<PlatformIntent> {
        self.current
    }

    pub fn set(&mut self, intent: PlatformIntent) {
        self.current = Some(intent);
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}
