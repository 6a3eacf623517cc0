//! Stateful handles the admin screens hold on to.
//!
//! Each hook owns its state exclusively and is meant for a single-threaded
//! UI event loop: handles are cheap to clone, clones share state, and nothing
//! here is `Send`.

pub mod use_display_rules;
pub mod use_welcome_bonus_timer;

pub use use_display_rules::{use_display_rules, DisplayRulesState, UseDisplayRulesHandle};
pub use use_welcome_bonus_timer::{
    use_welcome_bonus_timer, UseWelcomeBonusTimerHandle, WelcomeBonusTimerState,
};

use std::cell::Cell;

/// Sequence numbers for the operations a hook has started.
///
/// Responses that replace the whole held value are dropped when a newer
/// operation has already written state, so a slow fetch cannot overwrite the
/// result of a later create or fetch.
#[derive(Debug, Default)]
pub(crate) struct RequestTracker {
    latest: Cell<u64>,
    applied: Cell<u64>,
}

impl RequestTracker {
    /// Register a new operation and return its sequence number
    pub(crate) fn begin(&self) -> u64 {
        let seq = self.latest.get() + 1;
        self.latest.set(seq);
        seq
    }

    /// For whole-value replacements: claims the write unless something newer already wrote
    pub(crate) fn try_apply(&self, seq: u64) -> bool {
        if seq <= self.applied.get() {
            return false;
        }
        self.applied.set(seq);
        true
    }

    /// For incremental changes, which always apply
    pub(crate) fn mark_applied(&self, seq: u64) {
        self.applied.set(self.applied.get().max(seq));
    }
}
