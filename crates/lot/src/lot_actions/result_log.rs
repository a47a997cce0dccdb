//! Ring-buffer log of recently executed lot actions and their results.
//!
//! The [`ActionResultLog`] resource keeps the last 64 requests together with
//! who sent them, so callers that queued an action can read its outcome after
//! the next update.

use std::collections::VecDeque;

use bevy::prelude::*;

use super::{ActionResult, ActionSource, LotAction};

/// Maximum number of entries retained in the ring buffer.
const MAX_ENTRIES: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggedAction {
    pub source: ActionSource,
    pub action: LotAction,
    pub result: ActionResult,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct ActionResultLog {
    entries: VecDeque<LoggedAction>,
}

impl ActionResultLog {
    /// Record a request, evicting the oldest when full.
    pub fn push(&mut self, source: ActionSource, action: LotAction, result: ActionResult) {
        if self.entries.len() >= MAX_ENTRIES {
            self.entries.pop_front();
        }
        self.entries.push_back(LoggedAction {
            source,
            action,
            result,
        });
    }

    /// The last `n` entries (or fewer), oldest first.
    pub fn last_n(&self, n: usize) -> Vec<&LoggedAction> {
        let start = self.entries.len().saturating_sub(n);
        self.entries.iter().skip(start).collect()
    }

    pub fn last_result(&self) -> Option<&ActionResult> {
        self.entries.back().map(|entry| &entry.result)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
