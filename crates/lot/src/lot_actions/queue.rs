use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::LotAction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionSource {
    /// Interactive operator at the gate.
    Operator,
    /// JSON-lines agent session.
    Agent,
    /// Generated traffic.
    Simulation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueuedAction {
    pub source: ActionSource,
    pub action: LotAction,
}

/// FIFO of requests waiting for the executor.
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionQueue {
    pending: Vec<QueuedAction>,
}

impl ActionQueue {
    pub fn push(&mut self, source: ActionSource, action: LotAction) {
        self.pending.push(QueuedAction { source, action });
    }

    pub fn drain(&mut self) -> Vec<QueuedAction> {
        self.pending.drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }
}
