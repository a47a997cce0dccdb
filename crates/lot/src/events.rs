use std::collections::VecDeque;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::allocation::LayoutSummary;
use crate::config::DEFAULT_JOURNAL_CAPACITY;
use crate::grid::{Coord, GateId};

// =============================================================================
// Event Types
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LotEventKind {
    Park,
    Unpark,
}

/// A completed park or unpark. Never mutated after it is recorded.
///
/// For `Park` the path runs gate -> spot and `gate` is the entry gate; for
/// `Unpark` it runs spot -> gate and `gate` is the chosen exit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LotEvent {
    pub sequence: u64,
    pub kind: LotEventKind,
    pub vehicle: String,
    pub gate: GateId,
    pub gate_coord: Coord,
    pub spot: Coord,
    pub path: Vec<Coord>,
    /// Cells in `path`, start included.
    pub distance: usize,
}

// =============================================================================
// Recorder seam
// =============================================================================

/// Receives each event once, after the ledger has been updated.
///
/// Recording is a side effect of a successful operation and cannot undo it,
/// so implementations report their own failures instead of returning them.
pub trait EventRecorder {
    fn record(&mut self, event: &LotEvent);
}

impl EventRecorder for Vec<LotEvent> {
    fn record(&mut self, event: &LotEvent) {
        self.push(event.clone());
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRecorder;

impl EventRecorder for NullRecorder {
    fn record(&mut self, _event: &LotEvent) {}
}

/// Broadcast of every recorded event, for plugins that persist or display them.
#[derive(Event, Debug, Clone)]
pub struct LotEventRecorded(pub LotEvent);

/// Sent once per successful `end_edit`, even when editing opened and closed
/// within the same update.
#[derive(Event, Debug, Clone)]
pub struct LayoutChanged(pub LayoutSummary);

// =============================================================================
// Event Journal Resource
// =============================================================================

/// Bounded in-memory history of recent events, oldest first.
#[derive(Resource, Debug, Clone)]
pub struct EventJournal {
    events: VecDeque<LotEvent>,
    max_events: usize,
}

impl Default for EventJournal {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_JOURNAL_CAPACITY)
    }
}

impl EventJournal {
    pub fn with_capacity(max_events: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(max_events.min(DEFAULT_JOURNAL_CAPACITY)),
            max_events: max_events.max(1),
        }
    }

    /// Push a new event, trimming the oldest if over capacity.
    pub fn push(&mut self, event: LotEvent) {
        self.events.push_back(event);
        while self.events.len() > self.max_events {
            self.events.pop_front();
        }
    }

    /// The last `n` events (or fewer), oldest first.
    pub fn last_n(&self, n: usize) -> Vec<LotEvent> {
        let start = self.events.len().saturating_sub(n);
        self.events.iter().skip(start).cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LotEvent> + '_ {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn max_events(&self) -> usize {
        self.max_events
    }
}

impl EventRecorder for EventJournal {
    fn record(&mut self, event: &LotEvent) {
        self.push(event.clone());
    }
}
