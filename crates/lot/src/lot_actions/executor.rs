//! Action executor system: drains the [`ActionQueue`] each update, applies
//! every queued [`LotAction`] to the [`ParkingEngine`] in order, and records
//! results in the [`ActionResultLog`].

use bevy::prelude::*;

use crate::allocation::ParkingEngine;
use crate::events::{EventJournal, EventRecorder, LayoutChanged, LotEvent, LotEventRecorded};
use crate::lot_mode::LotMode;

use super::result_log::ActionResultLog;
use super::{ActionQueue, ActionResult, LotAction};

/// Fans each event out to the in-memory journal and the ECS event stream.
struct EcsRecorder<'a, 'w> {
    journal: &'a mut EventJournal,
    writer: &'a mut EventWriter<'w, LotEventRecorded>,
}

impl EventRecorder for EcsRecorder<'_, '_> {
    fn record(&mut self, event: &LotEvent) {
        self.journal.push(event.clone());
        self.writer.send(LotEventRecorded(event.clone()));
    }
}

// ---------------------------------------------------------------------------
// System
// ---------------------------------------------------------------------------

pub fn execute_queued_actions(
    mut queue: ResMut<ActionQueue>,
    mut log: ResMut<ActionResultLog>,
    mut engine: ResMut<ParkingEngine>,
    mut journal: ResMut<EventJournal>,
    mut writer: EventWriter<LotEventRecorded>,
    mut layouts: EventWriter<LayoutChanged>,
    mode: Res<State<LotMode>>,
    mut next_mode: ResMut<NextState<LotMode>>,
) {
    let actions = queue.drain();
    if actions.is_empty() {
        return;
    }

    let mut recorder = EcsRecorder {
        journal: &mut *journal,
        writer: &mut writer,
    };
    for queued in actions {
        let result = execute_single(&queued.action, &mut *engine, &mut recorder);
        match &result {
            ActionResult::Error(err) => {
                warn!("{:?} request {:?} rejected: {}", queued.source, queued.action, err);
            }
            ActionResult::LayoutApplied(summary) => {
                layouts.send(LayoutChanged(summary.clone()));
            }
            _ => {}
        }
        log.push(queued.source, queued.action, result);
    }

    let wanted = if engine.is_editing() {
        LotMode::Editing
    } else {
        LotMode::Operating
    };
    if *mode.get() != wanted {
        next_mode.set(wanted);
    }
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

fn execute_single(
    action: &LotAction,
    engine: &mut ParkingEngine,
    recorder: &mut impl EventRecorder,
) -> ActionResult {
    let result = match action {
        LotAction::Park { vehicle, gate } => engine
            .park(vehicle, gate, recorder)
            .map(ActionResult::Parked),
        LotAction::Unpark { vehicle } => engine
            .unpark(vehicle, recorder)
            .map(ActionResult::Unparked),
        LotAction::BeginEdit => {
            engine.begin_edit();
            Ok(ActionResult::EditStarted)
        }
        LotAction::SetCell { at, kind } => engine
            .set_cell(*at, *kind)
            .map(|()| ActionResult::CellChanged { at: *at, kind: *kind }),
        LotAction::CycleCell { at } => engine
            .cycle_cell(*at)
            .map(|kind| ActionResult::CellChanged { at: *at, kind }),
        LotAction::EndEdit => engine.end_edit().map(ActionResult::LayoutApplied),
    };
    result.unwrap_or_else(ActionResult::Error)
}
