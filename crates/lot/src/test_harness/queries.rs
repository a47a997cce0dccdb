//! Action and query methods for `TestLot`.

use bevy::prelude::*;

use crate::allocation::{LayoutSummary, ParkingEngine};
use crate::events::{EventJournal, LotEvent};
use crate::lot_actions::{ActionQueue, ActionResult, ActionResultLog, ActionSource, LotAction};
use crate::lot_mode::LotMode;

use super::{CapturedEvents, CapturedLayouts, TestLot};

impl TestLot {
    // -----------------------------------------------------------------------
    // Driving the app
    // -----------------------------------------------------------------------

    /// Run one `app.update()`. Mode changes requested by the executor are
    /// applied at the start of the following update.
    pub fn update(&mut self) {
        self.app.update();
    }

    /// Queue `action`, run one update, and return its result.
    pub fn act(&mut self, action: LotAction) -> ActionResult {
        self.app
            .world_mut()
            .resource_mut::<ActionQueue>()
            .push(ActionSource::Operator, action);
        self.app.update();
        self.app
            .world()
            .resource::<ActionResultLog>()
            .last_result()
            .cloned()
            .expect("executor should log a result for every action")
    }

    pub fn park(&mut self, vehicle: &str, gate: &str) -> ActionResult {
        self.act(LotAction::Park {
            vehicle: vehicle.to_string(),
            gate: gate.to_string(),
        })
    }

    pub fn unpark(&mut self, vehicle: &str) -> ActionResult {
        self.act(LotAction::Unpark {
            vehicle: vehicle.to_string(),
        })
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn world_mut(&mut self) -> &mut World {
        self.app.world_mut()
    }

    pub fn resource<T: Resource>(&self) -> &T {
        self.app.world().resource::<T>()
    }

    pub fn engine(&self) -> &ParkingEngine {
        self.resource::<ParkingEngine>()
    }

    pub fn journal(&self) -> &EventJournal {
        self.resource::<EventJournal>()
    }

    pub fn captured_events(&self) -> &[LotEvent] {
        &self.resource::<CapturedEvents>().0
    }

    pub fn captured_layouts(&self) -> &[LayoutSummary] {
        &self.resource::<CapturedLayouts>().0
    }

    pub fn mode(&self) -> LotMode {
        *self.resource::<State<LotMode>>().get()
    }
}
