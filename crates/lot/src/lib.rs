use bevy::prelude::*;

pub mod agent_protocol;
pub mod allocation;
pub mod ascii_map;
pub mod config;
pub mod events;
pub mod grid;
pub mod lot_actions;
pub mod lot_error;
pub mod lot_mode;
pub mod lot_observation;
pub mod lot_params;
pub mod lot_sets;
pub mod occupancy;
pub mod pathfinding_sys;

#[cfg(any(test, feature = "bench"))]
pub mod test_harness;

pub use allocation::ParkingEngine;
pub use events::{EventJournal, EventRecorder, LayoutChanged, LotEvent, LotEventRecorded};
pub use lot_error::LotError;
pub use lot_mode::LotMode;
pub use lot_params::LotParams;
pub use lot_sets::LotSet;

// ---------------------------------------------------------------------------
// Plugin
// ---------------------------------------------------------------------------

/// Registers the engine, the action pipeline and the lot state machine.
///
/// Reads `LotParams` if the caller inserted one, otherwise uses the defaults.
/// A `ParkingEngine` inserted before this plugin is kept as is. Requires
/// `StatesPlugin` (part of `DefaultPlugins`, separate under `MinimalPlugins`).
pub struct LotPlugin;

impl Plugin for LotPlugin {
    fn build(&self, app: &mut App) {
        let params = app
            .world()
            .get_resource::<LotParams>()
            .cloned()
            .unwrap_or_default();

        if !app.world().contains_resource::<ParkingEngine>() {
            let engine = params.build_engine().unwrap_or_else(|err| {
                error!("lot parameters rejected ({err}), using the stock layout");
                ParkingEngine::default()
            });
            app.insert_resource(engine);
        }
        app.insert_resource(EventJournal::with_capacity(params.journal_capacity));
        app.insert_resource(params);

        app.add_event::<LotEventRecorded>();
        app.add_event::<LayoutChanged>();
        app.init_state::<LotMode>();

        app.configure_sets(Update, (LotSet::Actions, LotSet::Record).chain());
        app.add_plugins(lot_actions::LotActionsPlugin);
        app.add_systems(Update, report_layout.in_set(LotSet::Record));
    }
}

/// Logs what the allocator will see once editing ends.
fn report_layout(mut layouts: EventReader<LayoutChanged>) {
    for LayoutChanged(summary) in layouts.read() {
        for spot in &summary.unreachable_spots {
            warn!("parking spot {} cannot be reached from any gate", spot);
        }
        info!(
            "lot operating: {} of {} spots free",
            summary.free_spots, summary.parking_spots
        );
    }
}
