//! # TestLot: headless integration test harness
//!
//! Wraps a `bevy::app::App` with `LotPlugin` so tests can queue actions,
//! run updates, and inspect the engine, the journal and the mode state
//! without a window or stdin loop.

mod queries;
mod setup;

use bevy::app::App;
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;

use crate::allocation::{LayoutSummary, ParkingEngine};
use crate::events::{LayoutChanged, LotEvent, LotEventRecorded};
use crate::grid::LotGrid;
use crate::lot_params::LotParams;
use crate::lot_sets::LotSet;
use crate::LotPlugin;

/// Every `LotEventRecorded` seen so far, in emission order.
#[derive(Resource, Debug, Default)]
pub struct CapturedEvents(pub Vec<LotEvent>);

fn capture_events(mut reader: EventReader<LotEventRecorded>, mut captured: ResMut<CapturedEvents>) {
    captured.0.extend(reader.read().map(|e| e.0.clone()));
}

/// Every `LayoutChanged` summary seen so far.
#[derive(Resource, Debug, Default)]
pub struct CapturedLayouts(pub Vec<LayoutSummary>);

fn capture_layouts(mut reader: EventReader<LayoutChanged>, mut captured: ResMut<CapturedLayouts>) {
    captured.0.extend(reader.read().map(|e| e.0.clone()));
}

pub struct TestLot {
    app: App,
}

impl Default for TestLot {
    fn default() -> Self {
        Self::new()
    }
}

impl TestLot {
    // -----------------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------------

    /// The stock 8x8 lot with corner gates and every other cell a spot.
    pub fn new() -> Self {
        Self::build(None, None)
    }

    /// A lot built from ASCII rows (see `LotGrid::from_rows`).
    pub fn with_layout(rows: &[&str]) -> Self {
        let grid = LotGrid::from_rows(rows).expect("test layout should parse");
        Self::build(None, Some(ParkingEngine::new(grid)))
    }

    pub fn with_params(params: LotParams) -> Self {
        Self::build(Some(params), None)
    }

    fn build(params: Option<LotParams>, engine: Option<ParkingEngine>) -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(StatesPlugin);

        // Both must be present before LotPlugin reads them.
        if let Some(params) = params {
            app.insert_resource(params);
        }
        if let Some(engine) = engine {
            app.insert_resource(engine);
        }
        app.add_plugins(LotPlugin);

        app.init_resource::<CapturedEvents>();
        app.init_resource::<CapturedLayouts>();
        app.add_systems(
            Update,
            (capture_events, capture_layouts).in_set(LotSet::Record),
        );

        app.update();
        Self { app }
    }
}
