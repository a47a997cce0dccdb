//! `smartpark`: headless front ends for the parking-lot allocator.
//!
//! ```text
//! smartpark [--config FILE] [--agent | --map | --simulate N [--seed S]]
//! ```
//!
//! Without a mode flag the operator console reads `park`/`unpark` lines from
//! stdin. Logs go to stderr; stdout carries only program output.

mod agent_mode;
mod cli;
mod console;
mod traffic_sim;

use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;

use journal::JournalPlugin;
use lot::lot_actions::{ActionQueue, ActionResult, ActionResultLog, ActionSource, LotAction};
use lot::{LotParams, LotPlugin};

use cli::{CliOptions, RunMode};

fn main() {
    let options = match cli::parse_args(std::env::args().skip(1)) {
        Ok(options) => options,
        Err(err) => {
            eprintln!("smartpark: {err}");
            eprintln!("{}", cli::USAGE);
            std::process::exit(2);
        }
    };

    let params = match load_params(&options) {
        Ok(params) => params,
        Err(message) => {
            eprintln!("smartpark: {message}");
            std::process::exit(1);
        }
    };

    let mut app = build_app(params);
    match options.mode {
        RunMode::Console => console::run_console(&mut app),
        RunMode::Agent => agent_mode::run_agent_mode(&mut app),
        RunMode::Map => {
            let engine = app.world().resource::<lot::ParkingEngine>();
            println!("{}", lot::ascii_map::render_lot(engine));
        }
        RunMode::Simulate { steps, seed } => {
            let report = traffic_sim::run_simulation(&mut app, steps, seed);
            println!("{report}");
            let engine = app.world().resource::<lot::ParkingEngine>();
            println!("{}", lot::ascii_map::render_lot(engine));
        }
    }
}

fn load_params(options: &CliOptions) -> Result<LotParams, String> {
    match &options.config {
        Some(path) => LotParams::load(path).map_err(|e| format!("{path}: {e}")),
        None => Ok(LotParams::default()),
    }
}

/// Headless app with the allocator, the on-disk event log and stderr logging.
fn build_app(params: LotParams) -> App {
    let mut app = App::new();
    app.add_plugins(LogPlugin::default());
    install_lot(&mut app, params);
    app
}

fn install_lot(app: &mut App, params: LotParams) {
    app.add_plugins(MinimalPlugins);
    app.add_plugins(StatesPlugin);

    app.insert_resource(params);
    app.add_plugins(LotPlugin);
    app.add_plugins(JournalPlugin);

    // Run startup so every resource is in place before the first request.
    app.update();
}

/// Queue one action, run an update so the executor handles it, and return
/// its result.
fn submit(app: &mut App, source: ActionSource, action: LotAction) -> Option<ActionResult> {
    app.world_mut()
        .resource_mut::<ActionQueue>()
        .push(source, action);
    app.update();
    app.world()
        .get_resource::<ActionResultLog>()
        .and_then(|log| log.last_result().cloned())
}

/// Stock lot without logging, journaling to a per-test file under /tmp.
#[cfg(test)]
fn test_app(name: &str) -> App {
    let event_log = format!("/tmp/smartpark_app_test_{name}.txt");
    let _ = std::fs::remove_file(&event_log);
    let mut app = App::new();
    install_lot(
        &mut app,
        LotParams {
            event_log,
            ..LotParams::default()
        },
    );
    app
}
