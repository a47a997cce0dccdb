//! `--simulate`: seeded random arrivals and departures.
//!
//! Every request goes through the action queue like operator input, so the
//! journal and the event log see simulated traffic exactly as they would
//! see real traffic.

use std::fmt;

use bevy::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use lot::grid::GateId;
use lot::lot_actions::{ActionResult, ActionSource, LotAction};
use lot::ParkingEngine;

use crate::submit;

/// Probability that a step is an arrival while cars are parked.
const ARRIVAL_RATE: f64 = 0.6;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimReport {
    pub steps: usize,
    pub parked: usize,
    pub unparked: usize,
    pub rejected: usize,
    /// Cells walked across all successful routes.
    pub total_distance: usize,
}

impl fmt::Display for SimReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} steps: {} parked, {} unparked, {} rejected, {} cells travelled",
            self.steps, self.parked, self.unparked, self.rejected, self.total_distance
        )
    }
}

pub fn run_simulation(app: &mut App, steps: usize, seed: u64) -> SimReport {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut report = SimReport {
        steps,
        ..SimReport::default()
    };
    let mut next_vehicle = 1usize;

    for _ in 0..steps {
        let (gates, parked) = {
            let engine = app.world().resource::<ParkingEngine>();
            let gates: Vec<GateId> = engine.grid().gates().map(|(id, _)| id).collect();
            let parked: Vec<String> = engine
                .ledger()
                .iter()
                .map(|(_, vehicle)| vehicle.to_string())
                .collect();
            (gates, parked)
        };
        if gates.is_empty() {
            warn!("simulation stopped: lot has no gates");
            break;
        }

        let action = if parked.is_empty() || rng.gen_bool(ARRIVAL_RATE) {
            let gate = gates[rng.gen_range(0..gates.len())];
            let vehicle = format!("SIM{next_vehicle}");
            next_vehicle += 1;
            LotAction::Park {
                vehicle,
                gate: gate.to_string(),
            }
        } else {
            LotAction::Unpark {
                vehicle: parked[rng.gen_range(0..parked.len())].clone(),
            }
        };

        match submit(app, ActionSource::Simulation, action) {
            Some(ActionResult::Parked(p)) => {
                report.parked += 1;
                report.total_distance += p.distance;
            }
            Some(ActionResult::Unparked(u)) => {
                report.unparked += 1;
                report.total_distance += u.distance;
            }
            _ => report.rejected += 1,
        }
    }

    info!("simulation finished: {}", report);
    report
}
