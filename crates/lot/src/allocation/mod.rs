//! Spot allocation: park and unpark requests, the nearest-spot policy, the
//! exit-gate policy, and the layout-editing window.
//!
//! ## Park
//! Candidates are the free parking spots in row-major order. Spots outside
//! the gate's reachable region are skipped, A* runs for the rest, and the
//! first strictly shortest route wins.
//!
//! ## Unpark
//! The exit is the gate nearest the spot in a straight line (ties go to the
//! earlier letter). What happens when that gate can't be reached is chosen
//! by [`ExitRoutePolicy`].
//!
//! ## Editing
//! Park and unpark are refused between `begin_edit` and `end_edit`. Cell
//! edits only reach the allocator when `end_edit` rebuilds the parking-spot
//! cache.

pub mod engine;


pub use engine::ParkingEngine;

use serde::{Deserialize, Serialize};

use crate::grid::{Coord, GateId};

/// Behavior when the spot has no obstacle-free route to its exit gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitRoutePolicy {
    /// Refuse the unpark; the vehicle keeps its spot.
    #[default]
    Fail,
    /// Route straight through blocked and occupied cells.
    IgnoreObstacles,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParkOutcome {
    pub vehicle: String,
    pub spot: Coord,
    pub gate: GateId,
    pub path: Vec<Coord>,
    pub distance: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnparkOutcome {
    pub vehicle: String,
    pub spot: Coord,
    pub exit_gate: GateId,
    pub exit_coord: Coord,
    pub path: Vec<Coord>,
    pub distance: usize,
}

/// Returned by `end_edit` once the parking-spot cache is rebuilt.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LayoutSummary {
    pub parking_spots: usize,
    pub free_spots: usize,
    /// Free parking spots no gate can currently reach.
    pub unreachable_spots: Vec<Coord>,
}
