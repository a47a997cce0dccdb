// ---------------------------------------------------------------------------
// LotError: every recoverable failure of the parking engine
// ---------------------------------------------------------------------------

use std::fmt;

use crate::grid::{Coord, GateId};

/// Errors returned by park/unpark, the layout editor, and grid construction.
///
/// None of these are fatal: the caller decides whether to retry (e.g. park
/// from a different gate). The `Display` text for the reservation errors is
/// the message shown to drivers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LotError {
    /// The vehicle already holds a spot.
    AlreadyParked { vehicle: String },
    /// The gate id does not parse or is not registered on this lot.
    UnknownGate(String),
    /// No free parking spots exist at all.
    LotFull,
    /// Free spots exist but none can be reached from the requested gate.
    NoReachableSpot,
    /// Unpark target holds no spot.
    NotParked { vehicle: String },
    /// Coordinate lies outside the grid.
    OutOfBounds { coord: Coord, rows: usize, cols: usize },
    /// Gate cells can't be edited and no cell can be edited into a gate.
    InvalidEdit { coord: Coord },
    /// A search hit the node-expansion cap before finishing.
    SearchExhausted { expanded: usize },
    /// The vehicle's spot has no obstacle-free route to its exit gate.
    NoExitRoute { spot: Coord, gate: GateId },
    /// The cell holds a parked vehicle (editor) or is already in the ledger.
    SpotOccupied(Coord),
    /// Park/unpark requested while the layout editor is open.
    EditModeActive,
    /// Layout edit requested outside edit mode.
    NotEditing,
    /// Vehicle ids must contain at least one non-whitespace character.
    InvalidVehicleId,
    /// The grid dimensions, gates, or ASCII layout are unusable.
    InvalidLayout(String),
}

impl LotError {
    /// Stable snake_case identifier used on the agent wire protocol.
    pub fn code(&self) -> &'static str {
        match self {
            LotError::AlreadyParked { .. } => "already_parked",
            LotError::UnknownGate(_) => "unknown_gate",
            LotError::LotFull => "lot_full",
            LotError::NoReachableSpot => "no_reachable_spot",
            LotError::NotParked { .. } => "not_parked",
            LotError::OutOfBounds { .. } => "out_of_bounds",
            LotError::InvalidEdit { .. } => "invalid_edit",
            LotError::SearchExhausted { .. } => "search_exhausted",
            LotError::NoExitRoute { .. } => "no_exit_route",
            LotError::SpotOccupied(_) => "spot_occupied",
            LotError::EditModeActive => "edit_mode_active",
            LotError::NotEditing => "not_editing",
            LotError::InvalidVehicleId => "invalid_vehicle_id",
            LotError::InvalidLayout(_) => "invalid_layout",
        }
    }
}

impl fmt::Display for LotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LotError::AlreadyParked { .. } => write!(f, "Car already parked."),
            LotError::UnknownGate(_) => {
                write!(f, "Please enter a valid entry gate (A, B, C, D, etc.).")
            }
            LotError::LotFull => write!(f, "Parking area Full."),
            LotError::NoReachableSpot => write!(
                f,
                "No available parking spots, try entering from other gateways."
            ),
            LotError::NotParked { .. } => write!(f, "Car not found."),
            LotError::OutOfBounds { coord, rows, cols } => {
                write!(f, "Cell {coord} is outside the {rows}x{cols} grid.")
            }
            LotError::InvalidEdit { coord } => {
                write!(f, "Cell {coord} cannot be edited: gates are fixed.")
            }
            LotError::SearchExhausted { expanded } => write!(
                f,
                "Route search gave up after expanding {expanded} cells."
            ),
            LotError::NoExitRoute { spot, gate } => {
                write!(f, "No route from {spot} to exit gate {gate}.")
            }
            LotError::SpotOccupied(coord) => write!(f, "Cell {coord} is occupied."),
            LotError::EditModeActive => {
                write!(f, "Layout editing in progress, exit edit mode first.")
            }
            LotError::NotEditing => write!(f, "Enter edit mode before changing the layout."),
            LotError::InvalidVehicleId => write!(f, "Car number must not be empty."),
            LotError::InvalidLayout(msg) => write!(f, "Invalid layout: {msg}"),
        }
    }
}

impl std::error::Error for LotError {}
