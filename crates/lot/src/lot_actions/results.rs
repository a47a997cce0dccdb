use crate::allocation::{LayoutSummary, ParkOutcome, UnparkOutcome};
use crate::grid::{CellKind, Coord};
use crate::lot_error::LotError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionResult {
    Parked(ParkOutcome),
    Unparked(UnparkOutcome),
    /// A cell now holds `kind`.
    CellChanged { at: Coord, kind: CellKind },
    EditStarted,
    /// Editing finished and the parking-spot cache was rebuilt.
    LayoutApplied(LayoutSummary),
    Error(LotError),
}

impl ActionResult {
    pub fn is_success(&self) -> bool {
        !matches!(self, ActionResult::Error(_))
    }

    pub fn error(&self) -> Option<&LotError> {
        match self {
            ActionResult::Error(e) => Some(e),
            _ => None,
        }
    }
}
