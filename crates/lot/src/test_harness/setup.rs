//! Builder methods that put the lot into a known state before a test.

use crate::grid::{CellKind, Coord};
use crate::lot_actions::{ActionResult, LotAction};

use super::TestLot;

impl TestLot {
    /// Park `vehicle` from `gate`, panicking if the engine refuses.
    pub fn with_parked(mut self, vehicle: &str, gate: &str) -> Self {
        let result = self.park(vehicle, gate);
        assert!(
            matches!(result, ActionResult::Parked(_)),
            "setup park of {vehicle} from {gate} failed: {result:?}"
        );
        self
    }

    /// Apply a batch of cell edits inside one begin/end edit window.
    pub fn with_cells(mut self, cells: &[(Coord, CellKind)]) -> Self {
        self.act(LotAction::BeginEdit);
        for &(at, kind) in cells {
            let result = self.act(LotAction::SetCell { at, kind });
            assert!(result.is_success(), "setup edit at {at} failed: {result:?}");
        }
        let result = self.act(LotAction::EndEdit);
        assert!(result.is_success(), "setup end_edit failed: {result:?}");
        // Let the mode transition settle.
        self.update();
        self
    }
}
