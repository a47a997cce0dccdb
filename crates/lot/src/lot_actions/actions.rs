use serde::{Deserialize, Serialize};

use crate::grid::{CellKind, Coord};

/// One request against the lot. Gate and vehicle ids are kept as the caller
/// typed them; the engine normalizes and validates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum LotAction {
    Park {
        vehicle: String,
        gate: String,
    },
    Unpark {
        vehicle: String,
    },
    BeginEdit,
    SetCell {
        at: Coord,
        kind: CellKind,
    },
    CycleCell {
        at: Coord,
    },
    EndEdit,
}
