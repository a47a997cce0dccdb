//! Agent text protocol types for the `--agent` headless mode.
//!
//! Defines the JSON command/response envelope that external programs use to
//! drive the lot over newline-delimited JSON on stdin/stdout. The I/O loop
//! lives in `crates/app/src/agent_mode.rs`.

use serde::{Deserialize, Serialize};

use crate::allocation::{LayoutSummary, ParkOutcome, UnparkOutcome};
use crate::events::LotEvent;
use crate::grid::{CellKind, Coord};
use crate::lot_actions::{ActionResult, LotAction};
use crate::lot_error::LotError;
use crate::lot_observation::LotObservation;

// ---------------------------------------------------------------------------
// Commands (stdin → lot)
// ---------------------------------------------------------------------------

/// One line of stdin. The `cmd` field is the discriminator.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum AgentCommand {
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
    /// Request a [`LotObservation`].
    Observe,
    /// Request the ASCII map with the last route drawn in.
    Map,
    /// Request recent events, oldest first.
    Events {
        #[serde(default)]
        count: Option<usize>,
    },
    Quit,
}

impl AgentCommand {
    /// The queued action this command stands for, if it mutates the lot.
    pub fn to_action(&self) -> Option<LotAction> {
        match self {
            AgentCommand::Park { vehicle, gate } => Some(LotAction::Park {
                vehicle: vehicle.clone(),
                gate: gate.clone(),
            }),
            AgentCommand::Unpark { vehicle } => Some(LotAction::Unpark {
                vehicle: vehicle.clone(),
            }),
            AgentCommand::BeginEdit => Some(LotAction::BeginEdit),
            AgentCommand::SetCell { at, kind } => Some(LotAction::SetCell {
                at: *at,
                kind: *kind,
            }),
            AgentCommand::CycleCell { at } => Some(LotAction::CycleCell { at: *at }),
            AgentCommand::EndEdit => Some(LotAction::EndEdit),
            AgentCommand::Observe
            | AgentCommand::Map
            | AgentCommand::Events { .. }
            | AgentCommand::Quit => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Responses (lot → stdout)
// ---------------------------------------------------------------------------

/// Every response includes the protocol version and a tagged payload.
#[derive(Debug, Serialize)]
pub struct AgentResponse {
    pub protocol_version: u32,
    #[serde(flatten)]
    pub payload: ResponsePayload,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponsePayload {
    Ready,
    Parked(ParkOutcome),
    Unparked(UnparkOutcome),
    /// A cell edit was applied.
    Cell {
        at: Coord,
        kind: CellKind,
    },
    /// Editing ended; the new layout is live.
    Layout(LayoutSummary),
    Ok,
    Observation {
        observation: LotObservation,
    },
    Map {
        map: String,
    },
    Events {
        events: Vec<LotEvent>,
    },
    /// `code` is the stable [`LotError::code`], or `parse_error` for
    /// malformed input.
    Error {
        code: String,
        message: String,
    },
    Goodbye,
}

impl ResponsePayload {
    pub fn from_error(err: &LotError) -> Self {
        ResponsePayload::Error {
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }

    pub fn parse_error(message: impl Into<String>) -> Self {
        ResponsePayload::Error {
            code: "parse_error".to_string(),
            message: message.into(),
        }
    }
}

impl From<ActionResult> for ResponsePayload {
    fn from(result: ActionResult) -> Self {
        match result {
            ActionResult::Parked(outcome) => ResponsePayload::Parked(outcome),
            ActionResult::Unparked(outcome) => ResponsePayload::Unparked(outcome),
            ActionResult::CellChanged { at, kind } => ResponsePayload::Cell { at, kind },
            ActionResult::EditStarted => ResponsePayload::Ok,
            ActionResult::LayoutApplied(summary) => ResponsePayload::Layout(summary),
            ActionResult::Error(err) => ResponsePayload::from_error(&err),
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Current protocol version. Bump when the command/response schema changes.
pub const PROTOCOL_VERSION: u32 = 1;

pub fn make_response(payload: ResponsePayload) -> AgentResponse {
    AgentResponse {
        protocol_version: PROTOCOL_VERSION,
        payload,
    }
}
