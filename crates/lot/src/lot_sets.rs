//! Ordering of the lot systems within `Update`.
//!
//! ```text
//! Actions  →  Record
//! ```
//!
//! * **Actions** – Drain the action queue and apply every request to the
//!   engine. The only phase that mutates `ParkingEngine`.
//! * **Record** – Consumers of `LotEventRecorded` (the event log file,
//!   displays). Read-only with respect to the engine.

use bevy::prelude::*;

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum LotSet {
    Actions,
    Record,
}
