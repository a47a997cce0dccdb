//! Durable record of park and unpark events.
//!
//! [`EventLogFile`] appends one human-readable line per event to a text
//! file. [`JournalPlugin`] wires it to the `LotEventRecorded` stream so every
//! event the engine records ends up on disk.

mod event_log;
mod journal_error;
mod journal_plugin;

pub use event_log::{format_event, format_path, EventLogFile};
pub use journal_error::JournalError;
pub use journal_plugin::{append_recorded_events, JournalPlugin};
