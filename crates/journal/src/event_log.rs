//! Append-only text log, one line per event.
//!
//! ```text
//! CAR1, [(0, 0), (1, 0), (1, 1)], (1, 1), Distance: 3 units
//! CAR1 unparked from (1, 1) to exit at (0, 0), Path: [(1, 1), (1, 0), (0, 0)], Total Distance: 3 units
//! ```

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use bevy::prelude::*;
use lot::events::{EventRecorder, LotEvent, LotEventKind};
use lot::grid::Coord;

use crate::journal_error::JournalError;

/// `[(r, c), (r, c), ...]`
pub fn format_path(path: &[Coord]) -> String {
    let cells: Vec<String> = path.iter().map(Coord::to_string).collect();
    format!("[{}]", cells.join(", "))
}

pub fn format_event(event: &LotEvent) -> String {
    match event.kind {
        LotEventKind::Park => format!(
            "{}, {}, {}, Distance: {} units",
            event.vehicle,
            format_path(&event.path),
            event.spot,
            event.distance
        ),
        LotEventKind::Unpark => format!(
            "{} unparked from {} to exit at {}, Path: {}, Total Distance: {} units",
            event.vehicle,
            event.spot,
            event.gate_coord,
            format_path(&event.path),
            event.distance
        ),
    }
}

/// The log file. Opened per append so external rotation or deletion
/// between events is harmless.
#[derive(Resource, Debug, Clone)]
pub struct EventLogFile {
    path: PathBuf,
    written: u64,
}

impl EventLogFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            written: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Lines appended through this handle.
    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn append(&mut self, event: &LotEvent) -> Result<(), JournalError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", format_event(event))?;
        self.written += 1;
        Ok(())
    }
}

impl EventRecorder for EventLogFile {
    fn record(&mut self, event: &LotEvent) {
        if let Err(err) = self.append(event) {
            error!(
                "failed to append event {} to {}: {}",
                event.sequence,
                self.path.display(),
                err
            );
        }
    }
}
