use bevy::prelude::*;
use lot::config::DEFAULT_EVENT_LOG;
use lot::events::{EventRecorder, LotEventRecorded};
use lot::{LotParams, LotSet};

use crate::event_log::EventLogFile;

/// Appends every recorded lot event to the configured text log.
///
/// Add after `LotPlugin` so `LotParams::event_log` is already in the world.
/// An `EventLogFile` inserted beforehand takes precedence.
pub struct JournalPlugin;

impl Plugin for JournalPlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<EventLogFile>() {
            let path = app
                .world()
                .get_resource::<LotParams>()
                .map(|p| p.event_log.clone())
                .unwrap_or_else(|| DEFAULT_EVENT_LOG.to_string());
            info!("recording lot events to {}", path);
            app.insert_resource(EventLogFile::new(path));
        }
        app.add_systems(Update, append_recorded_events.in_set(LotSet::Record));
    }
}

pub fn append_recorded_events(
    mut events: EventReader<LotEventRecorded>,
    mut log: ResMut<EventLogFile>,
) {
    for LotEventRecorded(event) in events.read() {
        log.record(event);
    }
}
