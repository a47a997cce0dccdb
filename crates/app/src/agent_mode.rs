//! Headless `--agent` mode: a blocking synchronous loop that reads JSON
//! commands from stdin and writes JSON responses to stdout.
//!
//! ## Protocol
//!
//! Each line of stdin is a JSON object with a `"cmd"` discriminator.
//! Each line of stdout is a JSON response with `"protocol_version"` and
//! `"type"` fields. See [`lot::agent_protocol`] for the full schema.

use std::io::{BufRead, Write};

use bevy::prelude::*;

use lot::agent_protocol::{
    make_response, AgentCommand, AgentResponse, ResponsePayload, PROTOCOL_VERSION,
};
use lot::ascii_map::render_lot;
use lot::lot_actions::ActionSource;
use lot::lot_observation::LotObservation;
use lot::{EventJournal, ParkingEngine};

use crate::submit;

pub fn run_agent_mode(app: &mut App) {
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut stdout = stdout.lock();

    // Send the "ready" message so the external program knows we are live.
    write_response(&mut stdout, &make_response(ResponsePayload::Ready));

    // stderr, so it does not interfere with the JSON protocol on stdout.
    eprintln!("smartpark agent mode v{PROTOCOL_VERSION} ready, waiting for commands on stdin");

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                eprintln!("stdin read error: {e}");
                break;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<AgentCommand>(&line) {
            Ok(cmd) => process_command(cmd, app),
            Err(e) => make_response(ResponsePayload::parse_error(format!("Parse error: {e}"))),
        };
        let is_goodbye = matches!(response.payload, ResponsePayload::Goodbye);
        write_response(&mut stdout, &response);

        if is_goodbye {
            break;
        }
    }

    eprintln!("smartpark agent mode shutting down");
}

fn write_response(out: &mut impl Write, response: &AgentResponse) {
    match serde_json::to_string(response) {
        Ok(json) => {
            let _ = writeln!(out, "{json}");
            let _ = out.flush();
        }
        Err(e) => error!("failed to serialize agent response: {e}"),
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

fn process_command(cmd: AgentCommand, app: &mut App) -> AgentResponse {
    if let Some(action) = cmd.to_action() {
        let payload = match submit(app, ActionSource::Agent, action) {
            Some(result) => ResponsePayload::from(result),
            None => ResponsePayload::Ok,
        };
        return make_response(payload);
    }

    match cmd {
        AgentCommand::Observe => {
            let engine = app.world().resource::<ParkingEngine>();
            make_response(ResponsePayload::Observation {
                observation: LotObservation::from_engine(engine),
            })
        }
        AgentCommand::Map => {
            let engine = app.world().resource::<ParkingEngine>();
            make_response(ResponsePayload::Map {
                map: render_lot(engine),
            })
        }
        AgentCommand::Events { count } => {
            let journal = app.world().resource::<EventJournal>();
            let events = journal.last_n(count.unwrap_or(journal.len()));
            make_response(ResponsePayload::Events { events })
        }
        AgentCommand::Quit => make_response(ResponsePayload::Goodbye),
        // Mutating commands were handled through the action queue above.
        _ => make_response(ResponsePayload::Ok),
    }
}
