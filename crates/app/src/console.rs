//! Operator console: one request per stdin line.
//!
//! ```text
//! park CAR1 A
//! unpark CAR1
//! map
//! quit
//! ```

use std::io::BufRead;

use bevy::prelude::*;

use journal::format_path;
use lot::ascii_map::render_lot;
use lot::lot_actions::{ActionResult, ActionSource, LotAction};
use lot::ParkingEngine;

use crate::submit;

#[derive(Debug, Clone, PartialEq, Eq)]
enum ConsoleCommand {
    Act(LotAction),
    Map,
    Help,
    Quit,
}

const HELP: &str = "commands: park <vehicle> <gate> | unpark <vehicle> | map | help | quit";

pub fn run_console(app: &mut App) {
    println!("{}", render_lot(app.world().resource::<ParkingEngine>()));
    println!("{HELP}");

    for line in std::io::stdin().lock().lines() {
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

        match parse_line(&line) {
            Ok(ConsoleCommand::Act(action)) => {
                if let Some(result) = submit(app, ActionSource::Operator, action) {
                    println!("{}", describe(&result));
                }
            }
            Ok(ConsoleCommand::Map) => {
                println!("{}", render_lot(app.world().resource::<ParkingEngine>()));
            }
            Ok(ConsoleCommand::Help) => println!("{HELP}"),
            Ok(ConsoleCommand::Quit) => break,
            Err(message) => println!("{message}"),
        }
    }
}

fn parse_line(line: &str) -> Result<ConsoleCommand, String> {
    let words: Vec<&str> = line.split_whitespace().collect();
    match words.as_slice() {
        ["park", vehicle, gate] => Ok(ConsoleCommand::Act(LotAction::Park {
            vehicle: vehicle.to_string(),
            gate: gate.to_string(),
        })),
        ["unpark", vehicle] => Ok(ConsoleCommand::Act(LotAction::Unpark {
            vehicle: vehicle.to_string(),
        })),
        ["map"] => Ok(ConsoleCommand::Map),
        ["help"] => Ok(ConsoleCommand::Help),
        ["quit"] | ["exit"] => Ok(ConsoleCommand::Quit),
        _ => Err(format!("unrecognized input '{}'; {HELP}", line.trim())),
    }
}

/// The operator-facing line for a result.
fn describe(result: &ActionResult) -> String {
    match result {
        ActionResult::Parked(p) => format!(
            "Car {} parked at {}. Distance: {} units.",
            p.vehicle, p.spot, p.distance
        ),
        ActionResult::Unparked(u) => format!(
            "Car {} has been unparked from {} to exit at {}. Path: {}. Total Distance: {} units.",
            u.vehicle,
            u.spot,
            u.exit_gate,
            format_path(&u.path),
            u.distance
        ),
        ActionResult::Error(err) => err.to_string(),
        other => format!("{other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_app;

    #[test]
    fn test_parse_line() {
        assert_eq!(
            parse_line("  park CAR7 b "),
            Ok(ConsoleCommand::Act(LotAction::Park {
                vehicle: "CAR7".into(),
                gate: "b".into(),
            }))
        );
        assert_eq!(
            parse_line("unpark CAR7"),
            Ok(ConsoleCommand::Act(LotAction::Unpark {
                vehicle: "CAR7".into(),
            }))
        );
        assert_eq!(parse_line("map"), Ok(ConsoleCommand::Map));
        assert_eq!(parse_line("help"), Ok(ConsoleCommand::Help));
        assert_eq!(parse_line("exit"), Ok(ConsoleCommand::Quit));
        assert!(parse_line("park CAR7").is_err());
    }

    #[test]
    fn test_describe_results() {
        let mut app = test_app("console_describe");
        let parked = submit(
            &mut app,
            ActionSource::Operator,
            LotAction::Park {
                vehicle: "CAR1".into(),
                gate: "A".into(),
            },
        )
        .unwrap();
        assert_eq!(
            describe(&parked),
            "Car CAR1 parked at (0, 1). Distance: 2 units."
        );

        let again = submit(
            &mut app,
            ActionSource::Operator,
            LotAction::Park {
                vehicle: "CAR1".into(),
                gate: "B".into(),
            },
        )
        .unwrap();
        assert_eq!(describe(&again), "Car already parked.");

        let left = submit(
            &mut app,
            ActionSource::Operator,
            LotAction::Unpark {
                vehicle: "CAR1".into(),
            },
        )
        .unwrap();
        assert_eq!(
            describe(&left),
            "Car CAR1 has been unparked from (0, 1) to exit at A. \
             Path: [(0, 1), (0, 0)]. Total Distance: 2 units."
        );
    }
}
