//! ASCII map rendering for the lot.
//!
//! One character per cell, with column/row headers and a legend. Maps are
//! built on demand from the engine; nothing here runs per frame.

use std::collections::HashSet;

use crate::allocation::ParkingEngine;
use crate::grid::{CellKind, Coord, LotGrid};
use crate::occupancy::OccupancyLedger;

// -----------------------------------------------------------------------
// Character encoding
// -----------------------------------------------------------------------

/// Priority: Gate > Occupied > Path > layout symbol.
pub fn cell_to_char(kind: CellKind, occupied: bool, on_path: bool) -> char {
    if let CellKind::Gate(id) = kind {
        return id.letter();
    }
    if occupied {
        return '@';
    }
    if on_path {
        return '*';
    }
    kind.symbol()
}

// -----------------------------------------------------------------------
// Map
// -----------------------------------------------------------------------

/// Render the grid with `path` drawn over it.
pub fn render_grid(grid: &LotGrid, ledger: &OccupancyLedger, path: &[Coord]) -> String {
    let on_path: HashSet<Coord> = path.iter().copied().collect();
    let mut lines: Vec<String> = Vec::with_capacity(grid.rows() + 6);

    // Column header: last digit of each column index.
    let mut header = String::from("     ");
    for c in 0..grid.cols() {
        header.push(char::from(b'0' + (c % 10) as u8));
    }
    lines.push(header);

    for r in 0..grid.rows() {
        let mut line = format!("{r:>3} |");
        for c in 0..grid.cols() {
            let coord = Coord(r, c);
            let kind = grid.cell_kind(coord).unwrap_or_default();
            line.push(cell_to_char(
                kind,
                ledger.is_occupied(coord),
                on_path.contains(&coord),
            ));
        }
        lines.push(line);
    }

    lines.push(String::new());
    append_legend(&mut lines);
    lines.join("\n")
}

/// Current lot with the most recent route overlaid.
pub fn render_lot(engine: &ParkingEngine) -> String {
    render_grid(engine.grid(), engine.ledger(), engine.last_path())
}

fn append_legend(lines: &mut Vec<String>) {
    lines.push("Legend: . free  P spot  @ parked  X blocked  * route  A-Z gate".to_string());
}
