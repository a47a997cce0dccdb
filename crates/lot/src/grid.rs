use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_COLS, DEFAULT_ROWS, MAX_GATES, MAX_GRID_CELLS, MIN_GRID_SIZE};
use crate::lot_error::LotError;

/// Grid cell address as `(row, col)`. Orders row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord(pub usize, pub usize);

impl Coord {
    #[inline]
    pub fn row(self) -> usize {
        self.0
    }

    #[inline]
    pub fn col(self) -> usize {
        self.1
    }

    /// Straight-line distance between two cells.
    pub fn euclidean(self, other: Coord) -> f64 {
        let dr = self.0 as f64 - other.0 as f64;
        let dc = self.1 as f64 - other.1 as f64;
        (dr * dr + dc * dc).sqrt()
    }

    pub fn manhattan(self, other: Coord) -> usize {
        self.0.abs_diff(other.0) + self.1.abs_diff(other.1)
    }

    pub fn is_adjacent(self, other: Coord) -> bool {
        self.manhattan(other) == 1
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.0, self.1)
    }
}

/// Gate identifier: one uppercase letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "char", into = "char")]
pub struct GateId(char);

impl GateId {
    /// Parse caller input. Surrounding whitespace and case are ignored.
    pub fn parse(input: &str) -> Result<Self, LotError> {
        let trimmed = input.trim();
        let mut chars = trimmed.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => GateId::try_from(ch.to_ascii_uppercase())
                .map_err(|_| LotError::UnknownGate(input.to_string())),
            _ => Err(LotError::UnknownGate(input.to_string())),
        }
    }

    /// The `n`th gate letter (`0 -> A`). `None` past `Z`.
    pub fn nth(n: usize) -> Option<Self> {
        if n < MAX_GATES {
            Some(GateId((b'A' + n as u8) as char))
        } else {
            None
        }
    }

    pub fn letter(self) -> char {
        self.0
    }
}

impl TryFrom<char> for GateId {
    type Error = String;

    fn try_from(ch: char) -> Result<Self, Self::Error> {
        if ch.is_ascii_uppercase() {
            Ok(GateId(ch))
        } else {
            Err(format!("gate id must be a letter A-Z, got {ch:?}"))
        }
    }
}

impl From<GateId> for char {
    fn from(id: GateId) -> char {
        id.0
    }
}

impl fmt::Display for GateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CellKind {
    #[default]
    Free,
    Parking,
    Blocked,
    Gate(GateId),
}

impl CellKind {
    /// Editor click rotation: Free -> Parking -> Blocked -> Free.
    /// Gates never rotate.
    pub fn next_in_rotation(self) -> Option<CellKind> {
        match self {
            CellKind::Free => Some(CellKind::Parking),
            CellKind::Parking => Some(CellKind::Blocked),
            CellKind::Blocked => Some(CellKind::Free),
            CellKind::Gate(_) => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            CellKind::Free => '.',
            CellKind::Parking => 'P',
            CellKind::Blocked => 'X',
            CellKind::Gate(id) => id.letter(),
        }
    }

    pub fn from_symbol(ch: char) -> Option<CellKind> {
        match ch {
            '.' | ' ' => Some(CellKind::Free),
            'P' => Some(CellKind::Parking),
            'X' => Some(CellKind::Blocked),
            _ => GateId::try_from(ch).ok().map(CellKind::Gate),
        }
    }

    pub fn is_gate(self) -> bool {
        matches!(self, CellKind::Gate(_))
    }
}

/// The static lot layout.
///
/// `parking_spots` is a cache over `cells`. Editing a cell does NOT refresh
/// it; callers batch their edits and then call
/// [`LotGrid::recompute_parking_spots`] before the next allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LotGrid {
    cells: Vec<CellKind>,
    rows: usize,
    cols: usize,
    gates: BTreeMap<GateId, Coord>,
    parking_spots: BTreeSet<Coord>,
}

impl LotGrid {
    /// All non-gate cells start out Free.
    pub fn new(rows: usize, cols: usize, gates: &[(GateId, Coord)]) -> Result<Self, LotError> {
        if rows < MIN_GRID_SIZE || cols < MIN_GRID_SIZE {
            return Err(LotError::InvalidLayout(format!(
                "grid must be at least {MIN_GRID_SIZE}x{MIN_GRID_SIZE}, got {rows}x{cols}"
            )));
        }
        match rows.checked_mul(cols) {
            Some(cells) if cells <= MAX_GRID_CELLS => {}
            _ => {
                return Err(LotError::InvalidLayout(format!(
                    "grid {rows}x{cols} exceeds {MAX_GRID_CELLS} cells"
                )))
            }
        }
        if gates.is_empty() {
            return Err(LotError::InvalidLayout(
                "at least one gate is required".to_string(),
            ));
        }

        let mut grid = Self::blank(rows, cols);
        for &(id, coord) in gates {
            let idx = grid.checked_index(coord)?;
            if grid.gates.contains_key(&id) {
                return Err(LotError::InvalidLayout(format!("gate {id} declared twice")));
            }
            if let CellKind::Gate(other) = grid.cells[idx] {
                return Err(LotError::InvalidLayout(format!(
                    "gates {other} and {id} share cell {coord}"
                )));
            }
            grid.place_gate(id, coord);
        }
        grid.recompute_parking_spots();
        Ok(grid)
    }

    /// Every non-gate cell becomes a parking spot.
    pub fn with_parking_fill(
        rows: usize,
        cols: usize,
        gates: &[(GateId, Coord)],
    ) -> Result<Self, LotError> {
        let mut grid = Self::new(rows, cols, gates)?;
        grid.fill_parking();
        Ok(grid)
    }

    /// Build from ASCII rows: `.` free, `P` parking, `X` blocked, any other
    /// uppercase letter is a gate.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, LotError> {
        let height = rows.len();
        let width = rows.first().map(|r| r.as_ref().chars().count()).unwrap_or(0);

        let mut kinds = Vec::with_capacity(height * width);
        let mut gates = Vec::new();
        for (r, line) in rows.iter().enumerate() {
            let line = line.as_ref();
            if line.chars().count() != width {
                return Err(LotError::InvalidLayout(format!(
                    "row {r} has {} cells, expected {width}",
                    line.chars().count()
                )));
            }
            for (c, ch) in line.chars().enumerate() {
                let kind = CellKind::from_symbol(ch).ok_or_else(|| {
                    LotError::InvalidLayout(format!(
                        "unknown cell symbol {ch:?} at {}",
                        Coord(r, c)
                    ))
                })?;
                if let CellKind::Gate(id) = kind {
                    gates.push((id, Coord(r, c)));
                }
                kinds.push(kind);
            }
        }

        let mut grid = Self::new(height, width, &gates)?;
        for (cell, kind) in grid.cells.iter_mut().zip(kinds) {
            if !kind.is_gate() {
                *cell = kind;
            }
        }
        grid.recompute_parking_spots();
        Ok(grid)
    }

    /// Corner gates: A top-left, B top-right, C bottom-left, D bottom-right.
    pub fn default_gates(rows: usize, cols: usize) -> Vec<(GateId, Coord)> {
        let last_row = rows.saturating_sub(1);
        let last_col = cols.saturating_sub(1);
        [
            Coord(0, 0),
            Coord(0, last_col),
            Coord(last_row, 0),
            Coord(last_row, last_col),
        ]
        .into_iter()
        .enumerate()
        .filter_map(|(i, coord)| GateId::nth(i).map(|id| (id, coord)))
        .collect()
    }

    fn blank(rows: usize, cols: usize) -> Self {
        Self {
            cells: vec![CellKind::Free; rows * cols],
            rows,
            cols,
            gates: BTreeMap::new(),
            parking_spots: BTreeSet::new(),
        }
    }

    fn place_gate(&mut self, id: GateId, coord: Coord) {
        let idx = self.index(coord);
        self.cells[idx] = CellKind::Gate(id);
        self.gates.insert(id, coord);
    }

    fn fill_parking(&mut self) {
        for cell in self.cells.iter_mut() {
            if *cell == CellKind::Free {
                *cell = CellKind::Parking;
            }
        }
        self.recompute_parking_spots();
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    fn index(&self, coord: Coord) -> usize {
        coord.0 * self.cols + coord.1
    }

    #[inline]
    pub fn in_bounds(&self, coord: Coord) -> bool {
        coord.0 < self.rows && coord.1 < self.cols
    }

    fn checked_index(&self, coord: Coord) -> Result<usize, LotError> {
        if self.in_bounds(coord) {
            Ok(self.index(coord))
        } else {
            Err(LotError::OutOfBounds {
                coord,
                rows: self.rows,
                cols: self.cols,
            })
        }
    }

    pub fn cell_kind(&self, coord: Coord) -> Result<CellKind, LotError> {
        self.checked_index(coord).map(|idx| self.cells[idx])
    }

    /// Overwrite one cell. Gates are fixed: a gate cell can't be changed and
    /// no cell can become a gate.
    pub fn set_cell(&mut self, coord: Coord, kind: CellKind) -> Result<(), LotError> {
        let idx = self.checked_index(coord)?;
        if self.cells[idx].is_gate() || kind.is_gate() {
            return Err(LotError::InvalidEdit { coord });
        }
        self.cells[idx] = kind;
        Ok(())
    }

    /// Advance a cell one step through the editor rotation and return the
    /// new kind.
    pub fn cycle_cell(&mut self, coord: Coord) -> Result<CellKind, LotError> {
        let idx = self.checked_index(coord)?;
        let next = self.cells[idx]
            .next_in_rotation()
            .ok_or(LotError::InvalidEdit { coord })?;
        self.cells[idx] = next;
        Ok(next)
    }

    /// Cached set of Parking cells, row-major.
    pub fn parking_spots(&self) -> &BTreeSet<Coord> {
        &self.parking_spots
    }

    pub fn recompute_parking_spots(&mut self) {
        let cols = self.cols;
        self.parking_spots = self
            .cells
            .iter()
            .enumerate()
            .filter(|(_, kind)| **kind == CellKind::Parking)
            .map(|(idx, _)| Coord(idx / cols, idx % cols))
            .collect();
    }

    pub fn gate(&self, id: GateId) -> Option<Coord> {
        self.gates.get(&id).copied()
    }

    /// Gates in letter order.
    pub fn gates(&self) -> impl Iterator<Item = (GateId, Coord)> + '_ {
        self.gates.iter().map(|(id, coord)| (*id, *coord))
    }

    /// The gate placed on `coord`, if any.
    pub fn gate_at(&self, coord: Coord) -> Option<GateId> {
        match self.cell_kind(coord) {
            Ok(CellKind::Gate(id)) => Some(id),
            _ => None,
        }
    }

    pub fn gate_count(&self) -> usize {
        self.gates.len()
    }

    /// In bounds and not Blocked. Occupancy is layered on top by the search.
    #[inline]
    pub fn is_traversable(&self, coord: Coord) -> bool {
        self.in_bounds(coord) && self.cells[self.index(coord)] != CellKind::Blocked
    }

    /// Returns up to 4 orthogonal neighbors in the order up, down, left,
    /// right, plus the count of valid entries. Use `&result[..count]`.
    pub fn neighbors4(&self, coord: Coord) -> ([Coord; 4], usize) {
        let Coord(r, c) = coord;
        let mut result = [Coord(0, 0); 4];
        let mut count = 0;
        if r > 0 {
            result[count] = Coord(r - 1, c);
            count += 1;
        }
        if r + 1 < self.rows {
            result[count] = Coord(r + 1, c);
            count += 1;
        }
        if c > 0 {
            result[count] = Coord(r, c - 1);
            count += 1;
        }
        if c + 1 < self.cols {
            result[count] = Coord(r, c + 1);
            count += 1;
        }
        (result, count)
    }

    /// One row as layout symbols, e.g. `"A..PP..B"`.
    pub fn row_symbols(&self, row: usize) -> String {
        let start = row * self.cols;
        self.cells[start..start + self.cols]
            .iter()
            .map(|kind| kind.symbol())
            .collect()
    }
}

impl Default for LotGrid {
    /// The stock lot: 8x8, corner gates, every other cell a parking spot.
    fn default() -> Self {
        let mut grid = Self::blank(DEFAULT_ROWS, DEFAULT_COLS);
        for (id, coord) in Self::default_gates(DEFAULT_ROWS, DEFAULT_COLS) {
            grid.place_gate(id, coord);
        }
        grid.fill_parking();
        grid
    }
}
