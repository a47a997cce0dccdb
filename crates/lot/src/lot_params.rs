//! Data-driven lot configuration.
//!
//! [`LotParams`] gathers everything that differs between deployments (grid
//! size, gate placement, the initial layout, search tuning, the event log
//! path) into one resource. The defaults reproduce the stock 8x8 lot with a
//! gate in every corner and every other cell a parking spot.

use std::fmt;
use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::allocation::{ExitRoutePolicy, ParkingEngine};
use crate::config::{
    DEFAULT_COLS, DEFAULT_EVENT_LOG, DEFAULT_JOURNAL_CAPACITY, DEFAULT_MAX_EXPANSIONS,
    DEFAULT_ROWS,
};
use crate::grid::{Coord, GateId, LotGrid};
use crate::lot_error::LotError;
use crate::pathfinding_sys::{Heuristic, ObstacleMode, SearchParams};

// ---------------------------------------------------------------------------
// ParamsError
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum ParamsError {
    /// The config file could not be read.
    Io(std::io::Error),
    /// The config file is not valid JSON for [`LotParams`].
    Parse(serde_json::Error),
    /// The parameters describe an impossible lot.
    Layout(LotError),
}

impl fmt::Display for ParamsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamsError::Io(e) => write!(f, "I/O error: {e}"),
            ParamsError::Parse(e) => write!(f, "Config parse error: {e}"),
            ParamsError::Layout(e) => write!(f, "Config rejected: {e}"),
        }
    }
}

impl std::error::Error for ParamsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParamsError::Io(e) => Some(e),
            ParamsError::Parse(e) => Some(e),
            ParamsError::Layout(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ParamsError {
    fn from(e: std::io::Error) -> Self {
        ParamsError::Io(e)
    }
}

impl From<serde_json::Error> for ParamsError {
    fn from(e: serde_json::Error) -> Self {
        ParamsError::Parse(e)
    }
}

impl From<LotError> for ParamsError {
    fn from(e: LotError) -> Self {
        ParamsError::Layout(e)
    }
}

// ---------------------------------------------------------------------------
// LotParams
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateSpec {
    pub id: GateId,
    pub at: Coord,
}

#[derive(Resource, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LotParams {
    pub rows: usize,
    pub cols: usize,
    /// Gate placement. `None` puts A-D in the four corners.
    pub gates: Option<Vec<GateSpec>>,
    /// ASCII layout rows. When present it defines the size, the gates and
    /// every cell, and `rows`/`cols`/`gates` are ignored.
    pub layout: Option<Vec<String>>,
    pub heuristic: Heuristic,
    pub max_expansions: usize,
    pub exit_policy: ExitRoutePolicy,
    /// Append-only text log of park/unpark events.
    pub event_log: String,
    /// Recent events kept in memory.
    pub journal_capacity: usize,
}

impl Default for LotParams {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            gates: None,
            layout: None,
            heuristic: Heuristic::Euclidean,
            max_expansions: DEFAULT_MAX_EXPANSIONS,
            exit_policy: ExitRoutePolicy::Fail,
            event_log: DEFAULT_EVENT_LOG.to_string(),
            journal_capacity: DEFAULT_JOURNAL_CAPACITY,
        }
    }
}

impl LotParams {
    pub fn from_json(json: &str) -> Result<Self, ParamsError> {
        let params: LotParams = serde_json::from_str(json)?;
        params.build_grid()?;
        Ok(params)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ParamsError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn build_grid(&self) -> Result<LotGrid, LotError> {
        if let Some(layout) = &self.layout {
            return LotGrid::from_rows(layout);
        }
        let gates: Vec<(GateId, Coord)> = match &self.gates {
            Some(specs) => specs.iter().map(|g| (g.id, g.at)).collect(),
            None => LotGrid::default_gates(self.rows, self.cols),
        };
        LotGrid::with_parking_fill(self.rows, self.cols, &gates)
    }

    pub fn search_params(&self) -> SearchParams {
        SearchParams {
            heuristic: self.heuristic,
            max_expansions: self.max_expansions,
            obstacles: ObstacleMode::Respect,
        }
    }

    pub fn build_engine(&self) -> Result<ParkingEngine, LotError> {
        Ok(ParkingEngine::new(self.build_grid()?)
            .with_search(self.search_params())
            .with_exit_policy(self.exit_policy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::CellKind;

    #[test]
    fn test_defaults_build_stock_lot() {
        let params = LotParams::default();
        let grid = params.build_grid().unwrap();
        assert_eq!(grid, LotGrid::default());
        assert_eq!(params.event_log, "car_data_astar.txt");
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let params = LotParams::from_json(r#"{"rows": 10, "heuristic": "manhattan"}"#).unwrap();
        assert_eq!(params.rows, 10);
        assert_eq!(params.cols, DEFAULT_COLS);
        assert_eq!(params.heuristic, Heuristic::Manhattan);
        let grid = params.build_grid().unwrap();
        assert_eq!(grid.gate(GateId::try_from('C').unwrap()), Some(Coord(9, 0)));
    }

    #[test]
    fn test_explicit_gates() {
        let json = r#"{"rows": 5, "cols": 6, "gates": [{"id": "A", "at": [0, 3]}, {"id": "B", "at": [4, 3]}]}"#;
        let grid = LotParams::from_json(json).unwrap().build_grid().unwrap();
        assert_eq!(grid.gate_count(), 2);
        assert_eq!(grid.cell_kind(Coord(0, 0)), Ok(CellKind::Parking));
        assert_eq!(grid.parking_spots().len(), 28);
    }

    #[test]
    fn test_layout_overrides_size() {
        let json = r#"{"rows": 20, "layout": ["A..P", "XX.P", "....", "P..B"]}"#;
        let params = LotParams::from_json(json).unwrap();
        let grid = params.build_grid().unwrap();
        assert_eq!((grid.rows(), grid.cols()), (4, 4));
        assert_eq!(grid.parking_spots().len(), 3);
        assert_eq!(grid.cell_kind(Coord(1, 0)), Ok(CellKind::Blocked));
    }

    #[test]
    fn test_rejects_bad_config() {
        assert!(matches!(
            LotParams::from_json("{not json"),
            Err(ParamsError::Parse(_))
        ));
        assert!(matches!(
            LotParams::from_json(r#"{"rows": 2}"#),
            Err(ParamsError::Layout(LotError::InvalidLayout(_)))
        ));
        assert!(matches!(
            LotParams::from_json(r#"{"gates": [{"id": "a", "at": [0, 0]}]}"#),
            Err(ParamsError::Parse(_))
        ));
        assert!(matches!(
            LotParams::from_json(r#"{"rows": 8589934592, "cols": 8589934592}"#),
            Err(ParamsError::Layout(LotError::InvalidLayout(_)))
        ));
        assert!(matches!(
            LotParams::load("/nonexistent/smartpark.json"),
            Err(ParamsError::Io(_))
        ));
    }

    #[test]
    fn test_build_engine_applies_tuning() {
        let params = LotParams {
            heuristic: Heuristic::Manhattan,
            max_expansions: 42,
            exit_policy: ExitRoutePolicy::IgnoreObstacles,
            ..LotParams::default()
        };
        let engine = params.build_engine().unwrap();
        assert_eq!(engine.search_params().heuristic, Heuristic::Manhattan);
        assert_eq!(engine.search_params().max_expansions, 42);
        assert_eq!(engine.exit_policy(), ExitRoutePolicy::IgnoreObstacles);
    }
}
