use std::collections::BTreeSet;

use bevy::prelude::*;

use super::{ExitRoutePolicy, LayoutSummary, ParkOutcome, UnparkOutcome};
use crate::events::{EventRecorder, LotEvent, LotEventKind};
use crate::grid::{CellKind, Coord, GateId, LotGrid};
use crate::lot_error::LotError;
use crate::occupancy::OccupancyLedger;
use crate::pathfinding_sys::{find_path, reachable_from, ObstacleMode, PathError, SearchParams};

/// Owns the layout and the ledger. Every mutation of either goes through
/// here, one request at a time.
#[derive(Resource, Debug, Clone)]
pub struct ParkingEngine {
    grid: LotGrid,
    ledger: OccupancyLedger,
    search: SearchParams,
    exit_policy: ExitRoutePolicy,
    editing: bool,
    last_path: Vec<Coord>,
    next_sequence: u64,
}

impl Default for ParkingEngine {
    fn default() -> Self {
        Self::new(LotGrid::default())
    }
}

impl ParkingEngine {
    pub fn new(grid: LotGrid) -> Self {
        Self {
            grid,
            ledger: OccupancyLedger::default(),
            search: SearchParams::default(),
            exit_policy: ExitRoutePolicy::default(),
            editing: false,
            last_path: Vec::new(),
            next_sequence: 1,
        }
    }

    pub fn with_search(mut self, search: SearchParams) -> Self {
        self.search = search;
        self
    }

    pub fn with_exit_policy(mut self, policy: ExitRoutePolicy) -> Self {
        self.exit_policy = policy;
        self
    }

    // -------------------------------------------------------------------------
    // Read-only views
    // -------------------------------------------------------------------------

    pub fn grid(&self) -> &LotGrid {
        &self.grid
    }

    pub fn ledger(&self) -> &OccupancyLedger {
        &self.ledger
    }

    /// Route of the most recent successful park or unpark.
    pub fn last_path(&self) -> &[Coord] {
        &self.last_path
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn search_params(&self) -> &SearchParams {
        &self.search
    }

    pub fn exit_policy(&self) -> ExitRoutePolicy {
        self.exit_policy
    }

    pub fn free_spot_count(&self) -> usize {
        self.grid
            .parking_spots()
            .iter()
            .filter(|spot| !self.ledger.is_occupied(**spot))
            .count()
    }

    // -------------------------------------------------------------------------
    // Park / unpark
    // -------------------------------------------------------------------------

    pub fn park(
        &mut self,
        vehicle: &str,
        gate: &str,
        recorder: &mut impl EventRecorder,
    ) -> Result<ParkOutcome, LotError> {
        if self.editing {
            return Err(LotError::EditModeActive);
        }
        let vehicle = vehicle.trim();
        if vehicle.is_empty() {
            return Err(LotError::InvalidVehicleId);
        }
        if self.ledger.contains_vehicle(vehicle) {
            return Err(LotError::AlreadyParked {
                vehicle: vehicle.to_string(),
            });
        }
        let gate_id = GateId::parse(gate)?;
        let gate_coord = self
            .grid
            .gate(gate_id)
            .ok_or_else(|| LotError::UnknownGate(gate.to_string()))?;

        let (spot, path) = self.nearest_spot(gate_coord)?;
        self.ledger.insert(spot, vehicle)?;

        let event = self.next_event(LotEventKind::Park, vehicle, gate_id, gate_coord, spot, path);
        recorder.record(&event);
        info!(
            "{} parked at {} via gate {} ({} cells)",
            vehicle, spot, gate_id, event.distance
        );
        self.last_path = event.path.clone();

        Ok(ParkOutcome {
            vehicle: event.vehicle,
            spot,
            gate: gate_id,
            distance: event.distance,
            path: event.path,
        })
    }

    pub fn unpark(
        &mut self,
        vehicle: &str,
        recorder: &mut impl EventRecorder,
    ) -> Result<UnparkOutcome, LotError> {
        if self.editing {
            return Err(LotError::EditModeActive);
        }
        let vehicle = vehicle.trim();
        let spot = self
            .ledger
            .spot_of(vehicle)
            .ok_or_else(|| LotError::NotParked {
                vehicle: vehicle.to_string(),
            })?;
        let (exit_gate, exit_coord) = self.nearest_gate(spot)?;
        let path = self.exit_route(spot, exit_gate, exit_coord)?;

        self.ledger.remove(spot);

        let event = self.next_event(
            LotEventKind::Unpark,
            vehicle,
            exit_gate,
            exit_coord,
            spot,
            path,
        );
        recorder.record(&event);
        info!(
            "{} left {} through gate {} ({} cells)",
            vehicle, spot, exit_gate, event.distance
        );
        self.last_path = event.path.clone();

        Ok(UnparkOutcome {
            vehicle: event.vehicle,
            spot,
            exit_gate,
            exit_coord,
            distance: event.distance,
            path: event.path,
        })
    }

    /// Shortest route from `gate` to a free spot. Ties go to the earlier spot
    /// in row-major order.
    fn nearest_spot(&self, gate: Coord) -> Result<(Coord, Vec<Coord>), LotError> {
        let candidates: Vec<Coord> = self
            .grid
            .parking_spots()
            .iter()
            .copied()
            .filter(|spot| !self.ledger.is_occupied(*spot))
            .collect();
        if candidates.is_empty() {
            return Err(LotError::LotFull);
        }

        let reachable = reachable_from(gate, &self.grid, &self.ledger);
        let mut best: Option<(Coord, Vec<Coord>)> = None;
        for spot in candidates {
            if !reachable.contains(&spot) {
                continue;
            }
            // No route can be shorter than the Manhattan bound.
            if let Some((_, best_path)) = &best {
                if gate.manhattan(spot) + 1 >= best_path.len() {
                    continue;
                }
            }
            match find_path(gate, spot, &self.grid, &self.ledger, &self.search) {
                Ok(path) => {
                    let shorter = match &best {
                        Some((_, best_path)) => path.len() < best_path.len(),
                        None => true,
                    };
                    if shorter {
                        best = Some((spot, path));
                    }
                }
                Err(PathError::NotFound) => continue,
                Err(err) => return Err(self.search_failure(err)),
            }
        }

        best.ok_or(LotError::NoReachableSpot)
    }

    /// Gate with the smallest straight-line distance to `spot`.
    fn nearest_gate(&self, spot: Coord) -> Result<(GateId, Coord), LotError> {
        self.grid
            .gates()
            .min_by(|(_, a), (_, b)| spot.euclidean(*a).total_cmp(&spot.euclidean(*b)))
            .ok_or_else(|| LotError::InvalidLayout("lot has no gates".to_string()))
    }

    fn exit_route(
        &self,
        spot: Coord,
        gate: GateId,
        gate_coord: Coord,
    ) -> Result<Vec<Coord>, LotError> {
        match find_path(spot, gate_coord, &self.grid, &self.ledger, &self.search) {
            Ok(path) => Ok(path),
            Err(PathError::NotFound) => match self.exit_policy {
                ExitRoutePolicy::Fail => Err(LotError::NoExitRoute { spot, gate }),
                ExitRoutePolicy::IgnoreObstacles => {
                    warn!(
                        "no clear route from {} to gate {}, routing through obstacles",
                        spot, gate
                    );
                    let search = SearchParams {
                        obstacles: ObstacleMode::Ignore,
                        ..self.search
                    };
                    find_path(spot, gate_coord, &self.grid, &self.ledger, &search).map_err(
                        |err| match err {
                            PathError::NotFound => LotError::NoExitRoute { spot, gate },
                            other => self.search_failure(other),
                        },
                    )
                }
            },
            Err(err) => Err(self.search_failure(err)),
        }
    }

    fn search_failure(&self, err: PathError) -> LotError {
        match err {
            PathError::Exhausted { expanded } => LotError::SearchExhausted { expanded },
            PathError::OutOfBounds(coord) => LotError::OutOfBounds {
                coord,
                rows: self.grid.rows(),
                cols: self.grid.cols(),
            },
            PathError::NotFound => LotError::NoReachableSpot,
        }
    }

    fn next_event(
        &mut self,
        kind: LotEventKind,
        vehicle: &str,
        gate: GateId,
        gate_coord: Coord,
        spot: Coord,
        path: Vec<Coord>,
    ) -> LotEvent {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        LotEvent {
            sequence,
            kind,
            vehicle: vehicle.to_string(),
            gate,
            gate_coord,
            spot,
            distance: path.len(),
            path,
        }
    }

    // -------------------------------------------------------------------------
    // Layout editing
    // -------------------------------------------------------------------------

    /// Suspends park/unpark. Calling it while already editing is a no-op.
    pub fn begin_edit(&mut self) {
        if !self.editing {
            info!("layout editing started");
        }
        self.editing = true;
    }

    pub fn set_cell(&mut self, coord: Coord, kind: CellKind) -> Result<(), LotError> {
        self.check_editable(coord)?;
        self.grid.set_cell(coord, kind)
    }

    pub fn cycle_cell(&mut self, coord: Coord) -> Result<CellKind, LotError> {
        self.check_editable(coord)?;
        self.grid.cycle_cell(coord)
    }

    fn check_editable(&self, coord: Coord) -> Result<(), LotError> {
        if !self.editing {
            return Err(LotError::NotEditing);
        }
        if self.ledger.is_occupied(coord) {
            return Err(LotError::SpotOccupied(coord));
        }
        Ok(())
    }

    /// Rebuilds the parking-spot cache and reopens park/unpark.
    pub fn end_edit(&mut self) -> Result<LayoutSummary, LotError> {
        if !self.editing {
            return Err(LotError::NotEditing);
        }
        self.grid.recompute_parking_spots();
        self.editing = false;

        let summary = self.layout_summary();
        info!(
            "layout editing finished: {} spots, {} unreachable",
            summary.parking_spots,
            summary.unreachable_spots.len()
        );
        Ok(summary)
    }

    pub fn layout_summary(&self) -> LayoutSummary {
        let mut reachable = BTreeSet::new();
        for (_, coord) in self.grid.gates() {
            reachable.extend(reachable_from(coord, &self.grid, &self.ledger));
        }
        let free: Vec<Coord> = self
            .grid
            .parking_spots()
            .iter()
            .copied()
            .filter(|spot| !self.ledger.is_occupied(*spot))
            .collect();
        LayoutSummary {
            parking_spots: self.grid.parking_spots().len(),
            free_spots: free.len(),
            unreachable_spots: free
                .into_iter()
                .filter(|spot| !reachable.contains(spot))
                .collect(),
        }
    }
}
