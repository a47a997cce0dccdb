//! Spot -> vehicle ledger.
//!
//! The ledger is the single source of truth for "free" vs "occupied". The
//! route search reads it as a dynamic obstacle layer; only the allocation
//! engine mutates it.

use std::collections::{BTreeMap, HashMap};

use crate::grid::Coord;
use crate::lot_error::LotError;

/// Occupied spots keyed by coordinate, with a reverse index so a vehicle can
/// be found without scanning.
///
/// Invariants: a coordinate is a key iff a vehicle is parked there; a vehicle
/// id appears at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OccupancyLedger {
    spots: BTreeMap<Coord, String>,
    by_vehicle: HashMap<String, Coord>,
}

impl OccupancyLedger {
    /// Insert-if-absent. Fails when the vehicle already holds a spot or the
    /// spot already holds a vehicle; the ledger is unchanged on failure.
    pub fn insert(&mut self, spot: Coord, vehicle: &str) -> Result<(), LotError> {
        if self.by_vehicle.contains_key(vehicle) {
            return Err(LotError::AlreadyParked {
                vehicle: vehicle.to_string(),
            });
        }
        if self.spots.contains_key(&spot) {
            return Err(LotError::SpotOccupied(spot));
        }
        self.spots.insert(spot, vehicle.to_string());
        self.by_vehicle.insert(vehicle.to_string(), spot);
        Ok(())
    }

    /// Remove by spot, returning the vehicle that was parked there.
    pub fn remove(&mut self, spot: Coord) -> Option<String> {
        let vehicle = self.spots.remove(&spot)?;
        self.by_vehicle.remove(&vehicle);
        Some(vehicle)
    }

    #[inline]
    pub fn is_occupied(&self, coord: Coord) -> bool {
        self.spots.contains_key(&coord)
    }

    pub fn vehicle_at(&self, coord: Coord) -> Option<&str> {
        self.spots.get(&coord).map(String::as_str)
    }

    pub fn spot_of(&self, vehicle: &str) -> Option<Coord> {
        self.by_vehicle.get(vehicle).copied()
    }

    pub fn contains_vehicle(&self, vehicle: &str) -> bool {
        self.by_vehicle.contains_key(vehicle)
    }

    /// Occupied spots, row-major.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, &str)> + '_ {
        self.spots.iter().map(|(coord, v)| (*coord, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.spots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spots.is_empty()
    }
}
