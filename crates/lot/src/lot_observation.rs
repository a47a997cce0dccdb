//! Serializable snapshot of the lot for displays and agents.

use serde::{Deserialize, Serialize};

use crate::allocation::ParkingEngine;
use crate::grid::Coord;
use crate::lot_params::GateSpec;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParkedVehicle {
    pub vehicle: String,
    pub spot: Coord,
}

/// Point-in-time view of the lot. Built on demand; holds no references
/// back into the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotObservation {
    pub rows: usize,
    pub cols: usize,
    /// One string per row in layout symbols (`.`, `P`, `X`, gate letters).
    pub layout: Vec<String>,
    pub gates: Vec<GateSpec>,
    /// Row-major.
    pub parked: Vec<ParkedVehicle>,
    pub last_path: Vec<Coord>,
    pub editing: bool,
    pub parking_spots: usize,
    pub free_spots: usize,
}

impl LotObservation {
    pub fn from_engine(engine: &ParkingEngine) -> Self {
        let grid = engine.grid();
        Self {
            rows: grid.rows(),
            cols: grid.cols(),
            layout: (0..grid.rows()).map(|r| grid.row_symbols(r)).collect(),
            gates: grid.gates().map(|(id, at)| GateSpec { id, at }).collect(),
            parked: engine
                .ledger()
                .iter()
                .map(|(spot, vehicle)| ParkedVehicle {
                    vehicle: vehicle.to_string(),
                    spot,
                })
                .collect(),
            last_path: engine.last_path().to_vec(),
            editing: engine.is_editing(),
            parking_spots: grid.parking_spots().len(),
            free_spots: engine.free_spot_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::NullRecorder;

    #[test]
    fn test_observation_of_default_lot() {
        let mut engine = ParkingEngine::default();
        engine.park("CAR1", "A", &mut NullRecorder).unwrap();
        let obs = LotObservation::from_engine(&engine);

        assert_eq!((obs.rows, obs.cols), (8, 8));
        assert_eq!(obs.layout[0], "APPPPPPB");
        assert_eq!(obs.gates.len(), 4);
        assert_eq!(
            obs.parked,
            vec![ParkedVehicle {
                vehicle: "CAR1".into(),
                spot: Coord(0, 1),
            }]
        );
        assert_eq!(obs.last_path, vec![Coord(0, 0), Coord(0, 1)]);
        assert_eq!(obs.parking_spots, 60);
        assert_eq!(obs.free_spots, 59);
        assert!(!obs.editing);
    }

    #[test]
    fn test_observation_json_keys() {
        let obs = LotObservation::from_engine(&ParkingEngine::default());
        let json = serde_json::to_value(&obs).unwrap();
        assert_eq!(json["gates"][1]["id"], "B");
        assert_eq!(json["gates"][1]["at"], serde_json::json!([0, 7]));
        assert_eq!(json["free_spots"], 60);
    }
}
