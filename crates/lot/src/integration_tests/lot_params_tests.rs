//! `LotPlugin` configured from `LotParams`.

use crate::allocation::ExitRoutePolicy;
use crate::grid::{CellKind, Coord};
use crate::lot_actions::ActionResult;
use crate::lot_params::LotParams;
use crate::pathfinding_sys::Heuristic;
use crate::test_harness::TestLot;

#[test]
fn test_params_shape_the_engine() {
    let params = LotParams::from_json(
        r#"{"layout": ["A.P.", "....", "....", "P..B"], "heuristic": "manhattan", "journal_capacity": 1}"#,
    )
    .unwrap();
    let mut lot = TestLot::with_params(params);

    assert_eq!(lot.engine().grid().parking_spots().len(), 2);
    assert_eq!(lot.engine().search_params().heuristic, Heuristic::Manhattan);
    assert_eq!(lot.resource::<LotParams>().journal_capacity, 1);

    lot.park("CAR1", "A");
    lot.park("CAR2", "B");
    assert_eq!(lot.journal().len(), 1);
    assert_eq!(lot.journal().last_n(1)[0].vehicle, "CAR2");
}

#[test]
fn test_exit_policy_from_params() {
    let params = LotParams {
        layout: Some(vec![
            "A...".into(),
            ".XXX".into(),
            ".X.X".into(),
            ".XXX".into(),
        ]),
        exit_policy: ExitRoutePolicy::IgnoreObstacles,
        ..LotParams::default()
    };
    // Open a gap, park in the pocket, close the gap again.
    let lot = TestLot::with_params(params).with_cells(&[
        (Coord(1, 2), CellKind::Free),
        (Coord(2, 2), CellKind::Parking),
    ]);
    let mut lot = lot.with_parked("CAR1", "A");
    lot = lot.with_cells(&[(Coord(1, 2), CellKind::Blocked)]);

    let ActionResult::Unparked(outcome) = lot.unpark("CAR1") else {
        panic!("IgnoreObstacles should let CAR1 out");
    };
    assert_eq!(outcome.path.first(), Some(&Coord(2, 2)));
    assert_eq!(outcome.path.last(), Some(&Coord(0, 0)));
}

#[test]
fn test_invalid_params_fall_back_to_stock_lot() {
    let params = LotParams {
        rows: 2,
        ..LotParams::default()
    };
    let lot = TestLot::with_params(params);
    assert_eq!(lot.engine().grid().rows(), 8);
    assert_eq!(lot.engine().grid().parking_spots().len(), 60);
}
