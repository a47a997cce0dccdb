use super::*;
use crate::grid::{CellKind, Coord, GateId};
use crate::lot_error::LotError;

#[test]
fn test_lot_action_serialization() {
    let action = LotAction::Park {
        vehicle: "CAR1".into(),
        gate: "a".into(),
    };
    let json = serde_json::to_string(&action).unwrap();
    let decoded: LotAction = serde_json::from_str(&json).unwrap();
    assert_eq!(action, decoded);

    let action = LotAction::SetCell {
        at: Coord(3, 4),
        kind: CellKind::Gate(GateId::try_from('E').unwrap()),
    };
    let json = serde_json::to_string(&action).unwrap();
    let decoded: LotAction = serde_json::from_str(&json).unwrap();
    assert_eq!(action, decoded);
}

#[test]
fn test_lot_action_json_shape() {
    let json = serde_json::to_value(LotAction::CycleCell { at: Coord(2, 3) }).unwrap();
    assert_eq!(json["action"], "cycle_cell");
    assert_eq!(json["at"], serde_json::json!([2, 3]));

    let action: LotAction = serde_json::from_str(r#"{"action":"end_edit"}"#).unwrap();
    assert_eq!(action, LotAction::EndEdit);
}

#[test]
fn test_action_result_helpers() {
    let ok = ActionResult::CellChanged {
        at: Coord(1, 1),
        kind: CellKind::Blocked,
    };
    assert!(ok.is_success());
    assert!(ok.error().is_none());

    let err = ActionResult::Error(LotError::EditModeActive);
    assert!(!err.is_success());
    assert_eq!(err.error(), Some(&LotError::EditModeActive));
}
