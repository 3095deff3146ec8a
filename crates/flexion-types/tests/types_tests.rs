//! Integration tests for flexion-types.

use flexion_types::{ElementId, FlexionError, NodeId};

// ─── ID Tests ──────────────────────────────────────────────────

#[test]
fn element_id_index() {
    let id = ElementId(42);
    assert_eq!(id.index(), 42);
}

#[test]
fn node_id_from_u32() {
    let id: NodeId = 7.into();
    assert_eq!(id.index(), 7);
}

#[test]
fn ids_are_serializable() {
    let id = ElementId(100);
    let json = serde_json::to_string(&id).unwrap();
    let deserialized: ElementId = serde_json::from_str(&json).unwrap();
    assert_eq!(id, deserialized);
}

// ─── Error Tests ──────────────────────────────────────────────

#[test]
fn out_of_bounds_display() {
    let err = FlexionError::out_of_bounds(5, 3);
    let msg = err.to_string();
    assert!(msg.contains('5'));
    assert!(msg.contains('3'));
}

#[test]
fn free_position_is_distinct_from_out_of_bounds() {
    let missing = FlexionError::NoFreePosition;
    assert!(matches!(missing, FlexionError::NoFreePosition));
    assert!(!matches!(missing, FlexionError::IndexOutOfBounds { .. }));
}

#[test]
fn operator_error_display() {
    let err = FlexionError::invalid_operator("block row 2 opened twice");
    assert!(err.to_string().contains("block row 2"));
}
