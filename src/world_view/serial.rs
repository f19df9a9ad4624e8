//! Serialization and Deserialization for [BuildingView]

use crate::world_view::BuildingView;
use crate::print;


/// Serializes a `BuildingView` into a binary format.
///
/// Uses `bincode` for efficient serialization.
/// If serialization fails, the error is logged and `None` is returned.
///
/// ## Parameters
/// - `view`: A reference to the `BuildingView` to be serialized.
///
/// ## Returns
/// - A `Vec<u8>` containing the serialized data.
pub fn serialize_view(view: &BuildingView) -> Option<Vec<u8>> {
    match bincode::serialize(view) {
        Ok(serialized_data) => Some(serialized_data),
        Err(e) => {
            print::err(format!("Serialization failed: {} (serial.rs, serialize_view())", e));
            None
        }
    }
}

/// Deserializes a `BuildingView` from a binary format.
///
/// Uses `bincode` for deserialization.
/// If deserialization fails, the error is logged and `None` is returned.
pub fn deserialize_view(data: &[u8]) -> Option<BuildingView> {
    match bincode::deserialize(data) {
        Ok(view) => Some(view),
        Err(e) => {
            print::err(format!("Deserialization failed: {} (serial.rs, deserialize_view())", e));
            None
        }
    }
}

/// Pretty JSON for the `json` debug command.
pub fn view_to_json(view: &BuildingView) -> Option<String> {
    match serde_json::to_string_pretty(view) {
        Ok(json) => Some(json),
        Err(e) => {
            print::err(format!("JSON serialization failed: {} (serial.rs, view_to_json())", e));
            None
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Policy;
    use crate::world_view::{Dirn, LiftContainer, LiftState};

    fn sample_view() -> BuildingView {
        BuildingView {
            generation: 3,
            floor_count: 10,
            policy: Policy::Queue,
            dropped_requests: 1,
            lifts: vec![LiftContainer {
                lift_id: 0,
                current_floor: 4,
                state: LiftState::Moving,
                dirn: Dirn::Up,
                target: None,
                pending_stops: vec![7, 5],
            }],
        }
    }

    #[test]
    fn test_bincode_keeps_pending_stop_order() {
        let bytes = serialize_view(&sample_view()).unwrap();
        let decoded = deserialize_view(&bytes).unwrap();
        assert_eq!(decoded.lifts[0].pending_stops, vec![7, 5]);
        assert_eq!(decoded, sample_view());
    }

    #[test]
    fn test_garbage_does_not_deserialize() {
        assert!(deserialize_view(&[0xff, 0x01]).is_none());
    }

    #[test]
    fn test_json_names_states() {
        let json = view_to_json(&sample_view()).unwrap();
        assert!(json.contains("\"Moving\""));
        assert!(json.contains("\"Queue\""));
    }
}
