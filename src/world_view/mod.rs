//! # Building view
//!
//! Shared vocabulary of the crate ([Floor], [LiftId], [Dirn], [LiftState], [DoorPhase]) and the
//! serializable snapshot of a building ([BuildingView]) that the runtime publishes on its watch
//! channel and [crate::print::building] renders.
pub mod serial;

use serde::{Serialize, Deserialize};
use tokio::sync::watch;

use crate::config::Policy;

/// A floor number, `0 <= floor < floor_count`
pub type Floor = u8;

/// A lift identifier. Equal to the lift's index in the building.
pub type LiftId = u8;


#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Direction a lift is travelling, or the direction of a hall call.
pub enum Dirn {
    Down = -1,
    Stop = 0,
    Up = 1,
}

impl Dirn {
    /// Direction of travel needed to get from `from` to `to`.
    pub fn between(from: Floor, to: Floor) -> Dirn {
        match to.cmp(&from) {
            std::cmp::Ordering::Greater => Dirn::Up,
            std::cmp::Ordering::Less => Dirn::Down,
            std::cmp::Ordering::Equal => Dirn::Stop,
        }
    }
}

/// Motion phase of a lift.
///
/// `Idle → Moving → DoorsOpen → DoorsClosing → Idle`, with `Idle → DoorsOpen` for a request at the
/// current floor and `Moving → Moving` for each intermediate step in the queue policy.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LiftState {
    Idle,
    Moving,
    DoorsOpen,
    DoorsClosing,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Door phase reported to the renderer.
pub enum DoorPhase {
    Open,
    Close,
}


/// Snapshot of one lift.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LiftContainer {
    /// Identifier of the lift
    pub lift_id: LiftId,

    /// Last floor the lift arrived at
    pub current_floor: Floor,

    /// Current phase, see [LiftState]
    pub state: LiftState,

    /// Direction of travel. [Dirn::Stop] unless moving.
    pub dirn: Dirn,

    /// Destination of a direct move in progress
    pub target: Option<Floor>,

    /// Queued stops in submission order (queue policy only)
    pub pending_stops: Vec<Floor>,
}


/// Snapshot of the whole building.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct BuildingView {
    /// Increments every time the building is regenerated
    pub generation: u64,

    /// Number of floors
    pub floor_count: u8,

    /// Active scheduling policy
    pub policy: Policy,

    /// Requests dropped because no lift was idle (direct policy)
    pub dropped_requests: u64,

    /// One entry per lift, ordered by id
    pub lifts: Vec<LiftContainer>,
}

impl BuildingView {
    /// Returns the number of lifts in the building.
    pub fn get_num_lifts(&self) -> usize {
        self.lifts.len()
    }

    /// Looks up a lift by id.
    pub fn lift(&self, id: LiftId) -> Option<&LiftContainer> {
        self.lifts.iter().find(|l| l.lift_id == id)
    }

    /// `true` when every lift is idle with nothing queued.
    pub fn is_quiescent(&self) -> bool {
        self.lifts
            .iter()
            .all(|l| l.state == LiftState::Idle && l.pending_stops.is_empty())
    }
}


/// Fetches a clone of the latest serialized view from the watch channel.
pub fn get_view(view_watch_rx: &watch::Receiver<Vec<u8>>) -> Vec<u8> {
    view_watch_rx.borrow().clone()
}

/// Updates `view` with the latest data on the watch channel.
///
/// ## Returns
/// - `true` if `view` was updated, `false` if nothing changed.
pub fn update_view(view_watch_rx: &watch::Receiver<Vec<u8>>, view: &mut Vec<u8>) -> bool {
    let new_view = view_watch_rx.borrow().clone();
    if new_view != *view {
        *view = new_view;
        return true;
    }
    false
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dirn_between() {
        assert_eq!(Dirn::between(2, 5), Dirn::Up);
        assert_eq!(Dirn::between(5, 2), Dirn::Down);
        assert_eq!(Dirn::between(3, 3), Dirn::Stop);
    }

    #[test]
    fn test_update_view_only_reports_changes() {
        let (tx, rx) = watch::channel(vec![1, 2, 3]);
        let mut view = get_view(&rx);
        assert!(!update_view(&rx, &mut view));

        tx.send(vec![3, 2, 1]).unwrap();
        assert!(update_view(&rx, &mut view));
        assert_eq!(view, vec![3, 2, 1]);
    }
}
