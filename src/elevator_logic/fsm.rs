//! Lift state machine.
//!
//! ```text
//!            move_to_floor(other)          Arrived / Stepped at a stop
//!   Idle ───────────────────────► Moving ─────────────────────────► DoorsOpen
//!    │  ▲                          │  ▲                                │
//!    │  │                          └──┘ Stepped (queue policy)         │ CloseDoors
//!    │  │            DoorsClosed                                      ▼
//!    │  └───────────────────────────────────────────────────────── DoorsClosing
//!    │ request at current floor                                        ▲
//!    └──────────────────────────► DoorsOpen ───────────────────────────┘
//! ```
//!
//! Every transition goes through [Lift::enter], which refuses anything not drawn above.

use std::collections::VecDeque;

use crate::config::Policy;
use crate::print;
use crate::world_view::{Dirn, DoorPhase, Floor, LiftContainer, LiftId, LiftState};

use super::timer::LiftEvent;
use super::Effects;


/// Returns `true` if a lift may go from `from` to `to`.
pub fn is_legal(from: LiftState, to: LiftState) -> bool {
    use LiftState::*;
    matches!(
        (from, to),
        (Idle, Moving)
            | (Idle, DoorsOpen)
            | (Moving, Moving)
            | (Moving, DoorsOpen)
            | (DoorsOpen, DoorsClosing)
            | (DoorsClosing, Idle)
    )
}


/// One lift of the building.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lift {
    pub(crate) id: LiftId,
    pub(crate) current_floor: Floor,
    pub(crate) state: LiftState,
    pub(crate) dirn: Dirn,
    /// Destination of a direct move, cleared on arrival
    pub(crate) target: Option<Floor>,
    /// Queue policy stops, submission order
    pub(crate) pending_stops: VecDeque<Floor>,
}

impl Lift {
    /// A new lift, idle on the ground floor.
    pub fn new(id: LiftId) -> Self {
        Self {
            id,
            current_floor: 0,
            state: LiftState::Idle,
            dirn: Dirn::Stop,
            target: None,
            pending_stops: VecDeque::new(),
        }
    }

    /// Identifier of the lift
    pub fn id(&self) -> LiftId {
        self.id
    }

    /// Last floor the lift arrived at. Does not change while travelling.
    pub fn current_floor(&self) -> Floor {
        self.current_floor
    }

    /// Current phase
    pub fn state(&self) -> LiftState {
        self.state
    }

    /// Direction of travel
    pub fn dirn(&self) -> Dirn {
        self.dirn
    }

    /// Destination of the direct move in progress
    pub fn target(&self) -> Option<Floor> {
        self.target
    }

    /// Queued stops in submission order
    pub fn pending_stops(&self) -> &VecDeque<Floor> {
        &self.pending_stops
    }

    /// `true` if the lift can take a new assignment
    pub fn is_idle(&self) -> bool {
        self.state == LiftState::Idle
    }

    /// `true` if a request for `floor` is already taken care of by this lift: it is the target of
    /// the current move, it is queued, or the doors are cycling at that floor right now.
    pub fn is_serving(&self, floor: Floor) -> bool {
        let doors_here = matches!(self.state, LiftState::DoorsOpen | LiftState::DoorsClosing)
            && self.current_floor == floor;
        self.target == Some(floor) || self.pending_stops.contains(&floor) || doors_here
    }

    /// Floors between the lift and `floor`.
    pub fn distance_to(&self, floor: Floor) -> u8 {
        self.current_floor.abs_diff(floor)
    }

    /// Snapshot for the building view.
    pub fn to_container(&self) -> LiftContainer {
        LiftContainer {
            lift_id: self.id,
            current_floor: self.current_floor,
            state: self.state,
            dirn: self.dirn,
            target: self.target,
            pending_stops: self.pending_stops.iter().copied().collect(),
        }
    }

    /// Moves the lift to `next`.
    ///
    /// An illegal transition is a bug in the caller: it trips a debug assertion and is logged and
    /// ignored in release builds.
    pub(crate) fn enter(&mut self, next: LiftState) {
        if !is_legal(self.state, next) {
            debug_assert!(false, "lift {}: illegal transition {:?} -> {:?}", self.id, self.state, next);
            print::cosmic_err(format!("lift {}: {:?} -> {:?} (fsm.rs, enter())", self.id, self.state, next));
            return;
        }
        self.state = next;
    }


    /// Travels straight to `target` and runs a door cycle there.
    ///
    /// If the lift is already at `target`, only the door cycle runs.
    /// Otherwise the move takes `|target - current_floor| * unit_travel`.
    pub fn move_to_floor(&mut self, target: Floor, fx: &mut Effects) {
        if target == self.current_floor {
            self.run_door_cycle(fx);
            return;
        }

        let distance = self.distance_to(target);
        let duration = fx.timing.unit_travel * u32::from(distance);

        self.enter(LiftState::Moving);
        self.dirn = Dirn::between(self.current_floor, target);
        self.target = Some(target);

        fx.renderer.on_move_start(self.id, self.current_floor, target, duration);
        fx.schedule(self.id, duration, LiftEvent::Arrived { floor: target });
    }

    /// Opens the doors, holds them for `door_open`, then closes them over `door_close`.
    pub fn run_door_cycle(&mut self, fx: &mut Effects) {
        self.enter(LiftState::DoorsOpen);
        self.dirn = Dirn::Stop;

        fx.renderer.on_door_phase(self.id, DoorPhase::Open, fx.timing.door_open);
        fx.schedule(self.id, fx.timing.door_open, LiftEvent::CloseDoors);
    }

    /// Feeds a fired timer back into the lift.
    pub fn on_event(&mut self, event: LiftEvent, fx: &mut Effects) {
        match (event, self.state) {
            (LiftEvent::Arrived { floor }, LiftState::Moving) => {
                self.current_floor = floor;
                self.target = None;
                self.run_door_cycle(fx);
            }
            (LiftEvent::Stepped { floor }, LiftState::Moving) => {
                self.on_step(floor, fx);
            }
            (LiftEvent::CloseDoors, LiftState::DoorsOpen) => {
                self.enter(LiftState::DoorsClosing);
                fx.renderer.on_door_phase(self.id, DoorPhase::Close, fx.timing.door_close);
                fx.schedule(self.id, fx.timing.door_close, LiftEvent::DoorsClosed);
            }
            (LiftEvent::DoorsClosed, LiftState::DoorsClosing) => {
                self.enter(LiftState::Idle);
                if fx.policy == Policy::Queue {
                    self.finish_stop(fx);
                }
            }
            (event, state) => {
                print::cosmic_err(format!("lift {}: {:?} while {:?} (fsm.rs, on_event())", self.id, event, state));
            }
        }
    }
}
