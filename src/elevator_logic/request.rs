//! Queue policy.
//!
//! In the queue policy a lift keeps an ordered list of stops and travels one floor per step. After
//! every step it checks whether the floor it just reached is queued; if so it stops there for a
//! door cycle, whether or not that floor is the head of the queue. The head is only the direction
//! to travel in. This means stops are served in the order the lift physically reaches them, and the
//! submission order only decides where the lift heads next.
//!
//! A floor leaves the queue when the door cycle at that floor completes.

use crate::print;
use crate::world_view::{Dirn, Floor, LiftState};

use super::fsm::Lift;
use super::timer::LiftEvent;
use super::Effects;


/// What [Lift::add_to_queue] did with a floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueOutcome {
    /// The floor was appended to the queue.
    Queued,
    /// The lift was idle at that floor; it cycles its doors instead.
    DoorCycle,
    /// Already queued, or the doors are already cycling at that floor.
    Ignored,
}

impl Lift {
    /// Appends `floor` to the stop queue and starts processing if the lift is idle.
    ///
    /// Duplicates are suppressed. The floor the lift is standing at is not queued: an idle lift
    /// cycles its doors, a lift with its doors already cycling there ignores it. A lift that is
    /// moving has left its floor, so that floor is queued like any other.
    pub fn add_to_queue(&mut self, floor: Floor, fx: &mut Effects) -> QueueOutcome {
        if self.pending_stops.contains(&floor) {
            return QueueOutcome::Ignored;
        }

        if floor == self.current_floor && self.state != LiftState::Moving {
            if self.state == LiftState::Idle {
                self.run_door_cycle(fx);
                return QueueOutcome::DoorCycle;
            }
            return QueueOutcome::Ignored;
        }

        self.pending_stops.push_back(floor);
        if self.state == LiftState::Idle {
            self.process_queue(fx);
        }
        QueueOutcome::Queued
    }

    /// Starts serving the queue head from an idle lift. Does nothing with an empty queue.
    pub fn process_queue(&mut self, fx: &mut Effects) {
        let Some(&head) = self.pending_stops.front() else {
            return;
        };

        if head == self.current_floor {
            self.run_door_cycle(fx);
        } else {
            self.move_one_step(head, fx);
        }
    }

    /// Moves one floor toward `target`, taking `step_travel`.
    pub fn move_one_step(&mut self, target: Floor, fx: &mut Effects) {
        let dirn = Dirn::between(self.current_floor, target);
        let next = match dirn {
            Dirn::Up => self.current_floor + 1,
            Dirn::Down => self.current_floor - 1,
            Dirn::Stop => {
                print::warn(format!("Lift {} asked to step to its own floor {}", self.id, target));
                return;
            }
        };

        self.enter(LiftState::Moving);
        self.dirn = dirn;

        fx.renderer.on_move_start(self.id, self.current_floor, next, fx.timing.step_travel);
        fx.schedule(self.id, fx.timing.step_travel, LiftEvent::Stepped { floor: next });
    }

    /// A step reached `floor`: stop if it is queued, otherwise keep heading for the queue head.
    pub(crate) fn on_step(&mut self, floor: Floor, fx: &mut Effects) {
        self.current_floor = floor;

        if self.pending_stops.contains(&floor) {
            self.run_door_cycle(fx);
            return;
        }

        match self.pending_stops.front() {
            Some(&head) => self.move_one_step(head, fx),
            // Moving must pass through DoorsOpen before it may rest
            None => self.run_door_cycle(fx),
        }
    }

    /// The door cycle at the current floor is over: drop that floor from the queue and carry on.
    pub(crate) fn finish_stop(&mut self, fx: &mut Effects) {
        let here = self.current_floor;
        self.pending_stops.retain(|&f| f != here);
        self.dirn = Dirn::Stop;
        self.process_queue(fx);
    }
}
