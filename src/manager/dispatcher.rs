//! Assignment of floor requests to lifts.
//!
//! The dispatcher owns every lift of the building and is the only place lifts are mutated from.
//! A request is handled in this order:
//!
//! 1. Reject floors outside the building.
//! 2. A floor already being served (direct target, queued stop, doors open there) is a no-op.
//! 3. An idle lift standing at the floor cycles its doors.
//! 4. Otherwise the nearest idle lift takes it; ties go to the lowest id.
//! 5. No idle lift: the direct policy drops the request, the queue policy hands it to the nearest
//!    busy lift's stop queue.
//!
//! Once a lift is committed it is never re-assigned or interrupted.
//!
//! Timer events carry the generation they were scheduled in. [Dispatcher::regenerate] bumps the
//! generation, so timers left over from a discarded lift set are ignored when they fire.

use crate::config::{BuildingConfig, Policy};
use crate::elevator_logic::request::QueueOutcome;
use crate::elevator_logic::timer::{Scheduler, TimerEvent};
use crate::elevator_logic::{Effects, Lift};
use crate::elevio::{CallButton, LiftRenderer};
use crate::error::LiftError;
use crate::print;
use crate::world_view::{BuildingView, Floor, LiftId};


/// How a request was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assignment {
    /// An idle lift was already at the floor and cycles its doors.
    DoorCycle(LiftId),
    /// The lift travels directly to the floor.
    Dispatched(LiftId),
    /// The floor was added to the lift's stop queue.
    Queued(LiftId),
    /// The lift is already on its way to, or stopped at, the floor.
    AlreadyServed(LiftId),
}

impl Assignment {
    /// The lift the request ended up with
    pub fn lift_id(&self) -> LiftId {
        match *self {
            Assignment::DoorCycle(id)
            | Assignment::Dispatched(id)
            | Assignment::Queued(id)
            | Assignment::AlreadyServed(id) => id,
        }
    }
}


/// Owner of the lifts and the assignment policy.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    config: BuildingConfig,
    lifts: Vec<Lift>,
    generation: u64,
    dropped_requests: u64,
}

fn build_lifts(config: &BuildingConfig) -> Vec<Lift> {
    (0..config.lift_count).map(Lift::new).collect()
}

impl Dispatcher {
    /// Generates a building: `lift_count` idle lifts on floor 0.
    ///
    /// ## Errors
    /// [LiftError::InvalidConfiguration] if the config has no floors or no lifts.
    pub fn new(config: BuildingConfig) -> Result<Self, LiftError> {
        config.validate()?;
        Ok(Self {
            lifts: build_lifts(&config),
            config,
            generation: 0,
            dropped_requests: 0,
        })
    }

    /// Discards every lift and generates a new building from `config`.
    ///
    /// Timers scheduled before the call become stale. On error the current building is kept.
    pub fn regenerate(&mut self, config: BuildingConfig) -> Result<(), LiftError> {
        config.validate()?;
        self.lifts = build_lifts(&config);
        self.config = config;
        self.generation += 1;
        self.dropped_requests = 0;
        print::ok(format!(
            "Generated building {}: {} floors, {} lifts, {:?} policy",
            self.generation, config.floor_count, config.lift_count, config.policy
        ));
        Ok(())
    }

    /// Configuration of the current building
    pub fn config(&self) -> &BuildingConfig {
        &self.config
    }

    /// Current building generation
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// All lifts, ordered by id
    pub fn lifts(&self) -> &[Lift] {
        &self.lifts
    }

    /// Looks up a lift by id
    pub fn lift(&self, id: LiftId) -> Option<&Lift> {
        self.lifts.get(id as usize)
    }

    /// Requests dropped since the building was generated
    pub fn dropped_requests(&self) -> u64 {
        self.dropped_requests
    }

    /// Snapshot of the building.
    pub fn view(&self) -> BuildingView {
        BuildingView {
            generation: self.generation,
            floor_count: self.config.floor_count,
            policy: self.config.policy,
            dropped_requests: self.dropped_requests,
            lifts: self.lifts.iter().map(Lift::to_container).collect(),
        }
    }

    /// Checks that `floor` lies inside the building.
    pub fn validate_floor(&self, floor: i64) -> Result<Floor, LiftError> {
        let floor_count = self.config.floor_count;
        if floor < 0 || floor >= i64::from(floor_count) {
            return Err(LiftError::InvalidFloor { floor, floor_count });
        }
        Ok(floor as Floor)
    }

    /// Nearest idle lift to `floor`, lowest id on ties.
    pub fn nearest_idle(&self, floor: Floor) -> Option<LiftId> {
        self.lifts
            .iter()
            .filter(|l| l.is_idle())
            .min_by_key(|l| (l.distance_to(floor), l.id()))
            .map(Lift::id)
    }

    /// Nearest lift to `floor` regardless of state, lowest id on ties.
    fn nearest_any(&self, floor: Floor) -> Option<LiftId> {
        self.lifts
            .iter()
            .min_by_key(|l| (l.distance_to(floor), l.id()))
            .map(Lift::id)
    }

    /// Handles a hall button press. Validates the button before [Dispatcher::submit_request].
    pub fn submit_call(
        &mut self,
        call: CallButton,
        scheduler: &mut dyn Scheduler,
        renderer: &mut dyn LiftRenderer,
    ) -> Result<Assignment, LiftError> {
        call.validate(self.config.floor_count)?;
        self.submit_request(call.floor, scheduler, renderer)
    }

    /// Assigns a request for `floor` to a lift.
    ///
    /// ## Errors
    /// - [LiftError::InvalidFloor] if the floor is outside the building. No lift is touched.
    /// - [LiftError::NoAvailableLift] if every lift is busy in the direct policy. The request is
    ///   dropped and counted.
    pub fn submit_request(
        &mut self,
        floor: Floor,
        scheduler: &mut dyn Scheduler,
        renderer: &mut dyn LiftRenderer,
    ) -> Result<Assignment, LiftError> {
        let floor = self.validate_floor(i64::from(floor))?;

        if let Some(lift) = self.lifts.iter().find(|l| l.is_serving(floor)) {
            return Ok(Assignment::AlreadyServed(lift.id()));
        }

        let policy = self.config.policy;
        let mut fx = Effects::new(scheduler, renderer, self.config.timing, policy, self.generation);

        if let Some(lift) = self
            .lifts
            .iter_mut()
            .find(|l| l.is_idle() && l.current_floor() == floor)
        {
            lift.run_door_cycle(&mut fx);
            print::dispatch(format!("Floor {}: lift {} is already here", floor, lift.id()));
            return Ok(Assignment::DoorCycle(lift.id()));
        }

        if let Some(id) = self.nearest_idle(floor) {
            let lift = &mut self.lifts[id as usize];
            let assignment = match policy {
                Policy::Direct => {
                    lift.move_to_floor(floor, &mut fx);
                    Assignment::Dispatched(id)
                }
                Policy::Queue => queue_assignment(lift, floor, &mut fx),
            };
            print::dispatch(format!("Floor {}: {:?} (from floor {})", floor, assignment, lift.current_floor()));
            return Ok(assignment);
        }

        match policy {
            Policy::Direct => {
                self.dropped_requests += 1;
                print::warn(format!("Floor {}: every lift is busy, request dropped", floor));
                Err(LiftError::NoAvailableLift { floor })
            }
            Policy::Queue => {
                let Some(id) = self.nearest_any(floor) else {
                    return Err(LiftError::NoAvailableLift { floor });
                };
                let assignment = queue_assignment(&mut self.lifts[id as usize], floor, &mut fx);
                print::dispatch(format!("Floor {}: every lift is busy, deferred to {:?}", floor, assignment));
                Ok(assignment)
            }
        }
    }

    /// Feeds a fired timer to its lift.
    ///
    /// ## Returns
    /// `false` if the timer belongs to an older generation or an unknown lift and was ignored.
    pub fn handle_timer(
        &mut self,
        event: TimerEvent,
        scheduler: &mut dyn Scheduler,
        renderer: &mut dyn LiftRenderer,
    ) -> bool {
        if event.generation != self.generation {
            print::warn(format!(
                "Ignoring stale timer for lift {} from generation {} (current {})",
                event.lift_id, event.generation, self.generation
            ));
            return false;
        }
        let mut fx = Effects::new(scheduler, renderer, self.config.timing, self.config.policy, self.generation);
        match self.lifts.get_mut(event.lift_id as usize) {
            Some(lift) => {
                lift.on_event(event.kind, &mut fx);
                true
            }
            None => {
                print::cosmic_err(format!("timer for unknown lift {} (dispatcher.rs, handle_timer())", event.lift_id));
                false
            }
        }
    }
}

fn queue_assignment(lift: &mut Lift, floor: Floor, fx: &mut Effects) -> Assignment {
    match lift.add_to_queue(floor, fx) {
        QueueOutcome::Queued => Assignment::Queued(lift.id()),
        QueueOutcome::DoorCycle => Assignment::DoorCycle(lift.id()),
        QueueOutcome::Ignored => Assignment::AlreadyServed(lift.id()),
    }
}
