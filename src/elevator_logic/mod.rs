//! # Lift logic
//!
//! The per-lift half of the dispatch core.
//!
//! - [`fsm`]: the [Lift] state machine, direct moves and the door cycle.
//! - [`request`]: the queue policy (stop queue, single-floor steps, intermediate stops).
//! - [`timer`]: delayed events and the schedulers delivering them.
//!
//! A lift never sleeps or spawns anything itself. Each phase hands its end to the [timer::Scheduler]
//! in [Effects] as a [timer::TimerEvent], and the owner of the lift set feeds the event back through
//! [Lift::on_event] when it fires.

pub mod fsm;
pub mod request;
pub mod timer;

pub use fsm::Lift;

use crate::config::{Policy, Timing};
use crate::elevio::LiftRenderer;
use timer::{LiftEvent, Scheduler, TimerEvent};
use crate::world_view::LiftId;


/// Outside world as seen by a lift while it handles one command or event.
pub struct Effects<'a> {
    /// Where the end of the current phase is scheduled
    pub scheduler: &'a mut dyn Scheduler,
    /// Receives the visual effects
    pub renderer: &'a mut dyn LiftRenderer,
    /// Phase durations of the building
    pub timing: Timing,
    /// Scheduling policy of the building
    pub policy: Policy,
    /// Building generation stamped on every timer
    pub generation: u64,
}

impl<'a> Effects<'a> {
    /// Bundles the collaborators for one call into a lift.
    pub fn new(
        scheduler: &'a mut dyn Scheduler,
        renderer: &'a mut dyn LiftRenderer,
        timing: Timing,
        policy: Policy,
        generation: u64,
    ) -> Self {
        Self { scheduler, renderer, timing, policy, generation }
    }

    /// Schedules `kind` for lift `lift_id` after `delay`.
    fn schedule(&mut self, lift_id: LiftId, delay: std::time::Duration, kind: LiftEvent) {
        let event = TimerEvent { generation: self.generation, lift_id, kind };
        self.scheduler.schedule_after(delay, event);
    }
}
