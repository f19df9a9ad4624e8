//! Deterministic simulation.
//!
//! [Simulation] couples a [Dispatcher] with a virtual-clock [TimerQueue] and a renderer. Nothing
//! sleeps: time jumps straight to the next due timer, which makes it suitable for tests and for
//! replaying request scripts faster than real time.

use std::time::Duration;

use crate::config::BuildingConfig;
use crate::elevator_logic::timer::{TimerEvent, TimerQueue};
use crate::elevio::{CallButton, LiftRenderer, RecordingRenderer};
use crate::error::LiftError;
use crate::world_view::{BuildingView, Floor};

use super::dispatcher::{Assignment, Dispatcher};


/// A building running on a virtual clock.
#[derive(Debug)]
pub struct Simulation<R: LiftRenderer = RecordingRenderer> {
    dispatcher: Dispatcher,
    timers: TimerQueue,
    renderer: R,
}

impl Simulation<RecordingRenderer> {
    /// Creates a simulation recording every render call.
    pub fn new(config: BuildingConfig) -> Result<Self, LiftError> {
        Self::with_renderer(config, RecordingRenderer::new())
    }
}

impl<R: LiftRenderer> Simulation<R> {
    /// Creates a simulation reporting to `renderer`.
    pub fn with_renderer(config: BuildingConfig, renderer: R) -> Result<Self, LiftError> {
        Ok(Self {
            dispatcher: Dispatcher::new(config)?,
            timers: TimerQueue::new(),
            renderer,
        })
    }

    /// Current virtual time
    pub fn now(&self) -> Duration {
        self.timers.now()
    }

    /// The dispatcher and its lifts
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// The renderer
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Mutable access to the renderer, e.g. to clear a recording
    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Number of timers still pending, stale ones included
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Snapshot of the building
    pub fn view(&self) -> BuildingView {
        self.dispatcher.view()
    }

    /// See [Dispatcher::submit_request].
    pub fn submit_request(&mut self, floor: Floor) -> Result<Assignment, LiftError> {
        self.dispatcher.submit_request(floor, &mut self.timers, &mut self.renderer)
    }

    /// See [Dispatcher::submit_call].
    pub fn submit_call(&mut self, call: CallButton) -> Result<Assignment, LiftError> {
        self.dispatcher.submit_call(call, &mut self.timers, &mut self.renderer)
    }

    /// Replaces the building. Timers of the old building stay queued and are discarded as they fire.
    pub fn regenerate(&mut self, config: BuildingConfig) -> Result<(), LiftError> {
        self.dispatcher.regenerate(config)
    }

    /// Fires the next timer, moving the clock to its due time.
    ///
    /// ## Returns
    /// The event fired, or `None` when nothing is pending.
    pub fn step(&mut self) -> Option<TimerEvent> {
        let event = self.timers.pop_next()?;
        self.dispatcher.handle_timer(event, &mut self.timers, &mut self.renderer);
        Some(event)
    }

    /// Fires every timer due within `by` from now, then sets the clock to `now + by`.
    pub fn advance(&mut self, by: Duration) {
        let deadline = self.timers.now() + by;
        while let Some(event) = self.timers.pop_due(deadline) {
            self.dispatcher.handle_timer(event, &mut self.timers, &mut self.renderer);
        }
        self.timers.advance_to(deadline);
    }

    /// Fires timers until none are left.
    ///
    /// ## Returns
    /// The virtual time when the last timer fired.
    pub fn run_until_idle(&mut self) -> Duration {
        while self.step().is_some() {}
        self.timers.now()
    }
}
