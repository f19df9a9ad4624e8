//! ## Lift I/O module
//!
//! Everything that crosses the boundary between the dispatch core and the outside world.
//!
//! ## Overview
//! - [`CallType`] / [`CallButton`]: a hall button press, validated against the building before it
//!   reaches the dispatcher.
//! - [`LiftRenderer`]: the two effects the core emits for the visual side: a lift starts moving,
//!   or a door phase begins.
//! - [`ConsoleRenderer`]: renderer printing through [crate::print].
//! - [`RecordingRenderer`]: renderer keeping every call, used by the simulation and the tests.
//! - [`poll`]: reads button presses from stdin on a blocking thread.

pub mod poll;

use std::time::Duration;

use serde::{Serialize, Deserialize};

use crate::error::LiftError;
use crate::print;
use crate::world_view::{Dirn, DoorPhase, Floor, LiftId};


/// Represents the type of a hall call.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)] // Ensures the enum is stored as a single byte.
#[allow(non_camel_case_types)]
pub enum CallType {
    /// Call to go up.
    UP = 0,

    /// Call to go down.
    DOWN = 1,
}

impl CallType {
    /// Direction the caller wants to travel in.
    pub fn dirn(self) -> Dirn {
        match self {
            CallType::UP => Dirn::Up,
            CallType::DOWN => Dirn::Down,
        }
    }
}

/// Represents a hall button press.
///
/// The top floor has no `UP` button and the ground floor has no `DOWN` button.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallButton {
    /// The floor where the call was made.
    pub floor: Floor,

    /// The type of call (UP or DOWN).
    pub call_type: CallType,
}

impl CallButton {
    /// Checks that the button exists in a building with `floor_count` floors.
    ///
    /// ## Errors
    /// - [LiftError::InvalidFloor] if the floor is outside the building.
    /// - [LiftError::InvalidCall] for `UP` on the top floor or `DOWN` on floor 0.
    pub fn validate(&self, floor_count: u8) -> Result<(), LiftError> {
        if self.floor >= floor_count {
            return Err(LiftError::InvalidFloor { floor: self.floor as i64, floor_count });
        }
        let missing = match self.call_type {
            CallType::UP => self.floor + 1 == floor_count,
            CallType::DOWN => self.floor == 0,
        };
        if missing {
            return Err(LiftError::InvalidCall { floor: self.floor, dirn: self.call_type.dirn() });
        }
        Ok(())
    }
}


/// Consumer of the visual effects of the dispatch core.
///
/// The core knows nothing about coordinates or animations, it only reports when a phase begins and
/// how long it will last.
pub trait LiftRenderer {
    /// Lift `lift_id` starts moving from `from` to `to` and arrives after `duration`.
    fn on_move_start(&mut self, lift_id: LiftId, from: Floor, to: Floor, duration: Duration);

    /// Lift `lift_id` starts opening or closing its doors, taking `duration`.
    fn on_door_phase(&mut self, lift_id: LiftId, phase: DoorPhase, duration: Duration);
}


/// Renderer printing every effect to the terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleRenderer;

impl LiftRenderer for ConsoleRenderer {
    fn on_move_start(&mut self, lift_id: LiftId, from: Floor, to: Floor, duration: Duration) {
        print::info(format!(
            "Lift {} moving {} -> {} ({} ms)",
            lift_id, from, to, duration.as_millis()
        ));
    }

    fn on_door_phase(&mut self, lift_id: LiftId, phase: DoorPhase, duration: Duration) {
        let what = match phase {
            DoorPhase::Open => "opening",
            DoorPhase::Close => "closing",
        };
        print::info(format!("Lift {} doors {} ({} ms)", lift_id, what, duration.as_millis()));
    }
}


/// One call received by a [RecordingRenderer].
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderCall {
    MoveStart { lift_id: LiftId, from: Floor, to: Floor, duration: Duration },
    DoorPhase { lift_id: LiftId, phase: DoorPhase, duration: Duration },
}

/// Renderer keeping every call in order.
#[derive(Debug, Default, Clone)]
pub struct RecordingRenderer {
    /// All calls received so far
    pub calls: Vec<RenderCall>,
}

impl RecordingRenderer {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls concerning one lift.
    pub fn calls_for(&self, lift_id: LiftId) -> Vec<RenderCall> {
        self.calls
            .iter()
            .copied()
            .filter(|call| match call {
                RenderCall::MoveStart { lift_id: id, .. } | RenderCall::DoorPhase { lift_id: id, .. } => *id == lift_id,
            })
            .collect()
    }

    /// Number of `MoveStart` calls.
    pub fn move_count(&self) -> usize {
        self.calls.iter().filter(|c| matches!(c, RenderCall::MoveStart { .. })).count()
    }

    /// Number of door openings, i.e. door cycles started.
    pub fn door_cycle_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, RenderCall::DoorPhase { phase: DoorPhase::Open, .. }))
            .count()
    }

    /// Forgets every recorded call.
    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl LiftRenderer for RecordingRenderer {
    fn on_move_start(&mut self, lift_id: LiftId, from: Floor, to: Floor, duration: Duration) {
        self.calls.push(RenderCall::MoveStart { lift_id, from, to, duration });
    }

    fn on_door_phase(&mut self, lift_id: LiftId, phase: DoorPhase, duration: Duration) {
        self.calls.push(RenderCall::DoorPhase { lift_id, phase, duration });
    }
}
