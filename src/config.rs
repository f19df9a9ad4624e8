//! # config.rs – Centralized Parameter Store
//!
//! This module holds all static program parameters used throughout the system,
//! plus the [BuildingConfig] a building is generated from.
//! Keeping configuration in one place makes tuning, experimentation, and testing easier.

use std::sync::Mutex;
use std::time::Duration;
use once_cell::sync::Lazy;
use serde::{Serialize, Deserialize};

use crate::error::LiftError;

//
// ──────────────────────────────────────────────────────────────
//   1. BUILDING DEFAULTS
// ──────────────────────────────────────────────────────────────
//

/// Number of floors used when none is given on the command line
pub const DEFAULT_NUM_FLOORS: u8 = 6;

/// Number of lifts used when none is given on the command line
pub const DEFAULT_NUM_LIFTS: u8 = 3;

//
// ──────────────────────────────────────────────────────────────
//   2. TIMING
// ──────────────────────────────────────────────────────────────
//

/// Travel time per floor for a direct move
pub const UNIT_TRAVEL_TIME: Duration = Duration::from_millis(3000);

/// Travel time for a single step in the queue policy
pub const STEP_TRAVEL_TIME: Duration = Duration::from_millis(2000);

/// How long the doors stay open
pub const DOOR_OPEN_TIME: Duration = Duration::from_millis(2500);

/// How long the doors take to close
pub const DOOR_CLOSE_TIME: Duration = Duration::from_millis(2500);

//
// ──────────────────────────────────────────────────────────────
//   3. RUNTIME
// ──────────────────────────────────────────────────────────────
//

/// Capacity of the command channel into the building task
pub const COMMAND_CHANNEL_SIZE: usize = 100;

/// Poll period when forwarding stdin lines to the building task
pub const INPUT_POLL: Duration = Duration::from_millis(10);

/// Minimum time between two printed building tables
pub const VIEW_PRINT_INTERVAL: Duration = Duration::from_millis(500);

//
// ──────────────────────────────────────────────────────────────
//   4. LOGGING CONFIGURATION
// ──────────────────────────────────────────────────────────────
//

/// Enable/disable printing of the building table
pub static PRINT_VIEW_ON: Lazy<Mutex<bool>> = Lazy::new(|| Mutex::new(true));

/// Enable/disable printing of errors
pub static PRINT_ERR_ON: Lazy<Mutex<bool>> = Lazy::new(|| Mutex::new(true));

/// Enable/disable printing of warnings
pub static PRINT_WARN_ON: Lazy<Mutex<bool>> = Lazy::new(|| Mutex::new(true));

/// Enable/disable printing of success messages
pub static PRINT_OK_ON: Lazy<Mutex<bool>> = Lazy::new(|| Mutex::new(true));

/// Enable/disable printing of general info
pub static PRINT_INFO_ON: Lazy<Mutex<bool>> = Lazy::new(|| Mutex::new(true));

/// Enable/disable dispatch decisions and miscellaneous debug prints
pub static PRINT_ELSE_ON: Lazy<Mutex<bool>> = Lazy::new(|| Mutex::new(true));

//
// ──────────────────────────────────────────────────────────────
//   5. BUILDING CONFIGURATION
// ──────────────────────────────────────────────────────────────
//

/// Which scheduling policy the lifts follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Policy {
    /// A lift travels straight to its assigned target. Requests arriving while every lift is busy are dropped.
    #[default]
    Direct,
    /// Lifts keep a stop queue, step one floor at a time and serve queued floors they pass.
    Queue,
}

/// Durations of the timed phases of a lift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timing {
    /// Per-floor travel time of a direct move
    pub unit_travel: Duration,
    /// Duration of one step in the queue policy
    pub step_travel: Duration,
    /// Time the doors are held open
    pub door_open: Duration,
    /// Time the doors take to close
    pub door_close: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            unit_travel: UNIT_TRAVEL_TIME,
            step_travel: STEP_TRAVEL_TIME,
            door_open: DOOR_OPEN_TIME,
            door_close: DOOR_CLOSE_TIME,
        }
    }
}

impl Timing {
    /// Total length of one door cycle (open + close).
    pub fn door_cycle(&self) -> Duration {
        self.door_open + self.door_close
    }
}

/// Immutable description of a building. Regenerating a building means building a new one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildingConfig {
    /// Number of floors, at least 1
    pub floor_count: u8,
    /// Number of lifts, at least 1
    pub lift_count: u8,
    /// Scheduling policy
    pub policy: Policy,
    /// Phase durations
    pub timing: Timing,
}

impl Default for BuildingConfig {
    fn default() -> Self {
        Self {
            floor_count: DEFAULT_NUM_FLOORS,
            lift_count: DEFAULT_NUM_LIFTS,
            policy: Policy::Direct,
            timing: Timing::default(),
        }
    }
}

impl BuildingConfig {
    /// Creates a direct-policy configuration with default timing.
    ///
    /// ## Errors
    /// [LiftError::InvalidConfiguration] if either count is 0.
    pub fn new(floor_count: u8, lift_count: u8) -> Result<Self, LiftError> {
        let config = Self {
            floor_count,
            lift_count,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Returns the config with another policy
    pub fn with_policy(mut self, policy: Policy) -> Self {
        self.policy = policy;
        self
    }

    /// Returns the config with other phase durations
    pub fn with_timing(mut self, timing: Timing) -> Self {
        self.timing = timing;
        self
    }

    /// Checks `floor_count >= 1` and `lift_count >= 1`.
    pub fn validate(&self) -> Result<(), LiftError> {
        if self.floor_count < 1 || self.lift_count < 1 {
            return Err(LiftError::InvalidConfiguration(format!(
                "{} floors and {} lifts (both must be at least 1)",
                self.floor_count, self.lift_count
            )));
        }
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_counts_are_rejected() {
        assert!(matches!(BuildingConfig::new(0, 2), Err(LiftError::InvalidConfiguration(_))));
        assert!(matches!(BuildingConfig::new(5, 0), Err(LiftError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_minimal_building_is_valid() {
        let config = BuildingConfig::new(1, 1).unwrap();
        assert_eq!(config.policy, Policy::Direct);
        assert_eq!(config.timing.unit_travel, Duration::from_millis(3000));
        assert_eq!(config.timing.door_cycle(), Duration::from_millis(5000));
    }
}
