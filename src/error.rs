//! Error types for the dispatch core.
//!
//! None of these are fatal to a running building. `InvalidConfiguration` only aborts the
//! construction attempt it came from, `InvalidFloor`/`InvalidCall` are rejected at the request
//! boundary before any lift is touched, and `NoAvailableLift` is a dropped request in the
//! direct-move policy.

use thiserror::Error;

use crate::world_view::{Dirn, Floor};

/// Errors surfaced by the building, the dispatcher and the input parsers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LiftError {
    /// Floor or lift count is missing, non-numeric or below 1.
    #[error("invalid building configuration: {0}")]
    InvalidConfiguration(String),

    /// A request for a floor outside `[0, floor_count)`.
    #[error("floor {floor} is outside the building (0..{floor_count})")]
    InvalidFloor {
        /// The requested floor, as given by the caller
        floor: i64,
        /// Number of floors in the building
        floor_count: u8,
    },

    /// A hall button that does not exist, e.g. `Up` on the top floor.
    #[error("there is no {dirn:?} button on floor {floor}")]
    InvalidCall {
        /// Floor of the call
        floor: Floor,
        /// Direction of the call
        dirn: Dirn,
    },

    /// Every lift is busy and the policy has no queueing fallback.
    #[error("no idle lift available for floor {floor}, request dropped")]
    NoAvailableLift {
        /// Floor that could not be served
        floor: Floor,
    },
}
