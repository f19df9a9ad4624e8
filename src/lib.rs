#![warn(missing_docs)]
//! # This projects library
//!
//! This library simulates a building with a configurable number of floors and lifts, and dispatches
//! floor requests to the lifts.
//!
//! ## Overview
//! - **Config**: Building configuration, timing and print switches.
//! - **Error**: The error type of the dispatch core.
//! - **Init**: Argument and command parsing.
//! - **Print**: Color coded terminal logging.
//! - **Manager**: The dispatcher, the virtual-clock simulation and the real-time building task.
//! - **World View**: Serializable snapshots of the building.
//! - **Elevio**: Button input and render output.
//! - **Elevator Logic**: The lift state machine, the stop queue and the timers.

/// Global variables
pub mod config;

/// Error types
pub mod error;

/// Initialize functions
pub mod init;

/// Print functions with color coding
pub mod print;

pub mod manager;

pub mod world_view;

pub mod elevio;

pub mod elevator_logic;
