//! Start-up and input parsing.
//!
//! Turns command-line arguments into a [BuildingConfig] and stdin lines into [Command]s.

use std::env;
use std::sync::Mutex;

use anyhow::{anyhow, bail, Context};
use once_cell::sync::Lazy;

use crate::config::{self, BuildingConfig, Policy};
use crate::elevio::CallType;
use crate::error::LiftError;
use crate::manager::Command;


/// What the program should do after reading its arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Launch {
    /// Start a building with this configuration
    Run(BuildingConfig),
    /// Print [HELP] and exit
    Help,
}

/// Text printed by the `help` argument.
pub const HELP: &str = "\
Available arguments:
  floors::N                 number of floors (default 6)
  lifts::N                  number of lifts (default 3)
  policy::direct|queue      scheduling policy (default direct)
  print_view::true/false    print the building table on every change
  print_err::true/false
  print_warn::true/false
  print_ok::true/false
  print_info::true/false
  print_else::true/false    dispatch decisions and other messages
  debug                     only error messages are printed
  help                      print this text

Commands while running:
  <floor>                   request a lift to <floor>
  <floor> up|down           press a hall button
  regen <floors> <lifts>    generate a new building
  status                    print the building table
  json                      print the building as JSON
  quit";

fn set_flag(flag: &Lazy<Mutex<bool>>, value: bool) {
    if let Ok(mut on) = flag.lock() {
        *on = value;
    }
}

/// ### Reads arguments from `cargo run`
///
/// See [parse_args_from].
pub fn parse_args() -> anyhow::Result<Launch> {
    parse_args_from(env::args().skip(1))
}

/// ### Parses `key::value` arguments
///
/// Building arguments:
///
/// `floors::N` &rarr; Number of floors, at least 1
/// `lifts::N` &rarr; Number of lifts, at least 1
/// `policy::(direct/queue)` &rarr; Scheduling policy
///
/// Print arguments, which change the global switches in [crate::config] right away:
///
/// `print_view::(true/false)` &rarr; Prints the building table when it changes
/// `print_err::(true/false)` &rarr; Prints error messages
/// `print_warn::(true/false)` &rarr; Prints warning messages
/// `print_ok::(true/false)` &rarr; Prints OK messages
/// `print_info::(true/false)` &rarr; Prints informational messages
/// `print_else::(true/false)` &rarr; Prints dispatch decisions and color messages
/// `debug` &rarr; Disables all prints except error messages
/// `help` &rarr; Returns [Launch::Help]
///
/// Unknown keys are reported and skipped. Missing building arguments take the defaults.
///
/// ## Errors
/// A floor or lift count that is not a number in `1..=255`, or an unknown policy.
pub fn parse_args_from<I, S>(args: I) -> anyhow::Result<Launch>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut floors = config::DEFAULT_NUM_FLOORS.to_string();
    let mut lifts = config::DEFAULT_NUM_LIFTS.to_string();
    let mut policy = Policy::default();

    for arg in args {
        let arg = arg.as_ref().to_lowercase();
        let (key, value) = match arg.split_once("::") {
            Some((key, value)) => (key, value),
            None => (arg.as_str(), ""),
        };
        let is_true = value == "true";

        match key {
            "help" => return Ok(Launch::Help),
            "floors" => floors = value.to_string(),
            "lifts" => lifts = value.to_string(),
            "policy" => policy = parse_policy(value)?,
            "print_view" => set_flag(&config::PRINT_VIEW_ON, is_true),
            "print_err" => set_flag(&config::PRINT_ERR_ON, is_true),
            "print_warn" => set_flag(&config::PRINT_WARN_ON, is_true),
            "print_ok" => set_flag(&config::PRINT_OK_ON, is_true),
            "print_info" => set_flag(&config::PRINT_INFO_ON, is_true),
            "print_else" => set_flag(&config::PRINT_ELSE_ON, is_true),
            "debug" => {
                // Kun error-meldingar
                set_flag(&config::PRINT_VIEW_ON, false);
                set_flag(&config::PRINT_WARN_ON, false);
                set_flag(&config::PRINT_OK_ON, false);
                set_flag(&config::PRINT_INFO_ON, false);
                set_flag(&config::PRINT_ELSE_ON, false);
            }
            _ => crate::print::warn(format!("Ignoring unknown argument '{}'", arg)),
        }
    }

    let (floor_count, lift_count) =
        parse_building_input(&floors, &lifts).context("bad building arguments")?;
    let config = BuildingConfig::new(floor_count, lift_count)?.with_policy(policy);
    Ok(Launch::Run(config))
}

fn parse_policy(value: &str) -> anyhow::Result<Policy> {
    match value {
        "direct" => Ok(Policy::Direct),
        "queue" => Ok(Policy::Queue),
        other => Err(anyhow!("unknown policy '{}', expected direct or queue", other)),
    }
}

/// Validates user-typed floor and lift counts.
///
/// ## Errors
/// [LiftError::InvalidConfiguration] if either value is not an integer, is below 1, or does not
/// fit a building (255 at most).
pub fn parse_building_input(floors: &str, lifts: &str) -> Result<(u8, u8), LiftError> {
    Ok((parse_count(floors, "floors")?, parse_count(lifts, "lifts")?))
}

fn parse_count(input: &str, what: &str) -> Result<u8, LiftError> {
    let value: i64 = input.trim().parse().map_err(|_| {
        LiftError::InvalidConfiguration(format!("{} must be a number, got '{}'", what, input.trim()))
    })?;
    if value < 1 {
        return Err(LiftError::InvalidConfiguration(format!("{} must be at least 1, got {}", what, value)));
    }
    u8::try_from(value)
        .map_err(|_| LiftError::InvalidConfiguration(format!("{} must be at most {}, got {}", what, u8::MAX, value)))
}

/// Parses one line typed while the building runs. See [HELP] for the accepted commands.
///
/// Floors are only checked for being integers here. The building checks them against its current
/// floor count when the command arrives.
pub fn parse_command(line: &str) -> anyhow::Result<Command> {
    let line = line.trim().to_lowercase();
    let words: Vec<&str> = line.split_whitespace().collect();

    let command = match words.as_slice() {
        ["quit" | "q" | "exit"] => Command::Quit,
        ["status" | "s"] => Command::Status,
        ["json"] => Command::Json,
        ["regen", floors, lifts] => {
            let (floor_count, lift_count) = parse_building_input(floors, lifts)?;
            Command::Regenerate { floor_count, lift_count }
        }
        [floor] => Command::Request(parse_floor(floor)?),
        [floor, "up" | "u"] => Command::Call { floor: parse_floor(floor)?, call_type: CallType::UP },
        [floor, "down" | "d"] => Command::Call { floor: parse_floor(floor)?, call_type: CallType::DOWN },
        [] => bail!("empty command"),
        _ => bail!("unknown command, type 'help' at start-up for the list"),
    };
    Ok(command)
}

fn parse_floor(word: &str) -> anyhow::Result<i64> {
    word.parse::<i64>().with_context(|| format!("'{}' is not a floor number", word))
}
