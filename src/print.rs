//! ## Printing Module
//!
//! This module is only here to make logging in the terminal easier to read.
//! It allows to print in appropriate colors depending on the situation, each kind gated by its
//! switch in [crate::config]. It also provides a table print-format for the [BuildingView].
use std::sync::Mutex;

use ansi_term::Colour::{self, Green, Purple, Red, Yellow};
use once_cell::sync::Lazy;
use prettytable::{format, Cell, Row, Table};
use unicode_width::UnicodeWidthStr;

use crate::config;
use crate::world_view::{BuildingView, Dirn, LiftContainer, LiftState};


/// Reads a print switch. A poisoned switch counts as off.
fn enabled(flag: &Lazy<Mutex<bool>>) -> bool {
    flag.lock().map(|on| *on).unwrap_or(false)
}

/// Prints a message in a specified color to the terminal.
///
/// If `PRINT_ELSE_ON` is `false`, the message will not be printed.
///
/// ## Example
/// ```
/// use ansi_term::Colour;
/// use liftdispatch::print;
///
/// print::color("Hello, World!".to_string(), Colour::Green);
/// ```
pub fn color(msg: String, color: Colour) {
    if enabled(&config::PRINT_ELSE_ON) {
        println!("{}{}\n", color.paint("[CUSTOM]:  "), color.paint(msg));
    }
}

/// Prints an error message in red to the terminal.
///
/// If `PRINT_ERR_ON` is `false`, the message will not be printed.
///
/// ## Terminal output
/// - "\[ERROR\]:   {}", msg
///
/// ## Example
/// ```
/// use liftdispatch::print;
///
/// print::err("Something went wrong!".to_string());
/// ```
pub fn err(msg: String) {
    if enabled(&config::PRINT_ERR_ON) {
        println!("{}{}\n", Red.paint("[ERROR]:   "), Red.paint(msg));
    }
}

/// Prints a warning message in yellow to the terminal.
///
/// If `PRINT_WARN_ON` is `false`, the message will not be printed.
///
/// ## Terminal output
/// - "\[WARNING\]: {}", msg
pub fn warn(msg: String) {
    if enabled(&config::PRINT_WARN_ON) {
        println!("{}{}\n", Yellow.paint("[WARNING]: "), Yellow.paint(msg));
    }
}

/// Prints a success message in green to the terminal.
///
/// If `PRINT_OK_ON` is `false`, the message will not be printed.
///
/// ## Terminal output
/// - "\[OK\]:      {}", msg
pub fn ok(msg: String) {
    if enabled(&config::PRINT_OK_ON) {
        println!("{}{}\n", Green.paint("[OK]:      "), Green.paint(msg));
    }
}

/// Prints an informational message in light blue to the terminal.
///
/// If `PRINT_INFO_ON` is `false`, the message will not be printed.
///
/// ## Terminal output
/// - "\[INFO\]:    {}", msg
pub fn info(msg: String) {
    let light_blue = Colour::RGB(102, 178, 255);
    if enabled(&config::PRINT_INFO_ON) {
        println!("{}{}\n", light_blue.paint("[INFO]:    "), light_blue.paint(msg));
    }
}

/// Prints a dispatch decision in pink to the terminal.
///
/// If `PRINT_ELSE_ON` is `false`, the message will not be printed.
///
/// ## Terminal output
/// - "\[DISPATCH\]: {}", msg
pub fn dispatch(msg: String) {
    let pink = Colour::RGB(255, 51, 255);
    if enabled(&config::PRINT_ELSE_ON) {
        println!("{}{}\n", pink.paint("[DISPATCH]: "), pink.paint(msg));
    }
}

/// Prints an error for something that should be impossible, with the rest of the line in a
/// rainbow so it stands out in a busy log.
///
/// ## Terminal output
/// - "\[ERROR\]: Cosmic rays flipped a bit! IN: {fun}"
pub fn cosmic_err(fun: String) {
    if !enabled(&config::PRINT_ERR_ON) {
        return;
    }
    print!("{}", Red.paint("[ERROR]: "));

    let colors = [
        Colour::Red,
        Colour::Yellow,
        Colour::Green,
        Colour::Cyan,
        Colour::Blue,
        Colour::Purple,
    ];

    let message = format!("Cosmic rays flipped a bit! IN: {}", fun);
    for (i, c) in message.chars().enumerate() {
        let color = colors[i % colors.len()];
        print!("{}", color.paint(c.to_string()));
    }

    println!();
}

/// Pads the input text to a fixed display width using spaces.
///
/// Accounts for characters that take more than one column (arrows, emoji), so the table
/// columns stay aligned.
fn pad_text(text: &str, width: usize) -> String {
    let visible_width = UnicodeWidthStr::width(text);
    let padding = width.saturating_sub(visible_width);
    format!("{}{}", text, " ".repeat(padding))
}

/// Human-readable status of a lift, e.g. `⬆ Moving`.
fn state_label(lift: &LiftContainer) -> String {
    match (lift.state, lift.dirn) {
        (LiftState::Idle, _) => "Idle".to_string(),
        (LiftState::Moving, Dirn::Up) => "⬆ Moving".to_string(),
        (LiftState::Moving, Dirn::Down) => "⬇ Moving".to_string(),
        (LiftState::Moving, Dirn::Stop) => "Moving".to_string(),
        (LiftState::DoorsOpen, _) => "Doors open".to_string(),
        (LiftState::DoorsClosing, _) => "Doors closing".to_string(),
    }
}

fn state_colour(state: LiftState) -> Colour {
    match state {
        LiftState::Idle => Green,
        LiftState::Moving => Yellow,
        LiftState::DoorsOpen | LiftState::DoorsClosing => Purple,
    }
}

/// Builds the lift table printed by [building].
pub fn building_table(view: &BuildingView) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BOX_CHARS);
    table.set_titles(Row::new(vec![
        Cell::new("ID"),
        Cell::new("Floor"),
        Cell::new("Status"),
        Cell::new("Target"),
        Cell::new("Queued stops"),
    ]));

    for lift in &view.lifts {
        let status = pad_text(&state_label(lift), 14);
        let target = lift.target.map(|t| t.to_string()).unwrap_or_else(|| "-".to_string());
        let stops = if lift.pending_stops.is_empty() {
            "-".to_string()
        } else {
            lift.pending_stops.iter().map(|f| f.to_string()).collect::<Vec<_>>().join(" → ")
        };

        table.add_row(Row::new(vec![
            Cell::new(&lift.lift_id.to_string()),
            Cell::new(&lift.current_floor.to_string()),
            Cell::new(&state_colour(lift.state).paint(status).to_string()),
            Cell::new(&target),
            Cell::new(&stops),
        ]));
    }
    table
}

/// Logs the current [BuildingView] to the terminal as a table.
///
/// If `PRINT_VIEW_ON` is `false`, the function exits early.
pub fn building(view: &BuildingView) {
    if !enabled(&config::PRINT_VIEW_ON) {
        return;
    }
    println!(
        "{}",
        Colour::Cyan.bold().paint(format!(
            "BUILDING  gen {} | {} floors | {:?} policy | {} dropped",
            view.generation, view.floor_count, view.policy, view.dropped_requests
        ))
    );
    building_table(view).printstd();
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Policy;

    #[test]
    fn test_pad_text_counts_display_width() {
        assert_eq!(pad_text("Idle", 6), "Idle  ");
        assert_eq!(UnicodeWidthStr::width(pad_text("⬆ Moving", 10).as_str()), 10);
        assert_eq!(pad_text("too long", 3), "too long");
    }

    #[test]
    fn test_table_has_row_per_lift() {
        let view = BuildingView {
            generation: 0,
            floor_count: 5,
            policy: Policy::Direct,
            dropped_requests: 0,
            lifts: vec![
                LiftContainer {
                    lift_id: 0,
                    current_floor: 0,
                    state: LiftState::Idle,
                    dirn: Dirn::Stop,
                    target: None,
                    pending_stops: vec![],
                },
                LiftContainer {
                    lift_id: 1,
                    current_floor: 2,
                    state: LiftState::Moving,
                    dirn: Dirn::Up,
                    target: Some(4),
                    pending_stops: vec![],
                },
            ],
        };
        let table = building_table(&view);
        assert_eq!(table.len(), 2);
        let rendered = table.to_string();
        assert!(rendered.contains("Moving"));
        assert!(rendered.contains('4'));
    }
}
