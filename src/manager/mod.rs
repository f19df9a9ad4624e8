//! # Manager
//!
//! Owns the building and decides which lift serves which request.
//!
//! - [`dispatcher`]: the assignment policy and the lift set.
//! - [`sim`]: the dispatcher on a virtual clock.
//! - [`run_building`]: the dispatcher on the tokio runtime, driven by a command channel and
//!   publishing a serialized [BuildingView] on a watch channel after every change.
//!
//! Only [run_building] touches the dispatcher while it runs, so all lift state changes happen one
//! at a time on that task, in the order commands and timers arrive.

pub mod dispatcher;
pub mod sim;

pub use dispatcher::{Assignment, Dispatcher};
pub use sim::Simulation;

use crossbeam_channel as cbc;
use tokio::sync::{mpsc, watch};
use tokio::time::sleep;

use crate::config::{self, BuildingConfig};
use crate::elevator_logic::timer::{Scheduler, TokioScheduler};
use crate::elevio::{CallButton, CallType, LiftRenderer};
use crate::init;
use crate::print;
use crate::world_view::{self, serial, BuildingView};


/// Commands accepted by [run_building].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// A request for a floor, direction unknown. Checked against the building when it arrives.
    Request(i64),
    /// A hall button press
    Call {
        /// Floor of the button, checked like [Command::Request]
        floor: i64,
        /// Which of the buttons on that floor
        call_type: CallType,
    },
    /// Throw the building away and generate a new one, keeping policy and timing
    Regenerate {
        /// Floors of the new building
        floor_count: u8,
        /// Lifts of the new building
        lift_count: u8,
    },
    /// Print the building table
    Status,
    /// Print the building as JSON
    Json,
    /// Stop the building task
    Quit,
}


/// Sender halves of the building channels.
pub struct BuildingTxs {
    /// Commands into the building task
    pub command: mpsc::Sender<Command>,
    /// Serialized [BuildingView] out of the building task
    pub view: watch::Sender<Vec<u8>>,
}

/// Receiver halves of the building channels.
pub struct BuildingRxs {
    #[allow(missing_docs)]
    pub command: mpsc::Receiver<Command>,
    #[allow(missing_docs)]
    pub view: watch::Receiver<Vec<u8>>,
}

/// All channels used around the building task.
pub struct BuildingChannels {
    #[allow(missing_docs)]
    pub txs: BuildingTxs,
    #[allow(missing_docs)]
    pub rxs: BuildingRxs,
}

impl BuildingChannels {
    /// Creates the command channel and an empty view watch.
    pub fn new() -> Self {
        let (command_tx, command_rx) = mpsc::channel::<Command>(config::COMMAND_CHANNEL_SIZE);
        let (view_tx, view_rx) = watch::channel::<Vec<u8>>(Vec::new());
        BuildingChannels {
            txs: BuildingTxs { command: command_tx, view: view_tx },
            rxs: BuildingRxs { command: command_rx, view: view_rx },
        }
    }
}

impl Default for BuildingChannels {
    fn default() -> Self {
        Self::new()
    }
}


fn publish(dispatcher: &Dispatcher, view_tx: &watch::Sender<Vec<u8>>) {
    if let Some(bytes) = serial::serialize_view(&dispatcher.view()) {
        view_tx.send_replace(bytes);
    }
}

fn handle_command(
    dispatcher: &mut Dispatcher,
    command: Command,
    scheduler: &mut dyn Scheduler,
    renderer: &mut dyn LiftRenderer,
) {
    match command {
        Command::Request(floor) => {
            let result = dispatcher
                .validate_floor(floor)
                .and_then(|floor| dispatcher.submit_request(floor, scheduler, renderer));
            if let Err(e) = result {
                print::warn(format!("Request rejected: {}", e));
            }
        }
        Command::Call { floor, call_type } => {
            let result = dispatcher
                .validate_floor(floor)
                .and_then(|floor| dispatcher.submit_call(CallButton { floor, call_type }, scheduler, renderer));
            if let Err(e) = result {
                print::warn(format!("Call rejected: {}", e));
            }
        }
        Command::Regenerate { floor_count, lift_count } => {
            let config = BuildingConfig { floor_count, lift_count, ..*dispatcher.config() };
            if let Err(e) = dispatcher.regenerate(config) {
                print::err(format!("Could not regenerate building: {}", e));
            }
        }
        Command::Status => print::building(&dispatcher.view()),
        Command::Json => {
            if let Some(json) = serial::view_to_json(&dispatcher.view()) {
                println!("{}", json);
            }
        }
        Command::Quit => {}
    }
}

/// Runs the building until [Command::Quit] arrives or every command sender is dropped.
///
/// ## Parameters
/// - `dispatcher`: the building to run
/// - `renderer`: receives the visual effects
/// - `command_rx`: requests and control commands
/// - `view_tx`: gets a serialized [BuildingView] after every command and timer
///
/// ## Returns
/// The final state of the building.
pub async fn run_building<R: LiftRenderer>(
    mut dispatcher: Dispatcher,
    mut renderer: R,
    mut command_rx: mpsc::Receiver<Command>,
    view_tx: watch::Sender<Vec<u8>>,
) -> BuildingView {
    let (mut scheduler, mut timer_rx) = TokioScheduler::channel();
    publish(&dispatcher, &view_tx);

    loop {
        tokio::select! {
            command = command_rx.recv() => {
                match command {
                    None | Some(Command::Quit) => break,
                    Some(command) => handle_command(&mut dispatcher, command, &mut scheduler, &mut renderer),
                }
            }
            Some(event) = timer_rx.recv() => {
                dispatcher.handle_timer(event, &mut scheduler, &mut renderer);
            }
        }
        publish(&dispatcher, &view_tx);
    }

    print::ok("Building stopped".to_string());
    dispatcher.view()
}

/// Forwards stdin lines from [crate::elevio::poll::stdin_lines] as commands.
///
/// Unparseable lines are reported and skipped. When the line channel disconnects (EOF), a
/// [Command::Quit] is sent.
pub async fn forward_input(line_rx: cbc::Receiver<String>, command_tx: mpsc::Sender<Command>) {
    loop {
        match line_rx.try_recv() {
            Ok(line) => match init::parse_command(&line) {
                Ok(command) => {
                    let quit = command == Command::Quit;
                    if command_tx.send(command).await.is_err() || quit {
                        return;
                    }
                }
                Err(e) => print::warn(format!("Could not parse '{}': {}", line, e)),
            },
            Err(cbc::TryRecvError::Empty) => sleep(config::INPUT_POLL).await,
            Err(cbc::TryRecvError::Disconnected) => {
                let _ = command_tx.send(Command::Quit).await;
                return;
            }
        }
    }
}

/// Prints the building table whenever the view changes, at most once per
/// [config::VIEW_PRINT_INTERVAL]. Ends when the building task is gone.
pub async fn print_view(mut view_rx: watch::Receiver<Vec<u8>>) {
    let mut view = world_view::get_view(&view_rx);
    while view_rx.changed().await.is_ok() {
        if world_view::update_view(&view_rx, &mut view) {
            if let Some(decoded) = serial::deserialize_view(&view) {
                print::building(&decoded);
            }
        }
        sleep(config::VIEW_PRINT_INTERVAL).await;
    }
}
