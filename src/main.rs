use crossbeam_channel as cbc;

use liftdispatch::elevio::{poll, ConsoleRenderer};
use liftdispatch::init::{self, Launch};
use liftdispatch::manager::{self, BuildingChannels, Dispatcher};
use liftdispatch::print;


#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = match init::parse_args()? {
        Launch::Run(config) => config,
        Launch::Help => {
            println!("{}", init::HELP);
            return Ok(());
        }
    };

    let dispatcher = Dispatcher::new(config)?;
    print::ok(format!(
        "Building ready: {} floors, {} lifts, {:?} policy",
        config.floor_count, config.lift_count, config.policy
    ));

/* START ----------- Init av channels ---------------------- */
    let channels = BuildingChannels::new();
    let (line_tx, line_rx) = cbc::unbounded::<String>();
/* SLUTT ----------- Init av channels ---------------------- */

    // Stdin er blokkerande, så den får sin eigen tråd
    let _stdin_thread = poll::stdin_lines(line_tx);

    {
        let command_tx = channels.txs.command.clone();
        let _input_task = tokio::spawn(async move {
            print::info("Starter å lese kommandoar".to_string());
            manager::forward_input(line_rx, command_tx).await;
        });
    }
    {
        let view_rx = channels.rxs.view.clone();
        let _print_task = tokio::spawn(async move {
            manager::print_view(view_rx).await;
        });
    }

    let BuildingChannels { txs, rxs } = channels;
    drop(txs.command);
    let final_view = manager::run_building(dispatcher, ConsoleRenderer, rxs.command, txs.view).await;

    print::info(format!("Dropped requests: {}", final_view.dropped_requests));
    Ok(())
}
