//! Polling of button presses.
//!
//! The "buttons" of the simulator are lines typed on stdin. Reading stdin blocks, so it runs on
//! its own thread and hands every line over a crossbeam channel to the async side.

use crossbeam_channel as cbc;
use std::io::BufRead;
use std::thread;

use crate::print;


/// Spawns a thread forwarding every non-empty stdin line on `ch`.
///
/// The thread ends on EOF, on a read error, or when the receiver is dropped. Dropping `ch` at
/// that point disconnects the channel, which the receiving side treats as "quit".
pub fn stdin_lines(ch: cbc::Sender<String>) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let stdin = std::io::stdin();
        forward_lines(stdin.lock(), ch);
    })
}

/// Forwards trimmed, non-empty lines from `reader` until it is exhausted.
pub fn forward_lines<R: BufRead>(reader: R, ch: cbc::Sender<String>) {
    for line in reader.lines() {
        match line {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if ch.send(line.to_string()).is_err() {
                    return;
                }
            }
            Err(e) => {
                print::err(format!("Failed to read stdin: {}", e));
                return;
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_lines_skips_blank_lines() {
        let (tx, rx) = cbc::unbounded();
        forward_lines("3 up\n\n   \nregen 5 2\n".as_bytes(), tx);

        let lines: Vec<String> = rx.try_iter().collect();
        assert_eq!(lines, vec!["3 up".to_string(), "regen 5 2".to_string()]);
        // sender dropped at EOF
        assert!(rx.recv().is_err());
    }
}
