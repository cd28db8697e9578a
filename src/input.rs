//! Line input for the command loop.

use std::io::{self, BufRead, BufReader};
use std::thread;
use tokio::sync::mpsc;
use tracing::debug;

/// Forwards lines from a blocking reader over a channel.
///
/// The reader runs on its own OS thread which is never joined, so a read
/// that never returns cannot hold up runtime shutdown.
pub struct LineReader {
    rx: mpsc::UnboundedReceiver<String>,
}

impl LineReader {
    /// Read lines from standard input.
    pub fn stdin() -> Self {
        Self::spawn(BufReader::new(io::stdin()))
    }

    /// Read lines from `reader` until EOF, a read error, or the receiver is
    /// dropped.
    pub fn spawn<R>(reader: R) -> Self
    where
        R: BufRead + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();

        thread::spawn(move || {
            for line in reader.lines() {
                match line {
                    Ok(line) => {
                        if tx.send(line).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        debug!("Input closed: {}", e);
                        break;
                    }
                }
            }
        });

        Self { rx }
    }

    /// Receive the next line. `None` once input is exhausted.
    pub async fn next(&mut self) -> Option<String> {
        self.rx.recv().await
    }
}
