// Asynchronous append-only diagnostic sink.
//
// Lines are handed to a dedicated writer thread over an unbounded channel,
// so logging never blocks a worker and a slow disk never backs up into the
// queue's synchronization path.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::mpsc::{self, Sender};
use std::thread::{self, JoinHandle};

/// Best-effort diagnostic log.
///
/// `log` is fire-and-forget: if the writer thread is gone or the disk write
/// fails, the line is dropped and the pipeline carries on.
pub struct EventLog {
    tx: Option<Sender<String>>,
    writer: Option<JoinHandle<()>>,
}

impl EventLog {
    /// Opens `path` for appending and starts the writer thread.
    pub fn to_file(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        Self::with_output(file)
    }

    fn with_output(mut file: File) -> io::Result<Self> {
        let (tx, rx) = mpsc::channel::<String>();
        let writer = thread::Builder::new()
            .name("event-log".into())
            .spawn(move || {
                for line in rx {
                    let _ = writeln!(file, "{line}");
                }
                let _ = file.flush();
            })?;

        Ok(Self {
            tx: Some(tx),
            writer: Some(writer),
        })
    }

    /// Queues a line for the writer thread. Never blocks.
    pub fn log(&self, message: impl Into<String>) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(message.into());
        }
    }
}

impl Drop for EventLog {
    fn drop(&mut self) {
        // Disconnect the channel so the writer drains its backlog and exits.
        drop(self.tx.take());
        if let Some(writer) = self.writer.take() {
            let _ = writer.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn temp_log_path(tag: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("packetflow-{tag}-{}.log", std::process::id()))
    }

    #[test]
    fn lines_reach_the_file() {
        let path = temp_log_path("lines");
        let _ = fs::remove_file(&path);

        let log = EventLog::to_file(&path).unwrap();
        log.log("queue initialized");
        log.log(format!("producer-{} started", 3));
        drop(log); // joins the writer, flushing the backlog

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("queue initialized"));
        assert!(contents.contains("producer-3 started"));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn log_after_writer_exit_is_dropped() {
        let path = temp_log_path("dropped");
        let _ = fs::remove_file(&path);

        let mut log = EventLog::to_file(&path).unwrap();
        // Simulate a dead writer; log must not panic or block.
        drop(log.tx.take());
        if let Some(writer) = log.writer.take() {
            writer.join().unwrap();
        }
        log.log("goes nowhere");

        let _ = fs::remove_file(&path);
    }
}
