use std::io::Write;
use std::sync::Mutex;

use super::sink::ResultSink;
use crate::kernel::event::SinkUpdate;

/// Streams every update to a writer, one line-terminated block per update.
pub struct ConsoleSink {
    out: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleSink {
    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self { out: Mutex::new(out) }
    }
}

impl ResultSink for ConsoleSink {
    fn show(&self, update: SinkUpdate<'_>) {
        let mut out = self.out.lock().unwrap_or_else(|e| e.into_inner());
        let written = writeln!(out, "{}", update.text()).and_then(|_| out.flush());
        if let Err(e) = written {
            tracing::warn!("Failed to write to console: {}", e);
        }
    }
}
