use std::sync::Mutex;

use super::sink::ResultSink;
use crate::kernel::event::SinkUpdate;

/// Holds the current display text and how many times it has been written.
#[derive(Debug, Default)]
pub struct MemorySink {
    inner: Mutex<Shown>,
}

#[derive(Debug, Default)]
struct Shown {
    text: String,
    writes: usize,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> String {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).text.clone()
    }

    pub fn writes(&self) -> usize {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).writes
    }
}

impl ResultSink for MemorySink {
    fn show(&self, update: SinkUpdate<'_>) {
        let mut shown = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        shown.text.clear();
        shown.text.push_str(update.text());
        shown.writes += 1;
    }
}
