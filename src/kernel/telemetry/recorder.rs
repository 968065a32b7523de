use std::collections::VecDeque;
use std::sync::Mutex;

use serde::Serialize;

use super::event::DispatchEvent;
use crate::kernel::event::OutcomeKind;

const MAX_EVENTS: usize = 10_000;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TelemetrySnapshot {
    pub dispatched: usize,
    pub rendered: usize,
    pub transport_failed: usize,
    pub invocation_failed: usize,
    pub superseded: usize,
}

/// Bounded ring of dispatch events. Shared between the dispatcher and its spawned calls.
#[derive(Debug)]
pub struct DispatchTelemetry {
    buffer: Mutex<VecDeque<DispatchEvent>>,
}

impl DispatchTelemetry {
    pub fn new() -> Self {
        Self {
            buffer: Mutex::new(VecDeque::with_capacity(64)),
        }
    }

    pub fn record(&self, event: DispatchEvent) {
        let mut buffer = self.buffer.lock().unwrap_or_else(|e| e.into_inner());
        if buffer.len() >= MAX_EVENTS {
            buffer.pop_front();
        }
        buffer.push_back(event);
    }

    pub fn events(&self) -> Vec<DispatchEvent> {
        let buffer = self.buffer.lock().unwrap_or_else(|e| e.into_inner());
        buffer.iter().cloned().collect()
    }

    pub fn snapshot(&self) -> TelemetrySnapshot {
        let buffer = self.buffer.lock().unwrap_or_else(|e| e.into_inner());
        compute_snapshot(&buffer)
    }
}

impl Default for DispatchTelemetry {
    fn default() -> Self {
        Self::new()
    }
}

pub fn compute_snapshot(events: &VecDeque<DispatchEvent>) -> TelemetrySnapshot {
    let mut snap = TelemetrySnapshot::default();
    for event in events {
        match event {
            DispatchEvent::Dispatched { .. } => snap.dispatched += 1,
            DispatchEvent::Completed { kind, .. } => match kind {
                OutcomeKind::Rendered => snap.rendered += 1,
                OutcomeKind::TransportFailed => snap.transport_failed += 1,
                OutcomeKind::InvocationFailed => snap.invocation_failed += 1,
            },
            DispatchEvent::Superseded { .. } => snap.superseded += 1,
        }
    }
    snap
}
