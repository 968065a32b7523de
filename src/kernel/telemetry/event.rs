use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::kernel::event::OutcomeKind;
use crate::kernel::format::OutputFormat;

// Allowed: ids, formats, kinds, durations, byte counts
// Forbidden: document text, response bodies

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DispatchEvent {
    Dispatched {
        request_id: Uuid,
        format: OutputFormat,
        document_bytes: usize,
    },

    Completed {
        request_id: Uuid,
        format: OutputFormat,
        kind: OutcomeKind,
        latency_ms: u64,
    },

    /// A terminal result arrived after a newer request was issued and was dropped.
    Superseded {
        request_id: Uuid,
        format: OutputFormat,
    },
}
