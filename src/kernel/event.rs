use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::format::OutputFormat;

pub const PROCESSING_MESSAGE: &str = "Processing ...";
pub const INVOCATION_ERROR_MESSAGE: &str = "Error invoking REST call";
pub const TRANSPORT_ERROR_MESSAGE: &str = "Error processing REST call";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    Transport,
    Invocation,
}

impl FailureReason {
    /// The only text a user ever sees for a failure.
    pub fn message(self) -> &'static str {
        match self {
            FailureReason::Transport => TRANSPORT_ERROR_MESSAGE,
            FailureReason::Invocation => INVOCATION_ERROR_MESSAGE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "content", rename_all = "snake_case")]
pub enum RequestOutcome {
    /// Raw response body, untouched.
    Rendered(String),
    Failed(FailureReason),
}

impl RequestOutcome {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            RequestOutcome::Rendered(_) => OutcomeKind::Rendered,
            RequestOutcome::Failed(FailureReason::Transport) => OutcomeKind::TransportFailed,
            RequestOutcome::Failed(FailureReason::Invocation) => OutcomeKind::InvocationFailed,
        }
    }
}

/// Content-free classification of an outcome, safe for telemetry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    Rendered,
    TransportFailed,
    InvocationFailed,
}

/// A single write to the display sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkUpdate<'a> {
    Processing,
    Rendered { format: OutputFormat, body: &'a str },
    Failed(FailureReason),
}

impl<'a> SinkUpdate<'a> {
    pub fn from_outcome(format: OutputFormat, outcome: &'a RequestOutcome) -> Self {
        match outcome {
            RequestOutcome::Rendered(body) => SinkUpdate::Rendered { format, body },
            RequestOutcome::Failed(reason) => SinkUpdate::Failed(*reason),
        }
    }

    /// Exactly what a plain-text display shows.
    pub fn text(&self) -> &'a str {
        match *self {
            SinkUpdate::Processing => PROCESSING_MESSAGE,
            SinkUpdate::Rendered { body, .. } => body,
            SinkUpdate::Failed(reason) => reason.message(),
        }
    }
}

/// Final report for one dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    pub request_id: Uuid,
    pub format: OutputFormat,
    #[serde(flatten)]
    pub outcome: RequestOutcome,
    /// False only when sequencing dropped a stale result.
    pub applied: bool,
}
