use serde::{Deserialize, Serialize};

/// Lifecycle of a single dispatch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestState {
    #[default]
    Idle,
    /// Placeholder written, call prepared or in flight.
    Processing,
    Succeeded,
    /// Setup failed before any network I/O.
    InvocationFailed,
    /// The call was made and failed.
    TransportFailed,
}

impl RequestState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            RequestState::Succeeded | RequestState::InvocationFailed | RequestState::TransportFailed
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    Dispatched,
    SetupFailed,
    TransportFailed,
    ResponseReceived,
}

pub struct LifecycleGraph;

impl LifecycleGraph {
    /// (current, event) -> next. `None` means the event is not valid here.
    /// Terminal states accept nothing.
    pub fn transition(current: RequestState, event: LifecycleEvent) -> Option<RequestState> {
        use LifecycleEvent as E;
        use RequestState::*;

        match (current, event) {
            (Idle, E::Dispatched) => Some(Processing),
            (Processing, E::SetupFailed) => Some(InvocationFailed),
            (Processing, E::TransportFailed) => Some(TransportFailed),
            (Processing, E::ResponseReceived) => Some(Succeeded),
            _ => None,
        }
    }
}

/// Tracks one invocation through the graph. Invalid events are ignored and reported.
#[derive(Debug, Default)]
pub struct RequestLifecycle {
    state: RequestState,
}

impl RequestLifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> RequestState {
        self.state
    }

    /// Returns the new state, or `None` if the event was rejected (state unchanged).
    pub fn advance(&mut self, event: LifecycleEvent) -> Option<RequestState> {
        let next = LifecycleGraph::transition(self.state, event)?;
        tracing::debug!(from = ?self.state, to = ?next, "request lifecycle");
        self.state = next;
        Some(next)
    }
}
