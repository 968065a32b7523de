use std::sync::Mutex;

/// Monotonic ticket handed out per dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

/// Opt-in last-issued-wins guard. A completion whose token is no longer the latest is stale
/// and must not touch the sink.
///
/// Issuing and checking both run their sink write under the same lock, so a newer
/// placeholder can never land between a stale check and its write.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: Mutex<u64>,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues the next token and runs `write` before any other token can be checked.
    pub fn issue_then<R>(&self, write: impl FnOnce() -> R) -> (RequestToken, R) {
        let mut latest = self.latest.lock().unwrap_or_else(|e| e.into_inner());
        *latest += 1;
        let token = RequestToken(*latest);
        (token, write())
    }

    /// Runs `write` only if `token` is still the latest, holding the lock throughout.
    pub fn if_current<R>(&self, token: RequestToken, write: impl FnOnce() -> R) -> Option<R> {
        let latest = self.latest.lock().unwrap_or_else(|e| e.into_inner());
        (*latest == token.0).then(write)
    }
}
