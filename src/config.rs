//! Client configuration.
//!
//! Resolved once at startup and handed to the dispatcher and transport. Nothing in the
//! request path reads the process environment.

use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_BASE_PATH: &str = "http://localhost:8080/ctakes-web-rest";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_path: String,
    timeout: Option<Duration>,
    sequenced: bool,
}

impl ClientConfig {
    /// The base path is the deployment's mount point, e.g. `http://host:8080/ctakes-web-rest`.
    /// Only blankness is checked here; URL validity is the transport's concern at call time.
    pub fn new(base_path: impl Into<String>) -> Result<Self, ConfigError> {
        let base_path = base_path.into();
        let trimmed = base_path.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::EmptyBasePath);
        }

        Ok(Self {
            base_path: trimmed.trim_end_matches('/').to_string(),
            timeout: None,
            sequenced: false,
        })
    }

    /// No timeout unless asked for; the transport's defaults apply otherwise.
    /// A zero duration means none.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout.filter(|t| !t.is_zero());
        self
    }

    /// Only the most recently issued request may write a terminal state to the sink.
    pub fn with_sequencing(mut self, sequenced: bool) -> Self {
        self.sequenced = sequenced;
        self
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn sequenced(&self) -> bool {
        self.sequenced
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_path: DEFAULT_BASE_PATH.to_string(),
            timeout: None,
            sequenced: false,
        }
    }
}

/// Parse a timeout given in whole seconds. Zero is accepted and disables the timeout.
pub fn parse_timeout_secs(raw: &str) -> Result<Duration, ConfigError> {
    let secs: u64 = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: "timeout",
        value: raw.to_string(),
    })?;
    Ok(Duration::from_secs(secs))
}
