use thiserror::Error;

/// The call could not even be attempted. Raised synchronously, before any I/O.
#[derive(Debug, Error)]
pub enum InvocationError {
    #[error("invalid base path `{base_path}`: {reason}")]
    InvalidBasePath { base_path: String, reason: String },
    #[error("failed to build request: {0}")]
    RequestBuild(#[source] reqwest::Error),
    #[error("no async runtime available to drive the request")]
    NoRuntime,
}

/// The call was attempted and failed at the network or HTTP level.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("backend returned HTTP {status}")]
    Status { status: u16 },
    #[error("request timed out")]
    Timeout,
    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),
    #[error("connection dropped before a response arrived")]
    Disconnected,
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            return TransportError::Timeout;
        }
        match e.status() {
            Some(status) => TransportError::Status { status: status.as_u16() },
            None => TransportError::Request(e),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("base path cannot be empty")]
    EmptyBasePath,
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown format `{trigger}` (known: {known})")]
pub struct UnknownTrigger {
    pub trigger: String,
    pub known: String,
}
