use futures::future::BoxFuture;
use reqwest::Url;

use crate::error::{InvocationError, TransportError};
use crate::kernel::format::OutputFormat;

pub const PROCESS_PATH: &str = "service/process";

/// A prepared call. Nothing has touched the network until it is polled.
pub type PendingCall = BoxFuture<'static, Result<String, TransportError>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessRequest {
    pub base_path: String,
    pub format: OutputFormat,
    pub document: String,
}

/// Seam between the dispatcher and the network.
///
/// `prepare` is synchronous and must not perform I/O: any error it returns is an invocation
/// failure. Errors from the returned future are transport failures.
pub trait Transport: Send + Sync + 'static {
    fn prepare(&self, request: ProcessRequest) -> Result<PendingCall, InvocationError>;
}

/// `<base-path>/service/process?format=<f>`
pub fn process_url(base_path: &str, format: OutputFormat) -> Result<Url, InvocationError> {
    let invalid = |reason: String| InvocationError::InvalidBasePath {
        base_path: base_path.to_string(),
        reason,
    };

    let raw = format!("{}/{}", base_path.trim_end_matches('/'), PROCESS_PATH);
    let mut url = Url::parse(&raw).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme `{}`", url.scheme())));
    }

    url.query_pairs_mut().append_pair("format", format.query_value());
    Ok(url)
}
