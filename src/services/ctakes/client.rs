use reqwest::header::{CACHE_CONTROL, CONTENT_TYPE, PRAGMA};
use reqwest::Client;

use super::transport::{process_url, PendingCall, ProcessRequest, Transport};
use crate::config::ClientConfig;
use crate::error::{InvocationError, TransportError};

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

/// reqwest-backed transport. Clones share one connection pool.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> reqwest::Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(Self { client: builder.build()? })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Transport for HttpTransport {
    fn prepare(&self, request: ProcessRequest) -> Result<PendingCall, InvocationError> {
        let url = process_url(&request.base_path, request.format)?;

        // Every call must reach the server; no intermediate caching.
        let http_request = self
            .client
            .post(url)
            .header(CONTENT_TYPE, TEXT_PLAIN)
            .header(CACHE_CONTROL, "no-cache")
            .header(PRAGMA, "no-cache")
            .body(request.document)
            .build()
            .map_err(InvocationError::RequestBuild)?;

        let client = self.client.clone();
        Ok(Box::pin(async move {
            let response = client.execute(http_request).await?;

            let status = response.status();
            if !status.is_success() {
                return Err(TransportError::Status { status: status.as_u16() });
            }

            Ok::<_, TransportError>(response.text().await?)
        }))
    }
}
