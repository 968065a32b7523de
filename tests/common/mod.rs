#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use ctakes_client::error::{InvocationError, TransportError};
use ctakes_client::services::ctakes::{PendingCall, ProcessRequest, Transport};
use tokio::sync::oneshot;

pub const BASE_PATH: &str = "http://localhost:8080/ctakes-web-rest";

type Responder = oneshot::Sender<Result<String, TransportError>>;

/// In-process transport. Every prepared call stays pending until the test resolves it,
/// so tests control completion order.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    fail_setup: bool,
    calls: Mutex<Vec<(ProcessRequest, Option<Responder>)>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `prepare` fails before a call is created.
    pub fn failing_setup() -> Self {
        Self {
            inner: Arc::new(Inner {
                fail_setup: true,
                calls: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn requests(&self) -> Vec<ProcessRequest> {
        self.inner.calls.lock().unwrap().iter().map(|(r, _)| r.clone()).collect()
    }

    pub fn call_count(&self) -> usize {
        self.inner.calls.lock().unwrap().len()
    }

    pub fn succeed(&self, index: usize, body: &str) {
        self.resolve(index, Ok(body.to_string()));
    }

    pub fn fail_with_status(&self, index: usize, status: u16) {
        self.resolve(index, Err(TransportError::Status { status }));
    }

    /// Simulates the connection going away without a response.
    pub fn drop_call(&self, index: usize) {
        drop(self.take(index));
    }

    fn resolve(&self, index: usize, result: Result<String, TransportError>) {
        let _ = self.take(index).send(result);
    }

    fn take(&self, index: usize) -> Responder {
        self.inner.calls.lock().unwrap()[index]
            .1
            .take()
            .expect("call already resolved")
    }
}

impl Transport for ScriptedTransport {
    fn prepare(&self, request: ProcessRequest) -> Result<PendingCall, InvocationError> {
        if self.inner.fail_setup {
            return Err(InvocationError::InvalidBasePath {
                base_path: request.base_path,
                reason: "scripted setup failure".to_string(),
            });
        }

        let (tx, rx) = oneshot::channel();
        self.inner.calls.lock().unwrap().push((request, Some(tx)));
        Ok(Box::pin(async move {
            rx.await.unwrap_or(Err(TransportError::Disconnected))
        }))
    }
}
