use std::sync::Arc;
use std::time::Instant;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info_span, warn, Instrument};
use uuid::Uuid;

use super::event::{Completion, FailureReason, RequestOutcome, SinkUpdate};
use super::format::OutputFormat;
use super::lifecycle::{LifecycleEvent, RequestLifecycle};
use super::sequence::{RequestSequencer, RequestToken};
use super::telemetry::{DispatchEvent, DispatchTelemetry};
use crate::config::ClientConfig;
use crate::error::InvocationError;
use crate::outputs::ResultSink;
use crate::services::ctakes::{ProcessRequest, Transport};

/// Maps (format, document) to one backend call and routes the outcome to the sink.
///
/// Every format takes the same path. Errors never reach the caller: they end up as one of
/// the two fixed failure messages in the sink.
///
/// Without sequencing there is no ordering across dispatches: whichever call completes last
/// owns the sink, even if it was issued first.
pub struct RequestDispatcher<T: Transport, S: ResultSink> {
    config: ClientConfig,
    transport: Arc<T>,
    sink: Arc<S>,
    sequencer: Option<Arc<RequestSequencer>>,
    telemetry: Arc<DispatchTelemetry>,
}

impl<T: Transport, S: ResultSink> RequestDispatcher<T, S> {
    pub fn new(config: ClientConfig, transport: T, sink: Arc<S>) -> Self {
        let sequencer = config.sequenced().then(|| Arc::new(RequestSequencer::new()));
        Self {
            config,
            transport: Arc::new(transport),
            sink,
            sequencer,
            telemetry: Arc::new(DispatchTelemetry::new()),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn sink(&self) -> &Arc<S> {
        &self.sink
    }

    pub fn telemetry(&self) -> &Arc<DispatchTelemetry> {
        &self.telemetry
    }

    /// Fire-and-forget. The placeholder is in the sink when this returns; the terminal state
    /// arrives later. The handle may be dropped.
    pub fn dispatch(&self, format: OutputFormat, document: impl Into<String>) -> DispatchHandle {
        let request_id = Uuid::new_v4();
        let document = document.into();
        let span = info_span!("dispatch", %request_id, %format);
        let _entered = span.enter();

        let mut lifecycle = RequestLifecycle::new();
        lifecycle.advance(LifecycleEvent::Dispatched);

        // The token must be issued before the placeholder lands, under the same lock.
        let guard = match &self.sequencer {
            Some(seq) => {
                let (token, ()) = seq.issue_then(|| self.sink.show(SinkUpdate::Processing));
                Some((Arc::clone(seq), token))
            }
            None => {
                self.sink.show(SinkUpdate::Processing);
                None
            }
        };

        self.telemetry.record(DispatchEvent::Dispatched {
            request_id,
            format,
            document_bytes: document.len(),
        });

        let request = ProcessRequest {
            base_path: self.config.base_path().to_string(),
            format,
            document,
        };

        let prepared = Handle::try_current()
            .map_err(|_| InvocationError::NoRuntime)
            .and_then(|runtime| Ok((runtime, self.transport.prepare(request)?)));

        let (runtime, call) = match prepared {
            Ok(prepared) => prepared,
            Err(e) => {
                warn!("Error invoking REST call: {}", e);
                lifecycle.advance(LifecycleEvent::SetupFailed);

                let outcome = RequestOutcome::Failed(FailureReason::Invocation);
                self.telemetry.record(DispatchEvent::Completed {
                    request_id,
                    format,
                    kind: outcome.kind(),
                    latency_ms: 0,
                });
                let update = SinkUpdate::from_outcome(format, &outcome);
                let applied = show_if_current(self.sink.as_ref(), &guard, update);
                if !applied {
                    self.telemetry.record(DispatchEvent::Superseded { request_id, format });
                }

                return DispatchHandle::ready(Completion {
                    request_id,
                    format,
                    outcome,
                    applied,
                });
            }
        };

        let sink = Arc::clone(&self.sink);
        let telemetry = Arc::clone(&self.telemetry);
        let started = Instant::now();

        let task = runtime.spawn(
            async move {
                let outcome = match call.await {
                    Ok(body) => {
                        lifecycle.advance(LifecycleEvent::ResponseReceived);
                        debug!(bytes = body.len(), "response received");
                        RequestOutcome::Rendered(body)
                    }
                    Err(e) => {
                        lifecycle.advance(LifecycleEvent::TransportFailed);
                        warn!("Error processing REST call: {}", e);
                        RequestOutcome::Failed(FailureReason::Transport)
                    }
                };

                telemetry.record(DispatchEvent::Completed {
                    request_id,
                    format,
                    kind: outcome.kind(),
                    latency_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
                });

                let update = SinkUpdate::from_outcome(format, &outcome);
                let applied = show_if_current(sink.as_ref(), &guard, update);
                if !applied {
                    debug!("newer request issued, dropping stale result");
                    telemetry.record(DispatchEvent::Superseded { request_id, format });
                }

                Completion {
                    request_id,
                    format,
                    outcome,
                    applied,
                }
            }
            .instrument(span.clone()),
        );

        DispatchHandle::running(request_id, format, task)
    }
}

/// Writes a terminal update unless sequencing says a newer request owns the sink.
fn show_if_current<S: ResultSink>(
    sink: &S,
    guard: &Option<(Arc<RequestSequencer>, RequestToken)>,
    update: SinkUpdate<'_>,
) -> bool {
    match guard {
        Some((seq, token)) => seq.if_current(*token, || sink.show(update)).is_some(),
        None => {
            sink.show(update);
            true
        }
    }
}

/// Lets a caller observe a dispatch it would otherwise forget.
#[derive(Debug)]
pub struct DispatchHandle {
    request_id: Uuid,
    format: OutputFormat,
    state: HandleState,
}

#[derive(Debug)]
enum HandleState {
    Ready(Completion),
    Running(JoinHandle<Completion>),
}

impl DispatchHandle {
    fn ready(completion: Completion) -> Self {
        Self {
            request_id: completion.request_id,
            format: completion.format,
            state: HandleState::Ready(completion),
        }
    }

    fn running(request_id: Uuid, format: OutputFormat, task: JoinHandle<Completion>) -> Self {
        Self {
            request_id,
            format,
            state: HandleState::Running(task),
        }
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn is_finished(&self) -> bool {
        match &self.state {
            HandleState::Ready(_) => true,
            HandleState::Running(task) => task.is_finished(),
        }
    }

    pub async fn wait(self) -> Completion {
        match self.state {
            HandleState::Ready(completion) => completion,
            HandleState::Running(task) => match task.await {
                Ok(completion) => completion,
                Err(e) => {
                    warn!("Dispatch task ended abnormally: {}", e);
                    Completion {
                        request_id: self.request_id,
                        format: self.format,
                        outcome: RequestOutcome::Failed(FailureReason::Transport),
                        applied: false,
                    }
                }
            },
        }
    }
}
