use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::routing::any;
use axum::Router;
use ctakes_client::kernel::event::{INVOCATION_ERROR_MESSAGE, TRANSPORT_ERROR_MESSAGE};
use ctakes_client::outputs::MemorySink;
use ctakes_client::{ClientConfig, FailureReason, HttpTransport, OutputFormat, RequestDispatcher, RequestOutcome};
use tokio::net::TcpListener;

#[derive(Debug, Clone)]
struct Seen {
    method: Method,
    path: String,
    query: Option<String>,
    content_type: Option<String>,
    cache_control: Option<String>,
    pragma: Option<String>,
    body: String,
}

#[derive(Clone)]
struct Backend {
    status: StatusCode,
    delay: Duration,
    seen: Arc<Mutex<Vec<Seen>>>,
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_string)
}

/// Echoes `<query>|<body>` so tests can see what arrived.
async fn process(
    State(backend): State<Backend>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, String) {
    backend.seen.lock().unwrap().push(Seen {
        method,
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        content_type: header(&headers, "content-type"),
        cache_control: header(&headers, "cache-control"),
        pragma: header(&headers, "pragma"),
        body: body.clone(),
    });

    if !backend.delay.is_zero() {
        tokio::time::sleep(backend.delay).await;
    }

    let reply = format!("{}|{}", uri.query().unwrap_or_default(), body);
    (backend.status, reply)
}

/// Starts a backend on an ephemeral port and returns its base path.
async fn spawn_backend(status: StatusCode, delay: Duration) -> (String, Arc<Mutex<Vec<Seen>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let backend = Backend { status, delay, seen: seen.clone() };
    let app = Router::new()
        .route("/ctakes-web-rest/service/process", any(process))
        .with_state(backend);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/ctakes-web-rest", addr), seen)
}

fn dispatcher(config: ClientConfig) -> RequestDispatcher<HttpTransport, MemorySink> {
    let transport = HttpTransport::new(&config).unwrap();
    RequestDispatcher::new(config, transport, Arc::new(MemorySink::new()))
}

#[tokio::test]
async fn test_post_per_format_with_document_body() {
    let (base_path, seen) = spawn_backend(StatusCode::OK, Duration::ZERO).await;
    let dispatcher = dispatcher(ClientConfig::new(&base_path).unwrap());

    for format in OutputFormat::ALL {
        let document = format!("Patient has a history of diabetes. ({format})");
        let completion = dispatcher.dispatch(format, document.clone()).wait().await;

        let expected = format!("format={}|{}", format.query_value(), document);
        assert_eq!(completion.outcome, RequestOutcome::Rendered(expected.clone()));
        assert_eq!(dispatcher.sink().current(), expected);
    }

    let seen = seen.lock().unwrap().clone();
    assert_eq!(seen.len(), 6, "one call per dispatch");
    for (request, format) in seen.iter().zip(OutputFormat::ALL) {
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.path, "/ctakes-web-rest/service/process");
        assert_eq!(request.query.as_deref(), Some(format!("format={}", format.query_value()).as_str()));
        assert_eq!(request.body, format!("Patient has a history of diabetes. ({format})"));
        assert_eq!(request.content_type.as_deref(), Some("text/plain; charset=utf-8"));
        assert_eq!(request.cache_control.as_deref(), Some("no-cache"));
        assert_eq!(request.pragma.as_deref(), Some("no-cache"));
    }
}

#[tokio::test]
async fn test_umls_request_shape() {
    let (base_path, seen) = spawn_backend(StatusCode::OK, Duration::ZERO).await;
    // Trailing slash on the mount point is tolerated.
    let dispatcher = dispatcher(ClientConfig::new(format!("{base_path}/")).unwrap());

    dispatcher.dispatch(OutputFormat::Umls, "Pt denies chest pain.").wait().await;

    let seen = seen.lock().unwrap();
    assert_eq!(seen[0].method, Method::POST);
    assert_eq!(seen[0].path, "/ctakes-web-rest/service/process");
    assert_eq!(seen[0].query.as_deref(), Some("format=umls"));
    assert_eq!(seen[0].body, "Pt denies chest pain.");
}

#[tokio::test]
async fn test_server_error_is_transport_failure() {
    let (base_path, seen) = spawn_backend(StatusCode::INTERNAL_SERVER_ERROR, Duration::ZERO).await;
    let dispatcher = dispatcher(ClientConfig::new(&base_path).unwrap());

    for format in OutputFormat::ALL {
        let completion = dispatcher.dispatch(format, "note").wait().await;
        assert_eq!(completion.outcome, RequestOutcome::Failed(FailureReason::Transport));
        assert_eq!(dispatcher.sink().current(), TRANSPORT_ERROR_MESSAGE);
    }
    assert_eq!(seen.lock().unwrap().len(), 6);
}

#[tokio::test]
async fn test_client_error_is_transport_failure() {
    let (base_path, _seen) = spawn_backend(StatusCode::BAD_REQUEST, Duration::ZERO).await;
    let dispatcher = dispatcher(ClientConfig::new(&base_path).unwrap());

    dispatcher.dispatch(OutputFormat::Cui, "").wait().await;
    assert_eq!(dispatcher.sink().current(), TRANSPORT_ERROR_MESSAGE);
}

#[tokio::test]
async fn test_connection_refused_is_transport_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let dispatcher = dispatcher(ClientConfig::new(format!("http://{addr}/ctakes-web-rest")).unwrap());
    let completion = dispatcher.dispatch(OutputFormat::Pretty, "note").wait().await;

    assert_eq!(completion.outcome, RequestOutcome::Failed(FailureReason::Transport));
    assert_eq!(dispatcher.sink().current(), TRANSPORT_ERROR_MESSAGE);
}

#[tokio::test]
async fn test_configured_timeout_is_transport_failure() {
    let (base_path, _seen) = spawn_backend(StatusCode::OK, Duration::from_secs(5)).await;
    let config = ClientConfig::new(&base_path)
        .unwrap()
        .with_timeout(Some(Duration::from_millis(200)));
    let dispatcher = dispatcher(config);

    dispatcher.dispatch(OutputFormat::Xmi, "note").wait().await;
    assert_eq!(dispatcher.sink().current(), TRANSPORT_ERROR_MESSAGE);
}

#[tokio::test]
async fn test_malformed_base_path_is_invocation_failure() {
    let dispatcher = dispatcher(ClientConfig::new("ctakes-web-rest").unwrap());

    let handle = dispatcher.dispatch(OutputFormat::Fhir, "note");

    assert!(handle.is_finished(), "no call is made, so nothing is pending");
    assert_eq!(dispatcher.sink().current(), INVOCATION_ERROR_MESSAGE);
    assert_eq!(
        handle.wait().await.outcome,
        RequestOutcome::Failed(FailureReason::Invocation)
    );
}
