use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use futures::future::join_all;
use serde::Serialize;

use ctakes_client::config::{parse_timeout_secs, DEFAULT_BASE_PATH};
use ctakes_client::kernel::telemetry::TelemetrySnapshot;
use ctakes_client::outputs::{ConsoleSink, HtmlSink, MemorySink};
use ctakes_client::{
    ClientConfig, Completion, DispatchHandle, HttpTransport, OutputFormat, RequestDispatcher,
    ResultSink, TriggerTable,
};

#[derive(Parser)]
#[command(name = "ctakes-client")]
#[command(about = "Submit a clinical document to a cTAKES REST backend")]
struct Cli {
    /// Document to analyse (`-` or omitted reads stdin)
    input: Option<PathBuf>,

    /// Output format to request; repeat to fire several requests
    #[arg(short, long = "format", required = true)]
    formats: Vec<String>,

    /// Deployment mount point of the backend
    #[arg(long, env = "CTAKES_BASE_PATH", default_value = DEFAULT_BASE_PATH)]
    base_path: String,

    /// Client-side timeout in seconds (0 or unset: none)
    #[arg(long = "timeout-secs", env = "CTAKES_TIMEOUT_SECS", value_parser = parse_timeout_secs)]
    timeout: Option<Duration>,

    /// Only let the most recently issued request write a result
    #[arg(long, env = "CTAKES_SEQUENCED")]
    sequenced: bool,

    /// Print the final display region as an HTML fragment
    #[arg(long, conflicts_with = "json")]
    html: bool,

    /// HTML-escape markup bodies (with --html)
    #[arg(long, requires = "html")]
    escape: bool,

    /// Print completions and telemetry as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct Report<'a> {
    display: String,
    completions: &'a [Completion],
    telemetry: TelemetrySnapshot,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    execute(cli, std::io::stdin(), Box::new(std::io::stdout())).await
}

/// Failed requests are display states, not errors: only startup problems return `Err`.
async fn execute(cli: Cli, stdin: impl Read, mut out: Box<dyn Write + Send>) -> Result<()> {
    let formats = resolve_formats(&TriggerTable::default(), &cli.formats)?;
    let config = ClientConfig::new(cli.base_path)?
        .with_timeout(cli.timeout)
        .with_sequencing(cli.sequenced);

    let document = read_document(cli.input.as_deref(), stdin)?;
    let transport = HttpTransport::new(&config).context("failed to build HTTP client")?;

    tracing::info!(base_path = config.base_path(), requests = formats.len(), "Dispatching");

    if cli.html {
        let sink = Arc::new(HtmlSink::new(cli.escape));
        let dispatcher = RequestDispatcher::new(config, transport, sink);
        run(&dispatcher, &formats, &document).await;
        writeln!(out, "{}", dispatcher.sink().fragment())?;
    } else if cli.json {
        let sink = Arc::new(MemorySink::new());
        let dispatcher = RequestDispatcher::new(config, transport, sink);
        let completions = run(&dispatcher, &formats, &document).await;
        let report = Report {
            display: dispatcher.sink().current(),
            completions: &completions,
            telemetry: dispatcher.telemetry().snapshot(),
        };
        writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
    } else {
        let sink = Arc::new(ConsoleSink::new(out));
        let dispatcher = RequestDispatcher::new(config, transport, sink);
        run(&dispatcher, &formats, &document).await;
    }

    Ok(())
}

/// Each format is one trigger activation; all share the one sink.
async fn run<S: ResultSink>(
    dispatcher: &RequestDispatcher<HttpTransport, S>,
    formats: &[OutputFormat],
    document: &str,
) -> Vec<Completion> {
    let handles: Vec<DispatchHandle> = formats
        .iter()
        .map(|format| dispatcher.dispatch(*format, document))
        .collect();
    join_all(handles.into_iter().map(DispatchHandle::wait)).await
}

fn resolve_formats(table: &TriggerTable, triggers: &[String]) -> Result<Vec<OutputFormat>> {
    triggers
        .iter()
        .map(|trigger| Ok(table.lookup(trigger)?))
        .collect()
}

fn read_document(input: Option<&Path>, mut stdin: impl Read) -> Result<String> {
    match input {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        _ => {
            let mut text = String::new();
            stdin
                .read_to_string(&mut text)
                .context("failed to read document from stdin")?;
            Ok(text)
        }
    }
}
