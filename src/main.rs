use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use clap::{Args, Parser, Subcommand};
use jobsieve::config::AppConfig;
use jobsieve::error::AppError;
use jobsieve::intake::{RecordFormat, RecordImporter};
use jobsieve::telemetry;
use jobsieve::triage::{
    AdvisoryPolicy, ClassificationConfig, ClassificationMode, JobRecord, RunOutput, RunSummary,
    TriageRun,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
    classification: Arc<ClassificationConfig>,
}

#[derive(Parser, Debug)]
#[command(
    name = "jobsieve",
    about = "Triage harvested job postings into keep/skip with a reason trail",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Classify a scraper export and print the verdicts
    Classify(ClassifyArgs),
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Args, Debug)]
struct ClassifyArgs {
    /// CSV or JSON export of harvested postings
    #[arg(long)]
    input: PathBuf,
    /// Input layout (guessed from the extension when omitted)
    #[arg(long, value_enum)]
    format: Option<RecordFormat>,
    /// Reason aggregation mode (review or strict)
    #[arg(long, value_parser = parse_mode)]
    mode: Option<ClassificationMode>,
    /// Print every record with its verdict
    #[arg(long)]
    list: bool,
}

#[derive(Debug, Deserialize)]
struct ClassifyRequest {
    #[serde(default)]
    records: Vec<JobRecord>,
    #[serde(default)]
    records_csv: Option<String>,
    #[serde(default)]
    mode: Option<ClassificationMode>,
    #[serde(default)]
    advisory_policy: Option<AdvisoryPolicy>,
}

#[derive(Debug, Serialize)]
struct ClassifyResponse {
    summary: RunSummary,
    verdicts: Vec<VerdictView>,
}

#[derive(Debug, Serialize)]
struct VerdictView {
    index: usize,
    title: String,
    company: String,
    job_url: String,
    decision: &'static str,
    reason: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    advisories: Vec<String>,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Classify(args) => run_classify(args),
    }
}

fn parse_mode(raw: &str) -> Result<ClassificationMode, String> {
    ClassificationMode::parse(raw).ok_or_else(|| format!("'{raw}' is not review or strict"))
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
        classification: Arc::new(config.classification.clone()),
    };

    let app = router(state).layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        mode = config.classification.mode.label(),
        "posting triage service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/triage/classify", post(classify_endpoint))
        .with_state(state)
}

fn run_classify(args: ClassifyArgs) -> Result<(), AppError> {
    let ClassifyArgs {
        input,
        format,
        mode,
        list,
    } = args;

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let mut classification = config.classification;
    if let Some(mode) = mode {
        classification.mode = mode;
    }

    let records = RecordImporter::from_path(&input, format)?;
    info!(input = %input.display(), records = records.len(), "loaded postings");

    let mut run = TriageRun::new(classification);
    run.process_all(records);
    render_run(&run.finish(), list);

    Ok(())
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

async fn classify_endpoint(
    State(state): State<AppState>,
    Json(payload): Json<ClassifyRequest>,
) -> Result<Json<ClassifyResponse>, AppError> {
    let ClassifyRequest {
        mut records,
        records_csv,
        mode,
        advisory_policy,
    } = payload;

    if let Some(csv) = records_csv {
        let reader = Cursor::new(csv.into_bytes());
        records.extend(RecordImporter::from_reader(reader, RecordFormat::Csv)?);
    }

    let mut config = state.classification.as_ref().clone();
    if let Some(mode) = mode {
        config.mode = mode;
    }
    if let Some(policy) = advisory_policy {
        config.advisory_policy = policy;
    }

    // One request is one run: the dedupe set starts empty every time.
    let mut run = TriageRun::new(config);
    let mut verdicts = Vec::with_capacity(records.len());
    for (index, record) in records.into_iter().enumerate() {
        let title = record.title.clone();
        let company = record.company.clone();
        let job_url = record.job_url.clone();
        let verdict = run.process(record).clone();
        verdicts.push(VerdictView {
            index,
            title,
            company,
            job_url,
            decision: verdict.label(),
            reason: verdict.reason,
            advisories: verdict.advisories,
        });
    }

    Ok(Json(ClassifyResponse {
        summary: run.summary(),
        verdicts,
    }))
}

fn render_run(output: &RunOutput, list: bool) {
    let summary = &output.summary;

    println!("Posting triage ({} mode)", summary.mode);
    println!(
        "{} postings: {} kept, {} skipped, {} with advisories",
        summary.total, summary.kept, summary.skipped, summary.with_advisories
    );

    if summary.reason_counts.is_empty() {
        println!("\nSkip reasons: none");
    } else {
        println!("\nSkip reasons");
        for (reason, count) in &summary.reason_counts {
            println!("- {reason}: {count}");
        }
    }

    if list {
        println!("\nKept");
        for triaged in &output.kept {
            let note = if triaged.verdict.advisories.is_empty() {
                String::new()
            } else {
                format!(" ({})", triaged.verdict.advisories.join("; "))
            };
            println!(
                "- {} | {} | {}{}",
                triaged.record.title, triaged.record.company, triaged.record.job_url, note
            );
        }

        println!("\nSkipped");
        for triaged in &output.skipped {
            println!(
                "- {} | {} | {} | {}",
                triaged.record.title,
                triaged.record.company,
                triaged.record.job_url,
                triaged.verdict.reason
            );
        }
    }
}
