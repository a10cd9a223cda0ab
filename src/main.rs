//! CLI entry point for the COtrip connector.
//!
//! Each invocation performs a single run against one COtrip listing (or
//! prints a schema descriptor) and exits.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cotrip_connector::{
    config::Environment,
    fetch::{BasicClient, auth::ApiKey},
    schema::{SchemaType, schema},
    sink::{FileSink, HttpSink, LogSink, Sink},
    source::{DEFAULT_API, Source},
    task::{Event, Task},
};
use reqwest::Url;
use std::ffi::OsStr;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "cotrip_connector")]
#[command(about = "Pull COtrip incidents and signs as GeoJSON", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct RunArgs {
    /// Which COtrip listing to pull
    #[arg(value_enum)]
    source: Source,

    /// JSON settings file; falls back to environment variables when omitted
    #[arg(short, long)]
    env: Option<String>,

    /// COtrip API base URL
    #[arg(long, default_value = DEFAULT_API)]
    api: Url,

    /// Write the FeatureCollection to this file (`-` for stdout)
    #[arg(short, long, conflicts_with = "submit_url")]
    output: Option<String>,

    /// POST the FeatureCollection to this URL instead of writing it
    #[arg(long)]
    submit_url: Option<Url>,

    /// Bearer token for --submit-url (defaults to $SUBMIT_TOKEN)
    #[arg(long)]
    submit_token: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch, normalize and submit one listing
    Run(RunArgs),
    /// Print a JSON Schema descriptor
    Schema {
        #[arg(value_enum)]
        source: Source,

        #[arg(value_enum, short = 't', long = "type", default_value = "input")]
        kind: SchemaType,
    },
    /// Handle a host event such as {"type": "schema:input"}
    Invoke {
        /// Raw event JSON
        #[arg(long, default_value = "{}")]
        event: String,

        #[command(flatten)]
        run: RunArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/cotrip_connector.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("cotrip_connector.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => {
            dispatch(&args).await?;
        }
        Commands::Schema { source, kind } => {
            println!("{}", serde_json::to_string_pretty(&schema(source, kind))?);
        }
        Commands::Invoke { event, run } => {
            let event = Event::parse(&event).context("invalid event JSON")?;
            match event.schema_type() {
                Some(kind) => {
                    println!("{}", serde_json::to_string_pretty(&schema(run.source, kind))?);
                }
                None => dispatch(&run).await?,
            }
        }
    }

    Ok(())
}

/// Builds the task for `args` with the requested sink and runs it.
async fn dispatch(args: &RunArgs) -> Result<()> {
    let env = match &args.env {
        Some(path) => Environment::load(path)?,
        None => Environment::from_env()?,
    };

    match (&args.submit_url, &args.output) {
        (Some(url), _) => {
            let token = args
                .submit_token
                .clone()
                .or_else(|| std::env::var("SUBMIT_TOKEN").ok())
                .context("--submit-url requires --submit-token or SUBMIT_TOKEN")?;
            let client = ApiKey::bearer(BasicClient::new()?, &token)?;
            execute(args, env, HttpSink::new(client, url.clone())).await
        }
        (None, Some(path)) => execute(args, env, FileSink::new(path)).await,
        (None, None) => execute(args, env, LogSink).await,
    }
}

async fn execute<S: Sink>(args: &RunArgs, env: Environment, sink: S) -> Result<()> {
    let task = Task::new(args.source, env, args.api.clone(), BasicClient::new()?, sink);
    task.control().await?;

    info!(source = args.source.label(), "Run complete");
    Ok(())
}
