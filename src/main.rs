//! trip-planner CLI
//!
//! Reads one `{"mode", "payload"}` request as JSON from a file or stdin,
//! serves it against the Anthropic API, and prints the `{success, ...}`
//! response to stdout.

use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use trip_planner::{ExecCtx, PlannerConfig, TripPlanner};

#[derive(Debug, Parser)]
#[command(name = "trip-planner", version, about = "Plan road-trip content with an LLM")]
struct Cli {
    /// Request file (`{"mode": ..., "payload": ...}`); reads stdin when omitted
    #[arg(short, long, value_name = "FILE")]
    request: Option<PathBuf>,

    /// Model identifier (overrides TRIP_PLANNER_MODEL)
    #[arg(short, long)]
    model: Option<String>,

    /// Per-call deadline in seconds (overrides TRIP_PLANNER_TIMEOUT_SECS)
    #[arg(short, long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Pretty-print the response
    #[arg(short, long)]
    pretty: bool,
}

fn read_request(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(p) => std::fs::read_to_string(p)
            .with_context(|| format!("Failed to read request file {}", p.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read request from stdin")?;
            Ok(buf)
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let mut config = PlannerConfig::from_env();
    if let Some(model) = cli.model {
        config.llm = config.llm.with_model(model);
    }
    if let Some(secs) = cli.timeout {
        config.timeout = Duration::from_secs(secs);
    }
    info!(model = %config.llm.model, base_url = %config.base_url, "starting");

    let body = read_request(cli.request.as_ref())?;
    let ctx = ExecCtx::from_config(&config).context("Failed to set up HTTP client")?;
    let planner = TripPlanner::new().with_config(config.llm.clone());
    let response = planner.handle_json(&ctx, &body).await;

    let out = if cli.pretty {
        serde_json::to_string_pretty(&response)?
    } else {
        serde_json::to_string(&response)?
    };
    println!("{}", out);

    Ok(if response.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
