//! Command-line front end for the intent router.
//!
//! Prints JSON on stdout; logs go to stderr.
//!
//! # Usage
//!
//! ```bash
//! intent-router classify "Calculate the cutting force for 4140 steel"
//! intent-router execute --pretty "Deploy a parallel swarm to extract all material properties"
//! cat tasks.txt | intent-router status
//! intent-router schema > execution-result.schema.json
//!
//! # Custom thresholds
//! intent-router --config router.toml plan "analyze spindle load trends"
//! INTENT_ROUTER_SIMPLE_WORDS=5 intent-router classify "verify the probe"
//! ```

use std::io::BufRead;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use intent_router::{ExecutionResult, RouterConfig, TaskRouter};
use serde::Serialize;
use tracing::{debug, info};

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML config file (overrides INTENT_ROUTER_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long, global = true, default_value_t = false)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify a description without recording a plan
    Classify { text: String },
    /// Assemble an execution plan
    Plan { text: String },
    /// Assemble a plan and print the executor-facing result
    Execute { text: String },
    /// Plan every stdin line, then print router status and history stats
    Status,
    /// Print the JSON Schema of the execute output
    Schema,
}

#[derive(Serialize)]
struct StatusReport {
    status: intent_router::RouterStatus,
    stats: intent_router::HistoryStats,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match &args.config {
        Some(path) => RouterConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => RouterConfig::from_env().context("invalid INTENT_ROUTER_* configuration")?,
    };
    let router = TaskRouter::from_config(config).context("failed to build router")?;

    match args.command {
        Command::Classify { text } => print_json(&router.classify(&text), args.pretty),
        Command::Plan { text } => print_json(&router.plan(&text), args.pretty),
        Command::Execute { text } => print_json(&router.execute(&text), args.pretty),
        Command::Status => {
            let stdin = std::io::stdin();
            let mut routed = 0usize;
            for line in stdin.lock().lines() {
                let line = line.context("failed to read stdin")?;
                if line.trim().is_empty() {
                    continue;
                }
                let plan = router.plan(&line);
                debug!(task_id = %plan.task_id, task_type = %plan.task_type, "Routed");
                routed += 1;
            }
            info!(routed, "Finished routing stdin");

            let report = StatusReport {
                status: router.status(),
                stats: router.history_stats(),
            };
            print_json(&report, args.pretty)
        }
        Command::Schema => print_json(&ExecutionResult::json_schema(), true),
    }
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", out);
    Ok(())
}
