//! # E-Voting Node
//!
//! Runs the voting program against an in-memory store.
//!
//! ## Commands
//!
//! - `demo` - Replays the built-in session: one proposal, three voters, one
//!   duplicate vote and one over-long description
//! - `run <script.json>` - Replays a script of signed steps
//!
//! Both print a JSON report with per-step outcomes and the final proposals.
//!
//! ## Startup Sequence
//!
//! 1. Load configuration (env, then CLI overrides)
//! 2. Initialize telemetry
//! 3. Build the runtime over an empty store
//! 4. Replay the script and print the report

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use evote_node::{NodeConfig, NodeRuntime, Script};

/// E-Voting Node: proposal and vote program host
#[derive(Parser, Debug)]
#[command(name = "evote-node", version)]
#[command(about = "Replay signed proposal/vote transactions and print the resulting tallies")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log filter, overrides EVOTE_LOG_LEVEL
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    /// Print Prometheus metrics after the report
    #[arg(long, global = true)]
    metrics: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the built-in demo session
    Demo,
    /// Replay a JSON script
    Run {
        /// Path to the script file
        script: PathBuf,
    },
}

fn load_config(cli: &Cli) -> Result<NodeConfig> {
    let mut config = NodeConfig::from_env().context("Failed to load configuration")?;
    if let Some(level) = &cli.log_level {
        config.telemetry.log_level = level.clone();
    }
    if cli.json_logs {
        config.telemetry.json_logs = true;
    }
    if cli.metrics {
        config.print_metrics = true;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    let _telemetry =
        evote_telemetry::init_telemetry(&config.telemetry).context("Failed to init telemetry")?;

    let script = match &cli.command {
        Command::Demo => Script::demo(),
        Command::Run { script } => {
            let json = std::fs::read_to_string(script)
                .with_context(|| format!("Failed to read {}", script.display()))?;
            Script::from_json(&json).with_context(|| format!("Failed to parse {}", script.display()))?
        }
    };

    let runtime = NodeRuntime::new(&config);
    let report = runtime.run(&script).await?;

    let stats = runtime.stats().await;
    info!(
        proposals_created = stats.proposals_created,
        votes_cast = stats.votes_cast,
        rejected = stats.rejected_transitions,
        "Run complete"
    );

    println!("{}", serde_json::to_string_pretty(&report)?);
    if config.print_metrics {
        print!("{}", evote_telemetry::encode_metrics()?);
    }

    Ok(())
}
