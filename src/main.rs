// u-sequence - sequential task scheduler
// Main entry point

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use u_sequence::config::AppConfig;
use u_sequence::models::Task;
use u_sequence::scheduler::SequentialScheduler;
use u_sequence::server;

#[derive(Parser, Debug)]
#[command(name = "u-sequence", version, about = "Sequential task scheduler")]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server
    Serve {
        /// Bind address (overrides config)
        #[arg(long)]
        bind: Option<String>,
    },
    /// Schedule tasks from a JSON file (or stdin) and print the schedule
    Solve {
        /// JSON array of { "name", "duration" }; reads stdin when omitted
        input: Option<PathBuf>,

        /// Print warnings and solver statistics alongside the schedule
        #[arg(long)]
        detailed: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config =
        AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Command::Serve { bind } => {
            if let Some(bind) = bind {
                config.server.bind_addr = bind;
            }
            server::serve(config).await
        }
        Command::Solve { input, detailed } => {
            let text = match input {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read {}", path.display()))?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin()
                        .read_to_string(&mut buf)
                        .context("Failed to read stdin")?;
                    buf
                }
            };
            let tasks: Vec<Task> = serde_json::from_str(&text).context("Invalid task list")?;

            let scheduler = SequentialScheduler::with_config(config.scheduler);
            let outcome = scheduler.schedule_blocking(tasks).await?;
            let json = if detailed {
                serde_json::to_string_pretty(&outcome)?
            } else {
                serde_json::to_string_pretty(&outcome.schedule)?
            };
            println!("{json}");
            Ok(())
        }
    }
}
