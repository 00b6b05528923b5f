use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "napnote", version, about = "Napnote sleep tracking CLI")]
struct Cli {
    /// Read sessions from this JSON file instead of the session log
    #[arg(long, global = true, value_name = "FILE")]
    sessions: Option<PathBuf>,

    /// Evaluate as of this RFC 3339 instant instead of the current time
    #[arg(long, global = true, value_name = "RFC3339")]
    now: Option<String>,

    /// Child age in months (defaults to the age from child.birth_date)
    #[arg(long, global = true, value_name = "MONTHS")]
    age: Option<u32>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start or end sleep
    Sleep {
        #[command(subcommand)]
        action: commands::sleep::SleepAction,
    },
    /// Sleep statistics
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Predict the next wake or nap
    Predict,
    /// Age-based wake window and daily sleep targets
    Recommend,
    /// AI sleep recommendations for the past week
    Insights,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("NAPNOTE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_logging();

    let cli = Cli::parse();
    let result = commands::Context::new(cli.sessions, cli.now.as_deref(), cli.age).and_then(|ctx| {
        match cli.command {
            Commands::Sleep { action } => commands::sleep::run(&ctx, action),
            Commands::Stats { action } => commands::stats::run(&ctx, action),
            Commands::Predict => commands::predict::run(&ctx),
            Commands::Recommend => commands::recommend::run(&ctx),
            Commands::Insights => commands::insights::run(&ctx),
            Commands::Config { action } => commands::config::run(action),
        }
    });

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
