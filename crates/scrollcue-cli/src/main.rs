use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scrollcue_core::AppConfig;

mod commands;

#[derive(Parser)]
#[command(name = "scrollcue")]
#[command(author, version, about = "A terminal teleprompter with gesture-driven auto-scrolling")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Script to show (shorthand for `run <script>`)
    script: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the prompter
    Run {
        /// Plain text script file
        script: Option<PathBuf>,
    },
    /// Print scroll positions and durations as JSON
    Calc(commands::calc::CalcArgs),
    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the configuration file path
    Path,
    /// Print the effective configuration
    Show,
    /// Write the default configuration if none exists
    Init,
}

/// Log filter from RUST_LOG, falling back to the configured level
fn env_filter(config: &AppConfig) -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| config.general.log_level.clone()),
    )
}

/// The prompter owns the terminal, so its logs go to a file
fn init_file_logging(config: &AppConfig) -> Result<()> {
    let log_path = config.log_path();
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    tracing_subscriber::registry()
        .with(env_filter(config))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file)),
        )
        .init();
    Ok(())
}

fn init_stderr_logging(config: &AppConfig) {
    tracing_subscriber::registry()
        .with(env_filter(config))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = AppConfig::load()?;

    match cli.command {
        Some(Commands::Run { script }) => {
            init_file_logging(&config)?;
            commands::run::run(config, script.or(cli.script)).await
        }
        None => {
            init_file_logging(&config)?;
            commands::run::run(config, cli.script).await
        }
        Some(Commands::Calc(args)) => {
            init_stderr_logging(&config);
            commands::calc::run(&config, &args)
        }
        Some(Commands::Config { action }) => {
            init_stderr_logging(&config);
            match action {
                ConfigAction::Path => commands::config::path(),
                ConfigAction::Show => commands::config::show(&config),
                ConfigAction::Init => commands::config::init(),
            }
        }
    }
}
