use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use docsum_core::AppConfig;

mod commands;

#[derive(Parser)]
#[command(name = "docsum")]
#[command(author, version, about = "Extractive summaries for text and PDF documents")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to the configuration file
    #[arg(short = 'c', long = "config", global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web upload form (default)
    Serve {
        /// Address to listen on, overrides server.bind_address
        #[arg(short = 'b', long)]
        bind: Option<SocketAddr>,
    },
    /// Summarize a local .txt or .pdf file
    Summarize {
        /// File to summarize
        file: PathBuf,
        /// Number of sentences in the summary
        #[arg(short = 'n', long)]
        sentences: Option<usize>,
    },
    /// Verify the archive store is reachable and writable
    CheckStorage,
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
    /// Write a configuration file with default values
    Init {
        /// Overwrite an existing file
        #[arg(short = 'f', long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.unwrap_or_else(AppConfig::config_path);

    // These work without a valid configuration
    match cli.command {
        Some(Commands::Config {
            action: ConfigAction::Path,
        }) => {
            return commands::config::path(&config_path);
        }
        Some(Commands::Config {
            action: ConfigAction::Init { force },
        }) => {
            return commands::config::init(&config_path, force);
        }
        _ => {}
    }

    // Load configuration
    let config = AppConfig::load_from(&config_path)?;

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| config.general.log_level.clone()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match cli.command {
        Some(Commands::Serve { bind }) => commands::serve::run(config, bind).await,
        None => commands::serve::run(config, None).await,
        Some(Commands::Summarize { file, sentences }) => {
            commands::summarize::run(&config, &file, sentences).await
        }
        Some(Commands::CheckStorage) => commands::storage::check(&config).await,
        Some(Commands::Config { action }) => match action {
            ConfigAction::Show => commands::config::show(&config),
            ConfigAction::Path | ConfigAction::Init { .. } => Ok(()),
        },
    }
}
