//! ragplay CLI
//!
//! Main entry point for the ragplay command-line tool.
//! Answers questions over a local corpus with six retrieval-augmented strategies.

mod commands;

use clap::{Parser, Subcommand};
use commands::{AskCommand, ChatCommand, IndexCommand, StrategiesCommand};
use ragplay_core::{config::AppConfig, logging, AppResult, ConfigOverrides};
use std::path::PathBuf;

/// ragplay - compare retrieval-augmented generation strategies
#[derive(Parser, Debug)]
#[command(name = "ragplay")]
#[command(about = "Compare retrieval-augmented generation strategies over a local corpus", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to workspace directory (default: current directory)
    #[arg(short, long, global = true, env = "RAGPLAY_WORKSPACE")]
    workspace: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, global = true, env = "RAGPLAY_CONFIG")]
    config: Option<PathBuf>,

    /// Corpus file, one plain-text document
    #[arg(long, global = true, env = "RAGPLAY_CORPUS")]
    corpus: Option<PathBuf>,

    /// Generation provider (groq, openai, ollama, scripted)
    #[arg(short, long, global = true, env = "RAGPLAY_PROVIDER")]
    provider: Option<String>,

    /// Model identifier
    #[arg(short, long, global = true, env = "RAGPLAY_MODEL")]
    model: Option<String>,

    /// Sampling temperature (0.0-1.0)
    #[arg(long, global = true, env = "RAGPLAY_TEMPERATURE")]
    temperature: Option<f32>,

    /// Chunks retrieved per query
    #[arg(short = 'k', long, global = true, env = "RAGPLAY_TOP_K")]
    top_k: Option<usize>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the answering strategies
    Strategies(StrategiesCommand),

    /// Ask one question with a chosen strategy
    Ask(AskCommand),

    /// Interactive session with one strategy
    Chat(ChatCommand),

    /// Build the corpus index and report on it
    Index(IndexCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    let cli = Cli::parse();

    let overrides = ConfigOverrides {
        workspace: cli.workspace,
        config_file: cli.config,
        corpus_path: cli.corpus,
        provider: cli.provider,
        model: cli.model,
        temperature: cli.temperature,
        top_k: cli.top_k,
        log_level: cli.log_level,
        verbose: cli.verbose,
        no_color: cli.no_color,
    };
    let config = AppConfig::load_with(&overrides)?;

    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    tracing::info!("ragplay starting");
    tracing::debug!("Workspace: {:?}", config.workspace);
    tracing::debug!("Provider: {} / {}", config.provider, config.model);

    config.validate()?;

    let command_name = match &cli.command {
        Commands::Strategies(_) => "strategies",
        Commands::Ask(_) => "ask",
        Commands::Chat(_) => "chat",
        Commands::Index(_) => "index",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    let result = match cli.command {
        Commands::Strategies(cmd) => cmd.execute().await,
        Commands::Ask(cmd) => cmd.execute(&config).await,
        Commands::Chat(cmd) => cmd.execute(&config).await,
        Commands::Index(cmd) => cmd.execute(&config).await,
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
