mod cli;
mod config;
mod files;
mod recall;
mod server;
mod tools;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "memdir", version, about = "File-based memory MCP server with associative recall")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the MCP server (transport from config: stdio or http)
    Serve,
    /// List files most often used together with PATH
    Related {
        /// Memory path, relative to the memory directory
        path: String,
        /// Maximum number of files to list (default: recall.max_recommendations)
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Show co-visitation statistics
    Stats {
        /// Number of strongest pairs to list
        #[arg(long, default_value_t = 10)]
        top: usize,
    },
    /// Check the co-visitation index for corruption
    Doctor,
    /// Delete all learned associations (memory files are kept)
    Reset,
    /// Record accesses to PATHS, in order, as one session
    Record {
        /// Session identifier the accesses belong to
        #[arg(long)]
        session: String,
        /// Access kind: read or write
        #[arg(long, default_value = "read")]
        kind: String,
        /// Memory paths, relative to the memory directory
        #[arg(required = true)]
        paths: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load config (for log level)
    let config = config::MemdirConfig::load()?;

    // Initialize tracing with the configured log level.
    // Log to stderr so stdout stays clean for MCP JSON-RPC.
    let filter = EnvFilter::try_new(&config.server.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Serve => server::serve(config).await?,
        Command::Related { path, limit } => cli::related::related(&config, &path, limit)?,
        Command::Stats { top } => cli::stats::stats(&config, top)?,
        Command::Doctor => cli::doctor::doctor(&config)?,
        Command::Reset => cli::reset::reset(&config)?,
        Command::Record {
            session,
            kind,
            paths,
        } => cli::record::record(&config, &session, &kind, &paths)?,
    }

    Ok(())
}
