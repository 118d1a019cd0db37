//! Credit Pack CLI — the main entry point.
//!
//! Commands:
//! - `route`   — Show which peers a section would consult, and the queries
//! - `draft`   — Draft a section offline
//! - `tools`   — List or verify the retrieval tool declarations
//! - `search`  — Run a retrieval tool
//! - `config`  — Show, locate or validate configuration

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "creditpack",
    about = "Credit Pack drafting assistant",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the peer queries a section would trigger, without sending them
    Route {
        /// Section title, e.g. "Regulatory Risk Assessment"
        #[arg(short, long)]
        section: String,

        /// Context entries as key=value
        #[arg(short, long = "context", value_name = "KEY=VALUE")]
        context: Vec<String>,
    },

    /// Draft a section with the offline outline drafter
    Draft {
        #[arg(short, long)]
        section: String,

        #[arg(short, long = "context", value_name = "KEY=VALUE")]
        context: Vec<String>,
    },

    /// List the tool declarations sent to the LLM
    Tools {
        /// Print declarations as JSON
        #[arg(long)]
        json: bool,

        /// Verify declarations and exit non-zero on any mismatch
        #[arg(long)]
        check: bool,
    },

    /// Run a retrieval tool by name (canonical or alias)
    Search {
        /// Tool name, e.g. search_procedure
        tool: String,

        #[arg(short, long)]
        query: String,

        #[arg(short, long)]
        num_results: Option<u64>,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Print the config file path
    Path,
    /// Validate the config file
    Validate,
    /// Print the default configuration
    Default,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Route { section, context } => commands::route::run(&section, &context).await?,
        Commands::Draft { section, context } => commands::draft::run(&section, &context).await?,
        Commands::Tools { json, check } => commands::tools::run(json, check).await?,
        Commands::Search {
            tool,
            query,
            num_results,
        } => commands::search::run(&tool, &query, num_results).await?,
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config_cmd::show().await?,
            ConfigAction::Path => commands::config_cmd::path().await?,
            ConfigAction::Validate => commands::config_cmd::validate().await?,
            ConfigAction::Default => commands::config_cmd::print_default().await?,
        },
    }

    Ok(())
}
