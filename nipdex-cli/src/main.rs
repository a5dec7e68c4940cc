//! nipdex - search and open Nostr NIPs from the terminal

use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use nipdex_core::catalog::{SettingsManager, UrlTarget};

mod catalog_cli;
mod config_cli;
mod render;

use catalog_cli::SourceArgs;
use config_cli::{CacheCommand, ConfigCommand};

/// Log levels
#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_filter_directive(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[derive(Parser, Debug)]
#[clap(
    name = "nipdex",
    about = "Search the Nostr NIPs index by text, event kind (k=1) or tag (t=e)",
    version
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,

    /// Set log level
    #[clap(long, default_value = "warn", global = true)]
    log_level: LogLevel,

    /// Emit structured JSON logs with catalog build tracing
    #[clap(long, global = true)]
    trace: bool,

    /// Override the settings file path
    #[clap(long, global = true)]
    settings: Option<PathBuf>,
}

#[derive(Parser, Debug)]
enum Command {
    /// Search NIPs by text, `k=<kind>` or `t=<tag>`
    Search {
        /// Search query; words are joined with spaces (empty lists everything)
        query: Vec<String>,

        /// Output results as JSON
        #[clap(long)]
        json: bool,

        #[clap(flatten)]
        source: SourceArgs,
    },

    /// Show details for one NIP
    Show {
        /// NIP identifier (e.g. 01, 1, 7D)
        id: String,

        /// Output as JSON
        #[clap(long)]
        json: bool,

        #[clap(flatten)]
        source: SourceArgs,
    },

    /// Open a NIP in the browser
    Open {
        /// NIP identifier (e.g. 01, 1, 7D)
        id: String,

        /// Which URL to open (github or site); defaults to the saved preference
        #[clap(long)]
        target: Option<UrlTarget>,

        /// Print the URL instead of opening it
        #[clap(long)]
        print: bool,

        #[clap(flatten)]
        source: SourceArgs,
    },

    /// Open the NIPs home page: the GitHub repository or the NIPs site
    Repo {
        /// Which home page to open (github or site); defaults to the saved preference
        #[clap(long)]
        target: Option<UrlTarget>,

        /// Print the URL instead of opening it
        #[clap(long)]
        print: bool,
    },

    /// Manage settings
    Config {
        #[clap(subcommand)]
        command: ConfigCommand,
    },

    /// Manage the NIPs index cache
    Cache {
        #[clap(subcommand)]
        command: CacheCommand,
    },
}

/// Initialize tracing with CLI flags
///
/// Logs always go to stderr so stdout stays clean for JSON output.
fn initialize_tracing(log_level: &LogLevel, trace: bool) {
    let mut filter = EnvFilter::new(log_level.to_filter_directive());

    if trace {
        if let Ok(parsed) = "nipdex_core::catalog=trace".parse() {
            filter = filter.add_directive(parsed);
        }

        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_writer(std::io::stderr)
            .init();

        tracing::info!("nipdex catalog tracing enabled");
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }
}

fn load_settings(path: Option<PathBuf>) -> Result<SettingsManager> {
    match path {
        Some(path) => SettingsManager::load_from_path(path),
        None => SettingsManager::load(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    initialize_tracing(&cli.log_level, cli.trace);

    let settings = load_settings(cli.settings)?;

    match cli.command {
        Command::Search {
            query,
            json,
            source,
        } => catalog_cli::execute_search(&settings, &query.join(" "), json, &source).await,
        Command::Show { id, json, source } => {
            catalog_cli::execute_show(&settings, &id, json, &source).await
        }
        Command::Open {
            id,
            target,
            print,
            source,
        } => catalog_cli::execute_open(&settings, &id, target, print, &source).await,
        Command::Repo { target, print } => {
            let target = target.or(settings.url_target()).unwrap_or_default();
            catalog_cli::execute_repo(target, print)
        }
        Command::Config { command } => command.execute(settings),
        Command::Cache { command } => command.execute(&settings),
    }
}
