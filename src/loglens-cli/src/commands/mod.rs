pub mod profile;
pub mod query;
pub mod stream;

use clap::{Parser, Subcommand};
use loglens_sdk::QueryClient;

use crate::config::ProfileStore;
use crate::tui::app::App;

/// loglens: query log-analytics servers from the terminal
#[derive(Parser)]
#[command(name = "loglens", version, about)]
pub struct Cli {
    /// Profile to use (defaults to the configured default profile)
    #[arg(long, short = 'p', global = true, env = "LOGLENS_PROFILE")]
    profile: Option<String>,

    /// Enable debug logging (RUST_LOG overrides)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage server profiles
    Profile {
        #[command(subcommand)]
        action: profile::ProfileAction,
    },
    /// Inspect log streams
    Stream {
        #[command(subcommand)]
        action: stream::StreamAction,
    },
    /// Run a single query and print the result
    Query(query::QueryArgs),
    /// Open the interactive query screen for a stream
    Ui {
        /// Stream to query
        stream: String,
        /// Initial time range, in minutes before now
        #[arg(long, default_value_t = 10)]
        duration: u32,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        init_logging(self.verbose);

        let store = ProfileStore::load()?;
        match self.command {
            Commands::Profile { action } => action.run(store),
            Commands::Stream { action } => {
                let (_, p) = store.select(self.profile.as_deref())?;
                let client = QueryClient::new(&p.url, &p.username, &p.password)?;
                action.run(&client).await
            }
            Commands::Query(args) => {
                let (_, p) = store.select(self.profile.as_deref())?;
                let client = QueryClient::new(&p.url, &p.username, &p.password)?;
                args.run(&client).await
            }
            Commands::Ui { stream, duration } => {
                let (name, p) = store.select(self.profile.as_deref())?;
                let client = QueryClient::new(&p.url, &p.username, &p.password)?;
                App::new(client, name.to_string(), stream, duration)
                    .run()
                    .await
            }
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
