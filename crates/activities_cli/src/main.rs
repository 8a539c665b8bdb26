//! Activities command-line client.
//!
//! # Usage
//!
//! ```text
//! activities list [--json]
//! activities show <id>
//! activities create --title <title> --date <date> [--category ..] [--city ..] [--venue ..]
//! activities edit <id> [--title ..] [--date ..] [--description ..] ...
//! activities delete <id>
//! ```
//!
//! Global flags: `--api-url <url>` overrides `ACTIVITIES_API_URL`, `--offline`
//! runs against an in-memory API seeded with sample activities.

mod commands;

use std::sync::Arc;

use activities_core::{
    init_client_logging, ActivitiesApi, ActivityStore, ClientConfig, HttpActivitiesApi,
    MemoryActivitiesApi, StoreWatcher,
};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::debug;

use commands::{read, write, Output};

#[derive(Parser, Debug)]
#[command(
    name = "activities",
    version,
    about = "Browse and edit activities through the client-side store",
    long_about = None,
)]
struct Cli {
    /// API root, e.g. http://localhost:5000/api (overrides ACTIVITIES_API_URL).
    #[arg(long, global = true, value_name = "URL")]
    api_url: Option<String>,

    /// Use an in-memory API seeded with sample activities.
    #[arg(long, global = true)]
    offline: bool,

    /// Print JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List activities grouped by day.
    List,

    /// Show one activity.
    Show {
        /// Activity id.
        id: String,
    },

    /// Create an activity with a generated id.
    Create(write::CreateArgs),

    /// Change fields of an existing activity.
    Edit(write::EditArgs),

    /// Delete an activity.
    Delete {
        /// Activity id.
        id: String,
    },
}

type Store = ActivityStore<Arc<dyn ActivitiesApi>>;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = ClientConfig::from_env().context("invalid client configuration")?;
    if let Some(api_url) = cli.api_url.as_deref() {
        config = config
            .with_base_url(api_url)
            .context("invalid --api-url value")?;
    }
    if let Err(err) = init_client_logging(&config) {
        eprintln!("warning: file logging disabled: {err}");
    }

    let api: Arc<dyn ActivitiesApi> = if cli.offline {
        Arc::new(MemoryActivitiesApi::with_activities(
            commands::sample_activities(),
        ))
    } else {
        Arc::new(HttpActivitiesApi::from_config(&config).context("failed to create API client")?)
    };
    debug!(
        "event=cli_start module=cli status=ok offline={} base_url={}",
        cli.offline, config.base_url
    );

    let store: Store = ActivityStore::new(api);
    tokio::spawn(log_transitions(store.subscribe()));

    let output = Output { json: cli.json };
    match cli.command {
        Commands::List => read::list(&store, output).await,
        Commands::Show { id } => read::show(&store, &id, output).await,
        Commands::Create(args) => write::create(&store, args, output).await,
        Commands::Edit(args) => write::edit(&store, args, output).await,
        Commands::Delete { id } => write::delete(&store, &id, output).await,
    }
}

async fn log_transitions(mut watcher: StoreWatcher) {
    while watcher.changed().await.is_ok() {
        let snapshot = watcher.borrow_and_update().clone();
        debug!(
            "event=store_transition module=cli version={} registry_len={} loading_initial={} submitting={} edit_mode={} target={}",
            snapshot.version,
            snapshot.registry_len,
            snapshot.loading_initial,
            snapshot.submitting,
            snapshot.edit_mode,
            snapshot.target
        );
    }
}
