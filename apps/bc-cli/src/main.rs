//! # basecamp
//!
//! Operator CLI for the basecamp trekking admin console.
//!
//! - `basecamp trek|expedition list/check/can/set-status`: inspect records,
//!   run the publish-readiness checklist, and move records through their
//!   status lifecycle
//! - `basecamp category tree/options/verify/add/delete`: the blog category
//!   taxonomy, its selector view, and loop detection
//! - `basecamp nav <route>`: the admin sidebar as derived for a route

mod commands;
mod nav;

use std::path::PathBuf;

use bc_api::{
    BackendKind, CategoryApi, CategoryService, ConsoleConfig, FileStore, HttpApi,
    LifecycleService, ResourceApi,
};
use bc_content::{EventDispatcher, Expedition, LogSink, Trek};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

/// basecamp admin console: content lifecycle and category taxonomy.
#[derive(Parser)]
#[command(name = "basecamp", version, about)]
struct Cli {
    /// Project root directory (defaults to current directory).
    #[arg(long, default_value = ".")]
    project_root: PathBuf,

    /// Backend to use, overriding `.basecamp/console.toml`.
    #[arg(long, value_enum)]
    backend: Option<Backend>,

    /// Print JSON instead of tables.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Backend {
    Http,
    File,
}

impl From<Backend> for BackendKind {
    fn from(backend: Backend) -> Self {
        match backend {
            Backend::Http => BackendKind::Http,
            Backend::File => BackendKind::File,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Manage treks.
    Trek {
        #[command(subcommand)]
        command: commands::content::ContentCommands,
    },
    /// Manage expeditions.
    Expedition {
        #[command(subcommand)]
        command: commands::content::ContentCommands,
    },
    /// Inspect and edit the blog category taxonomy.
    Category {
        #[command(subcommand)]
        command: commands::category::CategoryCommands,
    },
    /// Show the sidebar for an admin route (e.g., "/dashboard/treks/4").
    Nav { route: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so table and JSON output on stdout stay clean.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("bc_api=info".parse()?)
                .add_directive("basecamp=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let cli = Cli::parse();
    let project_root = cli
        .project_root
        .canonicalize()
        .unwrap_or_else(|_| cli.project_root.clone());
    let mut config = ConsoleConfig::load_for_project(&project_root)?;
    if let Some(backend) = cli.backend {
        config.backend = backend.into();
    }
    tracing::debug!(backend = ?config.backend, root = %project_root.display(), "console configured");

    if let Commands::Nav { route } = &cli.command {
        return commands::nav::execute(route, cli.json);
    }

    match config.backend {
        BackendKind::Http => {
            let api = HttpApi::new(&config.api)?;
            run(api, &cli.command, &config, cli.json).await
        }
        BackendKind::File => {
            let store = FileStore::new(&config.store_dir)?;
            run(store, &cli.command, &config, cli.json).await
        }
    }
}

async fn run<A>(
    api: A,
    command: &Commands,
    config: &ConsoleConfig,
    json: bool,
) -> anyhow::Result<()>
where
    A: ResourceApi<Trek> + ResourceApi<Expedition> + CategoryApi,
{
    let events = EventDispatcher::new().with_sink(Box::new(LogSink::new(&config.events_log)));

    match command {
        Commands::Trek { command } => {
            let service = LifecycleService::with_dispatcher(api, events);
            commands::content::execute::<Trek, A>(command, &service, config.page_size, json).await
        }
        Commands::Expedition { command } => {
            let service = LifecycleService::with_dispatcher(api, events);
            commands::content::execute::<Expedition, A>(command, &service, config.page_size, json)
                .await
        }
        Commands::Category { command } => {
            commands::category::execute(command, &CategoryService::new(api), json).await
        }
        Commands::Nav { route } => commands::nav::execute(route, json),
    }
}
