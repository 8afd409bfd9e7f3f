mod config;
mod task_cmds;
mod watch_cmd;

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};

use tracing::debug;

use ticklist_core::{ControllerConfig, TaskController};
use ticklist_db::pool;
use ticklist_db::store::SqliteTaskStore;

use config::TicklistConfig;

#[derive(Parser)]
#[command(name = "ticklist", about = "Reactive to-do list in your terminal")]
struct Cli {
    /// Database URL (overrides TICKLIST_DATABASE_URL env var)
    #[arg(long, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a ticklist config file
    Init {
        /// Database URL to record (defaults to the data-dir location)
        #[arg(long)]
        db_url: Option<String>,
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Add a task
    Add {
        /// Title of the new task
        title: String,
    },
    /// List all tasks
    List {
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Toggle a task between done and not done
    Done {
        /// Task id
        id: i64,
    },
    /// Rename a task
    Rename {
        /// Task id
        id: i64,
        /// New title
        title: String,
    },
    /// Delete a task
    Rm {
        /// Task id
        id: i64,
    },
    /// Delete every task
    Clear,
    /// Stream task-list snapshots as they change
    Watch,
}

/// Execute the `ticklist init` command: write the config file.
fn cmd_init(db_url: Option<&str>, force: bool) -> Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let url = db_url
        .map(str::to_owned)
        .unwrap_or_else(config::default_database_url);

    let cfg = config::ConfigFile {
        database: config::DatabaseSection { url: url.clone() },
    };
    config::save_config(&cfg)?;

    println!("Config written to {}", path.display());
    println!("  database.url = {url}");

    Ok(())
}

/// Open the database, run migrations, and stand up a controller on top.
async fn open_controller(cli_db_url: Option<&str>) -> Result<TaskController> {
    let resolved = TicklistConfig::resolve(cli_db_url)?;
    debug!(url = %resolved.db_config.database_url, "opening database");
    let db_pool = pool::create_pool(&resolved.db_config).await?;
    pool::run_migrations(&db_pool).await?;

    let store = Arc::new(SqliteTaskStore::new(db_pool));
    Ok(TaskController::new(store, ControllerConfig::default()))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let db_url = cli.database_url.as_deref();

    if let Commands::Init { db_url: url, force } = &cli.command {
        return cmd_init(url.as_deref(), *force);
    }

    let ctrl = open_controller(db_url).await?;

    match cli.command {
        Commands::Init { .. } => unreachable!("handled above"),
        Commands::Add { title } => task_cmds::cmd_add(&ctrl, &title).await,
        Commands::List { json } => task_cmds::cmd_list(&ctrl, json).await,
        Commands::Done { id } => task_cmds::cmd_done(&ctrl, id).await,
        Commands::Rename { id, title } => task_cmds::cmd_rename(&ctrl, id, &title).await,
        Commands::Rm { id } => task_cmds::cmd_rm(&ctrl, id).await,
        Commands::Clear => task_cmds::cmd_clear(&ctrl).await,
        Commands::Watch => watch_cmd::cmd_watch(&ctrl).await,
    }
}
