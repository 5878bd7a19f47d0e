use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::database::manager::{Backend, DatabaseManager};
use crate::state::AppState;

#[derive(Parser)]
#[command(name = "pro-tasker-api")]
#[command(about = "Pro-Tasker API - projects and tasks with per-user ownership")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Port to listen on (overrides PORT)")]
    pub port: Option<u16>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve,

    #[command(about = "Apply database migrations and exit")]
    Migrate,
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = AppConfig::from_env()?;
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config).await,
        Commands::Migrate => migrate(config).await,
    }
}

async fn serve(config: AppConfig) -> anyhow::Result<()> {
    tracing::info!("Starting Pro-Tasker API in {:?} mode", config.environment);

    let bind_addr = config.bind_addr();
    let state = AppState::connect(config).await?;
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    tracing::info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, crate::app(state)).await?;
    Ok(())
}

async fn migrate(config: AppConfig) -> anyhow::Result<()> {
    match DatabaseManager::backend(&config.database.url)? {
        Backend::Memory => {
            tracing::info!("In-memory store has no schema to migrate");
        }
        Backend::Postgres => {
            let pool = DatabaseManager::pool(&config.database).await?;
            DatabaseManager::migrate(&pool).await?;
        }
    }
    Ok(())
}
