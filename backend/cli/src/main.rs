mod config;
mod doctor_cmd;
mod history_cmd;
mod status_cmd;
mod terminal_output;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use sightmate_core::CompletionProvider;
use sightmate_gateway::{start_server, AppState};
use sightmate_memory::{Collection, HistoryStore, InMemoryHistoryStore, SqliteHistoryStore};
use sightmate_understanding::{GeminiProvider, VisionDispatcher};

use config::Config;

#[derive(Parser)]
#[command(name = "sightmate")]
#[command(about = "SightMate: image description backend for blind and low-vision users")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
        /// Keep history in memory instead of the database
        #[arg(long)]
        ephemeral: bool,
    },
    /// Query a running server's health endpoint
    Status {
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Check the Gemini key and the history database
    Doctor,
    /// Print recent analyses straight from the database
    History {
        #[arg(short, long, default_value_t = sightmate_memory::DEFAULT_HISTORY_LIMIT)]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env();
    sightmate_logging::init_logger(&config.log_level, config.log_dir.as_deref());

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port, ephemeral } => {
            let config = Config {
                port: port.unwrap_or(config.port),
                ..config
            };
            run_server(config, ephemeral).await?;
        }
        Commands::Status { port } => status_cmd::run(port.unwrap_or(config.port)).await?,
        Commands::Doctor => doctor_cmd::run(&config).await?,
        Commands::History { limit } => history_cmd::run(&config, limit).await?,
    }

    Ok(())
}

async fn run_server(config: Config, ephemeral: bool) -> Result<()> {
    info!(
        port = config.port,
        bind = %config.bind_address,
        db = %config.database_url,
        model = %config.gemini_model,
        ephemeral,
        "Starting SightMate API"
    );

    let (history, emergencies): (Arc<dyn HistoryStore>, Arc<dyn HistoryStore>) = if ephemeral {
        (
            Arc::new(InMemoryHistoryStore::new()),
            Arc::new(InMemoryHistoryStore::new()),
        )
    } else {
        (
            Arc::new(
                SqliteHistoryStore::open(&config.database_url, Collection::AnalysisHistory)
                    .context("Failed to open analysis history")?,
            ),
            Arc::new(
                SqliteHistoryStore::open(&config.database_url, Collection::EmergencyRequests)
                    .context("Failed to open emergency requests")?,
            ),
        )
    };

    let provider = build_provider(&config);
    if provider.is_none() {
        warn!("GEMINI_API_KEY not set; vision endpoints will report the service as unavailable");
    }

    let dispatcher = VisionDispatcher::new(provider, config.upstream_timeout());
    let state = AppState::new(dispatcher, history, emergencies)
        .with_max_upload_bytes(config.max_upload_bytes);

    let addr: SocketAddr = config
        .bind()
        .parse()
        .with_context(|| format!("Invalid bind address {}", config.bind()))?;

    start_server(addr, Arc::new(state)).await
}

fn build_provider(config: &Config) -> Option<Arc<dyn CompletionProvider>> {
    let api_key = config.gemini_api_key.as_ref()?;
    let provider = GeminiProvider::new(api_key.clone())
        .with_model(config.gemini_model.clone())
        .with_base_url(config.gemini_base_url.clone());
    info!(model = provider.model(), "Registered Gemini provider");
    Some(Arc::new(provider))
}
