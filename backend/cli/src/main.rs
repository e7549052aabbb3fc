mod api;
mod config;

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use taskbridge_clickup::{ClickUpClient, ClickUpConfig};

use api::AppState;
use config::Config;

#[derive(Parser)]
#[command(name = "taskbridge")]
#[command(about = "Discord slash-command to ClickUp task bridge")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the webhook bridge server
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Check whether a running bridge answers its liveness endpoint
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port } => {
            let mut config = Config::from_env()?;
            if let Some(port) = port {
                config.port = port;
            }
            init_tracing(&config.log_level);
            run_server(config).await?;
        }
        Commands::Status => {
            let port = std::env::var("TASKBRIDGE_PORT")
                .ok()
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(8080);
            let client = reqwest::Client::new();
            match client.get(format!("http://localhost:{port}/")).send().await {
                Ok(resp) => println!("taskbridge answered on port {port}: {}", resp.status()),
                Err(_) => println!("taskbridge is not running on port {port}"),
            }
        }
    }

    Ok(())
}

/// Initialize structured logging: `RUST_LOG` wins, the configured level
/// is the fallback.
fn init_tracing(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .json()
        .init();
}

async fn run_server(config: Config) -> Result<()> {
    info!(
        port = config.port,
        bind = %config.bind_address,
        list = %config.clickup_list_id,
        "Starting taskbridge"
    );

    let clickup_config = ClickUpConfig {
        assignee_id: config.clickup_assignee_id.clone(),
        ..ClickUpConfig::new(config.clickup_api_token.clone(), config.clickup_list_id.clone())
    };
    let tasks = Arc::new(ClickUpClient::new(clickup_config));

    let state = AppState {
        public_key_hex: config.discord_public_key.clone(),
        tasks,
    };

    let app = api::build_router(state).layer(TraceLayer::new_for_http());
    let addr = format!("{}:{}", config.bind_address, config.port);

    info!(addr = %addr, "HTTP server listening");

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
