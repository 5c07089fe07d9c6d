//! mixer-bot - archives YouTube links posted in a Discord channel
//!
//! Runs two tasks in one process: the HTTP endpoint Discord delivers slash
//! command interactions to, and the gateway listener that ingests links as
//! they are posted.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use mixer_bot::api::parse_public_key;
use mixer_bot::services::{
    run_listener, DiscordClient, IngestPipeline, ListenerContext, YouTubeClient,
};
use mixer_bot::{build_router, AppState};
use mixer_common::config::{load_toml_config, ServerConfig};
use mixer_common::db::init_database;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for mixer-bot
#[derive(Parser, Debug)]
#[command(name = "mixer-bot")]
#[command(about = "Discord bot that keeps a history of shared YouTube links")]
#[command(version)]
struct Args {
    /// Bootstrap TOML file
    #[arg(short, long, default_value = "mixer.toml", env = "MIXER_CONFIG")]
    config: PathBuf,

    /// Port to listen on (overrides the config file)
    #[arg(short, long, env = "MIXER_PORT")]
    port: Option<u16>,

    /// SQLite database file (overrides the config file)
    #[arg(short, long, env = "MIXER_DATABASE")]
    database: Option<PathBuf>,

    /// Bot token
    #[arg(long, env = "DISCORD_TOKEN", hide_env_values = true)]
    discord_token: String,

    /// Application id
    #[arg(long, env = "APP_ID")]
    app_id: String,

    /// Application public key (hex) used to verify interaction requests
    #[arg(long, env = "PUBLIC_KEY")]
    public_key: String,

    /// YouTube Data API key
    #[arg(long, env = "YOUTUBE_API_KEY", hide_env_values = true)]
    youtube_api_key: String,

    /// Serve interactions only; do not connect to the gateway
    #[arg(long)]
    no_gateway: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = load_toml_config(&args.config)
        .with_context(|| format!("Failed to load {}", args.config.display()))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.level.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting mixer-bot v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let public_key = parse_public_key(&args.public_key)
        .map_err(|e| anyhow::anyhow!("PUBLIC_KEY: {}", e))?;

    let db_path = args.database.unwrap_or(config.database_path);
    info!("Database path: {}", db_path.display());
    let pool = init_database(&db_path)
        .await
        .context("Failed to initialize database")?;

    let server_config_path = config.server_config_path;
    let server_config = ServerConfig::load(&server_config_path)
        .with_context(|| format!("Failed to read {}", server_config_path.display()))?;
    let target_channel = server_config.target_channel_id;
    match &target_channel {
        Some(id) => info!("Target channel: {}", id),
        None => warn!("No target channel configured; use /setchannel and restart"),
    }

    let youtube = YouTubeClient::new(args.youtube_api_key)
        .context("Failed to build YouTube client")?;
    let discord = DiscordClient::new(args.discord_token.clone())
        .context("Failed to build Discord client")?;
    let pipeline = IngestPipeline::new(pool, Arc::new(youtube));

    if args.no_gateway {
        info!("Gateway listener disabled");
    } else {
        let context = ListenerContext::new(pipeline.clone(), target_channel.clone());
        let token = args.discord_token.clone();
        tokio::spawn(async move {
            if let Err(e) = run_listener(&token, context).await {
                error!("Gateway listener stopped: {}", e);
            }
        });
    }

    let state = AppState::new(
        pipeline,
        Arc::new(discord),
        server_config_path,
        target_channel,
        public_key,
    );
    let app = build_router(state);

    let port = args.port.unwrap_or(config.port);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(app_id = %args.app_id, "Listening for interactions on http://{}/interactions", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
