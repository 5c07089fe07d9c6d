//! register-commands - push the slash command manifest to Discord
//!
//! Overwrites the guild's command set by default; `--global` targets the
//! application-wide set instead (slower to propagate).

use anyhow::{bail, Context, Result};
use clap::Parser;
use mixer_bot::commands::manifest::{command_manifest, command_names};
use mixer_bot::services::{CommandScope, DiscordClient, DiscordError};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "register-commands")]
#[command(about = "Register mixer-bot slash commands with Discord")]
#[command(version)]
struct Args {
    /// Bot token
    #[arg(long, env = "DISCORD_TOKEN", hide_env_values = true)]
    discord_token: String,

    /// Application id
    #[arg(long, env = "APP_ID")]
    app_id: String,

    /// Guild to register in (required unless --global)
    #[arg(long, env = "GUILD_ID")]
    guild_id: Option<String>,

    /// Register application-wide instead of in one guild
    #[arg(long)]
    global: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();

    let scope = match (args.global, args.guild_id) {
        (true, _) => CommandScope::Global,
        (false, Some(guild_id)) => CommandScope::Guild(guild_id),
        (false, None) => bail!("GUILD_ID is required unless --global is given"),
    };

    let manifest = command_manifest();
    let names = command_names(&manifest).join(", ");
    info!(scope = ?scope, "Registering commands: {}", names);

    let client = DiscordClient::new(args.discord_token)
        .context("Failed to build Discord client")?;
    let app_id = args.app_id;

    match client
        .overwrite_commands(&app_id, &scope, &manifest)
        .await
    {
        Ok((status, registered)) => {
            info!(
                status,
                "Registered {} commands: {}",
                command_names(&registered).len(),
                command_names(&registered).join(", ")
            );
            Ok(())
        }
        Err(DiscordError::ApiError(status, body)) => {
            error!(status, "Discord rejected the command manifest: {}", body);
            bail!("command registration failed with HTTP {}", status)
        }
        Err(e) => Err(e).context("command registration failed"),
    }
}
