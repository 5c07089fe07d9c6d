//! Administrator-only configuration commands

use mixer_common::config::{save_channel_id, save_controller_role};
use tracing::{error, info, warn};

use super::format::random_emoji;
use crate::api::types::{Interaction, InteractionData, InteractionResponse, FLAG_EPHEMERAL};
use crate::AppState;

const ADMIN_ONLY: &str = "You must be an admin to use this command.";
const SAVE_FAILED: &str = "❌ Failed to save the server configuration.";

fn denied(interaction: &Interaction) -> InteractionResponse {
    warn!(user = %interaction.invoker_name(), "Rejected admin command from non-administrator");
    InteractionResponse::message(ADMIN_ONLY)
        .with_flags(FLAG_EPHEMERAL)
}

fn missing_option(name: &str) -> InteractionResponse {
    InteractionResponse::message(format!("Missing required option `{}`.", name))
        .with_flags(FLAG_EPHEMERAL)
}

/// `setchannel channel:<channel>`
///
/// Persists the target channel. The running scanner and listener keep the
/// channel they started with until the process restarts.
pub fn set_channel(
    state: &AppState,
    interaction: &Interaction,
    data: &InteractionData,
) -> InteractionResponse {
    if !interaction.invoker_is_admin() {
        return denied(interaction);
    }

    let Some(channel_id) = data.option_str("channel") else {
        return missing_option("channel");
    };

    if let Err(e) = save_channel_id(&state.server_config_path, channel_id) {
        error!(error = %e, "Failed to save channel id");
        return InteractionResponse::message(SAVE_FAILED);
    }

    info!("Setting music channel to {}", channel_id);
    InteractionResponse::message(format!(
        "Music channel set to <#{}> {}",
        channel_id,
        random_emoji()
    ))
}

/// `setadminrole role:<role>`
///
/// The role is stored for later use; admin commands still check the
/// administrator permission bit.
pub fn set_admin_role(
    state: &AppState,
    interaction: &Interaction,
    data: &InteractionData,
) -> InteractionResponse {
    if !interaction.invoker_is_admin() {
        return denied(interaction);
    }

    let Some(role_id) = data.option_str("role") else {
        return missing_option("role");
    };

    if let Err(e) = save_controller_role(&state.server_config_path, role_id) {
        error!(error = %e, "Failed to save controller role");
        return InteractionResponse::message(SAVE_FAILED);
    }

    info!("Setting bot controller role to {}", role_id);
    InteractionResponse::message(format!("Bot controller role set to <@&{}>", role_id))
}
