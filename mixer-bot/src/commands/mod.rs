//! Slash command handlers
//!
//! Each handler turns one application-command interaction into a reply.
//! Failures inside a handler are logged and answered with an apology rather
//! than an HTTP error; only an unknown command name is a client error.

pub mod admin;
pub mod format;
pub mod manifest;
pub mod songs;

use tracing::{error, info};

use crate::api::types::{Interaction, InteractionData, InteractionResponse};
use crate::error::{ApiError, ApiResult};
use crate::AppState;

pub const TEST: &str = "test";
pub const SET_CHANNEL: &str = "setchannel";
pub const SET_ADMIN_ROLE: &str = "setadminrole";
pub const RECENT_SONGS: &str = "recentsongs";
pub const SCAN_MUSIC: &str = "scanmusic";
pub const QUERY_SONGS: &str = "querysongs";

/// Route an application command to its handler
pub async fn dispatch(
    state: &AppState,
    interaction: &Interaction,
) -> ApiResult<InteractionResponse> {
    let default_data = InteractionData::default();
    let data = interaction.data.as_ref().unwrap_or(&default_data);
    let name = data.name.as_deref().unwrap_or_default();
    let user_id = interaction
        .invoker()
        .map(|u| u.id.as_str())
        .unwrap_or_default();

    info!(
        command = %name,
        user = %interaction.invoker_name(),
        user_id = %user_id,
        "Handling slash command"
    );

    match name {
        TEST => Ok(InteractionResponse::message("Hello world, I'm alive!")),
        SET_CHANNEL => Ok(admin::set_channel(state, interaction, data)),
        SET_ADMIN_ROLE => Ok(admin::set_admin_role(state, interaction, data)),
        RECENT_SONGS => Ok(songs::recent_songs(state).await),
        SCAN_MUSIC => Ok(songs::scan_music(state).await),
        QUERY_SONGS => Ok(songs::query_songs(state, data).await),
        unknown => {
            error!("unknown command: {}", unknown);
            Err(ApiError::BadRequest("unknown command".to_string()))
        }
    }
}
