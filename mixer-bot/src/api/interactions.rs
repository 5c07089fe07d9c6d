//! POST /interactions

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use tracing::{debug, error, warn};

use crate::api::types::{Interaction, InteractionKind, InteractionResponse};
use crate::commands;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Answer one signed interaction
pub async fn handle_interaction(
    State(state): State<AppState>,
    payload: Result<Json<Interaction>, JsonRejection>,
) -> ApiResult<Json<InteractionResponse>> {
    let Json(interaction) = payload.map_err(|rejection| {
        warn!(error = %rejection, "Rejected malformed interaction payload");
        ApiError::BadRequest("invalid interaction payload".to_string())
    })?;

    let response = match interaction.kind() {
        InteractionKind::Ping => InteractionResponse::pong(),
        InteractionKind::ApplicationCommand => commands::dispatch(&state, &interaction).await?,
        InteractionKind::MessageComponent => {
            let custom_id = interaction
                .data
                .as_ref()
                .and_then(|d| d.custom_id.as_deref())
                .unwrap_or_default();
            debug!(custom_id = %custom_id, "Acknowledging message component");
            InteractionResponse::deferred_update()
        }
        InteractionKind::Other(kind) => {
            error!("unknown interaction type: {}", kind);
            return Err(ApiError::BadRequest("unknown interaction type".to_string()));
        }
    };

    Ok(Json(response))
}
