//! Song history commands

use mixer_common::db;
use mixer_common::SongFilter;
use tracing::{error, info};

use super::format::{join_entries, query_entry, recent_entry};
use crate::api::types::{InteractionData, InteractionResponse, FLAG_SUPPRESS_EMBEDS};
use crate::services::scan_channel;
use crate::AppState;

const RECENT_LIMIT: i64 = 10;

/// `recentsongs`: last ten songs, newest first
pub async fn recent_songs(state: &AppState) -> InteractionResponse {
    let content = match db::recent_songs(&state.db, RECENT_LIMIT).await {
        Ok(songs) if songs.is_empty() => "No recent songs found.".to_string(),
        Ok(songs) => join_entries(&songs, recent_entry),
        Err(e) => {
            error!(error = %e, "Error in recentsongs");
            "❌ Failed to fetch recent songs.".to_string()
        }
    };

    InteractionResponse::message(content)
        .with_flags(FLAG_SUPPRESS_EMBEDS)
}

/// `scanmusic`: ingest unseen links from the target channel's history
pub async fn scan_music(state: &AppState) -> InteractionResponse {
    let result = match state.target_channel.as_deref() {
        Some(channel_id) => {
            let messages = state.messages.as_ref();
            scan_channel(messages, &state.pipeline, channel_id).await
        }
        None => Err(anyhow::anyhow!("no target channel configured")),
    };

    match result {
        Ok(report) => {
            info!(
                links_found = report.links_found,
                new_songs = report.new_songs,
                "scanmusic finished"
            );
            InteractionResponse::message(format!(
                "✅ Scanned {} links. {} new songs added.",
                report.links_found, report.new_songs
            ))
        }
        Err(e) => {
            error!(error = %e, "Error scanning music");
            InteractionResponse::message("❌ An error occurred while scanning the channel.")
        }
    }
}

/// `querysongs [user] [artist] [title]`
pub async fn query_songs(state: &AppState, data: &InteractionData) -> InteractionResponse {
    let filter = SongFilter::from_options(
        data.option_str("user"),
        data.option_str("artist"),
        data.option_str("title"),
    );

    let content = match db::query_songs(&state.db, &filter).await {
        Ok(songs) if songs.is_empty() => "❌ No matching songs found.".to_string(),
        Ok(songs) => join_entries(&songs, query_entry),
        Err(e) => {
            error!(error = %e, "Error in querysongs");
            "❌ Something went wrong while searching songs.".to_string()
        }
    };

    InteractionResponse::message(content)
}
