//! Reply text for song listings

use chrono::DateTime;
use mixer_common::models::UNKNOWN_ALBUM;
use mixer_common::Song;
use rand::seq::SliceRandom;

const EMOJIS: &[&str] = &[
    "🎵", "🎶", "🎧", "📻", "🎸", "🥁", "🎹", "🎷", "🎺", "💿",
];

/// `M/D/YYYY` in UTC for a Unix-seconds timestamp
pub fn format_date(unix_seconds: i64) -> String {
    DateTime::from_timestamp(unix_seconds, 0)
        .map(|dt| dt.format("%-m/%-d/%Y").to_string())
        .unwrap_or_else(|| "unknown date".to_string())
}

/// Silent mention of the submitter, or their stored name when the id is blank
fn added_by(song: &Song) -> String {
    if song.user_id.is_empty() {
        format!("@silent @{}", song.user_name)
    } else {
        format!("@silent <@{}>", song.user_id)
    }
}

/// One `recentsongs` entry
pub fn recent_entry(song: &Song) -> String {
    let album_info = match song.album.as_deref() {
        Some(album) if !album.is_empty() && album != UNKNOWN_ALBUM => format!("({})", album),
        _ => String::new(),
    };

    format!(
        "[**{}**]({}) by *{}*{} • *{}*\n→ Added by {} on {}",
        song.title,
        song.url,
        song.artist,
        album_info,
        song.genre,
        added_by(song),
        format_date(song.added_at)
    )
}

/// One `querysongs` entry; the link is wrapped in `<>` to suppress its preview
pub fn query_entry(song: &Song) -> String {
    format!(
        "[**{}**](<{}>) by {} ({})\n→ Added by {} on {}",
        song.title,
        song.url,
        song.artist,
        song.album.as_deref().unwrap_or(UNKNOWN_ALBUM),
        added_by(song),
        format_date(song.added_at)
    )
}

/// Entries separated by a blank line
pub fn join_entries<F>(songs: &[Song], entry: F) -> String
where
    F: Fn(&Song) -> String,
{
    songs.iter().map(entry).collect::<Vec<_>>().join("\n\n")
}

pub fn random_emoji() -> &'static str {
    EMOJIS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or("🎵")
}
