//! Data models shared between ingestion and commands

use serde::{Deserialize, Serialize};

pub const UNKNOWN_TITLE: &str = "Unknown Title";
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";
pub const UNKNOWN_ALBUM: &str = "Unknown Album";
pub const UNKNOWN_GENRE: &str = "Unknown Genre";

/// Discord user whose message carried a link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submitter {
    pub id: String,
    pub name: String,
}

impl Submitter {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Metadata resolved for one YouTube video
///
/// `album` is always `None` for YouTube sources and `genre` carries the
/// numeric category id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub title: String,
    pub artist: String,
    pub album: Option<String>,
    pub genre: String,
    pub duration_seconds: i64,
}

/// Stored song row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Song {
    pub id: i64,
    pub title: String,
    pub artist: String,
    pub album: Option<String>,
    pub year: Option<i64>,
    pub genre: String,
    pub duration: i64,
    pub url: String,
    /// Unix seconds
    pub added_at: i64,
    pub user_id: String,
    pub user_name: String,
}

/// Song ready to insert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSong {
    pub title: String,
    pub artist: String,
    pub album: Option<String>,
    pub year: Option<i64>,
    pub genre: String,
    pub duration: i64,
    pub url: String,
    pub added_at: i64,
    pub user_id: String,
    pub user_name: String,
}

impl NewSong {
    /// Build a row from an ingested link, falling back to placeholders for
    /// anything the metadata lookup did not provide.
    ///
    /// `timestamp_ms` is the message creation time in milliseconds; the row
    /// stores whole seconds.
    pub fn from_metadata(
        url: impl Into<String>,
        submitter: &Submitter,
        timestamp_ms: i64,
        metadata: Option<VideoMetadata>,
    ) -> Self {
        let (title, artist, album, genre, duration) = match metadata {
            Some(meta) => (
                non_empty_or(meta.title, UNKNOWN_TITLE),
                non_empty_or(meta.artist, UNKNOWN_ARTIST),
                meta.album
                    .filter(|album| !album.is_empty())
                    .unwrap_or_else(|| UNKNOWN_ALBUM.to_string()),
                non_empty_or(meta.genre, UNKNOWN_GENRE),
                meta.duration_seconds,
            ),
            None => (
                UNKNOWN_TITLE.to_string(),
                UNKNOWN_ARTIST.to_string(),
                UNKNOWN_ALBUM.to_string(),
                UNKNOWN_GENRE.to_string(),
                0,
            ),
        };

        Self {
            title,
            artist,
            album: Some(album),
            year: None,
            genre,
            duration,
            url: url.into(),
            added_at: timestamp_ms.div_euclid(1000),
            user_id: submitter.id.clone(),
            user_name: submitter.name.clone(),
        }
    }
}

fn non_empty_or(value: String, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value
    }
}

/// How `SongFilter::user` is matched
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserMatch {
    /// Exact user id, from a `<@id>` or `<@!id>` mention
    Id(String),
    /// Case-insensitive substring of the stored display name
    Name(String),
}

impl UserMatch {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let mention = trimmed
            .strip_prefix("<@")
            .and_then(|rest| rest.strip_suffix('>'))
            .map(|inner| inner.strip_prefix('!').unwrap_or(inner))
            .filter(|id| !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()));

        match mention {
            Some(id) => UserMatch::Id(id.to_string()),
            None => UserMatch::Name(trimmed.to_lowercase()),
        }
    }
}

/// Optional, AND-combined filters for the song search
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SongFilter {
    pub user: Option<UserMatch>,
    pub artist: Option<String>,
    pub title: Option<String>,
}

impl SongFilter {
    /// Build a filter from raw option values; blank values are ignored.
    pub fn from_options(user: Option<&str>, artist: Option<&str>, title: Option<&str>) -> Self {
        let clean = |value: Option<&str>| {
            value
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_lowercase)
        };

        Self {
            user: user
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(UserMatch::parse),
            artist: clean(artist),
            title: clean(title),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.user.is_none() && self.artist.is_none() && self.title.is_none()
    }
}
