//! Song persistence
//!
//! Rows are keyed by `url`; inserts never overwrite an existing row.

use crate::models::{NewSong, Song, SongFilter, UserMatch};
use crate::Result;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use std::collections::HashSet;

/// Maximum rows returned by a filtered search
pub const QUERY_LIMIT: i64 = 10;

const SONG_COLUMNS: &str =
    "id, title, artist, album, year, genre, duration, url, added_at, user_id, user_name";

/// Insert a song unless its url is already stored
///
/// Returns `true` when a new row was created.
pub async fn insert_song(pool: &SqlitePool, song: &NewSong) -> Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT OR IGNORE INTO songs (
            title, artist, album, year, genre, duration, url, user_id, user_name, added_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&song.title)
    .bind(&song.artist)
    .bind(&song.album)
    .bind(song.year)
    .bind(&song.genre)
    .bind(song.duration)
    .bind(&song.url)
    .bind(&song.user_id)
    .bind(&song.user_name)
    .bind(song.added_at)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// The `limit` most recently inserted songs, newest first
pub async fn recent_songs(pool: &SqlitePool, limit: i64) -> Result<Vec<Song>> {
    let sql = format!("SELECT {} FROM songs ORDER BY id DESC LIMIT ?", SONG_COLUMNS);
    let songs = sqlx::query_as::<_, Song>(&sql)
        .bind(limit)
        .fetch_all(pool)
        .await?;

    Ok(songs)
}

/// Search songs by submitter, artist and title
///
/// Text filters are case-insensitive substring matches. A mention-style user
/// filter matches the user id exactly instead.
pub async fn query_songs(pool: &SqlitePool, filter: &SongFilter) -> Result<Vec<Song>> {
    let mut builder: QueryBuilder<Sqlite> =
        QueryBuilder::new(format!("SELECT {} FROM songs WHERE 1=1", SONG_COLUMNS));

    match &filter.user {
        Some(UserMatch::Id(id)) => {
            builder.push(" AND user_id = ").push_bind(id.clone());
        }
        Some(UserMatch::Name(name)) => {
            builder
                .push(" AND LOWER(user_name) LIKE ")
                .push_bind(like_pattern(name));
        }
        None => {}
    }

    if let Some(artist) = &filter.artist {
        builder
            .push(" AND LOWER(artist) LIKE ")
            .push_bind(like_pattern(artist));
    }

    if let Some(title) = &filter.title {
        builder
            .push(" AND LOWER(title) LIKE ")
            .push_bind(like_pattern(title));
    }

    builder
        .push(" ORDER BY id DESC LIMIT ")
        .push_bind(QUERY_LIMIT);

    let songs = builder.build_query_as::<Song>().fetch_all(pool).await?;
    Ok(songs)
}

fn like_pattern(needle: &str) -> String {
    format!("%{}%", needle.to_lowercase())
}

/// Every stored url
pub async fn all_song_urls(pool: &SqlitePool) -> Result<HashSet<String>> {
    let urls: Vec<String> = sqlx::query_scalar("SELECT url FROM songs")
        .fetch_all(pool)
        .await?;

    Ok(urls.into_iter().collect())
}

pub async fn count_songs(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM songs")
        .fetch_one(pool)
        .await?;

    Ok(count)
}
