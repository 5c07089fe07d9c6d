//! Tests for database creation and schema setup

use mixer_common::db::{count_songs, init_database, insert_song, recent_songs};
use mixer_common::{NewSong, Submitter};
use tempfile::TempDir;

#[tokio::test]
async fn test_database_created_when_missing() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("nested").join("database.db");

    let pool = init_database(&db_path).await;

    assert!(pool.is_ok(), "Database initialization failed: {:?}", pool.err());
    assert!(db_path.exists(), "Database file was not created");
}

#[tokio::test]
async fn test_all_tables_created() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("database.db");
    let pool = init_database(&db_path).await.unwrap();

    let tables: Vec<String> = sqlx::query_scalar(
        "SELECT name FROM sqlite_master \
         WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert_eq!(tables, vec!["playlist_songs", "playlists", "songs"]);
}

#[tokio::test]
async fn test_rows_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("database.db");

    let pool = init_database(&db_path).await.unwrap();
    let user = Submitter::new("42", "carol");
    let url = "https://youtube.com/watch?v=aaaaaaaaaaa";
    let song = NewSong::from_metadata(url, &user, 1_000, None);
    assert!(insert_song(&pool, &song).await.unwrap());
    pool.close().await;

    let reopened = init_database(&db_path).await.unwrap();
    assert_eq!(count_songs(&reopened).await.unwrap(), 1);

    let rows = recent_songs(&reopened, 10).await.unwrap();
    assert_eq!(rows[0].user_name, "carol");
    assert_eq!(rows[0].added_at, 1);
}
