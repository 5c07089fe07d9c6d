//! Link ingestion pipeline: extract, resolve, store
//!
//! Shared by the gateway listener and the channel scanner. Links are handled
//! one at a time; a metadata failure still stores a placeholder row.

use mixer_common::db::insert_song;
use mixer_common::links::extract_youtube_links;
use mixer_common::{NewSong, Submitter};
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::{debug, info};

use crate::services::youtube_client::{resolve_metadata, MetadataSource};

/// One link that went through the pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestedLink {
    pub url: String,
    pub title: String,
    /// `false` when the url was already stored
    pub inserted: bool,
}

/// Resolves and stores submitted links
#[derive(Clone)]
pub struct IngestPipeline {
    db: SqlitePool,
    metadata: Arc<dyn MetadataSource>,
}

impl IngestPipeline {
    pub fn new(db: SqlitePool, metadata: Arc<dyn MetadataSource>) -> Self {
        Self { db, metadata }
    }

    pub fn db(&self) -> &SqlitePool {
        &self.db
    }

    /// Resolve metadata for `url` and insert it unless already present
    pub async fn insert(
        &self,
        url: &str,
        submitter: &Submitter,
        timestamp_ms: i64,
    ) -> mixer_common::Result<IngestedLink> {
        debug!(url = %url, user = %submitter.name, timestamp_ms, "Inserting song");

        let metadata = resolve_metadata(self.metadata.as_ref(), url).await;
        let song = NewSong::from_metadata(url, submitter, timestamp_ms, metadata);
        let inserted = insert_song(&self.db, &song).await?;

        if inserted {
            info!(
                title = %song.title,
                artist = %song.artist,
                user = %submitter.name,
                "Inserted song"
            );
        } else {
            debug!(url = %url, "Song already stored, skipped");
        }

        Ok(IngestedLink {
            url: song.url,
            title: song.title,
            inserted,
        })
    }

    /// Ingest every YouTube link found in `content`, in order
    pub async fn ingest_text(
        &self,
        submitter: &Submitter,
        content: Option<&str>,
        timestamp_ms: i64,
    ) -> mixer_common::Result<Vec<IngestedLink>> {
        let urls = extract_youtube_links(content);
        if urls.is_empty() {
            return Ok(Vec::new());
        }

        info!(
            count = urls.len(),
            user = %submitter.name,
            "Found YouTube links in message: {}",
            urls.join(", ")
        );

        let mut ingested = Vec::with_capacity(urls.len());
        for url in urls {
            let link = self.insert(&url, submitter, timestamp_ms).await?;
            ingested.push(link);
        }

        Ok(ingested)
    }
}
