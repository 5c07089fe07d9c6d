//! On-demand scan of the target channel's recent history

use async_trait::async_trait;
use mixer_common::db::all_song_urls;
use mixer_common::links::extract_youtube_links;
use mixer_common::Submitter;
use tracing::{debug, info};

use crate::services::ingest::IngestPipeline;

/// Discord caps message listing at 100 per request
pub const SCAN_MESSAGE_LIMIT: u8 = 100;

/// Chat message reduced to what ingestion needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelMessage {
    pub id: String,
    pub author_id: String,
    pub author_name: String,
    pub author_is_bot: bool,
    pub content: Option<String>,
    pub timestamp_ms: i64,
}

/// Source of a channel's recent messages
#[async_trait]
pub trait MessageSource: Send + Sync {
    async fn recent_messages(
        &self,
        channel_id: &str,
        limit: u8,
    ) -> anyhow::Result<Vec<ChannelMessage>>;
}

/// Outcome of one scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Links seen across all human messages, duplicates included
    pub links_found: usize,
    pub new_songs: usize,
}

/// Scan up to 100 recent messages of `channel_id` and ingest unseen links
pub async fn scan_channel(
    source: &dyn MessageSource,
    pipeline: &IngestPipeline,
    channel_id: &str,
) -> anyhow::Result<ScanReport> {
    let messages = source.recent_messages(channel_id, SCAN_MESSAGE_LIMIT).await?;
    info!(channel_id = %channel_id, messages = messages.len(), "Scanning channel history");

    let mut seen = all_song_urls(pipeline.db()).await?;
    let mut report = ScanReport::default();

    let human = messages.iter().filter(|m| !m.author_is_bot);
    for message in human {
        let urls = extract_youtube_links(message.content.as_deref());
        if urls.is_empty() {
            debug!(message_id = %message.id, "Skipping message without links");
            continue;
        }

        report.links_found += urls.len();
        let submitter = Submitter::new(
            message.author_id.clone(),
            message.author_name.clone(),
        );

        for url in urls {
            if seen.contains(&url) {
                continue;
            }

            pipeline
                .insert(&url, &submitter, message.timestamp_ms)
                .await?;
            seen.insert(url);
            report.new_songs += 1;
        }
    }

    info!(
        channel_id = %channel_id,
        links_found = report.links_found,
        new_songs = report.new_songs,
        "Channel scan complete"
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::ingest::test_support::{memory_pool, FailingMetadata, StaticMetadata};
    use mixer_common::db::{count_songs, insert_song, recent_songs};
    use mixer_common::NewSong;
    use std::sync::{Arc, Mutex};

    const LINK_A: &str = "https://youtube.com/watch?v=aaaaaaaaaaa";
    const LINK_B: &str = "https://youtube.com/watch?v=bbbbbbbbbbb";
    const LINK_C: &str = "https://youtube.com/watch?v=ccccccccccc";
    const LINK_D: &str = "https://youtube.com/watch?v=ddddddddddd";

    struct FakeChannel {
        messages: Vec<ChannelMessage>,
        requested: Mutex<Vec<(String, u8)>>,
    }

    #[async_trait]
    impl MessageSource for FakeChannel {
        async fn recent_messages(
            &self,
            channel_id: &str,
            limit: u8,
        ) -> anyhow::Result<Vec<ChannelMessage>> {
            self.requested
                .lock()
                .unwrap()
                .push((channel_id.to_string(), limit));
            Ok(self.messages.clone())
        }
    }

    struct BrokenChannel;

    #[async_trait]
    impl MessageSource for BrokenChannel {
        async fn recent_messages(
            &self,
            _channel_id: &str,
            _limit: u8,
        ) -> anyhow::Result<Vec<ChannelMessage>> {
            anyhow::bail!("Invalid response from Discord API")
        }
    }

    fn message(id: &str, author: &str, bot: bool, content: Option<&str>) -> ChannelMessage {
        ChannelMessage {
            id: id.to_string(),
            author_id: format!("id-{}", author),
            author_name: author.to_string(),
            author_is_bot: bot,
            content: content.map(str::to_string),
            timestamp_ms: 1_700_000_000_000,
        }
    }

    #[tokio::test]
    async fn test_scan_counts_found_and_new() {
        let pool = memory_pool().await;
        let pipeline = IngestPipeline::new(pool.clone(), Arc::new(StaticMetadata(None)));
        let existing = Submitter::new("0", "old");
        insert_song(&pool, &NewSong::from_metadata(LINK_A, &existing, 0, None))
            .await
            .unwrap();

        let two_links = format!("two {} {}", LINK_B, LINK_C);
        let repeat = format!("again {}", LINK_B);
        let channel = FakeChannel {
            messages: vec![
                message("1", "alice", false, Some(LINK_A)),
                message("2", "bob", false, Some(&two_links)),
                message("3", "mixer", true, Some(LINK_D)),
                message("4", "carol", false, None),
                message("5", "carol", false, Some(&repeat)),
            ],
            requested: Mutex::new(Vec::new()),
        };

        let report = scan_channel(&channel, &pipeline, "555").await.unwrap();

        assert_eq!(
            report,
            ScanReport {
                links_found: 4,
                new_songs: 2,
            }
        );
        assert_eq!(count_songs(&pool).await.unwrap(), 3);
        assert_eq!(
            *channel.requested.lock().unwrap(),
            vec![("555".to_string(), SCAN_MESSAGE_LIMIT)]
        );
    }

    #[tokio::test]
    async fn test_scan_records_real_submitter() {
        let pool = memory_pool().await;
        let pipeline = IngestPipeline::new(pool.clone(), Arc::new(FailingMetadata));
        let channel = FakeChannel {
            messages: vec![message("1", "alice", false, Some(LINK_A))],
            requested: Mutex::new(Vec::new()),
        };

        scan_channel(&channel, &pipeline, "555").await.unwrap();

        let row = recent_songs(&pool, 1).await.unwrap().remove(0);
        assert_eq!(row.user_id, "id-alice");
        assert_eq!(row.user_name, "alice");
        assert_eq!(row.added_at, 1_700_000_000);
    }

    #[tokio::test]
    async fn test_scan_propagates_source_error() {
        let pool = memory_pool().await;
        let pipeline = IngestPipeline::new(pool.clone(), Arc::new(FailingMetadata));

        let result = scan_channel(&BrokenChannel, &pipeline, "555").await;

        assert!(result.is_err());
        assert_eq!(count_songs(&pool).await.unwrap(), 0);
    }
}
