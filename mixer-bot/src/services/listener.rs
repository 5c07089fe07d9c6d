//! Gateway listener: ingests links posted live in the target channel
//!
//! Runs as its own task next to the HTTP server. The target channel is fixed
//! for the lifetime of the process.

use mixer_common::Submitter;
use serenity::{
    async_trait,
    client::{Client, Context, EventHandler},
    model::{channel::Message, gateway::Ready},
    prelude::GatewayIntents,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tracing::{error, info, warn};

use crate::services::ingest::{IngestPipeline, IngestedLink};

/// Capacity of the recently-seen buffer
pub const RECENT_SONGS_CAPACITY: usize = 10;

/// Link seen by the listener
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentSong {
    pub url: String,
    pub submitter: Submitter,
    pub timestamp_ms: i64,
}

/// Bounded buffer of the last links seen live, oldest evicted first
#[derive(Debug, Clone, Default)]
pub struct RecentSongs {
    inner: Arc<Mutex<VecDeque<RecentSong>>>,
}

impl RecentSongs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, song: RecentSong) {
        let mut buffer = match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        buffer.push_back(song);
        while buffer.len() > RECENT_SONGS_CAPACITY {
            buffer.pop_front();
        }
    }

    pub fn snapshot(&self) -> Vec<RecentSong> {
        match self.inner.lock() {
            Ok(guard) => guard.iter().cloned().collect(),
            Err(poisoned) => poisoned.get_ref().iter().cloned().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Message fields the listener looks at
#[derive(Debug, Clone)]
pub struct IncomingMessage<'a> {
    pub channel_id: &'a str,
    pub author: Submitter,
    pub author_is_bot: bool,
    pub content: &'a str,
    pub timestamp_ms: i64,
}

/// Process-scoped state for the gateway handler
#[derive(Clone)]
pub struct ListenerContext {
    pub pipeline: IngestPipeline,
    pub target_channel: Option<String>,
    pub recent: RecentSongs,
}

impl ListenerContext {
    pub fn new(pipeline: IngestPipeline, target_channel: Option<String>) -> Self {
        Self {
            pipeline,
            target_channel,
            recent: RecentSongs::new(),
        }
    }

    /// Ingest the links of one message if it belongs to the target channel
    pub async fn handle_message(
        &self,
        message: &IncomingMessage<'_>,
    ) -> mixer_common::Result<Vec<IngestedLink>> {
        if self.target_channel.as_deref() != Some(message.channel_id) || message.author_is_bot {
            return Ok(Vec::new());
        }

        let links = self
            .pipeline
            .ingest_text(&message.author, Some(message.content), message.timestamp_ms)
            .await?;

        for link in &links {
            self.recent.push(RecentSong {
                url: link.url.clone(),
                submitter: message.author.clone(),
                timestamp_ms: message.timestamp_ms,
            });
            info!(
                url = %link.url,
                title = %link.title,
                inserted = link.inserted,
                user = %message.author.name,
                "Added song URL"
            );
        }

        Ok(links)
    }
}

struct Handler {
    context: ListenerContext,
}

#[async_trait]
impl EventHandler for Handler {
    async fn message(&self, _ctx: Context, msg: Message) {
        let channel_id = msg.channel_id.get().to_string();
        let author_id = msg.author.id.get().to_string();
        let incoming = IncomingMessage {
            channel_id: &channel_id,
            author: Submitter::new(author_id, msg.author.name.clone()),
            author_is_bot: msg.author.bot,
            content: &msg.content,
            timestamp_ms: msg.timestamp.unix_timestamp() * 1000,
        };

        let result = self.context.handle_message(&incoming).await;
        if let Err(e) = result {
            error!(message_id = %msg.id, error = %e, "Failed to ingest message");
        }
    }

    async fn ready(&self, _: Context, ready: Ready) {
        info!("Bot is live mixing as {}", ready.user.name);
    }
}

/// Connect to the gateway and process messages until the connection ends
pub async fn run_listener(bot_token: &str, context: ListenerContext) -> anyhow::Result<()> {
    if context.target_channel.is_none() {
        warn!("No target channel configured; live listener will ignore all messages until restart");
    }

    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    let mut client = Client::builder(bot_token, intents)
        .event_handler(Handler { context })
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create Discord client: {}", e))?;

    client
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("Discord gateway error: {}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::ingest::test_support::{memory_pool, StaticMetadata};
    use mixer_common::db::count_songs;

    fn incoming<'a>(channel_id: &'a str, bot: bool, content: &'a str) -> IncomingMessage<'a> {
        IncomingMessage {
            channel_id,
            author: Submitter::new("8", "frank"),
            author_is_bot: bot,
            content,
            timestamp_ms: 1_700_000_000_000,
        }
    }

    async fn context(target: Option<&str>) -> ListenerContext {
        let pool = memory_pool().await;
        let pipeline = IngestPipeline::new(pool, Arc::new(StaticMetadata(None)));
        ListenerContext::new(pipeline, target.map(str::to_string))
    }

    #[tokio::test]
    async fn test_ignores_other_channels() {
        let ctx = context(Some("100")).await;

        let links = ctx
            .handle_message(&incoming("200", false, "https://youtube.com/watch?v=aaaaaaaaaaa"))
            .await
            .unwrap();

        assert!(links.is_empty());
        assert_eq!(count_songs(ctx.pipeline.db()).await.unwrap(), 0);
        assert!(ctx.recent.is_empty());
    }

    #[tokio::test]
    async fn test_ignores_bots() {
        let ctx = context(Some("100")).await;

        let links = ctx
            .handle_message(&incoming("100", true, "https://youtube.com/watch?v=aaaaaaaaaaa"))
            .await
            .unwrap();

        assert!(links.is_empty());
        assert_eq!(count_songs(ctx.pipeline.db()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unconfigured_channel_ignores_everything() {
        let ctx = context(None).await;

        let links = ctx
            .handle_message(&incoming("100", false, "https://youtube.com/watch?v=aaaaaaaaaaa"))
            .await
            .unwrap();

        assert!(links.is_empty());
    }

    #[tokio::test]
    async fn test_ingests_target_channel_links() {
        let ctx = context(Some("100")).await;

        let links = ctx
            .handle_message(&incoming(
                "100",
                false,
                "https://youtube.com/watch?v=aaaaaaaaaaa \
                 https://music.youtube.com/watch?v=bbbbbbbbbbb",
            ))
            .await
            .unwrap();

        assert_eq!(links.len(), 2);
        assert_eq!(count_songs(ctx.pipeline.db()).await.unwrap(), 2);
        let recent = ctx.recent.snapshot();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].url, "https://youtube.com/watch?v=aaaaaaaaaaa");
        assert_eq!(recent[1].submitter.name, "frank");
    }

    #[test]
    fn test_recent_songs_capped() {
        let recent = RecentSongs::new();
        for i in 0..15 {
            recent.push(RecentSong {
                url: format!("u{}", i),
                submitter: Submitter::new("1", "a"),
                timestamp_ms: i,
            });
        }

        let snapshot = recent.snapshot();
        assert_eq!(snapshot.len(), RECENT_SONGS_CAPACITY);
        assert_eq!(snapshot[0].url, "u5");
        assert_eq!(snapshot[9].url, "u14");
    }
}
