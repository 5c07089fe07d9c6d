//! External integrations and the ingestion pipeline

pub mod channel_scanner;
pub mod discord_client;
pub mod ingest;
pub mod listener;
pub mod youtube_client;

pub use channel_scanner::{scan_channel, ChannelMessage, MessageSource, ScanReport};
pub use discord_client::{CommandScope, DiscordClient, DiscordError};
pub use ingest::{IngestPipeline, IngestedLink};
pub use listener::{run_listener, ListenerContext, RecentSongs};
pub use youtube_client::{MetadataSource, YouTubeClient, YouTubeError};
