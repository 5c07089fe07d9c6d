//! Discord REST API client (bot token auth)
//!
//! Covers the two REST calls the bot makes: listing channel messages for the
//! scanner and bulk-overwriting slash commands.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::services::channel_scanner::{ChannelMessage, MessageSource};

const DISCORD_API_BASE: &str = "https://discord.com/api/v10";
const USER_AGENT: &str = concat!(
    "DiscordBot (https://github.com/mixer-bot/mixer, ",
    env!("CARGO_PKG_VERSION"),
    ")"
);

/// Discord client errors
#[derive(Debug, Error)]
pub enum DiscordError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Message as returned by `GET /channels/{id}/messages`
#[derive(Debug, Clone, Deserialize)]
pub struct ApiMessage {
    pub id: String,
    #[serde(default)]
    pub content: Option<String>,
    /// RFC 3339
    pub timestamp: String,
    pub author: ApiUser,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiUser {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub bot: bool,
}

impl TryFrom<ApiMessage> for ChannelMessage {
    type Error = DiscordError;

    fn try_from(message: ApiMessage) -> Result<Self, Self::Error> {
        let timestamp_ms = chrono::DateTime::parse_from_rfc3339(&message.timestamp)
            .map_err(|e| {
                DiscordError::ParseError(format!(
                    "message {} timestamp '{}': {}",
                    message.id, message.timestamp, e
                ))
            })?
            .timestamp_millis();

        Ok(ChannelMessage {
            id: message.id,
            author_id: message.author.id,
            author_name: message.author.username,
            author_is_bot: message.author.bot,
            content: message.content,
            timestamp_ms,
        })
    }
}

/// Where slash commands are registered
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandScope {
    Global,
    Guild(String),
}

impl CommandScope {
    fn endpoint(&self, application_id: &str) -> String {
        match self {
            CommandScope::Global => format!("applications/{}/commands", application_id),
            CommandScope::Guild(guild_id) => {
                format!("applications/{}/guilds/{}/commands", application_id, guild_id)
            }
        }
    }
}

/// Discord REST client
pub struct DiscordClient {
    http_client: reqwest::Client,
    bot_token: String,
}

impl DiscordClient {
    pub fn new(bot_token: String) -> Result<Self, DiscordError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| DiscordError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            bot_token,
        })
    }

    fn url(endpoint: &str) -> String {
        format!("{}/{}", DISCORD_API_BASE, endpoint.trim_start_matches('/'))
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, DiscordError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_text = response.text().await.unwrap_or_default();
        Err(DiscordError::ApiError(status.as_u16(), error_text))
    }

    /// Fetch up to `limit` (max 100) most recent messages in a channel
    pub async fn list_messages(
        &self,
        channel_id: &str,
        limit: u8,
    ) -> Result<Vec<ApiMessage>, DiscordError> {
        let url = Self::url(&format!("channels/{}/messages", channel_id));
        tracing::debug!(channel_id = %channel_id, limit, "Listing channel messages");

        let response = self
            .http_client
            .get(&url)
            .header("Authorization", format!("Bot {}", self.bot_token))
            .query(&[("limit", limit.min(100).to_string())])
            .send()
            .await
            .map_err(|e| DiscordError::NetworkError(e.to_string()))?;

        let body: Value = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| DiscordError::ParseError(e.to_string()))?;

        if !body.is_array() {
            return Err(DiscordError::ParseError(
                "Invalid response from Discord API: expected a message array".to_string(),
            ));
        }

        serde_json::from_value(body)
            .map_err(|e| DiscordError::ParseError(e.to_string()))
    }

    /// Replace every registered command in `scope` with `commands`
    ///
    /// Returns the HTTP status and the registered command objects.
    pub async fn overwrite_commands(
        &self,
        application_id: &str,
        scope: &CommandScope,
        commands: &Value,
    ) -> Result<(u16, Value), DiscordError> {
        let url = Self::url(&scope.endpoint(application_id));

        let response = self
            .http_client
            .put(&url)
            .header("Authorization", format!("Bot {}", self.bot_token))
            .json(commands)
            .send()
            .await
            .map_err(|e| DiscordError::NetworkError(e.to_string()))?;

        let response = Self::check(response).await?;
        let status = response.status().as_u16();
        let body = response
            .json()
            .await
            .map_err(|e| DiscordError::ParseError(e.to_string()))?;

        Ok((status, body))
    }
}

#[async_trait]
impl MessageSource for DiscordClient {
    async fn recent_messages(
        &self,
        channel_id: &str,
        limit: u8,
    ) -> anyhow::Result<Vec<ChannelMessage>> {
        let messages = self.list_messages(channel_id, limit).await?;

        let converted = messages
            .into_iter()
            .map(ChannelMessage::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(converted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_endpoints() {
        assert_eq!(
            CommandScope::Global.endpoint("123"),
            "applications/123/commands"
        );
        assert_eq!(
            CommandScope::Guild("456".to_string()).endpoint("123"),
            "applications/123/guilds/456/commands"
        );
    }

    #[test]
    fn test_url_joins_without_double_slash() {
        assert_eq!(
            DiscordClient::url("/channels/1/messages"),
            "https://discord.com/api/v10/channels/1/messages"
        );
    }

    #[test]
    fn test_api_message_conversion() {
        let raw = r#"{
            "id": "9001",
            "content": "listen https://youtube.com/watch?v=aaaaaaaaaaa",
            "timestamp": "2024-03-01T12:00:00.500000+00:00",
            "author": { "id": "77", "username": "dana" }
        }"#;

        let message: ApiMessage = serde_json::from_str(raw).unwrap();
        let converted = ChannelMessage::try_from(message).unwrap();

        assert_eq!(converted.author_id, "77");
        assert_eq!(converted.author_name, "dana");
        assert!(!converted.author_is_bot);
        assert_eq!(converted.timestamp_ms, 1_709_294_400_500);
    }

    #[test]
    fn test_bot_flag_and_missing_content() {
        let raw = r#"{
            "id": "1",
            "timestamp": "2024-03-01T12:00:00+00:00",
            "author": { "id": "2", "username": "mixer", "bot": true }
        }"#;

        let message: ApiMessage = serde_json::from_str(raw).unwrap();
        let converted = ChannelMessage::try_from(message).unwrap();

        assert!(converted.author_is_bot);
        assert!(converted.content.is_none());
    }

    #[test]
    fn test_bad_timestamp_is_parse_error() {
        let raw = r#"{
            "id": "1",
            "timestamp": "yesterday",
            "author": { "id": "2", "username": "x" }
        }"#;

        let message: ApiMessage = serde_json::from_str(raw).unwrap();
        let result = ChannelMessage::try_from(message);
        assert!(matches!(result, Err(DiscordError::ParseError(_))));
    }
}
