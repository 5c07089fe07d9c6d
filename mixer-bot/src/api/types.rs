//! Discord interaction payloads and responses
//!
//! Only the fields the bot reads are modeled; everything else in the payload
//! is ignored during deserialization.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// ADMINISTRATOR permission bit
pub const ADMINISTRATOR: u64 = 0x8;

/// Message flag: hide link previews
pub const FLAG_SUPPRESS_EMBEDS: u64 = 1 << 2;
/// Message flag: only the invoking user sees the reply
pub const FLAG_EPHEMERAL: u64 = 1 << 6;

/// Top-level interaction kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionKind {
    Ping,
    ApplicationCommand,
    MessageComponent,
    /// Anything else, including a missing or non-integer `type`
    Other(Value),
}

impl From<&Value> for InteractionKind {
    fn from(value: &Value) -> Self {
        match value.as_u64() {
            Some(1) => InteractionKind::Ping,
            Some(2) => InteractionKind::ApplicationCommand,
            Some(3) => InteractionKind::MessageComponent,
            _ => InteractionKind::Other(value.clone()),
        }
    }
}

/// Inbound interaction
#[derive(Debug, Clone, Deserialize)]
pub struct Interaction {
    /// Kept raw so an unexpected value still reaches the handler
    #[serde(rename = "type", default)]
    pub kind: Value,
    #[serde(default)]
    pub data: Option<InteractionData>,
    /// Present when invoked inside a guild
    #[serde(default)]
    pub member: Option<GuildMember>,
    /// Present when invoked in a DM
    #[serde(default)]
    pub user: Option<InteractionUser>,
}

impl Interaction {
    pub fn kind(&self) -> InteractionKind {
        InteractionKind::from(&self.kind)
    }

    /// Whether the invoking member holds the administrator bit
    pub fn invoker_is_admin(&self) -> bool {
        self.member
            .as_ref()
            .and_then(|m| m.permissions.as_deref())
            .and_then(|p| p.trim().parse::<u64>().ok())
            .map(|bits| bits & ADMINISTRATOR == ADMINISTRATOR)
            .unwrap_or(false)
    }

    /// Guild member's user, or the DM user
    pub fn invoker(&self) -> Option<&InteractionUser> {
        self.member
            .as_ref()
            .and_then(|m| m.user.as_ref())
            .or(self.user.as_ref())
    }

    /// Display name of whoever sent the interaction, for logs
    pub fn invoker_name(&self) -> &str {
        self.invoker()
            .map(|u| u.username.as_str())
            .unwrap_or("unknown")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InteractionData {
    /// Command name (application commands)
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub options: Vec<CommandOption>,
    /// Component id (message components)
    #[serde(default)]
    pub custom_id: Option<String>,
}

impl InteractionData {
    /// String value of option `name`
    ///
    /// Snowflake options (channel, role) arrive as strings too.
    pub fn option_str(&self, name: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|opt| opt.name == name)
            .and_then(|opt| opt.value.as_ref())
            .and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommandOption {
    pub name: String,
    #[serde(default)]
    pub value: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GuildMember {
    /// Permission bit set as a decimal string
    #[serde(default)]
    pub permissions: Option<String>,
    #[serde(default)]
    pub user: Option<InteractionUser>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InteractionUser {
    pub id: String,
    pub username: String,
}

/// Response callback types
pub mod callback {
    pub const PONG: u8 = 1;
    pub const CHANNEL_MESSAGE_WITH_SOURCE: u8 = 4;
    pub const DEFERRED_UPDATE_MESSAGE: u8 = 6;
}

/// Synchronous interaction response
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InteractionResponse {
    #[serde(rename = "type")]
    pub kind: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<MessageData>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageData {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flags: Option<u64>,
}

impl InteractionResponse {
    pub fn pong() -> Self {
        Self {
            kind: callback::PONG,
            data: None,
        }
    }

    pub fn deferred_update() -> Self {
        Self {
            kind: callback::DEFERRED_UPDATE_MESSAGE,
            data: None,
        }
    }

    pub fn message(content: impl Into<String>) -> Self {
        Self {
            kind: callback::CHANNEL_MESSAGE_WITH_SOURCE,
            data: Some(MessageData {
                content: content.into(),
                flags: None,
            }),
        }
    }

    pub fn with_flags(mut self, flags: u64) -> Self {
        if let Some(data) = self.data.as_mut() {
            data.flags = Some(flags);
        }
        self
    }

    /// Message content, if this response carries one
    pub fn content(&self) -> Option<&str> {
        self.data.as_ref().map(|d| d.content.as_str())
    }
}
