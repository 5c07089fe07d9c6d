//! Slash command definitions pushed to Discord by `register-commands`

use serde_json::{json, Value};

use super::{QUERY_SONGS, RECENT_SONGS, SCAN_MUSIC, SET_ADMIN_ROLE, SET_CHANNEL, TEST};

const CHAT_INPUT: u8 = 1;

const OPTION_STRING: u8 = 3;
const OPTION_CHANNEL: u8 = 7;
const OPTION_ROLE: u8 = 8;

/// Guild install and user install
const INTEGRATION_TYPES: [u8; 2] = [0, 1];
/// Guild and private channel
const GUILD_CONTEXTS: [u8; 2] = [0, 2];

/// Administrator bit as Discord expects it in `default_member_permissions`
const ADMIN_ONLY: &str = "8";

/// Every command the bot answers, in registration order
pub fn command_manifest() -> Value {
    json!([
        {
            "name": TEST,
            "description": "Basic command",
            "type": CHAT_INPUT,
            "integration_types": INTEGRATION_TYPES,
            "contexts": [0, 1, 2],
        },
        {
            "name": SET_CHANNEL,
            "description": "Set the music channel",
            "type": CHAT_INPUT,
            "options": [{
                "type": OPTION_CHANNEL,
                "name": "channel",
                "description": "The channel to set as the music channel",
                "required": true,
            }],
            "default_member_permissions": ADMIN_ONLY,
            "integration_types": INTEGRATION_TYPES,
            "contexts": GUILD_CONTEXTS,
        },
        {
            "name": SET_ADMIN_ROLE,
            "description": "Set the role that can access admin-privileged commands.",
            "type": CHAT_INPUT,
            "options": [{
                "type": OPTION_ROLE,
                "name": "role",
                "description": "The role to set as the Bot Controller role.",
                "required": true,
            }],
            "default_member_permissions": ADMIN_ONLY,
            "integration_types": INTEGRATION_TYPES,
            "contexts": GUILD_CONTEXTS,
        },
        {
            "name": RECENT_SONGS,
            "description": "Get the last 10 songs added to the music channel",
            "type": CHAT_INPUT,
            "integration_types": INTEGRATION_TYPES,
            "contexts": GUILD_CONTEXTS,
        },
        {
            "name": SCAN_MUSIC,
            "description": "Scan the channel for music links not in the database",
            "type": CHAT_INPUT,
            "integration_types": INTEGRATION_TYPES,
            "contexts": GUILD_CONTEXTS,
        },
        {
            "name": QUERY_SONGS,
            "description": "Search songs by user, artist, or title",
            "type": CHAT_INPUT,
            "options": [
                {
                    "type": OPTION_STRING,
                    "name": "user",
                    "description": "Discord username or user mention",
                    "required": false,
                },
                {
                    "type": OPTION_STRING,
                    "name": "artist",
                    "description": "Artist name (partial match allowed)",
                    "required": false,
                },
                {
                    "type": OPTION_STRING,
                    "name": "title",
                    "description": "Song title (partial match allowed)",
                    "required": false,
                },
            ],
            "integration_types": INTEGRATION_TYPES,
            "contexts": GUILD_CONTEXTS,
        },
    ])
}

/// Names in `manifest`, for logging
pub fn command_names(manifest: &Value) -> Vec<&str> {
    manifest
        .as_array()
        .map(|commands| {
            commands
                .iter()
                .filter_map(|c| c.get("name").and_then(Value::as_str))
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_lists_every_command() {
        let manifest = command_manifest();

        assert_eq!(
            command_names(&manifest),
            vec![TEST, SET_CHANNEL, SET_ADMIN_ROLE, RECENT_SONGS, SCAN_MUSIC, QUERY_SONGS]
        );
    }

    #[test]
    fn test_admin_commands_require_administrator() {
        let manifest = command_manifest();
        let commands = manifest.as_array().unwrap();

        for command in commands {
            let name = command["name"].as_str().unwrap();
            let restricted = command.get("default_member_permissions").is_some();
            assert_eq!(
                restricted,
                name == SET_CHANNEL || name == SET_ADMIN_ROLE,
                "unexpected permissions on {}",
                name
            );
        }
        assert_eq!(commands[1]["default_member_permissions"], "8");
    }

    #[test]
    fn test_query_options_are_optional_strings() {
        let manifest = command_manifest();
        let options = manifest[5]["options"].as_array().unwrap();

        assert_eq!(options.len(), 3);
        assert!(options
            .iter()
            .all(|o| o["type"] == OPTION_STRING && o["required"] == false));
    }
}
