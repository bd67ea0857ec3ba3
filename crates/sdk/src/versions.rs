//! Version tags passed to `DiscordCreate`
//!
//! These must match the header the native library was built from.
//! Derived from `discord_game_sdk.h` 2.x.

use crate::types::DiscordVersion;

/// Version of the root `DiscordCreate` contract
pub const DISCORD_VERSION: DiscordVersion = 2;

pub const DISCORD_APPLICATION_MANAGER_VERSION: DiscordVersion = 1;
pub const DISCORD_USER_MANAGER_VERSION: DiscordVersion = 1;
pub const DISCORD_IMAGE_MANAGER_VERSION: DiscordVersion = 1;
pub const DISCORD_ACTIVITY_MANAGER_VERSION: DiscordVersion = 1;
pub const DISCORD_RELATIONSHIP_MANAGER_VERSION: DiscordVersion = 1;
pub const DISCORD_LOBBY_MANAGER_VERSION: DiscordVersion = 1;
pub const DISCORD_NETWORK_MANAGER_VERSION: DiscordVersion = 1;
pub const DISCORD_OVERLAY_MANAGER_VERSION: DiscordVersion = 1;
pub const DISCORD_STORAGE_MANAGER_VERSION: DiscordVersion = 1;
pub const DISCORD_STORE_MANAGER_VERSION: DiscordVersion = 1;
pub const DISCORD_VOICE_MANAGER_VERSION: DiscordVersion = 1;
pub const DISCORD_ACHIEVEMENT_MANAGER_VERSION: DiscordVersion = 1;

/// Collected manager versions for iteration
pub const MANAGER_VERSIONS: &[(&str, DiscordVersion)] = &[
    ("application", DISCORD_APPLICATION_MANAGER_VERSION),
    ("user", DISCORD_USER_MANAGER_VERSION),
    ("image", DISCORD_IMAGE_MANAGER_VERSION),
    ("activity", DISCORD_ACTIVITY_MANAGER_VERSION),
    ("relationship", DISCORD_RELATIONSHIP_MANAGER_VERSION),
    ("lobby", DISCORD_LOBBY_MANAGER_VERSION),
    ("network", DISCORD_NETWORK_MANAGER_VERSION),
    ("overlay", DISCORD_OVERLAY_MANAGER_VERSION),
    ("storage", DISCORD_STORAGE_MANAGER_VERSION),
    ("store", DISCORD_STORE_MANAGER_VERSION),
    ("voice", DISCORD_VOICE_MANAGER_VERSION),
    ("achievement", DISCORD_ACHIEVEMENT_MANAGER_VERSION),
];
