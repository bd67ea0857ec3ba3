//! Record layouts from `discord_game_sdk.h`
//!
//! Every record is plain old data: integers, `bool`s and fixed `c_char`
//! buffers. Field order and widths must match the native header byte for
//! byte, the layout tests at the bottom pin the 64-bit sizes.

use std::ffi::c_char;

use crate::types::*;

/// Implements `Default` as an all-zero value.
///
/// Large `c_char` arrays don't implement `Default`, and zero is the value
/// the native SDK itself uses for "empty" records.
macro_rules! zeroed_default {
    ($($name:ident),* $(,)?) => {
        $(
            impl Default for $name {
                fn default() -> Self {
                    // SAFETY: the record only contains integers, bools and
                    // c_char arrays, for which all-zero is a valid value.
                    unsafe { std::mem::zeroed() }
                }
            }
        )*
    };
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct DiscordUser {
    pub id: DiscordUserId,
    pub username: [c_char; 256],
    pub discriminator: [c_char; 8],
    pub avatar: [c_char; 128],
    pub bot: bool,
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct DiscordOAuth2Token {
    pub access_token: [c_char; 128],
    pub scopes: [c_char; 1024],
    pub expires: DiscordTimestamp,
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct DiscordImageHandle {
    pub type_: EDiscordImageType,
    pub id: i64,
    pub size: u32,
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct DiscordImageDimensions {
    pub width: u32,
    pub height: u32,
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct DiscordActivityTimestamps {
    pub start: DiscordTimestamp,
    pub end: DiscordTimestamp,
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct DiscordActivityAssets {
    pub large_image: [c_char; 128],
    pub large_text: [c_char; 128],
    pub small_image: [c_char; 128],
    pub small_text: [c_char; 128],
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct DiscordPartySize {
    pub current_size: i32,
    pub max_size: i32,
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct DiscordActivityParty {
    pub id: [c_char; 128],
    pub size: DiscordPartySize,
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct DiscordActivitySecrets {
    pub match_: [c_char; 128],
    pub join: [c_char; 128],
    pub spectate: [c_char; 128],
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct DiscordActivity {
    pub type_: EDiscordActivityType,
    pub application_id: i64,
    pub name: [c_char; 128],
    pub state: [c_char; 128],
    pub details: [c_char; 128],
    pub timestamps: DiscordActivityTimestamps,
    pub assets: DiscordActivityAssets,
    pub party: DiscordActivityParty,
    pub secrets: DiscordActivitySecrets,
    pub instance: bool,
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct DiscordPresence {
    pub status: EDiscordStatus,
    pub activity: DiscordActivity,
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct DiscordRelationship {
    pub type_: EDiscordRelationshipType,
    pub user: DiscordUser,
    pub presence: DiscordPresence,
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct DiscordLobby {
    pub id: DiscordLobbyId,
    pub type_: EDiscordLobbyType,
    pub owner_id: DiscordUserId,
    pub secret: DiscordLobbySecret,
    pub capacity: u32,
    pub locked: bool,
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct DiscordFileStat {
    pub filename: [c_char; 260],
    pub size: u64,
    pub last_modified: u64,
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct DiscordEntitlement {
    pub id: DiscordSnowflake,
    pub type_: EDiscordEntitlementType,
    pub sku_id: DiscordSnowflake,
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct DiscordSkuPrice {
    pub amount: u32,
    pub currency: [c_char; 16],
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct DiscordSku {
    pub id: DiscordSnowflake,
    pub type_: EDiscordSkuType,
    pub name: [c_char; 256],
    pub price: DiscordSkuPrice,
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct DiscordInputMode {
    pub type_: EDiscordInputModeType,
    pub shortcut: [c_char; 256],
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct DiscordUserAchievement {
    pub user_id: DiscordSnowflake,
    pub achievement_id: DiscordSnowflake,
    pub percent_complete: u8,
    pub unlocked_at: DiscordDateTime,
}

zeroed_default!(
    DiscordUser,
    DiscordOAuth2Token,
    DiscordImageHandle,
    DiscordImageDimensions,
    DiscordActivityTimestamps,
    DiscordActivityAssets,
    DiscordPartySize,
    DiscordActivityParty,
    DiscordActivitySecrets,
    DiscordActivity,
    DiscordPresence,
    DiscordRelationship,
    DiscordLobby,
    DiscordFileStat,
    DiscordEntitlement,
    DiscordSkuPrice,
    DiscordSku,
    DiscordInputMode,
    DiscordUserAchievement,
);
