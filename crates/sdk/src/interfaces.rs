//! Function tables ("interfaces") and event tables
//!
//! Each manager is a `#[repr(C)]` struct of nullable function pointers in
//! header order. Event tables have the same shape but are filled in by us
//! and handed to `DiscordCreate`. `callback_data` / `event_data` are opaque
//! to the library and returned unchanged on every invocation.

use std::ffi::{c_char, c_void};

use crate::structs::*;
use crate::types::*;

/// Static description of a native function table.
pub trait FunctionTable {
    /// Header name of the table
    const NAME: &'static str;
    /// Slot names in declaration order
    const SLOTS: &'static [&'static str];
}

/// Declares a function table and its [`FunctionTable`] slot list.
macro_rules! function_table {
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            $( $(#[$slot_meta:meta])* $slot:ident : $fn_ty:ty, )*
        }
    ) => {
        $(#[$meta])*
        #[repr(C)]
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name {
            $( $(#[$slot_meta])* pub $slot: ::core::option::Option<$fn_ty>, )*
        }

        impl $crate::interfaces::FunctionTable for $name {
            const NAME: &'static str = stringify!($name);
            const SLOTS: &'static [&'static str] = &[$(stringify!($slot)),*];
        }
    };
}

// === Completion callbacks ===

pub type DiscordResultCallback =
    Option<unsafe extern "C" fn(callback_data: *mut c_void, result: EDiscordResult)>;
pub type DiscordUserCallback = Option<
    unsafe extern "C" fn(callback_data: *mut c_void, result: EDiscordResult, user: *mut DiscordUser),
>;
pub type DiscordLobbyCallback = Option<
    unsafe extern "C" fn(
        callback_data: *mut c_void,
        result: EDiscordResult,
        lobby: *mut DiscordLobby,
    ),
>;
pub type DiscordOAuth2TokenCallback = Option<
    unsafe extern "C" fn(
        callback_data: *mut c_void,
        result: EDiscordResult,
        oauth2_token: *mut DiscordOAuth2Token,
    ),
>;
pub type DiscordTicketCallback = Option<
    unsafe extern "C" fn(callback_data: *mut c_void, result: EDiscordResult, data: *const c_char),
>;
pub type DiscordImageHandleCallback = Option<
    unsafe extern "C" fn(
        callback_data: *mut c_void,
        result: EDiscordResult,
        handle_result: DiscordImageHandle,
    ),
>;
pub type DiscordDataCallback = Option<
    unsafe extern "C" fn(
        callback_data: *mut c_void,
        result: EDiscordResult,
        data: *mut u8,
        data_length: u32,
    ),
>;
pub type DiscordRelationshipFilter = Option<
    unsafe extern "C" fn(filter_data: *mut c_void, relationship: *mut DiscordRelationship) -> bool,
>;
pub type DiscordLogHook = Option<
    unsafe extern "C" fn(hook_data: *mut c_void, level: EDiscordLogLevel, message: *const c_char),
>;

// === Lobby builders ===

function_table! {
    pub struct IDiscordLobbyTransaction {
        set_type: unsafe extern "C" fn(*mut IDiscordLobbyTransaction, EDiscordLobbyType) -> EDiscordResult,
        set_owner: unsafe extern "C" fn(*mut IDiscordLobbyTransaction, DiscordUserId) -> EDiscordResult,
        set_capacity: unsafe extern "C" fn(*mut IDiscordLobbyTransaction, u32) -> EDiscordResult,
        set_metadata: unsafe extern "C" fn(
            *mut IDiscordLobbyTransaction,
            metadata_key: *mut c_char,
            metadata_value: *mut c_char,
        ) -> EDiscordResult,
        delete_metadata: unsafe extern "C" fn(*mut IDiscordLobbyTransaction, metadata_key: *mut c_char) -> EDiscordResult,
        set_locked: unsafe extern "C" fn(*mut IDiscordLobbyTransaction, bool) -> EDiscordResult,
    }
}

function_table! {
    pub struct IDiscordLobbyMemberTransaction {
        set_metadata: unsafe extern "C" fn(
            *mut IDiscordLobbyMemberTransaction,
            metadata_key: *mut c_char,
            metadata_value: *mut c_char,
        ) -> EDiscordResult,
        delete_metadata: unsafe extern "C" fn(*mut IDiscordLobbyMemberTransaction, metadata_key: *mut c_char) -> EDiscordResult,
    }
}

function_table! {
    pub struct IDiscordLobbySearchQuery {
        filter: unsafe extern "C" fn(
            *mut IDiscordLobbySearchQuery,
            key: *mut c_char,
            comparison: EDiscordLobbySearchComparison,
            cast: EDiscordLobbySearchCast,
            value: *mut c_char,
        ) -> EDiscordResult,
        sort: unsafe extern "C" fn(
            *mut IDiscordLobbySearchQuery,
            key: *mut c_char,
            cast: EDiscordLobbySearchCast,
            value: *mut c_char,
        ) -> EDiscordResult,
        limit: unsafe extern "C" fn(*mut IDiscordLobbySearchQuery, limit: u32) -> EDiscordResult,
        distance: unsafe extern "C" fn(*mut IDiscordLobbySearchQuery, EDiscordLobbySearchDistance) -> EDiscordResult,
    }
}

// === Application ===

pub type IDiscordApplicationEvents = c_void;

function_table! {
    pub struct IDiscordApplicationManager {
        validate_or_exit: unsafe extern "C" fn(*mut IDiscordApplicationManager, *mut c_void, DiscordResultCallback),
        get_current_locale: unsafe extern "C" fn(*mut IDiscordApplicationManager, *mut DiscordLocale),
        get_current_branch: unsafe extern "C" fn(*mut IDiscordApplicationManager, *mut DiscordBranch),
        get_oauth2_token: unsafe extern "C" fn(*mut IDiscordApplicationManager, *mut c_void, DiscordOAuth2TokenCallback),
        get_ticket: unsafe extern "C" fn(*mut IDiscordApplicationManager, *mut c_void, DiscordTicketCallback),
    }
}

// === User ===

function_table! {
    pub struct IDiscordUserEvents {
        on_current_user_update: unsafe extern "C" fn(event_data: *mut c_void),
    }
}

function_table! {
    pub struct IDiscordUserManager {
        get_current_user: unsafe extern "C" fn(*mut IDiscordUserManager, *mut DiscordUser) -> EDiscordResult,
        get_user: unsafe extern "C" fn(*mut IDiscordUserManager, DiscordUserId, *mut c_void, DiscordUserCallback),
        get_current_user_premium_type: unsafe extern "C" fn(*mut IDiscordUserManager, *mut EDiscordPremiumType) -> EDiscordResult,
        current_user_has_flag: unsafe extern "C" fn(*mut IDiscordUserManager, EDiscordUserFlag, *mut bool) -> EDiscordResult,
    }
}

// === Image ===

pub type IDiscordImageEvents = c_void;

function_table! {
    pub struct IDiscordImageManager {
        /// The handle is passed and returned by value
        fetch: unsafe extern "C" fn(
            *mut IDiscordImageManager,
            DiscordImageHandle,
            refresh: bool,
            *mut c_void,
            DiscordImageHandleCallback,
        ),
        get_dimensions: unsafe extern "C" fn(*mut IDiscordImageManager, DiscordImageHandle, *mut DiscordImageDimensions) -> EDiscordResult,
        get_data: unsafe extern "C" fn(*mut IDiscordImageManager, DiscordImageHandle, *mut u8, u32) -> EDiscordResult,
    }
}

// === Activity ===

function_table! {
    pub struct IDiscordActivityEvents {
        on_activity_join: unsafe extern "C" fn(event_data: *mut c_void, secret: *const c_char),
        on_activity_spectate: unsafe extern "C" fn(event_data: *mut c_void, secret: *const c_char),
        on_activity_join_request: unsafe extern "C" fn(event_data: *mut c_void, user: *mut DiscordUser),
        on_activity_invite: unsafe extern "C" fn(
            event_data: *mut c_void,
            type_: EDiscordActivityActionType,
            user: *mut DiscordUser,
            activity: *mut DiscordActivity,
        ),
    }
}

function_table! {
    pub struct IDiscordActivityManager {
        register_command: unsafe extern "C" fn(*mut IDiscordActivityManager, command: *const c_char) -> EDiscordResult,
        register_steam: unsafe extern "C" fn(*mut IDiscordActivityManager, steam_id: u32) -> EDiscordResult,
        update_activity: unsafe extern "C" fn(*mut IDiscordActivityManager, *mut DiscordActivity, *mut c_void, DiscordResultCallback),
        clear_activity: unsafe extern "C" fn(*mut IDiscordActivityManager, *mut c_void, DiscordResultCallback),
        send_request_reply: unsafe extern "C" fn(
            *mut IDiscordActivityManager,
            DiscordUserId,
            EDiscordActivityJoinRequestReply,
            *mut c_void,
            DiscordResultCallback,
        ),
        send_invite: unsafe extern "C" fn(
            *mut IDiscordActivityManager,
            DiscordUserId,
            EDiscordActivityActionType,
            content: *const c_char,
            *mut c_void,
            DiscordResultCallback,
        ),
        accept_invite: unsafe extern "C" fn(*mut IDiscordActivityManager, DiscordUserId, *mut c_void, DiscordResultCallback),
    }
}

// === Relationship ===

function_table! {
    pub struct IDiscordRelationshipEvents {
        on_refresh: unsafe extern "C" fn(event_data: *mut c_void),
        on_relationship_update: unsafe extern "C" fn(event_data: *mut c_void, relationship: *mut DiscordRelationship),
    }
}

function_table! {
    pub struct IDiscordRelationshipManager {
        /// Applies the predicate synchronously, `filter_data` is not retained
        filter: unsafe extern "C" fn(*mut IDiscordRelationshipManager, filter_data: *mut c_void, DiscordRelationshipFilter),
        count: unsafe extern "C" fn(*mut IDiscordRelationshipManager, *mut i32) -> EDiscordResult,
        get: unsafe extern "C" fn(*mut IDiscordRelationshipManager, DiscordUserId, *mut DiscordRelationship) -> EDiscordResult,
        get_at: unsafe extern "C" fn(*mut IDiscordRelationshipManager, u32, *mut DiscordRelationship) -> EDiscordResult,
    }
}

// === Lobby ===

function_table! {
    pub struct IDiscordLobbyEvents {
        on_lobby_update: unsafe extern "C" fn(event_data: *mut c_void, lobby_id: i64),
        on_lobby_delete: unsafe extern "C" fn(event_data: *mut c_void, lobby_id: i64, reason: u32),
        on_member_connect: unsafe extern "C" fn(event_data: *mut c_void, lobby_id: i64, user_id: i64),
        on_member_update: unsafe extern "C" fn(event_data: *mut c_void, lobby_id: i64, user_id: i64),
        on_member_disconnect: unsafe extern "C" fn(event_data: *mut c_void, lobby_id: i64, user_id: i64),
        on_lobby_message: unsafe extern "C" fn(
            event_data: *mut c_void,
            lobby_id: i64,
            user_id: i64,
            data: *mut u8,
            data_length: u32,
        ),
        on_speaking: unsafe extern "C" fn(event_data: *mut c_void, lobby_id: i64, user_id: i64, speaking: bool),
        on_network_message: unsafe extern "C" fn(
            event_data: *mut c_void,
            lobby_id: i64,
            user_id: i64,
            channel_id: u8,
            data: *mut u8,
            data_length: u32,
        ),
    }
}

function_table! {
    pub struct IDiscordLobbyManager {
        get_lobby_create_transaction: unsafe extern "C" fn(*mut IDiscordLobbyManager, *mut *mut IDiscordLobbyTransaction) -> EDiscordResult,
        get_lobby_update_transaction: unsafe extern "C" fn(
            *mut IDiscordLobbyManager,
            DiscordLobbyId,
            *mut *mut IDiscordLobbyTransaction,
        ) -> EDiscordResult,
        get_member_update_transaction: unsafe extern "C" fn(
            *mut IDiscordLobbyManager,
            DiscordLobbyId,
            DiscordUserId,
            *mut *mut IDiscordLobbyMemberTransaction,
        ) -> EDiscordResult,
        create_lobby: unsafe extern "C" fn(*mut IDiscordLobbyManager, *mut IDiscordLobbyTransaction, *mut c_void, DiscordLobbyCallback),
        update_lobby: unsafe extern "C" fn(
            *mut IDiscordLobbyManager,
            DiscordLobbyId,
            *mut IDiscordLobbyTransaction,
            *mut c_void,
            DiscordResultCallback,
        ),
        delete_lobby: unsafe extern "C" fn(*mut IDiscordLobbyManager, DiscordLobbyId, *mut c_void, DiscordResultCallback),
        connect_lobby: unsafe extern "C" fn(
            *mut IDiscordLobbyManager,
            DiscordLobbyId,
            secret: *mut c_char,
            *mut c_void,
            DiscordLobbyCallback,
        ),
        connect_lobby_with_activity_secret: unsafe extern "C" fn(
            *mut IDiscordLobbyManager,
            activity_secret: *mut c_char,
            *mut c_void,
            DiscordLobbyCallback,
        ),
        disconnect_lobby: unsafe extern "C" fn(*mut IDiscordLobbyManager, DiscordLobbyId, *mut c_void, DiscordResultCallback),
        get_lobby: unsafe extern "C" fn(*mut IDiscordLobbyManager, DiscordLobbyId, *mut DiscordLobby) -> EDiscordResult,
        get_lobby_activity_secret: unsafe extern "C" fn(*mut IDiscordLobbyManager, DiscordLobbyId, *mut DiscordLobbySecret) -> EDiscordResult,
        get_lobby_metadata_value: unsafe extern "C" fn(
            *mut IDiscordLobbyManager,
            DiscordLobbyId,
            key: *mut c_char,
            *mut DiscordMetadataValue,
        ) -> EDiscordResult,
        get_lobby_metadata_key: unsafe extern "C" fn(
            *mut IDiscordLobbyManager,
            DiscordLobbyId,
            index: i32,
            *mut DiscordMetadataKey,
        ) -> EDiscordResult,
        lobby_metadata_count: unsafe extern "C" fn(*mut IDiscordLobbyManager, DiscordLobbyId, *mut i32) -> EDiscordResult,
        member_count: unsafe extern "C" fn(*mut IDiscordLobbyManager, DiscordLobbyId, *mut i32) -> EDiscordResult,
        get_member_user_id: unsafe extern "C" fn(*mut IDiscordLobbyManager, DiscordLobbyId, index: i32, *mut DiscordUserId) -> EDiscordResult,
        get_member_user: unsafe extern "C" fn(*mut IDiscordLobbyManager, DiscordLobbyId, DiscordUserId, *mut DiscordUser) -> EDiscordResult,
        get_member_metadata_value: unsafe extern "C" fn(
            *mut IDiscordLobbyManager,
            DiscordLobbyId,
            DiscordUserId,
            key: *mut c_char,
            *mut DiscordMetadataValue,
        ) -> EDiscordResult,
        get_member_metadata_key: unsafe extern "C" fn(
            *mut IDiscordLobbyManager,
            DiscordLobbyId,
            DiscordUserId,
            index: i32,
            *mut DiscordMetadataKey,
        ) -> EDiscordResult,
        member_metadata_count: unsafe extern "C" fn(*mut IDiscordLobbyManager, DiscordLobbyId, DiscordUserId, *mut i32) -> EDiscordResult,
        update_member: unsafe extern "C" fn(
            *mut IDiscordLobbyManager,
            DiscordLobbyId,
            DiscordUserId,
            *mut IDiscordLobbyMemberTransaction,
            *mut c_void,
            DiscordResultCallback,
        ),
        send_lobby_message: unsafe extern "C" fn(
            *mut IDiscordLobbyManager,
            DiscordLobbyId,
            data: *mut u8,
            data_length: u32,
            *mut c_void,
            DiscordResultCallback,
        ),
        get_search_query: unsafe extern "C" fn(*mut IDiscordLobbyManager, *mut *mut IDiscordLobbySearchQuery) -> EDiscordResult,
        search: unsafe extern "C" fn(*mut IDiscordLobbyManager, *mut IDiscordLobbySearchQuery, *mut c_void, DiscordResultCallback),
        lobby_count: unsafe extern "C" fn(*mut IDiscordLobbyManager, *mut i32),
        get_lobby_id: unsafe extern "C" fn(*mut IDiscordLobbyManager, index: i32, *mut DiscordLobbyId) -> EDiscordResult,
        connect_voice: unsafe extern "C" fn(*mut IDiscordLobbyManager, DiscordLobbyId, *mut c_void, DiscordResultCallback),
        disconnect_voice: unsafe extern "C" fn(*mut IDiscordLobbyManager, DiscordLobbyId, *mut c_void, DiscordResultCallback),
        connect_network: unsafe extern "C" fn(*mut IDiscordLobbyManager, DiscordLobbyId) -> EDiscordResult,
        disconnect_network: unsafe extern "C" fn(*mut IDiscordLobbyManager, DiscordLobbyId) -> EDiscordResult,
        flush_network: unsafe extern "C" fn(*mut IDiscordLobbyManager) -> EDiscordResult,
        open_network_channel: unsafe extern "C" fn(*mut IDiscordLobbyManager, DiscordLobbyId, channel_id: u8, reliable: bool) -> EDiscordResult,
        send_network_message: unsafe extern "C" fn(
            *mut IDiscordLobbyManager,
            DiscordLobbyId,
            DiscordUserId,
            channel_id: u8,
            data: *mut u8,
            data_length: u32,
        ) -> EDiscordResult,
    }
}

// === Network ===

function_table! {
    pub struct IDiscordNetworkEvents {
        on_message: unsafe extern "C" fn(
            event_data: *mut c_void,
            peer_id: DiscordNetworkPeerId,
            channel_id: DiscordNetworkChannelId,
            data: *mut u8,
            data_length: u32,
        ),
        on_route_update: unsafe extern "C" fn(event_data: *mut c_void, route_data: *const c_char),
    }
}

function_table! {
    pub struct IDiscordNetworkManager {
        get_peer_id: unsafe extern "C" fn(*mut IDiscordNetworkManager, *mut DiscordNetworkPeerId),
        flush: unsafe extern "C" fn(*mut IDiscordNetworkManager) -> EDiscordResult,
        open_peer: unsafe extern "C" fn(*mut IDiscordNetworkManager, DiscordNetworkPeerId, route_data: *const c_char) -> EDiscordResult,
        update_peer: unsafe extern "C" fn(*mut IDiscordNetworkManager, DiscordNetworkPeerId, route_data: *const c_char) -> EDiscordResult,
        close_peer: unsafe extern "C" fn(*mut IDiscordNetworkManager, DiscordNetworkPeerId) -> EDiscordResult,
        open_channel: unsafe extern "C" fn(
            *mut IDiscordNetworkManager,
            DiscordNetworkPeerId,
            DiscordNetworkChannelId,
            reliable: bool,
        ) -> EDiscordResult,
        close_channel: unsafe extern "C" fn(*mut IDiscordNetworkManager, DiscordNetworkPeerId, DiscordNetworkChannelId) -> EDiscordResult,
        send_message: unsafe extern "C" fn(
            *mut IDiscordNetworkManager,
            DiscordNetworkPeerId,
            DiscordNetworkChannelId,
            data: *mut u8,
            data_length: u32,
        ) -> EDiscordResult,
    }
}

// === Overlay ===

function_table! {
    pub struct IDiscordOverlayEvents {
        on_toggle: unsafe extern "C" fn(event_data: *mut c_void, locked: bool),
    }
}

function_table! {
    pub struct IDiscordOverlayManager {
        is_enabled: unsafe extern "C" fn(*mut IDiscordOverlayManager, *mut bool),
        is_locked: unsafe extern "C" fn(*mut IDiscordOverlayManager, *mut bool),
        set_locked: unsafe extern "C" fn(*mut IDiscordOverlayManager, bool, *mut c_void, DiscordResultCallback),
        open_activity_invite: unsafe extern "C" fn(*mut IDiscordOverlayManager, EDiscordActivityActionType, *mut c_void, DiscordResultCallback),
        open_guild_invite: unsafe extern "C" fn(*mut IDiscordOverlayManager, code: *const c_char, *mut c_void, DiscordResultCallback),
        open_voice_settings: unsafe extern "C" fn(*mut IDiscordOverlayManager, *mut c_void, DiscordResultCallback),
    }
}

// === Storage ===

pub type IDiscordStorageEvents = c_void;

function_table! {
    pub struct IDiscordStorageManager {
        read: unsafe extern "C" fn(
            *mut IDiscordStorageManager,
            name: *const c_char,
            data: *mut u8,
            data_length: u32,
            read: *mut u32,
        ) -> EDiscordResult,
        read_async: unsafe extern "C" fn(*mut IDiscordStorageManager, name: *const c_char, *mut c_void, DiscordDataCallback),
        read_async_partial: unsafe extern "C" fn(
            *mut IDiscordStorageManager,
            name: *const c_char,
            offset: u64,
            length: u64,
            *mut c_void,
            DiscordDataCallback,
        ),
        write: unsafe extern "C" fn(*mut IDiscordStorageManager, name: *const c_char, data: *mut u8, data_length: u32) -> EDiscordResult,
        write_async: unsafe extern "C" fn(
            *mut IDiscordStorageManager,
            name: *const c_char,
            data: *mut u8,
            data_length: u32,
            *mut c_void,
            DiscordResultCallback,
        ),
        delete_: unsafe extern "C" fn(*mut IDiscordStorageManager, name: *const c_char) -> EDiscordResult,
        exists: unsafe extern "C" fn(*mut IDiscordStorageManager, name: *const c_char, *mut bool) -> EDiscordResult,
        count: unsafe extern "C" fn(*mut IDiscordStorageManager, *mut i32),
        stat: unsafe extern "C" fn(*mut IDiscordStorageManager, name: *const c_char, *mut DiscordFileStat) -> EDiscordResult,
        stat_at: unsafe extern "C" fn(*mut IDiscordStorageManager, index: i32, *mut DiscordFileStat) -> EDiscordResult,
        get_path: unsafe extern "C" fn(*mut IDiscordStorageManager, *mut DiscordPath) -> EDiscordResult,
    }
}

// === Store ===

function_table! {
    pub struct IDiscordStoreEvents {
        on_entitlement_create: unsafe extern "C" fn(event_data: *mut c_void, entitlement: *mut DiscordEntitlement),
        on_entitlement_delete: unsafe extern "C" fn(event_data: *mut c_void, entitlement: *mut DiscordEntitlement),
    }
}

function_table! {
    pub struct IDiscordStoreManager {
        fetch_skus: unsafe extern "C" fn(*mut IDiscordStoreManager, *mut c_void, DiscordResultCallback),
        count_skus: unsafe extern "C" fn(*mut IDiscordStoreManager, *mut i32),
        get_sku: unsafe extern "C" fn(*mut IDiscordStoreManager, DiscordSnowflake, *mut DiscordSku) -> EDiscordResult,
        get_sku_at: unsafe extern "C" fn(*mut IDiscordStoreManager, index: i32, *mut DiscordSku) -> EDiscordResult,
        fetch_entitlements: unsafe extern "C" fn(*mut IDiscordStoreManager, *mut c_void, DiscordResultCallback),
        count_entitlements: unsafe extern "C" fn(*mut IDiscordStoreManager, *mut i32),
        get_entitlement: unsafe extern "C" fn(*mut IDiscordStoreManager, DiscordSnowflake, *mut DiscordEntitlement) -> EDiscordResult,
        get_entitlement_at: unsafe extern "C" fn(*mut IDiscordStoreManager, index: i32, *mut DiscordEntitlement) -> EDiscordResult,
        has_sku_entitlement: unsafe extern "C" fn(*mut IDiscordStoreManager, DiscordSnowflake, *mut bool) -> EDiscordResult,
        start_purchase: unsafe extern "C" fn(*mut IDiscordStoreManager, DiscordSnowflake, *mut c_void, DiscordResultCallback),
    }
}

// === Voice ===

function_table! {
    pub struct IDiscordVoiceEvents {
        on_settings_update: unsafe extern "C" fn(event_data: *mut c_void),
    }
}

function_table! {
    pub struct IDiscordVoiceManager {
        get_input_mode: unsafe extern "C" fn(*mut IDiscordVoiceManager, *mut DiscordInputMode) -> EDiscordResult,
        set_input_mode: unsafe extern "C" fn(*mut IDiscordVoiceManager, DiscordInputMode, *mut c_void, DiscordResultCallback),
        is_self_mute: unsafe extern "C" fn(*mut IDiscordVoiceManager, *mut bool) -> EDiscordResult,
        set_self_mute: unsafe extern "C" fn(*mut IDiscordVoiceManager, bool) -> EDiscordResult,
        is_self_deaf: unsafe extern "C" fn(*mut IDiscordVoiceManager, *mut bool) -> EDiscordResult,
        set_self_deaf: unsafe extern "C" fn(*mut IDiscordVoiceManager, bool) -> EDiscordResult,
        is_local_mute: unsafe extern "C" fn(*mut IDiscordVoiceManager, DiscordSnowflake, *mut bool) -> EDiscordResult,
        set_local_mute: unsafe extern "C" fn(*mut IDiscordVoiceManager, DiscordSnowflake, bool) -> EDiscordResult,
        get_local_volume: unsafe extern "C" fn(*mut IDiscordVoiceManager, DiscordSnowflake, *mut u8) -> EDiscordResult,
        set_local_volume: unsafe extern "C" fn(*mut IDiscordVoiceManager, DiscordSnowflake, u8) -> EDiscordResult,
    }
}

// === Achievement ===

function_table! {
    pub struct IDiscordAchievementEvents {
        on_user_achievement_update: unsafe extern "C" fn(event_data: *mut c_void, user_achievement: *mut DiscordUserAchievement),
    }
}

function_table! {
    pub struct IDiscordAchievementManager {
        set_user_achievement: unsafe extern "C" fn(
            *mut IDiscordAchievementManager,
            DiscordSnowflake,
            percent_complete: u8,
            *mut c_void,
            DiscordResultCallback,
        ),
        fetch_user_achievements: unsafe extern "C" fn(*mut IDiscordAchievementManager, *mut c_void, DiscordResultCallback),
        count_user_achievements: unsafe extern "C" fn(*mut IDiscordAchievementManager, *mut i32),
        get_user_achievement: unsafe extern "C" fn(*mut IDiscordAchievementManager, DiscordSnowflake, *mut DiscordUserAchievement) -> EDiscordResult,
        get_user_achievement_at: unsafe extern "C" fn(*mut IDiscordAchievementManager, index: i32, *mut DiscordUserAchievement) -> EDiscordResult,
    }
}

// === Core ===

pub type IDiscordCoreEvents = c_void;

function_table! {
    pub struct IDiscordCore {
        destroy: unsafe extern "C" fn(*mut IDiscordCore),
        run_callbacks: unsafe extern "C" fn(*mut IDiscordCore) -> EDiscordResult,
        set_log_hook: unsafe extern "C" fn(*mut IDiscordCore, min_level: EDiscordLogLevel, hook_data: *mut c_void, DiscordLogHook),
        get_application_manager: unsafe extern "C" fn(*mut IDiscordCore) -> *mut IDiscordApplicationManager,
        get_user_manager: unsafe extern "C" fn(*mut IDiscordCore) -> *mut IDiscordUserManager,
        get_image_manager: unsafe extern "C" fn(*mut IDiscordCore) -> *mut IDiscordImageManager,
        get_activity_manager: unsafe extern "C" fn(*mut IDiscordCore) -> *mut IDiscordActivityManager,
        get_relationship_manager: unsafe extern "C" fn(*mut IDiscordCore) -> *mut IDiscordRelationshipManager,
        get_lobby_manager: unsafe extern "C" fn(*mut IDiscordCore) -> *mut IDiscordLobbyManager,
        get_network_manager: unsafe extern "C" fn(*mut IDiscordCore) -> *mut IDiscordNetworkManager,
        get_overlay_manager: unsafe extern "C" fn(*mut IDiscordCore) -> *mut IDiscordOverlayManager,
        get_storage_manager: unsafe extern "C" fn(*mut IDiscordCore) -> *mut IDiscordStorageManager,
        get_store_manager: unsafe extern "C" fn(*mut IDiscordCore) -> *mut IDiscordStoreManager,
        get_voice_manager: unsafe extern "C" fn(*mut IDiscordCore) -> *mut IDiscordVoiceManager,
        get_achievement_manager: unsafe extern "C" fn(*mut IDiscordCore) -> *mut IDiscordAchievementManager,
    }
}

#[cfg(test)]
mod tests {
    use std::mem::size_of;

    use super::*;

    fn assert_table<T: FunctionTable>(expected_slots: usize) {
        assert_eq!(T::SLOTS.len(), expected_slots, "{}", T::NAME);
        assert_eq!(
            size_of::<T>(),
            expected_slots * size_of::<usize>(),
            "{} is not a packed pointer table",
            T::NAME
        );
    }

    #[test]
    fn test_manager_table_sizes() {
        assert_table::<IDiscordApplicationManager>(5);
        assert_table::<IDiscordUserManager>(4);
        assert_table::<IDiscordImageManager>(3);
        assert_table::<IDiscordActivityManager>(7);
        assert_table::<IDiscordRelationshipManager>(4);
        assert_table::<IDiscordLobbyManager>(33);
        assert_table::<IDiscordNetworkManager>(8);
        assert_table::<IDiscordOverlayManager>(6);
        assert_table::<IDiscordStorageManager>(11);
        assert_table::<IDiscordStoreManager>(10);
        assert_table::<IDiscordVoiceManager>(10);
        assert_table::<IDiscordAchievementManager>(5);
        assert_table::<IDiscordCore>(15);
    }

    #[test]
    fn test_builder_table_sizes() {
        assert_table::<IDiscordLobbyTransaction>(6);
        assert_table::<IDiscordLobbyMemberTransaction>(2);
        assert_table::<IDiscordLobbySearchQuery>(4);
    }

    #[test]
    fn test_event_table_sizes() {
        assert_table::<IDiscordUserEvents>(1);
        assert_table::<IDiscordActivityEvents>(4);
        assert_table::<IDiscordRelationshipEvents>(2);
        assert_table::<IDiscordLobbyEvents>(8);
        assert_table::<IDiscordNetworkEvents>(2);
        assert_table::<IDiscordOverlayEvents>(1);
        assert_table::<IDiscordStoreEvents>(2);
        assert_table::<IDiscordVoiceEvents>(1);
        assert_table::<IDiscordAchievementEvents>(1);
    }

    #[test]
    fn test_slot_order_follows_header() {
        assert_eq!(
            IDiscordLobbyEvents::SLOTS,
            &[
                "on_lobby_update",
                "on_lobby_delete",
                "on_member_connect",
                "on_member_update",
                "on_member_disconnect",
                "on_lobby_message",
                "on_speaking",
                "on_network_message",
            ]
        );
        assert_eq!(IDiscordCore::SLOTS[0], "destroy");
        assert_eq!(IDiscordCore::SLOTS[14], "get_achievement_manager");
    }

    #[test]
    fn test_default_table_is_empty() {
        let table = IDiscordUserManager::default();
        assert!(table.get_current_user.is_none());
        assert!(table.get_user.is_none());
    }
}
