//! Creation parameters and the `DiscordCreate` entry point

use std::ffi::c_void;
use std::ptr;

use crate::interfaces::*;
use crate::types::*;
use crate::versions::*;

/// Exported symbol name of the entry point
pub const DISCORD_CREATE_SYMBOL: &[u8] = b"DiscordCreate\0";

/// `enum EDiscordResult DiscordCreate(DiscordVersion, struct DiscordCreateParams*, struct IDiscordCore**)`
pub type DiscordCreateFn = unsafe extern "C" fn(
    version: DiscordVersion,
    params: *mut DiscordCreateParams,
    result: *mut *mut IDiscordCore,
) -> EDiscordResult;

/// Parameter block read by `DiscordCreate`.
///
/// Event table pointers must stay valid for as long as the created core
/// object exists; the library keeps them.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct DiscordCreateParams {
    pub client_id: DiscordClientId,
    pub flags: u64,
    pub events: *mut IDiscordCoreEvents,
    pub event_data: *mut c_void,
    pub application_events: *mut IDiscordApplicationEvents,
    pub application_version: DiscordVersion,
    pub user_events: *mut IDiscordUserEvents,
    pub user_version: DiscordVersion,
    pub image_events: *mut IDiscordImageEvents,
    pub image_version: DiscordVersion,
    pub activity_events: *mut IDiscordActivityEvents,
    pub activity_version: DiscordVersion,
    pub relationship_events: *mut IDiscordRelationshipEvents,
    pub relationship_version: DiscordVersion,
    pub lobby_events: *mut IDiscordLobbyEvents,
    pub lobby_version: DiscordVersion,
    pub network_events: *mut IDiscordNetworkEvents,
    pub network_version: DiscordVersion,
    pub overlay_events: *mut IDiscordOverlayEvents,
    pub overlay_version: DiscordVersion,
    pub storage_events: *mut IDiscordStorageEvents,
    pub storage_version: DiscordVersion,
    pub store_events: *mut IDiscordStoreEvents,
    pub store_version: DiscordVersion,
    pub voice_events: *mut IDiscordVoiceEvents,
    pub voice_version: DiscordVersion,
    pub achievement_events: *mut IDiscordAchievementEvents,
    pub achievement_version: DiscordVersion,
}

impl Default for DiscordCreateParams {
    /// Equivalent of the header's `DiscordCreateParamsSetDefault`: null
    /// tables and the current version for every manager.
    fn default() -> Self {
        Self {
            client_id: 0,
            flags: DiscordCreateFlags_Default,
            events: ptr::null_mut(),
            event_data: ptr::null_mut(),
            application_events: ptr::null_mut(),
            application_version: DISCORD_APPLICATION_MANAGER_VERSION,
            user_events: ptr::null_mut(),
            user_version: DISCORD_USER_MANAGER_VERSION,
            image_events: ptr::null_mut(),
            image_version: DISCORD_IMAGE_MANAGER_VERSION,
            activity_events: ptr::null_mut(),
            activity_version: DISCORD_ACTIVITY_MANAGER_VERSION,
            relationship_events: ptr::null_mut(),
            relationship_version: DISCORD_RELATIONSHIP_MANAGER_VERSION,
            lobby_events: ptr::null_mut(),
            lobby_version: DISCORD_LOBBY_MANAGER_VERSION,
            network_events: ptr::null_mut(),
            network_version: DISCORD_NETWORK_MANAGER_VERSION,
            overlay_events: ptr::null_mut(),
            overlay_version: DISCORD_OVERLAY_MANAGER_VERSION,
            storage_events: ptr::null_mut(),
            storage_version: DISCORD_STORAGE_MANAGER_VERSION,
            store_events: ptr::null_mut(),
            store_version: DISCORD_STORE_MANAGER_VERSION,
            voice_events: ptr::null_mut(),
            voice_version: DISCORD_VOICE_MANAGER_VERSION,
            achievement_events: ptr::null_mut(),
            achievement_version: DISCORD_ACHIEVEMENT_MANAGER_VERSION,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_params_layout() {
        assert_eq!(std::mem::size_of::<DiscordCreateParams>(), 224);
        assert_eq!(std::mem::offset_of!(DiscordCreateParams, application_events), 32);
        assert_eq!(std::mem::offset_of!(DiscordCreateParams, achievement_version), 216);
    }

    #[test]
    fn test_params_default() {
        let params = DiscordCreateParams::default();
        assert_eq!(params.flags, DiscordCreateFlags_Default);
        assert!(params.lobby_events.is_null());
        assert_eq!(params.lobby_version, 1);
        assert_eq!(params.achievement_version, 1);
    }
}
