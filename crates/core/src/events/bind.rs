//! Event tables handed to `DiscordCreate`

use std::ffi::c_void;
use std::mem::size_of;

use dgs_sdk as sdk;
use dgs_sdk::FunctionTable;

use super::dispatch::*;
use crate::error::{Error, Result};

/// Check that `table` has exactly one filled pointer per declared slot and
/// move it to a stable heap address.
pub(crate) fn bind<T: FunctionTable>(table: T) -> Result<Box<T>> {
    let expected = T::SLOTS.len();
    if size_of::<T>() != expected * size_of::<usize>() {
        return Err(Error::EventTableMismatch {
            table: T::NAME,
            expected,
            actual: size_of::<T>() / size_of::<usize>(),
        });
    }

    // SAFETY: T is a #[repr(C)] table of `expected` nullable fn pointers,
    // which share the layout of usize
    let slots = unsafe { std::slice::from_raw_parts(&table as *const T as *const usize, expected) };
    let bound = slots.iter().filter(|&&slot| slot != 0).count();
    if bound != expected {
        return Err(Error::EventTableMismatch {
            table: T::NAME,
            expected,
            actual: bound,
        });
    }

    Ok(Box::new(table))
}

/// Every event table of one core object
///
/// The library keeps the table pointers for the lifetime of the core, so
/// this must outlive it.
pub(crate) struct EventTables {
    user: Box<sdk::IDiscordUserEvents>,
    activity: Box<sdk::IDiscordActivityEvents>,
    relationship: Box<sdk::IDiscordRelationshipEvents>,
    lobby: Box<sdk::IDiscordLobbyEvents>,
    network: Box<sdk::IDiscordNetworkEvents>,
    overlay: Box<sdk::IDiscordOverlayEvents>,
    store: Box<sdk::IDiscordStoreEvents>,
    voice: Box<sdk::IDiscordVoiceEvents>,
    achievement: Box<sdk::IDiscordAchievementEvents>,
}

impl EventTables {
    pub fn new() -> Result<Self> {
        Ok(Self {
            user: bind(sdk::IDiscordUserEvents {
                on_current_user_update: Some(on_current_user_update),
            })?,
            activity: bind(sdk::IDiscordActivityEvents {
                on_activity_join: Some(on_activity_join),
                on_activity_spectate: Some(on_activity_spectate),
                on_activity_join_request: Some(on_activity_join_request),
                on_activity_invite: Some(on_activity_invite),
            })?,
            relationship: bind(sdk::IDiscordRelationshipEvents {
                on_refresh: Some(on_relationship_refresh),
                on_relationship_update: Some(on_relationship_update),
            })?,
            lobby: bind(sdk::IDiscordLobbyEvents {
                on_lobby_update: Some(on_lobby_update),
                on_lobby_delete: Some(on_lobby_delete),
                on_member_connect: Some(on_member_connect),
                on_member_update: Some(on_member_update),
                on_member_disconnect: Some(on_member_disconnect),
                on_lobby_message: Some(on_lobby_message),
                on_speaking: Some(on_speaking),
                on_network_message: Some(on_lobby_network_message),
            })?,
            network: bind(sdk::IDiscordNetworkEvents {
                on_message: Some(on_network_message),
                on_route_update: Some(on_route_update),
            })?,
            overlay: bind(sdk::IDiscordOverlayEvents {
                on_toggle: Some(on_overlay_toggle),
            })?,
            store: bind(sdk::IDiscordStoreEvents {
                on_entitlement_create: Some(on_entitlement_create),
                on_entitlement_delete: Some(on_entitlement_delete),
            })?,
            voice: bind(sdk::IDiscordVoiceEvents {
                on_settings_update: Some(on_voice_settings_update),
            })?,
            achievement: bind(sdk::IDiscordAchievementEvents {
                on_user_achievement_update: Some(on_user_achievement_update),
            })?,
        })
    }

    /// Point `params` at these tables, with `event_data` passed back on every event
    pub fn attach(&mut self, params: &mut sdk::DiscordCreateParams, event_data: *mut c_void) {
        params.event_data = event_data;
        params.user_events = &mut *self.user;
        params.activity_events = &mut *self.activity;
        params.relationship_events = &mut *self.relationship;
        params.lobby_events = &mut *self.lobby;
        params.network_events = &mut *self.network;
        params.overlay_events = &mut *self.overlay;
        params.store_events = &mut *self.store;
        params.voice_events = &mut *self.voice;
        params.achievement_events = &mut *self.achievement;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_complete_table() {
        let table = bind(sdk::IDiscordOverlayEvents {
            on_toggle: Some(on_overlay_toggle),
        });
        assert!(table.is_ok());
    }

    #[test]
    fn test_bind_rejects_missing_slot() {
        let err = bind(sdk::IDiscordNetworkEvents {
            on_message: Some(on_network_message),
            on_route_update: None,
        })
        .unwrap_err();
        assert!(matches!(
            err,
            Error::EventTableMismatch {
                table: "IDiscordNetworkEvents",
                expected: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn test_attach_fills_every_event_table() {
        let mut tables = EventTables::new().unwrap();
        let mut params = sdk::DiscordCreateParams::default();
        let mut marker = 0u8;
        tables.attach(&mut params, &mut marker as *mut u8 as *mut c_void);

        assert!(!params.user_events.is_null());
        assert!(!params.lobby_events.is_null());
        assert!(!params.achievement_events.is_null());
        assert!(params.application_events.is_null());
        assert!(params.storage_events.is_null());
        assert_eq!(params.event_data as *const u8, &marker as *const u8);
        assert!(unsafe { (*params.lobby_events).on_speaking }.is_some());
    }
}
