//! `extern "C"` entries of the event tables
//!
//! Each entry decodes its native payload into owned values and forwards it
//! to the [`EventHub`] behind `event_data`. Records are copied before
//! dispatch since the library only guarantees them for the call.

use std::ffi::{c_char, c_void};

use dgs_sdk as sdk;

use super::{EventHub, EventKind};
use crate::ffi::{bytes_from_ptr, string_from_ptr};
use crate::model::{Activity, Entitlement, Model, Relationship, User, UserAchievement};
use crate::types::{ActivityActionType, FfiEnum};

/// Resolve `event_data` back to the hub it was created from
///
/// # Safety
/// `event_data` must be null or the pointer handed to `DiscordCreate`,
/// which the owning core keeps alive until after destroy.
unsafe fn hub<'a>(event_data: *mut c_void) -> Option<&'a EventHub> {
    let hub = (event_data as *const EventHub).as_ref();
    if hub.is_none() {
        tracing::warn!("Event fired without event data, ignoring");
    }
    hub
}

/// Copy a record argument, logging when the library passed null
unsafe fn record<M: Model>(ptr: *const M::Raw, kind: EventKind) -> Option<M> {
    let model = M::copy_from_ptr(ptr);
    if model.is_none() {
        tracing::warn!("{:?} fired with a null {}, ignoring", kind, M::NAME);
    }
    model
}

// === User ===

pub(super) unsafe extern "C" fn on_current_user_update(event_data: *mut c_void) {
    if let Some(hub) = hub(event_data) {
        hub.emit(EventKind::CurrentUserUpdate, &hub.current_user_update, |f| f());
    }
}

// === Activity ===

pub(super) unsafe extern "C" fn on_activity_join(event_data: *mut c_void, secret: *const c_char) {
    let Some(hub) = hub(event_data) else { return };
    let secret = string_from_ptr(secret);
    hub.emit(EventKind::ActivityJoin, &hub.activity_join, |f| f(&secret));
}

pub(super) unsafe extern "C" fn on_activity_spectate(event_data: *mut c_void, secret: *const c_char) {
    let Some(hub) = hub(event_data) else { return };
    let secret = string_from_ptr(secret);
    hub.emit(EventKind::ActivitySpectate, &hub.activity_spectate, |f| f(&secret));
}

pub(super) unsafe extern "C" fn on_activity_join_request(
    event_data: *mut c_void,
    user: *mut sdk::DiscordUser,
) {
    let Some(hub) = hub(event_data) else { return };
    let Some(user) = record::<User>(user, EventKind::ActivityJoinRequest) else { return };
    hub.emit(EventKind::ActivityJoinRequest, &hub.activity_join_request, |f| f(&user));
}

pub(super) unsafe extern "C" fn on_activity_invite(
    event_data: *mut c_void,
    type_: sdk::EDiscordActivityActionType,
    user: *mut sdk::DiscordUser,
    activity: *mut sdk::DiscordActivity,
) {
    let Some(hub) = hub(event_data) else { return };
    let Some(action) = ActivityActionType::from_ffi(type_) else {
        tracing::warn!("ActivityInvite fired with unknown action type {}, ignoring", type_);
        return;
    };
    let Some(user) = record::<User>(user, EventKind::ActivityInvite) else { return };
    let Some(activity) = record::<Activity>(activity, EventKind::ActivityInvite) else { return };
    hub.emit(EventKind::ActivityInvite, &hub.activity_invite, |f| f(action, &user, &activity));
}

// === Relationship ===

pub(super) unsafe extern "C" fn on_relationship_refresh(event_data: *mut c_void) {
    if let Some(hub) = hub(event_data) {
        hub.emit(EventKind::RelationshipRefresh, &hub.relationship_refresh, |f| f());
    }
}

pub(super) unsafe extern "C" fn on_relationship_update(
    event_data: *mut c_void,
    relationship: *mut sdk::DiscordRelationship,
) {
    let Some(hub) = hub(event_data) else { return };
    let Some(relationship) = record::<Relationship>(relationship, EventKind::RelationshipUpdate)
    else {
        return;
    };
    hub.emit(EventKind::RelationshipUpdate, &hub.relationship_update, |f| f(&relationship));
}

// === Lobby ===

pub(super) unsafe extern "C" fn on_lobby_update(event_data: *mut c_void, lobby_id: i64) {
    if let Some(hub) = hub(event_data) {
        hub.emit(EventKind::LobbyUpdate, &hub.lobby_update, |f| f(lobby_id));
    }
}

pub(super) unsafe extern "C" fn on_lobby_delete(event_data: *mut c_void, lobby_id: i64, reason: u32) {
    if let Some(hub) = hub(event_data) {
        hub.emit(EventKind::LobbyDelete, &hub.lobby_delete, |f| f(lobby_id, reason));
    }
}

pub(super) unsafe extern "C" fn on_member_connect(event_data: *mut c_void, lobby_id: i64, user_id: i64) {
    if let Some(hub) = hub(event_data) {
        hub.emit(EventKind::MemberConnect, &hub.member_connect, |f| f(lobby_id, user_id));
    }
}

pub(super) unsafe extern "C" fn on_member_update(event_data: *mut c_void, lobby_id: i64, user_id: i64) {
    if let Some(hub) = hub(event_data) {
        hub.emit(EventKind::MemberUpdate, &hub.member_update, |f| f(lobby_id, user_id));
    }
}

pub(super) unsafe extern "C" fn on_member_disconnect(
    event_data: *mut c_void,
    lobby_id: i64,
    user_id: i64,
) {
    if let Some(hub) = hub(event_data) {
        hub.emit(EventKind::MemberDisconnect, &hub.member_disconnect, |f| f(lobby_id, user_id));
    }
}

pub(super) unsafe extern "C" fn on_lobby_message(
    event_data: *mut c_void,
    lobby_id: i64,
    user_id: i64,
    data: *mut u8,
    data_length: u32,
) {
    let Some(hub) = hub(event_data) else { return };
    let data = bytes_from_ptr(data, data_length);
    hub.emit(EventKind::LobbyMessage, &hub.lobby_message, |f| f(lobby_id, user_id, &data));
}

pub(super) unsafe extern "C" fn on_speaking(
    event_data: *mut c_void,
    lobby_id: i64,
    user_id: i64,
    speaking: bool,
) {
    if let Some(hub) = hub(event_data) {
        hub.emit(EventKind::Speaking, &hub.speaking, |f| f(lobby_id, user_id, speaking));
    }
}

pub(super) unsafe extern "C" fn on_lobby_network_message(
    event_data: *mut c_void,
    lobby_id: i64,
    user_id: i64,
    channel_id: u8,
    data: *mut u8,
    data_length: u32,
) {
    let Some(hub) = hub(event_data) else { return };
    let data = bytes_from_ptr(data, data_length);
    hub.emit(EventKind::LobbyNetworkMessage, &hub.lobby_network_message, |f| {
        f(lobby_id, user_id, channel_id, &data)
    });
}

// === Network ===

pub(super) unsafe extern "C" fn on_network_message(
    event_data: *mut c_void,
    peer_id: sdk::DiscordNetworkPeerId,
    channel_id: sdk::DiscordNetworkChannelId,
    data: *mut u8,
    data_length: u32,
) {
    let Some(hub) = hub(event_data) else { return };
    let data = bytes_from_ptr(data, data_length);
    hub.emit(EventKind::NetworkMessage, &hub.network_message, |f| f(peer_id, channel_id, &data));
}

pub(super) unsafe extern "C" fn on_route_update(event_data: *mut c_void, route_data: *const c_char) {
    let Some(hub) = hub(event_data) else { return };
    let route = string_from_ptr(route_data);
    hub.emit(EventKind::RouteUpdate, &hub.route_update, |f| f(&route));
}

// === Overlay ===

pub(super) unsafe extern "C" fn on_overlay_toggle(event_data: *mut c_void, locked: bool) {
    if let Some(hub) = hub(event_data) {
        hub.emit(EventKind::OverlayToggle, &hub.overlay_toggle, |f| f(locked));
    }
}

// === Store ===

pub(super) unsafe extern "C" fn on_entitlement_create(
    event_data: *mut c_void,
    entitlement: *mut sdk::DiscordEntitlement,
) {
    let Some(hub) = hub(event_data) else { return };
    let Some(entitlement) = record::<Entitlement>(entitlement, EventKind::EntitlementCreate) else {
        return;
    };
    hub.emit(EventKind::EntitlementCreate, &hub.entitlement_create, |f| f(&entitlement));
}

pub(super) unsafe extern "C" fn on_entitlement_delete(
    event_data: *mut c_void,
    entitlement: *mut sdk::DiscordEntitlement,
) {
    let Some(hub) = hub(event_data) else { return };
    let Some(entitlement) = record::<Entitlement>(entitlement, EventKind::EntitlementDelete) else {
        return;
    };
    hub.emit(EventKind::EntitlementDelete, &hub.entitlement_delete, |f| f(&entitlement));
}

// === Voice ===

pub(super) unsafe extern "C" fn on_voice_settings_update(event_data: *mut c_void) {
    if let Some(hub) = hub(event_data) {
        hub.emit(EventKind::VoiceSettingsUpdate, &hub.voice_settings_update, |f| f());
    }
}

// === Achievement ===

pub(super) unsafe extern "C" fn on_user_achievement_update(
    event_data: *mut c_void,
    user_achievement: *mut sdk::DiscordUserAchievement,
) {
    let Some(hub) = hub(event_data) else { return };
    let Some(achievement) =
        record::<UserAchievement>(user_achievement, EventKind::UserAchievementUpdate)
    else {
        return;
    };
    hub.emit(EventKind::UserAchievementUpdate, &hub.user_achievement_update, |f| f(&achievement));
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    fn data(hub: &EventHub) -> *mut c_void {
        hub as *const EventHub as *mut c_void
    }

    #[test]
    fn test_join_request_copies_user() {
        let hub = EventHub::default();
        let seen = Rc::new(RefCell::new(None));

        let sink = seen.clone();
        hub.on_activity_join_request(move |user| {
            *sink.borrow_mut() = Some((user.id(), user.username()));
        });

        let mut raw = sdk::DiscordUser::default();
        raw.id = 42;
        raw.username = crate::model::text::to_buffer::<256>("alice", "username").unwrap();
        unsafe { on_activity_join_request(data(&hub), &mut raw) };

        assert_eq!(*seen.borrow(), Some((42, "alice".to_string())));
    }

    #[test]
    fn test_message_payload_is_owned_slice() {
        let hub = EventHub::default();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let sink = seen.clone();
        hub.on_lobby_message(move |lobby, user, bytes| {
            assert_eq!((lobby, user), (3, 4));
            sink.borrow_mut().extend_from_slice(bytes);
        });

        let mut payload = [9u8, 8, 7];
        unsafe { on_lobby_message(data(&hub), 3, 4, payload.as_mut_ptr(), 3) };
        assert_eq!(*seen.borrow(), vec![9, 8, 7]);
    }

    #[test]
    fn test_unknown_invite_action_is_skipped() {
        let hub = EventHub::default();
        let fired = Rc::new(RefCell::new(false));

        let flag = fired.clone();
        hub.on_activity_invite(move |_, _, _| *flag.borrow_mut() = true);

        let mut user = sdk::DiscordUser::default();
        let mut activity = sdk::DiscordActivity::default();
        unsafe { on_activity_invite(data(&hub), 99, &mut user, &mut activity) };
        assert!(!*fired.borrow());

        unsafe {
            on_activity_invite(
                data(&hub),
                sdk::DiscordActivityActionType_Join,
                &mut user,
                &mut activity,
            )
        };
        assert!(*fired.borrow());
    }

    #[test]
    fn test_null_event_data_is_ignored() {
        unsafe {
            on_overlay_toggle(std::ptr::null_mut(), true);
            on_route_update(std::ptr::null_mut(), std::ptr::null());
        }
    }
}
