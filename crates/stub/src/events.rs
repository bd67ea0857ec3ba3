//! Event injection
//!
//! Each `fire_*` queues one event. It is delivered through the event
//! table handed to `DiscordCreate` on the next `run_callbacks`, so a test
//! fires first and drains after.

use std::ffi::{c_char, c_void};

use dgs_sdk as sdk;

use crate::managers::c_string;
use crate::{with, Delivery};

/// Read one slot of an attached event table
fn slot<T: Copy, F>(table: *mut T, pick: impl FnOnce(T) -> Option<F>) -> Option<F> {
    // SAFETY: event tables stay valid while the core exists, and delivery
    // only happens while it does
    unsafe { table.as_ref() }.copied().and_then(pick)
}

fn queue(work: impl FnOnce(&Delivery) + 'static) {
    with(|stub| stub.enqueue(work));
}

fn event_data(d: &Delivery) -> *mut c_void {
    d.params.event_data
}

// === User ===

pub fn fire_current_user_update() {
    queue(|d| {
        if let Some(f) = slot(d.params.user_events, |t| t.on_current_user_update) {
            unsafe { f(event_data(d)) }
        }
    });
}

// === Activity ===

pub fn fire_activity_join(secret: &str) {
    let secret = c_string(secret);
    queue(move |d| {
        if let Some(f) = slot(d.params.activity_events, |t| t.on_activity_join) {
            unsafe { f(event_data(d), secret.as_ptr() as *const c_char) }
        }
    });
}

pub fn fire_activity_spectate(secret: &str) {
    let secret = c_string(secret);
    queue(move |d| {
        if let Some(f) = slot(d.params.activity_events, |t| t.on_activity_spectate) {
            unsafe { f(event_data(d), secret.as_ptr() as *const c_char) }
        }
    });
}

pub fn fire_activity_join_request(mut user: sdk::DiscordUser) {
    queue(move |d| {
        if let Some(f) = slot(d.params.activity_events, |t| t.on_activity_join_request) {
            unsafe { f(event_data(d), &mut user) }
        }
    });
}

pub fn fire_activity_invite(
    action: sdk::EDiscordActivityActionType,
    mut user: sdk::DiscordUser,
    mut activity: sdk::DiscordActivity,
) {
    queue(move |d| {
        if let Some(f) = slot(d.params.activity_events, |t| t.on_activity_invite) {
            unsafe { f(event_data(d), action, &mut user, &mut activity) }
        }
    });
}

// === Relationship ===

pub fn fire_relationship_refresh() {
    queue(|d| {
        if let Some(f) = slot(d.params.relationship_events, |t| t.on_refresh) {
            unsafe { f(event_data(d)) }
        }
    });
}

pub fn fire_relationship_update(mut relationship: sdk::DiscordRelationship) {
    queue(move |d| {
        if let Some(f) = slot(d.params.relationship_events, |t| t.on_relationship_update) {
            unsafe { f(event_data(d), &mut relationship) }
        }
    });
}

// === Lobby ===

pub fn fire_lobby_update(lobby_id: i64) {
    queue(move |d| {
        if let Some(f) = slot(d.params.lobby_events, |t| t.on_lobby_update) {
            unsafe { f(event_data(d), lobby_id) }
        }
    });
}

pub fn fire_lobby_delete(lobby_id: i64, reason: u32) {
    queue(move |d| {
        if let Some(f) = slot(d.params.lobby_events, |t| t.on_lobby_delete) {
            unsafe { f(event_data(d), lobby_id, reason) }
        }
    });
}

pub fn fire_member_connect(lobby_id: i64, user_id: i64) {
    queue(move |d| {
        if let Some(f) = slot(d.params.lobby_events, |t| t.on_member_connect) {
            unsafe { f(event_data(d), lobby_id, user_id) }
        }
    });
}

pub fn fire_member_update(lobby_id: i64, user_id: i64) {
    queue(move |d| {
        if let Some(f) = slot(d.params.lobby_events, |t| t.on_member_update) {
            unsafe { f(event_data(d), lobby_id, user_id) }
        }
    });
}

pub fn fire_member_disconnect(lobby_id: i64, user_id: i64) {
    queue(move |d| {
        if let Some(f) = slot(d.params.lobby_events, |t| t.on_member_disconnect) {
            unsafe { f(event_data(d), lobby_id, user_id) }
        }
    });
}

pub fn fire_lobby_message(lobby_id: i64, user_id: i64, data: &[u8]) {
    let mut data = data.to_vec();
    queue(move |d| {
        if let Some(f) = slot(d.params.lobby_events, |t| t.on_lobby_message) {
            unsafe { f(event_data(d), lobby_id, user_id, data.as_mut_ptr(), data.len() as u32) }
        }
    });
}

pub fn fire_speaking(lobby_id: i64, user_id: i64, speaking: bool) {
    queue(move |d| {
        if let Some(f) = slot(d.params.lobby_events, |t| t.on_speaking) {
            unsafe { f(event_data(d), lobby_id, user_id, speaking) }
        }
    });
}

/// Lobby-scoped network message, as opposed to [`fire_network_message`]
pub fn fire_lobby_network_message(lobby_id: i64, user_id: i64, channel_id: u8, data: &[u8]) {
    let mut data = data.to_vec();
    queue(move |d| {
        if let Some(f) = slot(d.params.lobby_events, |t| t.on_network_message) {
            unsafe {
                f(
                    event_data(d),
                    lobby_id,
                    user_id,
                    channel_id,
                    data.as_mut_ptr(),
                    data.len() as u32,
                )
            }
        }
    });
}

// === Network ===

pub fn fire_network_message(
    peer_id: sdk::DiscordNetworkPeerId,
    channel_id: sdk::DiscordNetworkChannelId,
    data: &[u8],
) {
    let mut data = data.to_vec();
    queue(move |d| {
        if let Some(f) = slot(d.params.network_events, |t| t.on_message) {
            unsafe { f(event_data(d), peer_id, channel_id, data.as_mut_ptr(), data.len() as u32) }
        }
    });
}

pub fn fire_route_update(route: &str) {
    let route = c_string(route);
    queue(move |d| {
        if let Some(f) = slot(d.params.network_events, |t| t.on_route_update) {
            unsafe { f(event_data(d), route.as_ptr() as *const c_char) }
        }
    });
}

// === Overlay ===

pub(crate) fn overlay_toggle(locked: bool) -> impl FnOnce(&Delivery) + 'static {
    move |d| {
        if let Some(f) = slot(d.params.overlay_events, |t| t.on_toggle) {
            unsafe { f(event_data(d), locked) }
        }
    }
}

pub fn fire_overlay_toggle(locked: bool) {
    queue(overlay_toggle(locked));
}

// === Store ===

pub fn fire_entitlement_create(mut entitlement: sdk::DiscordEntitlement) {
    queue(move |d| {
        if let Some(f) = slot(d.params.store_events, |t| t.on_entitlement_create) {
            unsafe { f(event_data(d), &mut entitlement) }
        }
    });
}

pub fn fire_entitlement_delete(mut entitlement: sdk::DiscordEntitlement) {
    queue(move |d| {
        if let Some(f) = slot(d.params.store_events, |t| t.on_entitlement_delete) {
            unsafe { f(event_data(d), &mut entitlement) }
        }
    });
}

// === Voice ===

pub fn fire_voice_settings_update() {
    queue(|d| {
        if let Some(f) = slot(d.params.voice_events, |t| t.on_settings_update) {
            unsafe { f(event_data(d)) }
        }
    });
}

// === Achievement ===

pub fn fire_user_achievement_update(mut achievement: sdk::DiscordUserAchievement) {
    queue(move |d| {
        if let Some(f) = slot(d.params.achievement_events, |t| t.on_user_achievement_update) {
            unsafe { f(event_data(d), &mut achievement) }
        }
    });
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::ptr;

    use super::*;

    thread_local! {
        static TOGGLES: Cell<u32> = const { Cell::new(0) };
    }

    unsafe extern "C" fn count_toggle(_: *mut c_void, _locked: bool) {
        TOGGLES.with(|t| t.set(t.get() + 1));
    }

    #[test]
    fn test_event_goes_through_attached_table() {
        crate::reset();
        let mut overlay = sdk::IDiscordOverlayEvents {
            on_toggle: Some(count_toggle),
        };
        let mut params = sdk::DiscordCreateParams {
            overlay_events: &mut overlay,
            ..Default::default()
        };
        let mut core = ptr::null_mut();
        unsafe { crate::discord_create(sdk::DISCORD_VERSION, &mut params, &mut core) };

        fire_overlay_toggle(true);
        fire_voice_settings_update();
        assert_eq!(TOGGLES.with(Cell::get), 0);

        let run = unsafe { (*core).run_callbacks.unwrap() };
        assert_eq!(unsafe { run(core) }, sdk::DiscordResult_Ok);
        assert_eq!(TOGGLES.with(Cell::get), 1);
    }
}
