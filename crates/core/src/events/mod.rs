//! Event listeners for every manager
//!
//! The native library reports events through per-manager tables of
//! function pointers, invoked only while [`Discord::run_callbacks`] drains
//! its queue. This module owns those tables and fans each event out to any
//! number of Rust listeners.
//!
//! # Example
//!
//! ```ignore
//! let key = discord.lobbies()?.on_member_connect(|lobby_id, user_id| {
//!     tracing::info!("{} joined lobby {}", user_id, lobby_id);
//! });
//!
//! // Later, unregister if needed
//! discord.remove_listener(key);
//! ```
//!
//! [`Discord::run_callbacks`]: crate::Discord::run_callbacks

mod bind;
mod dispatch;

use std::cell::RefCell;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::Rc;

use slotmap::{new_key_type, SecondaryMap, SlotMap};

use crate::model::{Activity, Entitlement, Relationship, User, UserAchievement};
use crate::types::ActivityActionType;

pub(crate) use bind::EventTables;

new_key_type! {
    /// Key for registered listeners, used for removal
    pub struct ListenerKey;
}

/// Listeners for one event
pub(crate) struct Listeners<F: ?Sized> {
    callbacks: SecondaryMap<ListenerKey, Rc<RefCell<F>>>,
}

impl<F: ?Sized> Default for Listeners<F> {
    fn default() -> Self {
        Self {
            callbacks: SecondaryMap::new(),
        }
    }
}

impl<F: ?Sized> Listeners<F> {
    fn insert(&mut self, key: ListenerKey, callback: Rc<RefCell<F>>) {
        self.callbacks.insert(key, callback);
    }

    fn remove(&mut self, key: ListenerKey) -> bool {
        self.callbacks.remove(key).is_some()
    }

    fn snapshot(&self) -> Vec<(ListenerKey, Rc<RefCell<F>>)> {
        self.callbacks
            .iter()
            .map(|(key, callback)| (key, callback.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }
}

/// Declares [`EventKind`], the hub's per-event listener lists, and one
/// registration method per event.
macro_rules! event_hub {
    (
        $(
            $(#[$meta:meta])*
            $field:ident: $kind:ident => fn $register:ident($($arg:ty),*);
        )*
    ) => {
        /// Identifies which event a [`ListenerKey`] belongs to
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum EventKind {
            $( $kind, )*
        }

        /// Registry of every listener of one core object
        #[derive(Default)]
        pub(crate) struct EventHub {
            keys: RefCell<SlotMap<ListenerKey, EventKind>>,
            $( pub(crate) $field: RefCell<Listeners<dyn FnMut($($arg),*)>>, )*
        }

        impl EventHub {
            $(
                $(#[$meta])*
                pub fn $register(&self, callback: impl FnMut($($arg),*) + 'static) -> ListenerKey {
                    let callback: Rc<RefCell<dyn FnMut($($arg),*)>> = Rc::new(RefCell::new(callback));
                    let key = self.keys.borrow_mut().insert(EventKind::$kind);
                    self.$field.borrow_mut().insert(key, callback);
                    tracing::debug!("Registered {:?} listener {:?}", EventKind::$kind, key);
                    key
                }
            )*

            /// Remove a listener by its key
            ///
            /// Returns `true` if the listener was found and removed.
            pub fn remove(&self, key: ListenerKey) -> bool {
                let kind = self.keys.borrow_mut().remove(key);
                match kind {
                    $( Some(EventKind::$kind) => self.$field.borrow_mut().remove(key), )*
                    None => false,
                }
            }

            /// Number of listeners registered for `kind`
            pub fn count(&self, kind: EventKind) -> usize {
                match kind {
                    $( EventKind::$kind => self.$field.borrow().len(), )*
                }
            }
        }
    };
}

event_hub! {
    /// Called when the current user's data changes
    current_user_update: CurrentUserUpdate => fn on_current_user_update();

    /// Called with the join secret when the user accepts a join
    activity_join: ActivityJoin => fn on_activity_join(&str);
    /// Called with the spectate secret when the user accepts a spectate
    activity_spectate: ActivitySpectate => fn on_activity_spectate(&str);
    /// Called when another user asks to join the current user's game
    activity_join_request: ActivityJoinRequest => fn on_activity_join_request(&User);
    /// Called when the current user receives an invite
    activity_invite: ActivityInvite => fn on_activity_invite(ActivityActionType, &User, &Activity);

    /// Called when the relationship list is (re)built
    relationship_refresh: RelationshipRefresh => fn on_relationship_refresh();
    relationship_update: RelationshipUpdate => fn on_relationship_update(&Relationship);

    lobby_update: LobbyUpdate => fn on_lobby_update(i64);
    /// Called with the lobby id and the deletion reason
    lobby_delete: LobbyDelete => fn on_lobby_delete(i64, u32);
    member_connect: MemberConnect => fn on_member_connect(i64, i64);
    member_update: MemberUpdate => fn on_member_update(i64, i64);
    member_disconnect: MemberDisconnect => fn on_member_disconnect(i64, i64);
    lobby_message: LobbyMessage => fn on_lobby_message(i64, i64, &[u8]);
    speaking: Speaking => fn on_speaking(i64, i64, bool);
    /// Called with lobby id, sender id, channel id and payload
    lobby_network_message: LobbyNetworkMessage => fn on_lobby_network_message(i64, i64, u8, &[u8]);

    /// Called with peer id, channel id and payload
    network_message: NetworkMessage => fn on_network_message(u64, u8, &[u8]);
    /// Called with the current user's new route data
    route_update: RouteUpdate => fn on_route_update(&str);

    overlay_toggle: OverlayToggle => fn on_overlay_toggle(bool);

    entitlement_create: EntitlementCreate => fn on_entitlement_create(&Entitlement);
    entitlement_delete: EntitlementDelete => fn on_entitlement_delete(&Entitlement);

    voice_settings_update: VoiceSettingsUpdate => fn on_voice_settings_update();

    user_achievement_update: UserAchievementUpdate => fn on_user_achievement_update(&UserAchievement);
}

impl EventHub {
    fn is_registered(&self, key: ListenerKey) -> bool {
        self.keys.borrow().contains_key(key)
    }

    /// Call every listener of one event
    ///
    /// Listeners are snapshotted first, so callbacks may add or remove
    /// listeners. A listener removed earlier in the same dispatch is skipped;
    /// one that is already running (re-entrant drain) is not called again.
    pub(crate) fn emit<F: ?Sized>(
        &self,
        kind: EventKind,
        listeners: &RefCell<Listeners<F>>,
        mut call: impl FnMut(&mut F),
    ) {
        let snapshot = listeners.borrow().snapshot();
        if snapshot.is_empty() {
            return;
        }

        tracing::trace!("Dispatching {:?} to {} listener(s)", kind, snapshot.len());
        for (key, callback) in snapshot {
            if !self.is_registered(key) {
                continue;
            }
            let Ok(mut callback) = callback.try_borrow_mut() else {
                tracing::warn!("{:?} listener {:?} is already running, skipping", kind, key);
                continue;
            };
            if catch_unwind(AssertUnwindSafe(|| call(&mut *callback))).is_err() {
                tracing::error!("{:?} listener {:?} panicked", kind, key);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[test]
    fn test_register_and_emit() {
        let hub = EventHub::default();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let sink = seen.clone();
        hub.on_member_connect(move |lobby, user| sink.borrow_mut().push((lobby, user)));
        let sink = seen.clone();
        hub.on_member_connect(move |lobby, user| sink.borrow_mut().push((lobby * 10, user)));

        hub.emit(EventKind::MemberConnect, &hub.member_connect, |listener| listener(1, 2));

        let mut seen = seen.borrow().clone();
        seen.sort();
        assert_eq!(seen, vec![(1, 2), (10, 2)]);
    }

    #[test]
    fn test_remove_listener() {
        let hub = EventHub::default();
        let calls = Rc::new(Cell::new(0));

        let counter = calls.clone();
        let key = hub.on_overlay_toggle(move |_| counter.set(counter.get() + 1));
        assert_eq!(hub.count(EventKind::OverlayToggle), 1);

        assert!(hub.remove(key));
        assert!(!hub.remove(key));
        assert_eq!(hub.count(EventKind::OverlayToggle), 0);

        hub.emit(EventKind::OverlayToggle, &hub.overlay_toggle, |listener| listener(true));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_no_listener_is_noop() {
        let hub = EventHub::default();
        hub.emit(EventKind::RouteUpdate, &hub.route_update, |listener| listener("route"));
        assert_eq!(hub.count(EventKind::RouteUpdate), 0);
    }

    #[test]
    fn test_listener_removed_during_dispatch() {
        let hub = Rc::new(EventHub::default());
        let calls = Rc::new(Cell::new(0));
        let second: Rc<Cell<Option<ListenerKey>>> = Rc::new(Cell::new(None));

        let (h, s) = (hub.clone(), second.clone());
        hub.on_lobby_update(move |_| {
            if let Some(key) = s.get() {
                h.remove(key);
            }
        });
        let counter = calls.clone();
        second.set(Some(hub.on_lobby_update(move |_| counter.set(counter.get() + 1))));

        // Order within a SecondaryMap follows key order, the remover was added first
        hub.emit(EventKind::LobbyUpdate, &hub.lobby_update, |listener| listener(5));
        assert_eq!(calls.get(), 0);
        assert_eq!(hub.count(EventKind::LobbyUpdate), 1);
    }

    #[test]
    fn test_panicking_listener_does_not_stop_dispatch() {
        let hub = EventHub::default();
        let calls = Rc::new(Cell::new(0));

        hub.on_speaking(|_, _, _| panic!("listener failure"));
        let counter = calls.clone();
        hub.on_speaking(move |_, _, _| counter.set(counter.get() + 1));

        hub.emit(EventKind::Speaking, &hub.speaking, |listener| listener(1, 2, true));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_keys_are_distinct_across_events() {
        let hub = EventHub::default();
        let a = hub.on_current_user_update(|| {});
        let b = hub.on_voice_settings_update(|| {});
        assert_ne!(a, b);
        assert!(hub.remove(b));
        assert_eq!(hub.count(EventKind::CurrentUserUpdate), 1);
    }
}
