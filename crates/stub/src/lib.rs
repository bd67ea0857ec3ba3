//! dgs stub - a scriptable stand-in for the native Game SDK
//!
//! Exposes a `DiscordCreate`-compatible entry point ([`discord_create`])
//! whose managers keep their data in a per-thread [`StubState`]. Tests seed
//! that state, drive the bindings, then inspect the recorded [`Call`]s.
//!
//! Like the real library, nothing is delivered synchronously: completions
//! and events are queued and run on the next `run_callbacks`.
//!
//! ```ignore
//! dgs_stub::reset();
//! dgs_stub::with(|stub| stub.fail("update_activity", DiscordResult_InvalidSecret));
//! let library = SdkLibrary::from_entry_point(dgs_stub::discord_create, "dgs-stub");
//! ```

/// Format slot arguments the way they are recorded in [`Call::args`]
macro_rules! args {
    ($($arg:expr),* $(,)?) => {
        vec![$($arg.to_string()),*]
    };
}

mod entry;
mod events;
mod lobby;
mod managers;

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::ffi::{c_char, c_void};

use dgs_sdk as sdk;

pub use entry::discord_create;
pub use events::*;

/// One recorded manager call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    /// Slot name, e.g. `send_message`
    pub name: &'static str,
    /// Scalar and text arguments, formatted with `Display`
    pub args: Vec<String>,
    /// Byte buffer argument, if the slot takes one
    pub data: Vec<u8>,
}

/// What the last `DiscordCreate` call received
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CreatedWith {
    pub client_id: i64,
    pub flags: u64,
    pub version: i32,
    /// Whether a lobby event table was attached
    pub lobby_events: bool,
}

/// Work queued for the next `run_callbacks`
pub(crate) type Queued = Box<dyn FnOnce(&Delivery)>;

type LogHookFn = unsafe extern "C" fn(*mut c_void, sdk::EDiscordLogLevel, *const c_char);

/// Snapshot of what queued work needs, taken when the queue is drained
pub(crate) struct Delivery {
    pub params: sdk::DiscordCreateParams,
    pub log_hook: Option<(LogHookFn, *mut c_void)>,
}

#[derive(Debug, Default, Clone)]
pub(crate) struct LobbyData {
    pub metadata: BTreeMap<String, String>,
    pub members: Vec<i64>,
    pub member_metadata: HashMap<i64, BTreeMap<String, String>>,
}

/// All data behind the stub's managers
pub struct StubState {
    /// Status `DiscordCreate` returns
    pub create_result: sdk::EDiscordResult,
    pub created_with: CreatedWith,
    pub calls: Vec<Call>,
    /// Deliver every completion twice, like a misbehaving library
    pub fire_twice: bool,
    pub destroy_count: usize,
    /// Core getters (e.g. `get_voice_manager`) that return null
    pub null_managers: Vec<&'static str>,
    pub log_min_level: Option<sdk::EDiscordLogLevel>,

    // User
    pub current_user: sdk::DiscordUser,
    pub users: HashMap<i64, sdk::DiscordUser>,
    pub premium_type: sdk::EDiscordPremiumType,
    /// Bitmask of `DiscordUserFlag_*`
    pub user_flags: i32,

    // Application
    pub locale: String,
    pub branch: String,
    pub oauth2_token: sdk::DiscordOAuth2Token,
    pub ticket: String,

    // Image
    pub image_size: (u32, u32),
    pub image_data: Vec<u8>,

    // Activity
    pub activity: Option<sdk::DiscordActivity>,

    // Relationship
    pub relationships: Vec<sdk::DiscordRelationship>,
    pub(crate) filtered: Option<Vec<sdk::DiscordRelationship>>,

    // Overlay
    pub overlay_enabled: bool,
    pub overlay_locked: bool,

    // Network
    pub peer_id: u64,

    // Storage
    pub files: BTreeMap<String, Vec<u8>>,
    /// Byte count `read` reports instead of the real one
    pub bytes_read_override: Option<u32>,
    pub storage_path: String,

    // Store
    pub skus: Vec<sdk::DiscordSku>,
    pub entitlements: Vec<sdk::DiscordEntitlement>,
    pub(crate) skus_fetched: bool,
    pub(crate) entitlements_fetched: bool,

    // Voice
    pub input_mode: sdk::DiscordInputMode,
    pub self_mute: bool,
    pub self_deaf: bool,
    pub local_mutes: HashSet<i64>,
    pub local_volumes: HashMap<i64, u8>,

    // Achievement
    pub achievements: Vec<sdk::DiscordUserAchievement>,

    // Lobby
    pub lobbies: Vec<sdk::DiscordLobby>,
    pub(crate) lobby_data: HashMap<i64, LobbyData>,
    pub(crate) search_results: Vec<i64>,
    pub(crate) next_lobby_id: i64,
    pub(crate) builders: lobby::Builders,

    failures: HashMap<String, sdk::EDiscordResult>,
    queue: Vec<Queued>,
    params: Option<sdk::DiscordCreateParams>,
    log_hook: Option<(LogHookFn, *mut c_void)>,
}

impl Default for StubState {
    fn default() -> Self {
        Self {
            create_result: sdk::DiscordResult_Ok,
            created_with: CreatedWith::default(),
            calls: Vec::new(),
            fire_twice: false,
            destroy_count: 0,
            null_managers: Vec::new(),
            log_min_level: None,
            current_user: user(100, "player", "0001", false),
            users: HashMap::new(),
            premium_type: sdk::DiscordPremiumType_None,
            user_flags: 0,
            locale: "en-US".to_string(),
            branch: "master".to_string(),
            oauth2_token: sdk::DiscordOAuth2Token::default(),
            ticket: String::new(),
            image_size: (0, 0),
            image_data: Vec::new(),
            activity: None,
            relationships: Vec::new(),
            filtered: None,
            overlay_enabled: true,
            overlay_locked: true,
            peer_id: 0,
            files: BTreeMap::new(),
            bytes_read_override: None,
            storage_path: String::new(),
            skus: Vec::new(),
            entitlements: Vec::new(),
            skus_fetched: false,
            entitlements_fetched: false,
            input_mode: sdk::DiscordInputMode::default(),
            self_mute: false,
            self_deaf: false,
            local_mutes: HashSet::new(),
            local_volumes: HashMap::new(),
            achievements: Vec::new(),
            lobbies: Vec::new(),
            lobby_data: HashMap::new(),
            search_results: Vec::new(),
            next_lobby_id: 1000,
            builders: lobby::Builders::default(),
            failures: HashMap::new(),
            queue: Vec::new(),
            params: None,
            log_hook: None,
        }
    }
}

impl StubState {
    /// Make `name` report `code` from now on. `DiscordResult_Ok` restores
    /// normal behaviour.
    pub fn fail(&mut self, name: &str, code: sdk::EDiscordResult) {
        self.failures.insert(name.to_string(), code);
    }

    /// Number of recorded calls to `name`
    pub fn count_calls(&self, name: &str) -> usize {
        self.calls.iter().filter(|c| c.name == name).count()
    }

    /// Most recent call to `name`
    pub fn last_call(&self, name: &str) -> Option<&Call> {
        self.calls.iter().rev().find(|c| c.name == name)
    }

    pub(crate) fn failure(&self, name: &str) -> Option<sdk::EDiscordResult> {
        self.failures
            .get(name)
            .copied()
            .filter(|&code| code != sdk::DiscordResult_Ok)
    }

    pub(crate) fn record(&mut self, name: &'static str, args: Vec<String>, data: &[u8]) {
        self.calls.push(Call {
            name,
            args,
            data: data.to_vec(),
        });
    }

    pub(crate) fn enqueue(&mut self, work: impl FnOnce(&Delivery) + 'static) {
        self.queue.push(Box::new(work));
    }

    /// Queue a completion, twice when `fire_twice` is set
    pub(crate) fn enqueue_completion(&mut self, work: impl Fn(&Delivery) + 'static) {
        if self.fire_twice {
            let work = std::rc::Rc::new(work);
            let again = work.clone();
            self.enqueue(move |d| work(d));
            self.enqueue(move |d| again(d));
        } else {
            self.enqueue(work);
        }
    }

    pub(crate) fn take_queue(&mut self) -> (Vec<Queued>, Option<Delivery>) {
        let queue = std::mem::take(&mut self.queue);
        let delivery = self.params.map(|params| Delivery {
            params,
            log_hook: self.log_hook,
        });
        (queue, delivery)
    }
}

thread_local! {
    static STATE: RefCell<StubState> = RefCell::new(StubState::default());
}

/// Access the current thread's stub state.
///
/// Don't call binding methods from inside `f`; the stub borrows the same
/// state while serving them.
pub fn with<R>(f: impl FnOnce(&mut StubState) -> R) -> R {
    STATE.with(|state| f(&mut state.borrow_mut()))
}

/// Forget everything: seeded data, recorded calls, queued work
pub fn reset() {
    let old = with(std::mem::take);
    drop(old);
}

/// Queue a message for the installed log hook, if `level` passes its filter
pub fn log(level: sdk::EDiscordLogLevel, message: &str) {
    let mut message = message.as_bytes().to_vec();
    message.push(0);
    with(|stub| {
        if stub.log_min_level.is_some_and(|min| level <= min) {
            stub.enqueue(move |d| {
                if let Some((hook, hook_data)) = d.log_hook {
                    // SAFETY: the hook data is owned by the core that installed it
                    unsafe { hook(hook_data, level, message.as_ptr() as *const c_char) };
                }
            });
        }
    });
}

// === Record builders ===

/// Decode a fixed text buffer
pub fn text(buf: &[c_char]) -> String {
    let bytes: Vec<u8> = buf.iter().take_while(|&&c| c != 0).map(|&c| c as u8).collect();
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Write `value` into a fixed text buffer, truncating to fit
pub fn set_text(buf: &mut [c_char], value: &str) {
    buf.fill(0);
    let max = buf.len().saturating_sub(1);
    for (dst, &src) in buf.iter_mut().zip(value.as_bytes().iter().take(max)) {
        *dst = src as c_char;
    }
}

pub fn user(id: i64, username: &str, discriminator: &str, bot: bool) -> sdk::DiscordUser {
    let mut user = sdk::DiscordUser::default();
    user.id = id;
    set_text(&mut user.username, username);
    set_text(&mut user.discriminator, discriminator);
    user.bot = bot;
    user
}

pub fn relationship(
    kind: sdk::EDiscordRelationshipType,
    user: sdk::DiscordUser,
    status: sdk::EDiscordStatus,
) -> sdk::DiscordRelationship {
    let mut relationship = sdk::DiscordRelationship::default();
    relationship.type_ = kind;
    relationship.user = user;
    relationship.presence.status = status;
    relationship
}

pub fn sku(id: i64, kind: sdk::EDiscordSkuType, name: &str, amount: u32, currency: &str) -> sdk::DiscordSku {
    let mut sku = sdk::DiscordSku::default();
    sku.id = id;
    sku.type_ = kind;
    set_text(&mut sku.name, name);
    sku.price.amount = amount;
    set_text(&mut sku.price.currency, currency);
    sku
}

pub fn entitlement(id: i64, kind: sdk::EDiscordEntitlementType, sku_id: i64) -> sdk::DiscordEntitlement {
    let mut entitlement = sdk::DiscordEntitlement::default();
    entitlement.id = id;
    entitlement.type_ = kind;
    entitlement.sku_id = sku_id;
    entitlement
}

pub fn user_achievement(user_id: i64, achievement_id: i64, percent_complete: u8) -> sdk::DiscordUserAchievement {
    let mut achievement = sdk::DiscordUserAchievement::default();
    achievement.user_id = user_id;
    achievement.achievement_id = achievement_id;
    achievement.percent_complete = percent_complete;
    achievement
}

pub fn lobby(id: i64, kind: sdk::EDiscordLobbyType, owner_id: i64, capacity: u32) -> sdk::DiscordLobby {
    let mut lobby = sdk::DiscordLobby::default();
    lobby.id = id;
    lobby.type_ = kind;
    lobby.owner_id = owner_id;
    lobby.capacity = capacity;
    set_text(&mut lobby.secret, &format!("secret-{}", id));
    lobby
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_helpers() {
        let mut buf = [0 as c_char; 8];
        set_text(&mut buf, "0001");
        assert_eq!(text(&buf), "0001");
        set_text(&mut buf, "much too long");
        assert_eq!(text(&buf), "much to");
    }

    #[test]
    fn test_fail_and_restore() {
        reset();
        with(|stub| {
            stub.fail("flush", sdk::DiscordResult_NotRunning);
            assert_eq!(stub.failure("flush"), Some(sdk::DiscordResult_NotRunning));
            stub.fail("flush", sdk::DiscordResult_Ok);
            assert_eq!(stub.failure("flush"), None);
        });
    }

    #[test]
    fn test_call_lookup() {
        reset();
        with(|stub| {
            stub.record("open_peer", vec!["1".into()], &[]);
            stub.record("open_peer", vec!["2".into()], &[]);
            assert_eq!(stub.count_calls("open_peer"), 2);
            assert_eq!(stub.last_call("open_peer").unwrap().args, ["2"]);
            assert!(stub.last_call("close_peer").is_none());
        });
    }

    #[test]
    fn test_fire_twice_queues_completion_twice() {
        reset();
        with(|stub| {
            stub.fire_twice = true;
            stub.enqueue_completion(|_| {});
            assert_eq!(stub.queue.len(), 2);
        });
    }

    #[test]
    fn test_log_without_hook_is_dropped() {
        reset();
        log(sdk::DiscordLogLevel_Error, "nobody listens");
        with(|stub| assert!(stub.queue.is_empty()));
    }
}
