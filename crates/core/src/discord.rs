//! The core object
//!
//! [`Discord`] owns the native core, the event tables handed to it, every
//! pending completion and listener, and the installed log hook. Nothing
//! here is global: two cores (for example in parallel tests) never share
//! state.

use std::cell::Cell;
use std::ffi::c_void;
use std::fmt;
use std::ptr::{self, NonNull};

use dgs_engine::SdkLibrary;
use dgs_sdk as sdk;

use crate::completion::{ActiveScope, PendingCompletions};
use crate::config::SdkConfig;
use crate::error::{check, Error, Result};
use crate::events::{EventHub, EventTables, ListenerKey};
use crate::ffi::ffi_call;
use crate::logging::{self, LogHandler};
use crate::managers::*;
use crate::types::{CreateFlags, FfiEnum, LogLevel};

/// State reachable from native callbacks. Boxed so its address is stable.
#[derive(Default)]
pub(crate) struct Context {
    pub pending: PendingCompletions,
    pub events: EventHub,
}

/// Manager handles, fetched on first use
#[derive(Default)]
struct Handles {
    application: Cell<Option<NonNull<sdk::IDiscordApplicationManager>>>,
    user: Cell<Option<NonNull<sdk::IDiscordUserManager>>>,
    image: Cell<Option<NonNull<sdk::IDiscordImageManager>>>,
    activity: Cell<Option<NonNull<sdk::IDiscordActivityManager>>>,
    relationship: Cell<Option<NonNull<sdk::IDiscordRelationshipManager>>>,
    lobby: Cell<Option<NonNull<sdk::IDiscordLobbyManager>>>,
    network: Cell<Option<NonNull<sdk::IDiscordNetworkManager>>>,
    overlay: Cell<Option<NonNull<sdk::IDiscordOverlayManager>>>,
    storage: Cell<Option<NonNull<sdk::IDiscordStorageManager>>>,
    store: Cell<Option<NonNull<sdk::IDiscordStoreManager>>>,
    voice: Cell<Option<NonNull<sdk::IDiscordVoiceManager>>>,
    achievement: Cell<Option<NonNull<sdk::IDiscordAchievementManager>>>,
}

/// Resolve a manager handle through the core, caching it
macro_rules! manager_handle {
    ($self:ident, $cache:ident, $getter:ident, $name:literal) => {{
        let core = $self.core_handle()?;
        match $self.handles.$cache.get() {
            Some(handle) => handle,
            None => {
                let raw = ffi_call!(core, $getter())?;
                let handle = NonNull::new(raw).ok_or(Error::NullPointer($name))?;
                tracing::debug!("{}: {:p}", $name, raw);
                $self.handles.$cache.set(Some(handle));
                handle
            }
        }
    }};
}

/// A live connection to the native Game SDK.
///
/// All calls and [`run_callbacks`](Self::run_callbacks) must come from the
/// thread that created it; the type is neither `Send` nor `Sync`.
pub struct Discord {
    core: Option<NonNull<sdk::IDiscordCore>>,
    handles: Handles,
    context: Box<Context>,
    log_hook: Option<Box<LogHandler>>,
    client_id: i64,
    // The library keeps pointers into these until destroy
    _event_tables: EventTables,
    library: SdkLibrary,
}

impl Discord {
    /// Create the core object.
    ///
    /// Attaches every event table, then calls `DiscordCreate`. Fails with
    /// [`Error::CreateFailed`] carrying the native status if creation does
    /// not succeed; there is no partially created core.
    #[tracing::instrument(skip_all, fields(client_id = client_id))]
    pub fn create(library: SdkLibrary, client_id: i64, flags: CreateFlags) -> Result<Self> {
        let context = Box::new(Context::default());
        let mut event_tables = EventTables::new()?;

        let mut params = sdk::DiscordCreateParams {
            client_id,
            flags: flags.bits(),
            ..Default::default()
        };
        let event_data = &context.events as *const EventHub as *mut c_void;
        event_tables.attach(&mut params, event_data);

        let mut core = ptr::null_mut();
        // SAFETY: params is fully initialised and the event tables it
        // points to are owned by the returned core object
        let code = unsafe { library.create(sdk::DISCORD_VERSION, &mut params, &mut core) };
        if code != sdk::DiscordResult_Ok {
            tracing::warn!("DiscordCreate failed with status {}", code);
            return Err(Error::CreateFailed { code });
        }
        let core = NonNull::new(core).ok_or(Error::NullPointer("core"))?;

        tracing::info!("Created core {:p} via {}", core.as_ptr(), library.origin());

        Ok(Self {
            core: Some(core),
            handles: Handles::default(),
            context,
            log_hook: None,
            client_id,
            _event_tables: event_tables,
            library,
        })
    }

    /// Open the library named by `config`, create the core and forward
    /// native log messages to `tracing` at the configured level.
    pub fn from_config(config: &SdkConfig) -> Result<Self> {
        let library = match &config.library_path {
            Some(path) => SdkLibrary::open(path)?,
            None => SdkLibrary::open_default()?,
        };
        Self::with_library(library, config)
    }

    /// Like [`from_config`](Self::from_config) with an already opened library
    pub fn with_library(library: SdkLibrary, config: &SdkConfig) -> Result<Self> {
        let mut discord = Self::create(library, config.client_id, config.create_flags())?;
        discord.forward_logs_to_tracing(config.log_level)?;
        Ok(discord)
    }

    pub fn client_id(&self) -> i64 {
        self.client_id
    }

    pub fn library(&self) -> &SdkLibrary {
        &self.library
    }

    /// Whether [`destroy`](Self::destroy) has already run
    pub fn is_destroyed(&self) -> bool {
        self.core.is_none()
    }

    pub(crate) fn core_handle(&self) -> Result<NonNull<sdk::IDiscordCore>> {
        self.core.ok_or(Error::Destroyed)
    }

    /// Run every completion and event the library has queued.
    ///
    /// Call this regularly (once per frame or tick). It is the only place
    /// completions and event listeners run.
    pub fn run_callbacks(&self) -> Result<()> {
        let core = self.core_handle()?;
        let _scope = ActiveScope::enter(&self.context.pending);
        tracing::trace!("Running callbacks, {} pending", self.context.pending.len());
        check(ffi_call!(core, run_callbacks())?)
    }

    /// Install `handler` for native log messages at `min_level` or more severe.
    ///
    /// Replaces any previous handler.
    pub fn set_log_hook(
        &mut self,
        min_level: LogLevel,
        handler: impl FnMut(LogLevel, &str) + 'static,
    ) -> Result<()> {
        let core = self.core_handle()?;
        let mut hook: Box<LogHandler> = Box::new(Box::new(handler));
        let hook_data = &mut *hook as *mut LogHandler as *mut c_void;
        ffi_call!(core, set_log_hook(min_level.to_ffi(), hook_data, Some(logging::on_log)))?;
        tracing::debug!("Installed log hook at {:?}", min_level);
        // The previous handler is released only after the library stopped using it
        self.log_hook = Some(hook);
        Ok(())
    }

    /// Forward native log messages to `tracing` under the `discord_game_sdk` target
    pub fn forward_logs_to_tracing(&mut self, min_level: LogLevel) -> Result<()> {
        self.set_log_hook(min_level, logging::forward_to_tracing)
    }

    /// Number of asynchronous calls whose completion hasn't fired yet
    pub fn pending_completions(&self) -> usize {
        self.context.pending.len()
    }

    /// Remove an event listener registered through any manager
    ///
    /// Returns `true` if the listener was found and removed.
    pub fn remove_listener(&self, key: ListenerKey) -> bool {
        self.context.events.remove(key)
    }

    pub(crate) fn pending(&self) -> &PendingCompletions {
        &self.context.pending
    }

    pub(crate) fn events(&self) -> &EventHub {
        &self.context.events
    }

    /// Destroy the native core.
    ///
    /// Runs once; later calls do nothing. Completions that never fired are
    /// dropped without being called, and every manager accessor returns
    /// [`Error::Destroyed`] afterwards.
    pub fn destroy(&mut self) {
        let Some(core) = self.core.take() else {
            return;
        };
        self.handles = Handles::default();

        {
            let _scope = ActiveScope::enter(&self.context.pending);
            if let Err(e) = ffi_call!(core, destroy()) {
                tracing::warn!("Could not destroy core {:p}: {}", core.as_ptr(), e);
            }
        }

        let dropped = self.context.pending.clear();
        if dropped > 0 {
            tracing::warn!("{} completion(s) never fired before destroy", dropped);
        }
        tracing::info!("Destroyed core {:p}", core.as_ptr());
    }

    // === Managers ===

    pub fn applications(&self) -> Result<ApplicationManager<'_>> {
        let handle = manager_handle!(self, application, get_application_manager, "application manager");
        Ok(ApplicationManager::new(self, handle))
    }

    pub fn users(&self) -> Result<UserManager<'_>> {
        let handle = manager_handle!(self, user, get_user_manager, "user manager");
        Ok(UserManager::new(self, handle))
    }

    pub fn images(&self) -> Result<ImageManager<'_>> {
        let handle = manager_handle!(self, image, get_image_manager, "image manager");
        Ok(ImageManager::new(self, handle))
    }

    pub fn activities(&self) -> Result<ActivityManager<'_>> {
        let handle = manager_handle!(self, activity, get_activity_manager, "activity manager");
        Ok(ActivityManager::new(self, handle))
    }

    pub fn relationships(&self) -> Result<RelationshipManager<'_>> {
        let handle = manager_handle!(
            self,
            relationship,
            get_relationship_manager,
            "relationship manager"
        );
        Ok(RelationshipManager::new(self, handle))
    }

    pub fn lobbies(&self) -> Result<LobbyManager<'_>> {
        let handle = manager_handle!(self, lobby, get_lobby_manager, "lobby manager");
        Ok(LobbyManager::new(self, handle))
    }

    pub fn networking(&self) -> Result<NetworkManager<'_>> {
        let handle = manager_handle!(self, network, get_network_manager, "network manager");
        Ok(NetworkManager::new(self, handle))
    }

    pub fn overlay(&self) -> Result<OverlayManager<'_>> {
        let handle = manager_handle!(self, overlay, get_overlay_manager, "overlay manager");
        Ok(OverlayManager::new(self, handle))
    }

    pub fn storage(&self) -> Result<StorageManager<'_>> {
        let handle = manager_handle!(self, storage, get_storage_manager, "storage manager");
        Ok(StorageManager::new(self, handle))
    }

    pub fn store(&self) -> Result<StoreManager<'_>> {
        let handle = manager_handle!(self, store, get_store_manager, "store manager");
        Ok(StoreManager::new(self, handle))
    }

    pub fn voice(&self) -> Result<VoiceManager<'_>> {
        let handle = manager_handle!(self, voice, get_voice_manager, "voice manager");
        Ok(VoiceManager::new(self, handle))
    }

    pub fn achievements(&self) -> Result<AchievementManager<'_>> {
        let handle = manager_handle!(self, achievement, get_achievement_manager, "achievement manager");
        Ok(AchievementManager::new(self, handle))
    }
}

impl Drop for Discord {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl fmt::Debug for Discord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Discord")
            .field("client_id", &self.client_id)
            .field("core", &self.core)
            .field("library", &self.library)
            .field("pending_completions", &self.pending_completions())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::error::SdkError;
    use crate::testing::{self, CLIENT_ID};

    #[test]
    fn test_create_passes_client_id_and_flags() {
        {
            let discord = testing::discord();
            assert_eq!(discord.client_id(), CLIENT_ID);
            dgs_stub::with(|stub| {
                assert_eq!(stub.created_with.client_id, CLIENT_ID);
                assert_eq!(stub.created_with.flags, 0);
                assert_eq!(stub.created_with.version, sdk::DISCORD_VERSION);
                assert!(stub.created_with.lobby_events);
            });
        }

        dgs_stub::reset();
        let _discord = Discord::create(testing::library(), 1, CreateFlags::NO_REQUIRE_DISCORD).unwrap();
        dgs_stub::with(|stub| assert_eq!(stub.created_with.flags, 1));
    }

    #[test]
    fn test_create_failure_is_an_error() {
        dgs_stub::reset();
        dgs_stub::with(|stub| stub.create_result = sdk::DiscordResult_NotRunning);

        let err = Discord::create(testing::library(), CLIENT_ID, CreateFlags::DEFAULT).unwrap_err();
        assert!(matches!(err, Error::CreateFailed { code: 27 }));
        assert_eq!(err.sdk_error(), Some(SdkError::NotRunning));
    }

    #[test]
    fn test_manager_handles_are_cached() {
        let discord = testing::discord();
        discord.users().unwrap();
        discord.users().unwrap();
        discord.lobbies().unwrap();
        dgs_stub::with(|stub| {
            assert_eq!(stub.count_calls("get_user_manager"), 1);
            assert_eq!(stub.count_calls("get_lobby_manager"), 1);
        });
    }

    #[test]
    fn test_destroy_runs_once() {
        let mut discord = testing::discord();
        discord.destroy();
        discord.destroy();
        assert!(discord.is_destroyed());
        drop(discord);
        dgs_stub::with(|stub| assert_eq!(stub.destroy_count, 1));
    }

    #[test]
    fn test_drop_destroys() {
        let discord = testing::discord();
        drop(discord);
        dgs_stub::with(|stub| assert_eq!(stub.destroy_count, 1));
    }

    #[test]
    fn test_destroyed_core_rejects_calls() {
        let mut discord = testing::discord();
        discord.users().unwrap();
        discord.destroy();

        assert!(matches!(discord.users(), Err(Error::Destroyed)));
        assert!(matches!(discord.storage(), Err(Error::Destroyed)));
        assert!(matches!(discord.run_callbacks(), Err(Error::Destroyed)));
    }

    #[test]
    fn test_destroy_drops_pending_completions() {
        let mut discord = testing::discord();
        let fired = Rc::new(RefCell::new(false));

        let flag = fired.clone();
        discord
            .activities()
            .unwrap()
            .clear_activity(move |_| *flag.borrow_mut() = true)
            .unwrap();
        assert_eq!(discord.pending_completions(), 1);

        discord.destroy();
        assert_eq!(discord.pending_completions(), 0);
        assert!(!*fired.borrow());
    }

    #[test]
    fn test_missing_manager_slot() {
        dgs_stub::reset();
        dgs_stub::with(|stub| stub.null_managers.push("get_voice_manager"));
        let discord = testing::discord_keep_state();
        assert!(matches!(discord.voice(), Err(Error::NullPointer("voice manager"))));
    }

    #[test]
    fn test_log_hook_receives_messages() {
        let mut discord = testing::discord();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let sink = seen.clone();
        discord
            .set_log_hook(LogLevel::Info, move |level, message| {
                sink.borrow_mut().push((level, message.to_string()))
            })
            .unwrap();
        dgs_stub::with(|stub| assert_eq!(stub.log_min_level, Some(sdk::DiscordLogLevel_Info)));

        dgs_stub::log(sdk::DiscordLogLevel_Error, "socket closed");
        assert!(seen.borrow().is_empty());
        discord.run_callbacks().unwrap();

        assert_eq!(*seen.borrow(), vec![(LogLevel::Error, "socket closed".to_string())]);
    }

    #[test]
    fn test_replacing_log_hook() {
        let mut discord = testing::discord();
        let first = Rc::new(RefCell::new(0));
        let second = Rc::new(RefCell::new(0));

        let counter = first.clone();
        discord.set_log_hook(LogLevel::Debug, move |_, _| *counter.borrow_mut() += 1).unwrap();
        let counter = second.clone();
        discord.set_log_hook(LogLevel::Debug, move |_, _| *counter.borrow_mut() += 1).unwrap();

        dgs_stub::log(sdk::DiscordLogLevel_Info, "hello");
        discord.run_callbacks().unwrap();
        assert_eq!((*first.borrow(), *second.borrow()), (0, 1));
    }

    #[test]
    fn test_forward_logs_to_tracing() {
        let mut discord = testing::discord();
        discord.forward_logs_to_tracing(LogLevel::Warn).unwrap();
        dgs_stub::log(sdk::DiscordLogLevel_Warn, "forwarded");
        discord.run_callbacks().unwrap();
    }

    #[test]
    fn test_with_library_uses_config() {
        dgs_stub::reset();
        let config = SdkConfig {
            client_id: CLIENT_ID,
            require_discord: false,
            log_level: LogLevel::Error,
            ..Default::default()
        };
        let discord = Discord::with_library(testing::library(), &config).unwrap();
        assert_eq!(discord.client_id(), CLIENT_ID);
        dgs_stub::with(|stub| {
            assert_eq!(stub.created_with.flags, 1);
            assert_eq!(stub.log_min_level, Some(sdk::DiscordLogLevel_Error));
        });
    }

    #[test]
    fn test_run_callbacks_status() {
        let discord = testing::discord();
        dgs_stub::with(|stub| stub.fail("run_callbacks", sdk::DiscordResult_NotRunning));
        assert!(matches!(
            discord.run_callbacks(),
            Err(Error::Sdk(SdkError::NotRunning))
        ));
    }
}
