//! `DiscordCreate` and the core table

use std::ffi::c_void;
use std::ptr;

use dgs_sdk as sdk;

use crate::managers::{self, OK};
use crate::{lobby, with, CreatedWith};

static CORE: sdk::IDiscordCore = sdk::IDiscordCore {
    destroy: Some(destroy),
    run_callbacks: Some(run_callbacks),
    set_log_hook: Some(set_log_hook),
    get_application_manager: Some(get_application_manager),
    get_user_manager: Some(get_user_manager),
    get_image_manager: Some(get_image_manager),
    get_activity_manager: Some(get_activity_manager),
    get_relationship_manager: Some(get_relationship_manager),
    get_lobby_manager: Some(get_lobby_manager),
    get_network_manager: Some(get_network_manager),
    get_overlay_manager: Some(get_overlay_manager),
    get_storage_manager: Some(get_storage_manager),
    get_store_manager: Some(get_store_manager),
    get_voice_manager: Some(get_voice_manager),
    get_achievement_manager: Some(get_achievement_manager),
};

/// Stand-in for the library's exported `DiscordCreate`.
///
/// Records what it was given, then fails with
/// [`StubState::create_result`](crate::StubState::create_result) or hands
/// out the shared core table.
///
/// # Safety
/// `params` must point to a valid parameter block and `result` must be
/// writable, exactly as for the native entry point.
pub unsafe extern "C" fn discord_create(
    version: sdk::DiscordVersion,
    params: *mut sdk::DiscordCreateParams,
    result: *mut *mut sdk::IDiscordCore,
) -> sdk::EDiscordResult {
    let Some(params) = (unsafe { params.as_ref() }).copied() else {
        return sdk::DiscordResult_InvalidPayload;
    };
    with(|stub| {
        stub.created_with = CreatedWith {
            client_id: params.client_id,
            flags: params.flags,
            version,
            lobby_events: !params.lobby_events.is_null(),
        };
        if stub.create_result != OK {
            return stub.create_result;
        }
        stub.params = Some(params);
        unsafe { managers::put(result, &CORE as *const sdk::IDiscordCore as *mut sdk::IDiscordCore) };
        OK
    })
}

unsafe extern "C" fn destroy(_core: *mut sdk::IDiscordCore) {
    let dropped = with(|stub| {
        stub.record("destroy", Vec::new(), &[]);
        stub.destroy_count += 1;
        stub.params = None;
        stub.log_hook = None;
        std::mem::take(&mut stub.queue)
    });
    // Undelivered work goes away with the core
    drop(dropped);
}

unsafe extern "C" fn run_callbacks(_core: *mut sdk::IDiscordCore) -> sdk::EDiscordResult {
    let (queue, delivery, code) = with(|stub| {
        stub.record("run_callbacks", Vec::new(), &[]);
        match stub.failure("run_callbacks") {
            Some(code) => (Vec::new(), None, code),
            None => {
                let (queue, delivery) = stub.take_queue();
                (queue, delivery, OK)
            }
        }
    });
    // The state is released here: delivered callbacks call back into the stub
    if let Some(delivery) = delivery {
        for work in queue {
            work(&delivery);
        }
    }
    code
}

unsafe extern "C" fn set_log_hook(
    _core: *mut sdk::IDiscordCore,
    min_level: sdk::EDiscordLogLevel,
    hook_data: *mut c_void,
    hook: sdk::DiscordLogHook,
) {
    with(|stub| {
        stub.record("set_log_hook", args![min_level], &[]);
        stub.log_min_level = Some(min_level);
        stub.log_hook = hook.map(|hook| (hook, hook_data));
    });
}

/// Hand out a manager table unless the test asked for a null one
fn manager<T>(name: &'static str, table: &'static T) -> *mut T {
    with(|stub| {
        stub.record(name, Vec::new(), &[]);
        if stub.null_managers.contains(&name) {
            ptr::null_mut()
        } else {
            table as *const T as *mut T
        }
    })
}

macro_rules! manager_getters {
    ($($getter:ident => $table:path: $ty:ty),* $(,)?) => {
        $(
            unsafe extern "C" fn $getter(_core: *mut sdk::IDiscordCore) -> *mut $ty {
                manager(stringify!($getter), &$table)
            }
        )*
    };
}

manager_getters! {
    get_application_manager => managers::APPLICATION: sdk::IDiscordApplicationManager,
    get_user_manager => managers::USER: sdk::IDiscordUserManager,
    get_image_manager => managers::IMAGE: sdk::IDiscordImageManager,
    get_activity_manager => managers::ACTIVITY: sdk::IDiscordActivityManager,
    get_relationship_manager => managers::RELATIONSHIP: sdk::IDiscordRelationshipManager,
    get_lobby_manager => lobby::LOBBY: sdk::IDiscordLobbyManager,
    get_network_manager => managers::NETWORK: sdk::IDiscordNetworkManager,
    get_overlay_manager => managers::OVERLAY: sdk::IDiscordOverlayManager,
    get_storage_manager => managers::STORAGE: sdk::IDiscordStorageManager,
    get_store_manager => managers::STORE: sdk::IDiscordStoreManager,
    get_voice_manager => managers::VOICE: sdk::IDiscordVoiceManager,
    get_achievement_manager => managers::ACHIEVEMENT: sdk::IDiscordAchievementManager,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create() -> *mut sdk::IDiscordCore {
        let mut params = sdk::DiscordCreateParams {
            client_id: 7,
            ..Default::default()
        };
        let mut core = ptr::null_mut();
        let code = unsafe { discord_create(sdk::DISCORD_VERSION, &mut params, &mut core) };
        assert_eq!(code, OK);
        core
    }

    #[test]
    fn test_create_records_params() {
        crate::reset();
        assert!(!create().is_null());
        with(|stub| {
            assert_eq!(stub.created_with.client_id, 7);
            assert!(!stub.created_with.lobby_events);
            assert!(stub.calls.is_empty());
        });
    }

    #[test]
    fn test_create_failure() {
        crate::reset();
        with(|stub| stub.create_result = sdk::DiscordResult_InternalError);
        let mut params = sdk::DiscordCreateParams::default();
        let mut core = ptr::null_mut();
        let code = unsafe { discord_create(sdk::DISCORD_VERSION, &mut params, &mut core) };
        assert_eq!(code, sdk::DiscordResult_InternalError);
        assert!(core.is_null());
    }

    #[test]
    fn test_null_manager() {
        crate::reset();
        with(|stub| stub.null_managers.push("get_store_manager"));
        assert!(manager("get_store_manager", &managers::STORE).is_null());
        assert!(!manager("get_voice_manager", &managers::VOICE).is_null());
    }

    #[test]
    fn test_destroy_drops_queue() {
        crate::reset();
        let core = create();
        with(|stub| stub.enqueue(|_| panic!("must not run")));
        unsafe { destroy(core) };
        with(|stub| {
            assert_eq!(stub.destroy_count, 1);
            assert!(stub.queue.is_empty());
        });
    }
}
