//! Manager tables backed by [`StubState`]
//!
//! Synchronous slots answer immediately. Asynchronous slots decide their
//! outcome when called and queue the completion for the next
//! `run_callbacks`; a failure configured with [`StubState::fail`] skips the
//! state change and is reported instead.

use std::ffi::{c_char, c_void, CStr};

use dgs_sdk as sdk;

use crate::{events, set_text, text, with, StubState};

pub(crate) const OK: sdk::EDiscordResult = sdk::DiscordResult_Ok;

/// Fixed timestamp reported for unlocked achievements
const UNLOCKED_AT: &str = "2024-05-01T12:00:00Z";

/// Modification time reported for stored files
const FILE_MODIFIED: u64 = 1_714_564_800;

// === Plumbing ===

/// Record a synchronous call and produce its status
pub(crate) fn call(
    name: &'static str,
    args: Vec<String>,
    data: &[u8],
    f: impl FnOnce(&mut StubState) -> Result<(), sdk::EDiscordResult>,
) -> sdk::EDiscordResult {
    with(|stub| {
        stub.record(name, args, data);
        if let Some(code) = stub.failure(name) {
            return code;
        }
        match f(stub) {
            Ok(()) => OK,
            Err(code) => code,
        }
    })
}

/// Record an asynchronous call and queue its completion
pub(crate) fn complete<T: Clone + Default + 'static>(
    name: &'static str,
    args: Vec<String>,
    data: &[u8],
    f: impl FnOnce(&mut StubState) -> Result<T, sdk::EDiscordResult>,
    deliver: impl Fn(sdk::EDiscordResult, T) + 'static,
) {
    with(|stub| {
        stub.record(name, args, data);
        let outcome = match stub.failure(name) {
            Some(code) => Err(code),
            None => f(stub),
        };
        let (code, value) = match outcome {
            Ok(value) => (OK, value),
            Err(code) => (code, T::default()),
        };
        stub.enqueue_completion(move |_| deliver(code, value.clone()));
    });
}

pub(crate) fn on_result(
    callback_data: *mut c_void,
    callback: sdk::DiscordResultCallback,
) -> impl Fn(sdk::EDiscordResult, ()) + 'static {
    move |code, ()| {
        if let Some(callback) = callback {
            unsafe { callback(callback_data, code) }
        }
    }
}

/// Completion passing a record by pointer
pub(crate) fn on_record<T: 'static>(
    callback_data: *mut c_void,
    callback: Option<unsafe extern "C" fn(*mut c_void, sdk::EDiscordResult, *mut T)>,
) -> impl Fn(sdk::EDiscordResult, T) + 'static {
    move |code, mut value| {
        if let Some(callback) = callback {
            unsafe { callback(callback_data, code, &mut value) }
        }
    }
}

fn on_data(
    callback_data: *mut c_void,
    callback: sdk::DiscordDataCallback,
) -> impl Fn(sdk::EDiscordResult, Vec<u8>) + 'static {
    move |code, mut data| {
        if let Some(callback) = callback {
            unsafe { callback(callback_data, code, data.as_mut_ptr(), data.len() as u32) }
        }
    }
}

/// Write through an out pointer, ignoring null
pub(crate) unsafe fn put<T>(out: *mut T, value: T) {
    if let Some(out) = unsafe { out.as_mut() } {
        *out = value;
    }
}

pub(crate) unsafe fn put_text<const N: usize>(out: *mut [c_char; N], value: &str) {
    if let Some(out) = unsafe { out.as_mut() } {
        set_text(out, value);
    }
}

pub(crate) unsafe fn c_str(ptr: *const c_char) -> String {
    if ptr.is_null() {
        String::new()
    } else {
        unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned()
    }
}

pub(crate) fn c_string(value: &str) -> Vec<u8> {
    let mut bytes = value.as_bytes().to_vec();
    bytes.push(0);
    bytes
}

pub(crate) unsafe fn bytes(data: *const u8, len: u32) -> Vec<u8> {
    if data.is_null() || len == 0 {
        Vec::new()
    } else {
        unsafe { std::slice::from_raw_parts(data, len as usize) }.to_vec()
    }
}

pub(crate) fn at<T: Copy>(items: &[T], index: impl TryInto<usize>) -> Result<T, sdk::EDiscordResult> {
    index
        .try_into()
        .ok()
        .and_then(|i| items.get(i).copied())
        .ok_or(sdk::DiscordResult_NotFound)
}

pub(crate) fn count(len: usize) -> i32 {
    i32::try_from(len).unwrap_or(i32::MAX)
}

// === Application ===

pub(crate) static APPLICATION: sdk::IDiscordApplicationManager = sdk::IDiscordApplicationManager {
    validate_or_exit: Some(validate_or_exit),
    get_current_locale: Some(get_current_locale),
    get_current_branch: Some(get_current_branch),
    get_oauth2_token: Some(get_oauth2_token),
    get_ticket: Some(get_ticket),
};

unsafe extern "C" fn validate_or_exit(
    _: *mut sdk::IDiscordApplicationManager,
    data: *mut c_void,
    callback: sdk::DiscordResultCallback,
) {
    complete("validate_or_exit", Vec::new(), &[], |_| Ok(()), on_result(data, callback));
}

unsafe extern "C" fn get_current_locale(_: *mut sdk::IDiscordApplicationManager, out: *mut sdk::DiscordLocale) {
    call("get_current_locale", Vec::new(), &[], |stub| {
        unsafe { put_text(out, &stub.locale) };
        Ok(())
    });
}

unsafe extern "C" fn get_current_branch(_: *mut sdk::IDiscordApplicationManager, out: *mut sdk::DiscordBranch) {
    call("get_current_branch", Vec::new(), &[], |stub| {
        unsafe { put_text(out, &stub.branch) };
        Ok(())
    });
}

unsafe extern "C" fn get_oauth2_token(
    _: *mut sdk::IDiscordApplicationManager,
    data: *mut c_void,
    callback: sdk::DiscordOAuth2TokenCallback,
) {
    complete("get_oauth2_token", Vec::new(), &[], |stub| Ok(stub.oauth2_token), on_record(data, callback));
}

unsafe extern "C" fn get_ticket(
    _: *mut sdk::IDiscordApplicationManager,
    data: *mut c_void,
    callback: sdk::DiscordTicketCallback,
) {
    complete(
        "get_ticket",
        Vec::new(),
        &[],
        |stub| Ok(c_string(&stub.ticket)),
        move |code, ticket: Vec<u8>| {
            if let Some(callback) = callback {
                unsafe { callback(data, code, ticket.as_ptr() as *const c_char) }
            }
        },
    );
}

// === User ===

pub(crate) static USER: sdk::IDiscordUserManager = sdk::IDiscordUserManager {
    get_current_user: Some(get_current_user),
    get_user: Some(get_user),
    get_current_user_premium_type: Some(get_current_user_premium_type),
    current_user_has_flag: Some(current_user_has_flag),
};

impl StubState {
    /// Look up a user the stub knows about, the current user included
    pub(crate) fn find_user(&self, user_id: i64) -> Option<sdk::DiscordUser> {
        if self.current_user.id == user_id {
            Some(self.current_user)
        } else {
            self.users.get(&user_id).copied()
        }
    }
}

unsafe extern "C" fn get_current_user(_: *mut sdk::IDiscordUserManager, out: *mut sdk::DiscordUser) -> sdk::EDiscordResult {
    call("get_current_user", Vec::new(), &[], |stub| {
        unsafe { put(out, stub.current_user) };
        Ok(())
    })
}

unsafe extern "C" fn get_user(
    _: *mut sdk::IDiscordUserManager,
    user_id: i64,
    data: *mut c_void,
    callback: sdk::DiscordUserCallback,
) {
    complete(
        "get_user",
        args![user_id],
        &[],
        |stub| stub.find_user(user_id).ok_or(sdk::DiscordResult_NotFound),
        on_record(data, callback),
    );
}

unsafe extern "C" fn get_current_user_premium_type(
    _: *mut sdk::IDiscordUserManager,
    out: *mut sdk::EDiscordPremiumType,
) -> sdk::EDiscordResult {
    call("get_current_user_premium_type", Vec::new(), &[], |stub| {
        unsafe { put(out, stub.premium_type) };
        Ok(())
    })
}

unsafe extern "C" fn current_user_has_flag(
    _: *mut sdk::IDiscordUserManager,
    flag: sdk::EDiscordUserFlag,
    out: *mut bool,
) -> sdk::EDiscordResult {
    call("current_user_has_flag", args![flag], &[], |stub| {
        unsafe { put(out, stub.user_flags & flag != 0) };
        Ok(())
    })
}

// === Image ===

pub(crate) static IMAGE: sdk::IDiscordImageManager = sdk::IDiscordImageManager {
    fetch: Some(image_fetch),
    get_dimensions: Some(image_get_dimensions),
    get_data: Some(image_get_data),
};

unsafe extern "C" fn image_fetch(
    _: *mut sdk::IDiscordImageManager,
    handle: sdk::DiscordImageHandle,
    refresh: bool,
    data: *mut c_void,
    callback: sdk::DiscordImageHandleCallback,
) {
    complete(
        "fetch",
        args![handle.id, handle.size, refresh],
        &[],
        |_| Ok(handle),
        move |code, handle| {
            if let Some(callback) = callback {
                unsafe { callback(data, code, handle) }
            }
        },
    );
}

unsafe extern "C" fn image_get_dimensions(
    _: *mut sdk::IDiscordImageManager,
    _handle: sdk::DiscordImageHandle,
    out: *mut sdk::DiscordImageDimensions,
) -> sdk::EDiscordResult {
    call("get_dimensions", Vec::new(), &[], |stub| {
        let (width, height) = stub.image_size;
        unsafe { put(out, sdk::DiscordImageDimensions { width, height }) };
        Ok(())
    })
}

unsafe extern "C" fn image_get_data(
    _: *mut sdk::IDiscordImageManager,
    _handle: sdk::DiscordImageHandle,
    out: *mut u8,
    len: u32,
) -> sdk::EDiscordResult {
    call("get_data", args![len], &[], |stub| {
        if out.is_null() {
            return Err(sdk::DiscordResult_InsufficientBuffer);
        }
        let n = stub.image_data.len().min(len as usize);
        unsafe { std::ptr::copy_nonoverlapping(stub.image_data.as_ptr(), out, n) };
        Ok(())
    })
}

// === Activity ===

pub(crate) static ACTIVITY: sdk::IDiscordActivityManager = sdk::IDiscordActivityManager {
    register_command: Some(register_command),
    register_steam: Some(register_steam),
    update_activity: Some(update_activity),
    clear_activity: Some(clear_activity),
    send_request_reply: Some(send_request_reply),
    send_invite: Some(send_invite),
    accept_invite: Some(accept_invite),
};

unsafe extern "C" fn register_command(_: *mut sdk::IDiscordActivityManager, command: *const c_char) -> sdk::EDiscordResult {
    let command = unsafe { c_str(command) };
    call("register_command", args![command], &[], |_| Ok(()))
}

unsafe extern "C" fn register_steam(_: *mut sdk::IDiscordActivityManager, steam_id: u32) -> sdk::EDiscordResult {
    call("register_steam", args![steam_id], &[], |_| Ok(()))
}

unsafe extern "C" fn update_activity(
    _: *mut sdk::IDiscordActivityManager,
    activity: *mut sdk::DiscordActivity,
    data: *mut c_void,
    callback: sdk::DiscordResultCallback,
) {
    let activity = unsafe { activity.as_ref() }.copied();
    complete(
        "update_activity",
        Vec::new(),
        &[],
        |stub| {
            let activity = activity.ok_or(sdk::DiscordResult_InvalidPayload)?;
            stub.activity = Some(activity);
            Ok(())
        },
        on_result(data, callback),
    );
}

unsafe extern "C" fn clear_activity(_: *mut sdk::IDiscordActivityManager, data: *mut c_void, callback: sdk::DiscordResultCallback) {
    complete(
        "clear_activity",
        Vec::new(),
        &[],
        |stub| {
            stub.activity = None;
            Ok(())
        },
        on_result(data, callback),
    );
}

unsafe extern "C" fn send_request_reply(
    _: *mut sdk::IDiscordActivityManager,
    user_id: i64,
    reply: sdk::EDiscordActivityJoinRequestReply,
    data: *mut c_void,
    callback: sdk::DiscordResultCallback,
) {
    complete("send_request_reply", args![user_id, reply], &[], |_| Ok(()), on_result(data, callback));
}

unsafe extern "C" fn send_invite(
    _: *mut sdk::IDiscordActivityManager,
    user_id: i64,
    action: sdk::EDiscordActivityActionType,
    content: *const c_char,
    data: *mut c_void,
    callback: sdk::DiscordResultCallback,
) {
    let content = unsafe { c_str(content) };
    complete("send_invite", args![user_id, action, content], &[], |_| Ok(()), on_result(data, callback));
}

unsafe extern "C" fn accept_invite(
    _: *mut sdk::IDiscordActivityManager,
    user_id: i64,
    data: *mut c_void,
    callback: sdk::DiscordResultCallback,
) {
    complete("accept_invite", args![user_id], &[], |_| Ok(()), on_result(data, callback));
}

// === Relationship ===

pub(crate) static RELATIONSHIP: sdk::IDiscordRelationshipManager = sdk::IDiscordRelationshipManager {
    filter: Some(relationship_filter),
    count: Some(relationship_count),
    get: Some(relationship_get),
    get_at: Some(relationship_get_at),
};

unsafe extern "C" fn relationship_filter(
    _: *mut sdk::IDiscordRelationshipManager,
    filter_data: *mut c_void,
    filter: sdk::DiscordRelationshipFilter,
) {
    let all = with(|stub| {
        stub.record("filter", Vec::new(), &[]);
        stub.relationships.clone()
    });
    let Some(filter) = filter else {
        return;
    };
    // The predicate runs without the state borrowed
    let kept: Vec<_> = all
        .into_iter()
        .filter(|relationship| {
            let mut copy = *relationship;
            unsafe { filter(filter_data, &mut copy) }
        })
        .collect();
    with(|stub| stub.filtered = Some(kept));
}

unsafe extern "C" fn relationship_count(_: *mut sdk::IDiscordRelationshipManager, out: *mut i32) -> sdk::EDiscordResult {
    call("count", Vec::new(), &[], |stub| {
        let filtered = stub.filtered.as_ref().ok_or(sdk::DiscordResult_NotFiltered)?;
        unsafe { put(out, count(filtered.len())) };
        Ok(())
    })
}

unsafe extern "C" fn relationship_get(
    _: *mut sdk::IDiscordRelationshipManager,
    user_id: i64,
    out: *mut sdk::DiscordRelationship,
) -> sdk::EDiscordResult {
    call("get", args![user_id], &[], |stub| {
        let found = stub
            .relationships
            .iter()
            .find(|r| r.user.id == user_id)
            .ok_or(sdk::DiscordResult_NotFound)?;
        unsafe { put(out, *found) };
        Ok(())
    })
}

unsafe extern "C" fn relationship_get_at(
    _: *mut sdk::IDiscordRelationshipManager,
    index: u32,
    out: *mut sdk::DiscordRelationship,
) -> sdk::EDiscordResult {
    call("get_at", args![index], &[], |stub| {
        let filtered = stub.filtered.as_ref().ok_or(sdk::DiscordResult_NotFiltered)?;
        unsafe { put(out, at(filtered, index)?) };
        Ok(())
    })
}

// === Network ===

pub(crate) static NETWORK: sdk::IDiscordNetworkManager = sdk::IDiscordNetworkManager {
    get_peer_id: Some(get_peer_id),
    flush: Some(network_flush),
    open_peer: Some(open_peer),
    update_peer: Some(update_peer),
    close_peer: Some(close_peer),
    open_channel: Some(open_channel),
    close_channel: Some(close_channel),
    send_message: Some(send_message),
};

unsafe extern "C" fn get_peer_id(_: *mut sdk::IDiscordNetworkManager, out: *mut sdk::DiscordNetworkPeerId) {
    call("get_peer_id", Vec::new(), &[], |stub| {
        unsafe { put(out, stub.peer_id) };
        Ok(())
    });
}

unsafe extern "C" fn network_flush(_: *mut sdk::IDiscordNetworkManager) -> sdk::EDiscordResult {
    call("flush", Vec::new(), &[], |_| Ok(()))
}

unsafe extern "C" fn open_peer(
    _: *mut sdk::IDiscordNetworkManager,
    peer_id: sdk::DiscordNetworkPeerId,
    route: *const c_char,
) -> sdk::EDiscordResult {
    let route = unsafe { c_str(route) };
    call("open_peer", args![peer_id, route], &[], |_| Ok(()))
}

unsafe extern "C" fn update_peer(
    _: *mut sdk::IDiscordNetworkManager,
    peer_id: sdk::DiscordNetworkPeerId,
    route: *const c_char,
) -> sdk::EDiscordResult {
    let route = unsafe { c_str(route) };
    call("update_peer", args![peer_id, route], &[], |_| Ok(()))
}

unsafe extern "C" fn close_peer(_: *mut sdk::IDiscordNetworkManager, peer_id: sdk::DiscordNetworkPeerId) -> sdk::EDiscordResult {
    call("close_peer", args![peer_id], &[], |_| Ok(()))
}

unsafe extern "C" fn open_channel(
    _: *mut sdk::IDiscordNetworkManager,
    peer_id: sdk::DiscordNetworkPeerId,
    channel_id: sdk::DiscordNetworkChannelId,
    reliable: bool,
) -> sdk::EDiscordResult {
    call("open_channel", args![peer_id, channel_id, reliable], &[], |_| Ok(()))
}

unsafe extern "C" fn close_channel(
    _: *mut sdk::IDiscordNetworkManager,
    peer_id: sdk::DiscordNetworkPeerId,
    channel_id: sdk::DiscordNetworkChannelId,
) -> sdk::EDiscordResult {
    call("close_channel", args![peer_id, channel_id], &[], |_| Ok(()))
}

unsafe extern "C" fn send_message(
    _: *mut sdk::IDiscordNetworkManager,
    peer_id: sdk::DiscordNetworkPeerId,
    channel_id: sdk::DiscordNetworkChannelId,
    data: *mut u8,
    len: u32,
) -> sdk::EDiscordResult {
    let data = unsafe { bytes(data, len) };
    call("send_message", args![peer_id, channel_id], &data, |_| Ok(()))
}

// === Overlay ===

pub(crate) static OVERLAY: sdk::IDiscordOverlayManager = sdk::IDiscordOverlayManager {
    is_enabled: Some(overlay_is_enabled),
    is_locked: Some(overlay_is_locked),
    set_locked: Some(overlay_set_locked),
    open_activity_invite: Some(open_activity_invite),
    open_guild_invite: Some(open_guild_invite),
    open_voice_settings: Some(open_voice_settings),
};

unsafe extern "C" fn overlay_is_enabled(_: *mut sdk::IDiscordOverlayManager, out: *mut bool) {
    call("is_enabled", Vec::new(), &[], |stub| {
        unsafe { put(out, stub.overlay_enabled) };
        Ok(())
    });
}

unsafe extern "C" fn overlay_is_locked(_: *mut sdk::IDiscordOverlayManager, out: *mut bool) {
    call("is_locked", Vec::new(), &[], |stub| {
        unsafe { put(out, stub.overlay_locked) };
        Ok(())
    });
}

unsafe extern "C" fn overlay_set_locked(
    _: *mut sdk::IDiscordOverlayManager,
    locked: bool,
    data: *mut c_void,
    callback: sdk::DiscordResultCallback,
) {
    complete(
        "set_locked",
        args![locked],
        &[],
        |stub| {
            stub.overlay_locked = locked;
            stub.enqueue(events::overlay_toggle(locked));
            Ok(())
        },
        on_result(data, callback),
    );
}

unsafe extern "C" fn open_activity_invite(
    _: *mut sdk::IDiscordOverlayManager,
    action: sdk::EDiscordActivityActionType,
    data: *mut c_void,
    callback: sdk::DiscordResultCallback,
) {
    complete("open_activity_invite", args![action], &[], |_| Ok(()), on_result(data, callback));
}

unsafe extern "C" fn open_guild_invite(
    _: *mut sdk::IDiscordOverlayManager,
    code: *const c_char,
    data: *mut c_void,
    callback: sdk::DiscordResultCallback,
) {
    let code = unsafe { c_str(code) };
    complete("open_guild_invite", args![code], &[], |_| Ok(()), on_result(data, callback));
}

unsafe extern "C" fn open_voice_settings(
    _: *mut sdk::IDiscordOverlayManager,
    data: *mut c_void,
    callback: sdk::DiscordResultCallback,
) {
    complete("open_voice_settings", Vec::new(), &[], |_| Ok(()), on_result(data, callback));
}

// === Storage ===

pub(crate) static STORAGE: sdk::IDiscordStorageManager = sdk::IDiscordStorageManager {
    read: Some(storage_read),
    read_async: Some(storage_read_async),
    read_async_partial: Some(storage_read_async_partial),
    write: Some(storage_write),
    write_async: Some(storage_write_async),
    delete_: Some(storage_delete),
    exists: Some(storage_exists),
    count: Some(storage_count),
    stat: Some(storage_stat),
    stat_at: Some(storage_stat_at),
    get_path: Some(storage_get_path),
};

fn file_stat(name: &str, data: &[u8]) -> sdk::DiscordFileStat {
    let mut stat = sdk::DiscordFileStat::default();
    set_text(&mut stat.filename, name);
    stat.size = data.len() as u64;
    stat.last_modified = FILE_MODIFIED;
    stat
}

unsafe extern "C" fn storage_read(
    _: *mut sdk::IDiscordStorageManager,
    name: *const c_char,
    out: *mut u8,
    len: u32,
    read: *mut u32,
) -> sdk::EDiscordResult {
    let name = unsafe { c_str(name) };
    call("read", args![name, len], &[], |stub| {
        let file = stub.files.get(&name).ok_or(sdk::DiscordResult_NotFound)?;
        if out.is_null() {
            return Err(sdk::DiscordResult_InsufficientBuffer);
        }
        let n = file.len().min(len as usize);
        unsafe {
            std::ptr::copy_nonoverlapping(file.as_ptr(), out, n);
            put(read, stub.bytes_read_override.unwrap_or(n as u32));
        }
        Ok(())
    })
}

unsafe extern "C" fn storage_read_async(
    _: *mut sdk::IDiscordStorageManager,
    name: *const c_char,
    data: *mut c_void,
    callback: sdk::DiscordDataCallback,
) {
    let name = unsafe { c_str(name) };
    complete(
        "read_async",
        args![name],
        &[],
        |stub| stub.files.get(&name).cloned().ok_or(sdk::DiscordResult_NotFound),
        on_data(data, callback),
    );
}

unsafe extern "C" fn storage_read_async_partial(
    _: *mut sdk::IDiscordStorageManager,
    name: *const c_char,
    offset: u64,
    length: u64,
    data: *mut c_void,
    callback: sdk::DiscordDataCallback,
) {
    let name = unsafe { c_str(name) };
    complete(
        "read_async_partial",
        args![name, offset, length],
        &[],
        |stub| {
            let file = stub.files.get(&name).ok_or(sdk::DiscordResult_NotFound)?;
            let start = usize::try_from(offset).unwrap_or(usize::MAX).min(file.len());
            let end = usize::try_from(length)
                .map(|length| start.saturating_add(length))
                .unwrap_or(usize::MAX)
                .min(file.len());
            Ok(file[start..end].to_vec())
        },
        on_data(data, callback),
    );
}

unsafe extern "C" fn storage_write(
    _: *mut sdk::IDiscordStorageManager,
    name: *const c_char,
    data: *mut u8,
    len: u32,
) -> sdk::EDiscordResult {
    let name = unsafe { c_str(name) };
    let data = unsafe { bytes(data, len) };
    call("write", args![name, len], &data, |stub| {
        stub.files.insert(name.clone(), data.clone());
        Ok(())
    })
}

unsafe extern "C" fn storage_write_async(
    _: *mut sdk::IDiscordStorageManager,
    name: *const c_char,
    data: *mut u8,
    len: u32,
    callback_data: *mut c_void,
    callback: sdk::DiscordResultCallback,
) {
    let name = unsafe { c_str(name) };
    let data = unsafe { bytes(data, len) };
    complete(
        "write_async",
        args![name, len],
        &data,
        |stub| {
            stub.files.insert(name.clone(), data.clone());
            Ok(())
        },
        on_result(callback_data, callback),
    );
}

unsafe extern "C" fn storage_delete(_: *mut sdk::IDiscordStorageManager, name: *const c_char) -> sdk::EDiscordResult {
    let name = unsafe { c_str(name) };
    call("delete", args![name], &[], |stub| {
        stub.files.remove(&name).map(|_| ()).ok_or(sdk::DiscordResult_NotFound)
    })
}

unsafe extern "C" fn storage_exists(
    _: *mut sdk::IDiscordStorageManager,
    name: *const c_char,
    out: *mut bool,
) -> sdk::EDiscordResult {
    let name = unsafe { c_str(name) };
    call("exists", args![name], &[], |stub| {
        unsafe { put(out, stub.files.contains_key(&name)) };
        Ok(())
    })
}

unsafe extern "C" fn storage_count(_: *mut sdk::IDiscordStorageManager, out: *mut i32) {
    call("count", Vec::new(), &[], |stub| {
        unsafe { put(out, count(stub.files.len())) };
        Ok(())
    });
}

unsafe extern "C" fn storage_stat(
    _: *mut sdk::IDiscordStorageManager,
    name: *const c_char,
    out: *mut sdk::DiscordFileStat,
) -> sdk::EDiscordResult {
    let name = unsafe { c_str(name) };
    call("stat", args![name], &[], |stub| {
        let file = stub.files.get(&name).ok_or(sdk::DiscordResult_NotFound)?;
        unsafe { put(out, file_stat(&name, file)) };
        Ok(())
    })
}

unsafe extern "C" fn storage_stat_at(
    _: *mut sdk::IDiscordStorageManager,
    index: i32,
    out: *mut sdk::DiscordFileStat,
) -> sdk::EDiscordResult {
    call("stat_at", args![index], &[], |stub| {
        let (name, file) = usize::try_from(index)
            .ok()
            .and_then(|i| stub.files.iter().nth(i))
            .ok_or(sdk::DiscordResult_NotFound)?;
        unsafe { put(out, file_stat(name, file)) };
        Ok(())
    })
}

unsafe extern "C" fn storage_get_path(_: *mut sdk::IDiscordStorageManager, out: *mut sdk::DiscordPath) -> sdk::EDiscordResult {
    call("get_path", Vec::new(), &[], |stub| {
        unsafe { put_text(out, &stub.storage_path) };
        Ok(())
    })
}

// === Store ===

pub(crate) static STORE: sdk::IDiscordStoreManager = sdk::IDiscordStoreManager {
    fetch_skus: Some(fetch_skus),
    count_skus: Some(count_skus),
    get_sku: Some(get_sku),
    get_sku_at: Some(get_sku_at),
    fetch_entitlements: Some(fetch_entitlements),
    count_entitlements: Some(count_entitlements),
    get_entitlement: Some(get_entitlement),
    get_entitlement_at: Some(get_entitlement_at),
    has_sku_entitlement: Some(has_sku_entitlement),
    start_purchase: Some(start_purchase),
};

impl StubState {
    fn fetched_skus(&self) -> Result<&[sdk::DiscordSku], sdk::EDiscordResult> {
        if self.skus_fetched {
            Ok(&self.skus)
        } else {
            Err(sdk::DiscordResult_NotFetched)
        }
    }

    fn fetched_entitlements(&self) -> Result<&[sdk::DiscordEntitlement], sdk::EDiscordResult> {
        if self.entitlements_fetched {
            Ok(&self.entitlements)
        } else {
            Err(sdk::DiscordResult_NotFetched)
        }
    }
}

unsafe extern "C" fn fetch_skus(_: *mut sdk::IDiscordStoreManager, data: *mut c_void, callback: sdk::DiscordResultCallback) {
    complete(
        "fetch_skus",
        Vec::new(),
        &[],
        |stub| {
            stub.skus_fetched = true;
            Ok(())
        },
        on_result(data, callback),
    );
}

unsafe extern "C" fn count_skus(_: *mut sdk::IDiscordStoreManager, out: *mut i32) {
    call("count_skus", Vec::new(), &[], |stub| {
        let len = stub.fetched_skus().map_or(0, |skus| skus.len());
        unsafe { put(out, count(len)) };
        Ok(())
    });
}

unsafe extern "C" fn get_sku(_: *mut sdk::IDiscordStoreManager, sku_id: i64, out: *mut sdk::DiscordSku) -> sdk::EDiscordResult {
    call("get_sku", args![sku_id], &[], |stub| {
        let sku = stub
            .fetched_skus()?
            .iter()
            .find(|sku| sku.id == sku_id)
            .ok_or(sdk::DiscordResult_NotFound)?;
        unsafe { put(out, *sku) };
        Ok(())
    })
}

unsafe extern "C" fn get_sku_at(_: *mut sdk::IDiscordStoreManager, index: i32, out: *mut sdk::DiscordSku) -> sdk::EDiscordResult {
    call("get_sku_at", args![index], &[], |stub| {
        let sku = at(stub.fetched_skus()?, index)?;
        unsafe { put(out, sku) };
        Ok(())
    })
}

unsafe extern "C" fn fetch_entitlements(
    _: *mut sdk::IDiscordStoreManager,
    data: *mut c_void,
    callback: sdk::DiscordResultCallback,
) {
    complete(
        "fetch_entitlements",
        Vec::new(),
        &[],
        |stub| {
            stub.entitlements_fetched = true;
            Ok(())
        },
        on_result(data, callback),
    );
}

unsafe extern "C" fn count_entitlements(_: *mut sdk::IDiscordStoreManager, out: *mut i32) {
    call("count_entitlements", Vec::new(), &[], |stub| {
        let len = stub.fetched_entitlements().map_or(0, |entitlements| entitlements.len());
        unsafe { put(out, count(len)) };
        Ok(())
    });
}

unsafe extern "C" fn get_entitlement(
    _: *mut sdk::IDiscordStoreManager,
    entitlement_id: i64,
    out: *mut sdk::DiscordEntitlement,
) -> sdk::EDiscordResult {
    call("get_entitlement", args![entitlement_id], &[], |stub| {
        let entitlement = stub
            .fetched_entitlements()?
            .iter()
            .find(|e| e.id == entitlement_id)
            .ok_or(sdk::DiscordResult_NotFound)?;
        unsafe { put(out, *entitlement) };
        Ok(())
    })
}

unsafe extern "C" fn get_entitlement_at(
    _: *mut sdk::IDiscordStoreManager,
    index: i32,
    out: *mut sdk::DiscordEntitlement,
) -> sdk::EDiscordResult {
    call("get_entitlement_at", args![index], &[], |stub| {
        let entitlement = at(stub.fetched_entitlements()?, index)?;
        unsafe { put(out, entitlement) };
        Ok(())
    })
}

unsafe extern "C" fn has_sku_entitlement(_: *mut sdk::IDiscordStoreManager, sku_id: i64, out: *mut bool) -> sdk::EDiscordResult {
    call("has_sku_entitlement", args![sku_id], &[], |stub| {
        let owned = stub.fetched_entitlements()?.iter().any(|e| e.sku_id == sku_id);
        unsafe { put(out, owned) };
        Ok(())
    })
}

unsafe extern "C" fn start_purchase(
    _: *mut sdk::IDiscordStoreManager,
    sku_id: i64,
    data: *mut c_void,
    callback: sdk::DiscordResultCallback,
) {
    complete("start_purchase", args![sku_id], &[], |_| Ok(()), on_result(data, callback));
}

// === Voice ===

pub(crate) static VOICE: sdk::IDiscordVoiceManager = sdk::IDiscordVoiceManager {
    get_input_mode: Some(get_input_mode),
    set_input_mode: Some(set_input_mode),
    is_self_mute: Some(is_self_mute),
    set_self_mute: Some(set_self_mute),
    is_self_deaf: Some(is_self_deaf),
    set_self_deaf: Some(set_self_deaf),
    is_local_mute: Some(is_local_mute),
    set_local_mute: Some(set_local_mute),
    get_local_volume: Some(get_local_volume),
    set_local_volume: Some(set_local_volume),
};

/// Volume of a user nobody has adjusted
const DEFAULT_VOLUME: u8 = 100;

unsafe extern "C" fn get_input_mode(_: *mut sdk::IDiscordVoiceManager, out: *mut sdk::DiscordInputMode) -> sdk::EDiscordResult {
    call("get_input_mode", Vec::new(), &[], |stub| {
        unsafe { put(out, stub.input_mode) };
        Ok(())
    })
}

unsafe extern "C" fn set_input_mode(
    _: *mut sdk::IDiscordVoiceManager,
    mode: sdk::DiscordInputMode,
    data: *mut c_void,
    callback: sdk::DiscordResultCallback,
) {
    complete(
        "set_input_mode",
        args![mode.type_, text(&mode.shortcut)],
        &[],
        |stub| {
            stub.input_mode = mode;
            Ok(())
        },
        on_result(data, callback),
    );
}

unsafe extern "C" fn is_self_mute(_: *mut sdk::IDiscordVoiceManager, out: *mut bool) -> sdk::EDiscordResult {
    call("is_self_mute", Vec::new(), &[], |stub| {
        unsafe { put(out, stub.self_mute) };
        Ok(())
    })
}

unsafe extern "C" fn set_self_mute(_: *mut sdk::IDiscordVoiceManager, mute: bool) -> sdk::EDiscordResult {
    call("set_self_mute", args![mute], &[], |stub| {
        stub.self_mute = mute;
        Ok(())
    })
}

unsafe extern "C" fn is_self_deaf(_: *mut sdk::IDiscordVoiceManager, out: *mut bool) -> sdk::EDiscordResult {
    call("is_self_deaf", Vec::new(), &[], |stub| {
        unsafe { put(out, stub.self_deaf) };
        Ok(())
    })
}

unsafe extern "C" fn set_self_deaf(_: *mut sdk::IDiscordVoiceManager, deaf: bool) -> sdk::EDiscordResult {
    call("set_self_deaf", args![deaf], &[], |stub| {
        stub.self_deaf = deaf;
        Ok(())
    })
}

unsafe extern "C" fn is_local_mute(_: *mut sdk::IDiscordVoiceManager, user_id: i64, out: *mut bool) -> sdk::EDiscordResult {
    call("is_local_mute", args![user_id], &[], |stub| {
        unsafe { put(out, stub.local_mutes.contains(&user_id)) };
        Ok(())
    })
}

unsafe extern "C" fn set_local_mute(_: *mut sdk::IDiscordVoiceManager, user_id: i64, mute: bool) -> sdk::EDiscordResult {
    call("set_local_mute", args![user_id, mute], &[], |stub| {
        if mute {
            stub.local_mutes.insert(user_id);
        } else {
            stub.local_mutes.remove(&user_id);
        }
        Ok(())
    })
}

unsafe extern "C" fn get_local_volume(_: *mut sdk::IDiscordVoiceManager, user_id: i64, out: *mut u8) -> sdk::EDiscordResult {
    call("get_local_volume", args![user_id], &[], |stub| {
        let volume = stub.local_volumes.get(&user_id).copied().unwrap_or(DEFAULT_VOLUME);
        unsafe { put(out, volume) };
        Ok(())
    })
}

unsafe extern "C" fn set_local_volume(_: *mut sdk::IDiscordVoiceManager, user_id: i64, volume: u8) -> sdk::EDiscordResult {
    call("set_local_volume", args![user_id, volume], &[], |stub| {
        stub.local_volumes.insert(user_id, volume);
        Ok(())
    })
}

// === Achievement ===

pub(crate) static ACHIEVEMENT: sdk::IDiscordAchievementManager = sdk::IDiscordAchievementManager {
    set_user_achievement: Some(set_user_achievement),
    fetch_user_achievements: Some(fetch_user_achievements),
    count_user_achievements: Some(count_user_achievements),
    get_user_achievement: Some(get_user_achievement),
    get_user_achievement_at: Some(get_user_achievement_at),
};

unsafe extern "C" fn set_user_achievement(
    _: *mut sdk::IDiscordAchievementManager,
    achievement_id: i64,
    percent_complete: u8,
    data: *mut c_void,
    callback: sdk::DiscordResultCallback,
) {
    complete(
        "set_user_achievement",
        args![achievement_id, percent_complete],
        &[],
        |stub| {
            let mut record = crate::user_achievement(stub.current_user.id, achievement_id, percent_complete);
            if percent_complete >= 100 {
                set_text(&mut record.unlocked_at, UNLOCKED_AT);
            }
            match stub
                .achievements
                .iter_mut()
                .find(|a| a.achievement_id == achievement_id)
            {
                Some(existing) => *existing = record,
                None => stub.achievements.push(record),
            }
            Ok(())
        },
        on_result(data, callback),
    );
}

unsafe extern "C" fn fetch_user_achievements(
    _: *mut sdk::IDiscordAchievementManager,
    data: *mut c_void,
    callback: sdk::DiscordResultCallback,
) {
    complete("fetch_user_achievements", Vec::new(), &[], |_| Ok(()), on_result(data, callback));
}

unsafe extern "C" fn count_user_achievements(_: *mut sdk::IDiscordAchievementManager, out: *mut i32) {
    call("count_user_achievements", Vec::new(), &[], |stub| {
        unsafe { put(out, count(stub.achievements.len())) };
        Ok(())
    });
}

unsafe extern "C" fn get_user_achievement(
    _: *mut sdk::IDiscordAchievementManager,
    achievement_id: i64,
    out: *mut sdk::DiscordUserAchievement,
) -> sdk::EDiscordResult {
    call("get_user_achievement", args![achievement_id], &[], |stub| {
        let found = stub
            .achievements
            .iter()
            .find(|a| a.achievement_id == achievement_id)
            .ok_or(sdk::DiscordResult_NotFound)?;
        unsafe { put(out, *found) };
        Ok(())
    })
}

unsafe extern "C" fn get_user_achievement_at(
    _: *mut sdk::IDiscordAchievementManager,
    index: i32,
    out: *mut sdk::DiscordUserAchievement,
) -> sdk::EDiscordResult {
    call("get_user_achievement_at", args![index], &[], |stub| {
        let achievement = at(&stub.achievements, index)?;
        unsafe { put(out, achievement) };
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_failure_skips_state_change() {
        crate::reset();
        with(|stub| stub.fail("set_self_mute", sdk::DiscordResult_InternalError));
        let code = unsafe { set_self_mute(std::ptr::null_mut(), true) };
        assert_eq!(code, sdk::DiscordResult_InternalError);
        with(|stub| {
            assert!(!stub.self_mute);
            assert_eq!(stub.count_calls("set_self_mute"), 1);
        });
    }

    #[test]
    fn test_storage_round_trip() {
        crate::reset();
        let name = c_string("slot.bin");
        let mut data = *b"abc";
        let code = unsafe { storage_write(std::ptr::null_mut(), name.as_ptr() as *const c_char, data.as_mut_ptr(), 3) };
        assert_eq!(code, OK);

        let mut buf = [0u8; 8];
        let mut read = 0;
        let code = unsafe {
            storage_read(
                std::ptr::null_mut(),
                name.as_ptr() as *const c_char,
                buf.as_mut_ptr(),
                8,
                &mut read,
            )
        };
        assert_eq!(code, OK);
        assert_eq!(read, 3);
        assert_eq!(&buf[..3], b"abc");
    }

    #[test]
    fn test_at_bounds() {
        let items = [1, 2, 3];
        assert_eq!(at(&items, 2i32), Ok(3));
        assert_eq!(at(&items, 3i32), Err(sdk::DiscordResult_NotFound));
        assert_eq!(at(&items, -1i32), Err(sdk::DiscordResult_NotFound));
    }

    #[test]
    fn test_store_requires_fetch() {
        crate::reset();
        with(|stub| {
            stub.skus.push(crate::sku(1, sdk::DiscordSkuType_DLC, "Extra", 99, "usd"));
            assert!(stub.fetched_skus().is_err());
            stub.skus_fetched = true;
            assert_eq!(stub.fetched_skus().map(|s| s.len()), Ok(1));
        });
    }
}
