//! Lobby manager, transactions and search queries
//!
//! Builder objects are individually allocated tables. Their address keys
//! the changes collected so far, and they are freed once consumed or when
//! the state is reset.

use std::collections::{BTreeMap, HashMap};
use std::ffi::{c_char, c_void};

use dgs_sdk as sdk;

use crate::managers::{at, bytes, c_str, call, complete, count, on_record, on_result, put, put_text};
use crate::{text, LobbyData, StubState};

#[derive(Default)]
struct LobbyChanges {
    kind: Option<sdk::EDiscordLobbyType>,
    owner_id: Option<i64>,
    capacity: Option<u32>,
    locked: Option<bool>,
    /// `None` deletes the key
    metadata: Vec<(String, Option<String>)>,
}

#[derive(Default)]
struct MemberChanges {
    metadata: Vec<(String, Option<String>)>,
}

/// Outstanding transactions and queries, keyed by table address
#[derive(Default)]
pub(crate) struct Builders {
    transactions: HashMap<usize, (Box<sdk::IDiscordLobbyTransaction>, LobbyChanges)>,
    member_transactions: HashMap<usize, (Box<sdk::IDiscordLobbyMemberTransaction>, MemberChanges)>,
    queries: HashMap<usize, Box<sdk::IDiscordLobbySearchQuery>>,
}

fn address<T>(table: *const T) -> usize {
    table as usize
}

fn apply_metadata(target: &mut BTreeMap<String, String>, changes: Vec<(String, Option<String>)>) {
    for (key, value) in changes {
        match value {
            Some(value) => {
                target.insert(key, value);
            }
            None => {
                target.remove(&key);
            }
        }
    }
}

/// Secret accepted by `connect_lobby_with_activity_secret`
fn activity_secret(lobby: &sdk::DiscordLobby) -> String {
    format!("{}:{}", lobby.id, text(&lobby.secret))
}

impl StubState {
    fn lobby_index(&self, lobby_id: i64) -> Result<usize, sdk::EDiscordResult> {
        self.lobbies
            .iter()
            .position(|l| l.id == lobby_id)
            .ok_or(sdk::DiscordResult_NotFound)
    }

    fn lobby_record(&self, lobby_id: i64) -> Result<sdk::DiscordLobby, sdk::EDiscordResult> {
        self.lobby_index(lobby_id).map(|i| self.lobbies[i])
    }

    /// Data of an existing lobby; seeded lobbies start out empty
    fn lobby_data_mut(&mut self, lobby_id: i64) -> Result<&mut LobbyData, sdk::EDiscordResult> {
        self.lobby_index(lobby_id)?;
        Ok(self.lobby_data.entry(lobby_id).or_default())
    }

    fn member_metadata(&mut self, lobby_id: i64, user_id: i64) -> Result<&BTreeMap<String, String>, sdk::EDiscordResult> {
        let data = self.lobby_data_mut(lobby_id)?;
        if !data.members.contains(&user_id) {
            return Err(sdk::DiscordResult_NotFound);
        }
        Ok(data.member_metadata.entry(user_id).or_default())
    }

    fn join(&mut self, lobby_id: i64) -> Result<sdk::DiscordLobby, sdk::EDiscordResult> {
        let lobby = self.lobby_record(lobby_id)?;
        let me = self.current_user.id;
        let data = self.lobby_data_mut(lobby_id)?;
        if !data.members.contains(&me) {
            data.members.push(me);
        }
        Ok(lobby)
    }

    fn transaction(&mut self, tx: *mut sdk::IDiscordLobbyTransaction) -> Result<&mut LobbyChanges, sdk::EDiscordResult> {
        self.builders
            .transactions
            .get_mut(&address(tx))
            .map(|(_, changes)| changes)
            .ok_or(sdk::DiscordResult_InvalidPayload)
    }

    fn member_transaction(
        &mut self,
        tx: *mut sdk::IDiscordLobbyMemberTransaction,
    ) -> Result<&mut MemberChanges, sdk::EDiscordResult> {
        self.builders
            .member_transactions
            .get_mut(&address(tx))
            .map(|(_, changes)| changes)
            .ok_or(sdk::DiscordResult_InvalidPayload)
    }

    fn take_transaction(&mut self, tx: *mut sdk::IDiscordLobbyTransaction) -> Result<LobbyChanges, sdk::EDiscordResult> {
        self.builders
            .transactions
            .remove(&address(tx))
            .map(|(_, changes)| changes)
            .ok_or(sdk::DiscordResult_InvalidPayload)
    }
}

// === Lobby transaction ===

static TRANSACTION: sdk::IDiscordLobbyTransaction = sdk::IDiscordLobbyTransaction {
    set_type: Some(tx_set_type),
    set_owner: Some(tx_set_owner),
    set_capacity: Some(tx_set_capacity),
    set_metadata: Some(tx_set_metadata),
    delete_metadata: Some(tx_delete_metadata),
    set_locked: Some(tx_set_locked),
};

fn new_transaction(stub: &mut StubState) -> *mut sdk::IDiscordLobbyTransaction {
    let mut table = Box::new(TRANSACTION);
    let ptr: *mut sdk::IDiscordLobbyTransaction = &mut *table;
    stub.builders
        .transactions
        .insert(address(ptr), (table, LobbyChanges::default()));
    ptr
}

unsafe extern "C" fn tx_set_type(tx: *mut sdk::IDiscordLobbyTransaction, kind: sdk::EDiscordLobbyType) -> sdk::EDiscordResult {
    call("set_type", args![kind], &[], |stub| {
        stub.transaction(tx)?.kind = Some(kind);
        Ok(())
    })
}

unsafe extern "C" fn tx_set_owner(tx: *mut sdk::IDiscordLobbyTransaction, owner_id: i64) -> sdk::EDiscordResult {
    call("set_owner", args![owner_id], &[], |stub| {
        stub.transaction(tx)?.owner_id = Some(owner_id);
        Ok(())
    })
}

unsafe extern "C" fn tx_set_capacity(tx: *mut sdk::IDiscordLobbyTransaction, capacity: u32) -> sdk::EDiscordResult {
    call("set_capacity", args![capacity], &[], |stub| {
        stub.transaction(tx)?.capacity = Some(capacity);
        Ok(())
    })
}

unsafe extern "C" fn tx_set_metadata(
    tx: *mut sdk::IDiscordLobbyTransaction,
    key: *mut c_char,
    value: *mut c_char,
) -> sdk::EDiscordResult {
    let (key, value) = unsafe { (c_str(key), c_str(value)) };
    call("set_metadata", args![key, value], &[], |stub| {
        stub.transaction(tx)?.metadata.push((key.clone(), Some(value.clone())));
        Ok(())
    })
}

unsafe extern "C" fn tx_delete_metadata(tx: *mut sdk::IDiscordLobbyTransaction, key: *mut c_char) -> sdk::EDiscordResult {
    let key = unsafe { c_str(key) };
    call("delete_metadata", args![key], &[], |stub| {
        stub.transaction(tx)?.metadata.push((key.clone(), None));
        Ok(())
    })
}

unsafe extern "C" fn tx_set_locked(tx: *mut sdk::IDiscordLobbyTransaction, locked: bool) -> sdk::EDiscordResult {
    call("set_locked", args![locked], &[], |stub| {
        stub.transaction(tx)?.locked = Some(locked);
        Ok(())
    })
}

// === Member transaction ===

static MEMBER_TRANSACTION: sdk::IDiscordLobbyMemberTransaction = sdk::IDiscordLobbyMemberTransaction {
    set_metadata: Some(member_set_metadata),
    delete_metadata: Some(member_delete_metadata),
};

unsafe extern "C" fn member_set_metadata(
    tx: *mut sdk::IDiscordLobbyMemberTransaction,
    key: *mut c_char,
    value: *mut c_char,
) -> sdk::EDiscordResult {
    let (key, value) = unsafe { (c_str(key), c_str(value)) };
    call("member_set_metadata", args![key, value], &[], |stub| {
        stub.member_transaction(tx)?.metadata.push((key.clone(), Some(value.clone())));
        Ok(())
    })
}

unsafe extern "C" fn member_delete_metadata(
    tx: *mut sdk::IDiscordLobbyMemberTransaction,
    key: *mut c_char,
) -> sdk::EDiscordResult {
    let key = unsafe { c_str(key) };
    call("member_delete_metadata", args![key], &[], |stub| {
        stub.member_transaction(tx)?.metadata.push((key.clone(), None));
        Ok(())
    })
}

// === Search query ===

static SEARCH_QUERY: sdk::IDiscordLobbySearchQuery = sdk::IDiscordLobbySearchQuery {
    filter: Some(query_filter),
    sort: Some(query_sort),
    limit: Some(query_limit),
    distance: Some(query_distance),
};

fn check_query(stub: &StubState, query: *mut sdk::IDiscordLobbySearchQuery) -> Result<(), sdk::EDiscordResult> {
    if stub.builders.queries.contains_key(&address(query)) {
        Ok(())
    } else {
        Err(sdk::DiscordResult_InvalidPayload)
    }
}

unsafe extern "C" fn query_filter(
    query: *mut sdk::IDiscordLobbySearchQuery,
    key: *mut c_char,
    comparison: sdk::EDiscordLobbySearchComparison,
    cast: sdk::EDiscordLobbySearchCast,
    value: *mut c_char,
) -> sdk::EDiscordResult {
    let (key, value) = unsafe { (c_str(key), c_str(value)) };
    call("filter", args![key, comparison, cast, value], &[], |stub| check_query(stub, query))
}

unsafe extern "C" fn query_sort(
    query: *mut sdk::IDiscordLobbySearchQuery,
    key: *mut c_char,
    cast: sdk::EDiscordLobbySearchCast,
    value: *mut c_char,
) -> sdk::EDiscordResult {
    let (key, value) = unsafe { (c_str(key), c_str(value)) };
    call("sort", args![key, cast, value], &[], |stub| check_query(stub, query))
}

unsafe extern "C" fn query_limit(query: *mut sdk::IDiscordLobbySearchQuery, limit: u32) -> sdk::EDiscordResult {
    call("limit", args![limit], &[], |stub| check_query(stub, query))
}

unsafe extern "C" fn query_distance(
    query: *mut sdk::IDiscordLobbySearchQuery,
    distance: sdk::EDiscordLobbySearchDistance,
) -> sdk::EDiscordResult {
    call("distance", args![distance], &[], |stub| check_query(stub, query))
}

// === Lobby manager ===

pub(crate) static LOBBY: sdk::IDiscordLobbyManager = sdk::IDiscordLobbyManager {
    get_lobby_create_transaction: Some(get_lobby_create_transaction),
    get_lobby_update_transaction: Some(get_lobby_update_transaction),
    get_member_update_transaction: Some(get_member_update_transaction),
    create_lobby: Some(create_lobby),
    update_lobby: Some(update_lobby),
    delete_lobby: Some(delete_lobby),
    connect_lobby: Some(connect_lobby),
    connect_lobby_with_activity_secret: Some(connect_lobby_with_activity_secret),
    disconnect_lobby: Some(disconnect_lobby),
    get_lobby: Some(get_lobby),
    get_lobby_activity_secret: Some(get_lobby_activity_secret),
    get_lobby_metadata_value: Some(get_lobby_metadata_value),
    get_lobby_metadata_key: Some(get_lobby_metadata_key),
    lobby_metadata_count: Some(lobby_metadata_count),
    member_count: Some(member_count),
    get_member_user_id: Some(get_member_user_id),
    get_member_user: Some(get_member_user),
    get_member_metadata_value: Some(get_member_metadata_value),
    get_member_metadata_key: Some(get_member_metadata_key),
    member_metadata_count: Some(member_metadata_count),
    update_member: Some(update_member),
    send_lobby_message: Some(send_lobby_message),
    get_search_query: Some(get_search_query),
    search: Some(search),
    lobby_count: Some(lobby_count),
    get_lobby_id: Some(get_lobby_id),
    connect_voice: Some(connect_voice),
    disconnect_voice: Some(disconnect_voice),
    connect_network: Some(connect_network),
    disconnect_network: Some(disconnect_network),
    flush_network: Some(flush_network),
    open_network_channel: Some(open_network_channel),
    send_network_message: Some(send_network_message),
};

type Manager = *mut sdk::IDiscordLobbyManager;

unsafe extern "C" fn get_lobby_create_transaction(
    _: Manager,
    out: *mut *mut sdk::IDiscordLobbyTransaction,
) -> sdk::EDiscordResult {
    call("get_lobby_create_transaction", Vec::new(), &[], |stub| {
        let tx = new_transaction(stub);
        unsafe { put(out, tx) };
        Ok(())
    })
}

unsafe extern "C" fn get_lobby_update_transaction(
    _: Manager,
    lobby_id: i64,
    out: *mut *mut sdk::IDiscordLobbyTransaction,
) -> sdk::EDiscordResult {
    call("get_lobby_update_transaction", args![lobby_id], &[], |stub| {
        let tx = new_transaction(stub);
        unsafe { put(out, tx) };
        Ok(())
    })
}

unsafe extern "C" fn get_member_update_transaction(
    _: Manager,
    lobby_id: i64,
    user_id: i64,
    out: *mut *mut sdk::IDiscordLobbyMemberTransaction,
) -> sdk::EDiscordResult {
    call("get_member_update_transaction", args![lobby_id, user_id], &[], |stub| {
        let mut table = Box::new(MEMBER_TRANSACTION);
        let tx: *mut sdk::IDiscordLobbyMemberTransaction = &mut *table;
        stub.builders
            .member_transactions
            .insert(address(tx), (table, MemberChanges::default()));
        unsafe { put(out, tx) };
        Ok(())
    })
}

unsafe extern "C" fn create_lobby(
    _: Manager,
    tx: *mut sdk::IDiscordLobbyTransaction,
    data: *mut c_void,
    callback: sdk::DiscordLobbyCallback,
) {
    complete(
        "create_lobby",
        Vec::new(),
        &[],
        |stub| {
            let changes = stub.take_transaction(tx)?;
            let id = stub.next_lobby_id;
            stub.next_lobby_id += 1;

            let owner_id = changes.owner_id.unwrap_or(stub.current_user.id);
            let mut lobby = crate::lobby(
                id,
                changes.kind.unwrap_or(sdk::DiscordLobbyType_Private),
                owner_id,
                changes.capacity.unwrap_or(0),
            );
            lobby.locked = changes.locked.unwrap_or(false);

            let mut data = LobbyData {
                members: vec![stub.current_user.id],
                ..Default::default()
            };
            apply_metadata(&mut data.metadata, changes.metadata);
            stub.lobbies.push(lobby);
            stub.lobby_data.insert(id, data);
            Ok(lobby)
        },
        on_record(data, callback),
    );
}

unsafe extern "C" fn update_lobby(
    _: Manager,
    lobby_id: i64,
    tx: *mut sdk::IDiscordLobbyTransaction,
    data: *mut c_void,
    callback: sdk::DiscordResultCallback,
) {
    complete(
        "update_lobby",
        args![lobby_id],
        &[],
        |stub| {
            let changes = stub.take_transaction(tx)?;
            let index = stub.lobby_index(lobby_id)?;
            let lobby = &mut stub.lobbies[index];
            if let Some(kind) = changes.kind {
                lobby.type_ = kind;
            }
            if let Some(owner_id) = changes.owner_id {
                lobby.owner_id = owner_id;
            }
            if let Some(capacity) = changes.capacity {
                lobby.capacity = capacity;
            }
            if let Some(locked) = changes.locked {
                lobby.locked = locked;
            }
            apply_metadata(&mut stub.lobby_data_mut(lobby_id)?.metadata, changes.metadata);
            Ok(())
        },
        on_result(data, callback),
    );
}

unsafe extern "C" fn delete_lobby(_: Manager, lobby_id: i64, data: *mut c_void, callback: sdk::DiscordResultCallback) {
    complete(
        "delete_lobby",
        args![lobby_id],
        &[],
        |stub| {
            let index = stub.lobby_index(lobby_id)?;
            stub.lobbies.remove(index);
            stub.lobby_data.remove(&lobby_id);
            Ok(())
        },
        on_result(data, callback),
    );
}

unsafe extern "C" fn connect_lobby(
    _: Manager,
    lobby_id: i64,
    secret: *mut c_char,
    data: *mut c_void,
    callback: sdk::DiscordLobbyCallback,
) {
    let secret = unsafe { c_str(secret) };
    complete(
        "connect_lobby",
        args![lobby_id, secret],
        &[],
        |stub| {
            let lobby = stub.lobby_record(lobby_id)?;
            if text(&lobby.secret) != secret {
                return Err(sdk::DiscordResult_InvalidLobbySecret);
            }
            stub.join(lobby_id)
        },
        on_record(data, callback),
    );
}

unsafe extern "C" fn connect_lobby_with_activity_secret(
    _: Manager,
    secret: *mut c_char,
    data: *mut c_void,
    callback: sdk::DiscordLobbyCallback,
) {
    let secret = unsafe { c_str(secret) };
    complete(
        "connect_lobby_with_activity_secret",
        args![secret],
        &[],
        |stub| {
            let lobby_id = stub
                .lobbies
                .iter()
                .find(|l| activity_secret(l) == secret)
                .map(|l| l.id)
                .ok_or(sdk::DiscordResult_InvalidLobbySecret)?;
            stub.join(lobby_id)
        },
        on_record(data, callback),
    );
}

unsafe extern "C" fn disconnect_lobby(_: Manager, lobby_id: i64, data: *mut c_void, callback: sdk::DiscordResultCallback) {
    complete(
        "disconnect_lobby",
        args![lobby_id],
        &[],
        |stub| {
            let me = stub.current_user.id;
            stub.lobby_data_mut(lobby_id)?.members.retain(|&member| member != me);
            Ok(())
        },
        on_result(data, callback),
    );
}

unsafe extern "C" fn get_lobby(_: Manager, lobby_id: i64, out: *mut sdk::DiscordLobby) -> sdk::EDiscordResult {
    call("get_lobby", args![lobby_id], &[], |stub| {
        let lobby = stub.lobby_record(lobby_id)?;
        unsafe { put(out, lobby) };
        Ok(())
    })
}

unsafe extern "C" fn get_lobby_activity_secret(
    _: Manager,
    lobby_id: i64,
    out: *mut sdk::DiscordLobbySecret,
) -> sdk::EDiscordResult {
    call("get_lobby_activity_secret", args![lobby_id], &[], |stub| {
        let lobby = stub.lobby_record(lobby_id)?;
        unsafe { put_text(out, &activity_secret(&lobby)) };
        Ok(())
    })
}

unsafe extern "C" fn get_lobby_metadata_value(
    _: Manager,
    lobby_id: i64,
    key: *mut c_char,
    out: *mut sdk::DiscordMetadataValue,
) -> sdk::EDiscordResult {
    let key = unsafe { c_str(key) };
    call("get_lobby_metadata_value", args![lobby_id, key], &[], |stub| {
        let metadata = &stub.lobby_data_mut(lobby_id)?.metadata;
        let value = metadata.get(&key).ok_or(sdk::DiscordResult_NotFound)?;
        unsafe { put_text(out, value) };
        Ok(())
    })
}

unsafe extern "C" fn get_lobby_metadata_key(
    _: Manager,
    lobby_id: i64,
    index: i32,
    out: *mut sdk::DiscordMetadataKey,
) -> sdk::EDiscordResult {
    call("get_lobby_metadata_key", args![lobby_id, index], &[], |stub| {
        let metadata = &stub.lobby_data_mut(lobby_id)?.metadata;
        let key = usize::try_from(index)
            .ok()
            .and_then(|i| metadata.keys().nth(i))
            .ok_or(sdk::DiscordResult_NotFound)?;
        unsafe { put_text(out, key) };
        Ok(())
    })
}

unsafe extern "C" fn lobby_metadata_count(_: Manager, lobby_id: i64, out: *mut i32) -> sdk::EDiscordResult {
    call("lobby_metadata_count", args![lobby_id], &[], |stub| {
        let len = stub.lobby_data_mut(lobby_id)?.metadata.len();
        unsafe { put(out, count(len)) };
        Ok(())
    })
}

unsafe extern "C" fn member_count(_: Manager, lobby_id: i64, out: *mut i32) -> sdk::EDiscordResult {
    call("member_count", args![lobby_id], &[], |stub| {
        let len = stub.lobby_data_mut(lobby_id)?.members.len();
        unsafe { put(out, count(len)) };
        Ok(())
    })
}

unsafe extern "C" fn get_member_user_id(_: Manager, lobby_id: i64, index: i32, out: *mut i64) -> sdk::EDiscordResult {
    call("get_member_user_id", args![lobby_id, index], &[], |stub| {
        let user_id = at(&stub.lobby_data_mut(lobby_id)?.members, index)?;
        unsafe { put(out, user_id) };
        Ok(())
    })
}

unsafe extern "C" fn get_member_user(
    _: Manager,
    lobby_id: i64,
    user_id: i64,
    out: *mut sdk::DiscordUser,
) -> sdk::EDiscordResult {
    call("get_member_user", args![lobby_id, user_id], &[], |stub| {
        if !stub.lobby_data_mut(lobby_id)?.members.contains(&user_id) {
            return Err(sdk::DiscordResult_NotFound);
        }
        let user = stub
            .find_user(user_id)
            .unwrap_or_else(|| crate::user(user_id, "", "", false));
        unsafe { put(out, user) };
        Ok(())
    })
}

unsafe extern "C" fn get_member_metadata_value(
    _: Manager,
    lobby_id: i64,
    user_id: i64,
    key: *mut c_char,
    out: *mut sdk::DiscordMetadataValue,
) -> sdk::EDiscordResult {
    let key = unsafe { c_str(key) };
    call("get_member_metadata_value", args![lobby_id, user_id, key], &[], |stub| {
        let value = stub
            .member_metadata(lobby_id, user_id)?
            .get(&key)
            .ok_or(sdk::DiscordResult_NotFound)?;
        unsafe { put_text(out, value) };
        Ok(())
    })
}

unsafe extern "C" fn get_member_metadata_key(
    _: Manager,
    lobby_id: i64,
    user_id: i64,
    index: i32,
    out: *mut sdk::DiscordMetadataKey,
) -> sdk::EDiscordResult {
    call("get_member_metadata_key", args![lobby_id, user_id, index], &[], |stub| {
        let metadata = stub.member_metadata(lobby_id, user_id)?;
        let key = usize::try_from(index)
            .ok()
            .and_then(|i| metadata.keys().nth(i))
            .ok_or(sdk::DiscordResult_NotFound)?;
        unsafe { put_text(out, key) };
        Ok(())
    })
}

unsafe extern "C" fn member_metadata_count(_: Manager, lobby_id: i64, user_id: i64, out: *mut i32) -> sdk::EDiscordResult {
    call("member_metadata_count", args![lobby_id, user_id], &[], |stub| {
        let len = stub.member_metadata(lobby_id, user_id)?.len();
        unsafe { put(out, count(len)) };
        Ok(())
    })
}

unsafe extern "C" fn update_member(
    _: Manager,
    lobby_id: i64,
    user_id: i64,
    tx: *mut sdk::IDiscordLobbyMemberTransaction,
    data: *mut c_void,
    callback: sdk::DiscordResultCallback,
) {
    complete(
        "update_member",
        args![lobby_id, user_id],
        &[],
        |stub| {
            let (_, changes) = stub
                .builders
                .member_transactions
                .remove(&address(tx))
                .ok_or(sdk::DiscordResult_InvalidPayload)?;
            let lobby = stub.lobby_data_mut(lobby_id)?;
            if !lobby.members.contains(&user_id) {
                return Err(sdk::DiscordResult_NotFound);
            }
            apply_metadata(lobby.member_metadata.entry(user_id).or_default(), changes.metadata);
            Ok(())
        },
        on_result(data, callback),
    );
}

unsafe extern "C" fn send_lobby_message(
    _: Manager,
    lobby_id: i64,
    data: *mut u8,
    len: u32,
    callback_data: *mut c_void,
    callback: sdk::DiscordResultCallback,
) {
    let data = unsafe { bytes(data, len) };
    complete(
        "send_lobby_message",
        args![lobby_id],
        &data,
        |stub| stub.lobby_index(lobby_id).map(|_| ()),
        on_result(callback_data, callback),
    );
}

unsafe extern "C" fn get_search_query(_: Manager, out: *mut *mut sdk::IDiscordLobbySearchQuery) -> sdk::EDiscordResult {
    call("get_search_query", Vec::new(), &[], |stub| {
        let mut table = Box::new(SEARCH_QUERY);
        let query: *mut sdk::IDiscordLobbySearchQuery = &mut *table;
        stub.builders.queries.insert(address(query), table);
        unsafe { put(out, query) };
        Ok(())
    })
}

unsafe extern "C" fn search(
    _: Manager,
    query: *mut sdk::IDiscordLobbySearchQuery,
    data: *mut c_void,
    callback: sdk::DiscordResultCallback,
) {
    complete(
        "search",
        Vec::new(),
        &[],
        |stub| {
            stub.builders
                .queries
                .remove(&address(query))
                .ok_or(sdk::DiscordResult_InvalidPayload)?;
            // Every known lobby matches
            stub.search_results = stub.lobbies.iter().map(|l| l.id).collect();
            Ok(())
        },
        on_result(data, callback),
    );
}

unsafe extern "C" fn lobby_count(_: Manager, out: *mut i32) {
    call("lobby_count", Vec::new(), &[], |stub| {
        unsafe { put(out, count(stub.search_results.len())) };
        Ok(())
    });
}

unsafe extern "C" fn get_lobby_id(_: Manager, index: i32, out: *mut i64) -> sdk::EDiscordResult {
    call("get_lobby_id", args![index], &[], |stub| {
        let lobby_id = at(&stub.search_results, index)?;
        unsafe { put(out, lobby_id) };
        Ok(())
    })
}

unsafe extern "C" fn connect_voice(_: Manager, lobby_id: i64, data: *mut c_void, callback: sdk::DiscordResultCallback) {
    complete(
        "connect_voice",
        args![lobby_id],
        &[],
        |stub| stub.lobby_index(lobby_id).map(|_| ()),
        on_result(data, callback),
    );
}

unsafe extern "C" fn disconnect_voice(_: Manager, lobby_id: i64, data: *mut c_void, callback: sdk::DiscordResultCallback) {
    complete(
        "disconnect_voice",
        args![lobby_id],
        &[],
        |stub| stub.lobby_index(lobby_id).map(|_| ()),
        on_result(data, callback),
    );
}

unsafe extern "C" fn connect_network(_: Manager, lobby_id: i64) -> sdk::EDiscordResult {
    call("connect_network", args![lobby_id], &[], |stub| stub.lobby_index(lobby_id).map(|_| ()))
}

unsafe extern "C" fn disconnect_network(_: Manager, lobby_id: i64) -> sdk::EDiscordResult {
    call("disconnect_network", args![lobby_id], &[], |stub| stub.lobby_index(lobby_id).map(|_| ()))
}

unsafe extern "C" fn flush_network(_: Manager) -> sdk::EDiscordResult {
    call("flush_network", Vec::new(), &[], |_| Ok(()))
}

unsafe extern "C" fn open_network_channel(_: Manager, lobby_id: i64, channel_id: u8, reliable: bool) -> sdk::EDiscordResult {
    call("open_network_channel", args![lobby_id, channel_id, reliable], &[], |stub| {
        stub.lobby_index(lobby_id).map(|_| ())
    })
}

unsafe extern "C" fn send_network_message(
    _: Manager,
    lobby_id: i64,
    user_id: i64,
    channel_id: u8,
    data: *mut u8,
    len: u32,
) -> sdk::EDiscordResult {
    let data = unsafe { bytes(data, len) };
    call("send_network_message", args![lobby_id, user_id, channel_id], &data, |stub| {
        stub.lobby_index(lobby_id).map(|_| ())
    })
}

#[cfg(test)]
mod tests {
    use std::ptr;

    use super::*;
    use crate::managers::c_string;
    use crate::with;

    #[test]
    fn test_metadata_changes_apply_in_order() {
        let mut metadata = BTreeMap::new();
        apply_metadata(
            &mut metadata,
            vec![
                ("a".to_string(), Some("1".to_string())),
                ("b".to_string(), Some("2".to_string())),
                ("a".to_string(), None),
            ],
        );
        assert_eq!(metadata.into_iter().collect::<Vec<_>>(), vec![("b".to_string(), "2".to_string())]);
    }

    #[test]
    fn test_transactions_are_distinct() {
        crate::reset();
        let (a, b) = with(|stub| (new_transaction(stub), new_transaction(stub)));
        assert_ne!(a, b);

        unsafe { tx_set_capacity(a, 3) };
        with(|stub| {
            assert_eq!(stub.transaction(a).unwrap().capacity, Some(3));
            assert_eq!(stub.transaction(b).unwrap().capacity, None);
        });
    }

    #[test]
    fn test_unknown_transaction_is_rejected() {
        crate::reset();
        let mut table = TRANSACTION;
        assert_eq!(unsafe { tx_set_locked(&mut table, true) }, sdk::DiscordResult_InvalidPayload);
    }

    #[test]
    fn test_activity_secret_format() {
        let lobby = crate::lobby(5, sdk::DiscordLobbyType_Public, 1, 2);
        assert_eq!(activity_secret(&lobby), "5:secret-5");

        crate::reset();
        with(|stub| stub.lobbies.push(lobby));
        let mut out = [0 as c_char; 128];
        let code = unsafe { get_lobby_activity_secret(ptr::null_mut(), 5, &mut out) };
        assert_eq!(code, sdk::DiscordResult_Ok);
        assert_eq!(text(&out), "5:secret-5");
    }

    #[test]
    fn test_seeded_lobby_has_empty_metadata() {
        crate::reset();
        with(|stub| stub.lobbies.push(crate::lobby(9, sdk::DiscordLobbyType_Private, 1, 4)));

        let mut key = c_string("map");
        let mut out = [0 as c_char; 4096];
        let code = unsafe {
            get_lobby_metadata_value(ptr::null_mut(), 9, key.as_mut_ptr() as *mut c_char, &mut out)
        };
        assert_eq!(code, sdk::DiscordResult_NotFound);

        let mut len = -1;
        unsafe { lobby_metadata_count(ptr::null_mut(), 9, &mut len) };
        assert_eq!(len, 0);
    }
}
