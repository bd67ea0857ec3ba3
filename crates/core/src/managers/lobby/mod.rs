//! Lobbies: creation, membership, metadata, messaging, voice and networking
//!
//! Lists (lobbies from a search, metadata, members) are read with a count
//! call followed by indexed lookups. They are a stable snapshot only until
//! the next lobby event or mutation, so the `*_ids` / `*_metadata` helpers
//! read the whole list in one go.

mod search;
mod transaction;

pub use search::LobbySearchQuery;
pub use transaction::{LobbyMemberTransaction, LobbyTransaction};

use std::ptr::{self, NonNull};

use dgs_sdk as sdk;

use self::transaction::metadata_key;
use super::manager;
use crate::completion;
use crate::error::{check, Error, Result};
use crate::events::ListenerKey;
use crate::ffi::{buffer_len, c_string, count_to_len, ffi_call, index_i32};
use crate::model::{text, Lobby, Model, User};

manager! {
    /// Lobby manager
    LobbyManager => sdk::IDiscordLobbyManager
}

fn handle<T>(ptr: *mut T, what: &'static str) -> Result<NonNull<T>> {
    NonNull::new(ptr).ok_or(Error::NullPointer(what))
}

impl<'a> LobbyManager<'a> {
    // === Transactions ===

    /// Start describing a new lobby; pass it to [`create_lobby`](Self::create_lobby)
    pub fn lobby_create_transaction(&self) -> Result<LobbyTransaction<'a>> {
        let mut raw = ptr::null_mut();
        check(ffi_call!(self.handle, get_lobby_create_transaction(&mut raw))?)?;
        Ok(LobbyTransaction::new(handle(raw, "lobby transaction")?))
    }

    pub fn lobby_update_transaction(&self, lobby_id: i64) -> Result<LobbyTransaction<'a>> {
        let mut raw = ptr::null_mut();
        check(ffi_call!(self.handle, get_lobby_update_transaction(lobby_id, &mut raw))?)?;
        Ok(LobbyTransaction::new(handle(raw, "lobby transaction")?))
    }

    pub fn member_update_transaction(&self, lobby_id: i64, user_id: i64) -> Result<LobbyMemberTransaction<'a>> {
        let mut raw = ptr::null_mut();
        check(ffi_call!(
            self.handle,
            get_member_update_transaction(lobby_id, user_id, &mut raw)
        )?)?;
        Ok(LobbyMemberTransaction::new(handle(raw, "member transaction")?))
    }

    // === Lifecycle ===

    /// Create a lobby owned by the current user and connect to it
    pub fn create_lobby(
        &self,
        transaction: LobbyTransaction<'_>,
        completion: impl FnOnce(Result<Lobby>) + 'static,
    ) -> Result<()> {
        let transaction = transaction.into_raw();
        self.discord.pending().issue("create_lobby", completion, |data| {
            ffi_call!(self.handle, create_lobby(transaction, data, Some(completion::on_lobby)))
        })
    }

    pub fn update_lobby(
        &self,
        lobby_id: i64,
        transaction: LobbyTransaction<'_>,
        completion: impl FnOnce(Result<()>) + 'static,
    ) -> Result<()> {
        let transaction = transaction.into_raw();
        self.discord.pending().issue("update_lobby", completion, |data| {
            ffi_call!(
                self.handle,
                update_lobby(lobby_id, transaction, data, Some(completion::on_result))
            )
        })
    }

    pub fn delete_lobby(&self, lobby_id: i64, completion: impl FnOnce(Result<()>) + 'static) -> Result<()> {
        self.discord.pending().issue("delete_lobby", completion, |data| {
            ffi_call!(self.handle, delete_lobby(lobby_id, data, Some(completion::on_result)))
        })
    }

    pub fn connect_lobby(
        &self,
        lobby_id: i64,
        secret: &str,
        completion: impl FnOnce(Result<Lobby>) + 'static,
    ) -> Result<()> {
        let mut secret: sdk::DiscordLobbySecret = text::to_buffer(secret, "lobby secret")?;
        self.discord.pending().issue("connect_lobby", completion, |data| {
            ffi_call!(
                self.handle,
                connect_lobby(lobby_id, secret.as_mut_ptr(), data, Some(completion::on_lobby))
            )
        })
    }

    /// Connect using the combined secret from [`lobby_activity_secret`](Self::lobby_activity_secret)
    pub fn connect_lobby_with_activity_secret(
        &self,
        activity_secret: &str,
        completion: impl FnOnce(Result<Lobby>) + 'static,
    ) -> Result<()> {
        let mut secret: sdk::DiscordLobbySecret = text::to_buffer(activity_secret, "activity secret")?;
        self.discord.pending().issue("connect_lobby_with_activity_secret", completion, |data| {
            ffi_call!(
                self.handle,
                connect_lobby_with_activity_secret(secret.as_mut_ptr(), data, Some(completion::on_lobby))
            )
        })
    }

    pub fn disconnect_lobby(&self, lobby_id: i64, completion: impl FnOnce(Result<()>) + 'static) -> Result<()> {
        self.discord.pending().issue("disconnect_lobby", completion, |data| {
            ffi_call!(self.handle, disconnect_lobby(lobby_id, data, Some(completion::on_result)))
        })
    }

    // === Lookup ===

    pub fn lobby(&self, lobby_id: i64) -> Result<Lobby> {
        let mut lobby = Lobby::default();
        check(ffi_call!(self.handle, get_lobby(lobby_id, lobby.as_raw_mut()))?)?;
        Ok(lobby)
    }

    /// Secret combining lobby id and password, suitable for an activity join secret
    pub fn lobby_activity_secret(&self, lobby_id: i64) -> Result<String> {
        let mut secret: sdk::DiscordLobbySecret = [0; 128];
        check(ffi_call!(self.handle, get_lobby_activity_secret(lobby_id, &mut secret))?)?;
        Ok(text::decode(&secret))
    }

    pub fn lobby_metadata_value(&self, lobby_id: i64, key: &str) -> Result<String> {
        let mut key = metadata_key(key)?;
        let mut value: Box<sdk::DiscordMetadataValue> = Box::new([0; 4096]);
        check(ffi_call!(
            self.handle,
            get_lobby_metadata_value(lobby_id, key.as_mut_ptr(), &mut *value)
        )?)?;
        Ok(text::decode(&*value))
    }

    pub fn lobby_metadata_key(&self, lobby_id: i64, index: usize) -> Result<String> {
        let index = index_i32(index)?;
        let mut key: sdk::DiscordMetadataKey = [0; 256];
        check(ffi_call!(self.handle, get_lobby_metadata_key(lobby_id, index, &mut key))?)?;
        Ok(text::decode(&key))
    }

    pub fn lobby_metadata_count(&self, lobby_id: i64) -> Result<usize> {
        let mut count = 0;
        check(ffi_call!(self.handle, lobby_metadata_count(lobby_id, &mut count))?)?;
        Ok(count_to_len(count))
    }

    /// Every metadata entry of a lobby, in the library's order
    pub fn lobby_metadata(&self, lobby_id: i64) -> Result<Vec<(String, String)>> {
        (0..self.lobby_metadata_count(lobby_id)?)
            .map(|i| {
                let key = self.lobby_metadata_key(lobby_id, i)?;
                let value = self.lobby_metadata_value(lobby_id, &key)?;
                Ok((key, value))
            })
            .collect()
    }

    // === Members ===

    pub fn member_count(&self, lobby_id: i64) -> Result<usize> {
        let mut count = 0;
        check(ffi_call!(self.handle, member_count(lobby_id, &mut count))?)?;
        Ok(count_to_len(count))
    }

    pub fn member_user_id(&self, lobby_id: i64, index: usize) -> Result<i64> {
        let index = index_i32(index)?;
        let mut user_id = 0;
        check(ffi_call!(self.handle, get_member_user_id(lobby_id, index, &mut user_id))?)?;
        Ok(user_id)
    }

    /// User ids of every member
    pub fn member_ids(&self, lobby_id: i64) -> Result<Vec<i64>> {
        (0..self.member_count(lobby_id)?)
            .map(|i| self.member_user_id(lobby_id, i))
            .collect()
    }

    pub fn member_user(&self, lobby_id: i64, user_id: i64) -> Result<User> {
        let mut user = User::default();
        check(ffi_call!(
            self.handle,
            get_member_user(lobby_id, user_id, user.as_raw_mut())
        )?)?;
        Ok(user)
    }

    pub fn member_metadata_value(&self, lobby_id: i64, user_id: i64, key: &str) -> Result<String> {
        let mut key = metadata_key(key)?;
        let mut value: Box<sdk::DiscordMetadataValue> = Box::new([0; 4096]);
        check(ffi_call!(
            self.handle,
            get_member_metadata_value(lobby_id, user_id, key.as_mut_ptr(), &mut *value)
        )?)?;
        Ok(text::decode(&*value))
    }

    pub fn member_metadata_key(&self, lobby_id: i64, user_id: i64, index: usize) -> Result<String> {
        let index = index_i32(index)?;
        let mut key: sdk::DiscordMetadataKey = [0; 256];
        check(ffi_call!(
            self.handle,
            get_member_metadata_key(lobby_id, user_id, index, &mut key)
        )?)?;
        Ok(text::decode(&key))
    }

    pub fn member_metadata_count(&self, lobby_id: i64, user_id: i64) -> Result<usize> {
        let mut count = 0;
        check(ffi_call!(
            self.handle,
            member_metadata_count(lobby_id, user_id, &mut count)
        )?)?;
        Ok(count_to_len(count))
    }

    /// Every metadata entry of one member
    pub fn member_metadata(&self, lobby_id: i64, user_id: i64) -> Result<Vec<(String, String)>> {
        (0..self.member_metadata_count(lobby_id, user_id)?)
            .map(|i| {
                let key = self.member_metadata_key(lobby_id, user_id, i)?;
                let value = self.member_metadata_value(lobby_id, user_id, &key)?;
                Ok((key, value))
            })
            .collect()
    }

    pub fn update_member(
        &self,
        lobby_id: i64,
        user_id: i64,
        transaction: LobbyMemberTransaction<'_>,
        completion: impl FnOnce(Result<()>) + 'static,
    ) -> Result<()> {
        let transaction = transaction.into_raw();
        self.discord.pending().issue("update_member", completion, |data| {
            ffi_call!(
                self.handle,
                update_member(lobby_id, user_id, transaction, data, Some(completion::on_result))
            )
        })
    }

    /// Send `data` to every member; the buffer is copied before returning
    pub fn send_lobby_message(
        &self,
        lobby_id: i64,
        data: &[u8],
        completion: impl FnOnce(Result<()>) + 'static,
    ) -> Result<()> {
        let data_length = buffer_len(data)?;
        self.discord.pending().issue("send_lobby_message", completion, |callback_data| {
            ffi_call!(
                self.handle,
                send_lobby_message(
                    lobby_id,
                    data.as_ptr() as *mut u8,
                    data_length,
                    callback_data,
                    Some(completion::on_result)
                )
            )
        })
    }

    // === Search ===

    pub fn search_query(&self) -> Result<LobbySearchQuery<'a>> {
        let mut raw = ptr::null_mut();
        check(ffi_call!(self.handle, get_search_query(&mut raw))?)?;
        Ok(LobbySearchQuery::new(handle(raw, "search query")?))
    }

    /// Run a search; on success the results are readable through
    /// [`lobby_count`](Self::lobby_count) and [`lobby_id`](Self::lobby_id)
    pub fn search(&self, query: LobbySearchQuery<'_>, completion: impl FnOnce(Result<()>) + 'static) -> Result<()> {
        let query = query.into_raw();
        self.discord.pending().issue("search", completion, |data| {
            ffi_call!(self.handle, search(query, data, Some(completion::on_result)))
        })
    }

    pub fn lobby_count(&self) -> Result<usize> {
        let mut count = 0;
        ffi_call!(self.handle, lobby_count(&mut count))?;
        Ok(count_to_len(count))
    }

    pub fn lobby_id(&self, index: usize) -> Result<i64> {
        let index = index_i32(index)?;
        let mut lobby_id = 0;
        check(ffi_call!(self.handle, get_lobby_id(index, &mut lobby_id))?)?;
        Ok(lobby_id)
    }

    /// Ids of the lobbies found by the last search
    pub fn lobby_ids(&self) -> Result<Vec<i64>> {
        (0..self.lobby_count()?).map(|i| self.lobby_id(i)).collect()
    }

    // === Voice ===

    pub fn connect_voice(&self, lobby_id: i64, completion: impl FnOnce(Result<()>) + 'static) -> Result<()> {
        self.discord.pending().issue("connect_voice", completion, |data| {
            ffi_call!(self.handle, connect_voice(lobby_id, data, Some(completion::on_result)))
        })
    }

    pub fn disconnect_voice(&self, lobby_id: i64, completion: impl FnOnce(Result<()>) + 'static) -> Result<()> {
        self.discord.pending().issue("disconnect_voice", completion, |data| {
            ffi_call!(self.handle, disconnect_voice(lobby_id, data, Some(completion::on_result)))
        })
    }

    // === Networking ===

    pub fn connect_network(&self, lobby_id: i64) -> Result<()> {
        check(ffi_call!(self.handle, connect_network(lobby_id))?)
    }

    pub fn disconnect_network(&self, lobby_id: i64) -> Result<()> {
        check(ffi_call!(self.handle, disconnect_network(lobby_id))?)
    }

    pub fn flush_network(&self) -> Result<()> {
        check(ffi_call!(self.handle, flush_network())?)
    }

    pub fn open_network_channel(&self, lobby_id: i64, channel_id: u8, reliable: bool) -> Result<()> {
        check(ffi_call!(
            self.handle,
            open_network_channel(lobby_id, channel_id, reliable)
        )?)
    }

    pub fn send_network_message(&self, lobby_id: i64, user_id: i64, channel_id: u8, data: &[u8]) -> Result<()> {
        let data_length = buffer_len(data)?;
        check(ffi_call!(
            self.handle,
            send_network_message(lobby_id, user_id, channel_id, data.as_ptr() as *mut u8, data_length)
        )?)
    }

    // === Events ===

    pub fn on_lobby_update(&self, callback: impl FnMut(i64) + 'static) -> ListenerKey {
        self.discord.events().on_lobby_update(callback)
    }

    /// Called with the lobby id and the reason code
    pub fn on_lobby_delete(&self, callback: impl FnMut(i64, u32) + 'static) -> ListenerKey {
        self.discord.events().on_lobby_delete(callback)
    }

    /// Member callbacks receive lobby id and user id
    pub fn on_member_connect(&self, callback: impl FnMut(i64, i64) + 'static) -> ListenerKey {
        self.discord.events().on_member_connect(callback)
    }

    pub fn on_member_update(&self, callback: impl FnMut(i64, i64) + 'static) -> ListenerKey {
        self.discord.events().on_member_update(callback)
    }

    pub fn on_member_disconnect(&self, callback: impl FnMut(i64, i64) + 'static) -> ListenerKey {
        self.discord.events().on_member_disconnect(callback)
    }

    pub fn on_lobby_message(&self, callback: impl FnMut(i64, i64, &[u8]) + 'static) -> ListenerKey {
        self.discord.events().on_lobby_message(callback)
    }

    pub fn on_speaking(&self, callback: impl FnMut(i64, i64, bool) + 'static) -> ListenerKey {
        self.discord.events().on_speaking(callback)
    }

    /// Called with lobby id, sender, channel id and payload
    pub fn on_network_message(&self, callback: impl FnMut(i64, i64, u8, &[u8]) + 'static) -> ListenerKey {
        self.discord.events().on_lobby_network_message(callback)
    }
}
