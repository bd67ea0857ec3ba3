//! Lobby and member transactions
//!
//! A transaction collects changes and is consumed by the create or update
//! call it is passed to; the library owns it from then on.

use std::marker::PhantomData;
use std::ptr::NonNull;

use dgs_sdk as sdk;

use crate::discord::Discord;
use crate::error::{check, Result};
use crate::ffi::ffi_call;
use crate::model::text;
use crate::types::{FfiEnum, LobbyType};

/// Encode a metadata key and value into the native fixed buffers
pub(super) fn metadata_key(key: &str) -> Result<sdk::DiscordMetadataKey> {
    Ok(text::to_buffer(key, "metadata key")?)
}

pub(super) fn metadata_value(value: &str) -> Result<sdk::DiscordMetadataValue> {
    Ok(text::to_buffer(value, "metadata value")?)
}

/// Pending changes to a lobby's properties and metadata
pub struct LobbyTransaction<'a> {
    handle: NonNull<sdk::IDiscordLobbyTransaction>,
    _discord: PhantomData<&'a Discord>,
}

impl LobbyTransaction<'_> {
    pub(super) fn new(handle: NonNull<sdk::IDiscordLobbyTransaction>) -> Self {
        Self {
            handle,
            _discord: PhantomData,
        }
    }

    pub(super) fn into_raw(self) -> *mut sdk::IDiscordLobbyTransaction {
        self.handle.as_ptr()
    }

    pub fn set_type(&mut self, kind: LobbyType) -> Result<&mut Self> {
        check(ffi_call!(self.handle, set_type(kind.to_ffi()))?)?;
        Ok(self)
    }

    /// Hand the lobby to another member; only valid in update transactions
    pub fn set_owner(&mut self, owner_id: i64) -> Result<&mut Self> {
        check(ffi_call!(self.handle, set_owner(owner_id))?)?;
        Ok(self)
    }

    pub fn set_capacity(&mut self, capacity: u32) -> Result<&mut Self> {
        check(ffi_call!(self.handle, set_capacity(capacity))?)?;
        Ok(self)
    }

    pub fn set_metadata(&mut self, key: &str, value: &str) -> Result<&mut Self> {
        let mut key = metadata_key(key)?;
        let mut value = metadata_value(value)?;
        check(ffi_call!(
            self.handle,
            set_metadata(key.as_mut_ptr(), value.as_mut_ptr())
        )?)?;
        Ok(self)
    }

    pub fn delete_metadata(&mut self, key: &str) -> Result<&mut Self> {
        let mut key = metadata_key(key)?;
        check(ffi_call!(self.handle, delete_metadata(key.as_mut_ptr()))?)?;
        Ok(self)
    }

    pub fn set_locked(&mut self, locked: bool) -> Result<&mut Self> {
        check(ffi_call!(self.handle, set_locked(locked))?)?;
        Ok(self)
    }
}

impl std::fmt::Debug for LobbyTransaction<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("LobbyTransaction").field(&self.handle).finish()
    }
}

/// Pending changes to one member's metadata
pub struct LobbyMemberTransaction<'a> {
    handle: NonNull<sdk::IDiscordLobbyMemberTransaction>,
    _discord: PhantomData<&'a Discord>,
}

impl LobbyMemberTransaction<'_> {
    pub(super) fn new(handle: NonNull<sdk::IDiscordLobbyMemberTransaction>) -> Self {
        Self {
            handle,
            _discord: PhantomData,
        }
    }

    pub(super) fn into_raw(self) -> *mut sdk::IDiscordLobbyMemberTransaction {
        self.handle.as_ptr()
    }

    pub fn set_metadata(&mut self, key: &str, value: &str) -> Result<&mut Self> {
        let mut key = metadata_key(key)?;
        let mut value = metadata_value(value)?;
        check(ffi_call!(
            self.handle,
            set_metadata(key.as_mut_ptr(), value.as_mut_ptr())
        )?)?;
        Ok(self)
    }

    pub fn delete_metadata(&mut self, key: &str) -> Result<&mut Self> {
        let mut key = metadata_key(key)?;
        check(ffi_call!(self.handle, delete_metadata(key.as_mut_ptr()))?)?;
        Ok(self)
    }
}

impl std::fmt::Debug for LobbyMemberTransaction<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("LobbyMemberTransaction").field(&self.handle).finish()
    }
}

#[cfg(test)]
mod tests {
    use dgs_sdk as sdk;

    use crate::error::{Error, SdkError};
    use crate::model::ModelError;
    use crate::testing;
    use crate::types::LobbyType;

    #[test]
    fn test_builder_calls_in_order() {
        let discord = testing::discord();
        let lobbies = discord.lobbies().unwrap();

        let mut tx = lobbies.lobby_create_transaction().unwrap();
        tx.set_type(LobbyType::Public)
            .unwrap()
            .set_capacity(4)
            .unwrap()
            .set_metadata("map", "de_dust2")
            .unwrap()
            .set_locked(false)
            .unwrap();

        dgs_stub::with(|stub| {
            assert_eq!(stub.last_call("set_type").unwrap().args, ["2"]);
            assert_eq!(stub.last_call("set_capacity").unwrap().args, ["4"]);
            assert_eq!(stub.last_call("set_metadata").unwrap().args, ["map", "de_dust2"]);
            assert_eq!(stub.last_call("set_locked").unwrap().args, ["false"]);
        });
    }

    #[test]
    fn test_builder_error_status() {
        let discord = testing::discord();
        dgs_stub::with(|stub| stub.fail("set_capacity", sdk::DiscordResult_InvalidPayload));

        let mut tx = discord.lobbies().unwrap().lobby_create_transaction().unwrap();
        assert!(matches!(
            tx.set_capacity(0),
            Err(Error::Sdk(SdkError::InvalidPayload))
        ));
    }

    #[test]
    fn test_metadata_width() {
        let discord = testing::discord();
        let mut tx = discord.lobbies().unwrap().lobby_create_transaction().unwrap();

        let key = "k".repeat(256);
        let err = tx.set_metadata(&key, "v").unwrap_err();
        assert!(matches!(
            err,
            Error::Model(ModelError::TextTooLong {
                field: "metadata key",
                len: 256,
                max: 255
            })
        ));
        dgs_stub::with(|stub| assert_eq!(stub.count_calls("set_metadata"), 0));

        tx.delete_metadata("map").unwrap();
    }

    #[test]
    fn test_member_transaction() {
        let discord = testing::discord();
        let lobbies = discord.lobbies().unwrap();

        let mut tx = lobbies.member_update_transaction(1, 2).unwrap();
        tx.set_metadata("team", "blue").unwrap();
        tx.delete_metadata("ready").unwrap();

        dgs_stub::with(|stub| {
            assert_eq!(stub.last_call("get_member_update_transaction").unwrap().args, ["1", "2"]);
            assert_eq!(stub.last_call("member_set_metadata").unwrap().args, ["team", "blue"]);
            assert_eq!(stub.last_call("member_delete_metadata").unwrap().args, ["ready"]);
        });
    }
}
