//! Lobby search queries

use std::marker::PhantomData;
use std::ptr::NonNull;

use dgs_sdk as sdk;

use super::transaction::{metadata_key, metadata_value};
use crate::discord::Discord;
use crate::error::{check, Result};
use crate::ffi::ffi_call;
use crate::types::{FfiEnum, LobbySearchCast, LobbySearchComparison, LobbySearchDistance};

/// Filters and ordering for [`LobbyManager::search`](super::LobbyManager::search)
pub struct LobbySearchQuery<'a> {
    handle: NonNull<sdk::IDiscordLobbySearchQuery>,
    _discord: PhantomData<&'a Discord>,
}

impl LobbySearchQuery<'_> {
    pub(super) fn new(handle: NonNull<sdk::IDiscordLobbySearchQuery>) -> Self {
        Self {
            handle,
            _discord: PhantomData,
        }
    }

    pub(super) fn into_raw(self) -> *mut sdk::IDiscordLobbySearchQuery {
        self.handle.as_ptr()
    }

    /// Keep lobbies whose metadata `key` compares to `value`.
    ///
    /// `cast` decides whether the comparison is on strings or numbers;
    /// the value is always passed as text.
    pub fn filter(
        &mut self,
        key: &str,
        comparison: LobbySearchComparison,
        cast: LobbySearchCast,
        value: &str,
    ) -> Result<&mut Self> {
        let mut key = metadata_key(key)?;
        let mut value = metadata_value(value)?;
        check(ffi_call!(
            self.handle,
            filter(key.as_mut_ptr(), comparison.to_ffi(), cast.to_ffi(), value.as_mut_ptr())
        )?)?;
        Ok(self)
    }

    /// Order results by distance of metadata `key` from `value`
    pub fn sort(&mut self, key: &str, cast: LobbySearchCast, value: &str) -> Result<&mut Self> {
        let mut key = metadata_key(key)?;
        let mut value = metadata_value(value)?;
        check(ffi_call!(
            self.handle,
            sort(key.as_mut_ptr(), cast.to_ffi(), value.as_mut_ptr())
        )?)?;
        Ok(self)
    }

    pub fn limit(&mut self, limit: u32) -> Result<&mut Self> {
        check(ffi_call!(self.handle, limit(limit))?)?;
        Ok(self)
    }

    pub fn distance(&mut self, distance: LobbySearchDistance) -> Result<&mut Self> {
        check(ffi_call!(self.handle, distance(distance.to_ffi()))?)?;
        Ok(self)
    }
}

impl std::fmt::Debug for LobbySearchQuery<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("LobbySearchQuery").field(&self.handle).finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use dgs_sdk as sdk;

    use crate::error::{Error, SdkError};
    use crate::testing;
    use crate::types::{LobbySearchCast, LobbySearchComparison, LobbySearchDistance, LobbyType};

    #[test]
    fn test_filter_passes_key_and_value() {
        let discord = testing::discord();
        let lobbies = discord.lobbies().unwrap();

        let mut query = lobbies.search_query().unwrap();
        query
            .filter("level", LobbySearchComparison::Equal, LobbySearchCast::Number, "5")
            .unwrap();

        let done = Rc::new(RefCell::new(None));
        let sink = done.clone();
        lobbies
            .search(query, move |result| *sink.borrow_mut() = Some(result.is_ok()))
            .unwrap();
        discord.run_callbacks().unwrap();

        assert_eq!(*done.borrow(), Some(true));
        dgs_stub::with(|stub| {
            assert_eq!(stub.last_call("filter").unwrap().args, ["level", "0", "2", "5"]);
            assert_eq!(stub.count_calls("search"), 1);
        });
    }

    #[test]
    fn test_search_results_become_lobby_list() {
        let discord = testing::discord();
        dgs_stub::with(|stub| {
            stub.lobbies.push(dgs_stub::lobby(10, sdk::DiscordLobbyType_Public, 1, 4));
            stub.lobbies.push(dgs_stub::lobby(11, sdk::DiscordLobbyType_Public, 1, 8));
            stub.lobbies.push(dgs_stub::lobby(12, sdk::DiscordLobbyType_Private, 1, 2));
        });
        let lobbies = discord.lobbies().unwrap();

        let mut query = lobbies.search_query().unwrap();
        query
            .filter("capacity", LobbySearchComparison::GreaterThan, LobbySearchCast::Number, "2")
            .unwrap()
            .sort("capacity", LobbySearchCast::Number, "6")
            .unwrap()
            .limit(10)
            .unwrap()
            .distance(LobbySearchDistance::Global)
            .unwrap();
        lobbies.search(query, |_| {}).unwrap();
        discord.run_callbacks().unwrap();

        assert_eq!(lobbies.lobby_ids().unwrap(), vec![10, 11, 12]);
        assert_eq!(lobbies.lobby(11).unwrap().kind(), Ok(LobbyType::Public));
        dgs_stub::with(|stub| {
            assert_eq!(stub.last_call("sort").unwrap().args, ["capacity", "2", "6"]);
            assert_eq!(stub.last_call("limit").unwrap().args, ["10"]);
            assert_eq!(stub.last_call("distance").unwrap().args, ["3"]);
        });
    }

    #[test]
    fn test_filter_error() {
        let discord = testing::discord();
        dgs_stub::with(|stub| stub.fail("filter", sdk::DiscordResult_InvalidPayload));

        let mut query = discord.lobbies().unwrap().search_query().unwrap();
        let err = query
            .filter("level", LobbySearchComparison::Equal, LobbySearchCast::Number, "5")
            .unwrap_err();
        assert!(matches!(err, Error::Sdk(SdkError::InvalidPayload)));
    }
}
