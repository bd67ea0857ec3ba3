//! Users: the current user and lookups by id

use dgs_sdk as sdk;

use super::manager;
use crate::completion;
use crate::error::{check, Result};
use crate::events::ListenerKey;
use crate::ffi::ffi_call;
use crate::model::{decode_enum, Model, User};
use crate::types::{FfiEnum, PremiumType, UserFlag};

manager! {
    /// User manager
    UserManager => sdk::IDiscordUserManager
}

impl UserManager<'_> {
    /// The user the local Discord client is logged in as.
    ///
    /// Fails with `NotFound` until the client has reported the user, which
    /// is signalled by [`on_current_user_update`](Self::on_current_user_update).
    pub fn current_user(&self) -> Result<User> {
        let mut user = User::default();
        check(ffi_call!(self.handle, get_current_user(user.as_raw_mut()))?)?;
        Ok(user)
    }

    /// Fetch any user by id
    pub fn get_user(&self, user_id: i64, completion: impl FnOnce(Result<User>) + 'static) -> Result<()> {
        self.discord.pending().issue("get_user", completion, |data| {
            ffi_call!(self.handle, get_user(user_id, data, Some(completion::on_user)))
        })
    }

    pub fn current_user_premium_type(&self) -> Result<PremiumType> {
        let mut premium_type = sdk::DiscordPremiumType_None;
        check(ffi_call!(self.handle, get_current_user_premium_type(&mut premium_type))?)?;
        Ok(decode_enum(premium_type, "premium_type")?)
    }

    pub fn current_user_has_flag(&self, flag: UserFlag) -> Result<bool> {
        let mut has_flag = false;
        check(ffi_call!(self.handle, current_user_has_flag(flag.to_ffi(), &mut has_flag))?)?;
        Ok(has_flag)
    }

    pub fn on_current_user_update(&self, callback: impl FnMut() + 'static) -> ListenerKey {
        self.discord.events().on_current_user_update(callback)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use dgs_sdk as sdk;

    use crate::error::{Error, SdkError};
    use crate::testing;
    use crate::types::{PremiumType, UserFlag};

    #[test]
    fn test_current_user() {
        let discord = testing::discord();
        dgs_stub::with(|stub| stub.current_user = dgs_stub::user(42, "alice", "0001", false));

        let user = discord.users().unwrap().current_user().unwrap();
        assert_eq!(user.id(), 42);
        assert_eq!(user.username(), "alice");
        assert_eq!(user.discriminator(), "0001");
        assert!(!user.bot());
    }

    #[test]
    fn test_current_user_error_code() {
        let discord = testing::discord();
        dgs_stub::with(|stub| stub.fail("get_current_user", sdk::DiscordResult_NotFound));

        let err = discord.users().unwrap().current_user().unwrap_err();
        assert!(matches!(err, Error::Sdk(SdkError::NotFound)));
    }

    #[test]
    fn test_get_user_completes_on_drain() {
        let discord = testing::discord();
        dgs_stub::with(|stub| {
            stub.users.insert(7, dgs_stub::user(7, "bob", "1234", true));
        });

        let seen = Rc::new(RefCell::new(None));
        let sink = seen.clone();
        discord
            .users()
            .unwrap()
            .get_user(7, move |result| *sink.borrow_mut() = Some(result.map(|u| u.username())))
            .unwrap();

        assert!(seen.borrow().is_none());
        discord.run_callbacks().unwrap();
        assert_eq!(seen.borrow_mut().take().unwrap().unwrap(), "bob");
    }

    #[test]
    fn test_get_user_not_found() {
        let discord = testing::discord();
        let seen = Rc::new(Cell::new(None));

        let sink = seen.clone();
        discord
            .users()
            .unwrap()
            .get_user(404, move |result| sink.set(result.err().and_then(|e| e.sdk_error())))
            .unwrap();
        discord.run_callbacks().unwrap();
        assert_eq!(seen.get(), Some(SdkError::NotFound));
    }

    #[test]
    fn test_premium_type_and_flags() {
        let discord = testing::discord();
        dgs_stub::with(|stub| {
            stub.premium_type = sdk::DiscordPremiumType_Tier2;
            stub.user_flags = sdk::DiscordUserFlag_HypeSquadEvents;
        });

        let users = discord.users().unwrap();
        assert_eq!(users.current_user_premium_type().unwrap(), PremiumType::Tier2);
        assert!(users.current_user_has_flag(UserFlag::HypeSquadEvents).unwrap());
        assert!(!users.current_user_has_flag(UserFlag::Partner).unwrap());
    }

    #[test]
    fn test_current_user_update_event() {
        let discord = testing::discord();
        let calls = Rc::new(Cell::new(0));

        let counter = calls.clone();
        discord.users().unwrap().on_current_user_update(move || counter.set(counter.get() + 1));

        dgs_stub::fire_current_user_update();
        assert_eq!(calls.get(), 0);
        discord.run_callbacks().unwrap();
        assert_eq!(calls.get(), 1);
    }
}
