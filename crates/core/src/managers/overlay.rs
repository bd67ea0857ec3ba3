//! The in-game overlay

use dgs_sdk as sdk;

use super::manager;
use crate::completion;
use crate::error::Result;
use crate::events::ListenerKey;
use crate::ffi::{c_string, ffi_call};
use crate::types::{ActivityActionType, FfiEnum};

manager! {
    /// Overlay manager
    OverlayManager => sdk::IDiscordOverlayManager
}

impl OverlayManager<'_> {
    pub fn is_enabled(&self) -> Result<bool> {
        let mut enabled = false;
        ffi_call!(self.handle, is_enabled(&mut enabled))?;
        Ok(enabled)
    }

    /// Whether the overlay is closed, so input goes to the game
    pub fn is_locked(&self) -> Result<bool> {
        let mut locked = false;
        ffi_call!(self.handle, is_locked(&mut locked))?;
        Ok(locked)
    }

    pub fn set_locked(&self, locked: bool, completion: impl FnOnce(Result<()>) + 'static) -> Result<()> {
        self.discord.pending().issue("set_locked", completion, |data| {
            ffi_call!(self.handle, set_locked(locked, data, Some(completion::on_result)))
        })
    }

    pub fn open_activity_invite(
        &self,
        action: ActivityActionType,
        completion: impl FnOnce(Result<()>) + 'static,
    ) -> Result<()> {
        self.discord.pending().issue("open_activity_invite", completion, |data| {
            ffi_call!(
                self.handle,
                open_activity_invite(action.to_ffi(), data, Some(completion::on_result))
            )
        })
    }

    pub fn open_guild_invite(&self, code: &str, completion: impl FnOnce(Result<()>) + 'static) -> Result<()> {
        let code = c_string(code, "guild invite code")?;
        self.discord.pending().issue("open_guild_invite", completion, |data| {
            ffi_call!(
                self.handle,
                open_guild_invite(code.as_ptr(), data, Some(completion::on_result))
            )
        })
    }

    pub fn open_voice_settings(&self, completion: impl FnOnce(Result<()>) + 'static) -> Result<()> {
        self.discord.pending().issue("open_voice_settings", completion, |data| {
            ffi_call!(self.handle, open_voice_settings(data, Some(completion::on_result)))
        })
    }

    /// Called with the new locked state when the overlay opens or closes
    pub fn on_toggle(&self, callback: impl FnMut(bool) + 'static) -> ListenerKey {
        self.discord.events().on_overlay_toggle(callback)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::testing;
    use crate::types::ActivityActionType;

    #[test]
    fn test_state_queries() {
        let discord = testing::discord();
        dgs_stub::with(|stub| {
            stub.overlay_enabled = true;
            stub.overlay_locked = false;
        });
        let overlay = discord.overlay().unwrap();
        assert!(overlay.is_enabled().unwrap());
        assert!(!overlay.is_locked().unwrap());
    }

    #[test]
    fn test_set_locked_and_toggle_event() {
        let discord = testing::discord();
        let overlay = discord.overlay().unwrap();
        let toggles = Rc::new(RefCell::new(Vec::new()));

        let sink = toggles.clone();
        overlay.on_toggle(move |locked| sink.borrow_mut().push(locked));
        overlay.set_locked(true, |result| assert!(result.is_ok())).unwrap();
        discord.run_callbacks().unwrap();

        assert!(overlay.is_locked().unwrap());
        assert_eq!(*toggles.borrow(), vec![true]);
    }

    #[test]
    fn test_open_dialogs() {
        let discord = testing::discord();
        let overlay = discord.overlay().unwrap();
        overlay.open_activity_invite(ActivityActionType::Join, |_| {}).unwrap();
        overlay.open_guild_invite("abcdef", |_| {}).unwrap();
        overlay.open_voice_settings(|_| {}).unwrap();
        assert_eq!(discord.pending_completions(), 3);

        discord.run_callbacks().unwrap();
        assert_eq!(discord.pending_completions(), 0);
        dgs_stub::with(|stub| {
            assert_eq!(stub.last_call("open_guild_invite").unwrap().args, ["abcdef"]);
            assert_eq!(stub.last_call("open_activity_invite").unwrap().args, ["1"]);
        });
    }
}
