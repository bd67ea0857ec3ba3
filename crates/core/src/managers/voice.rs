//! Voice settings of the local user

use dgs_sdk as sdk;

use super::manager;
use crate::completion;
use crate::error::{check, Result};
use crate::events::ListenerKey;
use crate::ffi::ffi_call;
use crate::model::{InputMode, Model};

manager! {
    /// Voice manager
    VoiceManager => sdk::IDiscordVoiceManager
}

impl VoiceManager<'_> {
    pub fn input_mode(&self) -> Result<InputMode> {
        let mut mode = InputMode::default();
        check(ffi_call!(self.handle, get_input_mode(mode.as_raw_mut()))?)?;
        Ok(mode)
    }

    /// Switch between voice activity and push to talk
    pub fn set_input_mode(&self, mode: InputMode, completion: impl FnOnce(Result<()>) + 'static) -> Result<()> {
        let raw = mode.into_raw();
        self.discord.pending().issue("set_input_mode", completion, |data| {
            ffi_call!(self.handle, set_input_mode(raw, data, Some(completion::on_result)))
        })
    }

    pub fn is_self_mute(&self) -> Result<bool> {
        let mut mute = false;
        check(ffi_call!(self.handle, is_self_mute(&mut mute))?)?;
        Ok(mute)
    }

    pub fn set_self_mute(&self, mute: bool) -> Result<()> {
        check(ffi_call!(self.handle, set_self_mute(mute))?)
    }

    pub fn is_self_deaf(&self) -> Result<bool> {
        let mut deaf = false;
        check(ffi_call!(self.handle, is_self_deaf(&mut deaf))?)?;
        Ok(deaf)
    }

    pub fn set_self_deaf(&self, deaf: bool) -> Result<()> {
        check(ffi_call!(self.handle, set_self_deaf(deaf))?)
    }

    /// Whether `user_id` is muted for this client only
    pub fn is_local_mute(&self, user_id: i64) -> Result<bool> {
        let mut mute = false;
        check(ffi_call!(self.handle, is_local_mute(user_id, &mut mute))?)?;
        Ok(mute)
    }

    pub fn set_local_mute(&self, user_id: i64, mute: bool) -> Result<()> {
        check(ffi_call!(self.handle, set_local_mute(user_id, mute))?)
    }

    /// Local playback volume for `user_id`, 0 to 200 with 100 as default
    pub fn local_volume(&self, user_id: i64) -> Result<u8> {
        let mut volume = 0;
        check(ffi_call!(self.handle, get_local_volume(user_id, &mut volume))?)?;
        Ok(volume)
    }

    pub fn set_local_volume(&self, user_id: i64, volume: u8) -> Result<()> {
        check(ffi_call!(self.handle, set_local_volume(user_id, volume))?)
    }

    pub fn on_settings_update(&self, callback: impl FnMut() + 'static) -> ListenerKey {
        self.discord.events().on_voice_settings_update(callback)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use dgs_sdk as sdk;

    use crate::error::{Error, SdkError};
    use crate::model::InputMode;
    use crate::testing;
    use crate::types::InputModeType;

    #[test]
    fn test_mute_and_deaf() {
        let discord = testing::discord();
        let voice = discord.voice().unwrap();

        assert!(!voice.is_self_mute().unwrap());
        voice.set_self_mute(true).unwrap();
        voice.set_self_deaf(true).unwrap();
        assert!(voice.is_self_mute().unwrap());
        assert!(voice.is_self_deaf().unwrap());

        voice.set_local_mute(42, true).unwrap();
        assert!(voice.is_local_mute(42).unwrap());
        assert!(!voice.is_local_mute(43).unwrap());
    }

    #[test]
    fn test_local_volume() {
        let discord = testing::discord();
        let voice = discord.voice().unwrap();

        assert_eq!(voice.local_volume(42).unwrap(), 100);
        voice.set_local_volume(42, 150).unwrap();
        assert_eq!(voice.local_volume(42).unwrap(), 150);
        dgs_stub::with(|stub| {
            assert_eq!(stub.last_call("set_local_volume").unwrap().args, ["42", "150"])
        });
    }

    #[test]
    fn test_input_mode_passed_by_value() {
        let discord = testing::discord();
        let voice = discord.voice().unwrap();

        let mut mode = InputMode::default();
        mode.set_kind(InputModeType::PushToTalk);
        mode.set_shortcut("caps lock").unwrap();
        voice.set_input_mode(mode, |result| assert!(result.is_ok())).unwrap();
        discord.run_callbacks().unwrap();

        let current = voice.input_mode().unwrap();
        assert_eq!(current.kind(), Ok(InputModeType::PushToTalk));
        assert_eq!(current.shortcut(), "caps lock");
    }

    #[test]
    fn test_settings_update_event() {
        let discord = testing::discord();
        let count = Rc::new(Cell::new(0));

        let counter = count.clone();
        discord
            .voice()
            .unwrap()
            .on_settings_update(move || counter.set(counter.get() + 1));
        dgs_stub::fire_voice_settings_update();
        dgs_stub::fire_voice_settings_update();
        discord.run_callbacks().unwrap();

        assert_eq!(count.get(), 2);
    }

    #[test]
    fn test_sync_error() {
        let discord = testing::discord();
        dgs_stub::with(|stub| stub.fail("set_self_mute", sdk::DiscordResult_InternalError));
        assert!(matches!(
            discord.voice().unwrap().set_self_mute(true),
            Err(Error::Sdk(SdkError::InternalError))
        ));
    }
}
