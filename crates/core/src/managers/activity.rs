//! Rich presence, invites and join requests

use dgs_sdk as sdk;

use super::manager;
use crate::completion;
use crate::error::{check, Result};
use crate::events::ListenerKey;
use crate::ffi::{c_string, ffi_call};
use crate::model::{Activity, Model, User};
use crate::types::{ActivityActionType, ActivityJoinRequestReply, FfiEnum};

manager! {
    /// Activity manager
    ActivityManager => sdk::IDiscordActivityManager
}

impl ActivityManager<'_> {
    /// Register a command Discord runs to launch the game, for example a
    /// path to the executable or a protocol URL.
    pub fn register_command(&self, command: &str) -> Result<()> {
        let command = c_string(command, "command")?;
        check(ffi_call!(self.handle, register_command(command.as_ptr()))?)
    }

    /// Register the game's Steam app id so Discord can launch it through Steam
    pub fn register_steam(&self, steam_id: u32) -> Result<()> {
        check(ffi_call!(self.handle, register_steam(steam_id))?)
    }

    /// Set the current user's presence
    pub fn update_activity(
        &self,
        activity: &Activity,
        completion: impl FnOnce(Result<()>) + 'static,
    ) -> Result<()> {
        // The library copies the record during the call
        let mut raw = *activity.as_raw();
        self.discord.pending().issue("update_activity", completion, |data| {
            ffi_call!(self.handle, update_activity(&mut raw, data, Some(completion::on_result)))
        })
    }

    pub fn clear_activity(&self, completion: impl FnOnce(Result<()>) + 'static) -> Result<()> {
        self.discord.pending().issue("clear_activity", completion, |data| {
            ffi_call!(self.handle, clear_activity(data, Some(completion::on_result)))
        })
    }

    /// Answer a join request received through [`on_activity_join_request`](Self::on_activity_join_request)
    pub fn send_request_reply(
        &self,
        user_id: i64,
        reply: ActivityJoinRequestReply,
        completion: impl FnOnce(Result<()>) + 'static,
    ) -> Result<()> {
        self.discord.pending().issue("send_request_reply", completion, |data| {
            ffi_call!(
                self.handle,
                send_request_reply(user_id, reply.to_ffi(), data, Some(completion::on_result))
            )
        })
    }

    pub fn send_invite(
        &self,
        user_id: i64,
        action: ActivityActionType,
        content: &str,
        completion: impl FnOnce(Result<()>) + 'static,
    ) -> Result<()> {
        let content = c_string(content, "invite content")?;
        self.discord.pending().issue("send_invite", completion, |data| {
            ffi_call!(
                self.handle,
                send_invite(
                    user_id,
                    action.to_ffi(),
                    content.as_ptr(),
                    data,
                    Some(completion::on_result)
                )
            )
        })
    }

    pub fn accept_invite(&self, user_id: i64, completion: impl FnOnce(Result<()>) + 'static) -> Result<()> {
        self.discord.pending().issue("accept_invite", completion, |data| {
            ffi_call!(self.handle, accept_invite(user_id, data, Some(completion::on_result)))
        })
    }

    /// Called with the join secret when the user joins through Discord
    pub fn on_activity_join(&self, callback: impl FnMut(&str) + 'static) -> ListenerKey {
        self.discord.events().on_activity_join(callback)
    }

    /// Called with the spectate secret when the user spectates through Discord
    pub fn on_activity_spectate(&self, callback: impl FnMut(&str) + 'static) -> ListenerKey {
        self.discord.events().on_activity_spectate(callback)
    }

    pub fn on_activity_join_request(&self, callback: impl FnMut(&User) + 'static) -> ListenerKey {
        self.discord.events().on_activity_join_request(callback)
    }

    pub fn on_activity_invite(
        &self,
        callback: impl FnMut(ActivityActionType, &User, &Activity) + 'static,
    ) -> ListenerKey {
        self.discord.events().on_activity_invite(callback)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use dgs_sdk as sdk;

    use crate::error::{Error, SdkError};
    use crate::model::Activity;
    use crate::testing;
    use crate::types::{ActivityActionType, ActivityJoinRequestReply, ActivityType};

    fn sample_activity() -> Activity {
        let mut activity = Activity::default();
        activity.set_kind(ActivityType::Playing);
        activity.set_state("In a match").unwrap();
        activity.set_details("Ranked").unwrap();
        activity.party_mut().set_id("party-1").unwrap();
        activity.party_mut().size_mut().set_current_size(1);
        activity.party_mut().size_mut().set_max_size(4);
        activity
    }

    #[test]
    fn test_update_activity_fires_once_on_drain() {
        let discord = testing::discord();
        let calls = Rc::new(RefCell::new(Vec::new()));

        let sink = calls.clone();
        discord
            .activities()
            .unwrap()
            .update_activity(&sample_activity(), move |result| {
                sink.borrow_mut().push(result.is_ok())
            })
            .unwrap();

        assert!(calls.borrow().is_empty());
        assert_eq!(discord.pending_completions(), 1);

        discord.run_callbacks().unwrap();
        assert_eq!(*calls.borrow(), vec![true]);
        assert_eq!(discord.pending_completions(), 0);

        discord.run_callbacks().unwrap();
        assert_eq!(*calls.borrow(), vec![true]);
    }

    #[test]
    fn test_update_activity_passes_record() {
        let discord = testing::discord();
        discord
            .activities()
            .unwrap()
            .update_activity(&sample_activity(), |_| {})
            .unwrap();

        dgs_stub::with(|stub| {
            let activity = stub.activity.expect("activity was not recorded");
            assert_eq!(dgs_stub::text(&activity.state), "In a match");
            assert_eq!(activity.party.size.max_size, 4);
        });
    }

    #[test]
    fn test_update_activity_reports_status() {
        let discord = testing::discord();
        dgs_stub::with(|stub| stub.fail("update_activity", sdk::DiscordResult_InvalidSecret));

        let seen = Rc::new(Cell::new(None));
        let sink = seen.clone();
        discord
            .activities()
            .unwrap()
            .update_activity(&sample_activity(), move |result| {
                sink.set(result.err().and_then(|e| e.sdk_error()))
            })
            .unwrap();
        discord.run_callbacks().unwrap();
        assert_eq!(seen.get(), Some(SdkError::InvalidSecret));
    }

    #[test]
    fn test_completions_keep_library_order() {
        let discord = testing::discord();
        let order = Rc::new(RefCell::new(Vec::new()));
        let activities = discord.activities().unwrap();

        for i in 0..5 {
            let sink = order.clone();
            activities.accept_invite(i, move |_| sink.borrow_mut().push(i)).unwrap();
        }
        assert_eq!(discord.pending_completions(), 5);

        discord.run_callbacks().unwrap();
        assert_eq!(*order.borrow(), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_double_fire_is_harmless() {
        let discord = testing::discord();
        dgs_stub::with(|stub| stub.fire_twice = true);

        let payload = Rc::new(String::from("owned by the completion"));
        let calls = Rc::new(Cell::new(0));

        let (counter, owned) = (calls.clone(), payload.clone());
        discord
            .activities()
            .unwrap()
            .clear_activity(move |_| {
                counter.set(counter.get() + 1);
                drop(owned);
            })
            .unwrap();
        assert_eq!(Rc::strong_count(&payload), 2);

        discord.run_callbacks().unwrap();
        assert_eq!(calls.get(), 1);
        assert_eq!(Rc::strong_count(&payload), 1);
    }

    #[test]
    fn test_send_invite_and_reply() {
        let discord = testing::discord();
        let activities = discord.activities().unwrap();
        activities
            .send_invite(9, ActivityActionType::Join, "come play", |_| {})
            .unwrap();
        activities
            .send_request_reply(9, ActivityJoinRequestReply::Yes, |_| {})
            .unwrap();

        dgs_stub::with(|stub| {
            assert_eq!(stub.last_call("send_invite").unwrap().args, ["9", "1", "come play"]);
            assert_eq!(stub.last_call("send_request_reply").unwrap().args, ["9", "1"]);
        });
    }

    #[test]
    fn test_invalid_text_is_rejected_before_call() {
        let discord = testing::discord();
        let err = discord
            .activities()
            .unwrap()
            .send_invite(9, ActivityActionType::Join, "bad\0text", |_| {})
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert_eq!(discord.pending_completions(), 0);
    }

    #[test]
    fn test_register_command_and_steam() {
        let discord = testing::discord();
        let activities = discord.activities().unwrap();
        activities.register_command("mygame://launch").unwrap();
        activities.register_steam(1938090).unwrap();
        dgs_stub::with(|stub| {
            assert_eq!(stub.last_call("register_command").unwrap().args, ["mygame://launch"]);
            assert_eq!(stub.last_call("register_steam").unwrap().args, ["1938090"]);
        });
    }

    #[test]
    fn test_join_and_invite_events() {
        let discord = testing::discord();
        let activities = discord.activities().unwrap();
        let secrets = Rc::new(RefCell::new(Vec::new()));
        let invites = Rc::new(RefCell::new(Vec::new()));

        let sink = secrets.clone();
        activities.on_activity_join(move |secret| sink.borrow_mut().push(secret.to_string()));
        let sink = invites.clone();
        activities.on_activity_invite(move |action, user, activity| {
            sink.borrow_mut().push((action, user.id(), activity.state()))
        });

        dgs_stub::fire_activity_join("join-secret");
        let mut activity = sdk::DiscordActivity::default();
        dgs_stub::set_text(&mut activity.state, "Lobby");
        dgs_stub::fire_activity_invite(
            sdk::DiscordActivityActionType_Spectate,
            dgs_stub::user(3, "carol", "0003", false),
            activity,
        );
        discord.run_callbacks().unwrap();

        assert_eq!(*secrets.borrow(), vec!["join-secret".to_string()]);
        assert_eq!(
            *invites.borrow(),
            vec![(ActivityActionType::Spectate, 3, "Lobby".to_string())]
        );
    }
}
