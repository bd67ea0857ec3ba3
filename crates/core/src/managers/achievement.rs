//! User achievements

use dgs_sdk as sdk;

use super::manager;
use crate::completion;
use crate::error::{check, Result};
use crate::events::ListenerKey;
use crate::ffi::{count_to_len, ffi_call, index_i32};
use crate::model::{Model, UserAchievement};

manager! {
    /// Achievement manager
    AchievementManager => sdk::IDiscordAchievementManager
}

impl AchievementManager<'_> {
    /// Set progress on an achievement, 0 to 100 percent
    pub fn set_user_achievement(
        &self,
        achievement_id: i64,
        percent_complete: u8,
        completion: impl FnOnce(Result<()>) + 'static,
    ) -> Result<()> {
        self.discord.pending().issue("set_user_achievement", completion, |data| {
            ffi_call!(
                self.handle,
                set_user_achievement(achievement_id, percent_complete, data, Some(completion::on_result))
            )
        })
    }

    pub fn fetch_user_achievements(&self, completion: impl FnOnce(Result<()>) + 'static) -> Result<()> {
        self.discord.pending().issue("fetch_user_achievements", completion, |data| {
            ffi_call!(self.handle, fetch_user_achievements(data, Some(completion::on_result)))
        })
    }

    pub fn count_user_achievements(&self) -> Result<usize> {
        let mut count = 0;
        ffi_call!(self.handle, count_user_achievements(&mut count))?;
        Ok(count_to_len(count))
    }

    pub fn user_achievement(&self, achievement_id: i64) -> Result<UserAchievement> {
        let mut achievement = UserAchievement::default();
        check(ffi_call!(
            self.handle,
            get_user_achievement(achievement_id, achievement.as_raw_mut())
        )?)?;
        Ok(achievement)
    }

    pub fn user_achievement_at(&self, index: usize) -> Result<UserAchievement> {
        let index = index_i32(index)?;
        let mut achievement = UserAchievement::default();
        check(ffi_call!(
            self.handle,
            get_user_achievement_at(index, achievement.as_raw_mut())
        )?)?;
        Ok(achievement)
    }

    /// Every fetched achievement of the current user
    pub fn user_achievements(&self) -> Result<Vec<UserAchievement>> {
        (0..self.count_user_achievements()?)
            .map(|i| self.user_achievement_at(i))
            .collect()
    }

    pub fn on_user_achievement_update(&self, callback: impl FnMut(&UserAchievement) + 'static) -> ListenerKey {
        self.discord.events().on_user_achievement_update(callback)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use dgs_sdk as sdk;

    use crate::error::{Error, SdkError};
    use crate::testing;

    #[test]
    fn test_progress_and_fetch() {
        let discord = testing::discord();
        let achievements = discord.achievements().unwrap();

        achievements.set_user_achievement(5001, 40, |r| assert!(r.is_ok())).unwrap();
        achievements.set_user_achievement(5002, 100, |r| assert!(r.is_ok())).unwrap();
        achievements.fetch_user_achievements(|r| assert!(r.is_ok())).unwrap();
        discord.run_callbacks().unwrap();

        let all = achievements.user_achievements().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].achievement_id(), 5001);
        assert_eq!(all[0].percent_complete(), 40);

        let done = achievements.user_achievement(5002).unwrap();
        assert_eq!(done.percent_complete(), 100);
        assert_eq!(done.user_id(), dgs_stub::with(|stub| stub.current_user.id));
        assert!(!done.unlocked_at().is_empty());

        assert!(matches!(
            achievements.user_achievement(5003),
            Err(Error::Sdk(SdkError::NotFound))
        ));
    }

    #[test]
    fn test_unauthorized() {
        let discord = testing::discord();
        dgs_stub::with(|stub| {
            stub.fail("set_user_achievement", sdk::DiscordResult_UnauthorizedForAchievement)
        });
        let seen = Rc::new(RefCell::new(None));

        let sink = seen.clone();
        discord
            .achievements()
            .unwrap()
            .set_user_achievement(1, 50, move |result| {
                *sink.borrow_mut() = result.err().and_then(|e| e.sdk_error())
            })
            .unwrap();
        discord.run_callbacks().unwrap();

        assert_eq!(*seen.borrow(), Some(SdkError::UnauthorizedForAchievement));
    }

    #[test]
    fn test_update_event() {
        let discord = testing::discord();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let sink = seen.clone();
        discord
            .achievements()
            .unwrap()
            .on_user_achievement_update(move |a| {
                sink.borrow_mut().push((a.achievement_id(), a.percent_complete()))
            });
        dgs_stub::fire_user_achievement_update(dgs_stub::user_achievement(1, 77, 25));
        discord.run_callbacks().unwrap();

        assert_eq!(*seen.borrow(), vec![(77, 25)]);
    }
}
