//! Greets the current user and looks up another user by id

use std::cell::Cell;
use std::ops::ControlFlow;
use std::rc::Rc;
use std::time::Duration;

use dgs_core::{Discord, PremiumType, Result, UserFlag, UserManager};
use tracing::{info, warn};

const LOOKUP_USER_ID: i64 = 336834315130503169;

fn greet(users: &UserManager<'_>) -> Result<()> {
    let user = users.current_user()?;
    info!("hello, {}#{}!", user.username(), user.discriminator());

    match users.current_user_premium_type()? {
        PremiumType::None => info!("you are not a nitro subscriber"),
        PremiumType::Tier1 => info!("you are a nitro classic subscriber"),
        PremiumType::Tier2 => info!("you are a nitro subscriber"),
    }

    let houses = [
        (UserFlag::HypeSquadHouse1, "bravery"),
        (UserFlag::HypeSquadHouse2, "brilliance"),
        (UserFlag::HypeSquadHouse3, "balance"),
    ];
    for (flag, house) in houses {
        if users.current_user_has_flag(flag)? {
            info!("you are a member of house {}", house);
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let config = dgs_demos::init()?;
    let discord = Discord::from_config(&config)?;
    let users = discord.users()?;

    let updated = Rc::new(Cell::new(false));
    let flag = updated.clone();
    users.on_current_user_update(move || flag.set(true));

    users.get_user(LOOKUP_USER_ID, |result| match result {
        Ok(user) => info!("found {}#{}", user.username(), user.discriminator()),
        Err(e) => warn!("failed to get user: {}", e),
    })?;

    dgs_demos::pump(&[&discord], Duration::from_millis(100), |_| {
        if updated.replace(false) {
            greet(&users)?;
        }
        Ok(ControlFlow::Continue(()))
    })
}
