//! Publishes a rich presence and answers joins and invites

use std::cell::RefCell;
use std::ops::ControlFlow;
use std::rc::Rc;
use std::time::Duration;

use dgs_core::{Activity, ActivityJoinRequestReply, Discord, Result};
use dgs_demos::report;
use tracing::info;
use uuid::Uuid;

/// Clear the presence after a minute of 100ms ticks
const CLEAR_AFTER_TICKS: u64 = 600;

enum Incoming {
    JoinRequest(i64),
    Invite(i64),
}

fn build_activity() -> Result<Activity> {
    let mut activity = Activity::default();
    activity.set_state("Testing Game SDK")?;

    let party = activity.party_mut();
    party.set_id(&Uuid::new_v4().to_string())?;
    party.size_mut().set_current_size(4);
    party.size_mut().set_max_size(8);

    activity.secrets_mut().set_join(&Uuid::new_v4().to_string())?;
    Ok(activity)
}

fn main() -> Result<()> {
    let config = dgs_demos::init()?;
    let discord = Discord::from_config(&config)?;
    let activities = discord.activities()?;

    let incoming = Rc::new(RefCell::new(Vec::new()));

    activities.on_activity_join(|secret| info!("joining with secret {}", secret));
    activities.on_activity_spectate(|secret| info!("spectating with secret {}", secret));

    let queue = incoming.clone();
    activities.on_activity_join_request(move |user| {
        info!("join request from {}", user.username());
        queue.borrow_mut().push(Incoming::JoinRequest(user.id()));
    });

    let queue = incoming.clone();
    activities.on_activity_invite(move |action, user, activity| {
        info!("{:?} invite from {} to {:?}", action, user.username(), activity.state());
        queue.borrow_mut().push(Incoming::Invite(user.id()));
    });

    activities.update_activity(&build_activity()?, report("update_activity"))?;
    activities.register_command("iexplore.exe http://www.example.com/")?;

    dgs_demos::pump(&[&discord], Duration::from_millis(100), |tick| {
        let events = std::mem::take(&mut *incoming.borrow_mut());
        for event in events {
            match event {
                Incoming::JoinRequest(user_id) => activities.send_request_reply(
                    user_id,
                    ActivityJoinRequestReply::Yes,
                    report("send_request_reply"),
                )?,
                Incoming::Invite(user_id) => activities.accept_invite(user_id, report("accept_invite"))?,
            }
        }
        if tick == CLEAR_AFTER_TICKS {
            activities.clear_activity(report("clear_activity"))?;
        }
        Ok(ControlFlow::Continue(()))
    })
}
