//! Creates a public lobby, searches for it and chats in it

use std::cell::{Cell, RefCell};
use std::ops::ControlFlow;
use std::rc::Rc;
use std::time::Duration;

use dgs_core::{
    Discord, Lobby, LobbyManager, LobbySearchCast, LobbySearchComparison, LobbySearchDistance,
    LobbyType, Result,
};
use dgs_demos::report;
use tracing::{info, warn};

const GAME_MODE: &str = "capture_the_flag";
/// Delete the lobby after 30 seconds of 100ms ticks
const DELETE_AFTER_TICKS: u64 = 300;

fn create(lobbies: &LobbyManager<'_>, created: Rc<RefCell<Option<Lobby>>>) -> Result<()> {
    let mut transaction = lobbies.lobby_create_transaction()?;
    transaction
        .set_type(LobbyType::Public)?
        .set_capacity(4)?
        .set_metadata("mode", GAME_MODE)?;

    lobbies.create_lobby(transaction, move |result| match result {
        Ok(lobby) => *created.borrow_mut() = Some(lobby),
        Err(e) => warn!("failed to create lobby: {}", e),
    })
}

fn describe(lobbies: &LobbyManager<'_>, lobby: &Lobby) -> Result<()> {
    info!(
        "lobby {} owned by {}, capacity {}, secret {}",
        lobby.id(),
        lobby.owner_id(),
        lobby.capacity(),
        lobby.secret()
    );
    info!("activity secret: {}", lobbies.lobby_activity_secret(lobby.id())?);
    for (key, value) in lobbies.lobby_metadata(lobby.id())? {
        info!("  {} = {}", key, value);
    }
    for user_id in lobbies.member_ids(lobby.id())? {
        let user = lobbies.member_user(lobby.id(), user_id)?;
        info!("  member {}#{}", user.username(), user.discriminator());
    }
    Ok(())
}

fn search(lobbies: &LobbyManager<'_>, done: Rc<Cell<bool>>) -> Result<()> {
    let mut query = lobbies.search_query()?;
    query
        .filter(
            "metadata.mode",
            LobbySearchComparison::Equal,
            LobbySearchCast::String,
            GAME_MODE,
        )?
        .distance(LobbySearchDistance::Default)?
        .limit(10)?;

    lobbies.search(query, move |result| match result {
        Ok(()) => done.set(true),
        Err(e) => warn!("lobby search failed: {}", e),
    })
}

fn main() -> Result<()> {
    let config = dgs_demos::init()?;
    let discord = Discord::from_config(&config)?;
    let lobbies = discord.lobbies()?;

    lobbies.on_member_connect(|lobby_id, user_id| info!("{} joined lobby {}", user_id, lobby_id));
    lobbies.on_member_disconnect(|lobby_id, user_id| info!("{} left lobby {}", user_id, lobby_id));
    lobbies.on_lobby_message(|lobby_id, user_id, data| {
        info!("[lobby {}] {}: {}", lobby_id, user_id, String::from_utf8_lossy(data));
    });

    let created: Rc<RefCell<Option<Lobby>>> = Rc::default();
    let searched = Rc::new(Cell::new(false));
    let mut lobby_id = None;

    create(&lobbies, created.clone())?;

    dgs_demos::pump(&[&discord], Duration::from_millis(100), |tick| {
        let lobby = created.borrow_mut().take();
        if let Some(lobby) = lobby {
            describe(&lobbies, &lobby)?;
            lobbies.send_lobby_message(lobby.id(), b"hello lobby", report("send_lobby_message"))?;
            search(&lobbies, searched.clone())?;
            lobby_id = Some(lobby.id());
        }

        if searched.replace(false) {
            info!("search found lobbies {:?}", lobbies.lobby_ids()?);
        }

        match lobby_id {
            Some(id) if tick >= DELETE_AFTER_TICKS => {
                lobbies.delete_lobby(id, report("delete_lobby"))?;
                lobby_id = None;
            }
            // Let the delete completion arrive before stopping
            None if tick >= DELETE_AFTER_TICKS + 10 => return Ok(ControlFlow::Break(())),
            _ => {}
        }
        Ok(ControlFlow::Continue(()))
    })
}
