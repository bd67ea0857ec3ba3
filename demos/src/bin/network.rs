//! Two clients in one process exchanging messages over peer networking
//!
//! Needs two Discord clients running, selected with `DISCORD_INSTANCE_ID`.

use std::cell::RefCell;
use std::ops::ControlFlow;
use std::rc::Rc;
use std::time::{Duration, Instant};

use dgs_core::{Discord, NetworkManager, Result, SdkConfig};
use tracing::info;

const RELIABLE: u8 = 0;
const UNRELIABLE: u8 = 1;
const CLOSE_AT: u32 = 30;
const STOP_AT: u32 = 40;
const SEND_INTERVAL: Duration = Duration::from_millis(500);

struct Game {
    instance: u32,
    discord: Discord,
    peer_id: u64,
    /// Latest route reported by the library, taken once handled
    route: Rc<RefCell<Option<String>>>,
    connected: bool,
}

impl Game {
    fn new(instance: u32, config: &SdkConfig) -> Result<Self> {
        std::env::set_var("DISCORD_INSTANCE_ID", instance.to_string());
        let discord = Discord::from_config(config)?;
        let network = discord.networking()?;

        let route: Rc<RefCell<Option<String>>> = Rc::default();
        let slot = route.clone();
        network.on_route_update(move |new_route| {
            info!("[discord {}] route: {}", instance, new_route);
            *slot.borrow_mut() = Some(new_route.to_string());
        });
        network.on_message(move |peer_id, channel_id, data| {
            info!(
                "[discord {}] received from {} on channel {}: {:?}",
                instance,
                peer_id,
                channel_id,
                String::from_utf8_lossy(data)
            );
        });

        let peer_id = network.peer_id()?;
        drop(network);
        Ok(Self {
            instance,
            discord,
            peer_id,
            route,
            connected: false,
        })
    }

    fn network(&self) -> Result<NetworkManager<'_>> {
        self.discord.networking()
    }

    /// React to a new route on `other`: connect to it the first time, update it afterwards
    fn follow(&mut self, other: &Game, route: &str) -> Result<()> {
        let network = self.network()?;
        if self.connected {
            network.update_peer(other.peer_id, route)?;
        } else {
            info!("[discord {}] connecting to peer {} on route {}", self.instance, other.peer_id, route);
            network.open_peer(other.peer_id, route)?;
            network.open_channel(other.peer_id, RELIABLE, true)?;
            network.open_channel(other.peer_id, UNRELIABLE, false)?;
            self.connected = true;
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    let config = dgs_demos::init()?;
    let mut game0 = Game::new(0, &config)?;
    let mut game1 = Game::new(1, &config)?;

    let mut sent = 0;
    let mut next_packet = Instant::now();

    loop {
        std::thread::sleep(Duration::from_millis(33));
        game0.discord.run_callbacks()?;
        game1.discord.run_callbacks()?;

        let route0 = game0.route.borrow_mut().take();
        if let Some(route) = route0 {
            game1.follow(&game0, &route)?;
        }
        let route1 = game1.route.borrow_mut().take();
        if let Some(route) = route1 {
            game0.follow(&game1, &route)?;
        }

        game0.network()?.flush()?;
        game1.network()?.flush()?;

        if !(game0.connected && game1.connected) || Instant::now() < next_packet {
            continue;
        }
        if sent == CLOSE_AT {
            info!("[discord {}] closing connection to peer {}", game1.instance, game0.peer_id);
            game1.network()?.close_peer(game0.peer_id)?;
        }
        if sent == STOP_AT {
            break;
        }

        let network = game0.network()?;
        network.send_message(game1.peer_id, RELIABLE, format!("reliable {}", sent).as_bytes())?;
        network.send_message(game1.peer_id, UNRELIABLE, format!("not reliable {}", sent).as_bytes())?;
        info!("[discord {}] sent two packets to {}", game0.instance, game1.peer_id);
        sent += 1;
        next_packet = Instant::now() + SEND_INTERVAL;
    }

    // Keep the pump alive briefly so the last packets get delivered
    dgs_demos::pump(&[&game0.discord, &game1.discord], Duration::from_millis(33), |tick| {
        Ok(if tick < 30 { ControlFlow::Continue(()) } else { ControlFlow::Break(()) })
    })
}
