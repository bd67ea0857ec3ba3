//! Peer-to-peer networking over Discord's relay
//!
//! Peers are addressed by the peer id each side reports from
//! [`NetworkManager::peer_id`], and reached through the route data they
//! publish via [`NetworkManager::on_route_update`]. Channels are opened per
//! peer, reliable or unreliable; ordering across channels is whatever the
//! library provides.

use dgs_sdk as sdk;

use super::manager;
use crate::error::{check, Result};
use crate::events::ListenerKey;
use crate::ffi::{buffer_len, c_string, ffi_call};

manager! {
    /// Network manager
    NetworkManager => sdk::IDiscordNetworkManager
}

impl NetworkManager<'_> {
    /// This client's peer id
    pub fn peer_id(&self) -> Result<u64> {
        let mut peer_id = 0;
        ffi_call!(self.handle, get_peer_id(&mut peer_id))?;
        Ok(peer_id)
    }

    /// Send queued messages now; call once per frame after sending
    pub fn flush(&self) -> Result<()> {
        check(ffi_call!(self.handle, flush())?)
    }

    pub fn open_peer(&self, peer_id: u64, route: &str) -> Result<()> {
        let route = c_string(route, "route")?;
        check(ffi_call!(self.handle, open_peer(peer_id, route.as_ptr()))?)
    }

    /// Update a peer's route after it reported a new one
    pub fn update_peer(&self, peer_id: u64, route: &str) -> Result<()> {
        let route = c_string(route, "route")?;
        check(ffi_call!(self.handle, update_peer(peer_id, route.as_ptr()))?)
    }

    pub fn close_peer(&self, peer_id: u64) -> Result<()> {
        check(ffi_call!(self.handle, close_peer(peer_id))?)
    }

    pub fn open_channel(&self, peer_id: u64, channel_id: u8, reliable: bool) -> Result<()> {
        check(ffi_call!(self.handle, open_channel(peer_id, channel_id, reliable))?)
    }

    pub fn close_channel(&self, peer_id: u64, channel_id: u8) -> Result<()> {
        check(ffi_call!(self.handle, close_channel(peer_id, channel_id))?)
    }

    pub fn send_message(&self, peer_id: u64, channel_id: u8, data: &[u8]) -> Result<()> {
        let data_length = buffer_len(data)?;
        // The library only reads the buffer
        let data = data.as_ptr() as *mut u8;
        check(ffi_call!(self.handle, send_message(peer_id, channel_id, data, data_length))?)
    }

    /// Called with peer id, channel id and payload of each received message
    pub fn on_message(&self, callback: impl FnMut(u64, u8, &[u8]) + 'static) -> ListenerKey {
        self.discord.events().on_network_message(callback)
    }

    /// Called with this client's route whenever it changes; share it with peers
    pub fn on_route_update(&self, callback: impl FnMut(&str) + 'static) -> ListenerKey {
        self.discord.events().on_route_update(callback)
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
    fn test_peer_lifecycle() {
        let discord = testing::discord();
        dgs_stub::with(|stub| stub.peer_id = 0xfeed);

        let network = discord.networking().unwrap();
        assert_eq!(network.peer_id().unwrap(), 0xfeed);
        network.open_peer(7, "route-7").unwrap();
        network.open_channel(7, 0, true).unwrap();
        network.open_channel(7, 1, false).unwrap();
        network.send_message(7, 0, b"hello").unwrap();
        network.flush().unwrap();
        network.update_peer(7, "route-7b").unwrap();
        network.close_channel(7, 1).unwrap();
        network.close_peer(7).unwrap();

        dgs_stub::with(|stub| {
            let names: Vec<_> = stub.calls.iter().map(|c| c.name).collect();
            assert_eq!(
                names,
                vec![
                    "get_network_manager",
                    "get_peer_id",
                    "open_peer",
                    "open_channel",
                    "open_channel",
                    "send_message",
                    "flush",
                    "update_peer",
                    "close_channel",
                    "close_peer",
                ]
            );
            assert_eq!(stub.last_call("send_message").unwrap().data, b"hello");
            assert_eq!(stub.calls[4].args, ["7", "1", "false"]);
        });
    }

    #[test]
    fn test_send_error() {
        let discord = testing::discord();
        dgs_stub::with(|stub| stub.fail("send_message", sdk::DiscordResult_InvalidCommand));
        let err = discord.networking().unwrap().send_message(1, 0, b"x").unwrap_err();
        assert!(matches!(err, Error::Sdk(SdkError::InvalidCommand)));
    }

    #[test]
    fn test_message_and_route_events() {
        let discord = testing::discord();
        let network = discord.networking().unwrap();
        let messages = Rc::new(RefCell::new(Vec::new()));
        let routes = Rc::new(RefCell::new(Vec::new()));

        let sink = messages.clone();
        network.on_message(move |peer, channel, data| {
            sink.borrow_mut().push((peer, channel, data.to_vec()))
        });
        let sink = routes.clone();
        network.on_route_update(move |route| sink.borrow_mut().push(route.to_string()));

        dgs_stub::fire_network_message(9, 2, b"ping");
        dgs_stub::fire_route_update("{\"address\":\"127.0.0.1\"}");
        discord.run_callbacks().unwrap();

        assert_eq!(*messages.borrow(), vec![(9, 2, b"ping".to_vec())]);
        assert_eq!(*routes.borrow(), vec!["{\"address\":\"127.0.0.1\"}".to_string()]);
    }
}
