//! Fetches the current user's avatar and saves the raw RGBA pixels

use std::cell::{Cell, RefCell};
use std::ops::ControlFlow;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use dgs_core::{Discord, ImageHandle, Result};
use tracing::{info, warn};

const AVATAR_SIZE: u32 = 256;

fn main() -> Result<()> {
    let config = dgs_demos::init()?;
    let discord = Discord::from_config(&config)?;
    let users = discord.users()?;
    let images = discord.images()?;

    let user_ready = Rc::new(Cell::new(false));
    let flag = user_ready.clone();
    users.on_current_user_update(move || flag.set(true));

    let fetched: Rc<RefCell<Option<ImageHandle>>> = Rc::default();

    dgs_demos::pump(&[&discord], Duration::from_millis(100), |_| {
        if user_ready.replace(false) {
            let user = users.current_user()?;
            info!("hello, {}#{}!", user.username(), user.discriminator());

            let slot = fetched.clone();
            images.fetch(ImageHandle::user_avatar(user.id(), AVATAR_SIZE), true, move |result| {
                match result {
                    Ok(handle) => *slot.borrow_mut() = Some(handle),
                    Err(e) => warn!("failed to fetch the image: {}", e),
                }
            })?;
        }

        let Some(handle) = fetched.borrow_mut().take() else {
            return Ok(ControlFlow::Continue(()));
        };
        info!("fetched {:?}", handle);

        let dimensions = images.dimensions(&handle)?;
        let data = images.data(&handle)?;
        info!("{}x{}, {} bytes of RGBA", dimensions.width(), dimensions.height(), data.len());

        let path = PathBuf::from(format!("avatar_{}.rgba", handle.id()));
        match std::fs::write(&path, &data) {
            Ok(()) => info!("wrote {:?}", path),
            Err(e) => warn!("failed to write {:?}: {}", path, e),
        }
        Ok(ControlFlow::Break(()))
    })
}
