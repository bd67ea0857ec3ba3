//! Test fixtures over the in-process stub library

use dgs_engine::SdkLibrary;

use crate::types::CreateFlags;
use crate::Discord;

pub const CLIENT_ID: i64 = 123456789012345678;

pub fn library() -> SdkLibrary {
    SdkLibrary::from_entry_point(dgs_stub::discord_create, "dgs-stub")
}

/// A core over freshly reset stub state
pub fn discord() -> Discord {
    dgs_stub::reset();
    discord_keep_state()
}

/// A core over whatever the test already put in the stub
pub fn discord_keep_state() -> Discord {
    match Discord::create(library(), CLIENT_ID, CreateFlags::DEFAULT) {
        Ok(discord) => discord,
        Err(e) => panic!("stub core creation failed: {e}"),
    }
}
