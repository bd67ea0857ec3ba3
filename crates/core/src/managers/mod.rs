//! Per-feature managers
//!
//! Each manager borrows the [`Discord`](crate::Discord) it came from and
//! wraps one native function table. Synchronous methods return the native
//! status as a [`Result`](crate::Result); asynchronous methods register a
//! completion that receives the outcome during a later
//! [`run_callbacks`](crate::Discord::run_callbacks), and only fail directly
//! when the call could not be issued at all.

mod achievement;
mod activity;
mod application;
mod image;
mod lobby;
mod network;
mod overlay;
mod relationship;
mod storage;
mod store;
mod user;
mod voice;

pub use achievement::AchievementManager;
pub use activity::ActivityManager;
pub use application::ApplicationManager;
pub use image::ImageManager;
pub use lobby::{LobbyManager, LobbyMemberTransaction, LobbySearchQuery, LobbyTransaction};
pub use network::NetworkManager;
pub use overlay::OverlayManager;
pub use relationship::RelationshipManager;
pub use storage::{StorageManager, MAX_FILE_NAME_LEN};
pub use store::StoreManager;
pub use user::UserManager;
pub use voice::VoiceManager;

/// Declares a manager struct over one native function table
macro_rules! manager {
    ($(#[$meta:meta])* $name:ident => $table:ty) => {
        $(#[$meta])*
        pub struct $name<'a> {
            discord: &'a $crate::Discord,
            handle: ::std::ptr::NonNull<$table>,
        }

        impl<'a> $name<'a> {
            pub(crate) fn new(discord: &'a $crate::Discord, handle: ::std::ptr::NonNull<$table>) -> Self {
                Self { discord, handle }
            }
        }

        impl ::std::fmt::Debug for $name<'_> {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.debug_tuple(stringify!($name)).field(&self.handle).finish()
            }
        }
    };
}

pub(crate) use manager;
