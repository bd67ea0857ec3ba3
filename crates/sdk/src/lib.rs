//! Discord Game SDK - raw type definitions
//!
//! Byte-compatible declarations of everything `discord_game_sdk.h` exposes:
//! records, enum constants, function tables, event tables and the
//! `DiscordCreate` entry point. It has no dependencies and no behaviour.
//!
//! # Modules
//!
//! - [`types`] - Scalar typedefs and enum constants
//! - [`structs`] - Record layouts
//! - [`interfaces`] - Manager function tables and event tables
//! - [`params`] - `DiscordCreateParams` and the entry point signature
//! - [`versions`] - Version tags passed to `DiscordCreate`

pub mod interfaces;
pub mod params;
pub mod structs;
pub mod types;
pub mod versions;

pub use interfaces::*;
pub use params::*;
pub use structs::*;
pub use types::*;
pub use versions::{DISCORD_VERSION, MANAGER_VERSIONS};
