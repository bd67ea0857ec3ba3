//! Safe bindings for the Discord Game SDK
//!
//! The native library exposes a C ABI made of function tables. This crate
//! wraps them:
//! - [`Discord`] owns the native core and drives callbacks
//! - [`managers`] wraps each per-feature table
//! - [`model`] gives typed views over the SDK's fixed-layout records
//! - [`events`] fans native event tables out to Rust listeners
//!
//! # Re-exports
//!
//! - [`sdk`] - raw C ABI declarations
//! - [`engine`] - locating and loading the native library

// Allow the crate to refer to itself as `dgs_core` for proc macro compatibility
extern crate self as dgs_core;

pub use dgs_engine as engine;
pub use dgs_sdk as sdk;

pub mod config;
pub mod discord;
pub mod error;
pub mod events;
pub mod logging;
pub mod managers;
pub mod model;
pub mod types;

mod completion;
mod ffi;

#[cfg(test)]
mod testing;

pub use config::{ConfigError, ConfigResult, SdkConfig};
pub use discord::Discord;
pub use error::{check, Error, Result, SdkError};
pub use events::ListenerKey;
pub use managers::*;
pub use model::{
    Activity, ActivityAssets, ActivityParty, ActivitySecrets, ActivityTimestamps, Entitlement,
    FileStat, ImageDimensions, ImageHandle, InputMode, Lobby, Model, ModelError, OAuth2Token,
    PartySize, Presence, Relationship, Sku, SkuPrice, User, UserAchievement,
};
pub use types::{
    ActivityActionType, ActivityJoinRequestReply, ActivityType, CreateFlags, EntitlementType,
    FfiEnum, ImageType, InputModeType, LobbySearchCast, LobbySearchComparison, LobbySearchDistance,
    LobbyType, LogLevel, PremiumType, RelationshipType, SkuType, Status, UserFlag,
};

pub use dgs_engine::{LoadError, SdkLibrary};

// Re-export macros
pub use dgs_macros::Model;
