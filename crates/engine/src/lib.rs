//! dgs engine - native library loading
//!
//! This crate handles:
//! - Opening the Game SDK shared library at runtime via `libloading`
//! - Resolving the `DiscordCreate` entry point
//! - Wrapping an entry point that is already linked into the process
//!
//! # Ownership
//!
//! There is no process-wide library handle. An [`SdkLibrary`] is owned by
//! whoever creates the core object and must outlive it; dropping it unloads
//! the native code.

pub mod error;
pub mod loader;

pub use error::LoadError;
pub use loader::{LibraryOrigin, SdkLibrary, LIBRARY_FILE_NAME, LIBRARY_PATH_ENV};
