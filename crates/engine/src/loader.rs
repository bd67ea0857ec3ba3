//! Native library loading via `DiscordCreate`

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

use dgs_sdk::{
    DiscordCreateFn, DiscordCreateParams, DiscordVersion, EDiscordResult, IDiscordCore,
    DISCORD_CREATE_SYMBOL,
};
use libloading::Library;

use crate::error::LoadError;

/// Environment variable that overrides the library location
pub const LIBRARY_PATH_ENV: &str = "DISCORD_GAME_SDK_PATH";

/// Platform file name of the shared library
#[cfg(target_os = "windows")]
pub const LIBRARY_FILE_NAME: &str = "discord_game_sdk.dll";
#[cfg(target_os = "macos")]
pub const LIBRARY_FILE_NAME: &str = "discord_game_sdk.dylib";
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
pub const LIBRARY_FILE_NAME: &str = "discord_game_sdk.so";

/// Where an entry point came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LibraryOrigin {
    /// Opened at runtime from this path
    Dynamic(PathBuf),
    /// Supplied by the caller (statically linked library or test double)
    Static(&'static str),
}

impl fmt::Display for LibraryOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dynamic(path) => write!(f, "{}", path.display()),
            Self::Static(name) => write!(f, "{} (static)", name),
        }
    }
}

/// Handle to the native Game SDK.
///
/// Owns the loaded shared library for as long as the resolved entry point
/// may be called. Dropping it unloads the library, so it has to outlive
/// every core object created through it.
pub struct SdkLibrary {
    create: DiscordCreateFn,
    origin: LibraryOrigin,
    // Declared last so the entry point is never observable after unload
    _library: Option<Library>,
}

impl SdkLibrary {
    /// Open the library named by `DISCORD_GAME_SDK_PATH`, or the platform
    /// file name through the system loader search path.
    pub fn open_default() -> Result<Self, LoadError> {
        let path = std::env::var_os(LIBRARY_PATH_ENV)
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| OsString::from(LIBRARY_FILE_NAME));
        Self::open(PathBuf::from(path))
    }

    /// Open the library at `path` and resolve `DiscordCreate`
    #[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref().to_path_buf();

        // SAFETY: loading a library runs its initialisers. The Game SDK has
        // none with preconditions beyond being loaded once per path.
        let library = unsafe { Library::new(&path) }.map_err(|source| LoadError::Open {
            path: path.clone(),
            source,
        })?;

        // SAFETY: the symbol type matches the header declaration
        let create = unsafe {
            let symbol = library
                .get::<DiscordCreateFn>(DISCORD_CREATE_SYMBOL)
                .map_err(|source| LoadError::MissingSymbol {
                    symbol: "DiscordCreate",
                    path: path.clone(),
                    source,
                })?;
            *symbol
        };

        tracing::info!("DiscordCreate: {:p} from {}", create as *const (), path.display());

        Ok(Self {
            create,
            origin: LibraryOrigin::Dynamic(path),
            _library: Some(library),
        })
    }

    /// Wrap an entry point that is already linked into the process
    pub fn from_entry_point(create: DiscordCreateFn, name: &'static str) -> Self {
        tracing::debug!("DiscordCreate: {:p} from {}", create as *const (), name);
        Self {
            create,
            origin: LibraryOrigin::Static(name),
            _library: None,
        }
    }

    /// Where the entry point was resolved from
    pub fn origin(&self) -> &LibraryOrigin {
        &self.origin
    }

    /// Invoke `DiscordCreate`
    ///
    /// # Safety
    /// `params` must point to a valid parameter block whose event tables
    /// outlive the returned core, and `result` must be writable.
    pub unsafe fn create(
        &self,
        version: DiscordVersion,
        params: *mut DiscordCreateParams,
        result: *mut *mut IDiscordCore,
    ) -> EDiscordResult {
        (self.create)(version, params, result)
    }
}

impl fmt::Debug for SdkLibrary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SdkLibrary")
            .field("origin", &self.origin)
            .field("create", &(self.create as *const ()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::ptr;

    use dgs_sdk::{DiscordResult_InternalError, DiscordResult_Ok};

    use super::*;

    unsafe extern "C" fn fake_create(
        version: DiscordVersion,
        params: *mut DiscordCreateParams,
        result: *mut *mut IDiscordCore,
    ) -> EDiscordResult {
        if version != 2 || params.is_null() {
            return DiscordResult_InternalError;
        }
        *result = ptr::null_mut();
        DiscordResult_Ok
    }

    #[test]
    fn test_open_missing_library() {
        let err = SdkLibrary::open("/nonexistent/discord_game_sdk.so").unwrap_err();
        assert!(matches!(err, LoadError::Open { .. }));
        assert!(err.to_string().contains("/nonexistent/discord_game_sdk.so"));
    }

    #[test]
    fn test_static_entry_point() {
        let library = SdkLibrary::from_entry_point(fake_create, "fake");
        assert_eq!(library.origin(), &LibraryOrigin::Static("fake"));
        assert_eq!(library.origin().to_string(), "fake (static)");

        let mut params = DiscordCreateParams::default();
        let mut core = ptr::null_mut();
        let rc = unsafe { library.create(2, &mut params, &mut core) };
        assert_eq!(rc, DiscordResult_Ok);

        let rc = unsafe { library.create(1, &mut params, &mut core) };
        assert_eq!(rc, DiscordResult_InternalError);
    }

    #[test]
    fn test_library_file_name() {
        assert!(LIBRARY_FILE_NAME.starts_with("discord_game_sdk."));
    }
}
