//! Error types and status code mapping
//!
//! Every native call reports an `EDiscordResult`. Zero is success, every
//! other known code maps to exactly one [`SdkError`] variant.

use dgs_engine::LoadError;

use crate::config::ConfigError;
use crate::model::ModelError;

/// Result type for binding operations
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A non-success status code reported by the native library.
///
/// The discriminant is the native code, so `code()` and `from_code()` are
/// inverse to each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
#[repr(i32)]
pub enum SdkError {
    #[error("Discord isn't working")]
    ServiceUnavailable = 1,
    #[error("the SDK version is outdated")]
    InvalidVersion = 2,
    #[error("an internal error on transactional operations")]
    LockFailed = 3,
    #[error("something on our side went wrong")]
    InternalError = 4,
    #[error("the data you sent didn't match what we expect")]
    InvalidPayload = 5,
    #[error("that's not a thing you can do")]
    InvalidCommand = 6,
    #[error("you aren't authorized to do that")]
    InvalidPermissions = 7,
    #[error("couldn't fetch what you wanted")]
    NotFetched = 8,
    #[error("what you're looking for doesn't exist")]
    NotFound = 9,
    #[error("user already has a network connection open on that channel")]
    Conflict = 10,
    #[error("activity secrets must be unique and not match party id")]
    InvalidSecret = 11,
    #[error("join request for that user does not exist")]
    InvalidJoinSecret = 12,
    #[error("you accidentally set an ApplicationId in your UpdateActivity() payload")]
    NoEligibleActivity = 13,
    #[error("your game invite is no longer valid")]
    InvalidInvite = 14,
    #[error("the internal auth call failed for the user")]
    NotAuthenticated = 15,
    #[error("the user's bearer token is invalid")]
    InvalidAccessToken = 16,
    #[error("access token belongs to another application")]
    ApplicationMismatch = 17,
    #[error("something internally went wrong fetching image data")]
    InvalidDataUrl = 18,
    #[error("not valid Base64 data")]
    InvalidBase64 = 19,
    #[error("you're trying to access the list before creating a stable list with Filter()")]
    NotFiltered = 20,
    #[error("the lobby is full")]
    LobbyFull = 21,
    #[error("the secret you're using to connect is wrong")]
    InvalidLobbySecret = 22,
    #[error("file name is too long")]
    InvalidFilename = 23,
    #[error("file is too large")]
    InvalidFileSize = 24,
    #[error("the user does not have the right entitlement for this game")]
    InvalidEntitlement = 25,
    #[error("Discord is not installed")]
    NotInstalled = 26,
    #[error("Discord is not running")]
    NotRunning = 27,
    #[error("insufficient buffer space when trying to write")]
    InsufficientBuffer = 28,
    #[error("user cancelled the purchase flow")]
    PurchaseCanceled = 29,
    #[error("Discord guild does not exist")]
    InvalidGuild = 30,
    #[error("the event you're trying to subscribe to does not exist")]
    InvalidEvent = 31,
    #[error("Discord channel does not exist")]
    InvalidChannel = 32,
    #[error("the origin header on the socket does not match what you've registered")]
    InvalidOrigin = 33,
    #[error("you are calling that method too quickly")]
    RateLimited = 34,
    #[error("the OAuth2 process failed at some point")]
    OAuth2Error = 35,
    #[error("the user took too long selecting a channel for an invite")]
    SelectChannelTimeout = 36,
    #[error("took too long trying to fetch the guild")]
    GetGuildTimeout = 37,
    #[error("push to talk is required for this channel")]
    SelectVoiceForceRequired = 38,
    #[error("that push to talk shortcut is already registered")]
    CaptureShortcutAlreadyListening = 39,
    #[error("your application cannot update this achievement")]
    UnauthorizedForAchievement = 40,
    #[error("the gift code is not valid")]
    InvalidGiftCode = 41,
    #[error("something went wrong during the purchase flow")]
    PurchaseError = 42,
    #[error("purchase flow aborted because the SDK is being torn down")]
    TransactionAborted = 43,
}

impl SdkError {
    /// Every variant, in code order
    pub const ALL: [SdkError; 43] = [
        Self::ServiceUnavailable,
        Self::InvalidVersion,
        Self::LockFailed,
        Self::InternalError,
        Self::InvalidPayload,
        Self::InvalidCommand,
        Self::InvalidPermissions,
        Self::NotFetched,
        Self::NotFound,
        Self::Conflict,
        Self::InvalidSecret,
        Self::InvalidJoinSecret,
        Self::NoEligibleActivity,
        Self::InvalidInvite,
        Self::NotAuthenticated,
        Self::InvalidAccessToken,
        Self::ApplicationMismatch,
        Self::InvalidDataUrl,
        Self::InvalidBase64,
        Self::NotFiltered,
        Self::LobbyFull,
        Self::InvalidLobbySecret,
        Self::InvalidFilename,
        Self::InvalidFileSize,
        Self::InvalidEntitlement,
        Self::NotInstalled,
        Self::NotRunning,
        Self::InsufficientBuffer,
        Self::PurchaseCanceled,
        Self::InvalidGuild,
        Self::InvalidEvent,
        Self::InvalidChannel,
        Self::InvalidOrigin,
        Self::RateLimited,
        Self::OAuth2Error,
        Self::SelectChannelTimeout,
        Self::GetGuildTimeout,
        Self::SelectVoiceForceRequired,
        Self::CaptureShortcutAlreadyListening,
        Self::UnauthorizedForAchievement,
        Self::InvalidGiftCode,
        Self::PurchaseError,
        Self::TransactionAborted,
    ];

    /// Native status code of this error
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Look up the error for a native status code.
    ///
    /// Returns `None` for success (0) and for codes this binding doesn't know.
    pub fn from_code(code: i32) -> Option<Self> {
        let index = usize::try_from(code).ok()?.checked_sub(1)?;
        Self::ALL.get(index).copied()
    }
}

/// Error type for all binding operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The native library reported a known failure code
    #[error("{0} (status {code})", code = .0.code())]
    Sdk(#[from] SdkError),

    /// The native library reported a code outside the known table
    #[error("Unknown status code {0}")]
    UnknownStatus(i32),

    /// `DiscordCreate` did not report success
    #[error("DiscordCreate failed with status {code}")]
    CreateFailed { code: i32 },

    /// A slot in a native function table is null
    #[error("Native function `{0}` is not available")]
    MissingEntry(&'static str),

    /// The native library handed back a null object
    #[error("Native library returned a null {0}")]
    NullPointer(&'static str),

    /// The core object was already destroyed
    #[error("Core object has been destroyed")]
    Destroyed,

    /// A read returned a different number of bytes than expected
    #[error("Read {actual} bytes from {name:?}, expected {expected}")]
    SizeMismatch {
        name: String,
        expected: u64,
        actual: u64,
    },

    /// An argument can't be represented on the native side
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// An event table was bound with the wrong number of slots
    #[error("Event table {table} has {expected} slots, bound {actual}")]
    EventTableMismatch {
        table: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl Error {
    /// The native status code behind this error, if there is one
    pub fn status_code(&self) -> Option<i32> {
        match self {
            Self::Sdk(e) => Some(e.code()),
            Self::UnknownStatus(code) | Self::CreateFailed { code } => Some(*code),
            _ => None,
        }
    }

    /// The known SDK error behind this error, if there is one
    pub fn sdk_error(&self) -> Option<SdkError> {
        match self {
            Self::Sdk(e) => Some(*e),
            Self::CreateFailed { code } => SdkError::from_code(*code),
            _ => None,
        }
    }
}

/// Convert a native status code into a `Result`
pub fn check(code: i32) -> Result<()> {
    if code == dgs_sdk::DiscordResult_Ok {
        return Ok(());
    }
    match SdkError::from_code(code) {
        Some(err) => Err(Error::Sdk(err)),
        None => Err(Error::UnknownStatus(code)),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_code_bijection() {
        let mut seen = HashSet::new();
        for code in 1..=43 {
            let err = SdkError::from_code(code).unwrap();
            assert_eq!(err.code(), code);
            assert!(seen.insert(err), "{:?} mapped twice", err);
        }
        assert_eq!(seen.len(), SdkError::ALL.len());
    }

    #[test]
    fn test_all_is_in_code_order() {
        for (i, err) in SdkError::ALL.iter().enumerate() {
            assert_eq!(err.code() as usize, i + 1);
        }
    }

    #[test]
    fn test_from_code_out_of_range() {
        assert_eq!(SdkError::from_code(0), None);
        assert_eq!(SdkError::from_code(-1), None);
        assert_eq!(SdkError::from_code(44), None);
    }

    #[test]
    fn test_check() {
        assert!(check(0).is_ok());
        assert!(matches!(check(9), Err(Error::Sdk(SdkError::NotFound))));
        assert!(matches!(check(27), Err(Error::Sdk(SdkError::NotRunning))));
        assert!(matches!(check(1000), Err(Error::UnknownStatus(1000))));
    }

    #[test]
    fn test_error_display() {
        let err = Error::from(SdkError::LobbyFull);
        assert_eq!(err.to_string(), "the lobby is full (status 21)");
        assert_eq!(err.status_code(), Some(21));

        let err = Error::CreateFailed { code: 26 };
        assert_eq!(err.sdk_error(), Some(SdkError::NotInstalled));
    }
}
