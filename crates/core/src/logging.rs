//! Bridge from the native log hook to Rust handlers
//!
//! The library reports its own diagnostics through a single hook installed
//! with `set_log_hook`. [`Discord::forward_logs_to_tracing`] installs a
//! handler that re-emits them as `tracing` events under the
//! `discord_game_sdk` target.
//!
//! [`Discord::forward_logs_to_tracing`]: crate::Discord::forward_logs_to_tracing

use std::ffi::{c_char, c_void};
use std::panic::{catch_unwind, AssertUnwindSafe};

use dgs_sdk as sdk;

use crate::ffi::string_from_ptr;
use crate::types::{FfiEnum, LogLevel};

/// Tracing target used for forwarded native messages
pub const LOG_TARGET: &str = "discord_game_sdk";

/// Installed log handler, boxed twice so `hook_data` is a thin pointer
pub(crate) type LogHandler = Box<dyn FnMut(LogLevel, &str)>;

/// Re-emit a native message through `tracing`
pub fn forward_to_tracing(level: LogLevel, message: &str) {
    match level {
        LogLevel::Error => tracing::error!(target: LOG_TARGET, "{}", message),
        LogLevel::Warn => tracing::warn!(target: LOG_TARGET, "{}", message),
        LogLevel::Info => tracing::info!(target: LOG_TARGET, "{}", message),
        LogLevel::Debug => tracing::debug!(target: LOG_TARGET, "{}", message),
    }
}

pub(crate) unsafe extern "C" fn on_log(
    hook_data: *mut c_void,
    level: sdk::EDiscordLogLevel,
    message: *const c_char,
) {
    let Some(handler) = (hook_data as *mut LogHandler).as_mut() else {
        return;
    };
    let message = string_from_ptr(message);
    // Unknown severities are newer than this binding, treat them as chatter
    let level = LogLevel::from_ffi(level).unwrap_or(LogLevel::Debug);

    if catch_unwind(AssertUnwindSafe(|| handler(level, &message))).is_err() {
        tracing::error!("Log hook handler panicked");
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::ffi::CString;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn test_on_log_decodes_message() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let mut handler: Box<LogHandler> =
            Box::new(Box::new(move |level, message: &str| {
                sink.borrow_mut().push((level, message.to_string()))
            }));
        let data = &mut *handler as *mut LogHandler as *mut c_void;

        let message = CString::new("connection established").unwrap();
        unsafe {
            on_log(data, sdk::DiscordLogLevel_Warn, message.as_ptr());
            on_log(data, 42, message.as_ptr());
        }

        assert_eq!(
            *seen.borrow(),
            vec![
                (LogLevel::Warn, "connection established".to_string()),
                (LogLevel::Debug, "connection established".to_string()),
            ]
        );
    }

    #[test]
    fn test_on_log_null_data() {
        unsafe { on_log(std::ptr::null_mut(), sdk::DiscordLogLevel_Error, std::ptr::null()) };
    }
}
