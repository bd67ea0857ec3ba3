//! Config path resolution

use std::path::PathBuf;

/// Environment variable overriding the config file location
pub const CONFIG_PATH_ENV: &str = "DISCORD_GAME_SDK_CONFIG";

/// File name used when no override is set
pub const CONFIG_FILE_NAME: &str = "discord_game_sdk.toml";

/// Returns the config file path.
///
/// `$DISCORD_GAME_SDK_CONFIG` if set and non-empty, otherwise
/// `discord_game_sdk.toml` in the working directory.
pub fn default_path() -> PathBuf {
    match std::env::var_os(CONFIG_PATH_ENV) {
        Some(path) if !path.is_empty() => PathBuf::from(path),
        _ => PathBuf::from(".").join(CONFIG_FILE_NAME),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_path_file_name() {
        // Only meaningful without the override, which the test environment doesn't set
        if std::env::var_os(CONFIG_PATH_ENV).is_none() {
            assert!(default_path().ends_with(CONFIG_FILE_NAME));
        }
    }
}
