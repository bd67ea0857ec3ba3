//! Error types for native library loading

use std::path::PathBuf;

/// Error type for loading the native Game SDK library
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The shared library could not be opened
    #[error("Failed to open {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: libloading::Error,
    },

    /// The library was opened but does not export the entry point
    #[error("Symbol {symbol} not found in {path:?}: {source}")]
    MissingSymbol {
        symbol: &'static str,
        path: PathBuf,
        #[source]
        source: libloading::Error,
    },
}
