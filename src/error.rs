//! Error types for flowmap.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using the crate error.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    // === Input errors ===
    #[error("Cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Dump is {len} bytes, too short for the 8-byte segment count")]
    MissingHeader { len: usize },

    #[error("Dump declares {declared} segments but only {available} complete records are present")]
    Truncated { declared: u64, available: u64 },

    #[error("Dump declares {declared} segments but has {extra} bytes past the last record")]
    TrailingBytes { declared: u64, extra: usize },

    // === Configuration errors ===
    #[error("Invalid map window: {0}")]
    InvalidWindow(String),

    // === Output errors ===
    #[error("Failed to encode image: {0}")]
    Encode(#[from] image::ImageError),

    #[error("Cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
