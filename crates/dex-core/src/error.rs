use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the DEX reader.
///
/// Data-quality problems inside a log never surface here; they are coerced
/// by [`crate::data_processors`]. Only I/O, decoding and output failures do.
#[derive(Error, Debug)]
pub enum DexError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file was read but its bytes are not valid UTF-8 text.
    #[error("Unreadable input {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::string::FromUtf8Error,
    },

    /// An input argument looked like a glob but could not be compiled.
    #[error("Invalid input pattern {pattern}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    /// The CSV writer rejected a row or could not flush.
    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the dex crates.
pub type Result<T> = std::result::Result<T, DexError>;
