//! Error types for pack-presets

/// Result type for pack-presets operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur outside the pure composition core
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Cannot determine working directory: {0}")]
    WorkingDir(std::io::Error),

    #[error("No usable port near {preferred}: {source}")]
    PortUnavailable {
        preferred: u16,
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
