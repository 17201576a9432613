//! Error types for the session coordinator binary.
//!
//! [`EngineError`] is the top-level error type that wraps all failure
//! modes during engine startup and the demo run.

/// Top-level error for the coordinator binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: kanto_core::config::ConfigError,
    },

    /// A session operation failed.
    #[error("session error: {source}")]
    Session {
        /// The underlying session error.
        #[from]
        source: kanto_core::error::SessionError,
    },
}
