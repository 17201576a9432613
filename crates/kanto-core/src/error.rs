//! Error types for session coordination.
//!
//! The taxonomy is deliberately flat: unknown actions and an
//! uninitialized emulator are reported back to the caller as failed
//! outcomes, loop faults are logged and terminate only the faulting
//! loop, and configuration races are prevented by construction rather
//! than detected. Nothing in this crate retries on its own.

use kanto_emu::EmulatorError;

/// Failure surfaced by a session facade operation.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// A guarded emulator operation failed.
    #[error("emulator error: {source}")]
    Emulator {
        /// The underlying emulator failure.
        #[from]
        source: EmulatorError,
    },
}
