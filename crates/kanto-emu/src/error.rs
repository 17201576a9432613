//! Error types for the emulator layer.
//!
//! Backend faults and guard-level failures are separated: a
//! [`BackendError`] describes what the emulator itself reported, while an
//! [`EmulatorError`] is what callers of the guard receive. Every variant
//! is reported to the caller; none aborts the session on its own.

use kanto_types::UnknownButton;

/// Failure reported by an emulator backend operation.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The backend hit an internal fault (I/O, core crash, bad read).
    #[error("backend fault: {message}")]
    Fault {
        /// Description of the fault.
        message: String,
    },

    /// The operation requires a running backend and it is stopped.
    #[error("backend is stopped")]
    Stopped,
}

/// Failure surfaced by the exclusive-access guard.
#[derive(Debug, thiserror::Error)]
pub enum EmulatorError {
    /// A request named an action label no button matches.
    #[error("{source}")]
    UnknownAction {
        /// The underlying parse failure, which lists the valid labels.
        #[from]
        source: UnknownButton,
    },

    /// No emulator handle has been installed yet.
    #[error("emulator not initialized")]
    NotInitialized,

    /// The backend reported a fault during a guarded operation.
    #[error("emulator backend error: {source}")]
    Backend {
        /// The underlying backend failure.
        #[from]
        source: BackendError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_action_message_lists_valid_labels() {
        let err = EmulatorError::from(UnknownButton {
            label: "jump".to_string(),
        });
        let text = err.to_string();
        assert!(text.contains("unknown button 'jump'"));
        assert!(text.contains("valid: a, b, start"));
    }

    #[test]
    fn backend_fault_is_wrapped_with_context() {
        let err = EmulatorError::from(BackendError::Fault {
            message: "screen capture failed".to_string(),
        });
        assert_eq!(
            err.to_string(),
            "emulator backend error: backend fault: screen capture failed"
        );
    }
}
