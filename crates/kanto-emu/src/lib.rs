//! Emulator backend contract and exclusive-access guard.
//!
//! The emulator is a single physical resource: one CPU, one screen, one
//! pad. Everything that touches it, a background loop advancing frames, a
//! screenshot capture, an externally requested button press, must do so
//! under the [`EmulatorGuard`], which serializes access through one async
//! mutex with first-come-first-served fairness.
//!
//! # Modules
//!
//! - [`backend`] -- The [`EmulatorBackend`] trait the guard drives
//! - [`handle`] -- [`EmulatorHandle`]: backend plus session bookkeeping
//! - [`guard`] -- [`EmulatorGuard`]: the exclusive-access wrapper
//! - [`stub`] -- [`StubBackend`]: deterministic in-memory test double
//! - [`error`] -- Backend and guard error types

pub mod backend;
pub mod error;
pub mod guard;
pub mod handle;
pub mod stub;

pub use backend::EmulatorBackend;
pub use error::{BackendError, EmulatorError};
pub use guard::EmulatorGuard;
pub use handle::EmulatorHandle;
pub use stub::StubBackend;
