//! The emulator backend contract.
//!
//! The coordinator drives a backend; it never reimplements one. CPU and
//! PPU emulation, memory decoding, frame encoding, and screen-context
//! detection all live behind [`EmulatorBackend`], so the guard and the
//! loops stay agnostic about which emulator core (or test double) is
//! underneath.

use kanto_types::{Button, GameState, ScreenContext};

use crate::error::BackendError;

/// A drivable emulator core.
///
/// Implementations are driven exclusively through the guard, one caller
/// at a time, so methods take `&mut self` and need no internal locking.
/// `Send` is required because the guard moves between tasks.
pub trait EmulatorBackend: Send {
    /// Boot the emulated session (load ROM, reset the core).
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] if the core cannot start.
    fn start(&mut self) -> Result<(), BackendError>;

    /// Shut the emulated session down.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] if teardown fails.
    fn stop(&mut self) -> Result<(), BackendError>;

    /// Whether the core is currently running.
    fn is_running(&self) -> bool;

    /// Advance the emulation by `frames` discrete steps.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] if the core faults or is stopped.
    fn tick(&mut self, frames: u64) -> Result<(), BackendError>;

    /// Capture the current frame as encoded image bytes.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] if capture or encoding fails.
    fn capture_frame(&mut self) -> Result<Vec<u8>, BackendError>;

    /// Read a game-state snapshot from emulated memory.
    ///
    /// The snapshot's `context` field is a placeholder here; the guard
    /// overwrites it with the result of [`detect_context`] so every
    /// snapshot it hands out is internally consistent.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] if the memory read fails.
    ///
    /// [`detect_context`]: EmulatorBackend::detect_context
    fn read_state(&mut self) -> Result<GameState, BackendError>;

    /// Press `button`, hold it, release it, and settle.
    ///
    /// Returns the number of frames the full cycle consumed so the guard
    /// can keep its frame counter authoritative.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] if input injection fails.
    fn press_and_release(&mut self, button: Button) -> Result<u64, BackendError>;

    /// Classify the screen the game is currently presenting.
    ///
    /// Detection is the backend's capability (pixel or memory based);
    /// the coordinator only consumes the result.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] if detection fails.
    fn detect_context(&mut self) -> Result<ScreenContext, BackendError>;
}
