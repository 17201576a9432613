//! Emulator handle: a backend plus session bookkeeping.
//!
//! The handle is only ever reachable through the [`EmulatorGuard`], so a
//! single caller holds it at a time. It owns the authoritative frame
//! counter, the running flag, and the most recent frame and state
//! snapshots.
//!
//! [`EmulatorGuard`]: crate::guard::EmulatorGuard

use kanto_types::{Button, GameState};
use tracing::{debug, info};

use crate::backend::EmulatorBackend;
use crate::error::{BackendError, EmulatorError};

/// An installed emulator session.
pub struct EmulatorHandle {
    backend: Box<dyn EmulatorBackend>,
    frame_count: u64,
    running: bool,
    last_frame: Option<Vec<u8>>,
    last_state: Option<GameState>,
}

impl EmulatorHandle {
    /// Wraps a backend into a fresh handle. Nothing is started yet.
    pub fn new(backend: Box<dyn EmulatorBackend>) -> Self {
        Self {
            backend,
            frame_count: 0,
            running: false,
            last_frame: None,
            last_state: None,
        }
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Boot the backend and mark the session running.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] if the backend cannot start.
    pub fn start(&mut self) -> Result<(), BackendError> {
        self.backend.start()?;
        self.running = true;
        info!("Emulator session started");
        Ok(())
    }

    /// Stop the backend and mark the session not running.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] if backend teardown fails.
    pub fn shutdown(&mut self) -> Result<(), BackendError> {
        self.backend.stop()?;
        self.running = false;
        info!(frame_count = self.frame_count, "Emulator session stopped");
        Ok(())
    }

    /// Whether the session was started and the backend agrees it runs.
    pub fn is_running(&self) -> bool {
        self.running && self.backend.is_running()
    }

    /// Frames advanced since the handle was created.
    pub const fn frame_count(&self) -> u64 {
        self.frame_count
    }

    // -----------------------------------------------------------------------
    // Guarded operations
    // -----------------------------------------------------------------------

    /// Advance the emulation by `frames` steps.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] if the backend faults.
    pub fn tick(&mut self, frames: u64) -> Result<(), BackendError> {
        self.backend.tick(frames)?;
        self.frame_count = self.frame_count.saturating_add(frames);
        Ok(())
    }

    /// Capture a fresh frame, caching it as the latest.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] if capture fails.
    pub fn capture_frame(&mut self) -> Result<Vec<u8>, BackendError> {
        let frame = self.backend.capture_frame()?;
        self.last_frame = Some(frame.clone());
        Ok(frame)
    }

    /// Read a fresh state snapshot with its context tag stamped in.
    ///
    /// Raw memory read and context detection happen back-to-back under
    /// the same guard hold, so the returned snapshot is never torn
    /// between two screens.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] if the read or the detection fails.
    pub fn read_state(&mut self) -> Result<GameState, BackendError> {
        let mut state = self.backend.read_state()?;
        state.context = self.backend.detect_context()?;
        self.last_state = Some(state.clone());
        Ok(state)
    }

    /// Parse `label` and run the full press/hold/release cycle.
    ///
    /// Returns the number of frames the cycle consumed; the frame
    /// counter has already been advanced by that amount.
    ///
    /// # Errors
    ///
    /// Returns [`EmulatorError::UnknownAction`] for an unrecognized
    /// label, or the backend's failure.
    pub fn press_and_release(&mut self, label: &str) -> Result<u64, EmulatorError> {
        let button: Button = label.parse()?;
        let frames = self.backend.press_and_release(button)?;
        self.frame_count = self.frame_count.saturating_add(frames);
        debug!(button = %button, frames, "Button press complete");
        Ok(frames)
    }

    // -----------------------------------------------------------------------
    // Cached snapshots
    // -----------------------------------------------------------------------

    /// The most recently captured frame, if any.
    pub fn last_frame(&self) -> Option<&[u8]> {
        self.last_frame.as_deref()
    }

    /// The most recently read state snapshot, if any.
    pub const fn last_state(&self) -> Option<&GameState> {
        self.last_state.as_ref()
    }
}
