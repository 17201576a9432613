//! Deterministic in-memory emulator backend.
//!
//! [`StubBackend`] stands in for a real emulator core in tests and demos.
//! Everything it does is scripted and observable: screen contexts come
//! from a caller-provided script, frame bytes are a stamp of the internal
//! frame counter, every button press is recorded, and capture/read faults
//! can be injected after a chosen number of calls.

use std::sync::{Arc, Mutex};

use kanto_types::{Button, GameState, ItemSlot, ScreenContext, TeamMember};

use crate::backend::EmulatorBackend;
use crate::error::BackendError;

/// Frames a press is held before release.
const HOLD_FRAMES: u64 = 5;
/// Frames the core settles after release.
const SETTLE_FRAMES: u64 = 5;

/// Shared log of every button the stub received, in press order.
pub type InputLog = Arc<Mutex<Vec<Button>>>;

/// A scripted, fully deterministic emulator backend.
pub struct StubBackend {
    session_path: String,
    running: bool,
    frames: u64,
    script: Vec<ScreenContext>,
    cursor: usize,
    inputs: InputLog,
    captures: u64,
    reads: u64,
    fail_capture_after: Option<u64>,
    fail_read_after: Option<u64>,
}

impl StubBackend {
    /// Creates a stub for the given session path.
    ///
    /// The path is recorded for inspection but never read. With no
    /// context script, every detection returns
    /// [`ScreenContext::Overworld`].
    pub fn new(session_path: impl Into<String>) -> Self {
        Self {
            session_path: session_path.into(),
            running: false,
            frames: 0,
            script: Vec::new(),
            cursor: 0,
            inputs: Arc::new(Mutex::new(Vec::new())),
            captures: 0,
            reads: 0,
            fail_capture_after: None,
            fail_read_after: None,
        }
    }

    /// Scripts the contexts returned by successive detections.
    ///
    /// Entries are consumed in order; once exhausted, the last entry
    /// repeats forever.
    #[must_use]
    pub fn with_context_script(mut self, script: Vec<ScreenContext>) -> Self {
        self.script = script;
        self.cursor = 0;
        self
    }

    /// Makes every frame capture after the first `calls` fail.
    #[must_use]
    pub const fn fail_capture_after(mut self, calls: u64) -> Self {
        self.fail_capture_after = Some(calls);
        self
    }

    /// Makes every state read after the first `calls` fail.
    #[must_use]
    pub const fn fail_read_after(mut self, calls: u64) -> Self {
        self.fail_read_after = Some(calls);
        self
    }

    /// A handle onto the shared input log.
    ///
    /// Clone this out before installing the stub; the log keeps
    /// recording after the backend is boxed away behind the guard.
    pub fn input_log(&self) -> InputLog {
        Arc::clone(&self.inputs)
    }

    /// The session path this stub was created with.
    pub fn session_path(&self) -> &str {
        &self.session_path
    }

    fn record_input(&self, button: Button) {
        let mut log = match self.inputs.lock() {
            Ok(log) => log,
            Err(poisoned) => poisoned.into_inner(),
        };
        log.push(button);
    }

    fn placeholder_state(&self) -> GameState {
        GameState {
            location: "PALLET TOWN".to_string(),
            badges: 0,
            money: 3000,
            team: vec![TeamMember {
                name: "SQUIRTLE".to_string(),
                level: 5,
                hp: 20,
                max_hp: 20,
            }],
            items: vec![ItemSlot {
                name: "POTION".to_string(),
                count: 1,
            }],
            // Placeholder tag; the guard stamps the detected context in.
            context: ScreenContext::Overworld,
        }
    }
}

impl EmulatorBackend for StubBackend {
    fn start(&mut self) -> Result<(), BackendError> {
        self.running = true;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), BackendError> {
        self.running = false;
        Ok(())
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn tick(&mut self, frames: u64) -> Result<(), BackendError> {
        if !self.running {
            return Err(BackendError::Stopped);
        }
        self.frames = self.frames.saturating_add(frames);
        Ok(())
    }

    fn capture_frame(&mut self) -> Result<Vec<u8>, BackendError> {
        if !self.running {
            return Err(BackendError::Stopped);
        }
        self.captures = self.captures.saturating_add(1);
        if self
            .fail_capture_after
            .is_some_and(|calls| self.captures > calls)
        {
            return Err(BackendError::Fault {
                message: "frame capture failed".to_string(),
            });
        }
        Ok(format!("frame:{:08}", self.frames).into_bytes())
    }

    fn read_state(&mut self) -> Result<GameState, BackendError> {
        if !self.running {
            return Err(BackendError::Stopped);
        }
        self.reads = self.reads.saturating_add(1);
        if self.fail_read_after.is_some_and(|calls| self.reads > calls) {
            return Err(BackendError::Fault {
                message: "state read failed".to_string(),
            });
        }
        Ok(self.placeholder_state())
    }

    fn press_and_release(&mut self, button: Button) -> Result<u64, BackendError> {
        if !self.running {
            return Err(BackendError::Stopped);
        }
        self.record_input(button);
        self.tick(HOLD_FRAMES)?;
        self.tick(SETTLE_FRAMES)?;
        Ok(HOLD_FRAMES.saturating_add(SETTLE_FRAMES))
    }

    fn detect_context(&mut self) -> Result<ScreenContext, BackendError> {
        if !self.running {
            return Err(BackendError::Stopped);
        }
        let context = match self.script.get(self.cursor) {
            Some(&context) => {
                self.cursor = self.cursor.saturating_add(1);
                context
            }
            None => self
                .script
                .last()
                .copied()
                .unwrap_or(ScreenContext::Overworld),
        };
        Ok(context)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn operations_require_a_running_backend() {
        let mut stub = StubBackend::new("rom/kanto.gb");
        assert!(matches!(stub.tick(1), Err(BackendError::Stopped)));
        assert!(matches!(stub.capture_frame(), Err(BackendError::Stopped)));
        assert!(matches!(stub.read_state(), Err(BackendError::Stopped)));
        assert!(matches!(
            stub.press_and_release(Button::A),
            Err(BackendError::Stopped)
        ));
    }

    #[test]
    fn context_script_plays_in_order_then_repeats_the_last_entry() {
        let mut stub = StubBackend::new("rom/kanto.gb").with_context_script(vec![
            ScreenContext::Overworld,
            ScreenContext::Battle,
        ]);
        stub.start().unwrap();

        assert_eq!(stub.detect_context().unwrap(), ScreenContext::Overworld);
        assert_eq!(stub.detect_context().unwrap(), ScreenContext::Battle);
        assert_eq!(stub.detect_context().unwrap(), ScreenContext::Battle);
        assert_eq!(stub.detect_context().unwrap(), ScreenContext::Battle);
    }

    #[test]
    fn empty_script_detects_overworld_forever() {
        let mut stub = StubBackend::new("rom/kanto.gb");
        stub.start().unwrap();
        assert_eq!(stub.detect_context().unwrap(), ScreenContext::Overworld);
        assert_eq!(stub.detect_context().unwrap(), ScreenContext::Overworld);
    }

    #[test]
    fn presses_are_logged_and_cost_ten_frames() {
        let mut stub = StubBackend::new("rom/kanto.gb");
        let log = stub.input_log();
        stub.start().unwrap();

        assert_eq!(stub.press_and_release(Button::Up).unwrap(), 10);
        assert_eq!(stub.press_and_release(Button::A).unwrap(), 10);
        assert_eq!(*log.lock().unwrap(), vec![Button::Up, Button::A]);
    }

    #[test]
    fn frame_bytes_stamp_the_internal_counter() {
        let mut stub = StubBackend::new("rom/kanto.gb");
        stub.start().unwrap();
        let first = stub.capture_frame().unwrap();
        stub.tick(30).unwrap();
        let second = stub.capture_frame().unwrap();
        assert_eq!(first, b"frame:00000000".to_vec());
        assert_eq!(second, b"frame:00000030".to_vec());
    }

    #[test]
    fn capture_fault_injection_trips_after_the_threshold() {
        let mut stub = StubBackend::new("rom/kanto.gb").fail_capture_after(2);
        stub.start().unwrap();
        assert!(stub.capture_frame().is_ok());
        assert!(stub.capture_frame().is_ok());
        assert!(matches!(
            stub.capture_frame(),
            Err(BackendError::Fault { .. })
        ));
    }

    #[test]
    fn read_fault_injection_trips_after_the_threshold() {
        let mut stub = StubBackend::new("rom/kanto.gb").fail_read_after(1);
        stub.start().unwrap();
        assert!(stub.read_state().is_ok());
        assert!(matches!(stub.read_state(), Err(BackendError::Fault { .. })));
    }

    #[test]
    fn placeholder_state_describes_a_fresh_session() {
        let mut stub = StubBackend::new("rom/kanto.gb");
        stub.start().unwrap();
        let state = stub.read_state().unwrap();
        assert_eq!(state.location, "PALLET TOWN");
        assert_eq!(state.team.first().unwrap().name, "SQUIRTLE");
        assert_eq!(state.money, 3000);
    }
}
