//! Exclusive access to the emulator.
//!
//! Every operation that touches the emulator goes through one
//! [`EmulatorGuard`]. The guard wraps the installed [`EmulatorHandle`] in
//! a single async mutex: acquire, perform one small bounded operation,
//! release. The tokio mutex queues waiters in arrival order, so a steady
//! stream of loop acquisitions cannot starve an externally requested
//! action.
//!
//! Nothing in this module holds the lock across a sleep or an await on
//! anything but the lock itself.

use kanto_types::{GameState, SessionStatus};
use tokio::sync::Mutex;

use crate::backend::EmulatorBackend;
use crate::error::EmulatorError;
use crate::handle::EmulatorHandle;

/// Serializes all emulator access through one async mutex.
///
/// Starts empty; [`install`](Self::install) puts a handle in place. Every
/// accessor that needs the emulator reports
/// [`EmulatorError::NotInitialized`] until then, except the liveness
/// queries which report an inert session.
#[derive(Default)]
pub struct EmulatorGuard {
    inner: Mutex<Option<EmulatorHandle>>,
}

impl EmulatorGuard {
    /// Creates an empty guard with no emulator installed.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(None),
        }
    }

    /// Installs a backend if no handle exists yet.
    ///
    /// Returns `true` when this call installed the handle, `false` when
    /// one was already in place (the existing session, including its
    /// frame counter, is left untouched).
    pub async fn install(&self, backend: Box<dyn EmulatorBackend>) -> bool {
        let mut guard = self.inner.lock().await;
        if guard.is_some() {
            return false;
        }
        *guard = Some(EmulatorHandle::new(backend));
        true
    }

    /// Runs `op` with exclusive access to the installed handle.
    ///
    /// The lock is held for exactly the duration of `op` and released on
    /// every exit path, success or failure.
    ///
    /// # Errors
    ///
    /// Returns [`EmulatorError::NotInitialized`] when no handle is
    /// installed, otherwise whatever `op` returns.
    pub async fn with<T, F>(&self, op: F) -> Result<T, EmulatorError>
    where
        F: FnOnce(&mut EmulatorHandle) -> Result<T, EmulatorError>,
    {
        let mut guard = self.inner.lock().await;
        match guard.as_mut() {
            Some(handle) => op(handle),
            None => Err(EmulatorError::NotInitialized),
        }
    }

    // -----------------------------------------------------------------------
    // Guarded operations
    // -----------------------------------------------------------------------

    /// Boot the installed emulator.
    ///
    /// # Errors
    ///
    /// Returns [`EmulatorError`] if uninstalled or the backend fails.
    pub async fn start(&self) -> Result<(), EmulatorError> {
        self.with(|emu| Ok(emu.start()?)).await
    }

    /// Stop the installed emulator.
    ///
    /// # Errors
    ///
    /// Returns [`EmulatorError`] if uninstalled or teardown fails.
    pub async fn shutdown(&self) -> Result<(), EmulatorError> {
        self.with(|emu| Ok(emu.shutdown()?)).await
    }

    /// Advance the emulation by `frames` steps.
    ///
    /// # Errors
    ///
    /// Returns [`EmulatorError`] if uninstalled or the backend faults.
    pub async fn tick(&self, frames: u64) -> Result<(), EmulatorError> {
        self.with(|emu| Ok(emu.tick(frames)?)).await
    }

    /// Capture a fresh frame.
    ///
    /// # Errors
    ///
    /// Returns [`EmulatorError`] if uninstalled or capture fails.
    pub async fn capture_frame(&self) -> Result<Vec<u8>, EmulatorError> {
        self.with(|emu| Ok(emu.capture_frame()?)).await
    }

    /// Read a fresh, context-stamped state snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`EmulatorError`] if uninstalled or the read fails.
    pub async fn read_state(&self) -> Result<GameState, EmulatorError> {
        self.with(|emu| Ok(emu.read_state()?)).await
    }

    /// Execute one press/hold/release cycle for `label`.
    ///
    /// Returns the frames the cycle consumed.
    ///
    /// # Errors
    ///
    /// Returns [`EmulatorError::UnknownAction`] for a label no button
    /// matches, [`EmulatorError::NotInitialized`] before install, or the
    /// backend's failure.
    pub async fn press_and_release(&self, label: &str) -> Result<u64, EmulatorError> {
        self.with(|emu| emu.press_and_release(label)).await
    }

    // -----------------------------------------------------------------------
    // Liveness queries
    // -----------------------------------------------------------------------

    /// Whether an emulator is installed and running.
    ///
    /// Reports `false` rather than erroring before install.
    pub async fn is_running(&self) -> bool {
        let guard = self.inner.lock().await;
        guard.as_ref().is_some_and(EmulatorHandle::is_running)
    }

    /// The authoritative frame counter, 0 before install.
    pub async fn frame_count(&self) -> u64 {
        let guard = self.inner.lock().await;
        guard.as_ref().map_or(0, EmulatorHandle::frame_count)
    }

    /// Liveness and frame count read under a single lock hold.
    pub async fn status(&self) -> SessionStatus {
        let guard = self.inner.lock().await;
        guard.as_ref().map_or(
            SessionStatus {
                running: false,
                frame_count: 0,
            },
            |handle| SessionStatus {
                running: handle.is_running(),
                frame_count: handle.frame_count(),
            },
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::stub::StubBackend;

    async fn started_guard() -> EmulatorGuard {
        let guard = EmulatorGuard::new();
        assert!(guard.install(Box::new(StubBackend::new("rom/kanto.gb"))).await);
        guard.start().await.unwrap();
        guard
    }

    #[tokio::test]
    async fn uninstalled_guard_reports_not_initialized() {
        let guard = EmulatorGuard::new();
        assert!(matches!(
            guard.tick(1).await,
            Err(EmulatorError::NotInitialized)
        ));
        assert!(!guard.is_running().await);
        assert_eq!(guard.frame_count().await, 0);

        let status = guard.status().await;
        assert!(!status.running);
        assert_eq!(status.frame_count, 0);
    }

    #[tokio::test]
    async fn second_install_leaves_the_first_session_in_place() {
        let guard = started_guard().await;
        guard.tick(7).await.unwrap();

        let installed = guard.install(Box::new(StubBackend::new("rom/other.gb"))).await;
        assert!(!installed);
        assert_eq!(guard.frame_count().await, 7);
    }

    #[tokio::test]
    async fn concurrent_ticks_serialize_to_an_exact_total() {
        const TASKS: u64 = 8;
        const TICKS_PER_TASK: u64 = 25;

        let guard = Arc::new(started_guard().await);
        let mut workers = Vec::new();
        for _ in 0..TASKS {
            let guard = Arc::clone(&guard);
            workers.push(tokio::spawn(async move {
                for _ in 0..TICKS_PER_TASK {
                    guard.tick(1).await.unwrap();
                }
            }));
        }
        for worker in workers {
            worker.await.unwrap();
        }

        // 8 tasks x 25 single-frame ticks, nothing lost to interleaving.
        assert_eq!(guard.frame_count().await, 200);
    }

    #[tokio::test]
    async fn press_routes_through_the_guard_and_counts_frames() {
        let guard = started_guard().await;
        let frames = guard.press_and_release("start").await.unwrap();
        assert_eq!(frames, 10);
        assert_eq!(guard.frame_count().await, 10);
    }

    #[tokio::test]
    async fn guard_stays_usable_after_a_failed_operation() {
        let guard = started_guard().await;
        assert!(guard.press_and_release("jump").await.is_err());
        guard.tick(1).await.unwrap();
        assert_eq!(guard.frame_count().await, 1);
    }

    #[tokio::test]
    async fn status_reflects_running_state_transitions() {
        let guard = started_guard().await;
        assert!(guard.status().await.running);
        guard.shutdown().await.unwrap();
        assert!(!guard.status().await.running);
    }
}
