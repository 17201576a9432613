//! Cancellable background loops.
//!
//! Two loops share the emulator through the guard:
//!
//! - the simulation loop advances emulation a couple of frames per
//!   iteration and broadcasts a fresh state snapshot whenever the frame
//!   counter crosses the refresh cadence
//! - the screenshot loop captures and broadcasts the current frame about
//!   once a second
//!
//! Each loop owns a cancellation flag checked once per iteration, so a
//! stop request takes effect at the next iteration boundary. A backend
//! fault is logged and terminates the faulting loop only; the sibling
//! loop and the rest of the session keep going. Nothing here restarts
//! automatically.
//!
//! The guard is never held across a sleep. Each iteration acquires it
//! once, does its small bounded work, and releases before sleeping.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use kanto_emu::{EmulatorError, EmulatorGuard};
use kanto_types::{FrameUpdate, GameState, StateUpdate};
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::config::LoopConfig;
use crate::dispatch::ControlBoard;
use crate::hub::SessionHub;

// ---------------------------------------------------------------------------
// Loop lifecycle types
// ---------------------------------------------------------------------------

/// How a background loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    /// The loop observed its stop flag and exited cleanly.
    Stopped,
    /// A guarded operation failed; the loop logged the fault and quit.
    Faulted,
}

/// A running background loop with its cancellation flag.
pub struct LoopHandle {
    name: &'static str,
    cancel: Arc<AtomicBool>,
    handle: JoinHandle<LoopExit>,
}

impl LoopHandle {
    /// The loop's name, for logs and diagnostics.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Asks the loop to stop at its next iteration boundary.
    pub fn request_stop(&self) {
        self.cancel.store(true, Ordering::Release);
    }

    /// Whether the loop task has already exited.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Waits for the loop task to exit.
    ///
    /// Call [`request_stop`](Self::request_stop) first for a prompt,
    /// clean exit.
    pub async fn join(self) -> LoopExit {
        self.handle.await.unwrap_or(LoopExit::Faulted)
    }
}

/// Cadence settings for the simulation loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimLoopConfig {
    /// Sleep between iterations.
    pub interval: Duration,
    /// Frames advanced per iteration.
    pub frames_per_iteration: u64,
    /// Broadcast a fresh snapshot when the frame counter is a multiple
    /// of this. 0 disables state refreshes.
    pub state_refresh_frames: u64,
}

impl Default for SimLoopConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(33),
            frames_per_iteration: 2,
            state_refresh_frames: 30,
        }
    }
}

impl From<&LoopConfig> for SimLoopConfig {
    fn from(config: &LoopConfig) -> Self {
        Self {
            interval: config.sim_interval(),
            frames_per_iteration: config.frames_per_iteration,
            state_refresh_frames: config.state_refresh_frames,
        }
    }
}

// ---------------------------------------------------------------------------
// Simulation loop
// ---------------------------------------------------------------------------

/// What one simulation iteration did under the guard.
enum SimStep {
    /// Emulator installed but not running; nothing advanced.
    Idle,
    /// Frames advanced, no refresh due.
    Advanced,
    /// Frames advanced and a fresh snapshot was read.
    Refreshed(GameState),
}

/// Spawns the simulation loop.
///
/// Per iteration, while the emulator runs: advance
/// `frames_per_iteration` frames, and when the counter lands on the
/// refresh cadence, read a fresh snapshot, recompute the active-policy
/// label, and broadcast a [`StateUpdate`]. An uninstalled emulator
/// idles the iteration quietly.
pub fn spawn_sim_loop(
    guard: Arc<EmulatorGuard>,
    board: Arc<ControlBoard>,
    hub: Arc<SessionHub>,
    config: SimLoopConfig,
) -> LoopHandle {
    let cancel = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cancel);

    let handle = tokio::spawn(async move {
        info!(
            interval_ms = u64::try_from(config.interval.as_millis()).unwrap_or(u64::MAX),
            frames_per_iteration = config.frames_per_iteration,
            state_refresh_frames = config.state_refresh_frames,
            "Simulation loop started"
        );

        loop {
            if flag.load(Ordering::Acquire) {
                info!("Simulation loop stopped");
                return LoopExit::Stopped;
            }

            let step = guard
                .with(|emu| {
                    if !emu.is_running() {
                        return Ok(SimStep::Idle);
                    }
                    emu.tick(config.frames_per_iteration)?;
                    let refresh_due = config.state_refresh_frames > 0
                        && emu
                            .frame_count()
                            .checked_rem(config.state_refresh_frames)
                            .is_some_and(|rem| rem == 0);
                    if refresh_due {
                        Ok(SimStep::Refreshed(emu.read_state()?))
                    } else {
                        Ok(SimStep::Advanced)
                    }
                })
                .await;

            match step {
                Ok(SimStep::Idle | SimStep::Advanced) => {}
                Ok(SimStep::Refreshed(state)) => {
                    let active_policy = board.resolve_label(state.context).await;
                    hub.publish_state(StateUpdate {
                        state,
                        active_policy,
                    });
                }
                Err(EmulatorError::NotInitialized) => {}
                Err(err) => {
                    error!(error = %err, "Simulation loop fault, terminating this loop");
                    return LoopExit::Faulted;
                }
            }

            tokio::time::sleep(config.interval).await;
        }
    });

    LoopHandle {
        name: "simulation",
        cancel,
        handle,
    }
}

// ---------------------------------------------------------------------------
// Screenshot loop
// ---------------------------------------------------------------------------

/// Spawns the screenshot loop.
///
/// Per iteration, while the emulator runs: capture the current frame
/// under the guard and broadcast a [`FrameUpdate`] stamped with the
/// frame counter at capture time.
pub fn spawn_frame_loop(
    guard: Arc<EmulatorGuard>,
    hub: Arc<SessionHub>,
    interval: Duration,
) -> LoopHandle {
    let cancel = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cancel);

    let handle = tokio::spawn(async move {
        info!(
            interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX),
            "Screenshot loop started"
        );

        loop {
            if flag.load(Ordering::Acquire) {
                info!("Screenshot loop stopped");
                return LoopExit::Stopped;
            }

            let captured = guard
                .with(|emu| {
                    if !emu.is_running() {
                        return Ok(None);
                    }
                    let frame = emu.capture_frame()?;
                    Ok(Some(FrameUpdate {
                        frame,
                        frame_count: emu.frame_count(),
                    }))
                })
                .await;

            match captured {
                Ok(None) => {}
                Ok(Some(update)) => {
                    hub.publish_frame(update);
                }
                Err(EmulatorError::NotInitialized) => {}
                Err(err) => {
                    error!(error = %err, "Screenshot loop fault, terminating this loop");
                    return LoopExit::Faulted;
                }
            }

            tokio::time::sleep(interval).await;
        }
    });

    LoopHandle {
        name: "screenshot",
        cancel,
        handle,
    }
}
