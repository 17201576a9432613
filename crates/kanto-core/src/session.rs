//! Session facade.
//!
//! [`Session`] owns the emulator guard, policy board, broadcast hub, and
//! background loop handles, and exposes the operations a transport layer
//! consumes: lifecycle, snapshots, action execution, decision steps, and
//! control reconfiguration. Everything here is cheap orchestration; the
//! real work happens in the subsystems.

use std::sync::Arc;

use kanto_emu::{EmulatorBackend, EmulatorError, EmulatorGuard};
use kanto_types::{
    ActionOutcome, Button, CommentaryEntry, EffectiveControls, FrameUpdate, SequenceOutcome,
    SessionStatus, StateUpdate,
};
use tokio::sync::{Mutex, broadcast};
use tracing::{info, warn};

use crate::config::KantoConfig;
use crate::dispatch::{ControlBoard, ControlsUpdate};
use crate::error::SessionError;
use crate::hub::SessionHub;
use crate::loops::{LoopHandle, SimLoopConfig, spawn_frame_loop, spawn_sim_loop};
use crate::pipeline;

/// One completed decision cycle, as returned by [`Session::step`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    /// The button the active policy chose.
    pub action: Button,
    /// The attributed commentary that was published for the decision.
    pub commentary: String,
    /// What executing the action produced.
    pub outcome: ActionOutcome,
}

/// A coordinated emulation session.
///
/// Cheap to share: wrap it in an [`Arc`] and hand clones of the guard
/// and hub to whoever needs them through the accessor methods.
pub struct Session {
    guard: Arc<EmulatorGuard>,
    board: Arc<ControlBoard>,
    hub: Arc<SessionHub>,
    loops: Mutex<Vec<LoopHandle>>,
    config: KantoConfig,
}

impl Session {
    /// Builds a session from `config`. No backend is installed and no
    /// loops run until [`start`](Self::start).
    pub fn new(config: KantoConfig) -> Self {
        let board = ControlBoard::new(
            config.controls.player,
            config.controls.pokemon,
            config.controls.mode,
            config.session.seed,
        );
        Self {
            guard: Arc::new(EmulatorGuard::new()),
            board: Arc::new(board),
            hub: Arc::new(SessionHub::new()),
            loops: Mutex::new(Vec::new()),
            config,
        }
    }

    /// The configuration this session was built from.
    pub const fn config(&self) -> &KantoConfig {
        &self.config
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Installs `backend` (unless one is already installed), starts the
    /// emulator, and spawns the background loops if none are live.
    ///
    /// Calling `start` on a running session is a no-op beyond a log
    /// line; the already-installed backend is kept and `backend` is
    /// dropped.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the emulator cannot start.
    pub async fn start(&self, backend: Box<dyn EmulatorBackend>) -> Result<(), SessionError> {
        if !self.guard.install(backend).await {
            info!("Backend already installed, keeping the existing one");
        }
        self.guard.start().await?;

        let mut loops = self.loops.lock().await;
        if loops.is_empty() {
            loops.push(spawn_sim_loop(
                Arc::clone(&self.guard),
                Arc::clone(&self.board),
                Arc::clone(&self.hub),
                SimLoopConfig::from(&self.config.loops),
            ));
            loops.push(spawn_frame_loop(
                Arc::clone(&self.guard),
                Arc::clone(&self.hub),
                self.config.loops.frame_interval(),
            ));
        }
        info!(name = %self.config.session.name, "Session started");
        Ok(())
    }

    /// Stops both loops, waits for them to exit, and shuts the emulator
    /// down. Safe to call repeatedly, and before [`start`](Self::start).
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if emulator teardown fails. A session
    /// that was never started stops cleanly.
    pub async fn stop(&self) -> Result<(), SessionError> {
        let handles: Vec<LoopHandle> = {
            let mut loops = self.loops.lock().await;
            loops.drain(..).collect()
        };
        for handle in &handles {
            handle.request_stop();
        }
        for handle in handles {
            let name = handle.name();
            let exit = handle.join().await;
            info!(loop_name = name, exit = ?exit, "Background loop joined");
        }

        match self.guard.shutdown().await {
            Ok(()) | Err(EmulatorError::NotInitialized) => {}
            Err(err) => return Err(err.into()),
        }
        info!(name = %self.config.session.name, "Session stopped");
        Ok(())
    }

    /// Running flag and frame counter in one consistent snapshot.
    pub async fn status(&self) -> SessionStatus {
        self.guard.status().await
    }

    /// How many background loops are still live.
    pub async fn loops_running(&self) -> usize {
        let loops = self.loops.lock().await;
        loops.iter().filter(|handle| !handle.is_finished()).count()
    }

    // -----------------------------------------------------------------------
    // Snapshots
    // -----------------------------------------------------------------------

    /// Reads a fresh state snapshot and pairs it with the active-policy
    /// label for its screen context.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if no emulator is installed or the read
    /// fails.
    pub async fn state(&self) -> Result<StateUpdate, SessionError> {
        let state = self.guard.read_state().await?;
        let active_policy = self.board.resolve_label(state.context).await;
        Ok(StateUpdate {
            state,
            active_policy,
        })
    }

    /// Captures a fresh frame.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if no emulator is installed or the
    /// capture fails.
    pub async fn screenshot(&self) -> Result<Vec<u8>, SessionError> {
        Ok(self.guard.capture_frame().await?)
    }

    // -----------------------------------------------------------------------
    // Actions
    // -----------------------------------------------------------------------

    /// Publishes `commentary` (when given) and then executes one action.
    ///
    /// The commentary goes out before the press so subscribers see the
    /// narration ahead of its effect. Failures are reported in the
    /// returned outcome, never as an error.
    pub async fn execute_action(&self, label: &str, commentary: Option<&str>) -> ActionOutcome {
        if let Some(text) = commentary {
            self.hub.publish_commentary(text).await;
        }
        pipeline::execute_one(&self.guard, label).await
    }

    /// Publishes `commentary` (when given) and then runs a button
    /// sequence to completion, delaying
    /// `loops.sequence_delay_frames` between consecutive steps.
    pub async fn execute_sequence(
        &self,
        labels: &[String],
        commentary: Option<&str>,
    ) -> SequenceOutcome {
        if let Some(text) = commentary {
            self.hub.publish_commentary(text).await;
        }
        pipeline::execute_sequence(&self.guard, labels, self.config.loops.sequence_delay_frames)
            .await
    }

    /// Runs one full decision cycle: snapshot the game, let the active
    /// policy decide, publish the attributed commentary, execute the
    /// chosen action.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the state read or frame capture
    /// fails; a failed button press is reported in the outcome instead.
    pub async fn step(&self) -> Result<StepReport, SessionError> {
        let state = self.guard.read_state().await?;
        let screen = self.guard.capture_frame().await?;
        let decision = self.board.decide(&state, Some(&screen)).await;

        self.hub.publish_commentary(&decision.commentary).await;
        let outcome = pipeline::execute_one(&self.guard, decision.action.label()).await;
        if !outcome.success {
            warn!(
                action = %decision.action,
                error = outcome.error.as_deref().unwrap_or(""),
                "Decision step failed to execute"
            );
        }
        Ok(StepReport {
            action: decision.action,
            commentary: decision.commentary,
            outcome,
        })
    }

    // -----------------------------------------------------------------------
    // Controls and feeds
    // -----------------------------------------------------------------------

    /// Applies a partial controls change atomically and returns the
    /// effective configuration.
    pub async fn configure(&self, update: ControlsUpdate) -> EffectiveControls {
        self.board.apply(update).await
    }

    /// Current mode, slots, and active-policy label in one snapshot.
    pub async fn controls(&self) -> EffectiveControls {
        self.board.controls().await
    }

    /// The retained commentary log, oldest first.
    pub async fn commentary(&self) -> Vec<CommentaryEntry> {
        self.hub.commentary().await
    }

    /// Subscribes to state snapshot broadcasts.
    pub fn subscribe_states(&self) -> broadcast::Receiver<StateUpdate> {
        self.hub.subscribe_states()
    }

    /// Subscribes to frame broadcasts.
    pub fn subscribe_frames(&self) -> broadcast::Receiver<FrameUpdate> {
        self.hub.subscribe_frames()
    }

    /// Subscribes to commentary broadcasts.
    pub fn subscribe_commentary(&self) -> broadcast::Receiver<CommentaryEntry> {
        self.hub.subscribe_commentary()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use kanto_emu::StubBackend;
    use kanto_types::{Mode, PolicyKind};

    use super::*;
    use crate::config::LoopConfig;

    fn fast_config() -> KantoConfig {
        KantoConfig {
            loops: LoopConfig {
                sim_interval_ms: 1,
                frames_per_iteration: 2,
                state_refresh_frames: 30,
                frame_interval_ms: 1,
                sequence_delay_frames: 10,
            },
            ..KantoConfig::default()
        }
    }

    #[tokio::test]
    async fn operations_before_start_report_not_initialized() {
        let session = Session::new(fast_config());

        let err = session.state().await.unwrap_err();
        assert!(err.to_string().contains("not initialized"));

        let outcome = session.execute_action("a", None).await;
        assert!(!outcome.success);

        let status = session.status().await;
        assert!(!status.running);
        assert_eq!(status.frame_count, 0);
    }

    #[tokio::test]
    async fn start_spawns_both_loops_and_stop_reaps_them() {
        let session = Session::new(fast_config());
        session
            .start(Box::new(StubBackend::new("rom/kanto.gb")))
            .await
            .unwrap();

        assert_eq!(session.loops_running().await, 2);
        assert!(session.status().await.running);

        session.stop().await.unwrap();
        assert_eq!(session.loops_running().await, 0);
        assert!(!session.status().await.running);

        // A second stop is a clean no-op.
        session.stop().await.unwrap();
    }

    #[tokio::test]
    async fn step_publishes_commentary_before_the_press() {
        let session = Session::new(fast_config());
        session
            .start(Box::new(StubBackend::new("rom/kanto.gb")))
            .await
            .unwrap();

        let report = session.step().await.unwrap();
        assert!(report.outcome.success);
        assert!(report.commentary.starts_with("[Scout as Trainer] "));

        let log = session.commentary().await;
        assert_eq!(log.last().unwrap().text, report.commentary);

        session.stop().await.unwrap();
    }

    #[tokio::test]
    async fn configure_switches_the_decision_path() {
        let session = Session::new(fast_config());
        session
            .start(Box::new(StubBackend::new("rom/kanto.gb")))
            .await
            .unwrap();

        let effective = session
            .configure(ControlsUpdate {
                player_policy: Some(PolicyKind::Strategist),
                mode: Some(Mode::Single),
                ..ControlsUpdate::default()
            })
            .await;
        assert_eq!(effective.player_policy, PolicyKind::Strategist);
        assert_eq!(effective.mode, Mode::Single);

        let report = session.step().await.unwrap();
        assert!(report.commentary.starts_with("[Strategist] "));

        session.stop().await.unwrap();
    }
}
