//! Action execution pipeline.
//!
//! Turns requested action labels into guarded button presses and
//! reported outcomes. Failures never propagate as errors from here:
//! every problem becomes a `success: false` outcome with the message
//! attached, and a sequence always runs to completion regardless of
//! which steps fail.

use kanto_emu::EmulatorGuard;
use kanto_types::{ActionOutcome, SequenceOutcome};
use tracing::{debug, warn};

/// Executes one button action under the guard.
///
/// The guard is held for exactly one press/hold/release cycle. An
/// unknown label or an uninitialized emulator is reported in the
/// outcome, not raised.
pub async fn execute_one(guard: &EmulatorGuard, label: &str) -> ActionOutcome {
    match guard.press_and_release(label).await {
        Ok(frames) => {
            debug!(action = label, frames, "Action executed");
            ActionOutcome::succeeded(label)
        }
        Err(err) => {
            warn!(action = label, error = %err, "Action failed");
            ActionOutcome::failed(label, err.to_string())
        }
    }
}

/// Executes every step of `labels` in order, collecting per-step
/// outcomes.
///
/// `delay_frames` emulation frames are ticked between consecutive steps
/// (never after the last). The guard is acquired per step, so loops and
/// other callers interleave between steps rather than waiting out the
/// whole sequence. A failed step never aborts the remainder.
pub async fn execute_sequence(
    guard: &EmulatorGuard,
    labels: &[String],
    delay_frames: u64,
) -> SequenceOutcome {
    let mut steps = Vec::with_capacity(labels.len());
    for (index, label) in labels.iter().enumerate() {
        if index > 0 && delay_frames > 0 {
            if let Err(err) = guard.tick(delay_frames).await {
                debug!(error = %err, "Inter-step delay skipped");
            }
        }
        steps.push(execute_one(guard, label).await);
    }
    let outcome = SequenceOutcome::from_steps(steps);
    debug!(
        steps = outcome.steps.len(),
        success = outcome.success,
        "Sequence finished"
    );
    outcome
}
