//! Results of executing actions and querying the session.

use serde::{Deserialize, Serialize};

use crate::enums::{Mode, PolicyKind};

// ---------------------------------------------------------------------------
// Action outcomes
// ---------------------------------------------------------------------------

/// Result of executing a single button action.
///
/// Failures are reported, never thrown: an unknown label or an
/// uninitialized emulator produce `success: false` with the error message
/// attached, and the caller decides what to do next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionOutcome {
    /// The requested action label, exactly as submitted.
    pub action: String,
    /// Whether the press completed.
    pub success: bool,
    /// Failure description when `success` is false.
    pub error: Option<String>,
}

impl ActionOutcome {
    /// A completed press of `action`.
    pub fn succeeded(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            success: true,
            error: None,
        }
    }

    /// A failed attempt at `action` with the failure description.
    pub fn failed(action: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            success: false,
            error: Some(error.into()),
        }
    }
}

/// Result of executing a sequence of button actions.
///
/// Every step is always attempted; `success` is true only when every
/// individual step succeeded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceOutcome {
    /// Whether every step succeeded.
    pub success: bool,
    /// Per-step outcomes, in submission order.
    pub steps: Vec<ActionOutcome>,
}

impl SequenceOutcome {
    /// Builds the overall outcome from per-step results.
    pub fn from_steps(steps: Vec<ActionOutcome>) -> Self {
        let success = steps.iter().all(|step| step.success);
        Self { success, steps }
    }
}

// ---------------------------------------------------------------------------
// Session status & controls readback
// ---------------------------------------------------------------------------

/// Coarse liveness snapshot of the emulation session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStatus {
    /// Whether the emulator is installed and running.
    pub running: bool,
    /// Frames advanced since the session started.
    pub frame_count: u64,
}

/// Consistent snapshot of the control configuration.
///
/// Returned by every configuration call so callers always see the full
/// effective setup rather than just the field they changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectiveControls {
    /// How decisions are divided between the two slots.
    pub mode: Mode,
    /// Policy handling non-battle decisions (and, in single mode, all).
    pub player_policy: PolicyKind,
    /// Policy handling battle decisions in dual mode.
    pub pokemon_policy: PolicyKind,
    /// Attribution label of the policy that made the most recent
    /// resolution, e.g. `"Scout (player)"`. Empty before any resolution.
    pub active_policy: String,
}
