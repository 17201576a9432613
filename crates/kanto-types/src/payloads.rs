//! Broadcast payloads published by the session's background loops.
//!
//! Each payload is a self-contained message: subscribers that miss one
//! (lagged channel, late join) lose nothing they cannot recover from the
//! next publication.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::GameState;

// ---------------------------------------------------------------------------
// Loop payloads
// ---------------------------------------------------------------------------

/// Periodic game-state broadcast from the simulation loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateUpdate {
    /// Fresh snapshot read under the emulator guard.
    pub state: GameState,
    /// Attribution label of the policy active for this snapshot's context.
    pub active_policy: String,
}

/// Periodic screenshot broadcast from the frame loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameUpdate {
    /// Encoded frame bytes as produced by the backend.
    pub frame: Vec<u8>,
    /// Frame counter at capture time.
    pub frame_count: u64,
}

// ---------------------------------------------------------------------------
// Commentary
// ---------------------------------------------------------------------------

/// One attributed commentary line from a policy or an external caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentaryEntry {
    /// The commentary text, including any attribution prefix.
    pub text: String,
    /// When the entry was recorded.
    pub recorded_at: DateTime<Utc>,
}

impl CommentaryEntry {
    /// Records `text` with the current timestamp.
    pub fn now(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            recorded_at: Utc::now(),
        }
    }
}
