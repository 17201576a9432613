//! Game state snapshots.
//!
//! A [`GameState`] is an immutable snapshot composed by the emulator guard
//! from the backend's memory read plus its context detection. Consumers
//! never mutate a snapshot; they request a fresh one.

use serde::{Deserialize, Serialize};

use crate::enums::ScreenContext;

// ---------------------------------------------------------------------------
// TeamMember
// ---------------------------------------------------------------------------

/// One creature in the player's party.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    /// Display name as read from game memory.
    pub name: String,
    /// Current level.
    pub level: u32,
    /// Current hit points.
    pub hp: u32,
    /// Maximum hit points.
    pub max_hp: u32,
}

impl TeamMember {
    /// Whether current HP is strictly below `percent` percent of max HP.
    ///
    /// Integer-only so the comparison is exact. A member with a `max_hp`
    /// of 0 is treated as fully depleted.
    pub fn hp_below_percent(&self, percent: u32) -> bool {
        if self.max_hp == 0 {
            return true;
        }
        let scaled = u64::from(self.hp)
            .checked_mul(100)
            .unwrap_or(u64::MAX);
        scaled < u64::from(self.max_hp).saturating_mul(u64::from(percent))
    }

    /// Whether this member can still fight.
    pub const fn is_conscious(&self) -> bool {
        self.hp > 0
    }
}

// ---------------------------------------------------------------------------
// ItemSlot
// ---------------------------------------------------------------------------

/// One stack of items in the bag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSlot {
    /// Item name as read from game memory.
    pub name: String,
    /// How many of the item are held.
    pub count: u32,
}

// ---------------------------------------------------------------------------
// GameState
// ---------------------------------------------------------------------------

/// Snapshot of the observable game state at a single frame.
///
/// Produced fresh on every query; the `context` field is stamped by the
/// guard from the backend's context detection so one snapshot is always
/// internally consistent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// Current map or area name.
    pub location: String,
    /// Gym badges earned so far.
    pub badges: u32,
    /// Money on hand.
    pub money: u32,
    /// Party members in order.
    pub team: Vec<TeamMember>,
    /// Bag contents.
    pub items: Vec<ItemSlot>,
    /// The screen the game is presenting in this snapshot.
    pub context: ScreenContext,
}

impl GameState {
    /// The party lead, if any member is present.
    pub fn lead(&self) -> Option<&TeamMember> {
        self.team.first()
    }

    /// Whether any non-lead member is conscious and above half HP.
    ///
    /// Battle policies use this when weighing a switch over an attack.
    pub fn has_healthy_reserve(&self) -> bool {
        self.team
            .iter()
            .skip(1)
            .any(|member| member.is_conscious() && !member.hp_below_percent(50))
    }
}
