//! Enumeration types for session control.
//!
//! Covers the detected screen context consumed from the emulator backend,
//! the role a policy acts under, the control mode, and the registered
//! policy kinds.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// ScreenContext
// ---------------------------------------------------------------------------

/// The screen the game is currently presenting.
///
/// Context is detected by the emulator backend and consumed here; the
/// coordinator never derives it from pixels or memory itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreenContext {
    /// Walking around the world map.
    Overworld,
    /// An active battle screen.
    Battle,
    /// The pause menu.
    Menu,
    /// The party overview list.
    PartyList,
    /// The item (bag) menu.
    ItemMenu,
}

impl ScreenContext {
    /// Whether this context is a battle screen.
    ///
    /// Battle is the only context that flips the dispatch role; every other
    /// screen is treated as non-battle.
    pub const fn is_battle(self) -> bool {
        matches!(self, Self::Battle)
    }

    /// Snake-case label for logging and broadcast payloads.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Overworld => "overworld",
            Self::Battle => "battle",
            Self::Menu => "menu",
            Self::PartyList => "party_list",
            Self::ItemMenu => "item_menu",
        }
    }
}

impl fmt::Display for ScreenContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// The role a policy acts under for a single decision.
///
/// Computed fresh from `(mode, context)` on every decision and never
/// persisted between decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Acting as the trainer: navigation, menus, overworld interaction.
    Player,
    /// Acting as the creature in battle: moves, switches, items.
    Pokemon,
}

impl Role {
    /// Lowercase label for logging and broadcast payloads.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Player => "player",
            Self::Pokemon => "pokemon",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Mode
// ---------------------------------------------------------------------------

/// How decisions are divided between the two policy slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// The player slot handles every decision, battle or not.
    Single,
    /// The player slot handles non-battle screens, the pokemon slot
    /// handles battles.
    Dual,
}

impl Mode {
    /// Lowercase label for logging and configuration.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Dual => "dual",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when a string names no known control mode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown mode '{label}' (valid: single, dual)")]
pub struct UnknownMode {
    /// The label that failed to parse.
    pub label: String,
}

impl FromStr for Mode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single" => Ok(Self::Single),
            "dual" => Ok(Self::Dual),
            other => Err(UnknownMode {
                label: other.to_string(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// PolicyKind
// ---------------------------------------------------------------------------

/// A registered policy implementation.
///
/// Kinds identify policy instances in configuration and in broadcast
/// payloads; the display name is what rationale attribution prefixes use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyKind {
    /// Impulsive explorer: interacts often, wanders randomly.
    Scout,
    /// Methodical navigator: consults its own history, avoids backtracking.
    Strategist,
}

impl PolicyKind {
    /// Lowercase label for configuration and logging.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Scout => "scout",
            Self::Strategist => "strategist",
        }
    }

    /// Capitalized name used in rationale attribution prefixes.
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Scout => "Scout",
            Self::Strategist => "Strategist",
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when a string names no registered policy kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown policy '{label}' (valid: scout, strategist)")]
pub struct UnknownPolicy {
    /// The label that failed to parse.
    pub label: String,
}

impl FromStr for PolicyKind {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scout" => Ok(Self::Scout),
            "strategist" => Ok(Self::Strategist),
            other => Err(UnknownPolicy {
                label: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn battle_is_the_only_battle_context() {
        assert!(ScreenContext::Battle.is_battle());
        assert!(!ScreenContext::Overworld.is_battle());
        assert!(!ScreenContext::Menu.is_battle());
        assert!(!ScreenContext::PartyList.is_battle());
        assert!(!ScreenContext::ItemMenu.is_battle());
    }

    #[test]
    fn context_serializes_as_snake_case() {
        let json = serde_json::to_string(&ScreenContext::PartyList).unwrap();
        assert_eq!(json, "\"party_list\"");
        let back: ScreenContext = serde_json::from_str("\"item_menu\"").unwrap();
        assert_eq!(back, ScreenContext::ItemMenu);
    }

    #[test]
    fn mode_parses_lowercase_labels() {
        assert_eq!("single".parse::<Mode>().unwrap(), Mode::Single);
        assert_eq!("dual".parse::<Mode>().unwrap(), Mode::Dual);
        assert!("both".parse::<Mode>().is_err());
    }

    #[test]
    fn policy_kind_parses_and_displays() {
        let kind: PolicyKind = "strategist".parse().unwrap();
        assert_eq!(kind, PolicyKind::Strategist);
        assert_eq!(kind.to_string(), "strategist");
        assert_eq!(kind.display_name(), "Strategist");
        assert!("oracle".parse::<PolicyKind>().is_err());
    }
}
