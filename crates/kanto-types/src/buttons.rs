//! The eight pad inputs of the emulated handheld.
//!
//! Buttons cross every layer of the coordinator: policies decide them, the
//! execution pipeline parses them from request labels, and the emulator
//! guard forwards them to the backend. The string form is always the
//! lowercase label (`"a"`, `"start"`, `"up"`, ...).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Button
// ---------------------------------------------------------------------------

/// One of the eight inputs on the emulated pad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Button {
    /// Primary action button (confirm, interact, attack).
    A,
    /// Secondary action button (cancel, back, run).
    B,
    /// Opens the pause menu.
    Start,
    /// Auxiliary menu button.
    Select,
    /// Directional pad up.
    Up,
    /// Directional pad down.
    Down,
    /// Directional pad left.
    Left,
    /// Directional pad right.
    Right,
}

impl Button {
    /// All buttons, in a stable order. Useful for picking a random input
    /// and for listing the valid labels in error messages.
    pub const ALL: [Self; 8] = [
        Self::A,
        Self::B,
        Self::Start,
        Self::Select,
        Self::Up,
        Self::Down,
        Self::Left,
        Self::Right,
    ];

    /// The four directional inputs, in a stable order.
    pub const DIRECTIONS: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Lowercase label used in requests, logs, and action histories.
    pub const fn label(self) -> &'static str {
        match self {
            Self::A => "a",
            Self::B => "b",
            Self::Start => "start",
            Self::Select => "select",
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    /// The reversing direction for the four arrows, `None` otherwise.
    ///
    /// History-aware policies use this to avoid immediately undoing their
    /// previous directional move.
    pub const fn opposite(self) -> Option<Self> {
        match self {
            Self::Up => Some(Self::Down),
            Self::Down => Some(Self::Up),
            Self::Left => Some(Self::Right),
            Self::Right => Some(Self::Left),
            Self::A | Self::B | Self::Start | Self::Select => None,
        }
    }

    /// Whether this is one of the four directional inputs.
    pub const fn is_direction(self) -> bool {
        matches!(self, Self::Up | Self::Down | Self::Left | Self::Right)
    }
}

impl fmt::Display for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when a request label names no known button.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown button '{label}' (valid: a, b, start, select, up, down, left, right)")]
pub struct UnknownButton {
    /// The label that failed to parse.
    pub label: String,
}

impl FromStr for Button {
    type Err = UnknownButton;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "a" => Ok(Self::A),
            "b" => Ok(Self::B),
            "start" => Ok(Self::Start),
            "select" => Ok(Self::Select),
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            other => Err(UnknownButton {
                label: other.to_string(),
            }),
        }
    }
}
