//! Decision policies for the Kanto session coordinator.
//!
//! A policy turns a game-state snapshot (and optionally the current
//! screen) into one button press plus a human-readable rationale. The
//! dispatch layer treats policies as black boxes behind the [`Policy`]
//! trait: it picks one, asks it to decide under a [`Role`], and records
//! the chosen action into that instance's bounded [`ActionHistory`].
//!
//! Two built-ins ship here:
//!
//! - [`ScoutPolicy`] -- impulsive explorer, interacts often and wanders
//! - [`StrategistPolicy`] -- methodical, consults its history and never
//!   immediately retraces a directional move
//!
//! Both are seeded, so a fixed seed replays the same session.
//!
//! [`Role`]: kanto_types::Role

pub mod history;
pub mod policy;
pub mod scout;
pub mod strategist;

pub use history::ActionHistory;
pub use policy::{Decision, Policy, build_policy};
pub use scout::ScoutPolicy;
pub use strategist::StrategistPolicy;
