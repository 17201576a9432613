//! Shared type definitions for the Kanto session coordinator.
//!
//! This crate is the single source of truth for the data shapes exchanged
//! between the emulator guard, the dispatch controller, the background
//! loops, and any transport layer sitting in front of them. Everything here
//! is plain data: serde-serializable, no I/O, no locking.
//!
//! # Modules
//!
//! - [`buttons`] -- The eight pad inputs and their string labels
//! - [`enums`] -- Screen contexts, roles, control modes, policy kinds
//! - [`state`] -- Game state snapshots (team, items, location, progress)
//! - [`outcomes`] -- Results of executing actions and reading session status
//! - [`payloads`] -- Broadcast payloads published by the background loops

pub mod buttons;
pub mod enums;
pub mod outcomes;
pub mod payloads;
pub mod state;

// Re-export all public types at crate root for convenience.
pub use buttons::{Button, UnknownButton};
pub use enums::{Mode, PolicyKind, Role, ScreenContext, UnknownMode, UnknownPolicy};
pub use outcomes::{ActionOutcome, EffectiveControls, SequenceOutcome, SessionStatus};
pub use payloads::{CommentaryEntry, FrameUpdate, StateUpdate};
pub use state::{GameState, ItemSlot, TeamMember};
