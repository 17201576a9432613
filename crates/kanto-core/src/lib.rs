//! Session coordination for the Kanto emulation stack.
//!
//! This crate owns everything between the emulator guard and a transport
//! layer: policy dispatch, action execution, background loops, broadcast
//! feeds, and the session facade that ties them together.
//!
//! # Modules
//!
//! - [`config`] -- Configuration loading from `kanto-config.yaml` into
//!   strongly-typed structs.
//! - [`dispatch`] -- [`ControlBoard`]: mode/role resolution, policy
//!   instance registry, and attributed decisions.
//! - [`error`] -- [`SessionError`].
//! - [`hub`] -- [`SessionHub`]: broadcast channels for state, frame, and
//!   commentary updates, plus the bounded commentary log.
//! - [`loops`] -- Cancellable simulation and screenshot loops.
//! - [`pipeline`] -- Single-action and sequence execution with per-step
//!   outcomes.
//! - [`session`] -- [`Session`], the facade a transport layer consumes.
//!
//! [`ControlBoard`]: dispatch::ControlBoard
//! [`SessionError`]: error::SessionError
//! [`SessionHub`]: hub::SessionHub
//! [`Session`]: session::Session

pub mod config;
pub mod dispatch;
pub mod error;
pub mod hub;
pub mod loops;
pub mod pipeline;
pub mod session;
