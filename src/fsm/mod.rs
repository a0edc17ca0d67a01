//! Finite-state machine core shared by every mob.
//!
//! - [`event`] – event kinds and their payloads
//! - [`state`] – states, bindings and actions
//! - [`builder`] – declarative construction of state lists
//! - [`runtime`] – the per-mob cursor and the dispatcher
//! - [`script`] – content-authored actions and scripts

pub mod builder;
pub mod event;
pub mod runtime;
pub mod script;
pub mod state;
