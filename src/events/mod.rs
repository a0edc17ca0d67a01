//! Event types and observers used by the engine.
//!
//! Mob FSM events are not ECS events: they are raised directly on a mob
//! through [`crate::fsm::runtime::raise_event`]. The ECS events here cover
//! what the world as a whole needs to hear about.
//!
//! Submodules:
//! - [`mob`] – mob lifecycle notifications, and the observer that keeps
//!   cross-mob handles valid when a mob goes away
pub mod mob;
