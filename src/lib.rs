//! Mob behavior core library.
//!
//! This module exposes the mob FSM machinery, the mob categories, and the
//! ECS components, resources, systems and events they run on, for use by
//! the headless runner and the integration tests.

pub mod components;
pub mod content;
pub mod events;
pub mod fsm;
pub mod fsms;
pub mod gameplay;
pub mod math;
pub mod mobs;
pub mod resources;
pub mod systems;
