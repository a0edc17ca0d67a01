//! Engine systems.
//!
//! Submodules overview
//! - [`deletion`] – end-of-tick removal of mobs marked for deletion
//! - [`interactions`] – touch detection between mobs and the events it raises
//! - [`mobtick`] – per-mob logic: first state entry, physics, animation,
//!   script checks and class ticks
//! - [`schedule`] – the ordered logic frame schedule
//! - [`time`] – update simulation time and delta

pub mod deletion;
pub mod interactions;
pub mod mobtick;
pub mod schedule;
pub mod time;
