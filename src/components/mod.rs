//! ECS components attached to mob entities.
//!
//! Submodules overview:
//! - [`airborne`] – height and vertical speed of mobs off the ground
//! - [`animation`] – which animation is playing and when it ends
//! - [`carry`] – carriers and destination of a carriable mob
//! - [`focus`] – the mob another mob is paying attention to
//! - [`health`] – current and maximum health
//! - [`holding`] – holder/held relations
//! - [`mapposition`] – position on the area's ground plane
//! - [`mob`] – the mob marker, its type and liveness
//! - [`movetarget`] – straight-line walking towards a point
//! - [`rotation`] – facing angle
//! - [`standingon`] – the walkable mob a mob stands on
//! - [`statuses`] – status effects by name
//! - [`timer`] – the script timer
//! - [`vars`] – script variables

pub mod airborne;
pub mod animation;
pub mod carry;
pub mod focus;
pub mod health;
pub mod holding;
pub mod mapposition;
pub mod mob;
pub mod movetarget;
pub mod rotation;
pub mod standingon;
pub mod statuses;
pub mod timer;
pub mod vars;
