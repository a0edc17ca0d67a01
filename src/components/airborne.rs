//! Vertical motion.
//!
//! A mob with an [`Airborne`] component is off the ground. The physics step
//! moves it, pulls it down with gravity and removes the component when it
//! lands, raising `Landed`.

use bevy_ecs::prelude::Component;

use crate::math::Vec2;

#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Airborne {
    /// Height above the ground.
    pub z: f32,
    pub speed_z: f32,
    /// Horizontal speed while in the air.
    pub speed: Vec2,
}

impl Airborne {
    /// Dropped from `z` with no speed.
    pub fn falling_from(z: f32) -> Self {
        Self {
            z,
            ..Default::default()
        }
    }
}
