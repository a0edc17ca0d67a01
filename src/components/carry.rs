//! Carrying state of a carriable mob.

use bevy_ecs::prelude::{Component, Entity};
use smallvec::SmallVec;

use crate::math::Vec2;

#[derive(Component, Debug, Clone, Default)]
pub struct Carry {
    pub carriers: SmallVec<[Entity; 4]>,
    /// Sum of the carriers' strength.
    pub strength: f32,
    pub is_moving: bool,
    pub destination: Option<Vec2>,
}

impl Carry {
    pub fn has_carrier(&self, mob: Entity) -> bool {
        self.carriers.contains(&mob)
    }
}
