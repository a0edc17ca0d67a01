use bevy_ecs::prelude::Component;

use crate::math::Vec2;

/// Position of a mob on the area's ground plane.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct MapPosition {
    pub pos: Vec2,
}

impl MapPosition {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
        }
    }
}

impl From<Vec2> for MapPosition {
    fn from(pos: Vec2) -> Self {
        Self { pos }
    }
}
