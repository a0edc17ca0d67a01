use bevy_ecs::prelude::{Entity, Resource};

use crate::math::Vec2;

/// Information about the area being played.
#[derive(Resource, Debug, Clone, Default)]
pub struct AreaInfo {
    pub name: String,
    /// Where carried resources are taken.
    pub delivery_point: Option<Vec2>,
    /// Mob that receives deliveries (damaged by `damage_mob` resources).
    pub delivery_target: Option<Entity>,
}

/// Points collected from deliveries.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct Score {
    pub points: i64,
}
