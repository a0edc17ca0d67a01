use bevy_ecs::prelude::Component;

use crate::math::Vec2;

/// The mob walks straight to `target`; `ReachedDestination` is raised on
/// arrival and the component is removed.
#[derive(Component, Debug, Clone, Copy)]
pub struct MoveTarget {
    pub target: Vec2,
    pub speed: f32,
}
