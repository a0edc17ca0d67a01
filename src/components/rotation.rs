use bevy_ecs::prelude::Component;

/// Facing angle, in radians.
#[derive(Component, Clone, Debug, Copy, Default)]
pub struct Rotation {
    pub angle: f32,
}
