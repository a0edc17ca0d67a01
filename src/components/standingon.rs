use bevy_ecs::prelude::{Component, Entity};

/// The walkable mob this one stands on, if any.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct StandingOn {
    pub target: Option<Entity>,
}
