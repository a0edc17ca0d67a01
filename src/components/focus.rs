use bevy_ecs::prelude::{Component, Entity};

/// The mob this one is paying attention to (a drop being drunk, a delivery
/// target, a message recipient...).
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Focus {
    pub target: Option<Entity>,
}
