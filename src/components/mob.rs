//! Core mob components.

use bevy_ecs::prelude::{Component, Entity, World};
use std::sync::Arc;

use crate::mobs::mobtype::{MobCategoryId, MobType, Team};

/// Marks an entity as a mob and ties it to its type.
#[derive(Component, Debug, Clone)]
pub struct Mob {
    pub mob_type: Arc<MobType>,
    /// Set to remove the mob at the end of the tick.
    pub to_delete: bool,
    pub time_alive: f32,
    pub team: Team,
}

impl Mob {
    pub fn new(mob_type: Arc<MobType>) -> Self {
        let team = mob_type.team;
        Self {
            mob_type,
            to_delete: false,
            time_alive: 0.0,
            team,
        }
    }

    pub fn category(&self) -> MobCategoryId {
        self.mob_type.category
    }
}

/// Whether `mob` exists and is not marked for deletion.
pub fn is_alive(world: &World, mob: Entity) -> bool {
    world.get::<Mob>(mob).is_some_and(|m| !m.to_delete)
}

pub fn category_of(world: &World, mob: Entity) -> Option<MobCategoryId> {
    world.get::<Mob>(mob).map(Mob::category)
}

pub fn mark_for_deletion(world: &mut World, mob: Entity) {
    if let Some(mut m) = world.get_mut::<Mob>(mob) {
        m.to_delete = true;
    }
}
