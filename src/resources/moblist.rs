//! The authoritative list of live mobs.
//!
//! Mobs are iterated in list order every tick. New mobs are appended. Removal
//! always goes together with the category index: at the tick boundary, or
//! right away through `erase_mob`.

use bevy_ecs::prelude::{Entity, Resource};

#[derive(Resource, Debug, Default, Clone)]
pub struct MobList {
    mobs: Vec<Entity>,
}

impl MobList {
    pub fn push(&mut self, mob: Entity) {
        self.mobs.push(mob);
    }

    /// Removes `mob`, keeping the order of the others.
    pub fn remove(&mut self, mob: Entity) -> bool {
        match self.mobs.iter().position(|&m| m == mob) {
            Some(idx) => {
                self.mobs.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, mob: Entity) -> bool {
        self.mobs.contains(&mob)
    }

    pub fn len(&self) -> usize {
        self.mobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mobs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.mobs.iter()
    }

    pub fn as_slice(&self) -> &[Entity] {
        &self.mobs
    }

    pub fn clear(&mut self) {
        self.mobs.clear();
    }
}
