//! Holding relations. Both sides are plain handles.

use bevy_ecs::prelude::{Component, Entity};
use smallvec::SmallVec;

/// Mobs this one is holding.
#[derive(Component, Debug, Clone, Default)]
pub struct Holding {
    pub held: SmallVec<[Entity; 2]>,
}

impl Holding {
    pub fn is_holding(&self, mob: Entity) -> bool {
        self.held.contains(&mob)
    }

    pub fn remove(&mut self, mob: Entity) -> bool {
        match self.held.iter().position(|&e| e == mob) {
            Some(idx) => {
                self.held.remove(idx);
                true
            }
            None => false,
        }
    }
}

/// The mob holding this one, if any.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct HeldBy {
    pub holder: Option<Entity>,
}
