use bevy_ecs::prelude::Component;
use smallvec::SmallVec;

/// Status effects applied to a mob, by name.
#[derive(Component, Debug, Clone, Default)]
pub struct Statuses {
    pub list: SmallVec<[String; 2]>,
}

impl Statuses {
    /// Applies a status. Applying one the mob already has does nothing.
    pub fn apply(&mut self, name: &str) -> bool {
        if self.has(name) {
            return false;
        }
        self.list.push(name.to_string());
        true
    }

    pub fn has(&self, name: &str) -> bool {
        self.list.iter().any(|s| s == name)
    }
}
