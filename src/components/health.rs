use bevy_ecs::prelude::Component;

#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    /// Sets the health, kept between zero and the maximum.
    pub fn set(&mut self, value: f32) {
        self.current = value.clamp(0.0, self.max.max(0.0));
    }

    /// Whether this mob is out of health. Mobs without health never are.
    pub fn is_depleted(&self) -> bool {
        self.max != 0.0 && self.current <= 0.0
    }
}
