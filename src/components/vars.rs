// Script variables, set by content scripts and read back by the engine.

use bevy_ecs::prelude::Component;
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, Default, Component)]
pub struct Vars {
    pub values: FxHashMap<String, String>,
}

impl Vars {
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
    pub fn get_f32(&self, key: &str) -> Option<f32> {
        self.get(key).and_then(|v| v.parse().ok())
    }
}
