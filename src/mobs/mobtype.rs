//! Mob type descriptors.
//!
//! A [`MobType`] is the immutable template behind every mob of one kind: its
//! physical properties, its animations, its compiled FSM and the properties
//! specific to its category. Types are built once by the content loader,
//! registered in their category and then shared as `Arc<MobType>` by the
//! registry and every live mob.

use bevy_ecs::prelude::{Entity, World};
use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::fsm::builder::CompiledFsm;
use crate::fsm::state::{StateDefinition, find_state_index};
use crate::mobs::drop::DropProps;
use crate::mobs::interactable::InteractableProps;
use crate::mobs::leader::LeaderProps;
use crate::mobs::pikmin::PikminProps;
use crate::mobs::resource::ResourceProps;
use crate::mobs::scale::ScaleProps;
use crate::mobs::tool::ToolProps;
use crate::mobs::track::TrackProps;

/// Stable id of a mob category. Doubles as the index into the category
/// manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MobCategoryId {
    #[default]
    None = 0,
    Pikmin,
    Leaders,
    Drops,
    Tracks,
    Tools,
    Resources,
    Scales,
    Interactables,
}

impl MobCategoryId {
    pub const COUNT: usize = 9;

    pub const ALL: [MobCategoryId; Self::COUNT] = [
        MobCategoryId::None,
        MobCategoryId::Pikmin,
        MobCategoryId::Leaders,
        MobCategoryId::Drops,
        MobCategoryId::Tracks,
        MobCategoryId::Tools,
        MobCategoryId::Resources,
        MobCategoryId::Scales,
        MobCategoryId::Interactables,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Allegiance of a mob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Team {
    #[default]
    None,
    Player,
    Enemy,
    Obstacle,
    Prop,
}

impl Team {
    /// Whether a mob of this team would attack a mob of `other`.
    pub fn is_opponent(self, other: Team) -> bool {
        matches!(
            (self, other),
            (Team::Player, Team::Enemy)
                | (Team::Enemy, Team::Player)
                | (Team::Player, Team::Obstacle)
                | (Team::Obstacle, Team::Player)
        )
    }
}

/// Timing of one animation, as far as the logic is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct AnimationInfo {
    /// Seconds per loop.
    pub duration: f32,
    #[serde(default)]
    pub looped: bool,
}

/// Properties only some categories have.
#[derive(Debug, Clone, Default)]
pub enum CategoryProps {
    #[default]
    None,
    Pikmin(PikminProps),
    Leader(LeaderProps),
    Drop(DropProps),
    Track(TrackProps),
    Tool(ToolProps),
    Resource(ResourceProps),
    Scale(ScaleProps),
    Interactable(InteractableProps),
}

/// Per-tick logic a category runs after the FSM step.
pub type ClassTickFn = fn(&mut World, Entity, f32);

#[derive(Debug, Clone)]
pub struct MobType {
    pub name: String,
    pub category: MobCategoryId,
    pub radius: f32,
    pub height: f32,
    pub weight: f32,
    /// Zero means the mob has no health at all.
    pub max_health: f32,
    pub move_speed: f32,
    pub max_carriers: usize,
    /// Other mobs can stand on top of it.
    pub walkable: bool,
    pub team: Team,
    pub animations: FxHashMap<String, AnimationInfo>,
    pub states: Vec<StateDefinition>,
    pub first_state_idx: usize,
    pub props: CategoryProps,
    pub class_tick: Option<ClassTickFn>,
}

impl MobType {
    /// A blank type. Content loading fills in the rest.
    pub fn new(category: MobCategoryId) -> Self {
        Self {
            name: String::new(),
            category,
            radius: 16.0,
            height: 32.0,
            weight: 1.0,
            max_health: 0.0,
            move_speed: 60.0,
            max_carriers: 0,
            walkable: false,
            team: Team::None,
            animations: FxHashMap::default(),
            states: Vec::new(),
            first_state_idx: 0,
            props: CategoryProps::None,
            class_tick: None,
        }
    }

    pub fn set_fsm(&mut self, fsm: CompiledFsm) {
        self.states = fsm.states;
        self.first_state_idx = fsm.first_state_idx;
    }

    pub fn state_index(&self, name: &str) -> Option<usize> {
        find_state_index(&self.states, name)
    }

    pub fn add_animation(&mut self, name: impl Into<String>, duration: f32, looped: bool) {
        self.animations
            .insert(name.into(), AnimationInfo { duration, looped });
    }

    pub fn pikmin_props(&self) -> Option<&PikminProps> {
        match &self.props {
            CategoryProps::Pikmin(p) => Some(p),
            _ => None,
        }
    }

    pub fn leader_props(&self) -> Option<&LeaderProps> {
        match &self.props {
            CategoryProps::Leader(p) => Some(p),
            _ => None,
        }
    }

    pub fn drop_props(&self) -> Option<&DropProps> {
        match &self.props {
            CategoryProps::Drop(p) => Some(p),
            _ => None,
        }
    }

    pub fn track_props(&self) -> Option<&TrackProps> {
        match &self.props {
            CategoryProps::Track(p) => Some(p),
            _ => None,
        }
    }

    pub fn tool_props(&self) -> Option<&ToolProps> {
        match &self.props {
            CategoryProps::Tool(p) => Some(p),
            _ => None,
        }
    }

    pub fn resource_props(&self) -> Option<&ResourceProps> {
        match &self.props {
            CategoryProps::Resource(p) => Some(p),
            _ => None,
        }
    }

    pub fn scale_props(&self) -> Option<&ScaleProps> {
        match &self.props {
            CategoryProps::Scale(p) => Some(p),
            _ => None,
        }
    }

    pub fn interactable_props(&self) -> Option<&InteractableProps> {
        match &self.props {
            CategoryProps::Interactable(p) => Some(p),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_ids_index_in_order() {
        for (i, id) in MobCategoryId::ALL.iter().enumerate() {
            assert_eq!(id.index(), i);
        }
    }

    #[test]
    fn only_fighting_teams_are_opponents() {
        assert!(Team::Player.is_opponent(Team::Enemy));
        assert!(Team::Enemy.is_opponent(Team::Player));
        assert!(!Team::Enemy.is_opponent(Team::Enemy));
        assert!(!Team::Player.is_opponent(Team::Prop));
        assert!(!Team::None.is_opponent(Team::Enemy));
    }
}
