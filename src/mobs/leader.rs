//! Leaders: the captains. Besides their FSM they expose the actions a player
//! drives: whistling, throwing and interacting.

use bevy_ecs::prelude::*;
use log::debug;
use rustc_hash::FxHashMap;

use crate::components::airborne::Airborne;
use crate::components::mapposition::MapPosition;
use crate::components::mob::{Mob, is_alive};
use crate::content::datanode::PropReader;
use crate::content::errors::{ContentError, ErrorReporter};
use crate::fsm::event::{EventInfo, MobEvent};
use crate::fsm::runtime::{has_event_handler, raise_event};
use crate::fsms::leader_fsm;
use crate::math::Vec2;
use crate::mobs::category::{CategoryInfo, CategoryStore, MobCategory};
use crate::mobs::mobtype::{CategoryProps, MobCategoryId, MobType, Team};
use crate::resources::gameconfig::tuning;
use crate::resources::moblist::MobList;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaderState {
    Idling,
    Drinking,
    RidingTrack,
    Dying,
}

impl LeaderState {
    pub const COUNT: usize = 4;
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeaderProps {
    /// Initial vertical speed of thrown Pikmin.
    pub throw_speed_z: f32,
}

impl Default for LeaderProps {
    fn default() -> Self {
        Self {
            throw_speed_z: 400.0,
        }
    }
}

#[derive(Component, Debug, Clone, Default)]
pub struct Leader {
    /// Spray amounts, by spray type name.
    pub sprays: FxHashMap<String, u32>,
}

pub struct LeaderCategory {
    info: CategoryInfo,
    store: CategoryStore,
}

impl Default for LeaderCategory {
    fn default() -> Self {
        Self {
            info: CategoryInfo {
                id: MobCategoryId::Leaders,
                name: "Leader",
                plural_name: "Leaders",
                folder_name: "leaders",
            },
            store: CategoryStore::default(),
        }
    }
}

impl MobCategory for LeaderCategory {
    fn info(&self) -> &CategoryInfo {
        &self.info
    }
    fn store(&self) -> &CategoryStore {
        &self.store
    }
    fn store_mut(&mut self) -> &mut CategoryStore {
        &mut self.store
    }

    fn create_type(&self) -> MobType {
        let mut mob_type = MobType::new(MobCategoryId::Leaders);
        mob_type.radius = 10.0;
        mob_type.height = 46.0;
        mob_type.max_health = 2000.0;
        mob_type.move_speed = 130.0;
        mob_type.team = Team::Player;
        mob_type.props = CategoryProps::Leader(LeaderProps::default());
        mob_type
    }

    fn create_fsm(&self, mob_type: &mut MobType) -> Result<(), Vec<ContentError>> {
        leader_fsm::create_fsm(mob_type)
    }

    fn load_cat_properties(
        &self,
        node: &PropReader<'_>,
        mob_type: &mut MobType,
        errors: &mut ErrorReporter,
    ) {
        let defaults = LeaderProps::default();
        mob_type.props = CategoryProps::Leader(LeaderProps {
            throw_speed_z: node.f32("throw_speed_z", defaults.throw_speed_z, errors),
        });
    }

    fn insert_components(&self, world: &mut World, mob: Entity, _mob_type: &MobType) {
        if let Ok(mut entity) = world.get_entity_mut(mob) {
            entity.insert(Leader::default());
        }
    }
}

fn live_mobs_of(world: &World, category: MobCategoryId) -> Vec<Entity> {
    let Some(list) = world.get_resource::<MobList>() else {
        return Vec::new();
    };
    list.iter()
        .copied()
        .filter(|&m| {
            world
                .get::<Mob>(m)
                .is_some_and(|mob| !mob.to_delete && mob.category() == category)
        })
        .collect()
}

/// Whistles: every Pikmin within the whistle radius gets `Whistled`.
///
/// Returns how many Pikmin were reached.
pub fn whistle(world: &mut World, leader: Entity) -> usize {
    let Some(center) = world.get::<MapPosition>(leader).map(|p| p.pos) else {
        return 0;
    };
    let radius = tuning(world).whistle_radius;
    let reached: Vec<Entity> = live_mobs_of(world, MobCategoryId::Pikmin)
        .into_iter()
        .filter(|&p| {
            world
                .get::<MapPosition>(p)
                .is_some_and(|pos| pos.pos.distance(center) <= radius)
        })
        .collect();
    for &pikmin in &reached {
        raise_event(
            world,
            pikmin,
            MobEvent::Whistled,
            &EventInfo::Mob(leader),
            &EventInfo::None,
        );
    }
    debug!("{:?} whistled {} Pikmin", leader, reached.len());
    reached.len()
}

/// Throws `pikmin` so that it lands on `target`.
///
/// Only Pikmin whose current state reacts to being thrown are launched.
pub fn throw_pikmin(world: &mut World, leader: Entity, pikmin: Entity, target: Vec2) -> bool {
    if !is_alive(world, pikmin) || !has_event_handler(world, pikmin, MobEvent::Thrown) {
        return false;
    }
    if world.get::<Airborne>(pikmin).is_some() {
        return false;
    }
    let Some(start) = world.get::<MapPosition>(pikmin).map(|p| p.pos) else {
        return false;
    };
    let speed_z = world
        .get::<Mob>(leader)
        .and_then(|m| m.mob_type.leader_props().map(|p| p.throw_speed_z))
        .unwrap_or(LeaderProps::default().throw_speed_z);
    let gravity = tuning(world).gravity;
    let flight_time = if gravity > 0.0 {
        2.0 * speed_z / gravity
    } else {
        1.0
    };
    let speed = (target - start) * (1.0 / flight_time);

    if let Ok(mut entity) = world.get_entity_mut(pikmin) {
        entity.insert(Airborne {
            z: 0.0,
            speed_z,
            speed,
        });
    }
    raise_event(
        world,
        pikmin,
        MobEvent::Thrown,
        &EventInfo::Mob(leader),
        &EventInfo::None,
    );
    true
}

/// Interacts with the closest interactable in range, raising `Interaction`
/// on it.
pub fn interact(world: &mut World, leader: Entity) -> Option<Entity> {
    let center = world.get::<MapPosition>(leader)?.pos;
    let target = live_mobs_of(world, MobCategoryId::Interactables)
        .into_iter()
        .filter_map(|m| {
            let mob = world.get::<Mob>(m)?;
            let range = mob.mob_type.interactable_props()?.trigger_range + mob.mob_type.radius;
            let dist = world.get::<MapPosition>(m)?.pos.distance(center);
            (dist <= range).then_some((m, dist))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(m, _)| m)?;
    raise_event(
        world,
        target,
        MobEvent::Interaction,
        &EventInfo::Mob(leader),
        &EventInfo::None,
    );
    Some(target)
}
