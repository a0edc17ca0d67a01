//! Scales: walkable platforms that react to the weight on top of them.

use bevy_ecs::prelude::*;

use crate::components::mob::Mob;
use crate::components::standingon::StandingOn;
use crate::content::datanode::PropReader;
use crate::content::errors::{ContentError, ErrorReporter};
use crate::fsm::event::{EventInfo, MobEvent};
use crate::fsm::runtime::raise_event;
use crate::fsms::scale_fsm;
use crate::mobs::category::{CategoryInfo, CategoryStore, MobCategory};
use crate::mobs::mobtype::{CategoryProps, MobCategoryId, MobType};
use crate::resources::moblist::MobList;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleState {
    Idling,
    GoalReached,
}

impl ScaleState {
    pub const COUNT: usize = 2;
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScaleProps {
    /// Weight that counts as reaching the goal. Zero means no goal.
    pub goal_number: f32,
}

#[derive(Component, Debug, Clone, Copy, Default)]
pub struct ScaleInfo {
    pub cur_weight: f32,
}

pub struct ScaleCategory {
    info: CategoryInfo,
    store: CategoryStore,
}

impl Default for ScaleCategory {
    fn default() -> Self {
        Self {
            info: CategoryInfo {
                id: MobCategoryId::Scales,
                name: "Scale",
                plural_name: "Scales",
                folder_name: "scales",
            },
            store: CategoryStore::default(),
        }
    }
}

impl MobCategory for ScaleCategory {
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
        let mut mob_type = MobType::new(MobCategoryId::Scales);
        mob_type.radius = 40.0;
        mob_type.height = 8.0;
        mob_type.walkable = true;
        mob_type.props = CategoryProps::Scale(ScaleProps::default());
        mob_type.class_tick = Some(scale_class_tick);
        mob_type
    }

    fn create_fsm(&self, mob_type: &mut MobType) -> Result<(), Vec<ContentError>> {
        scale_fsm::create_fsm(mob_type)
    }

    fn load_cat_properties(
        &self,
        node: &PropReader<'_>,
        mob_type: &mut MobType,
        errors: &mut ErrorReporter,
    ) {
        mob_type.props = CategoryProps::Scale(ScaleProps {
            goal_number: node.f32("goal_number", 0.0, errors),
        });
        mob_type.walkable = true;
    }

    fn insert_components(&self, world: &mut World, mob: Entity, _mob_type: &MobType) {
        if let Ok(mut entity) = world.get_entity_mut(mob) {
            entity.insert(ScaleInfo::default());
        }
    }
}

/// Total weight of the live mobs standing on `scale`.
pub fn calculate_weight(world: &World, scale: Entity) -> f32 {
    let Some(list) = world.get_resource::<MobList>() else {
        return 0.0;
    };
    list.iter()
        .filter(|&&m| world.get::<StandingOn>(m).is_some_and(|s| s.target == Some(scale)))
        .filter_map(|&m| world.get::<Mob>(m))
        .filter(|m| !m.to_delete)
        .map(|m| m.mob_type.weight)
        .sum()
}

/// Raises `WeightAdded`/`WeightRemoved`, carrying the new weight, whenever
/// the weight on top changes.
fn scale_class_tick(world: &mut World, mob: Entity, _dt: f32) {
    let new_weight = calculate_weight(world, mob);
    let Some(mut info) = world.get_mut::<ScaleInfo>(mob) else {
        return;
    };
    let old_weight = info.cur_weight;
    if new_weight == old_weight {
        return;
    }
    info.cur_weight = new_weight;
    let event = if new_weight > old_weight {
        MobEvent::WeightAdded
    } else {
        MobEvent::WeightRemoved
    };
    raise_event(
        world,
        mob,
        event,
        &EventInfo::Amount(new_weight),
        &EventInfo::None,
    );
}
