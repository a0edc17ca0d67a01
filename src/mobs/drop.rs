//! Drops: nectar, sprays and the like. Pikmin or leaders that touch one drink
//! a dose and get its effect.

use bevy_ecs::prelude::*;
use std::sync::Arc;

use crate::components::airborne::Airborne;
use crate::components::mob::{Mob, mark_for_deletion};
use crate::content::datanode::PropReader;
use crate::content::errors::{ContentError, ErrorReporter};
use crate::fsms::drop_fsm;
use crate::mobs::category::{CategoryInfo, CategoryStore, MobCategory};
use crate::mobs::mobtype::{CategoryProps, MobCategoryId, MobType};
use crate::resources::gameconfig::tuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropState {
    Falling,
    Landing,
    Idling,
    Bumped,
}

impl DropState {
    pub const COUNT: usize = 4;
}

/// Who can drink a drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DropConsumer {
    #[default]
    Pikmin,
    Leaders,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DropEffect {
    /// Raises the drinker's maturity.
    #[default]
    Maturate,
    /// Gives the drinker sprays.
    IncreaseSprays,
    /// Applies a status to the drinker.
    GiveStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DropProps {
    pub consumer: DropConsumer,
    pub effect: DropEffect,
    pub total_doses: usize,
    pub increase_amount: i32,
    pub spray_type_to_increase: String,
    pub status_to_give: String,
    /// Scale lost per second once it runs out of doses.
    pub shrink_speed: f32,
}

impl Default for DropProps {
    fn default() -> Self {
        Self {
            consumer: DropConsumer::Pikmin,
            effect: DropEffect::Maturate,
            total_doses: 1,
            increase_amount: 2,
            spray_type_to_increase: String::new(),
            status_to_give: String::new(),
            shrink_speed: 1.0,
        }
    }
}

/// Live state of a drop.
#[derive(Component, Debug, Clone, Copy)]
pub struct DropInfo {
    pub doses_left: usize,
    /// Visual scale. Shrinks to zero once the doses run out.
    pub cur_scale: f32,
}

/// The drop a mob is drinking, kept until the drink is over.
#[derive(Component, Debug, Clone)]
pub struct DrinkingFrom {
    pub drop_type: Arc<MobType>,
}

pub struct DropCategory {
    info: CategoryInfo,
    store: CategoryStore,
}

impl Default for DropCategory {
    fn default() -> Self {
        Self {
            info: CategoryInfo {
                id: MobCategoryId::Drops,
                name: "Drop",
                plural_name: "Drops",
                folder_name: "drops",
            },
            store: CategoryStore::default(),
        }
    }
}

impl MobCategory for DropCategory {
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
        let mut mob_type = MobType::new(MobCategoryId::Drops);
        mob_type.radius = 8.0;
        mob_type.height = 8.0;
        mob_type.props = CategoryProps::Drop(DropProps::default());
        mob_type.class_tick = Some(drop_class_tick);
        mob_type
    }

    fn create_fsm(&self, mob_type: &mut MobType) -> Result<(), Vec<ContentError>> {
        drop_fsm::create_fsm(mob_type)
    }

    fn load_cat_properties(
        &self,
        node: &PropReader<'_>,
        mob_type: &mut MobType,
        errors: &mut ErrorReporter,
    ) {
        let mut props = DropProps::default();
        props.consumer = node.parse_str("consumer", props.consumer, errors, |s| match s {
            "pikmin" => Some(DropConsumer::Pikmin),
            "leaders" => Some(DropConsumer::Leaders),
            _ => None,
        });
        props.effect = node.parse_str("effect", props.effect, errors, |s| match s {
            "maturate" => Some(DropEffect::Maturate),
            "increase_sprays" => Some(DropEffect::IncreaseSprays),
            "give_status" => Some(DropEffect::GiveStatus),
            _ => None,
        });
        props.total_doses = node.usize("total_doses", props.total_doses, errors);
        props.increase_amount = node.f32("increase_amount", props.increase_amount as f32, errors) as i32;
        props.spray_type_to_increase = node.string("spray_to_increase", "", errors);
        props.status_to_give = node.string("status_to_give", "", errors);
        props.shrink_speed = node.f32("shrink_speed", props.shrink_speed, errors);

        if props.effect == DropEffect::IncreaseSprays && props.spray_type_to_increase.is_empty() {
            errors.report(ContentError::InvalidValue {
                source_name: node.source_name().to_string(),
                field: "spray_to_increase".to_string(),
                value: String::new(),
            });
        }
        if props.effect == DropEffect::GiveStatus && props.status_to_give.is_empty() {
            errors.report(ContentError::InvalidValue {
                source_name: node.source_name().to_string(),
                field: "status_to_give".to_string(),
                value: String::new(),
            });
        }

        mob_type.props = CategoryProps::Drop(props);
    }

    fn insert_components(&self, world: &mut World, mob: Entity, mob_type: &MobType) {
        let total_doses = mob_type.drop_props().map(|p| p.total_doses).unwrap_or(1);
        let spawn_height = tuning(world).drop_spawn_height;
        let Ok(mut entity) = world.get_entity_mut(mob) else {
            return;
        };
        entity.insert(DropInfo {
            doses_left: total_doses,
            cur_scale: 1.0,
        });
        if spawn_height > 0.0 {
            entity.insert(Airborne::falling_from(spawn_height));
        }
    }
}

/// Shrinks an empty drop until it disappears.
fn drop_class_tick(world: &mut World, mob: Entity, dt: f32) {
    let shrink_speed = world
        .get::<Mob>(mob)
        .and_then(|m| m.mob_type.drop_props().map(|p| p.shrink_speed))
        .unwrap_or(1.0);
    let vanished = {
        let Some(mut info) = world.get_mut::<DropInfo>(mob) else {
            return;
        };
        if info.doses_left > 0 {
            return;
        }
        info.cur_scale = (info.cur_scale - shrink_speed * dt).max(0.0);
        info.cur_scale <= 0.0
    };
    if vanished {
        mark_for_deletion(world, mob);
    }
}
