//! Pikmin: the small followers that drink, ride, carry and hold tools.

use bevy_ecs::prelude::*;

use crate::components::mapposition::MapPosition;
use crate::content::datanode::PropReader;
use crate::content::errors::{ContentError, ErrorReporter};
use crate::fsms::pikmin_fsm;
use crate::math::Vec2;
use crate::mobs::category::{CategoryInfo, CategoryStore, MobCategory};
use crate::mobs::mobtype::{CategoryProps, MobCategoryId, MobType, Team};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PikminState {
    Idling,
    Thrown,
    Drinking,
    RidingTrack,
    Carrying,
    Dying,
}

impl PikminState {
    pub const COUNT: usize = 6;
}

#[derive(Debug, Clone, PartialEq)]
pub struct PikminProps {
    /// How much weight one Pikmin of this type carries.
    pub carry_strength: f32,
    pub can_carry_tools: bool,
}

impl Default for PikminProps {
    fn default() -> Self {
        Self {
            carry_strength: 1.0,
            can_carry_tools: true,
        }
    }
}

#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Pikmin {
    /// 0 is leaf, then bud, then flower.
    pub maturity: u8,
    /// The mob this Pikmin is carrying, if any.
    pub carrying: Option<Entity>,
    /// Where it holds on, relative to the carried mob.
    pub carry_offset: Vec2,
}

pub struct PikminCategory {
    info: CategoryInfo,
    store: CategoryStore,
}

impl Default for PikminCategory {
    fn default() -> Self {
        Self {
            info: CategoryInfo {
                id: MobCategoryId::Pikmin,
                name: "Pikmin",
                plural_name: "Pikmin",
                folder_name: "pikmin",
            },
            store: CategoryStore::default(),
        }
    }
}

impl MobCategory for PikminCategory {
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
        let mut mob_type = MobType::new(MobCategoryId::Pikmin);
        mob_type.radius = 5.0;
        mob_type.height = 18.0;
        mob_type.max_health = 1.0;
        mob_type.move_speed = 80.0;
        mob_type.team = Team::Player;
        mob_type.props = CategoryProps::Pikmin(PikminProps::default());
        mob_type.class_tick = Some(pikmin_class_tick);
        mob_type
    }

    fn create_fsm(&self, mob_type: &mut MobType) -> Result<(), Vec<ContentError>> {
        pikmin_fsm::create_fsm(mob_type)
    }

    fn load_cat_properties(
        &self,
        node: &PropReader<'_>,
        mob_type: &mut MobType,
        errors: &mut ErrorReporter,
    ) {
        let defaults = PikminProps::default();
        mob_type.props = CategoryProps::Pikmin(PikminProps {
            carry_strength: node.f32("carry_strength", defaults.carry_strength, errors),
            can_carry_tools: node.bool("can_carry_tools", defaults.can_carry_tools, errors),
        });
    }

    fn insert_components(&self, world: &mut World, mob: Entity, _mob_type: &MobType) {
        if let Ok(mut entity) = world.get_entity_mut(mob) {
            entity.insert(Pikmin::default());
        }
    }
}

/// Keeps a carrying Pikmin attached to what it carries.
fn pikmin_class_tick(world: &mut World, mob: Entity, _dt: f32) {
    let Some(pikmin) = world.get::<Pikmin>(mob).copied() else {
        return;
    };
    let Some(carried) = pikmin.carrying else {
        return;
    };
    let Some(carried_pos) = world.get::<MapPosition>(carried).map(|p| p.pos) else {
        return;
    };
    if let Some(mut pos) = world.get_mut::<MapPosition>(mob) {
        pos.pos = carried_pos + pikmin.carry_offset;
    }
}
