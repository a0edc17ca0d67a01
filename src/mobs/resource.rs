//! Resources: carriable objects Pikmin take to the area's delivery point.

use bevy_ecs::prelude::*;

use crate::components::carry::Carry;
use crate::content::datanode::PropReader;
use crate::content::errors::{ContentError, ErrorReporter};
use crate::fsms::resource_fsm;
use crate::mobs::category::{CategoryInfo, CategoryStore, MobCategory};
use crate::mobs::mobtype::{CategoryProps, MobCategoryId, MobType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceState {
    IdleWaiting,
    IdleMoving,
    IdleStuck,
    IdleThrown,
    BeingDelivered,
    StayingAfterDelivery,
}

impl ResourceState {
    pub const COUNT: usize = 6;
}

/// What happens once a resource is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeliveryResult {
    /// Damages the area's delivery target.
    DamageMob,
    /// Adds to the score.
    #[default]
    AddPoints,
    /// Stays at the delivery point.
    Stay,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResourceProps {
    pub delivery_result: DeliveryResult,
    pub damage_mob_amount: f32,
    pub point_amount: i64,
    /// Vanishes when its carriers drop it.
    pub vanish_on_drop: bool,
    /// Seconds before vanishing. Zero vanishes at once.
    pub vanish_delay: f32,
}

impl Default for ResourceProps {
    fn default() -> Self {
        Self {
            delivery_result: DeliveryResult::AddPoints,
            damage_mob_amount: 1.0,
            point_amount: 1,
            vanish_on_drop: false,
            vanish_delay: 0.0,
        }
    }
}

pub struct ResourceCategory {
    info: CategoryInfo,
    store: CategoryStore,
}

impl Default for ResourceCategory {
    fn default() -> Self {
        Self {
            info: CategoryInfo {
                id: MobCategoryId::Resources,
                name: "Resource",
                plural_name: "Resources",
                folder_name: "resources",
            },
            store: CategoryStore::default(),
        }
    }
}

impl MobCategory for ResourceCategory {
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
        let mut mob_type = MobType::new(MobCategoryId::Resources);
        mob_type.radius = 10.0;
        mob_type.height = 10.0;
        mob_type.max_carriers = 1;
        mob_type.props = CategoryProps::Resource(ResourceProps::default());
        mob_type
    }

    fn create_fsm(&self, mob_type: &mut MobType) -> Result<(), Vec<ContentError>> {
        resource_fsm::create_fsm(mob_type)
    }

    fn load_cat_properties(
        &self,
        node: &PropReader<'_>,
        mob_type: &mut MobType,
        errors: &mut ErrorReporter,
    ) {
        let mut props = ResourceProps::default();
        props.delivery_result =
            node.parse_str("delivery_result", props.delivery_result, errors, |s| match s {
                "damage_mob" => Some(DeliveryResult::DamageMob),
                "add_points" => Some(DeliveryResult::AddPoints),
                "stay" => Some(DeliveryResult::Stay),
                _ => None,
            });
        props.damage_mob_amount = node.f32("damage_mob_amount", props.damage_mob_amount, errors);
        props.point_amount = node.f32("point_amount", props.point_amount as f32, errors) as i64;
        props.vanish_on_drop = node.bool("vanish_on_drop", props.vanish_on_drop, errors);
        props.vanish_delay = node.f32("vanish_delay", props.vanish_delay, errors);

        if mob_type.max_carriers == 0 {
            errors.report(ContentError::InvalidValue {
                source_name: node.source_name().to_string(),
                field: "max_carriers".to_string(),
                value: "0".to_string(),
            });
            mob_type.max_carriers = 1;
        }

        mob_type.props = CategoryProps::Resource(props);
    }

    fn insert_components(&self, world: &mut World, mob: Entity, _mob_type: &MobType) {
        if let Ok(mut entity) = world.get_entity_mut(mob) {
            entity.insert(Carry::default());
        }
    }
}
