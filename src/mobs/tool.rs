//! Tools: objects a Pikmin can pick up and hold. Their behavior is scripted
//! in content; the engine handles grabbing and dropping.

use bevy_ecs::prelude::*;

use crate::components::holding::HeldBy;
use crate::components::mapposition::MapPosition;
use crate::content::datanode::PropReader;
use crate::content::errors::ErrorReporter;
use crate::mobs::category::{CategoryInfo, CategoryStore, MobCategory};
use crate::mobs::mobtype::{CategoryProps, MobCategoryId, MobType};

#[derive(Debug, Clone, PartialEq)]
pub struct ToolProps {
    pub dropped_when_pikmin_is_whistled: bool,
    pub dropped_when_pikmin_lands: bool,
}

impl Default for ToolProps {
    fn default() -> Self {
        Self {
            dropped_when_pikmin_is_whistled: false,
            dropped_when_pikmin_lands: true,
        }
    }
}

pub struct ToolCategory {
    info: CategoryInfo,
    store: CategoryStore,
}

impl Default for ToolCategory {
    fn default() -> Self {
        Self {
            info: CategoryInfo {
                id: MobCategoryId::Tools,
                name: "Tool",
                plural_name: "Tools",
                folder_name: "tools",
            },
            store: CategoryStore::default(),
        }
    }
}

impl MobCategory for ToolCategory {
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
        let mut mob_type = MobType::new(MobCategoryId::Tools);
        mob_type.radius = 6.0;
        mob_type.height = 10.0;
        mob_type.props = CategoryProps::Tool(ToolProps::default());
        mob_type.class_tick = Some(tool_class_tick);
        mob_type
    }

    fn is_scripted(&self) -> bool {
        true
    }

    fn load_cat_properties(
        &self,
        node: &PropReader<'_>,
        mob_type: &mut MobType,
        errors: &mut ErrorReporter,
    ) {
        let defaults = ToolProps::default();
        mob_type.props = CategoryProps::Tool(ToolProps {
            dropped_when_pikmin_is_whistled: node.bool(
                "dropped_when_pikmin_is_whistled",
                defaults.dropped_when_pikmin_is_whistled,
                errors,
            ),
            dropped_when_pikmin_lands: node.bool(
                "dropped_when_pikmin_lands",
                defaults.dropped_when_pikmin_lands,
                errors,
            ),
        });
    }
}

/// A held tool follows its holder.
fn tool_class_tick(world: &mut World, mob: Entity, _dt: f32) {
    let Some(holder) = world.get::<HeldBy>(mob).and_then(|h| h.holder) else {
        return;
    };
    let Some(holder_pos) = world.get::<MapPosition>(holder).map(|p| p.pos) else {
        return;
    };
    if let Some(mut pos) = world.get_mut::<MapPosition>(mob) {
        pos.pos = holder_pos;
    }
}
