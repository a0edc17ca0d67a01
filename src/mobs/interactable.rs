//! Interactables: things a leader can interact with (switches, signs...).
//! Their behavior is scripted in content.

use crate::content::datanode::PropReader;
use crate::content::errors::ErrorReporter;
use crate::mobs::category::{CategoryInfo, CategoryStore, MobCategory};
use crate::mobs::mobtype::{CategoryProps, MobCategoryId, MobType};

#[derive(Debug, Clone, PartialEq)]
pub struct InteractableProps {
    pub prompt_text: String,
    /// Distance from its edge at which a leader can interact.
    pub trigger_range: f32,
}

impl Default for InteractableProps {
    fn default() -> Self {
        Self {
            prompt_text: String::new(),
            trigger_range: 64.0,
        }
    }
}

pub struct InteractableCategory {
    info: CategoryInfo,
    store: CategoryStore,
}

impl Default for InteractableCategory {
    fn default() -> Self {
        Self {
            info: CategoryInfo {
                id: MobCategoryId::Interactables,
                name: "Interactable",
                plural_name: "Interactables",
                folder_name: "interactables",
            },
            store: CategoryStore::default(),
        }
    }
}

impl MobCategory for InteractableCategory {
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
        let mut mob_type = MobType::new(MobCategoryId::Interactables);
        mob_type.props = CategoryProps::Interactable(InteractableProps::default());
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
        let defaults = InteractableProps::default();
        mob_type.props = CategoryProps::Interactable(InteractableProps {
            prompt_text: node.string("prompt_text", &defaults.prompt_text, errors),
            trigger_range: node.f32("trigger_range", defaults.trigger_range, errors),
        });
    }
}
