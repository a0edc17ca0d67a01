//! Mob categories and their registry.
//!
//! A [`MobCategory`] groups the mob types of one kind (Pikmin, drops,
//! tracks...). It owns the name → type map of its kind, keeps a non-owning
//! index of its live mobs, and acts as the factory for them. The
//! [`MobCategoryManager`] resource holds one implementation per
//! [`MobCategoryId`].
//!
//! Concrete categories only fill in the hooks ([`MobCategory::create_type`],
//! [`MobCategory::create_fsm`], [`MobCategory::load_cat_properties`],
//! [`MobCategory::insert_components`]); the registry behavior is shared.

use bevy_ecs::prelude::*;
use log::{debug, warn};
use rustc_hash::FxHashMap;
use serde_json::Value;
use std::sync::Arc;

use crate::components::animation::Animation;
use crate::components::focus::Focus;
use crate::components::health::Health;
use crate::components::holding::{HeldBy, Holding};
use crate::components::mapposition::MapPosition;
use crate::components::mob::{Mob, mark_for_deletion};
use crate::components::rotation::Rotation;
use crate::components::standingon::StandingOn;
use crate::components::statuses::Statuses;
use crate::components::timer::ScriptTimer;
use crate::components::vars::Vars;
use crate::content::datanode::PropReader;
use crate::content::errors::{ContentError, ErrorReporter};
use crate::fsm::runtime::MobFsm;
use crate::math::Vec2;
use crate::mobs::mobtype::{MobCategoryId, MobType};
use crate::resources::moblist::MobList;

/// Names of a category.
#[derive(Debug, Clone, Copy)]
pub struct CategoryInfo {
    pub id: MobCategoryId,
    pub name: &'static str,
    pub plural_name: &'static str,
    /// Folder under the content folder holding its type files.
    pub folder_name: &'static str,
}

/// Registry state every category carries.
#[derive(Debug, Default)]
pub struct CategoryStore {
    pub types: FxHashMap<String, Arc<MobType>>,
    /// Live mobs of this category. Entries are also in [`MobList`].
    pub mobs: Vec<Entity>,
}

impl CategoryStore {
    /// Drops `mob` from the index. Returns whether it was there.
    pub fn forget(&mut self, mob: Entity) -> bool {
        match self.mobs.iter().position(|&m| m == mob) {
            Some(idx) => {
                self.mobs.remove(idx);
                true
            }
            None => false,
        }
    }
}

pub trait MobCategory: Send + Sync {
    fn info(&self) -> &CategoryInfo;
    fn store(&self) -> &CategoryStore;
    fn store_mut(&mut self) -> &mut CategoryStore;

    /// A new, blank type of this category.
    fn create_type(&self) -> MobType;

    /// Builds the type's FSM from engine code. Categories with scripted FSMs
    /// leave it alone.
    fn create_fsm(&self, _mob_type: &mut MobType) -> Result<(), Vec<ContentError>> {
        Ok(())
    }

    /// Whether this category's FSMs come from the content's `"script"` block.
    fn is_scripted(&self) -> bool {
        false
    }

    /// Reads the properties only this category has.
    fn load_cat_properties(
        &self,
        _node: &PropReader<'_>,
        _mob_type: &mut MobType,
        _errors: &mut ErrorReporter,
    ) {
    }

    /// Adds this category's components to a freshly spawned mob.
    fn insert_components(&self, _world: &mut World, _mob: Entity, _mob_type: &MobType) {}

    /// Registers `mob_type` under `name`, replacing any type already there.
    fn register_type(&mut self, name: &str, mut mob_type: MobType) -> Arc<MobType> {
        if mob_type.name.is_empty() {
            mob_type.name = name.to_string();
        }
        let mob_type = Arc::new(mob_type);
        let cat_name = self.info().name;
        if self
            .store_mut()
            .types
            .insert(name.to_string(), mob_type.clone())
            .is_some()
        {
            warn!("{} type \"{}\" registered twice, keeping the last one", cat_name, name);
        }
        mob_type
    }

    fn get_type(&self, name: &str) -> Option<Arc<MobType>> {
        self.store().types.get(name).cloned()
    }

    /// Appends the name of every registered type, in map order.
    fn get_type_names(&self, out: &mut Vec<String>) {
        out.extend(self.store().types.keys().cloned());
    }

    /// Spawns a mob of `mob_type` and records it in this category's index
    /// and in the world's [`MobList`].
    ///
    /// The mob only gets its cursor here. Its first state is entered on its
    /// first logic tick.
    fn create_mob(
        &mut self,
        world: &mut World,
        pos: Vec2,
        mob_type: Arc<MobType>,
        angle: f32,
    ) -> Option<Entity> {
        let mob = world
            .spawn((
                MapPosition::from(pos),
                Rotation { angle },
                MobFsm::new(mob_type.first_state_idx),
                Health::new(mob_type.max_health),
                Animation::default(),
                ScriptTimer::default(),
                Focus::default(),
                Vars::default(),
                Statuses::default(),
                StandingOn::default(),
                Holding::default(),
                HeldBy::default(),
                Mob::new(mob_type.clone()),
            ))
            .id();
        self.insert_components(world, mob, &mob_type);
        self.store_mut().mobs.push(mob);
        match world.get_resource_mut::<MobList>() {
            Some(mut list) => list.push(mob),
            None => warn!("no MobList in the world, {:?} is only indexed by its category", mob),
        }
        debug!("Spawned {} \"{}\" as {:?}", self.info().name, mob_type.name, mob);
        Some(mob)
    }

    /// Removes `mob` from this category's index, by identity, and from the
    /// [`MobList`] with it. The mob is marked for deletion and despawned at
    /// the tick boundary.
    ///
    /// Erasing a mob that is not in the index is logged and ignored.
    fn erase_mob(&mut self, world: &mut World, mob: Entity) -> bool {
        if !self.store_mut().forget(mob) {
            warn!("erase of {:?}, which is not in the {} index", mob, self.info().name);
            return false;
        }
        if let Some(mut list) = world.get_resource_mut::<MobList>() {
            list.remove(mob);
        }
        mark_for_deletion(world, mob);
        true
    }

    /// Forgets every registered type.
    fn clear_types(&mut self) {
        self.store_mut().types.clear();
    }

    fn mobs(&self) -> &[Entity] {
        &self.store().mobs
    }
}

/// Reads the properties every mob type has.
pub fn load_common_properties(
    node: &PropReader<'_>,
    mob_type: &mut MobType,
    errors: &mut ErrorReporter,
) {
    mob_type.radius = node.f32("radius", mob_type.radius, errors);
    mob_type.height = node.f32("height", mob_type.height, errors);
    mob_type.weight = node.f32("weight", mob_type.weight, errors);
    mob_type.max_health = node.f32("max_health", mob_type.max_health, errors);
    mob_type.move_speed = node.f32("move_speed", mob_type.move_speed, errors);
    mob_type.max_carriers = node.usize("max_carriers", mob_type.max_carriers, errors);
    mob_type.walkable = node.bool("walkable", mob_type.walkable, errors);

    if let Some(team) = node.get("team") {
        match serde_json::from_value(team.clone()) {
            Ok(t) => mob_type.team = t,
            Err(_) => errors.report(ContentError::InvalidValue {
                source_name: node.source_name().to_string(),
                field: "team".to_string(),
                value: team.to_string(),
            }),
        }
    }

    if let Some(anims) = node.get("animations") {
        match serde_json::from_value(anims.clone()) {
            Ok(map) => mob_type.animations = map,
            Err(source) => errors.report(ContentError::Parse {
                source_name: format!("{} (animations)", node.source_name()),
                source,
            }),
        }
    }
}

/// Category of mobs that fit nowhere else. It cannot spawn anything.
pub struct NoneCategory {
    info: CategoryInfo,
    store: CategoryStore,
}

impl Default for NoneCategory {
    fn default() -> Self {
        Self {
            info: CategoryInfo {
                id: MobCategoryId::None,
                name: "None",
                plural_name: "None",
                folder_name: "",
            },
            store: CategoryStore::default(),
        }
    }
}

impl MobCategory for NoneCategory {
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
        MobType::new(MobCategoryId::None)
    }
    fn create_mob(
        &mut self,
        _world: &mut World,
        _pos: Vec2,
        mob_type: Arc<MobType>,
        _angle: f32,
    ) -> Option<Entity> {
        warn!("cannot spawn \"{}\": it has no category", mob_type.name);
        None
    }
}

/// All mob categories, indexed by [`MobCategoryId`].
#[derive(Resource, Default)]
pub struct MobCategoryManager {
    categories: Vec<Option<Box<dyn MobCategory>>>,
}

impl MobCategoryManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// A manager with every built-in category registered.
    pub fn with_default_categories() -> Self {
        use crate::mobs::{
            drop::DropCategory, interactable::InteractableCategory, leader::LeaderCategory,
            pikmin::PikminCategory, resource::ResourceCategory, scale::ScaleCategory,
            tool::ToolCategory, track::TrackCategory,
        };
        let mut manager = Self::new();
        manager.register_category(Box::new(NoneCategory::default()));
        manager.register_category(Box::new(PikminCategory::default()));
        manager.register_category(Box::new(LeaderCategory::default()));
        manager.register_category(Box::new(DropCategory::default()));
        manager.register_category(Box::new(TrackCategory::default()));
        manager.register_category(Box::new(ToolCategory::default()));
        manager.register_category(Box::new(ResourceCategory::default()));
        manager.register_category(Box::new(ScaleCategory::default()));
        manager.register_category(Box::new(InteractableCategory::default()));
        manager
    }

    /// Registers `category` at its id's slot, replacing what was there.
    pub fn register_category(&mut self, category: Box<dyn MobCategory>) {
        let idx = category.info().id.index();
        if self.categories.len() <= idx {
            self.categories.resize_with(idx + 1, || None);
        }
        self.categories[idx] = Some(category);
    }

    pub fn get(&self, id: MobCategoryId) -> Option<&dyn MobCategory> {
        self.categories.get(id.index())?.as_deref()
    }

    pub fn get_mut(&mut self, id: MobCategoryId) -> Option<&mut (dyn MobCategory + 'static)> {
        self.categories.get_mut(id.index())?.as_deref_mut()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn MobCategory> {
        self.categories.iter().filter_map(|c| c.as_deref())
    }

    pub fn get_from_name(&self, name: &str) -> Option<&dyn MobCategory> {
        self.iter().find(|c| c.info().name == name)
    }

    pub fn get_from_pname(&self, plural_name: &str) -> Option<&dyn MobCategory> {
        self.iter().find(|c| c.info().plural_name == plural_name)
    }

    pub fn get_from_folder_name(&self, folder_name: &str) -> Option<&dyn MobCategory> {
        self.iter()
            .find(|c| !c.info().folder_name.is_empty() && c.info().folder_name == folder_name)
    }

    /// Finds a type by name in any category.
    pub fn find_mob_type(&self, name: &str) -> Option<Arc<MobType>> {
        self.iter().find_map(|c| c.get_type(name))
    }

    /// Clears the types of every category.
    pub fn clear_all_types(&mut self) {
        for category in self.categories.iter_mut().flatten() {
            category.clear_types();
        }
    }

    /// Empties every category's mob index.
    pub fn clear_all_mobs(&mut self) {
        for category in self.categories.iter_mut().flatten() {
            category.store_mut().mobs.clear();
        }
    }
}

/// Spawns a mob through its type's category.
pub fn spawn_mob(world: &mut World, mob_type: Arc<MobType>, pos: Vec2, angle: f32) -> Option<Entity> {
    if !world.contains_resource::<MobCategoryManager>() {
        warn!("no MobCategoryManager in the world, cannot spawn \"{}\"", mob_type.name);
        return None;
    }
    world.resource_scope(|world, mut manager: Mut<MobCategoryManager>| {
        let Some(category) = manager.get_mut(mob_type.category) else {
            warn!("category {:?} is not registered", mob_type.category);
            return None;
        };
        category.create_mob(world, pos, mob_type, angle)
    })
}

/// Erases `mob` through its category. See [`MobCategory::erase_mob`].
pub fn erase_mob(world: &mut World, mob: Entity) -> bool {
    let Some(category_id) = world.get::<Mob>(mob).map(Mob::category) else {
        warn!("erase of {:?}, which is not a mob", mob);
        return false;
    };
    if !world.contains_resource::<MobCategoryManager>() {
        warn!("no MobCategoryManager in the world, cannot erase {:?}", mob);
        return false;
    }
    world.resource_scope(|world, mut manager: Mut<MobCategoryManager>| {
        match manager.get_mut(category_id) {
            Some(category) => category.erase_mob(world, mob),
            None => false,
        }
    })
}

/// Reads a JSON node through the common and category loaders.
pub fn build_type(
    category: &dyn MobCategory,
    name: &str,
    node: &Value,
    errors: &mut ErrorReporter,
) -> MobType {
    let source_name = format!("{}/{}", category.info().folder_name, name);
    let reader = PropReader::new(node, &source_name);
    let mut mob_type = category.create_type();
    mob_type.name = name.to_string();
    load_common_properties(&reader, &mut mob_type, errors);
    category.load_cat_properties(&reader, &mut mob_type, errors);
    mob_type
}
