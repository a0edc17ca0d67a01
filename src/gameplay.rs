//! A gameplay session: one `World` with everything a running area needs.
//!
//! The session owns the world and the logic schedule. Content is loaded
//! into the session's [`MobCategoryManager`], areas spawn mobs into it, and
//! [`GameplaySession::tick`] advances the simulation by one logic frame.
//! Sessions share nothing, so several can run side by side (tests do).

use bevy_ecs::observer::Observer;
use bevy_ecs::prelude::*;
use log::info;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;

use crate::components::mob::Mob;
use crate::content::area::{AreaDef, load_area, read_area};
use crate::content::errors::{ContentError, ErrorReporter};
use crate::content::loader::{load_mob_types, load_type_node};
use crate::events::mob::observe_mob_deleted;
use crate::math::Vec2;
use crate::mobs::category::{MobCategoryManager, spawn_mob};
use crate::mobs::mobtype::{MobCategoryId, MobType};
use crate::resources::areainfo::{AreaInfo, Score};
use crate::resources::gameconfig::GameConfig;
use crate::resources::moblist::MobList;
use crate::resources::worldtime::WorldTime;
use crate::systems::schedule::build_logic_schedule;
use crate::systems::time::update_world_time;

pub struct GameplaySession {
    pub world: World,
    update: Schedule,
}

impl GameplaySession {
    /// A session with every built-in category and no content.
    pub fn new(config: GameConfig) -> Self {
        let mut world = World::new();
        world.insert_resource(WorldTime::default().with_time_scale(1.0));
        world.insert_resource(config);
        world.insert_resource(MobList::default());
        world.insert_resource(AreaInfo::default());
        world.insert_resource(Score::default());
        world.insert_resource(ErrorReporter::new());
        world.insert_resource(MobCategoryManager::with_default_categories());

        world.spawn(Observer::new(observe_mob_deleted));
        // Ensure the observer is registered before anything can trigger it.
        world.flush();

        Self {
            world,
            update: build_logic_schedule(),
        }
    }

    pub fn config(&self) -> &GameConfig {
        self.world.resource::<GameConfig>()
    }

    /// Loads the mob types of the configured content folder.
    pub fn load_content(&mut self) -> usize {
        let folder = self.config().content_folder.clone();
        self.load_content_from(&folder)
    }

    pub fn load_content_from(&mut self, folder: &Path) -> usize {
        load_mob_types(&mut self.world, folder)
    }

    /// Builds and registers one type from a JSON node.
    pub fn register_type(
        &mut self,
        category: MobCategoryId,
        key: &str,
        node: &Value,
    ) -> Option<Arc<MobType>> {
        let mut errors = ErrorReporter::new();
        let mob_type = self
            .world
            .resource_scope(|_world, mut manager: Mut<MobCategoryManager>| {
                load_type_node(&mut manager, category, key, node, &mut errors)
            });
        self.world.resource_mut::<ErrorReporter>().absorb(&mut errors);
        mob_type
    }

    pub fn get_type(&self, category: MobCategoryId, name: &str) -> Option<Arc<MobType>> {
        self.world
            .resource::<MobCategoryManager>()
            .get(category)?
            .get_type(name)
    }

    pub fn load_area(&mut self, area: &AreaDef) -> Vec<Entity> {
        let mut errors = ErrorReporter::new();
        let spawned = load_area(&mut self.world, area, &mut errors);
        self.world.resource_mut::<ErrorReporter>().absorb(&mut errors);
        spawned
    }

    pub fn load_area_file(&mut self, path: &Path) -> Result<Vec<Entity>, ContentError> {
        let area = read_area(path)?;
        Ok(self.load_area(&area))
    }

    pub fn spawn(&mut self, mob_type: Arc<MobType>, pos: Vec2, angle: f32) -> Option<Entity> {
        spawn_mob(&mut self.world, mob_type, pos, angle)
    }

    /// Runs one logic frame of the configured length.
    pub fn tick(&mut self) {
        let dt = self.config().logic_delta;
        self.tick_with(dt);
    }

    pub fn tick_with(&mut self, dt: f32) {
        update_world_time(&mut self.world, dt);
        self.update.run(&mut self.world);
    }

    /// Mobs in the game, in tick order.
    pub fn live_mobs(&self) -> Vec<Entity> {
        self.world.resource::<MobList>().as_slice().to_vec()
    }

    pub fn mob_count(&self, category: MobCategoryId) -> usize {
        self.world
            .resource::<MobCategoryManager>()
            .get(category)
            .map(|c| c.mobs().len())
            .unwrap_or(0)
    }

    pub fn errors(&self) -> &[ContentError] {
        self.world.resource::<ErrorReporter>().errors()
    }

    pub fn score(&self) -> i64 {
        self.world.resource::<Score>().points
    }

    pub fn is_mob(&self, mob: Entity) -> bool {
        self.world.get::<Mob>(mob).is_some()
    }

    /// Despawns every mob and forgets every loaded type.
    pub fn teardown(&mut self) {
        let mut all_mobs = self.world.query_filtered::<Entity, With<Mob>>();
        let mobs: Vec<Entity> = all_mobs.iter(&self.world).collect();
        for mob in &mobs {
            self.world.despawn(*mob);
        }
        self.world.resource_mut::<MobList>().clear();
        self.world.resource_scope(|_world, mut manager: Mut<MobCategoryManager>| {
            manager.clear_all_types();
            manager.clear_all_mobs();
        });
        info!("Session torn down ({} mobs removed)", mobs.len());
    }
}
