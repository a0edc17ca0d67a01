//! Area files: where the delivery point is and which mobs start where.
//!
//! ```json
//! {
//!   "name": "Test Field",
//!   "delivery_point": [0, 0],
//!   "mobs": [
//!     { "category": "pikmin", "type": "red", "pos": [10, 20] },
//!     { "category": "resources", "type": "pellet", "pos": [80, 0], "angle": 1.5 }
//!   ]
//! }
//! ```

use bevy_ecs::prelude::*;
use log::info;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::content::errors::{ContentError, ErrorReporter};
use crate::math::Vec2;
use crate::mobs::category::{MobCategoryManager, spawn_mob};
use crate::resources::areainfo::AreaInfo;

#[derive(Debug, Clone, Deserialize)]
pub struct AreaDef {
    pub name: String,
    #[serde(default)]
    pub delivery_point: Option<[f32; 2]>,
    #[serde(default)]
    pub mobs: Vec<AreaMobDef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AreaMobDef {
    /// Category folder name, or its singular name.
    pub category: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub pos: [f32; 2],
    #[serde(default)]
    pub angle: f32,
    /// This mob receives deliveries.
    #[serde(default)]
    pub delivery_target: bool,
}

pub fn read_area(path: &Path) -> Result<AreaDef, ContentError> {
    let text = fs::read_to_string(path).map_err(|source| ContentError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| ContentError::Parse {
        source_name: path.display().to_string(),
        source,
    })
}

/// Sets up [`AreaInfo`] and spawns the area's mobs, in file order. Mobs of
/// unknown categories or types are reported and skipped.
pub fn load_area(world: &mut World, area: &AreaDef, errors: &mut ErrorReporter) -> Vec<Entity> {
    let mut info = AreaInfo {
        name: area.name.clone(),
        delivery_point: area.delivery_point.map(Vec2::from),
        delivery_target: None,
    };

    let mut spawned = Vec::with_capacity(area.mobs.len());
    for def in &area.mobs {
        let mob_type = {
            let Some(manager) = world.get_resource::<MobCategoryManager>() else {
                errors.report(ContentError::UnknownCategory {
                    name: def.category.clone(),
                });
                continue;
            };
            let Some(category) = manager
                .get_from_folder_name(&def.category)
                .or_else(|| manager.get_from_name(&def.category))
            else {
                errors.report(ContentError::UnknownCategory {
                    name: def.category.clone(),
                });
                continue;
            };
            let Some(mob_type) = category.get_type(&def.type_name) else {
                errors.report(ContentError::UnknownType {
                    category: def.category.clone(),
                    name: def.type_name.clone(),
                });
                continue;
            };
            mob_type
        };

        if let Some(mob) = spawn_mob(world, mob_type, Vec2::from(def.pos), def.angle) {
            if def.delivery_target {
                info.delivery_target = Some(mob);
            }
            spawned.push(mob);
        }
    }

    info!("Area \"{}\": spawned {} mobs", area.name, spawned.len());
    world.insert_resource(info);
    spawned
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_area_json() {
        let area: AreaDef = serde_json::from_str(
            r#"{
                "name": "Field",
                "delivery_point": [5, -5],
                "mobs": [
                    { "category": "drops", "type": "nectar", "pos": [1, 2] },
                    { "category": "scales", "type": "plate", "pos": [0, 0], "delivery_target": true }
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(area.delivery_point, Some([5.0, -5.0]));
        assert_eq!(area.mobs.len(), 2);
        assert_eq!(area.mobs[0].type_name, "nectar");
        assert_eq!(area.mobs[0].angle, 0.0);
        assert!(area.mobs[1].delivery_target);
    }

    #[test]
    fn unknown_types_are_reported() {
        let mut world = World::new();
        world.insert_resource(MobCategoryManager::with_default_categories());
        let area = AreaDef {
            name: "Empty".to_string(),
            delivery_point: None,
            mobs: vec![
                AreaMobDef {
                    category: "pikmin".to_string(),
                    type_name: "ghost".to_string(),
                    pos: [0.0, 0.0],
                    angle: 0.0,
                    delivery_target: false,
                },
                AreaMobDef {
                    category: "spaceships".to_string(),
                    type_name: "x".to_string(),
                    pos: [0.0, 0.0],
                    angle: 0.0,
                    delivery_target: false,
                },
            ],
        };
        let mut errors = ErrorReporter::new();
        let spawned = load_area(&mut world, &area, &mut errors);
        assert!(spawned.is_empty());
        assert_eq!(errors.len(), 2);
        assert_eq!(world.resource::<AreaInfo>().name, "Empty");
    }
}
