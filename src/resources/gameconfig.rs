//! Game configuration resource.
//!
//! Settings loaded from an INI configuration file. Every value has a safe
//! default, so a missing file or a missing key never stops the game.
//!
//! # Configuration File Format
//!
//! ```ini
//! [logic]
//! delta = 0.016666
//!
//! [gameplay]
//! gravity = 1300
//! drop_spawn_height = 120
//! delivery_duration = 2
//! max_pikmin_maturity = 2
//! whistle_radius = 80
//! touch_tolerance = 2
//!
//! [content]
//! folder = assets/content
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;

/// Default safe values for startup
const DEFAULT_LOGIC_DELTA: f32 = 1.0 / 60.0;
const DEFAULT_GRAVITY: f32 = 1300.0;
const DEFAULT_DROP_SPAWN_HEIGHT: f32 = 120.0;
const DEFAULT_DELIVERY_DURATION: f32 = 2.0;
const DEFAULT_MAX_PIKMIN_MATURITY: u8 = 2;
const DEFAULT_WHISTLE_RADIUS: f32 = 80.0;
const DEFAULT_TOUCH_TOLERANCE: f32 = 2.0;
const DEFAULT_CONTENT_FOLDER: &str = "assets/content";
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

/// Numbers the mob logic reads while it runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameplayTuning {
    /// Downward acceleration of airborne mobs.
    pub gravity: f32,
    /// Height new drops fall from.
    pub drop_spawn_height: f32,
    /// Seconds a delivered resource takes to be received.
    pub delivery_duration: f32,
    pub max_pikmin_maturity: u8,
    pub whistle_radius: f32,
    /// Extra distance at which two circles still count as touching.
    pub touch_tolerance: f32,
}

impl Default for GameplayTuning {
    fn default() -> Self {
        Self {
            gravity: DEFAULT_GRAVITY,
            drop_spawn_height: DEFAULT_DROP_SPAWN_HEIGHT,
            delivery_duration: DEFAULT_DELIVERY_DURATION,
            max_pikmin_maturity: DEFAULT_MAX_PIKMIN_MATURITY,
            whistle_radius: DEFAULT_WHISTLE_RADIUS,
            touch_tolerance: DEFAULT_TOUCH_TOLERANCE,
        }
    }
}

/// Game configuration resource.
#[derive(Resource, Debug, Clone)]
pub struct GameConfig {
    /// Fixed logic step, in seconds.
    pub logic_delta: f32,
    pub gameplay: GameplayTuning,
    /// Folder holding the mob type folders.
    pub content_folder: PathBuf,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GameConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            logic_delta: DEFAULT_LOGIC_DELTA,
            gameplay: GameplayTuning::default(),
            content_folder: PathBuf::from(DEFAULT_CONTENT_FOLDER),
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;

        // [logic] section
        if let Some(delta) = config.getfloat("logic", "delta").ok().flatten() {
            if delta > 0.0 {
                self.logic_delta = delta as f32;
            }
        }

        // [gameplay] section
        let g = &mut self.gameplay;
        if let Some(v) = config.getfloat("gameplay", "gravity").ok().flatten() {
            g.gravity = v as f32;
        }
        if let Some(v) = config.getfloat("gameplay", "drop_spawn_height").ok().flatten() {
            g.drop_spawn_height = v as f32;
        }
        if let Some(v) = config.getfloat("gameplay", "delivery_duration").ok().flatten() {
            g.delivery_duration = v as f32;
        }
        if let Some(v) = config.getuint("gameplay", "max_pikmin_maturity").ok().flatten() {
            g.max_pikmin_maturity = v.min(u8::MAX as u64) as u8;
        }
        if let Some(v) = config.getfloat("gameplay", "whistle_radius").ok().flatten() {
            g.whistle_radius = v as f32;
        }
        if let Some(v) = config.getfloat("gameplay", "touch_tolerance").ok().flatten() {
            g.touch_tolerance = v as f32;
        }

        // [content] section
        if let Some(folder) = config.get("content", "folder") {
            self.content_folder = PathBuf::from(folder);
        }

        info!(
            "Loaded config: delta={}, gravity={}, content={:?}",
            self.logic_delta, self.gameplay.gravity, self.content_folder
        );

        Ok(())
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();
        let g = &self.gameplay;

        config.set("logic", "delta", Some(self.logic_delta.to_string()));

        config.set("gameplay", "gravity", Some(g.gravity.to_string()));
        config.set(
            "gameplay",
            "drop_spawn_height",
            Some(g.drop_spawn_height.to_string()),
        );
        config.set(
            "gameplay",
            "delivery_duration",
            Some(g.delivery_duration.to_string()),
        );
        config.set(
            "gameplay",
            "max_pikmin_maturity",
            Some(g.max_pikmin_maturity.to_string()),
        );
        config.set("gameplay", "whistle_radius", Some(g.whistle_radius.to_string()));
        config.set("gameplay", "touch_tolerance", Some(g.touch_tolerance.to_string()));

        config.set(
            "content",
            "folder",
            Some(self.content_folder.to_string_lossy().into_owned()),
        );

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }
}

/// Gameplay numbers of the world's config, or the defaults if it has none.
pub fn tuning(world: &World) -> GameplayTuning {
    world
        .get_resource::<GameConfig>()
        .map(|c| c.gameplay)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_keeps_defaults() {
        let mut config = GameConfig::with_path("/nonexistent/mobcore/config.ini");
        assert!(config.load_from_file().is_err());
        assert_eq!(config.gameplay, GameplayTuning::default());
    }

    #[test]
    fn save_then_load() {
        let path = std::env::temp_dir().join(format!("mobcore_cfg_{}.ini", std::process::id()));
        let mut config = GameConfig::with_path(&path);
        config.gameplay.gravity = 900.0;
        config.gameplay.max_pikmin_maturity = 5;
        config.content_folder = PathBuf::from("elsewhere");
        config.save_to_file().expect("save");

        let mut loaded = GameConfig::with_path(&path);
        loaded.load_from_file().expect("load");
        assert_eq!(loaded.gameplay.gravity, 900.0);
        assert_eq!(loaded.gameplay.max_pikmin_maturity, 5);
        assert_eq!(loaded.content_folder, PathBuf::from("elsewhere"));
        let _ = std::fs::remove_file(&path);
    }
}
