//! Mob type loading.
//!
//! Reading and parsing the JSON files happens on a background thread that
//! sends each parsed file over a channel. The main thread joins it, then
//! builds every type through its category and registers it. Nothing on the
//! loading thread touches the `World`.
//!
//! Files live at `<content folder>/<category folder>/<type key>.json`.

use bevy_ecs::prelude::*;
use crossbeam_channel::{Receiver, unbounded};
use log::{debug, info, warn};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::JoinHandle;

use crate::content::errors::{ContentError, ErrorReporter};
use crate::fsm::script::{ScriptDef, compile_script};
use crate::mobs::category::{MobCategoryManager, build_type};
use crate::mobs::mobtype::{MobCategoryId, MobType};

/// One parsed type file.
#[derive(Debug, Clone)]
pub struct TypeFile {
    pub folder: String,
    /// File name without the extension.
    pub key: String,
    pub node: Value,
}

enum LoadMessage {
    File(TypeFile),
    Failed(ContentError),
}

/// Handle to a running load thread.
pub struct ContentLoader {
    rx: Receiver<LoadMessage>,
    handle: JoinHandle<()>,
}

/// Starts reading the type files of `folders` under `content_folder`.
pub fn start_loading(content_folder: PathBuf, folders: Vec<String>) -> ContentLoader {
    let (tx, rx) = unbounded::<LoadMessage>();
    let handle = std::thread::spawn(move || {
        for folder in folders {
            for msg in read_folder(&content_folder, &folder) {
                if tx.send(msg).is_err() {
                    return;
                }
            }
        }
    });
    ContentLoader { rx, handle }
}

impl ContentLoader {
    /// Waits for the thread and returns what it read, in folder then file
    /// name order.
    pub fn finish(self) -> (Vec<TypeFile>, Vec<ContentError>) {
        if self.handle.join().is_err() {
            warn!("content loading thread panicked, keeping what it sent");
        }
        let mut files = Vec::new();
        let mut errors = Vec::new();
        for msg in self.rx.try_iter() {
            match msg {
                LoadMessage::File(f) => files.push(f),
                LoadMessage::Failed(e) => errors.push(e),
            }
        }
        (files, errors)
    }
}

fn read_folder(content_folder: &Path, folder: &str) -> Vec<LoadMessage> {
    let dir = content_folder.join(folder);
    let entries = match fs::read_dir(&dir) {
        Ok(entries) => entries,
        Err(_) => {
            debug!("no content folder {:?}", dir);
            return Vec::new();
        }
    };
    let mut paths: Vec<PathBuf> = entries
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();

    paths
        .into_iter()
        .map(|path| {
            let key = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            let text = match fs::read_to_string(&path) {
                Ok(text) => text,
                Err(source) => return LoadMessage::Failed(ContentError::Io { path, source }),
            };
            match serde_json::from_str(&text) {
                Ok(node) => LoadMessage::File(TypeFile {
                    folder: folder.to_string(),
                    key,
                    node,
                }),
                Err(source) => LoadMessage::Failed(ContentError::Parse {
                    source_name: format!("{}/{}", folder, key),
                    source,
                }),
            }
        })
        .collect()
}

/// Builds a type from its JSON node and registers it in its category.
///
/// Types whose FSM cannot be built are reported and left out.
pub fn load_type_node(
    manager: &mut MobCategoryManager,
    category_id: MobCategoryId,
    key: &str,
    node: &Value,
    errors: &mut ErrorReporter,
) -> Option<Arc<MobType>> {
    let Some(category) = manager.get(category_id) else {
        errors.report(ContentError::UnknownCategory {
            name: format!("{:?}", category_id),
        });
        return None;
    };
    let source_name = format!("{}/{}", category.info().folder_name, key);
    let mut mob_type = build_type(category, key, node, errors);

    let fsm_ok = if category.is_scripted() {
        load_script(&source_name, node, &mut mob_type, errors)
    } else {
        match category.create_fsm(&mut mob_type) {
            Ok(()) => true,
            Err(fsm_errors) => {
                for e in fsm_errors {
                    errors.report(e);
                }
                false
            }
        }
    };
    if !fsm_ok {
        warn!("Skipping type \"{}\": its FSM could not be built", source_name);
        return None;
    }

    let category = manager.get_mut(category_id)?;
    Some(category.register_type(key, mob_type))
}

fn load_script(
    source_name: &str,
    node: &Value,
    mob_type: &mut MobType,
    errors: &mut ErrorReporter,
) -> bool {
    let Some(script) = node.get("script") else {
        errors.report(ContentError::InvalidValue {
            source_name: source_name.to_string(),
            field: "script".to_string(),
            value: "missing".to_string(),
        });
        return false;
    };
    let script: ScriptDef = match serde_json::from_value(script.clone()) {
        Ok(s) => s,
        Err(source) => {
            errors.report(ContentError::Parse {
                source_name: format!("{} (script)", source_name),
                source,
            });
            return false;
        }
    };
    match compile_script(source_name, &script, errors) {
        Some(fsm) => {
            mob_type.set_fsm(fsm);
            true
        }
        None => false,
    }
}

/// Loads every category's types from `content_folder` into the world's
/// [`MobCategoryManager`]. Problems go to the world's [`ErrorReporter`].
///
/// Returns how many types were registered.
pub fn load_mob_types(world: &mut World, content_folder: &Path) -> usize {
    let Some(manager) = world.get_resource::<MobCategoryManager>() else {
        warn!("no MobCategoryManager in the world, nothing loaded");
        return 0;
    };
    let folders: Vec<(MobCategoryId, String)> = manager
        .iter()
        .filter(|c| !c.info().folder_name.is_empty())
        .map(|c| (c.info().id, c.info().folder_name.to_string()))
        .collect();

    let loader = start_loading(
        content_folder.to_path_buf(),
        folders.iter().map(|(_, f)| f.clone()).collect(),
    );
    let (files, read_errors) = loader.finish();

    let mut errors = ErrorReporter::new();
    for e in read_errors {
        errors.report(e);
    }

    let mut loaded = 0;
    world.resource_scope(|_world, mut manager: Mut<MobCategoryManager>| {
        for file in &files {
            let Some((id, _)) = folders.iter().find(|(_, f)| *f == file.folder) else {
                continue;
            };
            if load_type_node(&mut manager, *id, &file.key, &file.node, &mut errors).is_some() {
                loaded += 1;
            }
        }
    });

    info!(
        "Loaded {} mob types from {:?} ({} errors)",
        loaded,
        content_folder,
        errors.len()
    );
    match world.get_resource_mut::<ErrorReporter>() {
        Some(mut reporter) => reporter.absorb(&mut errors),
        None => {
            world.insert_resource(errors);
        }
    }
    loaded
}
